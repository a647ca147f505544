/// Key events after host decoding. What they mean is up to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Enter,
    Backspace,
    Tab,
    Up,
    Down,
    PageUp,
    PageDown,
    Esc,
}

/// Receiver of decoded key input. Returns whether the key was consumed.
pub trait KeySink {
    fn on_key(&mut self, key: KeyInput) -> bool;
}

