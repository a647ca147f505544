use std::io::Stdout;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    ExecutableCommand,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use tracing::{info, warn};

use termview::engine::{GridEngine, SharedGrid};
use termview::render::{Argb, Bitmap, Renderer, Selection};
use termview::{Config, KeyInput, TerminalEngine, logging, tui};

const HINT: &str =
    " type to echo | drag to select | ^R clear selection | ^F force half size | ^C quit";
const PRODUCER_PERIOD: Duration = Duration::from_secs(2);

fn main() -> anyhow::Result<()> {
    let config_path = std::env::var_os("TERMVIEW_CONFIG").map(PathBuf::from);
    let config = Config::load_or_default(config_path.as_deref()).context("load config")?;
    logging::init(&config.log).context("init logging")?;
    info!(?config_path, "starting termview");

    enable_raw_mode().context("enable raw mode")?;
    std::io::stdout()
        .execute(EnterAlternateScreen)
        .context("enter alternate screen")?
        .execute(EnableMouseCapture)
        .context("enable mouse capture")?;

    let result = run_app(&config);

    std::io::stdout()
        .execute(DisableMouseCapture)
        .context("disable mouse capture")?
        .execute(LeaveAlternateScreen)
        .context("leave alternate screen")?;
    disable_raw_mode().context("disable raw mode")?;

    result
}

fn run_app(config: &Config) -> anyhow::Result<()> {
    let backend = CrosstermBackend::new(std::io::stdout());
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let engine = SharedGrid::new(GridEngine::from_config(config));
    engine.feed("termview demo session\r\n");

    let running = Arc::new(AtomicBool::new(true));
    let producer = spawn_producer(engine.clone(), Arc::clone(&running));

    let mut renderer = Renderer::with_config(engine, config);
    let mut host = Host::new(config.colors.background);
    let result = host.run(&mut terminal, &mut renderer);

    running.store(false, Ordering::Relaxed);
    if producer.join().is_err() {
        warn!("session producer panicked");
    }
    renderer.destroy();
    info!("shut down");

    result
}

/// Stands in for session I/O: writes a line into the engine now and then.
fn spawn_producer(engine: SharedGrid, running: Arc<AtomicBool>) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut last = Instant::now();
        let mut ticks = 0u64;
        while running.load(Ordering::Relaxed) {
            thread::sleep(Duration::from_millis(50));
            if last.elapsed() >= PRODUCER_PERIOD {
                ticks += 1;
                engine.feed(&format!("session: tick {ticks}\r\n"));
                last = Instant::now();
            }
        }
    })
}

struct Host {
    canvas: Bitmap,
    surface_area: Rect,
    anchor: Option<(u32, u32)>,
    forced: bool,
}

impl Host {
    fn new(background: Argb) -> Self {
        Self {
            canvas: Bitmap::new(0, 0, background),
            surface_area: Rect::default(),
            anchor: None,
            forced: false,
        }
    }

    fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        renderer: &mut Renderer<SharedGrid>,
    ) -> anyhow::Result<()> {
        let tick_rate = Duration::from_millis(33);

        loop {
            terminal
                .draw(|frame| self.draw(frame, renderer))
                .context("draw frame")?;

            if !event::poll(tick_rate)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if !self.handle_key(key, renderer) {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => self.handle_mouse(mouse, renderer),
                _ => {}
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame, renderer: &mut Renderer<SharedGrid>) {
        let (surface, status_bar) = tui::split(frame.area());
        self.surface_area = surface;

        let size = tui::surface_size(surface);
        let measured = renderer.measured_size();
        if size != measured {
            renderer.on_size_changed(size.width, size.height, measured.width, measured.height);
        }

        let background = renderer.engine().background_color();
        self.canvas.resize(size.width, size.height, background);
        self.canvas.fill(background);
        renderer.paint(&mut self.canvas);

        let status = renderer
            .visible_notification(Instant::now())
            .map_or(HINT, |n| n.message());
        tui::view(frame, &self.canvas, surface, status_bar, status);
    }

    /// Returns false when the host should quit.
    fn handle_key(&mut self, key: KeyEvent, renderer: &mut Renderer<SharedGrid>) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => return false,
                KeyCode::Char('r') => {
                    renderer.reset_selected();
                    renderer.notify(" selection cleared");
                }
                KeyCode::Char('f') => {
                    self.forced = !self.forced;
                    if self.forced {
                        let size = renderer.measured_size();
                        renderer.force_size(size.width / 2, size.height / 2);
                        renderer.notify(" content forced to half the surface");
                    } else {
                        renderer.force_size(0, 0);
                        renderer.notify(" content follows the surface");
                    }
                }
                _ => {}
            }
            return true;
        }

        if let Some(input) = map_key(key.code) {
            let _ = renderer.on_key(input);
        }
        true
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, renderer: &mut Renderer<SharedGrid>) {
        let metrics = renderer.engine().cell_metrics();
        let cell = tui::pixel_at(self.surface_area, mouse.column, mouse.row)
            .and_then(|(x, y)| metrics.cell_at(x, y));

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.anchor = cell;
                renderer.reset_selected();
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let (Some(anchor), Some(cell)) = (self.anchor, cell) {
                    renderer.set_selection(Selection::from_cells(anchor, cell));
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.anchor = None;
                if let Some(selection) = renderer.selection() {
                    renderer.notify(format!(" selected {selection}"));
                }
            }
            MouseEventKind::ScrollUp => {
                let _ = renderer.on_key(KeyInput::Up);
            }
            MouseEventKind::ScrollDown => {
                let _ = renderer.on_key(KeyInput::Down);
            }
            _ => {}
        }
    }
}

fn map_key(code: KeyCode) -> Option<KeyInput> {
    match code {
        KeyCode::Char(ch) => Some(KeyInput::Char(ch)),
        KeyCode::Enter => Some(KeyInput::Enter),
        KeyCode::Backspace => Some(KeyInput::Backspace),
        KeyCode::Tab => Some(KeyInput::Tab),
        KeyCode::Up => Some(KeyInput::Up),
        KeyCode::Down => Some(KeyInput::Down),
        KeyCode::PageUp => Some(KeyInput::PageUp),
        KeyCode::PageDown => Some(KeyInput::PageDown),
        KeyCode::Esc => Some(KeyInput::Esc),
        _ => None,
    }
}
