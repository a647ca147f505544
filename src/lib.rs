//! Terminal session view: composites an engine-rendered bitmap with cursor and
//! selection overlays, and negotiates surface size with the engine.

pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod logging;
pub mod render;
pub mod tui;

pub use config::Config;
pub use engine::{CursorState, TerminalEngine};
pub use error::{Error, Result};
pub use input::{KeyInput, KeySink};
pub use render::{Renderer, Selection};
