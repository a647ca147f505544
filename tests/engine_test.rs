use std::thread;

use termview::engine::{GridEngine, Palette, SharedGrid};
use termview::render::{Argb, Bitmap, CellMetrics, PixelRect, Renderer, Selection, Surface};
use termview::{Config, KeyInput, TerminalEngine};

const FG: Argb = Argb::rgb(0xcc, 0xcc, 0xcc);
const BG: Argb = Argb::BLACK;

fn grid(metrics: CellMetrics) -> GridEngine {
    GridEngine::new(metrics, Palette::new(FG, BG))
}

#[test]
fn typed_text_moves_cursor_overlay() {
    let mut renderer = Renderer::new(grid(CellMetrics::new(8, 16)));
    renderer.on_size_changed(80, 48, 0, 0);
    for ch in "hi".chars() {
        renderer.on_key(KeyInput::Char(ch));
    }

    assert_eq!(renderer.cursor_rect(), Some(PixelRect::from_edges(16, 0, 24, 16)));

    let mut canvas = Bitmap::new(80, 48, BG);
    renderer.paint(&mut canvas);
    // glyph of 'h', untouched by overlays
    assert_eq!(canvas.pixel(1, 4), Some(FG));
    // cursor cell is blank, so the xor shows foreground
    assert_eq!(canvas.pixel(16, 0), Some(FG));
    assert_eq!(canvas.pixel(24, 0), Some(BG));
}

#[test]
fn selection_inverts_glyphs() {
    let mut renderer = Renderer::new(grid(CellMetrics::new(8, 16)));
    renderer.on_size_changed(80, 48, 0, 0);
    renderer.engine_mut().feed("ab\r\n");
    renderer.engine_mut().set_cursor_visible(false);
    renderer.set_selection(Selection::from_cells((0, 0), (1, 0)));

    let mut canvas = Bitmap::new(80, 48, BG);
    renderer.paint(&mut canvas);
    assert_eq!(canvas.pixel(1, 4), Some(BG));
    assert_eq!(canvas.pixel(0, 0), Some(FG));
    assert_eq!(canvas.pixel(16, 0), Some(BG));
}

#[test]
fn scrolled_back_cursor_moves_down() {
    let mut renderer = Renderer::new(grid(CellMetrics::new(1, 2)));
    renderer.on_size_changed(4, 4, 0, 0);
    renderer.engine_mut().feed("1\r\n2\r\n3");
    let before = renderer.cursor_rect().unwrap();
    renderer.on_key(KeyInput::Up);
    let after = renderer.cursor_rect().unwrap();
    assert_eq!(after.top, before.top + 2);
}

#[test]
fn force_size_shrinks_grid_within_surface() {
    let mut renderer = Renderer::new(grid(CellMetrics::new(8, 16)));
    renderer.on_size_changed(160, 160, 0, 0);
    renderer.force_size(80, 48);
    assert_eq!((renderer.engine().cols(), renderer.engine().rows()), (10, 3));

    let bitmap = renderer.engine().current_bitmap().unwrap();
    assert_eq!((bitmap.width(), bitmap.height()), (80, 48));
}

#[test]
fn shared_engine_paints_while_producer_writes() {
    let config = Config::default();
    let engine = SharedGrid::new(GridEngine::from_config(&config));
    let mut renderer = Renderer::with_config(engine.clone(), &config);
    renderer.on_size_changed(20, 10, 0, 0);

    let producer = thread::spawn(move || {
        for i in 0..100 {
            engine.feed(&format!("line {i}\r\n"));
        }
    });

    let mut canvas = Bitmap::new(20, 10, BG);
    for _ in 0..100 {
        canvas.fill(BG);
        renderer.paint(&mut canvas);
        assert_eq!(canvas.size().width, 20);
    }
    producer.join().unwrap();

    let engine = renderer.destroy();
    assert!(engine.current_bitmap().is_none());
    let grid = engine.lock();
    assert_eq!(grid.line_text(grid.line_count() - 2).as_deref(), Some("line 99"));
}
