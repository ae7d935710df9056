//! Headless scripted demo
//!
//! Plays one 8-piece session to completion with real pointer events and
//! prints the completion payload as JSON. Useful as a smoke test and as a
//! minimal example of driving the engine without a renderer.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use jigsaw_engine::render::{FrameSnapshot, RenderDriver, RenderLoop};
use jigsaw_engine::{
    CompletionStats, Difficulty, ImageInfo, MemoryImageLoader, PuzzleConfig, PuzzleSession,
    SystemClock,
};

/// Logs a one-line summary per frame instead of painting
struct LogDriver;

impl RenderDriver for LogDriver {
    fn draw(&mut self, frame: &FrameSnapshot) {
        log::debug!(
            "frame: {:?}, {:.0}% complete, {} sprites",
            frame.state,
            frame.progress_percent,
            frame.pieces.len()
        );
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut loader = MemoryImageLoader::new();
    loader.insert("demo://landscape.png", ImageInfo::new(800, 400));

    let difficulty = Difficulty::pieces(8).expect("8 is on the piece-count menu");
    let config = PuzzleConfig::new("demo://landscape.png", difficulty)
        .with_canvas(1600.0, 900.0)
        .with_session_id("demo-session");

    let completed: Rc<RefCell<Option<CompletionStats>>> = Rc::new(RefCell::new(None));
    let sink = completed.clone();

    let mut session = PuzzleSession::initialize(
        config,
        0x5EED_D310,
        &loader,
        Box::new(SystemClock::new()),
        move |stats| {
            *sink.borrow_mut() = Some(stats.clone());
        },
    )
    .expect("demo image is registered");

    let render = RenderLoop::new();
    let mut driver = LogDriver;

    session.start();
    session.hint();

    // Drag every piece home in id order, one frame per move
    for idx in 0..session.pieces().len() {
        let piece = &session.pieces().pieces[idx];
        let (grab, target) = (piece.center(), piece.correct_pos + piece.size * 0.5);
        session.pointer_down(grab);
        session.pointer_move((grab + target) * 0.5);
        session.pointer_up(target);
        session.tick();
        render.frame(&session, &mut driver);
    }

    for event in session.drain_events() {
        log::info!("event: {event:?}");
    }

    let payload = completed.borrow();
    let payload = payload.as_ref().expect("scripted playthrough completes");
    println!(
        "{}",
        serde_json::to_string_pretty(payload).expect("payload serializes")
    );
}
