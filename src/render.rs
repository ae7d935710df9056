//! Read-only per-frame snapshots
//!
//! The render loop owns no game logic: each tick it reads the session and
//! hands a plain draw list to the host's driver. Pausing rendering is
//! independent of gameplay state, so a paused game can still show a frozen
//! board.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::session::{GameState, HintHighlight, PuzzleSession};

/// Everything the host needs to draw one piece
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PieceSprite {
    pub id: u32,
    /// Destination top-left on the canvas
    pub pos: Vec2,
    pub size: Vec2,
    /// Source top-left within the puzzle image
    pub source_pos: Vec2,
    pub dragging: bool,
    pub placed: bool,
}

/// One frame's worth of draw state, already in paint order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub state: GameState,
    pub progress_percent: f32,
    /// Bottom-most first; paint in order
    pub pieces: Vec<PieceSprite>,
    pub hint: Option<HintHighlight>,
}

impl FrameSnapshot {
    /// Capture the session's current visual state
    pub fn capture(session: &PuzzleSession) -> Self {
        let set = session.pieces();
        let pieces = set
            .draw_order
            .iter()
            .map(|&idx| {
                let p = &set.pieces[idx];
                PieceSprite {
                    id: p.id,
                    pos: p.pos,
                    size: p.size,
                    source_pos: p.correct_pos,
                    dragging: p.dragging,
                    placed: p.placed,
                }
            })
            .collect();
        Self {
            state: session.state(),
            progress_percent: set.progress_percent(),
            pieces,
            hint: session.hint_highlight(),
        }
    }
}

/// Host-side draw sink (canvas, GPU, terminal, test recorder)
pub trait RenderDriver {
    fn draw(&mut self, frame: &FrameSnapshot);
}

/// Cooperative frame driver; the host paces it (rAF, vsync, timer)
#[derive(Debug, Default)]
pub struct RenderLoop {
    paused: bool,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Snapshot the session and issue draw calls. Skipped while paused;
    /// never mutates game state.
    pub fn frame(&self, session: &PuzzleSession, driver: &mut dyn RenderDriver) {
        if self.paused {
            return;
        }
        let snapshot = FrameSnapshot::capture(session);
        driver.draw(&snapshot);
    }
}
