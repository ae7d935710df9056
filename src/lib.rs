//! Jigsaw Engine - an interactive jigsaw puzzle game core
//!
//! Core modules:
//! - `grid`: Grid derivation and piece generation (seeded scatter)
//! - `input`: Pointer-driven placement detection (hit test, snap, nudge)
//! - `scoring`: Timer, move/hint counters, final score formula
//! - `session`: Lifecycle state machine and completion callback
//! - `render`: Read-only per-frame snapshots for a host renderer
//!
//! The engine owns no rendering backend and no persistence: hosts feed it
//! pointer events and wall-clock timestamps, and read frame snapshots back.

pub mod assets;
pub mod config;
pub mod error;
pub mod grid;
pub mod input;
pub mod piece;
pub mod render;
pub mod scoring;
pub mod session;

pub use assets::{ImageInfo, ImageLoader, MemoryImageLoader};
pub use config::{Difficulty, PieceCount, PuzzleConfig};
pub use error::EngineError;
pub use input::{PlacementDetector, PlacementOutcome};
pub use scoring::{Clock, ScoringEngine, SessionStats, SystemClock};
pub use session::{CompletionStats, GameState, PuzzleSession, SessionEvent};

use glam::Vec2;

/// Engine configuration constants
pub mod consts {
    /// Snap distance as a fraction of `min(piece width, piece height)`
    pub const SNAP_THRESHOLD_RATIO: f32 = 0.2;

    /// Aspect-ratio tolerance when choosing a grid (cols/rows vs image w/h)
    pub const GRID_ASPECT_TOLERANCE: f32 = 0.2;

    /// Scatter retries per piece before falling back to a packed layout
    pub const SCATTER_MAX_ATTEMPTS: u32 = 64;

    /// Margin between scattered pieces and the board edge (pixels)
    pub const SCATTER_MARGIN: f32 = 4.0;

    /// Iteration cap when pushing a dropped piece out of overlaps
    pub const NUDGE_MAX_ITERATIONS: u32 = 16;

    /// How long a hint highlight stays visible (milliseconds)
    pub const HINT_HIGHLIGHT_MS: u64 = 2000;

    /// One score point lost per this many elapsed seconds
    pub const TIME_PENALTY_INTERVAL_SECS: u64 = 10;

    /// Score points lost per hint
    pub const HINT_PENALTY: f32 = 5.0;

    /// Explicit piece-count targets a host may request
    pub const PIECE_COUNT_CHOICES: [u32; 7] = [8, 16, 32, 64, 128, 256, 512];
}

/// Axis-aligned overlap test for two top-left anchored rects
#[inline]
pub fn rects_overlap(pos_a: Vec2, size_a: Vec2, pos_b: Vec2, size_b: Vec2) -> bool {
    pos_a.x < pos_b.x + size_b.x
        && pos_b.x < pos_a.x + size_a.x
        && pos_a.y < pos_b.y + size_b.y
        && pos_b.y < pos_a.y + size_a.y
}

/// Check if a point falls inside a top-left anchored rect
#[inline]
pub fn rect_contains(pos: Vec2, size: Vec2, point: Vec2) -> bool {
    point.x >= pos.x && point.x <= pos.x + size.x && point.y >= pos.y && point.y <= pos.y + size.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rects_overlap() {
        let size = Vec2::new(10.0, 10.0);
        assert!(rects_overlap(
            Vec2::new(0.0, 0.0),
            size,
            Vec2::new(5.0, 5.0),
            size
        ));
        // Touching edges do not overlap
        assert!(!rects_overlap(
            Vec2::new(0.0, 0.0),
            size,
            Vec2::new(10.0, 0.0),
            size
        ));
        assert!(!rects_overlap(
            Vec2::new(0.0, 0.0),
            size,
            Vec2::new(0.0, 20.0),
            size
        ));
    }

    #[test]
    fn test_rect_contains() {
        let pos = Vec2::new(10.0, 10.0);
        let size = Vec2::new(20.0, 10.0);
        assert!(rect_contains(pos, size, Vec2::new(15.0, 15.0)));
        assert!(rect_contains(pos, size, Vec2::new(10.0, 10.0))); // corner inclusive
        assert!(!rect_contains(pos, size, Vec2::new(31.0, 15.0)));
    }
}
