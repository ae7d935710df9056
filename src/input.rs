//! Pointer-driven placement detection
//!
//! Interprets pointer-down/move/up against the live piece set: hit testing
//! in stacking order, free dragging by pointer deltas, snap-to-correct on
//! release, and deterministic overlap push-out for incorrect drops.
//!
//! Single-pointer model: at most one piece drags at a time, and a press
//! while a drag is live is ignored.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{NUDGE_MAX_ITERATIONS, SNAP_THRESHOLD_RATIO};
use crate::grid::BoardLayout;
use crate::piece::PieceSet;
use crate::rects_overlap;

/// Discrete outcome of one pointer-up while dragging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementOutcome {
    /// Piece snapped to its correct position
    PlacedCorrect,
    /// Piece left at (or nudged near) its dropped position
    PlacedIncorrect,
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    piece_idx: usize,
    last_pointer: Vec2,
}

/// Consumes pointer events and mutates the piece set accordingly
#[derive(Debug)]
pub struct PlacementDetector {
    snap_threshold_ratio: f32,
    drag: Option<DragState>,
}

impl Default for PlacementDetector {
    fn default() -> Self {
        Self::new(SNAP_THRESHOLD_RATIO)
    }
}

impl PlacementDetector {
    pub fn new(snap_threshold_ratio: f32) -> Self {
        Self {
            snap_threshold_ratio,
            drag: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Drop any in-flight drag without reporting an outcome (session reset)
    pub fn clear(&mut self, pieces: &mut PieceSet) {
        if let Some(drag) = self.drag.take() {
            if let Some(piece) = pieces.pieces.get_mut(drag.piece_idx) {
                piece.dragging = false;
            }
        }
    }

    /// Begin a drag on the topmost unplaced piece under the pointer.
    /// Returns true when a piece was grabbed.
    pub fn pointer_down(&mut self, pieces: &mut PieceSet, pos: Vec2) -> bool {
        if self.drag.is_some() {
            return false;
        }
        match pieces.hit_test(pos) {
            Some(idx) => {
                pieces.pieces[idx].dragging = true;
                pieces.raise_to_top(idx);
                self.drag = Some(DragState {
                    piece_idx: idx,
                    last_pointer: pos,
                });
                true
            }
            None => false,
        }
    }

    /// Move the dragged piece by the pointer delta. No snapping mid-drag.
    pub fn pointer_move(&mut self, pieces: &mut PieceSet, pos: Vec2) {
        if let Some(drag) = &mut self.drag {
            let delta = pos - drag.last_pointer;
            pieces.pieces[drag.piece_idx].pos += delta;
            drag.last_pointer = pos;
        }
    }

    /// End the drag: snap when close enough to the target, otherwise leave
    /// the piece where it fell and push it clear of other unplaced pieces.
    /// Every Some(_) return counts as one move upstream.
    pub fn pointer_up(
        &mut self,
        pieces: &mut PieceSet,
        board: &BoardLayout,
    ) -> Option<PlacementOutcome> {
        let drag = self.drag.take()?;
        let piece = &mut pieces.pieces[drag.piece_idx];
        piece.dragging = false;

        let threshold = self.snap_threshold_ratio * piece.size.min_element();
        if piece.distance_to_target() <= threshold {
            piece.snap_to_target();
            Some(PlacementOutcome::PlacedCorrect)
        } else {
            resolve_overlaps(pieces, drag.piece_idx, board);
            Some(PlacementOutcome::PlacedIncorrect)
        }
    }
}

/// Push the dropped piece out of any overlap with other unplaced pieces,
/// along the vector between centers. Iteration is bounded; clamping to the
/// board can reintroduce contact, in which case the piece is left resting.
fn resolve_overlaps(pieces: &mut PieceSet, idx: usize, board: &BoardLayout) {
    for _ in 0..NUDGE_MAX_ITERATIONS {
        let moved = &pieces.pieces[idx];
        let (pos, size, center) = (moved.pos, moved.size, moved.center());

        // Lowest-id overlap first, for determinism
        let hit = pieces
            .pieces
            .iter()
            .enumerate()
            .find(|(i, p)| *i != idx && !p.placed && rects_overlap(pos, size, p.pos, p.size))
            .map(|(_, p)| (p.center(), p.size));
        let Some((other_center, other_size)) = hit else {
            break;
        };

        let mut dir = center - other_center;
        if dir.length_squared() < 1e-6 {
            // Perfectly stacked: push right
            dir = Vec2::X;
        }
        let dir = dir.normalize();

        // Penetration depth per axis; move just far enough along `dir`
        // for one axis to separate
        let pen_x = (size.x + other_size.x) * 0.5 - (center.x - other_center.x).abs();
        let pen_y = (size.y + other_size.y) * 0.5 - (center.y - other_center.y).abs();
        let t_x = if dir.x.abs() > 1e-6 {
            pen_x / dir.x.abs()
        } else {
            f32::INFINITY
        };
        let t_y = if dir.y.abs() > 1e-6 {
            pen_y / dir.y.abs()
        } else {
            f32::INFINITY
        };
        let step = t_x.min(t_y) + 0.5;

        let piece = &mut pieces.pieces[idx];
        piece.pos += dir * step;
        piece.pos = piece.pos.clamp(Vec2::ZERO, (board.size - piece.size).max(Vec2::ZERO));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ImageInfo;
    use crate::piece::Piece;

    fn board() -> BoardLayout {
        BoardLayout::new(1000.0, 800.0, ImageInfo::new(200, 200))
    }

    fn set_2x2() -> PieceSet {
        let size = Vec2::new(100.0, 100.0);
        let mut pieces: Vec<Piece> = (0..4)
            .map(|id| Piece::new(id / 2, id % 2, 2, size))
            .collect();
        // Park pieces away from their targets
        for (i, piece) in pieces.iter_mut().enumerate() {
            piece.pos = Vec2::new(400.0 + 150.0 * i as f32, 400.0);
        }
        PieceSet::new(2, 2, pieces)
    }

    #[test]
    fn test_drag_and_snap_within_threshold() {
        let mut set = set_2x2();
        let mut detector = PlacementDetector::default();

        assert!(detector.pointer_down(&mut set, Vec2::new(450.0, 450.0)));
        assert!(set.pieces[0].dragging);

        // Piece 0's target is (0,0); drop 10px away, inside 20% of 100px
        detector.pointer_move(&mut set, Vec2::new(60.0, 60.0));
        let outcome = detector.pointer_up(&mut set, &board());
        assert_eq!(outcome, Some(PlacementOutcome::PlacedCorrect));
        assert!(set.pieces[0].placed);
        assert!(!set.pieces[0].dragging);
        assert_eq!(set.pieces[0].pos, set.pieces[0].correct_pos);
    }

    #[test]
    fn test_drop_outside_threshold_stays_put() {
        let mut set = set_2x2();
        let mut detector = PlacementDetector::default();

        assert!(detector.pointer_down(&mut set, Vec2::new(450.0, 450.0)));
        detector.pointer_move(&mut set, Vec2::new(350.0, 250.0));
        let outcome = detector.pointer_up(&mut set, &board());
        assert_eq!(outcome, Some(PlacementOutcome::PlacedIncorrect));
        assert!(!set.pieces[0].placed);
        // Moved by the pointer delta, nowhere near the target
        assert_eq!(set.pieces[0].pos, Vec2::new(300.0, 200.0));
    }

    #[test]
    fn test_pointer_up_without_drag_reports_nothing() {
        let mut set = set_2x2();
        let mut detector = PlacementDetector::default();
        assert_eq!(detector.pointer_up(&mut set, &board()), None);
    }

    #[test]
    fn test_second_press_during_drag_is_ignored() {
        let mut set = set_2x2();
        let mut detector = PlacementDetector::default();

        assert!(detector.pointer_down(&mut set, Vec2::new(450.0, 450.0)));
        assert!(!detector.pointer_down(&mut set, Vec2::new(600.0, 450.0)));
        assert_eq!(set.pieces.iter().filter(|p| p.dragging).count(), 1);
    }

    #[test]
    fn test_placed_piece_cannot_be_grabbed() {
        let mut set = set_2x2();
        set.pieces[0].snap_to_target();
        let mut detector = PlacementDetector::default();
        // Target rect of piece 0 is (0,0)..(100,100)
        assert!(!detector.pointer_down(&mut set, Vec2::new(50.0, 50.0)));
    }

    #[test]
    fn test_incorrect_drop_is_nudged_clear_of_overlap() {
        let mut set = set_2x2();
        let mut detector = PlacementDetector::default();

        // Drag piece 0 onto piece 1 (parked at 550,400)
        assert!(detector.pointer_down(&mut set, Vec2::new(450.0, 450.0)));
        detector.pointer_move(&mut set, Vec2::new(620.0, 460.0));
        let outcome = detector.pointer_up(&mut set, &board());
        assert_eq!(outcome, Some(PlacementOutcome::PlacedIncorrect));

        let a = &set.pieces[0];
        let b = &set.pieces[1];
        assert!(!rects_overlap(a.pos, a.size, b.pos, b.size));
    }

    #[test]
    fn test_nudge_direction_is_deterministic() {
        let run = || {
            let mut set = set_2x2();
            let mut detector = PlacementDetector::default();
            detector.pointer_down(&mut set, Vec2::new(450.0, 450.0));
            detector.pointer_move(&mut set, Vec2::new(615.0, 455.0));
            detector.pointer_up(&mut set, &board());
            set.pieces[0].pos
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_clear_drops_drag_without_outcome() {
        let mut set = set_2x2();
        let mut detector = PlacementDetector::default();
        detector.pointer_down(&mut set, Vec2::new(450.0, 450.0));
        detector.clear(&mut set);
        assert!(!detector.is_dragging());
        assert!(!set.pieces[0].dragging);
        assert_eq!(detector.pointer_up(&mut set, &board()), None);
    }
}
