//! Piece state and the live piece set
//!
//! Pieces are plain data owned exclusively by the session during play; the
//! render loop and host only ever read them. Iteration is stable by id,
//! stacking is tracked separately as a draw order.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::rect_contains;

/// One puzzle piece: fixed grid identity plus live placement state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Piece {
    /// Unique index, `row * cols + col`
    pub id: u32,
    /// Grid coordinates, fixed for the piece's lifetime
    pub row: u32,
    pub col: u32,
    /// Pixel dimensions, equal for all pieces of one puzzle
    pub size: Vec2,
    /// Target top-left position in canvas space, fixed at creation
    pub correct_pos: Vec2,
    /// Live top-left position, mutated by drag and snap resolution
    pub pos: Vec2,
    /// True only while a pointer interaction holds this piece
    pub dragging: bool,
    /// True once snapped to `correct_pos`; never reverts within a session
    pub placed: bool,
}

impl Piece {
    pub fn new(row: u32, col: u32, cols: u32, size: Vec2) -> Self {
        let correct_pos = Vec2::new(col as f32 * size.x, row as f32 * size.y);
        Self {
            id: row * cols + col,
            row,
            col,
            size,
            correct_pos,
            pos: correct_pos,
            dragging: false,
            placed: false,
        }
    }

    /// Center of the piece's current rect
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Distance from the current position to the correct position
    #[inline]
    pub fn distance_to_target(&self) -> f32 {
        self.pos.distance(self.correct_pos)
    }

    /// Hit test against the current rect
    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        rect_contains(self.pos, self.size, point)
    }

    /// Align to the correct position and mark placed
    pub fn snap_to_target(&mut self) {
        self.pos = self.correct_pos;
        self.placed = true;
    }
}

/// The full piece set for one puzzle, with stacking order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PieceSet {
    pub rows: u32,
    pub cols: u32,
    /// Pieces indexed by id (stable iteration order)
    pub pieces: Vec<Piece>,
    /// Indices into `pieces`, back = visually on top
    pub draw_order: Vec<usize>,
}

impl PieceSet {
    pub fn new(rows: u32, cols: u32, pieces: Vec<Piece>) -> Self {
        let draw_order = (0..pieces.len()).collect();
        Self {
            rows,
            cols,
            pieces,
            draw_order,
        }
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Topmost unplaced piece under the point, if any
    pub fn hit_test(&self, point: Vec2) -> Option<usize> {
        self.draw_order
            .iter()
            .rev()
            .copied()
            .find(|&idx| !self.pieces[idx].placed && self.pieces[idx].contains_point(point))
    }

    /// Raise a piece to the top of the stacking order
    pub fn raise_to_top(&mut self, idx: usize) {
        if let Some(pos) = self.draw_order.iter().position(|&i| i == idx) {
            self.draw_order.remove(pos);
            self.draw_order.push(idx);
        }
    }

    pub fn placed_count(&self) -> usize {
        self.pieces.iter().filter(|p| p.placed).count()
    }

    pub fn all_placed(&self) -> bool {
        self.pieces.iter().all(|p| p.placed)
    }

    /// Lowest-id unplaced piece (hint selection order)
    pub fn first_unplaced(&self) -> Option<&Piece> {
        self.pieces.iter().find(|p| !p.placed)
    }

    /// Completion progress in percent
    pub fn progress_percent(&self) -> f32 {
        if self.pieces.is_empty() {
            0.0
        } else {
            self.placed_count() as f32 / self.pieces.len() as f32 * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_set() -> PieceSet {
        let size = Vec2::new(10.0, 10.0);
        let pieces = (0..4)
            .map(|id| Piece::new(id / 2, id % 2, 2, size))
            .collect();
        PieceSet::new(2, 2, pieces)
    }

    #[test]
    fn test_ids_follow_row_major_layout() {
        let set = small_set();
        for piece in &set.pieces {
            assert_eq!(piece.id, piece.row * set.cols + piece.col);
            assert_eq!(
                piece.correct_pos,
                Vec2::new(piece.col as f32 * 10.0, piece.row as f32 * 10.0)
            );
        }
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut set = small_set();
        // Stack pieces 0 and 1 at the same spot; 1 drawn later
        set.pieces[0].pos = Vec2::new(50.0, 50.0);
        set.pieces[1].pos = Vec2::new(50.0, 50.0);
        assert_eq!(set.hit_test(Vec2::new(55.0, 55.0)), Some(1));

        set.raise_to_top(0);
        assert_eq!(set.hit_test(Vec2::new(55.0, 55.0)), Some(0));
    }

    #[test]
    fn test_hit_test_skips_placed() {
        let mut set = small_set();
        set.pieces[3].pos = Vec2::new(50.0, 50.0);
        set.pieces[3].placed = true;
        assert_eq!(set.hit_test(Vec2::new(55.0, 55.0)), None);
    }

    #[test]
    fn test_progress() {
        let mut set = small_set();
        assert_eq!(set.progress_percent(), 0.0);
        set.pieces[0].snap_to_target();
        set.pieces[2].snap_to_target();
        assert_eq!(set.progress_percent(), 50.0);
        assert_eq!(set.first_unplaced().map(|p| p.id), Some(1));
    }
}
