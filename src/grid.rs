//! Grid derivation and piece generation
//!
//! Turns a requested piece-count target plus image dimensions into a grid
//! that tiles the image exactly, then scatters pieces over the free board
//! area with a seeded RNG. Scatter is reject-and-resample with a bounded
//! retry budget and a deterministic packed fallback, so generation never
//! fails once the grid itself is valid.

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::assets::ImageInfo;
use crate::consts::{GRID_ASPECT_TOLERANCE, SCATTER_MARGIN, SCATTER_MAX_ATTEMPTS};
use crate::error::EngineError;
use crate::piece::{Piece, PieceSet};
use crate::rects_overlap;

/// The playing surface: canvas dimensions plus the staging rect reserved
/// for the assembled image outline (scatter exclusion zone)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoardLayout {
    pub size: Vec2,
    pub frame_pos: Vec2,
    pub frame_size: Vec2,
}

impl BoardLayout {
    /// Frame at the board origin, sized to the source image
    pub fn new(canvas_width: f32, canvas_height: f32, image: ImageInfo) -> Self {
        Self {
            size: Vec2::new(canvas_width, canvas_height),
            frame_pos: Vec2::ZERO,
            frame_size: Vec2::new(image.width as f32, image.height as f32),
        }
    }
}

/// Choose `(rows, cols)` so the product lands as close as possible to
/// `target` while `cols/rows` stays within the aspect tolerance of the
/// image ratio. Ties prefer the squarer grid. When no candidate survives
/// the aspect filter (extreme ratios), the filter is relaxed so selection
/// still succeeds.
pub fn choose_grid(image: ImageInfo, target: u32) -> (u32, u32) {
    let target = target.max(1);
    let aspect = image.aspect().max(f32::MIN_POSITIVE);

    let mut best: Option<(u32, u32, u32, u32)> = None; // (rows, cols, count_diff, squareness)
    let mut relaxed: Option<(u32, u32, f32)> = None; // fallback: score by aspect error

    for rows in 1..=target {
        for cols in 1..=target {
            let count_diff = (rows * cols).abs_diff(target);
            let ratio = cols as f32 / rows as f32;
            let aspect_err = (ratio / aspect - 1.0).abs();
            let squareness = rows.abs_diff(cols);

            if aspect_err <= GRID_ASPECT_TOLERANCE {
                let candidate = (rows, cols, count_diff, squareness);
                let better = match best {
                    None => true,
                    Some((_, _, bd, bs)) => {
                        count_diff < bd || (count_diff == bd && squareness < bs)
                    }
                };
                if better {
                    best = Some(candidate);
                }
            }

            // Track the best count match overall in case the filter rejects everything
            let relaxed_better = match relaxed {
                None => true,
                Some((br, bc, be)) => {
                    let bd = (br * bc).abs_diff(target);
                    count_diff < bd || (count_diff == bd && aspect_err < be)
                }
            };
            if relaxed_better {
                relaxed = Some((rows, cols, aspect_err));
            }
        }
    }

    if let Some((rows, cols, _, _)) = best {
        (rows, cols)
    } else {
        let (rows, cols, _) = relaxed.expect("target >= 1 always yields a candidate");
        log::debug!("no grid within aspect tolerance, relaxed to {rows}x{cols}");
        (rows, cols)
    }
}

/// Generate the full piece set: correct positions tile the image exactly,
/// initial positions are scattered without overlap outside the frame rect,
/// and the draw order is shuffled.
pub fn generate(
    image: ImageInfo,
    target: u32,
    board: &BoardLayout,
    rng: &mut Pcg32,
) -> Result<PieceSet, EngineError> {
    let (rows, cols) = choose_grid(image, target);

    // Degenerate grid: sub-pixel pieces
    if image.width < cols || image.height < rows {
        return Err(EngineError::InvalidImage {
            width: image.width,
            height: image.height,
            rows,
            cols,
        });
    }

    let piece_size = Vec2::new(
        image.width as f32 / cols as f32,
        image.height as f32 / rows as f32,
    );

    let mut pieces = Vec::with_capacity((rows * cols) as usize);
    for row in 0..rows {
        for col in 0..cols {
            pieces.push(Piece::new(row, col, cols, piece_size));
        }
    }

    scatter(&mut pieces, board, rng);

    let mut set = PieceSet::new(rows, cols, pieces);
    set.draw_order.shuffle(rng);
    Ok(set)
}

/// Place pieces at random non-overlapping positions, avoiding the frame
/// rect. Falls back to a packed layout when the retry budget runs out.
fn scatter(pieces: &mut [Piece], board: &BoardLayout, rng: &mut Pcg32) {
    let mut placed: Vec<(Vec2, Vec2)> = Vec::with_capacity(pieces.len());

    for idx in 0..pieces.len() {
        let size = pieces[idx].size;
        let max_x = (board.size.x - size.x - SCATTER_MARGIN).max(SCATTER_MARGIN);
        let max_y = (board.size.y - size.y - SCATTER_MARGIN).max(SCATTER_MARGIN);

        let mut found = None;
        for _ in 0..SCATTER_MAX_ATTEMPTS {
            let pos = Vec2::new(
                rng.random_range(SCATTER_MARGIN..=max_x),
                rng.random_range(SCATTER_MARGIN..=max_y),
            );
            if rects_overlap(pos, size, board.frame_pos, board.frame_size) {
                continue;
            }
            if placed
                .iter()
                .any(|&(other_pos, other_size)| rects_overlap(pos, size, other_pos, other_size))
            {
                continue;
            }
            found = Some(pos);
            break;
        }

        match found {
            Some(pos) => {
                pieces[idx].pos = pos;
                placed.push((pos, size));
            }
            None => {
                log::warn!(
                    "scatter retries exhausted at piece {}, using packed layout",
                    pieces[idx].id
                );
                packed_layout(pieces, board);
                return;
            }
        }
    }
}

/// Deterministic shelf packing, row-major across the board. Ignores the
/// frame exclusion; guaranteed success beats aesthetics here.
fn packed_layout(pieces: &mut [Piece], board: &BoardLayout) {
    let gap = SCATTER_MARGIN;
    let mut cursor = Vec2::new(gap, gap);
    let mut shelf_height = 0.0f32;

    for piece in pieces.iter_mut() {
        if cursor.x + piece.size.x + gap > board.size.x && cursor.x > gap {
            cursor.x = gap;
            cursor.y += shelf_height + gap;
            shelf_height = 0.0;
        }
        piece.pos = cursor;
        cursor.x += piece.size.x + gap;
        shelf_height = shelf_height.max(piece.size.y);
    }
}
