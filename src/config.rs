//! Puzzle configuration
//!
//! Difficulty is a closed enum, not a loosely-typed string: named levels
//! carry fixed targets and multipliers, explicit counts must come from the
//! supported menu.

use serde::{Deserialize, Serialize};

use crate::consts::PIECE_COUNT_CHOICES;

/// A piece-count target validated against [`PIECE_COUNT_CHOICES`].
/// Off-menu counts cannot be constructed, in code or via serde.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PieceCount(u32);

impl PieceCount {
    pub fn new(count: u32) -> Option<Self> {
        PIECE_COUNT_CHOICES.contains(&count).then_some(Self(count))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for PieceCount {
    type Error = String;

    fn try_from(count: u32) -> Result<Self, Self::Error> {
        Self::new(count).ok_or_else(|| format!("{count} is not a supported piece count"))
    }
}

impl From<PieceCount> for u32 {
    fn from(count: PieceCount) -> Self {
        count.0
    }
}

/// Difficulty setting controlling target piece count and score multiplier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    /// Explicit validated target
    Pieces(PieceCount),
}

impl Difficulty {
    /// Explicit piece-count difficulty; `None` when the count is off-menu
    pub fn pieces(count: u32) -> Option<Self> {
        PieceCount::new(count).map(Difficulty::Pieces)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Pieces(_) => "custom",
        }
    }

    /// Parse a named level or an explicit count from the supported menu
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            other => Difficulty::pieces(other.parse().ok()?),
        }
    }

    /// Target piece count for grid generation
    pub fn target_piece_count(&self) -> u32 {
        match self {
            Difficulty::Easy => 16,
            Difficulty::Medium => 64,
            Difficulty::Hard => 256,
            Difficulty::Pieces(count) => count.get(),
        }
    }

    /// Score base multiplier. Named levels are fixed; explicit counts sit
    /// on the same curve (doubling the target adds 0.25): 16 -> 1.0,
    /// 64 -> 1.5, 256 -> 2.0. Targets at or below 16 stay at the base
    /// multiplier 1.0, so an 8-piece puzzle scores from a base of 8 * 1.
    pub fn multiplier(&self) -> f32 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 1.5,
            Difficulty::Hard => 2.0,
            Difficulty::Pieces(count) => {
                let count = count.get() as f32;
                (1.0 + 0.25 * (count / 16.0).log2()).clamp(1.0, 2.25)
            }
        }
    }
}

/// Immutable per-session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleConfig {
    /// Must resolve to a decodable raster image via the host's loader
    pub image_url: String,
    pub difficulty: Difficulty,
    /// Playing surface dimensions in canvas pixels
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Opaque host tracking id, passed through untouched
    pub session_id: String,
}

impl PuzzleConfig {
    pub fn new(image_url: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            image_url: image_url.into(),
            difficulty,
            canvas_width: 1280.0,
            canvas_height: 720.0,
            session_id: String::new(),
        }
    }

    pub fn with_canvas(mut self, width: f32, height: f32) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    pub fn with_session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = id.into();
        self
    }
}
