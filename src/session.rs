//! Session lifecycle and orchestration
//!
//! `not_started -> playing -> {paused <-> playing} -> completed`, with
//! `reset` returning to `not_started` from anywhere. The session owns the
//! piece set exclusively; all mutation funnels through the placement
//! detector and scoring engine, and pointer input is gated on `Playing`.
//! Operations invoked from a state that does not permit them are silent
//! no-ops (logged at debug), since UI races are expected.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::assets::{ImageInfo, ImageLoader};
use crate::config::{Difficulty, PuzzleConfig};
use crate::consts::HINT_HIGHLIGHT_MS;
use crate::error::EngineError;
use crate::grid::{self, BoardLayout};
use crate::input::{PlacementDetector, PlacementOutcome};
use crate::piece::PieceSet;
use crate::scoring::{Clock, ScoringEngine, SessionStats};

/// Lifecycle state of one play-through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameState {
    #[default]
    NotStarted,
    Playing,
    Paused,
    /// Terminal until `reset`
    Completed,
}

/// Payload delivered to the completion callback — the sole durable
/// contract with any persistence layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionStats {
    pub session_id: String,
    pub score: u32,
    pub elapsed_ms: u64,
    pub moves: u32,
    pub hints: u32,
    pub difficulty: Difficulty,
}

/// Advisory lifecycle events for the host UI (toasts etc.); the engine
/// does not require them to be displayed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    Started,
    PiecePlaced { id: u32 },
    HintShown { id: u32 },
    Completed { score: u32 },
}

/// One-shot scheduled hint highlight, cleared cooperatively by `tick`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HintHighlight {
    pub piece_id: u32,
    /// Where the host should draw the highlight
    pub target_pos: Vec2,
    pub expires_at_ms: u64,
}

type CompletionCallback = Box<dyn FnMut(&CompletionStats)>;

/// The state machine and orchestrator for one puzzle play-through
pub struct PuzzleSession {
    config: PuzzleConfig,
    image: ImageInfo,
    board: BoardLayout,
    pieces: PieceSet,
    detector: PlacementDetector,
    scoring: ScoringEngine,
    state: GameState,
    rng: Pcg32,
    hint: Option<HintHighlight>,
    on_complete: Option<CompletionCallback>,
    completion_fired: bool,
    events: Vec<SessionEvent>,
}

impl std::fmt::Debug for PuzzleSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PuzzleSession")
            .field("state", &self.state)
            .field("pieces", &self.pieces.len())
            .field("placed", &self.pieces.placed_count())
            .finish_non_exhaustive()
    }
}

impl PuzzleSession {
    /// Decode the image, generate the piece set and enter `NotStarted`.
    /// A load or generation failure aborts with no partial state.
    pub fn initialize(
        config: PuzzleConfig,
        seed: u64,
        loader: &dyn ImageLoader,
        clock: Box<dyn Clock>,
        on_complete: impl FnMut(&CompletionStats) + 'static,
    ) -> Result<Self, EngineError> {
        let image = loader.load(&config.image_url)?;
        let board = BoardLayout::new(config.canvas_width, config.canvas_height, image);
        let mut rng = Pcg32::seed_from_u64(seed);
        let target = config.difficulty.target_piece_count();
        let pieces = grid::generate(image, target, &board, &mut rng)?;

        log::info!(
            "session {:?} initialized: {}x{} grid, {} pieces",
            config.session_id,
            pieces.rows,
            pieces.cols,
            pieces.len()
        );

        Ok(Self {
            config,
            image,
            board,
            pieces,
            detector: PlacementDetector::default(),
            scoring: ScoringEngine::new(clock),
            state: GameState::NotStarted,
            rng,
            hint: None,
            on_complete: Some(Box::new(on_complete)),
            completion_fired: false,
            events: Vec::new(),
        })
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    pub fn image(&self) -> ImageInfo {
        self.image
    }

    pub fn board(&self) -> &BoardLayout {
        &self.board
    }

    pub fn pieces(&self) -> &PieceSet {
        &self.pieces
    }

    pub fn stats(&self) -> SessionStats {
        self.scoring.stats()
    }

    pub fn hint_highlight(&self) -> Option<HintHighlight> {
        self.hint
    }

    /// Drain advisory events queued since the last call
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Begin play. Valid only from `NotStarted`.
    pub fn start(&mut self) {
        if self.state != GameState::NotStarted {
            log::debug!("start ignored in state {:?}", self.state);
            return;
        }
        self.scoring.start_timer();
        self.state = GameState::Playing;
        self.events.push(SessionEvent::Started);
        log::info!("session {:?} started", self.config.session_id);
    }

    /// Stop the timer without losing accumulated time
    pub fn pause(&mut self) {
        if self.state != GameState::Playing {
            log::debug!("pause ignored in state {:?}", self.state);
            return;
        }
        self.scoring.stop_timer();
        self.state = GameState::Paused;
    }

    /// Continue accumulating from the paused value
    pub fn resume(&mut self) {
        if self.state != GameState::Paused {
            log::debug!("resume ignored in state {:?}", self.state);
            return;
        }
        self.scoring.start_timer();
        self.state = GameState::Playing;
    }

    /// Discard piece and stat state and return to `NotStarted`. Correct
    /// positions are deterministic from the config; shuffle entropy is
    /// re-rolled. A failed regeneration leaves the previous piece set
    /// intact and reports the error.
    pub fn reset(&mut self) -> Result<(), EngineError> {
        let target = self.config.difficulty.target_piece_count();
        let fresh = grid::generate(self.image, target, &self.board, &mut self.rng)?;

        self.detector.clear(&mut self.pieces);
        self.pieces = fresh;
        self.scoring.reset();
        self.hint = None;
        self.completion_fired = false;
        self.state = GameState::NotStarted;
        self.events.clear();
        log::info!("session {:?} reset", self.config.session_id);
        Ok(())
    }

    /// Highlight the correct position of the lowest-id unplaced piece for
    /// a fixed duration. Valid only while `Playing`; a safe no-op when
    /// everything is already placed.
    pub fn hint(&mut self) -> Option<HintHighlight> {
        if self.state != GameState::Playing {
            log::debug!("hint ignored in state {:?}", self.state);
            return None;
        }
        let piece = self.pieces.first_unplaced()?;
        let highlight = HintHighlight {
            piece_id: piece.id,
            target_pos: piece.correct_pos,
            expires_at_ms: self.scoring.now_ms() + HINT_HIGHLIGHT_MS,
        };
        self.scoring.record_hint();
        self.hint = Some(highlight);
        self.events.push(SessionEvent::HintShown { id: highlight.piece_id });
        Some(highlight)
    }

    /// Cooperative per-frame upkeep: clears an expired hint highlight.
    /// Safe to call in any state.
    pub fn tick(&mut self) {
        if let Some(hint) = self.hint {
            if self.scoring.now_ms() >= hint.expires_at_ms {
                self.hint = None;
            }
        }
    }

    /// Pointer pressed. Ignored unless `Playing`.
    pub fn pointer_down(&mut self, pos: Vec2) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        self.detector.pointer_down(&mut self.pieces, pos)
    }

    /// Pointer moved. Ignored unless `Playing`.
    pub fn pointer_move(&mut self, pos: Vec2) {
        if self.state != GameState::Playing {
            return;
        }
        self.detector.pointer_move(&mut self.pieces, pos);
    }

    /// Pointer released: one move is recorded per outcome, and on a
    /// correct placement the completion check runs in the same call —
    /// no other placement can interleave.
    pub fn pointer_up(&mut self, pos: Vec2) -> Option<PlacementOutcome> {
        if self.state != GameState::Playing {
            return None;
        }
        self.detector.pointer_move(&mut self.pieces, pos);
        let dragged_id = self.pieces.pieces.iter().find(|p| p.dragging).map(|p| p.id);
        let outcome = self.detector.pointer_up(&mut self.pieces, &self.board)?;
        self.scoring.record_move();

        if outcome == PlacementOutcome::PlacedCorrect {
            if let Some(id) = dragged_id {
                self.events.push(SessionEvent::PiecePlaced { id });
            }
            if self.pieces.all_placed() {
                self.complete();
            }
        }
        Some(outcome)
    }

    /// Atomic completion: stop the timer, enter `Completed`, compute the
    /// score and fire the callback exactly once per play-through.
    fn complete(&mut self) {
        self.scoring.stop_timer();
        self.state = GameState::Completed;
        self.hint = None;

        let score = self
            .scoring
            .calculate_score(self.pieces.len() as u32, self.config.difficulty);
        let stats = self.scoring.stats();
        let payload = CompletionStats {
            session_id: self.config.session_id.clone(),
            score,
            elapsed_ms: stats.elapsed_ms,
            moves: stats.moves,
            hints: stats.hints,
            difficulty: self.config.difficulty,
        };
        self.events.push(SessionEvent::Completed { score });
        log::info!(
            "session {:?} completed: score {} ({} moves, {} hints, {} ms)",
            payload.session_id,
            payload.score,
            payload.moves,
            payload.hints,
            payload.elapsed_ms
        );

        if !self.completion_fired {
            self.completion_fired = true;
            if let Some(callback) = self.on_complete.as_mut() {
                callback(&payload);
            }
        }
    }
}
