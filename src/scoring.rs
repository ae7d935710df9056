//! Timer, counters and the final score formula
//!
//! Elapsed time is measured by timestamp deltas through the [`Clock`] seam,
//! never by frame counting: pausing stops accumulation without resetting
//! it, resuming continues from the accumulated value. The score formula is
//! pure and reproducible from the stats alone.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::Difficulty;
use crate::consts::{HINT_PENALTY, TIME_PENALTY_INTERVAL_SECS};

/// Monotonic time source in milliseconds. Production hosts use
/// [`SystemClock`]; tests drive a manual clock.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// [`Instant`]-backed clock; origin is the moment of construction
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Counters and timing for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub elapsed_ms: u64,
    /// Drag-release events, regardless of outcome
    pub moves: u32,
    pub hints: u32,
    /// Timestamp of the running span's start (None while stopped)
    pub started_at_ms: Option<u64>,
    /// Time banked across previous spans (pause accumulation)
    pub paused_accumulated_ms: u64,
}

/// Owns the timer, move counter, hint counter and score formula.
/// Independent of geometry.
pub struct ScoringEngine {
    clock: Box<dyn Clock>,
    stats: SessionStats,
}

impl std::fmt::Debug for ScoringEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringEngine")
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl ScoringEngine {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self {
            clock,
            stats: SessionStats::default(),
        }
    }

    /// Begin (or resume) accumulating time. No-op while already running.
    pub fn start_timer(&mut self) {
        if self.stats.started_at_ms.is_none() {
            self.stats.started_at_ms = Some(self.clock.now_ms());
        }
    }

    /// Stop accumulating, banking the current span. No-op while stopped.
    pub fn stop_timer(&mut self) {
        if let Some(started) = self.stats.started_at_ms.take() {
            let now = self.clock.now_ms();
            self.stats.paused_accumulated_ms += now.saturating_sub(started);
        }
    }

    pub fn is_running(&self) -> bool {
        self.stats.started_at_ms.is_some()
    }

    /// Zero all counters and stop the timer
    pub fn reset(&mut self) {
        self.stats = SessionStats::default();
    }

    /// One drag-release event, successful or not
    pub fn record_move(&mut self) {
        self.stats.moves += 1;
    }

    pub fn record_hint(&mut self) {
        self.stats.hints += 1;
    }

    /// Wall-clock play time so far: banked spans plus the live span
    pub fn elapsed_ms(&self) -> u64 {
        let live = match self.stats.started_at_ms {
            Some(started) => self.clock.now_ms().saturating_sub(started),
            None => 0,
        };
        self.stats.paused_accumulated_ms + live
    }

    /// Current timestamp from the engine's clock
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Snapshot with `elapsed_ms` resolved
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            elapsed_ms: self.elapsed_ms(),
            ..self.stats
        }
    }

    /// Final score for the current stats. Deterministic: no RNG, no clock
    /// reads beyond the elapsed snapshot.
    pub fn calculate_score(&self, piece_count: u32, difficulty: Difficulty) -> u32 {
        score_for(piece_count, difficulty, self.elapsed_ms(), self.stats.hints)
    }
}

/// `max(0, round(pieces * multiplier - floor(secs/10) - hints * 5))`
pub fn score_for(piece_count: u32, difficulty: Difficulty, elapsed_ms: u64, hints: u32) -> u32 {
    let base = piece_count as f32 * difficulty.multiplier();
    let time_penalty = (elapsed_ms / 1000 / TIME_PENALTY_INTERVAL_SECS) as f32;
    let hint_penalty = hints as f32 * HINT_PENALTY;
    (base - time_penalty - hint_penalty).round().max(0.0) as u32
}

#[cfg(test)]
pub(crate) mod test_clock {
    use super::Clock;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Hand-cranked clock shared between test and engine
    #[derive(Clone, Default)]
    pub struct ManualClock(Rc<Cell<u64>>);

    impl ManualClock {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn advance(&self, ms: u64) {
            self.0.set(self.0.get() + ms);
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> u64 {
            self.0.get()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_clock::ManualClock;
    use super::*;

    fn engine() -> (ScoringEngine, ManualClock) {
        let clock = ManualClock::new();
        (ScoringEngine::new(Box::new(clock.clone())), clock)
    }

    #[test]
    fn test_timer_accumulates_across_pause() {
        let (mut engine, clock) = engine();
        engine.start_timer();
        clock.advance(3_000);
        engine.stop_timer();
        assert_eq!(engine.elapsed_ms(), 3_000);

        // Paused time does not accumulate
        clock.advance(10_000);
        assert_eq!(engine.elapsed_ms(), 3_000);

        engine.start_timer();
        clock.advance(2_500);
        assert_eq!(engine.elapsed_ms(), 5_500);
    }

    #[test]
    fn test_redundant_start_stop_are_noops() {
        let (mut engine, clock) = engine();
        engine.start_timer();
        clock.advance(1_000);
        engine.start_timer(); // must not restart the span
        clock.advance(1_000);
        assert_eq!(engine.elapsed_ms(), 2_000);

        engine.stop_timer();
        engine.stop_timer();
        assert_eq!(engine.elapsed_ms(), 2_000);
    }

    #[test]
    fn test_counters() {
        let (mut engine, _clock) = engine();
        for _ in 0..10 {
            engine.record_move();
        }
        engine.record_hint();
        let stats = engine.stats();
        assert_eq!(stats.moves, 10);
        assert_eq!(stats.hints, 1);
    }

    #[test]
    fn test_reset_zeroes_everything() {
        let (mut engine, clock) = engine();
        engine.start_timer();
        clock.advance(9_000);
        engine.record_move();
        engine.record_hint();
        engine.reset();

        let stats = engine.stats();
        assert_eq!(stats.elapsed_ms, 0);
        assert_eq!(stats.moves, 0);
        assert_eq!(stats.hints, 0);
        assert!(!engine.is_running());
    }

    #[test]
    fn test_score_formula() {
        // 8 pieces easy, 35s elapsed, 1 hint:
        // 8 * 1.0 - floor(35/10) - 5 = 0 -> score 0
        assert_eq!(score_for(8, Difficulty::Easy, 35_000, 1), 0);
        // 64 medium, 95s, 2 hints: 96 - 9 - 10 = 77
        assert_eq!(score_for(64, Difficulty::Medium, 95_000, 2), 77);
        // Never negative
        assert_eq!(score_for(8, Difficulty::Easy, 600_000, 10), 0);
    }

    #[test]
    fn test_eight_piece_target_scores_from_base_multiplier() {
        // An explicit 8-piece target uses multiplier 1.0:
        // round(8 * 1 - 0 - 5) = 3
        let difficulty = Difficulty::pieces(8).unwrap();
        assert_eq!(score_for(8, difficulty, 0, 1), 3);
        // And with no hint, the full base survives
        assert_eq!(score_for(8, difficulty, 0, 0), 8);
    }

    #[test]
    fn test_score_is_deterministic_from_stats() {
        for _ in 0..3 {
            assert_eq!(
                score_for(256, Difficulty::Hard, 123_456, 3),
                score_for(256, Difficulty::Hard, 123_456, 3)
            );
        }
    }

    #[test]
    fn test_engine_score_matches_pure_formula() {
        let (mut engine, clock) = engine();
        engine.start_timer();
        clock.advance(42_000);
        engine.record_hint();
        engine.stop_timer();

        assert_eq!(
            engine.calculate_score(16, Difficulty::Easy),
            score_for(16, Difficulty::Easy, 42_000, 1)
        );
    }
}
