//! Cursor-based playback over a finished trace.
//!
//! The controller never reads the clock. Entering `Playing` hands back a
//! [`ScheduledTick`] with the delay the driver should wait; the driver then
//! calls [`PlaybackController::tick`] with that tick's token. Every exit from
//! `Playing` and every trace replacement bumps the generation, so a token
//! issued earlier can never move the cursor again.

use serde::{Deserialize, Serialize};

use std::time::Duration;

use crate::{Step, StepwiseError, StepwiseResult, Trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackStatus {
    Paused,
    Playing,
}

impl std::fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Paused => f.write_str("paused"),
            Self::Playing => f.write_str("playing"),
        }
    }
}

/// Playback rate in quarter steps from 0.25x to 2x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Speed {
    quarters: u8,
}

impl Speed {
    pub const MIN: Speed = Speed { quarters: 1 };
    pub const NORMAL: Speed = Speed { quarters: 4 };
    pub const MAX: Speed = Speed { quarters: 8 };

    pub fn new(multiplier: f64) -> StepwiseResult<Self> {
        let quarters = multiplier * 4.0;
        let rounded = quarters.round();
        if !multiplier.is_finite()
            || (quarters - rounded).abs() > 1e-9
            || rounded < f64::from(Self::MIN.quarters)
            || rounded > f64::from(Self::MAX.quarters)
        {
            return Err(StepwiseError::InvalidSpeed(format!(
                "{multiplier} (expected 0.25 to 2.0 in steps of 0.25)"
            )));
        }
        Ok(Self {
            quarters: rounded as u8,
        })
    }

    pub fn multiplier(self) -> f64 {
        f64::from(self.quarters) / 4.0
    }

    pub fn faster(self) -> Self {
        Self {
            quarters: (self.quarters + 1).min(Self::MAX.quarters),
        }
    }

    pub fn slower(self) -> Self {
        Self {
            quarters: self.quarters.saturating_sub(1).max(Self::MIN.quarters),
        }
    }

    /// `base / multiplier`, computed exactly on the quarter grid.
    pub fn scale(self, base: Duration) -> Duration {
        base * 4 / u32::from(self.quarters)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl TryFrom<f64> for Speed {
    type Error = StepwiseError;

    fn try_from(value: f64) -> StepwiseResult<Self> {
        Self::new(value)
    }
}

impl From<Speed> for f64 {
    fn from(speed: Speed) -> f64 {
        speed.multiplier()
    }
}

impl std::fmt::Display for Speed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x", self.multiplier())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken {
    generation: u64,
}

impl TickToken {
    pub fn generation(self) -> u64 {
        self.generation
    }
}

/// The single outstanding timer request of a playing controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTick {
    pub token: TickToken,
    pub delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Cursor moved and the next tick is already scheduled.
    Advanced { cursor: usize, next: ScheduledTick },
    /// Playback reached the last step and paused itself.
    Finished { cursor: usize },
    /// The token was cancelled or superseded; nothing changed.
    Stale,
}

#[derive(Debug, Clone)]
pub struct PlaybackController<T> {
    trace: Trace<T>,
    cursor: usize,
    status: PlaybackStatus,
    speed: Speed,
    base_interval: Duration,
    generation: u64,
    pending: Option<ScheduledTick>,
}

impl<T> PlaybackController<T> {
    pub fn new(trace: Trace<T>, base_interval: Duration) -> Self {
        Self {
            trace,
            cursor: 0,
            status: PlaybackStatus::Paused,
            speed: Speed::NORMAL,
            base_interval,
            generation: 0,
            pending: None,
        }
    }

    pub fn with_speed(mut self, speed: Speed) -> Self {
        self.speed = speed;
        self
    }

    pub fn trace(&self) -> &Trace<T> {
        &self.trace
    }

    pub fn current(&self) -> &Step<T> {
        // The cursor is kept inside the trace by every mutator.
        &self.trace.steps()[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.trace.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trace.is_empty()
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn base_interval(&self) -> Duration {
        self.base_interval
    }

    /// Delay between ticks at the current speed.
    pub fn interval(&self) -> Duration {
        self.speed.scale(self.base_interval)
    }

    pub fn can_step_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_step_forward(&self) -> bool {
        self.cursor < self.trace.last_index()
    }

    pub fn pending(&self) -> Option<ScheduledTick> {
        self.pending
    }

    /// Starts playback. Returns the tick the driver must wait for, or `None`
    /// when already on the last step.
    pub fn play(&mut self) -> Option<ScheduledTick> {
        if self.is_playing() {
            return self.pending;
        }
        if !self.can_step_forward() {
            return None;
        }
        self.status = PlaybackStatus::Playing;
        let tick = self.schedule();
        tracing::trace!(cursor = self.cursor, delay_ms = tick.delay.as_millis() as u64, "play");
        Some(tick)
    }

    pub fn pause(&mut self) {
        if self.is_playing() {
            tracing::trace!(cursor = self.cursor, "pause");
        }
        self.status = PlaybackStatus::Paused;
        self.cancel();
    }

    pub fn step_forward(&mut self) -> bool {
        if !self.can_step_forward() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn step_back(&mut self) -> bool {
        if !self.can_step_back() {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Jumps to `index`. Out-of-range requests are ignored.
    pub fn seek(&mut self, index: usize) -> bool {
        if index >= self.trace.len() {
            return false;
        }
        self.cursor = index;
        true
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.status = PlaybackStatus::Paused;
        self.cancel();
    }

    /// Applies to the next scheduled tick; an already pending tick keeps
    /// its delay.
    pub fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
    }

    /// Swaps in a new trace: cursor 0, paused, pending tick cancelled.
    /// Speed and base interval carry over.
    pub fn replace(&mut self, trace: Trace<T>) {
        self.trace = trace;
        self.reset();
    }

    pub fn set_base_interval(&mut self, base_interval: Duration) {
        self.base_interval = base_interval;
    }

    pub fn tick(&mut self, token: TickToken) -> TickOutcome {
        match self.pending {
            Some(pending) if pending.token == token && self.is_playing() => {}
            _ => {
                tracing::trace!(generation = token.generation, "stale tick ignored");
                return TickOutcome::Stale;
            }
        }
        self.pending = None;

        if self.can_step_forward() {
            self.cursor += 1;
        }
        if self.can_step_forward() {
            let next = self.schedule();
            tracing::trace!(cursor = self.cursor, "tick");
            TickOutcome::Advanced {
                cursor: self.cursor,
                next,
            }
        } else {
            self.status = PlaybackStatus::Paused;
            self.generation += 1;
            tracing::trace!(cursor = self.cursor, "tick reached the last step");
            TickOutcome::Finished {
                cursor: self.cursor,
            }
        }
    }

    fn schedule(&mut self) -> ScheduledTick {
        self.generation += 1;
        let tick = ScheduledTick {
            token: TickToken {
                generation: self.generation,
            },
            delay: self.interval(),
        };
        self.pending = Some(tick);
        tick
    }

    fn cancel(&mut self) {
        self.pending = None;
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StepKind;

    fn trace(len: usize) -> Trace<usize> {
        let steps = (0..len)
            .map(|i| {
                let kind = if i + 1 == len { StepKind::Done } else { StepKind::Moving };
                Step::new(kind, format!("step {i}"), i)
            })
            .collect::<Vec<_>>();
        Trace::try_from(steps).expect("non-empty")
    }

    fn controller(len: usize) -> PlaybackController<usize> {
        PlaybackController::new(trace(len), Duration::from_millis(1000))
    }

    fn expect_advanced(outcome: TickOutcome) -> ScheduledTick {
        match outcome {
            TickOutcome::Advanced { next, .. } => next,
            other => panic!("expected advance, got {other:?}"),
        }
    }

    #[test]
    fn starts_paused_at_zero() {
        let ctl = controller(3);
        assert_eq!(ctl.cursor(), 0);
        assert_eq!(ctl.status(), PlaybackStatus::Paused);
        assert!(!ctl.can_step_back());
        assert!(ctl.can_step_forward());
        assert!(ctl.pending().is_none());
        assert_eq!(ctl.current().state, 0);
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut ctl = controller(3);
        assert!(!ctl.step_back());
        assert!(ctl.step_forward());
        assert!(ctl.step_forward());
        assert!(!ctl.step_forward());
        assert_eq!(ctl.cursor(), 2);
        assert!(!ctl.seek(3));
        assert_eq!(ctl.cursor(), 2);
        assert!(ctl.seek(0));
        assert!(!ctl.step_back());
        assert_eq!(ctl.cursor(), 0);
    }

    #[test]
    fn stepping_does_not_change_play_state() {
        let mut ctl = controller(5);
        ctl.play().expect("tick");
        assert!(ctl.step_forward());
        assert!(ctl.step_back());
        assert!(ctl.is_playing());
        ctl.pause();
        assert!(ctl.step_forward());
        assert_eq!(ctl.status(), PlaybackStatus::Paused);
    }

    #[test]
    fn play_pause_reset_round_trip() {
        let mut ctl = controller(4);
        let tick = ctl.play().expect("tick");
        expect_advanced(ctl.tick(tick.token));
        ctl.pause();
        assert_eq!(ctl.cursor(), 1);
        assert!(ctl.pending().is_none());
        ctl.play().expect("resume");
        ctl.reset();
        assert_eq!(ctl.cursor(), 0);
        assert_eq!(ctl.status(), PlaybackStatus::Paused);
        assert!(ctl.pending().is_none());
    }

    #[test]
    fn play_on_last_step_is_noop() {
        let mut ctl = controller(2);
        ctl.seek(1);
        assert!(ctl.play().is_none());
        assert_eq!(ctl.status(), PlaybackStatus::Paused);

        let mut single = controller(1);
        assert!(single.play().is_none());
        assert!(!single.can_step_forward());
        assert!(!single.can_step_back());
    }

    #[test]
    fn play_while_playing_keeps_the_pending_tick() {
        let mut ctl = controller(4);
        let first = ctl.play().expect("tick");
        let again = ctl.play().expect("still pending");
        assert_eq!(first, again);
    }

    #[test]
    fn auto_stops_paused_on_last_step() {
        let mut ctl = controller(3);
        let tick = ctl.play().expect("tick");
        let next = expect_advanced(ctl.tick(tick.token));
        assert_eq!(ctl.tick(next.token), TickOutcome::Finished { cursor: 2 });
        assert_eq!(ctl.status(), PlaybackStatus::Paused);
        assert!(ctl.pending().is_none());
        assert_eq!(ctl.tick(next.token), TickOutcome::Stale);
        assert_eq!(ctl.cursor(), 2);
    }

    #[test]
    fn plays_to_the_end_from_every_cursor() {
        let len = 6;
        for start in 0..len {
            let mut ctl = controller(len);
            assert!(ctl.seek(start));
            let mut pending = ctl.play();
            let mut ticks = 0;
            while let Some(tick) = pending {
                ticks += 1;
                pending = match ctl.tick(tick.token) {
                    TickOutcome::Advanced { cursor, next } => {
                        assert_eq!(cursor, start + ticks);
                        Some(next)
                    }
                    TickOutcome::Finished { cursor } => {
                        assert_eq!(cursor, len - 1);
                        None
                    }
                    TickOutcome::Stale => panic!("live tick reported stale from {start}"),
                };
            }
            assert_eq!(ticks, len - 1 - start, "from {start}");
            assert_eq!(ctl.cursor(), len - 1);
            assert_eq!(ctl.status(), PlaybackStatus::Paused);
            assert!(ctl.pending().is_none());
        }
    }

    #[test]
    fn stale_tokens_never_move_the_cursor() {
        let mut ctl = controller(6);
        let old = ctl.play().expect("tick");
        ctl.pause();
        assert_eq!(ctl.tick(old.token), TickOutcome::Stale);
        assert_eq!(ctl.cursor(), 0);

        let fresh = ctl.play().expect("tick");
        assert_ne!(fresh.token, old.token);
        assert_eq!(ctl.tick(old.token), TickOutcome::Stale);
        expect_advanced(ctl.tick(fresh.token));
        assert_eq!(ctl.cursor(), 1);
    }

    #[test]
    fn replacement_cancels_old_ticks_and_keeps_speed() {
        let mut ctl = controller(5);
        ctl.set_speed(Speed::new(2.0).expect("speed"));
        let tick = ctl.play().expect("tick");
        let next = expect_advanced(ctl.tick(tick.token));

        ctl.replace(trace(7));
        assert_eq!(ctl.cursor(), 0);
        assert_eq!(ctl.len(), 7);
        assert_eq!(ctl.status(), PlaybackStatus::Paused);
        assert_eq!(ctl.speed(), Speed::MAX);
        assert_eq!(ctl.tick(next.token), TickOutcome::Stale);
        assert_eq!(ctl.cursor(), 0);
    }

    #[test]
    fn speed_changes_apply_to_the_next_schedule() {
        let mut ctl = controller(5);
        let tick = ctl.play().expect("tick");
        assert_eq!(tick.delay, Duration::from_millis(1000));
        ctl.set_speed(Speed::new(0.5).expect("speed"));
        assert_eq!(ctl.pending().expect("pending").delay, Duration::from_millis(1000));
        let next = expect_advanced(ctl.tick(tick.token));
        assert_eq!(next.delay, Duration::from_millis(2000));
    }

    #[test]
    fn tick_after_manual_jump_to_end_finishes_without_overshoot() {
        let mut ctl = controller(4);
        let tick = ctl.play().expect("tick");
        ctl.seek(3);
        assert_eq!(ctl.tick(tick.token), TickOutcome::Finished { cursor: 3 });
        assert_eq!(ctl.status(), PlaybackStatus::Paused);
    }

    #[test]
    fn speed_grid() {
        assert_eq!(Speed::new(0.25).expect("min"), Speed::MIN);
        assert_eq!(Speed::new(1.0).expect("normal"), Speed::default());
        assert!(Speed::new(0.3).is_err());
        assert!(Speed::new(0.0).is_err());
        assert!(Speed::new(2.25).is_err());
        assert!(Speed::new(f64::NAN).is_err());
        assert_eq!(Speed::MAX.faster(), Speed::MAX);
        assert_eq!(Speed::MIN.slower(), Speed::MIN);
        assert_eq!(Speed::NORMAL.faster().to_string(), "1.25x");
        assert_eq!(
            Speed::new(0.75).expect("speed").scale(Duration::from_millis(900)),
            Duration::from_millis(1200)
        );
        let json = serde_json::to_string(&Speed::new(1.5).expect("speed")).expect("encode");
        assert_eq!(json, "1.5");
        assert!(serde_json::from_str::<Speed>("3.0").is_err());
    }
}
