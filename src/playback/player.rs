//! Timer drivers for [`PlaybackController`].
//!
//! A [`Player`] owns exactly one armed timer slot. After each command the
//! caller syncs the slot with the controller's pending tick; the timer is
//! re-armed only after a tick has been applied, so ticks never overlap.

use std::time::{Duration, Instant};

use crate::{PlaybackController, Step, TickOutcome, TickToken, TimelineEntry};

pub trait Clock {
    /// Time elapsed since the clock was created.
    fn now(&self) -> Duration;
    fn sleep(&mut self, by: Duration);
}

/// Deterministic clock: `sleep` moves time forward instantly.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now: Duration,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, by: Duration) {
        self.now += by;
    }
}

#[derive(Debug, Clone)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    fn sleep(&mut self, by: Duration) {
        std::thread::sleep(by);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Armed {
    token: TickToken,
    due: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackRun {
    pub ticks: usize,
    #[serde(rename = "elapsedMs", serialize_with = "serialize_ms")]
    pub elapsed: Duration,
    pub final_cursor: usize,
}

fn serialize_ms<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

#[derive(Debug)]
pub struct Player<C> {
    clock: C,
    armed: Option<Armed>,
    timeline: Option<Vec<TimelineEntry>>,
}

impl<C: Clock> Player<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            armed: None,
            timeline: None,
        }
    }

    /// Records every displayed step into a timeline.
    pub fn with_timeline(mut self) -> Self {
        self.timeline = Some(Vec::new());
        self
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn take_timeline(&mut self) -> Vec<TimelineEntry> {
        self.timeline.as_mut().map(std::mem::take).unwrap_or_default()
    }

    /// Matches the armed slot to the controller's pending tick. A tick that
    /// is already armed keeps its due time; anything else is dropped.
    pub fn sync<T>(&mut self, ctl: &PlaybackController<T>) {
        self.armed = match (ctl.pending(), self.armed) {
            (Some(pending), Some(armed)) if armed.token == pending.token => Some(armed),
            (Some(pending), _) => Some(Armed {
                token: pending.token,
                due: self.clock.now() + pending.delay,
            }),
            (None, _) => None,
        };
    }

    /// Appends the step currently under the cursor to the timeline.
    pub fn mark<T>(&mut self, ctl: &PlaybackController<T>) {
        let now = self.clock.now();
        if let Some(timeline) = self.timeline.as_mut() {
            let step = ctl.current();
            timeline.push(TimelineEntry {
                index: timeline.len(),
                cursor: ctl.cursor(),
                time_ms: now.as_millis() as u64,
                kind: step.kind,
                description: step.description.clone(),
            });
        }
    }

    /// Lets `by` of clock time pass, firing every tick that falls due.
    /// Returns the number of ticks that moved the cursor.
    pub fn advance<T>(
        &mut self,
        ctl: &mut PlaybackController<T>,
        by: Duration,
        mut on_step: impl FnMut(usize, &Step<T>),
    ) -> usize {
        let target = self.clock.now() + by;
        let mut moved = 0;
        loop {
            self.sync(ctl);
            let Some(armed) = self.armed.filter(|a| a.due <= target) else {
                break;
            };
            self.wait_until(armed.due);
            if self.fire(ctl, armed.token, &mut on_step) {
                moved += 1;
            }
        }
        self.wait_until(target);
        moved
    }

    /// Starts playback if needed and drives ticks until the controller
    /// pauses itself on the last step.
    pub fn run_to_end<T>(
        &mut self,
        ctl: &mut PlaybackController<T>,
        mut on_step: impl FnMut(usize, &Step<T>),
    ) -> PlaybackRun {
        let started = self.clock.now();
        self.mark(ctl);
        on_step(ctl.cursor(), ctl.current());
        ctl.play();

        let mut ticks = 0;
        loop {
            self.sync(ctl);
            let Some(armed) = self.armed else {
                break;
            };
            self.wait_until(armed.due);
            if self.fire(ctl, armed.token, &mut on_step) {
                ticks += 1;
            }
        }

        let run = PlaybackRun {
            ticks,
            elapsed: self.clock.now().saturating_sub(started),
            final_cursor: ctl.cursor(),
        };
        tracing::debug!(ticks = run.ticks, cursor = run.final_cursor, "playback finished");
        run
    }

    fn wait_until(&mut self, due: Duration) {
        let now = self.clock.now();
        if due > now {
            self.clock.sleep(due - now);
        }
    }

    fn fire<T>(
        &mut self,
        ctl: &mut PlaybackController<T>,
        token: TickToken,
        on_step: &mut impl FnMut(usize, &Step<T>),
    ) -> bool {
        self.armed = None;
        let before = ctl.cursor();
        let cursor = match ctl.tick(token) {
            TickOutcome::Advanced { cursor, .. } | TickOutcome::Finished { cursor } => cursor,
            TickOutcome::Stale => return false,
        };
        if cursor == before {
            return false;
        }
        self.mark(ctl);
        on_step(cursor, ctl.current());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PlaybackStatus, Speed, StepKind, Trace};

    fn controller(len: usize, base_ms: u64) -> PlaybackController<usize> {
        let steps = (0..len)
            .map(|i| Step::new(StepKind::Checking, format!("step {i}"), i))
            .collect::<Vec<_>>();
        PlaybackController::new(
            Trace::try_from(steps).expect("trace"),
            Duration::from_millis(base_ms),
        )
    }

    #[test]
    fn run_to_end_visits_every_step_once() {
        let mut ctl = controller(5, 500);
        let mut player = Player::new(VirtualClock::new()).with_timeline();
        let mut seen = Vec::new();
        let run = player.run_to_end(&mut ctl, |i, step| seen.push((i, step.state)));
        assert_eq!(seen, vec![(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)]);
        assert_eq!(run.ticks, 4);
        assert_eq!(run.elapsed, Duration::from_millis(2000));
        assert_eq!(run.final_cursor, 4);
        assert_eq!(ctl.status(), PlaybackStatus::Paused);

        let timeline = player.take_timeline();
        let times: Vec<u64> = timeline.iter().map(|e| e.time_ms).collect();
        assert_eq!(times, vec![0, 500, 1000, 1500, 2000]);
    }

    #[test]
    fn speed_scales_virtual_elapsed_time() {
        let mut ctl = controller(3, 1000).with_speed(Speed::new(2.0).expect("speed"));
        let run = Player::new(VirtualClock::new()).run_to_end(&mut ctl, |_, _| {});
        assert_eq!(run.elapsed, Duration::from_millis(1000));
    }

    #[test]
    fn advance_fires_only_due_ticks() {
        let mut ctl = controller(10, 1000);
        let mut player = Player::new(VirtualClock::new());
        ctl.play();
        assert_eq!(player.advance(&mut ctl, Duration::from_millis(999), |_, _| {}), 0);
        assert_eq!(ctl.cursor(), 0);
        assert_eq!(player.advance(&mut ctl, Duration::from_millis(1), |_, _| {}), 1);
        assert_eq!(ctl.cursor(), 1);
        assert_eq!(player.advance(&mut ctl, Duration::from_millis(2500), |_, _| {}), 2);
        assert_eq!(ctl.cursor(), 3);
        assert_eq!(player.now(), Duration::from_millis(3500));
    }

    #[test]
    fn paused_controller_ignores_elapsed_time() {
        let mut ctl = controller(4, 100);
        let mut player = Player::new(VirtualClock::new());
        ctl.play();
        player.sync(&ctl);
        ctl.pause();
        assert_eq!(player.advance(&mut ctl, Duration::from_secs(10), |_, _| {}), 0);
        assert_eq!(ctl.cursor(), 0);
    }

    #[test]
    fn replacement_drops_the_armed_tick() {
        let mut ctl = controller(4, 100);
        let mut player = Player::new(VirtualClock::new());
        ctl.play();
        player.advance(&mut ctl, Duration::from_millis(150), |_, _| {});
        assert_eq!(ctl.cursor(), 1);

        let fresh = (0..6)
            .map(|i| Step::new(StepKind::Moving, "fresh", i + 100))
            .collect::<Vec<_>>();
        ctl.replace(Trace::try_from(fresh).expect("trace"));
        assert_eq!(player.advance(&mut ctl, Duration::from_secs(5), |_, _| {}), 0);
        assert_eq!(ctl.cursor(), 0);
        assert_eq!(ctl.current().state, 100);
    }

    #[test]
    fn run_on_single_step_trace_returns_immediately() {
        let mut ctl = controller(1, 100);
        let run = Player::new(VirtualClock::new()).run_to_end(&mut ctl, |_, _| {});
        assert_eq!(run.ticks, 0);
        assert_eq!(run.elapsed, Duration::ZERO);
    }
}
