//! Fixed-interval throttling of sampling passes.

/// Whether a pass is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplingPhase {
    #[default]
    Idle,
    Sampling,
}

/// Gates sampling passes to at most one per `interval` seconds.
///
/// On firing, elapsed time resets to exactly zero: time past the interval is
/// dropped, and missed intervals are never made up with extra passes.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateScheduler {
    interval: f32,
    elapsed: f32,
    phase: SamplingPhase,
    fire_count: u64,
}

impl UpdateScheduler {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            elapsed: 0.0,
            phase: SamplingPhase::Idle,
            fire_count: 0,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Changes the interval without touching accumulated time.
    pub fn set_interval(&mut self, interval: f32) {
        self.interval = interval;
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn phase(&self) -> SamplingPhase {
        self.phase
    }

    /// Number of times this scheduler has fired.
    pub fn fire_count(&self) -> u64 {
        self.fire_count
    }

    /// Adds `dt` seconds and reports whether a pass is due.
    ///
    /// Negative or NaN deltas count as zero. Returns false while a previous
    /// pass has not been [`finish`](Self::finish)ed.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.phase == SamplingPhase::Sampling {
            return false;
        }

        self.elapsed += dt.max(0.0);
        if self.elapsed >= self.interval {
            self.elapsed = 0.0;
            self.phase = SamplingPhase::Sampling;
            self.fire_count += 1;
            true
        } else {
            false
        }
    }

    /// Returns to [`SamplingPhase::Idle`] after a pass.
    pub fn finish(&mut self) {
        self.phase = SamplingPhase::Idle;
    }

    /// Ticks and, if due, runs `pass` and finishes. Returns the pass result.
    pub fn run_if_due<T>(&mut self, dt: f32, pass: impl FnOnce() -> T) -> Option<T> {
        if !self.tick(dt) {
            return None;
        }
        let result = pass();
        self.finish();
        Some(result)
    }

    /// Makes the next tick fire regardless of accumulated time.
    pub fn trigger(&mut self) {
        self.elapsed = self.interval.max(0.0);
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.phase = SamplingPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_and_resets_to_zero() {
        let mut scheduler = UpdateScheduler::new(0.2);
        let mut fired = Vec::new();

        for dt in [0.05, 0.05, 0.05, 0.1] {
            fired.push(scheduler.run_if_due(dt, || ()).is_some());
        }

        assert_eq!(fired, vec![false, false, false, true]);
        assert_eq!(scheduler.elapsed(), 0.0);
        assert_eq!(scheduler.fire_count(), 1);
        assert_eq!(scheduler.phase(), SamplingPhase::Idle);
    }

    #[test]
    fn test_large_delta_does_not_catch_up() {
        let mut scheduler = UpdateScheduler::new(0.2);
        assert!(scheduler.run_if_due(1.0, || ()).is_some());
        assert_eq!(scheduler.elapsed(), 0.0);
        assert!(scheduler.run_if_due(0.0, || ()).is_none());
        assert!(scheduler.run_if_due(0.1, || ()).is_none());
        assert_eq!(scheduler.fire_count(), 1);
    }

    #[test]
    fn test_no_double_fire_while_sampling() {
        let mut scheduler = UpdateScheduler::new(0.1);
        assert!(scheduler.tick(0.1));
        assert_eq!(scheduler.phase(), SamplingPhase::Sampling);
        assert!(!scheduler.tick(5.0));
        assert_eq!(scheduler.elapsed(), 0.0);

        scheduler.finish();
        assert!(!scheduler.tick(0.05));
        assert!(scheduler.tick(0.05));
    }

    #[test]
    fn test_negative_and_nan_deltas_are_ignored() {
        let mut scheduler = UpdateScheduler::new(0.2);
        assert!(!scheduler.tick(-1.0));
        assert!(!scheduler.tick(f32::NAN));
        assert_eq!(scheduler.elapsed(), 0.0);
    }

    #[test]
    fn test_trigger_and_reset() {
        let mut scheduler = UpdateScheduler::new(10.0);
        scheduler.trigger();
        assert_eq!(scheduler.run_if_due(0.0, || 7), Some(7));

        scheduler.tick(3.0);
        scheduler.reset();
        assert_eq!(scheduler.elapsed(), 0.0);
    }
}
