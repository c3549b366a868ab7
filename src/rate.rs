use serde::Serialize;
use std::time::{Duration, Instant};

/// Samples per rate window
pub const UPDATE_INTERVAL: u64 = 100;
/// Axis values closer than this count as the same sample
pub const SAMPLE_EPSILON: f32 = 1e-4;

pub fn is_same_sample(now: f32, last: f32) -> bool {
    (now - last).abs() < SAMPLE_EPSILON
}

/// Decides whether a sample carries new motion on the two tracked axes.
///
/// A sample is effective only when *both* axes moved away from the last effective
/// sample. Moving just one axis does not count. The first sample seen only sets the
/// baseline.
#[derive(Debug, Clone, Default)]
pub struct EffectiveSampleFilter {
    baseline: Option<(f32, f32)>,
}

impl EffectiveSampleFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, x: f32, y: f32) -> bool {
        let Some((last_x, last_y)) = self.baseline else {
            self.baseline = Some((x, y));
            return false;
        };

        let effective = !is_same_sample(x, last_x) && !is_same_sample(y, last_y);
        if effective {
            self.baseline = Some((x, y));
        }
        effective
    }
}

/// Sampling rates over some stretch of time.
///
/// `hz` and `effective_hz` are `None` when less than a millisecond elapsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateReport {
    pub samples: u64,
    pub effective_samples: u64,
    pub elapsed_ms: u64,
    pub hz: Option<f64>,
    pub effective_hz: Option<f64>,
}

impl RateReport {
    pub fn new(samples: u64, effective_samples: u64, elapsed: Duration) -> Self {
        // Whole milliseconds, like the rate has always been measured
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let rate = |count: u64| {
            if elapsed_ms == 0 {
                None
            } else {
                Some(count as f64 / (elapsed_ms as f64 / 1000.0))
            }
        };

        Self {
            samples,
            effective_samples,
            elapsed_ms,
            hz: rate(samples),
            effective_hz: rate(effective_samples),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct RateWindow {
    total_samples: u64,
    effective_samples: u64,
    window_start: Instant,
}

impl RateWindow {
    fn starting_at(window_start: Instant) -> Self {
        Self {
            total_samples: 0,
            effective_samples: 0,
            window_start,
        }
    }
}

/// Windowed and whole-session sample counters.
#[derive(Debug, Clone)]
pub struct RateTracker {
    window: RateWindow,
    update_interval: u64,
    total_sample_count: u64,
    total_effective_sample_count: u64,
    session_start: Instant,
}

impl RateTracker {
    pub fn new(now: Instant) -> Self {
        Self::with_interval(now, UPDATE_INTERVAL)
    }

    pub fn with_interval(now: Instant, update_interval: u64) -> Self {
        Self {
            window: RateWindow::starting_at(now),
            update_interval: update_interval.max(1),
            total_sample_count: 0,
            total_effective_sample_count: 0,
            session_start: now,
        }
    }

    pub fn record_sample(&mut self, is_effective: bool) {
        self.window.total_samples += 1;
        self.total_sample_count += 1;
        if is_effective {
            self.window.effective_samples += 1;
            self.total_effective_sample_count += 1;
        }
    }

    /// Whether the current window holds `update_interval` samples.
    pub fn window_complete(&self) -> bool {
        self.window.total_samples >= self.update_interval
    }

    pub fn total_samples(&self) -> u64 {
        self.total_sample_count
    }

    pub fn total_effective_samples(&self) -> u64 {
        self.total_effective_sample_count
    }

    /// Report the current window, then start a new one at `now`.
    pub fn window_report(&mut self, now: Instant) -> RateReport {
        let report = RateReport::new(
            self.window.total_samples,
            self.window.effective_samples,
            now.saturating_duration_since(self.window.window_start),
        );
        self.window = RateWindow::starting_at(now);
        report
    }

    /// Report the whole session up to `now`. Counters are left untouched.
    pub fn final_report(&self, now: Instant) -> RateReport {
        RateReport::new(
            self.total_sample_count,
            self.total_effective_sample_count,
            now.saturating_duration_since(self.session_start),
        )
    }
}
