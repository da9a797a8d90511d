use std::time::Duration;

/// Autoplay tick period used when nothing else is configured.
pub const DEFAULT_TICK: Duration = Duration::from_millis(50);

/// Step counts above this get the short per-step duration.
const LONG_DEMO_THRESHOLD: usize = 100;
const SHORT_STEP_MS: u64 = 100;
const DEFAULT_STEP_MS: u64 = 200;

/// Number of addressable indices: every step plus the final output if there is one.
pub fn total_steps(steps_len: usize, has_terminal: bool) -> usize {
    steps_len + usize::from(has_terminal)
}

/// Step index the autoplay timer shows for a given progress.
pub fn step_for_progress(progress: f64, total_steps: usize) -> usize {
    let raw = (progress * total_steps as f64 / 100.0).floor();
    if raw <= 0.0 {
        0
    } else {
        (raw as usize).min(total_steps)
    }
}

/// Step index targeted by a manual scrub. Divides by the step count only, so
/// a scrub never lands on the final output.
pub fn scrub_target(progress: f64, steps_len: usize) -> usize {
    let raw = (progress * steps_len as f64 / 100.0).floor();
    if raw <= 0.0 { 0 } else { raw as usize }
}

/// How long each step stays on screen during autoplay.
pub fn per_step_duration(override_ms: Option<u64>, steps_len: usize) -> Duration {
    match override_ms {
        Some(ms) if ms > 0 => Duration::from_millis(ms),
        _ if steps_len > LONG_DEMO_THRESHOLD => Duration::from_millis(SHORT_STEP_MS),
        _ => Duration::from_millis(DEFAULT_STEP_MS),
    }
}

/// Constant-rate schedule for one playback run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub tick: Duration,
    pub total: Duration,
}

impl Timing {
    pub fn new(tick: Duration, override_ms: Option<u64>, steps_len: usize, total_steps: usize) -> Self {
        let per_step = per_step_duration(override_ms, steps_len);
        let total = per_step * total_steps.max(1) as u32;
        Self { tick, total }
    }

    /// Progress added on every tick.
    pub fn increment(&self) -> f64 {
        let ticks = self.total.as_nanos() as f64 / self.tick.as_nanos() as f64;
        if ticks <= 0.0 { 100.0 } else { 100.0 / ticks }
    }
}
