use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

/// Fixed-period autoplay clock. Every tick is stamped with the generation it
/// was started for, so the controller can drop ticks that were already queued
/// when the timer was cancelled.
pub struct Ticker {
    generation: u64,
    task: JoinHandle<()>,
}

impl Ticker {
    pub fn spawn(handle: &Handle, generation: u64, period: Duration, tx: UnboundedSender<u64>) -> Self {
        let task = handle.spawn(async move {
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(generation).is_err() {
                    break;
                }
            }
        });
        debug!(generation, period_ms = period.as_millis() as u64, "ticker started");
        Self { generation, task }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.task.abort();
        debug!(generation = self.generation, "ticker stopped");
    }
}
