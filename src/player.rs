//! Runs the controller's effects on a tokio runtime and feeds results back.
//!
//! All controller mutation happens in [`Player`] methods on the UI thread;
//! background tasks only ever send messages, which [`Player::pump`] drains.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::controller::{Effect, LoadOutcome, PlaybackController};
use crate::error::LoadError;
use crate::loader::spawn_load;
use crate::model::Demo;
use crate::source::ContentSource;
use crate::timer::Ticker;

pub struct Player {
    controller: PlaybackController,
    source: Arc<dyn ContentSource>,
    runtime: Handle,
    load_tx: UnboundedSender<LoadOutcome>,
    load_rx: UnboundedReceiver<LoadOutcome>,
    tick_tx: UnboundedSender<u64>,
    tick_rx: UnboundedReceiver<u64>,
    ticker: Option<Ticker>,
}

impl Player {
    pub fn new(source: Arc<dyn ContentSource>, runtime: Handle, tick_period: Duration) -> Self {
        let (load_tx, load_rx) = unbounded_channel();
        let (tick_tx, tick_rx) = unbounded_channel();
        Self {
            controller: PlaybackController::new(tick_period),
            source,
            runtime,
            load_tx,
            load_rx,
            tick_tx,
            tick_rx,
            ticker: None,
        }
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub fn source(&self) -> Arc<dyn ContentSource> {
        Arc::clone(&self.source)
    }

    #[cfg(test)]
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn toggle_play(&mut self) {
        let effects = self.controller.toggle_play();
        self.run(effects);
    }

    pub fn reset(&mut self) {
        let effects = self.controller.reset();
        self.run(effects);
    }

    pub fn scrub(&mut self, progress: f64) {
        let effects = self.controller.scrub(progress);
        self.run(effects);
    }

    pub fn select_demo(&mut self, demo: Demo) {
        let effects = self.controller.select_demo(demo);
        self.run(effects);
    }

    pub fn image_loaded(&mut self) {
        let effects = self.controller.image_loaded();
        self.run(effects);
    }

    pub fn image_failed(&mut self, error: &LoadError) {
        self.controller.image_failed(error);
    }

    pub fn clear_image(&mut self) {
        let effects = self.controller.clear_image();
        self.run(effects);
    }

    /// Apply every tick and finished load received since the last call.
    /// Returns whether anything was processed.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.load_rx.try_recv() {
            let effects = self.controller.apply(outcome);
            self.run(effects);
            changed = true;
        }
        while let Ok(generation) = self.tick_rx.try_recv() {
            let effects = self.controller.tick(generation);
            self.run(effects);
            changed = true;
        }
        changed
    }

    fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Load(request) => {
                    let source = Arc::clone(&self.source);
                    let tx = self.load_tx.clone();
                    self.runtime.spawn(spawn_load(source, request, tx));
                }
                Effect::StartTimer { generation, period } => {
                    if let Some(old) = self.ticker.take() {
                        old.stop();
                    }
                    self.ticker = Some(Ticker::spawn(&self.runtime, generation, period, self.tick_tx.clone()));
                }
                Effect::StopTimer => {
                    if let Some(ticker) = self.ticker.take() {
                        debug!(generation = ticker.generation(), "cancelling ticker");
                        ticker.stop();
                    }
                }
            }
        }
    }
}
