//! Playback state machine: maps continuous progress onto discrete steps.
//!
//! The controller performs no I/O. Every transition returns the [`Effect`]s
//! the caller has to run (fetches, timer start/stop), and results come back
//! through [`PlaybackController::apply`]. Each fetch carries a token; only the
//! latest token of its slot may publish, so a slow response for an old step
//! can never overwrite a newer one.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::LoadError;
use crate::model::{Demo, PlaybackState, Step};
use crate::pages::Page;
use crate::progress::{self, Timing};

pub type RequestToken = u64;

const NO_CAPTION: &str = "Loading images... Done!";

/// A fetch the controller wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadRequest {
    Manifest { token: RequestToken, path: String },
    Step { token: RequestToken, index: usize, file: String, path: String },
    Terminal { token: RequestToken, index: usize, path: String },
}

impl LoadRequest {
    pub fn token(&self) -> RequestToken {
        match self {
            LoadRequest::Manifest { token, .. }
            | LoadRequest::Step { token, .. }
            | LoadRequest::Terminal { token, .. } => *token,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            LoadRequest::Manifest { path, .. }
            | LoadRequest::Step { path, .. }
            | LoadRequest::Terminal { path, .. } => path,
        }
    }
}

#[derive(Debug)]
pub enum Loaded {
    Manifest(Result<Vec<Step>, LoadError>),
    Content {
        index: usize,
        result: Result<String, LoadError>,
    },
}

/// A finished fetch, tagged with the token of the request that started it.
#[derive(Debug)]
pub struct LoadOutcome {
    pub token: RequestToken,
    pub loaded: Loaded,
}

/// Side effects the driver must carry out after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Load(LoadRequest),
    StartTimer { generation: u64, period: Duration },
    StopTimer,
}

/// Where the generation target came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    None,
    Demo,
    Upload,
}

pub struct PlaybackController {
    state: PlaybackState,
    demo: Option<Demo>,
    steps: Vec<Step>,
    target: Target,
    content: String,
    loading_error: Option<String>,
    tick_period: Duration,
    next_token: RequestToken,
    manifest_token: Option<RequestToken>,
    content_token: Option<RequestToken>,
    /// Index of the most recent content request, cleared when a placeholder is shown
    requested_index: Option<usize>,
    timer_generation: u64,
    timer_live: bool,
}

impl PlaybackController {
    pub fn new(tick_period: Duration) -> Self {
        Self {
            state: PlaybackState::new(),
            demo: None,
            steps: Vec::new(),
            target: Target::None,
            content: Page::Welcome.render(&[]),
            loading_error: None,
            tick_period,
            next_token: 0,
            manifest_token: None,
            content_token: None,
            requested_index: None,
            timer_generation: 0,
            timer_live: false,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn loading_error(&self) -> Option<&str> {
        self.loading_error.as_deref()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn demo(&self) -> Option<&Demo> {
        self.demo.as_ref()
    }

    pub fn target_ready(&self) -> bool {
        self.target != Target::None
    }

    pub fn total_steps(&self) -> usize {
        let has_terminal = self.demo.as_ref().is_some_and(|d| d.final_html.is_some());
        progress::total_steps(self.steps.len(), has_terminal)
    }

    pub fn timing(&self) -> Timing {
        let override_ms = self.demo.as_ref().and_then(|d| d.interval_time);
        Timing::new(self.tick_period, override_ms, self.steps.len(), self.total_steps())
    }

    /// Progress rounded for the progress bar label.
    pub fn progress_percent(&self) -> u32 {
        self.state.progress.round().clamp(0.0, 100.0) as u32
    }

    /// Caption of the current step, falling back to its description.
    pub fn current_caption(&self) -> &str {
        match self.steps.get(self.state.step_index) {
            Some(step) if !step.caption.is_empty() => &step.caption,
            Some(step) if !step.description.is_empty() => &step.description,
            _ => NO_CAPTION,
        }
    }

    pub fn toggle_play(&mut self) -> Vec<Effect> {
        if self.state.playing {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Begin a run from the top. Step 0 is requested right away so the
    /// preview never waits for the first tick.
    pub fn start(&mut self) -> Vec<Effect> {
        if self.state.playing {
            return Vec::new();
        }
        if !self.target_ready() {
            debug!("play ignored: no image or demo selected");
            return Vec::new();
        }

        self.state = PlaybackState {
            progress: 0.0,
            step_index: 0,
            playing: true,
        };
        self.timer_generation += 1;
        self.timer_live = true;
        info!(
            generation = self.timer_generation,
            total_ms = self.timing().total.as_millis() as u64,
            "playback started"
        );

        let mut effects = vec![Effect::StartTimer {
            generation: self.timer_generation,
            period: self.tick_period,
        }];
        if let Some(request) = self.content_request(0) {
            effects.push(Effect::Load(request));
        }
        effects
    }

    /// Freeze progress where it is and cancel the timer.
    pub fn pause(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.state.playing {
            return effects;
        }
        self.state.playing = false;
        self.cancel_timer(&mut effects);
        info!(progress = self.state.progress, step = self.state.step_index, "playback paused");
        effects
    }

    /// Advance one autoplay tick. Ticks from a cancelled timer are dropped.
    pub fn tick(&mut self, generation: u64) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.state.playing || !self.timer_live || generation != self.timer_generation {
            debug!(generation, live = self.timer_generation, "stale tick dropped");
            return effects;
        }

        if self.manifest_token.is_some() {
            debug!(generation, "tick held until the manifest arrives");
            return effects;
        }

        let total = self.total_steps();
        let next = self.state.progress + self.timing().increment();

        if next >= 100.0 {
            self.state.progress = 100.0;
            self.state.playing = false;
            self.cancel_timer(&mut effects);
            let last = total.saturating_sub(1);
            if last != self.state.step_index {
                self.state.step_index = last;
                if let Some(request) = self.content_request(last) {
                    effects.push(Effect::Load(request));
                }
            }
            info!(step = self.state.step_index, "playback finished");
            return effects;
        }

        self.state.progress = next;
        let target = progress::step_for_progress(next, total);
        if target != self.state.step_index {
            self.state.step_index = target;
            if let Some(request) = self.content_request(target) {
                effects.push(Effect::Load(request));
            }
        }
        effects
    }

    /// Jump to a progress value picked by the user. Leaves `playing` alone; a
    /// running timer carries on from the new position.
    pub fn scrub(&mut self, progress: f64) -> Vec<Effect> {
        let progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 100.0) };
        self.state.progress = progress;

        let mut effects = Vec::new();
        let target = progress::scrub_target(progress, self.steps.len());
        if target < self.steps.len() {
            self.state.step_index = target;
            if self.requested_index != Some(target) {
                if let Some(request) = self.content_request(target) {
                    effects.push(Effect::Load(request));
                }
            }
        }
        debug!(progress, step = self.state.step_index, "scrubbed");
        effects
    }

    /// Back to the start without refetching the manifest.
    pub fn reset(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.rewind(&mut effects);
        self.content = self.idle_page();
        info!("playback reset");
        effects
    }

    /// Switch demos: stop everything, drop results for the old demo, and
    /// fetch the new manifest.
    pub fn select_demo(&mut self, demo: Demo) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.rewind(&mut effects);
        self.steps.clear();
        self.target = Target::Demo;
        self.content = Page::ReadyDemo.render(&[("name", &demo.name)]);

        let token = self.issue_token();
        self.manifest_token = Some(token);
        info!(demo = %demo.id, manifest = %demo.manifest, "demo selected");
        effects.push(Effect::Load(LoadRequest::Manifest {
            token,
            path: demo.manifest.clone(),
        }));
        self.demo = Some(demo);
        effects
    }

    /// A user-provided screenshot finished decoding.
    pub fn image_loaded(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.rewind(&mut effects);
        self.target = Target::Upload;
        self.content = Page::ReadyUpload.render(&[]);
        effects
    }

    pub fn image_failed(&mut self, error: &LoadError) {
        warn!(%error, "image read failed");
        self.loading_error = Some(error.user_message());
    }

    /// Forget the current target; loads are suppressed until a new one is set.
    pub fn clear_image(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.rewind(&mut effects);
        self.target = Target::None;
        self.content = self.idle_page();
        effects
    }

    /// Apply a finished fetch, unless a newer request for the same slot exists.
    /// A manifest landing mid-run requests the step the run has reached.
    pub fn apply(&mut self, outcome: LoadOutcome) -> Vec<Effect> {
        let mut effects = Vec::new();
        let LoadOutcome { token, loaded } = outcome;
        match loaded {
            Loaded::Manifest(result) => {
                if self.manifest_token != Some(token) {
                    debug!(token, "stale manifest result dropped");
                    return effects;
                }
                self.manifest_token = None;
                match result {
                    Ok(steps) => {
                        info!(steps = steps.len(), "manifest loaded");
                        self.steps = steps;
                        self.loading_error = None;
                    }
                    Err(error) => {
                        warn!(%error, "manifest failed, using placeholder step");
                        self.loading_error = Some(error.user_message());
                        self.steps = vec![placeholder_step()];
                        self.content = Page::ManifestMissing.render(&[]);
                    }
                }
                if self.state.playing {
                    let target = progress::step_for_progress(self.state.progress, self.total_steps());
                    self.state.step_index = target;
                    if let Some(request) = self.content_request(target) {
                        effects.push(Effect::Load(request));
                    }
                }
            }
            Loaded::Content { index, result } => {
                if self.content_token != Some(token) {
                    debug!(token, index, "stale content result dropped");
                    return effects;
                }
                match result {
                    Ok(html) => {
                        debug!(index, bytes = html.len(), "content published");
                        self.content = html;
                        self.loading_error = None;
                    }
                    Err(error) => {
                        warn!(index, %error, "content failed, showing fallback");
                        self.content = fallback_page(&error);
                        self.loading_error = Some(error.user_message());
                    }
                }
            }
        }
        effects
    }

    fn rewind(&mut self, effects: &mut Vec<Effect>) {
        self.cancel_timer(effects);
        self.state = PlaybackState::new();
        self.content_token = None;
        self.requested_index = None;
    }

    fn cancel_timer(&mut self, effects: &mut Vec<Effect>) {
        self.timer_generation += 1;
        if self.timer_live {
            self.timer_live = false;
            effects.push(Effect::StopTimer);
        }
    }

    fn idle_page(&self) -> String {
        match (self.target, &self.demo) {
            (Target::Upload, _) => Page::ReadyUpload.render(&[]),
            (Target::Demo, Some(demo)) => Page::ReadyDemo.render(&[("name", &demo.name)]),
            (_, Some(_)) => Page::Upload.render(&[]),
            (_, None) => Page::Welcome.render(&[]),
        }
    }

    fn issue_token(&mut self) -> RequestToken {
        self.next_token += 1;
        self.next_token
    }

    /// Resolve the fetch for `index`, or `None` while loads are suppressed.
    fn content_request(&mut self, index: usize) -> Option<LoadRequest> {
        if self.steps.is_empty() || !self.target_ready() {
            return None;
        }
        let demo = self.demo.as_ref()?;

        let terminal = match &demo.final_html {
            Some(path) if index == self.steps.len() => Some(path.clone()),
            _ => None,
        };
        let step = match terminal {
            Some(_) => None,
            None => Some(self.steps.get(index)?.file.clone()),
        };
        let step_path = step.as_deref().map(|file| demo.step_path(file));

        let token = self.issue_token();
        self.content_token = Some(token);
        self.requested_index = Some(index);

        let request = match (terminal, step, step_path) {
            (Some(path), _, _) => LoadRequest::Terminal { token, index, path },
            (None, Some(file), Some(path)) => LoadRequest::Step { token, index, file, path },
            _ => return None,
        };
        debug!(token, index, path = request.path(), "content requested");
        Some(request)
    }
}

fn placeholder_step() -> Step {
    Step {
        file: "demo.html".to_string(),
        caption: "Demo Interface".to_string(),
        description: "Demo Interface".to_string(),
    }
}

fn fallback_page(error: &LoadError) -> String {
    match error {
        LoadError::TerminalArtifact { .. } => Page::FinalMissing.render(&[]),
        LoadError::Manifest { .. } => Page::ManifestMissing.render(&[]),
        LoadError::StepFile { file, .. } => Page::StepMissing.render(&[("file", file)]),
        LoadError::Catalog { path, .. } => Page::StepMissing.render(&[("file", path)]),
        LoadError::ImageRead(_) => Page::Upload.render(&[]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::progress::DEFAULT_TICK;

    fn demo(id: &str, final_html: bool) -> Demo {
        Demo {
            id: id.to_string(),
            name: format!("{id} demo"),
            manifest: format!("/demos/{id}/manifest.json"),
            final_html: final_html.then(|| format!("/demos/{id}/final.html")),
            interval_time: None,
            thumbnail: String::new(),
            category: "web".to_string(),
            description: String::new(),
            estimated_time: "10s".to_string(),
            steps: 0,
        }
    }

    fn steps(count: usize) -> Vec<Step> {
        (1..=count)
            .map(|i| Step {
                file: format!("{i:04}.html"),
                caption: format!("Elements: {i}/{count}"),
                description: String::new(),
            })
            .collect()
    }

    fn loads(effects: &[Effect]) -> Vec<LoadRequest> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Load(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    fn ok_content(request: &LoadRequest, html: &str) -> LoadOutcome {
        let index = match request {
            LoadRequest::Step { index, .. } | LoadRequest::Terminal { index, .. } => *index,
            LoadRequest::Manifest { .. } => panic!("not a content request"),
        };
        LoadOutcome {
            token: request.token(),
            loaded: Loaded::Content {
                index,
                result: Ok(html.to_string()),
            },
        }
    }

    /// Controller with a demo selected and its manifest applied.
    fn loaded(count: usize, final_html: bool) -> PlaybackController {
        let mut controller = PlaybackController::new(DEFAULT_TICK);
        let effects = controller.select_demo(demo("landing", final_html));
        let manifest = loads(&effects).remove(0);
        controller.apply(LoadOutcome {
            token: manifest.token(),
            loaded: Loaded::Manifest(Ok(steps(count))),
        });
        controller
    }

    fn generation(effects: &[Effect]) -> u64 {
        effects
            .iter()
            .find_map(|effect| match effect {
                Effect::StartTimer { generation, .. } => Some(*generation),
                _ => None,
            })
            .expect("timer started")
    }

    #[test]
    fn start_resets_and_loads_first_step_immediately() {
        let mut controller = loaded(5, false);
        controller.scrub(60.0);
        assert_eq!(controller.state().step_index, 3);

        let effects = controller.start();
        let state = controller.state();
        assert_eq!(state.progress, 0.0);
        assert_eq!(state.step_index, 0);
        assert!(state.playing);

        let requests = loads(&effects);
        assert_eq!(requests.len(), 1);
        assert!(matches!(
            &requests[0],
            LoadRequest::Step { index: 0, path, .. } if path == "/demos/landing/0001.html"
        ));
    }

    #[test]
    fn autoplay_runs_to_the_last_step_and_stops() {
        let mut controller = loaded(5, false);
        let generation = generation(&controller.start());
        let total = controller.total_steps();

        let mut ticks = 0;
        let mut stopped = false;
        while controller.state().playing {
            let effects = controller.tick(generation);
            ticks += 1;
            let state = controller.state();
            if state.playing {
                assert_eq!(state.step_index, progress::step_for_progress(state.progress, total));
            } else {
                stopped = effects.contains(&Effect::StopTimer);
            }
            assert!(ticks <= 20, "run overshot its duration");
        }

        assert_eq!(ticks, 20);
        assert!(stopped);
        let state = controller.state();
        assert_eq!(state.progress, 100.0);
        assert_eq!(state.step_index, 4);
        assert!(!state.playing);

        // the cancelled timer can no longer move anything
        assert!(controller.tick(generation).is_empty());
        assert_eq!(controller.state().progress, 100.0);
    }

    #[test]
    fn autoplay_reaches_the_final_output() {
        let mut controller = loaded(3, true);
        let generation = generation(&controller.start());

        let mut requested = Vec::new();
        while controller.state().playing {
            requested.extend(loads(&controller.tick(generation)));
        }

        assert!(matches!(
            requested.last(),
            Some(LoadRequest::Terminal { index: 3, path, .. }) if path == "/demos/landing/final.html"
        ));
        assert_eq!(controller.state().step_index, 3);
        assert_eq!(controller.timing().total, Duration::from_millis(800));
    }

    #[test]
    fn scrub_maps_with_step_count_and_keeps_playing_flag() {
        let mut controller = loaded(10, false);
        let effects = controller.scrub(60.0);
        assert_eq!(controller.state().step_index, 6);
        assert_eq!(controller.state().progress, 60.0);
        assert!(!controller.state().playing);
        assert!(matches!(loads(&effects).as_slice(), [LoadRequest::Step { index: 6, .. }]));

        // same index again: nothing new to fetch
        assert!(controller.scrub(65.0).is_empty());

        let generation = generation(&controller.start());
        controller.scrub(50.0);
        assert!(controller.state().playing);
        controller.tick(generation);
        assert!(controller.state().progress > 50.0);
    }

    #[test]
    fn scrub_never_targets_the_final_output() {
        let mut controller = loaded(4, true);
        controller.scrub(30.0);
        let effects = controller.scrub(100.0);
        assert!(effects.is_empty());
        assert_eq!(controller.state().progress, 100.0);
        assert_eq!(controller.state().step_index, 1);
    }

    #[test]
    fn failed_step_degrades_one_frame_only() {
        let mut controller = loaded(5, false);
        let step_two = loads(&controller.scrub(45.0)).remove(0);
        controller.apply(LoadOutcome {
            token: step_two.token(),
            loaded: Loaded::Content {
                index: 2,
                result: Err(LoadError::StepFile {
                    file: "0003.html".to_string(),
                    source: FetchError::Status(404),
                }),
            },
        });
        assert_eq!(controller.loading_error(), Some("Failed to load step: 0003.html"));
        assert!(controller.content().contains("Could not load: 0003.html"));

        let step_three = loads(&controller.scrub(65.0)).remove(0);
        controller.apply(ok_content(&step_three, "<p>step four</p>"));
        assert_eq!(controller.content(), "<p>step four</p>");
        assert_eq!(controller.loading_error(), None);
    }

    #[test]
    fn final_output_failure_has_its_own_fallback() {
        let mut controller = loaded(2, true);
        let generation = generation(&controller.start());
        let mut terminal = None;
        while controller.state().playing {
            for request in loads(&controller.tick(generation)) {
                if matches!(request, LoadRequest::Terminal { .. }) {
                    terminal = Some(request);
                }
            }
        }
        let terminal = terminal.expect("final output requested");
        controller.apply(LoadOutcome {
            token: terminal.token(),
            loaded: Loaded::Content {
                index: 2,
                result: Err(LoadError::TerminalArtifact {
                    path: terminal.path().to_string(),
                    source: FetchError::Status(500),
                }),
            },
        });
        assert_eq!(controller.loading_error(), Some("Failed to load final HTML"));
        assert!(controller.content().contains("Final HTML Not Found"));
    }

    #[test]
    fn last_requested_step_wins() {
        let mut controller = loaded(5, false);
        let first = loads(&controller.scrub(20.0)).remove(0);
        let second = loads(&controller.scrub(60.0)).remove(0);

        controller.apply(ok_content(&second, "step 3"));
        controller.apply(ok_content(&first, "step 1"));
        assert_eq!(controller.content(), "step 3");
    }

    #[test]
    fn switching_demo_while_playing_cancels_everything() {
        let mut controller = loaded(5, false);
        let effects = controller.start();
        let old_generation = generation(&effects);
        let in_flight = loads(&effects).remove(0);
        controller.tick(old_generation);

        let effects = controller.select_demo(demo("pricing", false));
        assert!(effects.contains(&Effect::StopTimer));
        let state = controller.state();
        assert!(!state.playing);
        assert_eq!(state.progress, 0.0);
        assert_eq!(state.step_index, 0);
        assert!(controller.steps().is_empty());

        let ready = controller.content().to_string();
        assert!(ready.contains("pricing demo"));
        controller.apply(ok_content(&in_flight, "old demo step"));
        assert_eq!(controller.content(), ready);

        assert!(controller.tick(old_generation).is_empty());
        assert_eq!(controller.state().progress, 0.0);
    }

    #[test]
    fn stale_manifest_is_ignored() {
        let mut controller = PlaybackController::new(DEFAULT_TICK);
        let first = loads(&controller.select_demo(demo("a", false))).remove(0);
        let second = loads(&controller.select_demo(demo("b", false))).remove(0);

        controller.apply(LoadOutcome {
            token: first.token(),
            loaded: Loaded::Manifest(Ok(steps(9))),
        });
        assert!(controller.steps().is_empty());

        controller.apply(LoadOutcome {
            token: second.token(),
            loaded: Loaded::Manifest(Ok(steps(2))),
        });
        assert_eq!(controller.steps().len(), 2);
        assert_eq!(controller.demo().map(|d| d.id.as_str()), Some("b"));
    }

    #[test]
    fn manifest_failure_substitutes_placeholder_step() {
        let mut controller = PlaybackController::new(DEFAULT_TICK);
        let request = loads(&controller.select_demo(demo("broken", false))).remove(0);
        controller.apply(LoadOutcome {
            token: request.token(),
            loaded: Loaded::Manifest(Err(LoadError::Manifest {
                path: request.path().to_string(),
                source: FetchError::Status(404),
            })),
        });

        assert_eq!(controller.steps(), &[placeholder_step()]);
        assert_eq!(controller.loading_error(), Some("Failed to load build steps manifest"));
        assert!(controller.content().contains("Build Steps Not Found"));

        let effects = controller.start();
        assert!(matches!(
            loads(&effects).as_slice(),
            [LoadRequest::Step { path, .. }] if path == "/demos/broken/demo.html"
        ));
    }

    #[test]
    fn play_before_manifest_waits_then_loads_current_step() {
        let mut controller = PlaybackController::new(DEFAULT_TICK);
        let manifest = loads(&controller.select_demo(demo("landing", false))).remove(0);
        let effects = controller.start();
        assert!(controller.state().playing);
        assert!(loads(&effects).is_empty());

        let generation = generation(&effects);
        for _ in 0..10 {
            assert!(controller.tick(generation).is_empty());
        }
        assert_eq!(controller.state().progress, 0.0);

        let effects = controller.apply(LoadOutcome {
            token: manifest.token(),
            loaded: Loaded::Manifest(Ok(steps(5))),
        });
        assert!(matches!(
            loads(&effects).as_slice(),
            [LoadRequest::Step { index: 0, file, .. }] if file == "0001.html"
        ));
        assert_eq!(controller.state().step_index, 0);

        controller.tick(generation);
        assert!(controller.state().progress > 0.0);
    }

    #[test]
    fn manifest_while_paused_requests_nothing() {
        let mut controller = PlaybackController::new(DEFAULT_TICK);
        let manifest = loads(&controller.select_demo(demo("landing", false))).remove(0);
        let effects = controller.apply(LoadOutcome {
            token: manifest.token(),
            loaded: Loaded::Manifest(Ok(steps(3))),
        });
        assert!(effects.is_empty());
    }

    #[test]
    fn pause_freezes_and_reset_returns_to_ready() {
        let mut controller = loaded(5, false);
        let generation = generation(&controller.start());
        for _ in 0..5 {
            controller.tick(generation);
        }
        let effects = controller.pause();
        assert_eq!(effects, vec![Effect::StopTimer]);
        let frozen = controller.state();
        assert_eq!(frozen.progress, 25.0);
        assert_eq!(frozen.step_index, 1);

        assert!(controller.tick(generation).is_empty());
        assert_eq!(controller.state(), frozen);

        let in_flight = loads(&controller.scrub(80.0)).remove(0);
        controller.reset();
        assert_eq!(controller.state(), PlaybackState::new());
        assert!(controller.content().contains("Ready to Generate!"));
        controller.apply(ok_content(&in_flight, "late"));
        assert_ne!(controller.content(), "late");
        assert_eq!(controller.steps().len(), 5);
    }

    #[test]
    fn nothing_plays_or_loads_without_a_target() {
        let mut controller = PlaybackController::new(DEFAULT_TICK);
        assert!(controller.toggle_play().is_empty());
        assert!(!controller.state().playing);

        let mut controller = loaded(4, false);
        controller.clear_image();
        assert!(!controller.target_ready());
        assert!(controller.start().is_empty());
        assert!(controller.scrub(50.0).is_empty());
        assert_eq!(controller.state().step_index, 2);
        assert!(controller.content().contains("Upload a Screenshot"));
    }

    #[test]
    fn uploaded_image_marks_target_ready() {
        let mut controller = loaded(4, false);
        controller.clear_image();
        controller.image_loaded();
        assert!(controller.target_ready());
        assert!(controller.content().contains("uploaded successfully"));
        assert_eq!(loads(&controller.start()).len(), 1);

        controller.image_failed(&LoadError::from(crate::error::ImageReadError::Unsupported(
            "notes.txt".into(),
        )));
        assert_eq!(controller.loading_error(), Some("Failed to read image file"));
        assert!(controller.state().playing);
    }

    #[test]
    fn caption_falls_back_to_description() {
        let mut controller = loaded(2, false);
        assert_eq!(controller.current_caption(), "Elements: 1/2");

        controller.steps[1].caption.clear();
        controller.steps[1].description = "Second pass".into();
        controller.scrub(50.0);
        assert_eq!(controller.current_caption(), "Second pass");

        let empty = PlaybackController::new(DEFAULT_TICK);
        assert_eq!(empty.current_caption(), NO_CAPTION);
        assert_eq!(empty.progress_percent(), 0);
    }
}
