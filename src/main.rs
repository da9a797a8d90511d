//! Desktop player for pre-recorded screenshot-to-code demos

// Runtime configuration from the environment
mod config;
// Playback state machine
mod controller;
// Error taxonomy for fetches, loads and images
mod error;
// Catalog, manifest and step fetching
mod loader;
// Data models for demos, steps and playback state
mod model;
// Embedded placeholder pages
mod pages;
// Step driver wiring the controller to the runtime
mod player;
// Per-demo preview scaling rules
mod preview;
// Progress <-> step arithmetic
mod progress;
// HTTP and directory content sources
mod source;
// Screenshot and thumbnail decoding
mod thumbnail;
// Autoplay ticker
mod timer;

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::Context;
// eframe/egui for GUI application framework
use eframe::{egui, App, Frame};
use egui::{Color32, ColorImage, RichText, TextureOptions, Visuals};
// OnceCell for single-time runtime initialization
use once_cell::sync::OnceCell;
// FileDialog for screenshot selection dialogs
use rfd::FileDialog;
use tokio::runtime::{Handle, Runtime};
use tracing::{info, warn};

use config::AppConfig;
use error::{ImageReadError, LoadError};
use model::{Catalog, CategoryFilter, Demo};
use player::Player;
use preview::PreviewProfile;

// Global Tokio runtime stored in a OnceCell for lazy init
static RUNTIME: OnceCell<Runtime> = OnceCell::new();

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Program entry point: initializes logging and runtime, then launches the GUI
fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = AppConfig::from_env()?;
    let runtime = RUNTIME
        .get_or_try_init(Runtime::new)
        .context("failed to start tokio runtime")?;
    info!(root = ?config.root, catalog = %config.catalog_path, "starting demo player");

    let app = DemoApp::new(config, runtime.handle().clone());
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Screenshot to Code",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(Visuals::light());
            Box::new(app)
        }),
    )
    .map_err(|e| anyhow::anyhow!("UI exited with error: {e}"))
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Where a decoded target image came from
enum ImageOrigin {
    /// Picked or dropped by the user
    Upload,
    /// Thumbnail of the given demo
    Demo(String),
}

/// Application state for the GUI
struct DemoApp {
    config: AppConfig,
    runtime: Handle,
    /// Playback engine and its current output
    player: Player,
    /// Loaded demo catalog, once available
    catalog: Option<Catalog>,
    catalog_error: Option<String>,
    /// Incoming catalog fetch result
    catalog_result: Arc<Mutex<Option<Result<Catalog, LoadError>>>>,
    /// Selected category in the demo grid
    category: CategoryFilter,
    /// Whether the demo grid or the player is shown
    show_selector: bool,
    /// Cached textures for demo thumbnails
    thumbnails: HashMap<String, egui::TextureHandle>,
    /// Incoming images, decoded off the UI thread
    image_results: Arc<Mutex<Vec<(ImageOrigin, Result<ColorImage, ImageReadError>)>>>,
    /// Image the run pretends to generate code from
    target_image: Option<egui::TextureHandle>,
    /// Free-form prompt shown alongside the design demo
    design_prompt: String,
}

impl DemoApp {
    fn new(config: AppConfig, runtime: Handle) -> Self {
        let source = config.source();
        let player = Player::new(Arc::clone(&source), runtime.clone(), config.tick);
        let app = Self {
            config,
            runtime,
            player,
            catalog: None,
            catalog_error: None,
            catalog_result: Arc::new(Mutex::new(None)),
            category: CategoryFilter::All,
            show_selector: true,
            thumbnails: HashMap::new(),
            image_results: Arc::new(Mutex::new(Vec::new())),
            target_image: None,
            design_prompt: String::new(),
        };
        app.spawn_catalog_fetch();
        app
    }

    fn spawn_catalog_fetch(&self) {
        let source = self.player.source();
        let path = self.config.catalog_path.clone();
        let slot = Arc::clone(&self.catalog_result);
        self.runtime.spawn(async move {
            let result = loader::fetch_catalog(source.as_ref(), &path).await;
            if let Ok(mut slot) = slot.lock() {
                *slot = Some(result);
            }
        });
    }

    /// Fetch and decode every demo thumbnail in the background.
    fn spawn_thumbnail_fetches(&self, catalog: &Catalog) {
        for demo in catalog.demos.iter().filter(|d| !d.thumbnail.is_empty()) {
            let source = self.player.source();
            let results = Arc::clone(&self.image_results);
            let id = demo.id.clone();
            let path = demo.thumbnail.clone();
            self.runtime.spawn(async move {
                let bytes = match source.fetch_bytes(&path).await {
                    Ok(bytes) => bytes,
                    Err(error) => {
                        warn!(demo = %id, %path, %error, "thumbnail fetch failed");
                        return;
                    }
                };
                let decoded = tokio::task::spawn_blocking(move || thumbnail::decode_image(&bytes)).await;
                if let (Ok(decoded), Ok(mut pending)) = (decoded, results.lock()) {
                    pending.push((ImageOrigin::Demo(id), decoded));
                }
            });
        }
    }

    /// Decode a picked or dropped screenshot in a blocking task.
    fn spawn_image_read(&self, path: Option<PathBuf>, bytes: Option<Arc<[u8]>>) {
        let results = Arc::clone(&self.image_results);
        self.runtime.spawn_blocking(move || {
            let decoded = match (path, bytes) {
                (_, Some(bytes)) => thumbnail::decode_image(&bytes),
                (Some(path), None) => thumbnail::read_image_file(&path),
                (None, None) => Err(ImageReadError::Unsupported("empty drop".into())),
            };
            if let Ok(mut pending) = results.lock() {
                pending.push((ImageOrigin::Upload, decoded));
            }
        });
    }

    fn select_demo(&mut self, demo: Demo) {
        self.target_image = self.thumbnails.get(&demo.id).cloned();
        self.player.select_demo(demo);
        self.show_selector = false;
    }

    fn drain_background_results(&mut self, ctx: &egui::Context) {
        // 1️⃣ Catalog arrival
        let catalog = self.catalog_result.lock().ok().and_then(|mut slot| slot.take());
        match catalog {
            Some(Ok(catalog)) => {
                info!(demos = catalog.demos.len(), "catalog loaded");
                self.spawn_thumbnail_fetches(&catalog);
                self.catalog = Some(catalog);
            }
            Some(Err(error)) => {
                warn!(%error, "catalog load failed");
                self.catalog_error = Some(error.user_message());
            }
            None => {}
        }

        // 2️⃣ Decoded images
        let pending: Vec<_> = match self.image_results.lock() {
            Ok(mut pending) => pending.drain(..).collect(),
            Err(_) => Vec::new(),
        };
        for (origin, decoded) in pending {
            match (origin, decoded) {
                (ImageOrigin::Demo(id), Ok(img)) => {
                    let tex = ctx.load_texture(format!("thumb-{id}"), img, TextureOptions::default());
                    if self.player.controller().demo().is_some_and(|d| d.id == id) && self.target_image.is_none() {
                        self.target_image = Some(tex.clone());
                    }
                    self.thumbnails.insert(id, tex);
                }
                (ImageOrigin::Demo(id), Err(error)) => {
                    warn!(demo = %id, %error, "thumbnail decode failed");
                }
                (ImageOrigin::Upload, Ok(img)) => {
                    self.target_image = Some(ctx.load_texture("target", img, TextureOptions::default()));
                    self.player.image_loaded();
                }
                (ImageOrigin::Upload, Err(error)) => {
                    self.player.image_failed(&LoadError::from(error));
                }
            }
        }

        // 3️⃣ Ticks and step content
        self.player.pump();
    }

    fn demo_selector(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Choose a Demo");
            ui.separator();

            let Some(catalog) = self.catalog.clone() else {
                match &self.catalog_error {
                    Some(message) => ui.colored_label(Color32::RED, message),
                    None => ui.label("Loading demos..."),
                };
                return;
            };

            // Category filter
            ui.horizontal_wrapped(|ui| {
                if ui
                    .selectable_label(self.category == CategoryFilter::All, "All Categories")
                    .clicked()
                {
                    self.category = CategoryFilter::All;
                }
                for category in &catalog.categories {
                    let filter = CategoryFilter::Id(category.id.clone());
                    if ui.selectable_label(self.category == filter, &category.name).clicked() {
                        self.category = filter;
                    }
                }
            });
            ui.add_space(8.0);

            // Demo grid
            let current = self.player.controller().demo().map(|d| d.id.clone());
            let mut picked = None;
            egui::ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
                let mut any = false;
                for demo in catalog.filtered(&self.category) {
                    any = true;
                    ui.group(|ui| {
                        ui.horizontal(|ui| {
                            if let Some(tex) = self.thumbnails.get(&demo.id) {
                                ui.add(egui::Image::new(tex).max_height(90.0));
                            }
                            ui.vertical(|ui| {
                                let mut title = RichText::new(&demo.name).strong();
                                if current.as_deref() == Some(demo.id.as_str()) {
                                    title = title.color(Color32::from_rgb(37, 99, 235));
                                }
                                ui.label(title);
                                ui.label(&demo.description);
                                ui.label(format!("⏱️ {}   📋 {} steps", demo.estimated_time, demo.steps));
                                if ui.button("Open").clicked() {
                                    picked = Some(demo.clone());
                                }
                            });
                        });
                    });
                }
                if !any {
                    ui.label("No demos found in this category");
                }
            });

            if let Some(demo) = picked {
                self.select_demo(demo);
            }
        });
    }

    fn control_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("control_panel").min_width(320.0).show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Screenshot to Code");
                if ui.small_button("← Back to Demos").clicked() {
                    self.show_selector = true;
                }
            });
            match self.player.controller().demo() {
                Some(demo) => ui.label(format!("Demo: {}", demo.name)),
                None => ui.label("Drop a screenshot or browse to get started."),
            };
            ui.separator();

            // Upload area
            let mut remove_image = false;
            match &self.target_image {
                Some(tex) => {
                    ui.add(egui::Image::new(tex).max_height(180.0));
                    ui.colored_label(Color32::DARK_GREEN, "✅ Image uploaded successfully!");
                    remove_image = ui.small_button("Remove image").clicked();
                }
                None => {
                    ui.label("📸 Drop an image here");
                    if ui.button("Browse…").clicked() {
                        if let Some(path) = FileDialog::new().add_filter("Images", IMAGE_EXTENSIONS).pick_file() {
                            self.spawn_image_read(Some(path), None);
                        }
                    }
                }
            }
            if remove_image {
                self.target_image = None;
                self.player.clear_image();
            }
            ui.separator();

            // Design prompt, only for the design demo
            if self.player.controller().demo().is_some_and(|d| d.id == "design") {
                ui.label(RichText::new("📝 Design Prompt").strong());
                ui.add(
                    egui::TextEdit::multiline(&mut self.design_prompt)
                        .hint_text("Describe your design prompt here...")
                        .desired_rows(4)
                        .desired_width(f32::INFINITY),
                );
                ui.separator();
            }

            // Playback controls
            let controller = self.player.controller();
            let state = controller.state();
            let ready = controller.target_ready();
            let percent = controller.progress_percent();
            let caption = controller.current_caption().to_string();
            let error = controller.loading_error().map(str::to_string);

            ui.horizontal(|ui| {
                let label = if state.playing { "⏸ Pause" } else { "▶️ Play" };
                if ui.add_enabled(ready || state.playing, egui::Button::new(label)).clicked() {
                    self.player.toggle_play();
                }
                if ui.button("⟲ Reset").clicked() {
                    self.player.reset();
                }
            });

            ui.add(egui::ProgressBar::new(percent as f32 / 100.0).text(format!("{percent}%")));
            let mut scrub = state.progress;
            if ui
                .add_enabled(ready, egui::Slider::new(&mut scrub, 0.0..=100.0).show_value(false))
                .changed()
            {
                self.player.scrub(scrub.round());
            }
            ui.horizontal(|ui| {
                ui.label("Current Step:");
                ui.label(RichText::new(caption).strong());
            });
            if let Some(message) = error {
                ui.colored_label(Color32::RED, message);
            }
        });
    }

    fn preview_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let controller = self.player.controller();
            let profile = PreviewProfile::for_demo(controller.demo().map(|d| d.id.as_str()));
            ui.horizontal(|ui| {
                ui.heading("Preview");
                ui.label(profile.summary());
            });
            ui.separator();

            let markup = profile.inject_styles(controller.content());
            egui::ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
                let mut text = markup.as_str();
                ui.add(
                    egui::TextEdit::multiline(&mut text)
                        .code_editor()
                        .desired_width(f32::INFINITY),
                );
            });
        });
    }
}

/// GUI update loop: called each frame to redraw and handle interactions
impl App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.drain_background_results(ctx);

        // Drag & drop acquisition of a screenshot
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if let Some(file) = dropped.into_iter().next() {
            self.spawn_image_read(file.path, file.bytes);
        }

        if self.show_selector {
            self.demo_selector(ctx);
        } else {
            self.control_panel(ctx);
            self.preview_panel(ctx);
        }

        // Request periodic repaint so ticks and loads show up
        let playing = self.player.controller().state().playing;
        let next = if playing { self.config.tick } else { Duration::from_millis(100) };
        ctx.request_repaint_after(next);
    }
}
