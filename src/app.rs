// src/app.rs
use crate::classifier::{classify, Recognition, DISTANCE_THRESHOLD};
use crate::data::{SessionLog, DEFAULT_OUTPUT_DIR};
use crate::library::{GestureLibrary, LibraryError};
use crate::tracking::{HandTracker, PerformanceMetrics};
use crate::ui::{draw_hand_overlay, draw_recognition_banner, Theme};
use crate::video::VideoSource;

use eframe::egui;
use egui_extras::{Column, TableBuilder};
use image::DynamicImage;
use std::path::PathBuf;
use std::sync::mpsc;

/// Readiness of the one-shot library load. Classification never blocks on
/// it: until the load finishes the library is empty and every frame is
/// labeled "unknown".
#[derive(Debug, Clone, PartialEq)]
pub enum LibraryStatus {
    Loading(PathBuf),
    Ready,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub library_path: PathBuf,
    pub show_overlay: bool,
    pub auto_export_log: bool,
    pub output_directory: PathBuf,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            library_path: PathBuf::from("gestures.json"),
            show_overlay: true,
            auto_export_log: false,
            output_directory: DEFAULT_OUTPUT_DIR.clone(),
        }
    }
}

pub struct SignTrackerApp {
    // Core components
    tracker: HandTracker,
    video_source: Option<VideoSource>,
    camera_error: Option<String>,
    fallback_frame: DynamicImage,

    // Gesture library
    library: GestureLibrary,
    library_status: LibraryStatus,
    library_rx: Option<mpsc::Receiver<Result<GestureLibrary, LibraryError>>>,

    // Per-frame state
    current_recognition: Recognition,
    current_hand: Option<crate::landmarks::LandmarkSample>,
    tracking_lost: bool,
    metrics: PerformanceMetrics,
    frame_texture: Option<egui::TextureHandle>,
    frame_index: u64,

    // Session logging
    session_log: SessionLog,

    // UI state
    theme: Theme,
    show_settings: bool,
    show_about: bool,
    settings: AppSettings,
    status_line: String,
}

impl SignTrackerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut tracker = HandTracker::new().expect("Failed to initialize tracker");
        tracker.initialize_mediapipe();

        let (video_source, camera_error) = match VideoSource::new_camera(0) {
            Ok(source) => {
                let info = source.get_info();
                eprintln!(
                    "Camera ready: {} {}x{} @ {:.0} fps",
                    info.path.display(),
                    info.width,
                    info.height,
                    info.fps
                );
                (Some(source), None)
            }
            Err(e) => {
                eprintln!("Camera unavailable, running on simulated frames: {}", e);
                (None, Some(e.to_string()))
            }
        };

        let settings = AppSettings::default();
        let mut app = Self {
            tracker,
            video_source,
            camera_error,
            fallback_frame: DynamicImage::new_rgba8(640, 480),
            library: GestureLibrary::empty(),
            library_status: LibraryStatus::Loading(settings.library_path.clone()),
            library_rx: None,
            current_recognition: Recognition::NoHand,
            current_hand: None,
            tracking_lost: false,
            metrics: PerformanceMetrics::new(),
            frame_texture: None,
            frame_index: 0,
            session_log: SessionLog::new(settings.output_directory.clone(), None),
            theme: Theme::default(),
            show_settings: false,
            show_about: false,
            settings,
            status_line: String::new(),
        };

        app.start_library_load(app.settings.library_path.clone());
        app
    }

    /// Kicks off the asynchronous library load. The update loop polls the
    /// channel; until a result arrives the previous (or empty) library stays
    /// in effect.
    fn start_library_load(&mut self, path: PathBuf) {
        tracing::info!(path = %path.display(), "loading gesture library");
        self.library_status = LibraryStatus::Loading(path.clone());
        self.settings.library_path = path.clone();

        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let _ = tx.send(GestureLibrary::load(&path));
        });
        self.library_rx = Some(rx);
    }

    fn poll_library_load(&mut self) {
        let Some(rx) = self.library_rx.as_ref() else { return };
        let received = rx.try_recv();
        match received {
            Ok(Ok(library)) => {
                tracing::info!(
                    gestures = library.gesture_count(),
                    variations = library.variation_count(),
                    "gesture library loaded"
                );
                self.status_line = format!(
                    "Loaded {} gestures ({} variations)",
                    library.gesture_count(),
                    library.variation_count()
                );
                self.library = library;
                self.library_status = LibraryStatus::Ready;
                self.library_rx = None;
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "gesture library load failed");
                // Recoverable: keep classifying against the empty library.
                self.library = GestureLibrary::empty();
                self.library_status = LibraryStatus::Failed(e.to_string());
                self.status_line =
                    "Could not load gestures - every frame will read as unknown".to_string();
                self.library_rx = None;
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                self.library_status =
                    LibraryStatus::Failed("library load thread died".to_string());
                self.library_rx = None;
            }
        }
    }

    /// One iteration of the live loop: capture, track, classify, log.
    fn process_current_frame(&mut self, ctx: &egui::Context) {
        let frame = match &mut self.video_source {
            Some(source) => match source.read_frame() {
                Ok(frame) => frame,
                Err(e) => {
                    self.camera_error = Some(e.to_string());
                    self.fallback_frame.clone()
                }
            },
            None => self.fallback_frame.clone(),
        };

        match self.tracker.process_frame_with_metrics(&frame) {
            Ok((result, metrics)) => {
                self.metrics = metrics;
                self.tracking_lost = result.tracking_lost;
                self.current_recognition = classify(result.hand.as_ref(), &self.library);
                self.current_hand = result.hand;
                self.frame_index += 1;
                self.session_log.add_frame(
                    result.timestamp,
                    self.frame_index,
                    &self.current_recognition,
                );
            }
            Err(e) => {
                eprintln!("Tracking error: {}", e);
            }
        }

        let rgba = frame.to_rgba8();
        let size = [rgba.width() as usize, rgba.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
        self.frame_texture = Some(ctx.load_texture("camera_frame", color_image, Default::default()));
    }

    fn render_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(10.0);
            egui::menu::bar(ui, |ui| {
                ui.heading(
                    egui::RichText::new("Sign Language Gesture Recognition")
                        .color(self.theme.primary),
                );

                ui.separator();

                let tracking_label = if self.tracker.is_using_mediapipe() {
                    "Tracking: MediaPipe"
                } else {
                    "Tracking: simulation"
                };
                ui.label(tracking_label);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⚙ Settings").clicked() {
                        self.show_settings = !self.show_settings;
                    }
                    if ui.button("ℹ About").clicked() {
                        self.show_about = !self.show_about;
                    }
                });
            });
            ui.add_space(10.0);
        });
    }

    fn render_main_content(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |columns| {
                columns[0].group(|ui| {
                    ui.heading("Camera Feed");
                    self.render_video_panel(ui);
                });

                columns[1].vertical(|ui| {
                    ui.group(|ui| {
                        ui.heading("Recognition");
                        draw_recognition_banner(ui, &self.current_recognition, &self.theme);
                        if let Recognition::Sign { distance, .. } = &self.current_recognition {
                            ui.label(format!(
                                "Match distance: {:.3} (threshold {})",
                                distance, DISTANCE_THRESHOLD
                            ));
                        }
                    });

                    ui.add_space(20.0);

                    ui.group(|ui| {
                        ui.heading("Gesture Library");
                        self.render_library_panel(ui);
                    });
                });
            });
        });
    }

    fn render_video_panel(&mut self, ui: &mut egui::Ui) {
        if let Some(texture) = self.frame_texture.as_ref() {
            let available = ui.available_size();
            let width = available.x.max(1.0);
            let size = egui::vec2(width, width * 0.75);

            let response = ui.image((texture.id(), size));

            if self.settings.show_overlay {
                if let Some(hand) = &self.current_hand {
                    let painter = ui.painter_at(response.rect);
                    draw_hand_overlay(&painter, response.rect, hand, &self.theme);
                }
            }
        } else {
            ui.centered_and_justified(|ui| {
                ui.colored_label(self.theme.text_secondary, "No video feed available");
            });
        }

        if self.tracking_lost {
            ui.colored_label(self.theme.error, "Tracking lost");
        }
        if let Some(error) = &self.camera_error {
            ui.colored_label(self.theme.warning, format!("Camera: {}", error));
        }
    }

    fn render_library_panel(&mut self, ui: &mut egui::Ui) {
        match &self.library_status {
            LibraryStatus::Loading(path) => {
                ui.label(format!("Loading {} ...", path.display()));
                ui.spinner();
            }
            LibraryStatus::Failed(message) => {
                ui.colored_label(
                    self.theme.error,
                    format!("Could not load gestures: {}", message),
                );
                ui.label("Check that the gesture file exists and is valid JSON.");
            }
            LibraryStatus::Ready => {
                if self.library.is_empty() {
                    ui.label("Library is empty - every frame will read as unknown.");
                } else {
                    TableBuilder::new(ui)
                        .striped(true)
                        .column(Column::remainder())
                        .column(Column::auto())
                        .header(20.0, |mut header| {
                            header.col(|ui| {
                                ui.strong("Gesture");
                            });
                            header.col(|ui| {
                                ui.strong("Variations");
                            });
                        })
                        .body(|mut body| {
                            for entry in self.library.entries() {
                                body.row(18.0, |mut row| {
                                    row.col(|ui| {
                                        ui.label(&entry.name);
                                    });
                                    row.col(|ui| {
                                        ui.label(entry.variations.len().to_string());
                                    });
                                });
                            }
                        });
                }
            }
        }
    }

    fn render_control_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if ui.button("📁 Load Library...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("JSON", &["json"])
                        .pick_file()
                    {
                        self.start_library_load(path);
                    }
                }

                if ui.button("💾 Export Session Log").clicked() {
                    self.export_session_log();
                }

                ui.separator();
                ui.checkbox(&mut self.settings.show_overlay, "Hand overlay");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!(
                        "{:.0} fps | {:.0} ms | hand in {:.0}% of frames",
                        self.metrics.avg_fps,
                        self.metrics.avg_processing_time * 1000.0,
                        self.metrics.detection_rate * 100.0
                    ));
                    ui.separator();
                    if !self.status_line.is_empty() {
                        ui.label(&self.status_line);
                    }
                });
            });
            ui.add_space(10.0);
        });
    }

    fn export_session_log(&mut self) {
        match self.session_log.export_csv() {
            Ok(path) => {
                self.status_line = format!(
                    "Wrote {} frames ({} matched) to {}",
                    self.session_log.frame_count(),
                    self.session_log.matched_count(),
                    path.display()
                );
            }
            Err(e) => {
                self.status_line = format!("Export failed: {}", e);
            }
        }
    }

    fn render_settings_window(&mut self, ctx: &egui::Context) {
        let mut show_settings = self.show_settings;
        egui::Window::new("Settings")
            .open(&mut show_settings)
            .resizable(true)
            .default_size([400.0, 400.0])
            .show(ctx, |ui| {
                ui.heading("Tracking Settings");
                ui.add_space(10.0);

                let config = self.tracker.config_mut();
                ui.label("Detection Confidence:");
                ui.add(
                    egui::Slider::new(&mut config.min_detection_confidence, 0.0..=1.0)
                        .step_by(0.01),
                );
                ui.label("Tracking Confidence:");
                ui.add(
                    egui::Slider::new(&mut config.min_tracking_confidence, 0.0..=1.0)
                        .step_by(0.01),
                );

                ui.separator();
                ui.heading("Matching");
                ui.label(format!(
                    "Acceptance threshold: {} (fixed, in normalized-distance units)",
                    DISTANCE_THRESHOLD
                ));

                ui.separator();
                ui.heading("Output Settings");
                ui.checkbox(&mut self.settings.auto_export_log, "Export log on exit");
                ui.label("Output Directory:");
                ui.label(self.settings.output_directory.display().to_string());
            });
        self.show_settings = show_settings;
    }

    fn render_about_window(&mut self, ctx: &egui::Context) {
        egui::Window::new("About")
            .open(&mut self.show_about)
            .resizable(false)
            .default_size([400.0, 300.0])
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading("Sign Language Gesture Recognition");
                    ui.label("Version 0.1.0");
                    ui.add_space(20.0);
                    ui.label("Matches live hand landmarks against a library");
                    ui.label("of recorded signs by nearest-neighbor distance.");
                });
            });
    }
}

impl eframe::App for SignTrackerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_library_load();
        self.process_current_frame(ctx);

        self.render_header(ctx);
        self.render_control_panel(ctx);

        if self.show_settings {
            self.render_settings_window(ctx);
        }
        if self.show_about {
            self.render_about_window(ctx);
        }

        self.render_main_content(ctx);

        // Keep the frame loop running
        ctx.request_repaint();
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if self.settings.auto_export_log && self.session_log.frame_count() > 0 {
            if let Err(e) = self.session_log.export_csv() {
                eprintln!("Failed to export session log on exit: {}", e);
            }
        }
        self.tracker.shutdown_mediapipe();
    }
}
