/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! Main eframe::App implementation
//! Async requests push completions into a shared queue; the UI drains it each frame.

use std::sync::{Arc, Mutex, PoisonError};

use eframe::egui;
use egui::RichText;

use crate::api::ClaimClient;
use crate::config::ClientConfig;
use crate::download;
use crate::error::{Action, ClaimError};
use crate::intake;
use crate::model::{AnalysisResult, DamageType, SelectedImage};
use crate::preview::{self, PreviewImage};
use crate::results;
use crate::state::AppState;
use crate::task;

#[cfg(target_arch = "wasm32")]
use crate::file_picker;

const ACCENT: egui::Color32 = egui::Color32::from_rgb(102, 126, 234);
const ERROR_FG: egui::Color32 = egui::Color32::from_rgb(204, 51, 51);
const ERROR_BG: egui::Color32 = egui::Color32::from_rgb(255, 238, 238);

/// Message from a finished async task back to the UI thread
enum Completion {
    #[cfg(target_arch = "wasm32")]
    Picked(Result<Option<SelectedImage>, String>),
    Previewed {
        revision: u64,
        outcome: Result<PreviewImage, String>,
    },
    Analyzed {
        epoch: u64,
        outcome: Result<AnalysisResult, ClaimError>,
    },
    Exported {
        action: Action,
        outcome: Result<String, ClaimError>,
    },
}

/// Handle given to tasks for posting their completion
#[derive(Clone)]
struct Inbox {
    queue: Arc<Mutex<Vec<Completion>>>,
    ctx: egui::Context,
}

impl Inbox {
    fn post(&self, completion: Completion) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(completion);
        self.ctx.request_repaint();
    }
}

/// What the user asked for this frame; applied after the panels are drawn
#[derive(Default)]
struct Intents {
    browse: bool,
    analyze: bool,
    reset: bool,
    download_text: bool,
    download_pdf: bool,
}

pub struct ClaimInsightApp {
    state: AppState,
    config: ClientConfig,
    client: ClaimClient,
    completed_queue: Arc<Mutex<Vec<Completion>>>,
    preview_texture: Option<egui::TextureHandle>,
    preview_loaded_for: Option<u64>,
    /// Native stand-in for the browser file dialog
    #[cfg(not(target_arch = "wasm32"))]
    path_input: String,
}

impl ClaimInsightApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: ClientConfig) -> Self {
        log::info!("ClaimInsight started against {}", config.base_url);
        Self {
            state: AppState::new(),
            client: ClaimClient::new(&config.base_url),
            config,
            completed_queue: Arc::new(Mutex::new(Vec::new())),
            preview_texture: None,
            preview_loaded_for: None,
            #[cfg(not(target_arch = "wasm32"))]
            path_input: String::new(),
        }
    }

    fn inbox(&self, ctx: &egui::Context) -> Inbox {
        Inbox {
            queue: Arc::clone(&self.completed_queue),
            ctx: ctx.clone(),
        }
    }

    fn start_analyze(&mut self, ctx: &egui::Context) {
        let Ok(request) = self.state.begin_analyze() else {
            return;
        };
        let epoch = self.state.epoch();
        let client = self.client.clone();
        let inbox = self.inbox(ctx);

        task::spawn(async move {
            let outcome = client.analyze(request).await;
            inbox.post(Completion::Analyzed { epoch, outcome });
        });
    }

    fn start_text_export(&mut self, ctx: &egui::Context) {
        let Ok(job) = self.state.begin_text_export() else {
            return;
        };
        let client = self.client.clone();
        let config = self.config.clone();
        let inbox = self.inbox(ctx);

        task::spawn(async move {
            let outcome = match client.download_text(&job.request).await {
                Ok(bytes) => {
                    download::save_export(config, job.filename, bytes, download::TEXT_MIME).await
                }
                Err(e) => Err(e),
            };
            inbox.post(Completion::Exported {
                action: Action::TextExport,
                outcome,
            });
        });
    }

    fn start_pdf_export(&mut self, ctx: &egui::Context) {
        let today = chrono::Utc::now().date_naive();
        let Ok(job) = self.state.begin_pdf_export(today) else {
            return;
        };
        let client = self.client.clone();
        let config = self.config.clone();
        let inbox = self.inbox(ctx);

        task::spawn(async move {
            let outcome = match client.download_pdf(&job.request).await {
                Ok(bytes) => {
                    download::save_export(config, job.filename, bytes, download::PDF_MIME).await
                }
                Err(e) => Err(e),
            };
            inbox.post(Completion::Exported {
                action: Action::PdfExport,
                outcome,
            });
        });
    }

    /// Validate a file, then decode its preview in the background
    fn take_file(&mut self, ctx: &egui::Context, image: SelectedImage) {
        let Ok(revision) = self.state.accept_file(image) else {
            return;
        };
        let Some(bytes) = self.state.selected.as_ref().map(|s| s.bytes.clone()) else {
            return;
        };
        let inbox = self.inbox(ctx);

        task::spawn(async move {
            let outcome = task::blocking(move || preview::decode_preview(&bytes))
                .await
                .and_then(|decoded| decoded);
            inbox.post(Completion::Previewed { revision, outcome });
        });
    }

    #[cfg(target_arch = "wasm32")]
    fn browse(&mut self, ctx: &egui::Context) {
        let inbox = self.inbox(ctx);
        task::spawn(async move {
            let picked = file_picker::pick_image().await;
            inbox.post(Completion::Picked(picked));
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn browse(&mut self, ctx: &egui::Context) {
        let path = self.path_input.trim().to_string();
        if path.is_empty() {
            self.state
                .show_error_message("Enter the path of an image file to open.".into());
            return;
        }
        self.load_path(ctx, std::path::Path::new(&path));
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn load_path(&mut self, ctx: &egui::Context, path: &std::path::Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match std::fs::read(path) {
            Ok(bytes) => self.take_file(ctx, intake::selected_image(name, "", bytes)),
            Err(e) => {
                log::error!("Failed to read {}: {}", path.display(), e);
                self.state
                    .show_error_message(format!("Could not read {}: {}", path.display(), e));
            }
        }
    }

    /// Drain completed tasks (called each frame)
    fn poll_results(&mut self, ctx: &egui::Context) {
        let completed: Vec<Completion> = self
            .completed_queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();

        for completion in completed {
            match completion {
                #[cfg(target_arch = "wasm32")]
                Completion::Picked(Ok(Some(image))) => self.take_file(ctx, image),
                #[cfg(target_arch = "wasm32")]
                Completion::Picked(Ok(None)) => {}
                #[cfg(target_arch = "wasm32")]
                Completion::Picked(Err(e)) => {
                    log::error!("File picker error: {}", e);
                    self.state.show_error_message(e);
                }
                Completion::Previewed { revision, outcome } => {
                    if self.state.finish_preview(revision, outcome) {
                        self.preview_loaded_for = None;
                    }
                }
                Completion::Analyzed { epoch, outcome } => {
                    self.state.finish_analyze(epoch, outcome);
                }
                Completion::Exported { action, outcome } => {
                    self.state.finish_export(action, outcome);
                }
            }
        }
    }

    /// Drag-and-drop: highlight while hovering, take the first dropped file
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) = ctx.input(|i| {
            (
                !i.raw.hovered_files.is_empty(),
                i.raw.dropped_files.first().cloned(),
            )
        });
        self.state.drag_hover = hovering;

        let Some(file) = dropped else {
            return;
        };
        if let Some(bytes) = &file.bytes {
            let image = intake::selected_image(file.name.clone(), &file.mime, bytes.to_vec());
            self.take_file(ctx, image);
            return;
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Some(path) = &file.path {
                self.path_input = path.display().to_string();
                self.load_path(ctx, path);
            }
        }
    }

    /// Upload a new texture when the selected file changes
    fn update_preview(&mut self, ctx: &egui::Context) {
        if self.preview_loaded_for == Some(self.state.file_revision) {
            return;
        }
        self.preview_texture = self.state.preview.as_ref().filter(|p| !p.is_empty()).map(|p| {
            let name = self
                .state
                .selected
                .as_ref()
                .map_or("preview", |s| s.name.as_str());
            ctx.load_texture(name, p.to_color_image(), egui::TextureOptions::LINEAR)
        });
        self.preview_loaded_for = Some(self.state.file_revision);
    }

    fn render_error_banner(&mut self, ui: &mut egui::Ui) {
        let Some(message) = self.state.error.clone() else {
            return;
        };
        let mut dismiss = false;
        let response = egui::Frame::group(ui.style())
            .fill(ERROR_BG)
            .stroke(egui::Stroke::new(1.0, ERROR_FG))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(ERROR_FG, &message);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("✕").clicked() {
                            dismiss = true;
                        }
                    });
                });
            })
            .response;
        if std::mem::take(&mut self.state.scroll_to_error) {
            response.scroll_to_me(Some(egui::Align::TOP));
        }
        if dismiss {
            self.state.hide_error();
        }
        ui.add_space(8.0);
    }

    fn render_upload_area(&mut self, ui: &mut egui::Ui, intents: &mut Intents) {
        let border = if self.state.drag_hover {
            ACCENT
        } else {
            egui::Color32::GRAY
        };

        if self.state.selected.is_none() {
            let response = egui::Frame::group(ui.style())
                .stroke(egui::Stroke::new(2.0, border))
                .inner_margin(24.0)
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.vertical_centered(|ui| {
                        ui.label(
                            RichText::new("Click or drag an image here")
                                .size(18.0)
                                .color(ACCENT),
                        );
                        ui.label(
                            RichText::new("JPEG, PNG or GIF, up to 16MB")
                                .color(egui::Color32::GRAY),
                        );
                    });
                })
                .response
                .interact(egui::Sense::click());
            if response.clicked() {
                intents.browse = true;
            }
        } else {
            self.render_preview(ui);
        }

        #[cfg(not(target_arch = "wasm32"))]
        ui.horizontal(|ui| {
            ui.label("Image path");
            let edit = ui.add(
                egui::TextEdit::singleline(&mut self.path_input)
                    .hint_text("/path/to/damage.jpg")
                    .desired_width(320.0),
            );
            let entered = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Open").clicked() || entered {
                intents.browse = true;
            }
        });

        #[cfg(target_arch = "wasm32")]
        {
            if self.state.selected.is_some() && ui.button("Choose another image").clicked() {
                intents.browse = true;
            }
        }
    }

    fn render_preview(&self, ui: &mut egui::Ui) {
        let Some(selected) = &self.state.selected else {
            return;
        };
        ui.group(|ui| {
            if let Some(texture) = &self.preview_texture {
                let max_width = ui.available_width().min(420.0);
                let [tw, th] = texture.size();
                let scale = (max_width / tw as f32).min(1.0);
                ui.image(egui::load::SizedTexture::new(
                    texture.id(),
                    egui::vec2(tw as f32 * scale, th as f32 * scale),
                ));
            } else {
                ui.colored_label(egui::Color32::GRAY, "Preview unavailable");
            }
            ui.label(RichText::new(&selected.name).strong());
        });
    }

    fn render_form(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("claim_form_grid")
            .num_columns(2)
            .spacing([10.0, 4.0])
            .striped(true)
            .show(ui, |ui| {
                ui.label("Damage Type");
                let mut selected = self.state.form.damage_type;
                egui::ComboBox::from_id_salt("damage_type")
                    .selected_text(selected.as_str())
                    .show_ui(ui, |ui| {
                        for damage_type in DamageType::ALL {
                            ui.selectable_value(&mut selected, *damage_type, damage_type.as_str());
                        }
                    });
                if selected != self.state.form.damage_type {
                    self.state.form.select_damage_type(selected);
                }
                ui.end_row();

                if self.state.form.shows_custom_damage() {
                    ui.label("Describe Damage");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.state.form.custom_damage)
                            .hint_text("e.g. Mold, Earthquake")
                            .desired_width(f32::INFINITY),
                    );
                    ui.end_row();
                }

                let c = &mut self.state.form.claimant;
                for (label, value) in [
                    ("Policy Holder Name", &mut c.policy_holder_name),
                    ("Email", &mut c.contact_email),
                    ("Phone", &mut c.contact_phone),
                    ("Property Address", &mut c.property_address),
                    ("City", &mut c.city),
                    ("State", &mut c.state),
                    ("ZIP Code", &mut c.zip_code),
                ] {
                    ui.label(label);
                    ui.add(egui::TextEdit::singleline(value).desired_width(f32::INFINITY));
                    ui.end_row();
                }
            });
    }

    fn apply(&mut self, ctx: &egui::Context, intents: Intents) {
        if intents.browse {
            self.browse(ctx);
        }
        if intents.analyze {
            self.start_analyze(ctx);
        }
        if intents.download_text {
            self.start_text_export(ctx);
        }
        if intents.download_pdf {
            self.start_pdf_export(ctx);
        }
        if intents.reset {
            self.state.reset();
            #[cfg(not(target_arch = "wasm32"))]
            self.path_input.clear();
        }
    }
}

impl eframe::App for ClaimInsightApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_results(ctx);

        // Keep repainting while a request is in flight
        if self.state.in_flight.any() {
            ctx.request_repaint();
        }

        self.handle_dropped_files(ctx);
        self.update_preview(ctx);

        let mut intents = Intents::default();

        // Top panel: title + status
        egui::Panel::top("top_panel").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.heading("ClaimInsight");
                ui.label(RichText::new("AI loss description generator").color(egui::Color32::GRAY));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let label = if self.state.sidebar_open { "Close" } else { "About" };
                    if ui.button(label).clicked() {
                        self.state.sidebar_open = !self.state.sidebar_open;
                    }
                });
            });
            ui.horizontal(|ui| {
                if self.state.in_flight.any() {
                    ui.spinner();
                }
                ui.label(&self.state.status_message);
            });
            ui.add_space(2.0);
        });

        if self.state.sidebar_open {
            egui::Panel::right("about_panel")
                .resizable(true)
                .default_size(260.0)
                .min_size(180.0)
                .show(ctx, |ui| {
                    ui.strong("How it works");
                    ui.separator();
                    ui.label("1. Drop or choose a photo of the damage.");
                    ui.label("2. Pick the damage type and fill in the claimant details.");
                    ui.label("3. Generate a loss description from the image.");
                    ui.label("4. Download it as text or as a PDF report.");
                    ui.add_space(8.0);
                    ui.label(
                        RichText::new(format!("Backend: {}", self.config.base_url))
                            .color(egui::Color32::GRAY),
                    );
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_error_banner(ui);
                self.render_upload_area(ui, &mut intents);
                ui.add_space(8.0);
                self.render_form(ui);
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(
                            self.state.can_submit(),
                            egui::Button::new("Generate Description"),
                        )
                        .clicked()
                    {
                        intents.analyze = true;
                    }
                    if ui.button("Reset").clicked() {
                        intents.reset = true;
                    }
                });

                if self.state.is_loading() {
                    ui.add_space(12.0);
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Analyzing image and generating description...");
                    });
                }

                if self.state.results_visible {
                    ui.add_space(12.0);
                    ui.separator();
                    let actions = results::render_results(ui, &mut self.state);
                    intents.download_text = actions.download_text;
                    intents.download_pdf = actions.download_pdf;
                }
            });
        });

        self.apply(ctx, intents);
    }
}
