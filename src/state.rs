/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! View-model for the claim form.
//!
//! Every user action goes through a `begin_*` method that validates and
//! returns the request to send, and a matching `finish_*` method that the
//! UI calls with the completion. The UI only reads this state; it never
//! keeps its own copy of the result.

use chrono::NaiveDate;

use crate::error::{Action, ClaimError};
use crate::format;
use crate::intake;
use crate::model::{
    AnalysisResult, ClaimForm, PdfExportRequest, SelectedImage, TextExportRequest, UploadRequest,
};
use crate::preview::PreviewImage;

/// Request-in-flight flags, one per network action
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InFlight {
    pub analyze: bool,
    pub text_export: bool,
    pub pdf_export: bool,
}

impl InFlight {
    pub fn get(&self, action: Action) -> bool {
        match action {
            Action::Analyze => self.analyze,
            Action::TextExport => self.text_export,
            Action::PdfExport => self.pdf_export,
        }
    }

    fn set(&mut self, action: Action, value: bool) {
        match action {
            Action::Analyze => self.analyze = value,
            Action::TextExport => self.text_export = value,
            Action::PdfExport => self.pdf_export = value,
        }
    }

    pub fn any(&self) -> bool {
        self.analyze || self.text_export || self.pdf_export
    }
}

/// A pending export: where to send it and what to call the saved file
#[derive(Clone, Debug, PartialEq)]
pub struct ExportJob<R> {
    pub request: R,
    pub filename: String,
}

pub struct AppState {
    pub form: ClaimForm,
    pub selected: Option<SelectedImage>,
    pub preview: Option<PreviewImage>,
    /// Bumped whenever the selected file changes, so the UI can refresh its texture
    pub file_revision: u64,
    pub result: Option<AnalysisResult>,
    pub results_visible: bool,
    pub in_flight: InFlight,
    pub error: Option<String>,
    pub status_message: String,
    pub scroll_to_results: bool,
    pub scroll_to_error: bool,
    pub drag_hover: bool,
    pub sidebar_open: bool,
    /// Bumped by reset; completions started under an older epoch are stale
    epoch: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            form: ClaimForm::default(),
            selected: None,
            preview: None,
            file_revision: 0,
            result: None,
            results_visible: false,
            in_flight: InFlight::default(),
            error: None,
            status_message: "Select an image of the damage to begin".into(),
            scroll_to_results: false,
            scroll_to_error: false,
            drag_hover: false,
            sidebar_open: false,
            epoch: 0,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn can_submit(&self) -> bool {
        self.selected.is_some() && !self.in_flight.analyze
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.analyze
    }

    pub fn can_export(&self, action: Action) -> bool {
        self.result.is_some() && !self.in_flight.analyze && !self.in_flight.get(action)
    }

    pub fn show_error(&mut self, err: &ClaimError) {
        if !err.is_user_visible() {
            log::debug!("{}", err);
            return;
        }
        if err.is_validation() {
            log::warn!("{}", err);
        }
        self.show_error_message(err.to_string());
    }

    pub fn show_error_message(&mut self, message: String) {
        self.error = Some(message);
        self.scroll_to_error = true;
    }

    pub fn hide_error(&mut self) {
        self.error = None;
    }

    /// Validate and take a file into the form. A rejected file leaves the
    /// previous selection in place. The preview is decoded separately and
    /// delivered through `finish_preview` with the returned revision.
    pub fn accept_file(&mut self, image: SelectedImage) -> Result<u64, ClaimError> {
        if let Err(e) = intake::validate(&image) {
            log::warn!(
                "Rejected {} ({}, {} bytes): {}",
                image.name,
                image.mime,
                image.bytes.len(),
                e
            );
            self.show_error(&e);
            return Err(e);
        }

        log::info!("Selected {} ({}, {} bytes)", image.name, image.mime, image.bytes.len());
        self.status_message = format!("Ready to analyze {}", image.name);
        self.selected = Some(image);
        self.preview = None;
        self.file_revision += 1;
        self.hide_error();
        Ok(self.file_revision)
    }

    /// Store a decoded preview if the file it was decoded from is still selected
    pub fn finish_preview(&mut self, revision: u64, outcome: Result<PreviewImage, String>) -> bool {
        if revision != self.file_revision {
            log::debug!("Dropping preview for replaced file (revision {})", revision);
            return false;
        }
        match outcome {
            Ok(preview) => self.preview = Some(preview),
            Err(e) => {
                let name = self.selected.as_ref().map_or("", |s| s.name.as_str());
                log::warn!("No preview for {}: {}", name, e);
                self.preview = None;
            }
        }
        true
    }

    pub fn begin_analyze(&mut self) -> Result<UploadRequest, ClaimError> {
        let result = self.try_begin_analyze();
        if let Err(e) = &result {
            self.show_error(e);
        }
        result
    }

    fn try_begin_analyze(&mut self) -> Result<UploadRequest, ClaimError> {
        if self.in_flight.analyze {
            return Err(ClaimError::Busy(Action::Analyze));
        }
        let file = self.selected.clone().ok_or(ClaimError::NoFile)?;

        self.in_flight.set(Action::Analyze, true);
        self.results_visible = false;
        self.status_message = format!("Analyzing {}...", file.name);
        Ok(UploadRequest::from_form(file, &self.form))
    }

    /// Apply an analyze completion started under `epoch`. Loading is
    /// released whatever the outcome.
    pub fn finish_analyze(&mut self, epoch: u64, outcome: Result<AnalysisResult, ClaimError>) {
        self.in_flight.set(Action::Analyze, false);

        if epoch != self.epoch {
            log::info!("Discarding analysis started before reset");
            return;
        }

        match outcome {
            Ok(result) => {
                log::info!(
                    "Analysis complete: {} ({})",
                    result.damage_type,
                    result.severity_level
                );
                self.result = Some(result);
                self.results_visible = true;
                self.scroll_to_results = true;
                self.status_message = "Description generated".into();
            }
            Err(e) => {
                log::error!("Analysis failed: {}", e);
                self.status_message = "Analysis failed".into();
                self.show_error(&e);
            }
        }
    }

    pub fn begin_text_export(&mut self) -> Result<ExportJob<TextExportRequest>, ClaimError> {
        let job = self.try_begin_export(Action::TextExport).map(|result| ExportJob {
            request: TextExportRequest::from_result(result),
            filename: format::text_export_filename(&result.damage_type),
        });
        self.started(Action::TextExport, job)
    }

    pub fn begin_pdf_export(
        &mut self,
        today: NaiveDate,
    ) -> Result<ExportJob<PdfExportRequest>, ClaimError> {
        let job = self.try_begin_export(Action::PdfExport).map(|result| ExportJob {
            request: PdfExportRequest::from_result(result),
            filename: format::pdf_export_filename(&result.damage_type, today),
        });
        self.started(Action::PdfExport, job)
    }

    fn try_begin_export(&self, action: Action) -> Result<&AnalysisResult, ClaimError> {
        if self.in_flight.get(action) {
            return Err(ClaimError::Busy(action));
        }
        if self.in_flight.analyze {
            return Err(ClaimError::Busy(Action::Analyze));
        }
        self.result.as_ref().ok_or(ClaimError::NoResult)
    }

    fn started<T>(
        &mut self,
        action: Action,
        job: Result<ExportJob<T>, ClaimError>,
    ) -> Result<ExportJob<T>, ClaimError> {
        match &job {
            Ok(job) => {
                self.in_flight.set(action, true);
                self.status_message = format!("Preparing {}...", job.filename);
            }
            Err(e) => self.show_error(e),
        }
        job
    }

    /// Apply an export completion; `Ok` carries where the file was saved
    pub fn finish_export(&mut self, action: Action, outcome: Result<String, ClaimError>) {
        self.in_flight.set(action, false);
        match outcome {
            Ok(location) => {
                log::info!("{} saved to {}", action, location);
                self.status_message = format!("Saved {}", location);
            }
            Err(e) => {
                log::error!("{} failed: {}", action, e);
                self.status_message = format!("{} failed", action);
                self.show_error(&e);
            }
        }
    }

    /// Back to the initial upload state. Form text fields are kept.
    pub fn reset(&mut self) {
        self.selected = None;
        self.preview = None;
        self.file_revision += 1;
        self.results_visible = false;
        self.result = None;
        self.epoch += 1;
        self.status_message = "Select an image of the damage to begin".into();
    }
}
