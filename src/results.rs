/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! Analysis result panel: caption, description, claim info, details table

use egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::error::Action;
use crate::format;
use crate::model::AnalysisResult;
use crate::state::AppState;

const ACCENT: egui::Color32 = egui::Color32::from_rgb(102, 126, 234);

/// Claimant lines as shown in the "Claim Information" block
#[derive(Clone, Debug, PartialEq)]
pub struct ClaimantSummary {
    pub policy_holder: String,
    pub contact: String,
    pub location: String,
}

impl ClaimantSummary {
    pub fn from_result(result: &AnalysisResult) -> Self {
        let c = &result.claimant;
        Self {
            policy_holder: format::format_policy_holder(&c.policy_holder_name),
            contact: c.contact_info(),
            location: c.location(),
        }
    }
}

/// Which export buttons were clicked this frame
#[derive(Default)]
pub struct ResultActions {
    pub download_text: bool,
    pub download_pdf: bool,
}

pub fn render_results(ui: &mut Ui, state: &mut AppState) -> ResultActions {
    let mut actions = ResultActions::default();
    let text_enabled = state.can_export(Action::TextExport);
    let pdf_enabled = state.can_export(Action::PdfExport);
    let exporting = state.in_flight.text_export || state.in_flight.pdf_export;
    let scroll = std::mem::take(&mut state.scroll_to_results);
    let Some(result) = &state.result else {
        return actions;
    };

    let heading = ui.heading("Analysis Results");
    if scroll {
        heading.scroll_to_me(Some(egui::Align::TOP));
    }
    ui.add_space(6.0);

    section_label(ui, "Image Caption");
    ui.label(&result.image_caption);
    ui.add_space(6.0);

    section_label(ui, "Loss Description");
    ui.label(&result.loss_description);
    ui.add_space(6.0);

    section_label(ui, "Damage Type");
    ui.label(RichText::new(&result.damage_type).strong());
    ui.add_space(6.0);

    render_claimant(ui, &ClaimantSummary::from_result(result));
    ui.add_space(6.0);

    render_details(ui, result);
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        if ui
            .add_enabled(text_enabled, egui::Button::new("Download Description"))
            .clicked()
        {
            actions.download_text = true;
        }
        if ui
            .add_enabled(pdf_enabled, egui::Button::new("Download PDF Report"))
            .clicked()
        {
            actions.download_pdf = true;
        }
        if exporting {
            ui.spinner();
        }
    });

    actions
}

fn section_label(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).color(ACCENT).strong());
}

fn render_claimant(ui: &mut Ui, summary: &ClaimantSummary) {
    section_label(ui, "Claim Information");
    egui::Grid::new("claimant_grid")
        .num_columns(2)
        .spacing([10.0, 4.0])
        .show(ui, |ui| {
            ui.strong("Policy Holder:");
            ui.label(&summary.policy_holder);
            ui.end_row();

            ui.strong("Contact Information:");
            ui.label(&summary.contact);
            ui.end_row();

            ui.strong("Location:");
            ui.label(&summary.location);
            ui.end_row();
        });
}

fn render_details(ui: &mut Ui, result: &AnalysisResult) {
    let rows: Vec<(&str, String)> = vec![
        (
            "Severity",
            format::format_severity(result.severity_score.as_ref(), &result.severity_level),
        ),
        ("Affected Components", or_not_specified(&result.affected_components)),
        ("Repair Level", or_not_specified(&result.repair_level)),
        ("Estimated Cost", or_not_specified(&result.cost_range)),
        (
            "Analyzed At",
            or_not_specified(result.timestamp.as_deref().unwrap_or_default()),
        ),
    ];

    section_label(ui, "Assessment");
    ui.push_id("details_table", |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::exact(150.0))
            .column(Column::remainder())
            .body(|mut body| {
                for (label, value) in &rows {
                    body.row(20.0, |mut row| {
                        row.col(|ui| {
                            ui.strong(*label);
                        });
                        row.col(|ui| {
                            ui.label(value);
                        });
                    });
                }
            });
    });
}

fn or_not_specified(value: &str) -> String {
    if value.trim().is_empty() {
        format::NOT_SPECIFIED.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Claimant;

    #[test]
    fn summary_uses_received_values() {
        let result = AnalysisResult {
            claimant: Claimant {
                policy_holder_name: "Dana Reyes".into(),
                contact_email: "dana@example.com".into(),
                property_address: "12 Elm St".into(),
                city: "Troy".into(),
                zip_code: "12180".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            ClaimantSummary::from_result(&result),
            ClaimantSummary {
                policy_holder: "Dana Reyes".into(),
                contact: "dana@example.com".into(),
                location: "12 Elm St, Troy, 12180".into(),
            }
        );
    }

    #[test]
    fn summary_placeholders_for_absent_fields() {
        let summary = ClaimantSummary::from_result(&AnalysisResult::default());
        assert_eq!(summary.policy_holder, format::NOT_SPECIFIED);
        assert_eq!(summary.contact, format::NOT_PROVIDED);
        assert_eq!(summary.location, format::NOT_SPECIFIED);
    }
}
