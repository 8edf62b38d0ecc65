/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! Display strings and export filenames derived from claim data.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

pub const NOT_SPECIFIED: &str = "Not specified";
pub const NOT_PROVIDED: &str = "Not provided";

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
/// Path separators and characters that Windows refuses in file names
static UNSAFE_FILENAME_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1f]"#).unwrap());

/// `email | phone`, skipping blank parts: ("", "555-1212") → "555-1212"
pub fn format_contact_info(email: &str, phone: &str) -> String {
    join_present(&[email, phone], " | ").unwrap_or_else(|| NOT_PROVIDED.to_string())
}

/// Comma-joined address parts, skipping blanks:
/// ("12 Elm St", "Troy", "", "12180") → "12 Elm St, Troy, 12180"
pub fn format_location(address: &str, city: &str, state: &str, zip_code: &str) -> String {
    join_present(&[address, city, state, zip_code], ", ")
        .unwrap_or_else(|| NOT_SPECIFIED.to_string())
}

pub fn format_policy_holder(name: &str) -> String {
    if name.trim().is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        name.to_string()
    }
}

fn join_present(parts: &[&str], sep: &str) -> Option<String> {
    let present: Vec<&str> = parts
        .iter()
        .copied()
        .filter(|p| !p.trim().is_empty())
        .collect();
    if present.is_empty() {
        None
    } else {
        Some(present.join(sep))
    }
}

/// Damage type as it may appear inside a single file name component.
/// The backend echoes free text here: "Roof/Gutter" → "Roof_Gutter".
fn filename_part(damage_type: &str) -> String {
    UNSAFE_FILENAME_CHAR.replace_all(damage_type, "_").into_owned()
}

/// `loss_description_Water_Damage.txt`
pub fn text_export_filename(damage_type: &str) -> String {
    format!(
        "loss_description_{}.txt",
        filename_part(&damage_type.replace(' ', "_"))
    )
}

/// `ClaimInsight_Water_Damage_2025-06-01.pdf`
pub fn pdf_export_filename(damage_type: &str, date: NaiveDate) -> String {
    format!(
        "ClaimInsight_{}_{}.pdf",
        filename_part(&WHITESPACE_RUN.replace_all(damage_type, "_")),
        date.format("%Y-%m-%d")
    )
}

/// Severity line shown in the details table: "72/100 (High)"
pub fn format_severity(score: Option<&serde_json::Number>, level: &str) -> String {
    match (score, level.trim().is_empty()) {
        (Some(score), false) => format!("{}/100 ({})", score, level),
        (Some(score), true) => format!("{}/100", score),
        (None, false) => level.to_string(),
        (None, true) => NOT_SPECIFIED.to_string(),
    }
}
