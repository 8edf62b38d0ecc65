/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

use serde::{Deserialize, Serialize};

use crate::format;

/// Image chosen by the user, kept in memory until submit or reset
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedImage {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DamageType {
    #[default]
    Fire,
    Water,
    Flood,
    Storm,
    Hail,
    Collision,
    Vandalism,
    Theft,
    Other,
}

impl DamageType {
    pub const ALL: &'static [DamageType] = &[
        DamageType::Fire,
        DamageType::Water,
        DamageType::Flood,
        DamageType::Storm,
        DamageType::Hail,
        DamageType::Collision,
        DamageType::Vandalism,
        DamageType::Theft,
        DamageType::Other,
    ];

    /// Value sent as the `damage_type` form field
    pub fn as_str(&self) -> &'static str {
        match self {
            DamageType::Fire => "Fire Damage",
            DamageType::Water => "Water Damage",
            DamageType::Flood => "Flood Damage",
            DamageType::Storm => "Storm Damage",
            DamageType::Hail => "Hail Damage",
            DamageType::Collision => "Collision Damage",
            DamageType::Vandalism => "Vandalism",
            DamageType::Theft => "Theft",
            DamageType::Other => "Other",
        }
    }
}

impl std::fmt::Display for DamageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity, contact and location of the claimant.
/// Field names match the backend's form fields and JSON keys.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Claimant {
    pub policy_holder_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub property_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl Claimant {
    pub fn contact_info(&self) -> String {
        format::format_contact_info(&self.contact_email, &self.contact_phone)
    }

    pub fn location(&self) -> String {
        format::format_location(
            &self.property_address,
            &self.city,
            &self.state,
            &self.zip_code,
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClaimForm {
    pub damage_type: DamageType,
    /// Only sent when `damage_type` is `Other`
    pub custom_damage: String,
    pub claimant: Claimant,
}

impl ClaimForm {
    pub fn select_damage_type(&mut self, damage_type: DamageType) {
        self.damage_type = damage_type;
    }

    pub fn shows_custom_damage(&self) -> bool {
        self.damage_type == DamageType::Other
    }

    fn custom_damage_field(&self) -> Option<String> {
        if self.shows_custom_damage() && !self.custom_damage.is_empty() {
            Some(self.custom_damage.clone())
        } else {
            None
        }
    }
}

/// Structured result of a successful analyze call.
/// Missing keys default to empty so a sparse backend reply still renders.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResult {
    pub image_caption: String,
    pub loss_description: String,
    pub damage_type: String,
    /// Passed back verbatim in the PDF request, so kept as a JSON number
    pub severity_score: Option<serde_json::Number>,
    pub severity_level: String,
    pub affected_components: String,
    pub repair_level: String,
    pub cost_range: String,
    /// Base64 JPEG of the uploaded image, as re-encoded by the backend
    pub image_data: String,
    #[serde(flatten)]
    pub claimant: Claimant,
    pub timestamp: Option<String>,
    pub filename: Option<String>,
}

/// Reply body of `POST /upload`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UploadResponse {
    pub success: bool,
    pub error: Option<String>,
    pub details: Option<String>,
    #[serde(flatten)]
    pub result: AnalysisResult,
}

/// Everything needed to build the `/upload` multipart body
#[derive(Clone, Debug, PartialEq)]
pub struct UploadRequest {
    pub file: SelectedImage,
    pub damage_type: String,
    pub custom_damage: Option<String>,
    pub claimant: Claimant,
}

impl UploadRequest {
    pub fn from_form(file: SelectedImage, form: &ClaimForm) -> Self {
        Self {
            file,
            damage_type: form.damage_type.as_str().to_string(),
            custom_damage: form.custom_damage_field(),
            claimant: form.claimant.clone(),
        }
    }

    /// Text fields of the multipart body, in send order
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let c = &self.claimant;
        let mut fields = vec![("damage_type", self.damage_type.clone())];
        if let Some(custom) = &self.custom_damage {
            fields.push(("custom_damage", custom.clone()));
        }
        fields.extend([
            ("policy_holder_name", c.policy_holder_name.clone()),
            ("contact_email", c.contact_email.clone()),
            ("contact_phone", c.contact_phone.clone()),
            ("property_address", c.property_address.clone()),
            ("city", c.city.clone()),
            ("state", c.state.clone()),
            ("zip_code", c.zip_code.clone()),
        ]);
        fields
    }
}

/// Body of `POST /download`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextExportRequest {
    pub description: String,
    pub damage_type: String,
}

impl TextExportRequest {
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            description: result.loss_description.clone(),
            damage_type: result.damage_type.clone(),
        }
    }
}

/// Body of `POST /download-pdf`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PdfExportRequest {
    pub description: String,
    pub damage_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity_score: Option<serde_json::Number>,
    pub severity_level: String,
    pub affected_components: String,
    pub repair_level: String,
    pub cost_range: String,
    pub policy_holder_name: String,
    pub contact_info: String,
    pub location: String,
    pub image_data: String,
}

impl PdfExportRequest {
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            description: result.loss_description.clone(),
            damage_type: result.damage_type.clone(),
            severity_score: result.severity_score.clone(),
            severity_level: result.severity_level.clone(),
            affected_components: result.affected_components.clone(),
            repair_level: result.repair_level.clone(),
            cost_range: result.cost_range.clone(),
            policy_holder_name: result.claimant.policy_holder_name.clone(),
            contact_info: result.claimant.contact_info(),
            location: result.claimant.location(),
            image_data: result.image_data.clone(),
        }
    }
}
