/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! Image intake checks run before a file is accepted into the form.

use crate::error::ClaimError;
use crate::model::SelectedImage;

/// Largest upload the backend accepts (16 MiB)
pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

const ACCEPTED_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/gif"];

/// `accept` attribute for the browser file dialog
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub const ACCEPT_ATTR: &str = "image/jpeg,image/png,image/gif";

/// Validate MIME type first, then size. Nothing else is inspected.
pub fn validate(image: &SelectedImage) -> Result<(), ClaimError> {
    if !is_accepted_mime(&image.mime) {
        return Err(ClaimError::UnsupportedType {
            mime: image.mime.clone(),
        });
    }

    let size = image.bytes.len() as u64;
    if size > MAX_UPLOAD_BYTES {
        return Err(ClaimError::TooLarge { size });
    }

    Ok(())
}

pub fn is_accepted_mime(mime: &str) -> bool {
    ACCEPTED_MIME_TYPES.contains(&mime)
}

/// Guess a MIME type from the file extension. Used when the platform gives
/// none (native paths, some drag-and-drop sources).
pub fn mime_from_name(name: &str) -> Option<&'static str> {
    let ext = name.rsplit_once('.')?.1.to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// Build a `SelectedImage`, preferring the reported MIME type over the name.
pub fn selected_image(name: String, reported_mime: &str, bytes: Vec<u8>) -> SelectedImage {
    let mime = if reported_mime.is_empty() {
        mime_from_name(&name).unwrap_or("application/octet-stream").to_string()
    } else {
        reported_mime.to_string()
    };
    SelectedImage { name, mime, bytes }
}
