/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! Errors surfaced by the claim form.
//!
//! Validation errors are raised before any network call. `Rejected` carries
//! an application-level failure reported by the backend, `Transport` a
//! request that never produced a usable response. `Busy` is internal: it
//! only tells the caller an action was refused because one is in flight.

use thiserror::Error;

use crate::intake::MAX_UPLOAD_BYTES;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    #[error("Please select a valid image file (JPEG, PNG, or GIF)")]
    UnsupportedType { mime: String },

    #[error("File size too large. Please select an image smaller than 16MB.")]
    TooLarge { size: u64 },

    #[error("Please select an image file first.")]
    NoFile,

    #[error("No data available. Please generate a description first.")]
    NoResult,

    #[error("{0} is already in progress")]
    Busy(Action),

    /// Backend answered but refused the request.
    #[error("{0}")]
    Rejected(String),

    #[error("{context} error: {message}")]
    Transport {
        context: &'static str,
        message: String,
    },

    #[error("Could not save {filename}: {message}")]
    Save { filename: String, message: String },
}

impl ClaimError {
    pub fn transport(context: &'static str, err: impl std::fmt::Display) -> Self {
        ClaimError::Transport {
            context,
            message: err.to_string(),
        }
    }

    /// Whether the error belongs in the banner. `Busy` never does.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, ClaimError::Busy(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ClaimError::UnsupportedType { .. }
                | ClaimError::TooLarge { .. }
                | ClaimError::NoFile
                | ClaimError::NoResult
        )
    }
}

/// The three network actions the form can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Analyze,
    TextExport,
    PdfExport,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Analyze => write!(f, "Analysis"),
            Action::TextExport => write!(f, "Text download"),
            Action::PdfExport => write!(f, "PDF download"),
        }
    }
}

// Keeps the size message in step with the limit.
const _: () = assert!(MAX_UPLOAD_BYTES == 16 * 1024 * 1024);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_message_is_prefixed() {
        let err = ClaimError::transport("Network", "connection refused");
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn busy_is_hidden_from_banner() {
        assert!(!ClaimError::Busy(Action::Analyze).is_user_visible());
        assert!(ClaimError::NoFile.is_user_visible());
        assert!(ClaimError::NoResult.is_validation());
        assert!(!ClaimError::Rejected("x".into()).is_validation());
    }
}
