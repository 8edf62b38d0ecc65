/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! Client configuration.
//!
//! Native builds read `CLAIM_INSIGHT_URL` and `CLAIM_INSIGHT_DOWNLOAD_DIR`
//! (a `.env` file is honoured). In the browser the backend is the page's own
//! origin and files go through the browser's download manager.

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Directory exported files are written to
    #[cfg(not(target_arch = "wasm32"))]
    pub download_dir: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("CLAIM_INSIGHT_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let download_dir = lookup("CLAIM_INSIGHT_DOWNLOAD_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            base_url,
            download_dir,
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl ClientConfig {
    pub fn from_env() -> Self {
        let base_url = web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default();
        if base_url.is_empty() {
            log::warn!("Could not read page origin; requests will fail");
        }
        Self { base_url }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = config(&[]);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.download_dir, PathBuf::from("."));
    }

    #[test]
    fn reads_overrides() {
        let cfg = config(&[
            ("CLAIM_INSIGHT_URL", "https://claims.example.com"),
            ("CLAIM_INSIGHT_DOWNLOAD_DIR", "/tmp/claims"),
        ]);
        assert_eq!(cfg.base_url, "https://claims.example.com");
        assert_eq!(cfg.download_dir, PathBuf::from("/tmp/claims"));
    }

    #[test]
    fn blank_values_fall_back() {
        let cfg = config(&[("CLAIM_INSIGHT_URL", "  ")]);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    }
}
