/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! Save an exported file on the client.
//! Browser: trigger a download of a Blob. Native: write into the download dir.

use crate::config::ClientConfig;
use crate::error::ClaimError;
use crate::task;

pub const TEXT_MIME: &str = "text/plain;charset=utf-8";
pub const PDF_MIME: &str = "application/pdf";

/// Save `data` as `filename`; returns where it went, for the status line.
pub fn save_file(
    config: &ClientConfig,
    filename: &str,
    data: &[u8],
    mime_type: &str,
) -> Result<String, ClaimError> {
    save_impl(config, filename, data, mime_type).map_err(|message| ClaimError::Save {
        filename: filename.to_string(),
        message,
    })
}

/// `save_file` off the UI and async threads; used by the export tasks.
pub async fn save_export(
    config: ClientConfig,
    filename: String,
    data: Vec<u8>,
    mime_type: &'static str,
) -> Result<String, ClaimError> {
    let name = filename.clone();
    task::blocking(move || save_file(&config, &filename, &data, mime_type))
        .await
        .unwrap_or_else(|message| {
            Err(ClaimError::Save {
                filename: name,
                message,
            })
        })
}

#[cfg(not(target_arch = "wasm32"))]
fn save_impl(
    config: &ClientConfig,
    filename: &str,
    data: &[u8],
    _mime_type: &str,
) -> Result<String, String> {
    let name = std::path::Path::new(filename);
    if name.file_name() != Some(name.as_os_str()) {
        return Err("not a plain file name".to_string());
    }
    std::fs::create_dir_all(&config.download_dir)
        .map_err(|e| format!("create {}: {}", config.download_dir.display(), e))?;
    let path = config.download_dir.join(filename);
    std::fs::write(&path, data).map_err(|e| e.to_string())?;
    log::info!("Wrote {} ({} bytes)", path.display(), data.len());
    Ok(path.display().to_string())
}

#[cfg(target_arch = "wasm32")]
fn save_impl(
    _config: &ClientConfig,
    filename: &str,
    data: &[u8],
    mime_type: &str,
) -> Result<String, String> {
    use wasm_bindgen::JsCast;

    let window = web_sys::window().ok_or("No window object available")?;
    let document = window.document().ok_or("No document available")?;
    let body = document.body().ok_or("No body element available")?;

    let array = js_sys::Uint8Array::from(data);
    let blob_parts = js_sys::Array::new();
    blob_parts.push(&array.buffer());

    let options = web_sys::BlobPropertyBag::new();
    options.set_type(mime_type);

    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&blob_parts, &options)
        .map_err(|e| format!("Failed to create Blob: {:?}", e))?;

    let url = web_sys::Url::create_object_url_with_blob(&blob)
        .map_err(|e| format!("Failed to create object URL: {:?}", e))?;

    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")
        .map_err(|e| format!("Failed to create anchor element: {:?}", e))?
        .dyn_into()
        .map_err(|_| "Created element is not an anchor".to_string())?;

    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.style().set_property("display", "none").ok();

    body.append_child(&anchor).ok();
    anchor.click();
    body.remove_child(&anchor).ok();

    // Revoke later; revoking right away can cancel the download
    let url_clone = url.clone();
    let closure = wasm_bindgen::closure::Closure::once(move || {
        web_sys::Url::revoke_object_url(&url_clone).ok();
    });
    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            5000,
        )
        .ok();
    closure.forget();

    log::info!("Browser download of {} ({} bytes)", filename, data.len());
    Ok(filename.to_string())
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::format;

    #[test]
    fn writes_into_download_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            base_url: String::new(),
            download_dir: dir.path().join("exports"),
        };
        let saved =
            save_file(&config, "loss_description_Fire.txt", b"hello", TEXT_MIME).unwrap();
        let path = dir.path().join("exports").join("loss_description_Fire.txt");
        assert_eq!(saved, path.display().to_string());
        assert_eq!(std::fs::read(path).unwrap(), b"hello");
    }

    #[test]
    fn unwritable_dir_reports_save_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let config = ClientConfig {
            base_url: String::new(),
            download_dir: blocker,
        };
        let err = save_file(&config, "report.pdf", b"%PDF", PDF_MIME).unwrap_err();
        assert!(matches!(err, ClaimError::Save { ref filename, .. } if filename == "report.pdf"));
    }

    #[tokio::test]
    async fn damage_type_with_slash_saves_in_download_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            base_url: String::new(),
            download_dir: dir.path().to_path_buf(),
        };
        let date = chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        let text = format::text_export_filename("Roof/Gutter Damage");
        save_export(config.clone(), text, b"desc".to_vec(), TEXT_MIME)
            .await
            .unwrap();
        let pdf = format::pdf_export_filename("Roof/Gutter Damage", date);
        save_export(config, pdf, b"%PDF".to_vec(), PDF_MIME)
            .await
            .unwrap();

        let mut saved: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        saved.sort();
        assert_eq!(
            saved,
            [
                "ClaimInsight_Roof_Gutter_Damage_2025-06-01.pdf",
                "loss_description_Roof_Gutter_Damage.txt",
            ]
        );
    }

    #[test]
    fn refuses_names_that_leave_download_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            base_url: String::new(),
            download_dir: dir.path().join("exports"),
        };
        for name in ["../escape.txt", "nested/report.pdf", ""] {
            let err = save_file(&config, name, b"x", TEXT_MIME).unwrap_err();
            assert!(matches!(err, ClaimError::Save { ref filename, .. } if filename == name));
        }
        assert!(!dir.path().join("escape.txt").exists());
    }
}
