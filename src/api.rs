/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! HTTP client for the claim analysis backend.

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::error::ClaimError;
use crate::model::{
    AnalysisResult, PdfExportRequest, TextExportRequest, UploadRequest, UploadResponse,
};

const ANALYZE_FALLBACK: &str = "An error occurred while processing the image.";
const TEXT_DOWNLOAD_FAILED: &str = "Failed to download file.";

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Clone)]
pub struct ClaimClient {
    client: reqwest::Client,
    base_url: String,
}

impl ClaimClient {
    /// `base_url` like `http://localhost:5000`; a trailing slash is dropped.
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST /upload`: send the image and claim fields, get the analysis back.
    pub async fn analyze(&self, request: UploadRequest) -> Result<AnalysisResult, ClaimError> {
        let fields = request.text_fields();
        let file = request.file;
        let file_name = file.name.clone();
        let size = file.bytes.len();

        let part = Part::bytes(file.bytes)
            .file_name(file.name)
            .mime_str(&file.mime)
            .map_err(|e| ClaimError::transport("Network", e))?;
        let mut form = Form::new().part("file", part);
        for (name, value) in fields {
            form = form.text(name, value);
        }

        let url = self.url("/upload");
        log::info!("Uploading {} ({} bytes) to {}", file_name, size, url);
        let resp = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClaimError::transport("Network", e))?;
        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| ClaimError::transport("Network", e))?;

        let parsed: UploadResponse = match serde_json::from_slice(&body) {
            Ok(parsed) => parsed,
            Err(e) if status.is_success() => return Err(ClaimError::transport("Network", e)),
            Err(_) => {
                log::warn!("Upload returned {} with a non-JSON body", status);
                return Err(ClaimError::Rejected(ANALYZE_FALLBACK.into()));
            }
        };

        if parsed.success {
            Ok(parsed.result)
        } else {
            if let Some(details) = &parsed.details {
                log::warn!("Upload rejected ({}): {}", status, details);
            }
            Err(ClaimError::Rejected(
                parsed
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| ANALYZE_FALLBACK.into()),
            ))
        }
    }

    /// `POST /download`: fetch the description as a text file.
    pub async fn download_text(&self, request: &TextExportRequest) -> Result<Vec<u8>, ClaimError> {
        let url = self.url("/download");
        log::info!("Requesting text export from {}", url);
        let resp = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ClaimError::transport("Download", e))?;
        let status = resp.status();
        if !status.is_success() {
            log::warn!("Text export returned {}", status);
            return Err(ClaimError::Rejected(TEXT_DOWNLOAD_FAILED.into()));
        }
        let body = resp
            .bytes()
            .await
            .map_err(|e| ClaimError::transport("Download", e))?;
        Ok(body.to_vec())
    }

    /// `POST /download-pdf`: have the backend render the claim report.
    pub async fn download_pdf(&self, request: &PdfExportRequest) -> Result<Vec<u8>, ClaimError> {
        let url = self.url("/download-pdf");
        log::info!("Requesting PDF export from {}", url);
        let resp = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ClaimError::transport("PDF download", e))?;
        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| ClaimError::transport("PDF download", e))?;
        if !status.is_success() {
            let reason = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| "Unknown error".into());
            log::warn!("PDF export returned {}: {}", status, reason);
            return Err(ClaimError::Rejected(format!(
                "Failed to generate PDF: {}",
                reason
            )));
        }
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Multipart, State};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};

    use super::*;
    use crate::model::{Claimant, ClaimForm, DamageType, SelectedImage};

    type Seen = Arc<Mutex<Vec<(String, String)>>>;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    async fn record_upload(State(seen): State<Seen>, mut multipart: Multipart) -> Json<Value> {
        let mut fields = Vec::new();
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            if name == "file" {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let mime = field.content_type().unwrap_or_default().to_string();
                let len = field.bytes().await.unwrap().len();
                fields.push((name, format!("{file_name};{mime};{len}")));
            } else {
                fields.push((name, field.text().await.unwrap()));
            }
        }
        let city = fields
            .iter()
            .find(|(k, _)| k == "city")
            .map(|(_, v)| v.clone())
            .unwrap_or_default();
        seen.lock().unwrap().extend(fields);
        Json(json!({
            "success": true,
            "image_caption": "hail dents on a car hood",
            "loss_description": "Multiple dents across the hood.",
            "damage_type": "Hail Damage",
            "severity_score": 35,
            "severity_level": "Moderate",
            "affected_components": "Hood, Roof",
            "repair_level": "Medium",
            "cost_range": "$1,000 - $3,000",
            "image_data": "AAAA",
            "city": city,
        }))
    }

    fn client(base_url: &str) -> ClaimClient {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        ClaimClient::with_client(http, base_url)
    }

    fn request() -> UploadRequest {
        let form = ClaimForm {
            damage_type: DamageType::Other,
            custom_damage: "Hail and wind".into(),
            claimant: Claimant {
                policy_holder_name: "Dana Reyes".into(),
                city: "Troy".into(),
                ..Default::default()
            },
        };
        let file = SelectedImage {
            name: "hood.jpg".into(),
            mime: "image/jpeg".into(),
            bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
        };
        UploadRequest::from_form(file, &form)
    }

    #[tokio::test]
    async fn analyze_sends_multipart_and_parses_result() {
        let seen: Seen = Arc::default();
        let router = Router::new()
            .route("/upload", post(record_upload))
            .with_state(seen.clone());
        let client = client(&serve(router).await);

        let result = client.analyze(request()).await.unwrap();
        assert_eq!(result.damage_type, "Hail Damage");
        assert_eq!(result.claimant.city, "Troy");
        assert_eq!(result.severity_score.unwrap().as_u64(), Some(35));

        let seen = seen.lock().unwrap();
        let names: Vec<&str> = seen.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            names,
            [
                "file",
                "damage_type",
                "custom_damage",
                "policy_holder_name",
                "contact_email",
                "contact_phone",
                "property_address",
                "city",
                "state",
                "zip_code"
            ]
        );
        assert_eq!(seen[0].1, "hood.jpg;image/jpeg;4");
        assert_eq!(seen[1].1, "Other");
        assert_eq!(seen[2].1, "Hail and wind");
        assert_eq!(seen[4].1, "");
    }

    #[tokio::test]
    async fn analyze_surfaces_server_error() {
        let router = Router::new().route(
            "/upload",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": "Invalid image file"})),
                )
            }),
        );
        let client = client(&serve(router).await);
        assert_eq!(
            client.analyze(request()).await.unwrap_err(),
            ClaimError::Rejected("Invalid image file".into())
        );
    }

    #[tokio::test]
    async fn analyze_falls_back_to_generic_message() {
        let router = Router::new()
            .route("/upload", post(|| async { Json(json!({"success": false})) }));
        let client = client(&serve(router).await);
        assert_eq!(
            client.analyze(request()).await.unwrap_err().to_string(),
            ANALYZE_FALLBACK
        );
    }

    #[tokio::test]
    async fn analyze_reports_transport_failure() {
        // Bind then drop to get a port nobody listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client(&format!("http://{}", addr));
        let err = client.analyze(request()).await.unwrap_err();
        assert!(matches!(err, ClaimError::Transport { context: "Network", .. }));
        assert!(err.to_string().starts_with("Network error: "));
    }

    #[tokio::test]
    async fn text_export_returns_body() {
        let router = Router::new().route(
            "/download",
            post(|Json(body): Json<TextExportRequest>| async move {
                format!("{}\n{}", body.damage_type, body.description)
            }),
        );
        let client = client(&serve(router).await);
        let bytes = client
            .download_text(&TextExportRequest {
                description: "Dents.".into(),
                damage_type: "Hail Damage".into(),
            })
            .await
            .unwrap();
        assert_eq!(bytes, b"Hail Damage\nDents.");
    }

    #[tokio::test]
    async fn text_export_failure_is_generic() {
        let router = Router::new().route(
            "/download",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR.into_response() }),
        );
        let client = client(&serve(router).await);
        let err = client
            .download_text(&TextExportRequest {
                description: String::new(),
                damage_type: String::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to download file.");
    }

    fn pdf_request() -> PdfExportRequest {
        PdfExportRequest::from_result(&AnalysisResult {
            loss_description: "Dents.".into(),
            damage_type: "Hail Damage".into(),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn pdf_export_sends_formatted_fields() {
        let router = Router::new().route(
            "/download-pdf",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["contact_info"], "Not provided");
                assert_eq!(body["location"], "Not specified");
                b"%PDF-1.4".to_vec()
            }),
        );
        let client = client(&serve(router).await);
        let bytes = client.download_pdf(&pdf_request()).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn pdf_export_error_uses_json_message() {
        let router = Router::new().route(
            "/download-pdf",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "PDF generation failed"})),
                )
            }),
        );
        let client = client(&serve(router).await);
        assert_eq!(
            client.download_pdf(&pdf_request()).await.unwrap_err().to_string(),
            "Failed to generate PDF: PDF generation failed"
        );
    }

    #[tokio::test]
    async fn pdf_export_error_without_json() {
        let router = Router::new().route(
            "/download-pdf",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let client = client(&serve(router).await);
        assert_eq!(
            client.download_pdf(&pdf_request()).await.unwrap_err().to_string(),
            "Failed to generate PDF: Unknown error"
        );
    }
}
