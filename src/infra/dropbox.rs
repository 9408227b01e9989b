//! Infrastructure implementation of the `ObjectStore` port against the
//! Dropbox content API.
//!
//! Both verbs are plain POSTs carrying the object path in the
//! `Dropbox-API-Arg` header; uploads always overwrite (last-write-wins, no
//! conditional writes). Dropbox signals a missing path as HTTP 409, which
//! maps to [`TransportError::NotFound`].

use reqwest::{Client, StatusCode};
use serde_json::json;

use crate::application::ports::ObjectStore;
use crate::domain::TransportError;

const CONTENT_URL: &str = "https://content.dropboxapi.com/2/files";
const API_ARG_HEADER: &str = "Dropbox-API-Arg";

/// Dropbox-backed [`ObjectStore`] holding a bearer credential.
pub struct DropboxStore {
    http: Client,
    token: String,
}

impl DropboxStore {
    #[must_use]
    pub fn new(token: String) -> Self {
        Self {
            http: Client::new(),
            token,
        }
    }
}

impl ObjectStore for DropboxStore {
    async fn download(&self, key: &str) -> Result<Vec<u8>, TransportError> {
        let arg = json!({ "path": format!("/{key}") });
        let response = self
            .http
            .post(format!("{CONTENT_URL}/download"))
            .bearer_auth(&self.token)
            .header(API_ARG_HEADER, arg.to_string())
            .send()
            .await
            .map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify(status, key, response.text().await.ok()));
        }
        let bytes = response.bytes().await.map_err(network)?;
        Ok(bytes.to_vec())
    }

    async fn upload(&self, key: &str, bytes: Vec<u8>) -> Result<(), TransportError> {
        let arg = json!({
            "path": format!("/{key}"),
            "mode": { ".tag": "overwrite" },
        });
        let response = self
            .http
            .post(format!("{CONTENT_URL}/upload"))
            .bearer_auth(&self.token)
            .header(API_ARG_HEADER, arg.to_string())
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify(status, key, response.text().await.ok()));
        }
        Ok(())
    }
}

fn network(e: reqwest::Error) -> TransportError {
    TransportError::Network(e.to_string())
}

fn classify(status: StatusCode, key: &str, body: Option<String>) -> TransportError {
    match status {
        StatusCode::UNAUTHORIZED => TransportError::Unauthorized,
        // Dropbox reports path/not_found and friends as 409.
        StatusCode::CONFLICT => TransportError::NotFound(key.to_string()),
        _ => TransportError::Network(format!(
            "unexpected status {status}: {}",
            body.unwrap_or_default().chars().take(200).collect::<String>()
        )),
    }
}
