// REST client for the baseball stats backend.
//
// Three endpoints are consumed: the hit-sorted player list, the per-player
// generated description, and the stat update. Responses are parsed
// tolerantly: the list body may be a bare array or wrapped in an object,
// and failure bodies may carry either a field->message map or a single
// error string.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::player::{EditDraft, Player};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure of a backend request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status. `message` is already
    /// suitable for display: for updates it is the joined field errors.
    #[error("{message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },

    /// The request never produced a usable response (connect, timeout,
    /// body decode).
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// Display text for caching/surfacing in the UI.
    pub fn display_message(&self) -> String {
        self.to_string()
    }
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// HTTP client bound to one backend base URL.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url` (trailing slashes are trimmed).
    pub fn new(base_url: &str) -> Self {
        ApiClient {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the full player list, hit-sorted by the server.
    ///
    /// Unrecognized body shapes yield an empty list rather than an error;
    /// only transport failures and non-2xx statuses are reported.
    pub async fn list_players(&self) -> Result<Vec<Player>, ApiError> {
        let url = format!("{}/players/by-hits/", self.base_url);
        debug!(%url, "fetching player list");
        let resp = self.http.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let body: Value = resp.json().await?;
        let players = extract_players(body);
        debug!(count = players.len(), "player list loaded");
        Ok(players)
    }

    /// Fetch the generated free-text description for one player.
    pub async fn fetch_description(&self, id: u64) -> Result<String, ApiError> {
        let url = format!("{}/players/{}/description/", self.base_url, id);
        debug!(%url, "fetching description");
        let resp = self.http.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let body: Value = resp.json().await?;
        Ok(body
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }

    /// PUT the full draft for one player. The caller merges the draft
    /// locally on success instead of trusting the response body.
    pub async fn update_player(&self, id: u64, draft: &EditDraft) -> Result<(), ApiError> {
        let url = format!("{}/players/{}/update/", self.base_url, id);
        debug!(%url, "saving player edit");
        let resp = self
            .http
            .put(&url)
            .json(&draft.to_update_body())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, "update rejected");
            return Err(status_error(status, &body));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Body parsing helpers
// ---------------------------------------------------------------------------

/// Pull a player array out of a list response body.
///
/// Accepts a bare array or an object with a `players` array; anything else
/// is treated as an empty list.
pub(crate) fn extract_players(body: Value) -> Vec<Player> {
    let list = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("players") {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    // Skip individual records that fail to parse instead of dropping the
    // whole response.
    list.into_iter()
        .filter_map(|item| match serde_json::from_value::<Player>(item) {
            Ok(p) => Some(p),
            Err(e) => {
                warn!("skipping malformed player record: {e}");
                None
            }
        })
        .collect()
}

/// Build a `Status` error with a display message parsed from `body`.
fn status_error(status: reqwest::StatusCode, body: &str) -> ApiError {
    ApiError::Status {
        status,
        message: parse_error_message(body, status),
    }
}

/// Extract a display message from a failure body.
///
/// `{"errors": {field: message, ...}}` is joined into one string with the
/// fields sorted for deterministic output; `{"error": "..."}` is passed
/// through; anything else falls back to the HTTP status line.
pub(crate) fn parse_error_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(errors) = value.get("errors").and_then(Value::as_object) {
            let mut fields: Vec<&String> = errors.keys().collect();
            fields.sort();
            let joined: Vec<String> = fields
                .into_iter()
                .map(|field| format!("{field}: {}", field_message(&errors[field])))
                .collect();
            if !joined.is_empty() {
                return joined.join("; ");
            }
        }
        if let Some(msg) = value.get("error").and_then(Value::as_str) {
            return msg.to_string();
        }
    }
    format!("HTTP {}", status.as_u16())
}

/// One field's message: a plain string, or the first entry of a string
/// array (DRF serializers report lists per field).
fn field_message(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .first()
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
