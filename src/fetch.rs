// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Catalog acquisition from a workspace emoji API.
//!
//! One bearer-authenticated call returning the flat name → value mapping. Fetch
//! failures surface to the CLI only; the engine keeps operating on whatever
//! catalog it last held.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use crate::model::Catalog;

/// Default API base of the hosted workspace service.
pub const DEFAULT_API_BASE: &str = "https://slack.com/api";

#[derive(Debug, Deserialize)]
struct EmojiListResponse {
    ok: bool,
    #[serde(default)]
    emoji: BTreeMap<String, String>,
    #[serde(default)]
    error: Option<String>,
}

/// Fetches the full emoji catalog with a bearer token.
pub async fn fetch_catalog(api_base: &str, token: &str) -> Result<Catalog, FetchError> {
    if token.trim().is_empty() {
        return Err(FetchError::MissingToken);
    }

    let url = format!("{}/emoji.list", api_base.trim_end_matches('/'));
    let response = reqwest::Client::new()
        .post(url)
        .bearer_auth(token)
        .send()
        .await?
        .error_for_status()?;

    let payload: EmojiListResponse = response.json().await?;
    if !payload.ok {
        return Err(FetchError::Api(
            payload.error.unwrap_or_else(|| "unknown error".to_owned()),
        ));
    }

    Ok(payload.emoji.into_iter().collect())
}

#[derive(Debug)]
pub enum FetchError {
    /// No API token configured; the refresh affordance is unavailable.
    MissingToken,
    /// Transport-level failure (connection, TLS, HTTP status, decode).
    Transport(reqwest::Error),
    /// The API answered but reported an error of its own.
    Api(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingToken => f.write_str("no API token configured"),
            Self::Transport(source) => write!(f, "catalog fetch failed: {source}"),
            Self::Api(message) => write!(f, "emoji API error: {message}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(source) => Some(source),
            Self::MissingToken | Self::Api(_) => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(source: reqwest::Error) -> Self {
        Self::Transport(source)
    }
}

#[cfg(test)]
mod tests {
    use super::{fetch_catalog, EmojiListResponse, FetchError};

    #[test]
    fn response_payload_decodes_emoji_map() {
        let payload: EmojiListResponse = serde_json::from_str(
            r#"{"ok": true, "emoji": {"party": "http://x/party.png", "thumbs": "alias:thumbsup"}}"#,
        )
        .expect("decode payload");
        assert!(payload.ok);
        assert_eq!(payload.emoji.len(), 2);
        assert_eq!(
            payload.emoji.get("thumbs").map(String::as_str),
            Some("alias:thumbsup")
        );
    }

    #[test]
    fn error_payload_decodes_without_emoji_field() {
        let payload: EmojiListResponse =
            serde_json::from_str(r#"{"ok": false, "error": "invalid_auth"}"#)
                .expect("decode payload");
        assert!(!payload.ok);
        assert_eq!(payload.error.as_deref(), Some("invalid_auth"));
        assert!(payload.emoji.is_empty());
    }

    #[test]
    fn empty_token_fails_before_any_network_use() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");
        let result = runtime.block_on(fetch_catalog("https://example.invalid/api", "  "));
        assert!(matches!(result, Err(FetchError::MissingToken)));
    }
}
