//! Gemini generateContent client

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use pv_types::{AppError, AppResult};
use pv_utils::{retry_with_backoff, RetryPolicy};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Model used for insight generation.
pub const INSIGHT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Client for the text-generation API behind `/insight`.
pub struct InsightClient {
    api_key: Option<String>,
    client: Client,
    base_url: String,
}

impl InsightClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            client: Client::new(),
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    /// Override the API base URL (tests point this at a local server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// One generateContent call. A missing credential fails fast without a
    /// request: retrying cannot fix a missing key.
    pub async fn summarize(&self, prompt: &str) -> AppResult<String> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| AppError::Config("GEMINI_API_KEY is not configured".to_string()))?;

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(format!(
                "{}/{}:generateContent",
                self.base_url, INSIGHT_MODEL
            ))
            .query(&[("key", api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Insight(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::RateLimitExceeded);
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Insight(format!(
                "API error ({}): {}",
                status, error_text
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::Insight(format!("Failed to parse response: {}", e)))?;

        let text = parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Insight("Model returned no text".to_string()))?;

        debug!(chars = text.len(), "insight generated");
        Ok(text)
    }

    /// generateContent with client-side backoff on rate limits only. Other
    /// failures surface immediately so the caller can fall back.
    pub async fn summarize_with_retry(&self, prompt: &str) -> AppResult<String> {
        let policy = RetryPolicy::new(3, Duration::from_secs(2));
        retry_with_backoff(
            policy,
            |err| matches!(err, AppError::RateLimitExceeded),
            |_| self.summarize(prompt),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_client_fails_fast() {
        let client = InsightClient::new(None);
        let err = client.summarize("how are my sites doing?").await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_response_parsing_takes_first_candidate() {
        let body = serde_json::json!({
            "candidates": [
                { "content": { "parts": [ { "text": "  Overall healthy.  " } ] } }
            ]
        });
        let parsed: GenerateContentResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.candidates[0].content.parts[0].text.trim(), "Overall healthy.");
    }
}
