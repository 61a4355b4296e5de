//! HTTP client for the archive's ask endpoint

use super::{AnswerService, ArchiveError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Client for the remote question-answering service
pub struct ArchiveClient {
    client: Client,
    endpoint: String,
}

impl ArchiveClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let client = Client::builder()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl AnswerService for ArchiveClient {
    async fn ask(&self, question: &str) -> Result<String, ArchiveError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&AskRequest { question })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ArchiveError::Network(format!("request timeout: {e}"))
                } else if e.is_connect() {
                    ArchiveError::Network(format!("connection failed: {e}"))
                } else {
                    ArchiveError::Network(format!("request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ArchiveError::Network(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(ArchiveError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: AskResponse = serde_json::from_str(&body)
            .map_err(|e| ArchiveError::Malformed(format!("{e} - body: {body}")))?;

        Ok(parsed.answer)
    }
}

/// Wire format: `{"question": ...}` out, `{"answer": ...}` back
#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    question: &'a str,
}

#[derive(Debug, Deserialize)]
struct AskResponse {
    answer: String,
}
