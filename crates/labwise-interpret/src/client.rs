//! OpenAI-compatible chat-completions client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use labwise_core::models::interpretation::LabInterpretation;
use labwise_core::models::report::LabReport;

use crate::decode::decode_interpretation;
use crate::error::InterpretError;
use crate::prompt::{SYSTEM_PROMPT, build_report_prompt};

/// Produces an interpretation for a report. The production implementation
/// calls an OpenAI-compatible endpoint; tests substitute fakes.
#[async_trait]
pub trait InterpretationGenerator: Send + Sync {
    async fn generate(
        &self,
        report: &LabReport,
        created_by: &str,
    ) -> Result<LabInterpretation, InterpretError>;
}

pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[async_trait]
impl InterpretationGenerator for OpenAiClient {
    async fn generate(
        &self,
        report: &LabReport,
        created_by: &str,
    ) -> Result<LabInterpretation, InterpretError> {
        let url = format!("{}/chat/completions", self.base_url);
        let user_prompt = build_report_prompt(report);

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
        };

        info!(report_id = %report.id, created_by, model = %self.model, "requesting interpretation");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| InterpretError::Service(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InterpretError::Service(format!(
                "interpretation service returned {status}: {body}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| InterpretError::Service(format!("malformed service response: {e}")))?;

        let content = parsed
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| {
                InterpretError::Service("service response contained no choices".to_string())
            })?;

        let interpretation = decode_interpretation(content)?;

        info!(report_id = %report.id, "interpretation received");

        Ok(interpretation)
    }
}
