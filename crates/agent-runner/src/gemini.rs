//! Google Gemini `streamGenerateContent` client.
//!
//! Gemini streams SSE events where each `data:` payload is a JSON chunk:
//!
//! ```text
//! data: {"candidates":[{"content":{"parts":[{"text":"Hello"}],"role":"model"}}],"modelVersion":"gemini-2.5-flash"}
//! ```
//!
//! The built-in `google_search` tool is declared on the request and executed
//! server-side; from here it is opaque latency between chunks.

use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use agent_core::runner::{EventStream, Result, RunnerError};
use agent_core::{AgentDefinition, AgentEvent, Content, Part, Role, Tool};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

fn tool_declaration(tool: Tool) -> Value {
    match tool {
        Tool::GoogleSearch => json!({ "google_search": {} }),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Parse one SSE `data:` payload into an optional [`AgentEvent`].
///
/// Returns `Ok(None)` for payloads with nothing to report (empty data,
/// `[DONE]`, metadata-only chunks) and `Err(_)` for malformed JSON or
/// embedded API error objects.
pub(crate) fn parse_sse_data(data: &str) -> Result<Option<AgentEvent>> {
    let data = data.trim();
    if data.is_empty() || data == "[DONE]" {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(data)
        .map_err(|e| RunnerError::Stream(format!("Malformed Gemini SSE data: {}: {}", e, data)))?;

    if let Some(error) = value.get("error") {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown Gemini API error");
        return Err(RunnerError::Api(message.to_string()));
    }

    let chunk: GenerateContentChunk = serde_json::from_value(value)
        .map_err(|e| RunnerError::Stream(format!("Unexpected Gemini chunk shape: {}", e)))?;

    let parts: Vec<Part> = chunk
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref().map(Part::text))
                .collect()
        })
        .unwrap_or_default();

    let content = if parts.is_empty() {
        None
    } else {
        Some(Content {
            role: Role::Model,
            parts,
        })
    };

    if content.is_none() && chunk.model_version.is_none() {
        return Ok(None);
    }

    Ok(Some(AgentEvent {
        content,
        model_version: chunk.model_version,
    }))
}

/// HTTP client for the Gemini generative language API.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the API endpoint (proxies, test servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Stream one model turn for the given conversation.
    pub async fn stream_generate(
        &self,
        agent: &AgentDefinition,
        contents: Vec<Content>,
    ) -> Result<EventStream> {
        let request = GenerateContentRequest {
            contents,
            system_instruction: Some(SystemInstruction {
                parts: vec![Part::text(agent.instruction.clone())],
            }),
            tools: agent.tools.iter().map(|t| tool_declaration(*t)).collect(),
        };

        let url = format!(
            "{}/models/{}:streamGenerateContent?alt=sse&key={}",
            self.base_url, agent.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| RunnerError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| RunnerError::Http(e.to_string()))?;

            if status == 401 || status == 403 {
                return Err(RunnerError::Auth(format!(
                    "Gemini authentication failed: {}. Check the API key.",
                    text
                )));
            }

            return Err(RunnerError::Api(format!(
                "Gemini API error: HTTP {}: {}",
                status, text
            )));
        }

        log::debug!("Gemini stream started for model {}", agent.model);

        let stream = response
            .bytes_stream()
            .eventsource()
            .map(|event| {
                let event = event.map_err(|e| RunnerError::Stream(e.to_string()))?;
                parse_sse_data(&event.data)
            })
            .filter_map(|result| async move {
                match result {
                    Ok(Some(event)) => Some(Ok(event)),
                    Ok(None) => None,
                    Err(err) => Some(Err(err)),
                }
            });

        Ok(Box::pin(stream))
    }
}
