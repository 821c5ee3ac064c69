use serde::{Deserialize, Serialize};

use crate::agent::types::Content;

/// One incremental unit of agent output for a conversational turn.
///
/// Both fields are optional and matched explicitly by consumers: an event
/// may carry text fragments, a model version, both, or neither (metadata
/// chunks the reduction simply skips).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

impl AgentEvent {
    pub fn text(content: Content) -> Self {
        Self {
            content: Some(content),
            ..Default::default()
        }
    }
}
