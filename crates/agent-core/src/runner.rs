use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use thiserror::Error;

use crate::agent::types::Content;
use crate::agent::AgentEvent;
use crate::session::SessionError;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error(transparent)]
    Session(#[from] SessionError),
}

pub type Result<T> = std::result::Result<T, RunnerError>;

pub type EventStream = Pin<Box<dyn Stream<Item = Result<AgentEvent>> + Send>>;

/// Executes one conversational turn, orchestrating model and tool calls.
///
/// The returned stream yields events incrementally and terminates once the
/// agent's turn is complete. Callers must drain it fully; stopping early
/// truncates the answer. No deadline is imposed here: a backend that never
/// finishes its stream hangs the consuming task.
#[async_trait]
pub trait ConversationRunner: Send + Sync {
    async fn run(
        &self,
        user_id: &str,
        session_id: &str,
        new_message: Content,
    ) -> Result<EventStream>;
}
