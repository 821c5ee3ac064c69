use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;

use agent_core::runner::{ConversationRunner, EventStream, Result, RunnerError};
use agent_core::{AgentDefinition, Content, SessionService};

use crate::gemini::GeminiClient;

/// Drives one agent turn against the Gemini backend and persists the turn
/// through the session service.
pub struct GeminiRunner {
    agent: AgentDefinition,
    app_name: String,
    sessions: Arc<dyn SessionService>,
    client: GeminiClient,
}

impl GeminiRunner {
    pub fn new(
        agent: AgentDefinition,
        app_name: impl Into<String>,
        sessions: Arc<dyn SessionService>,
        client: GeminiClient,
    ) -> Self {
        Self {
            agent,
            app_name: app_name.into(),
            sessions,
            client,
        }
    }
}

#[async_trait]
impl ConversationRunner for GeminiRunner {
    async fn run(
        &self,
        user_id: &str,
        session_id: &str,
        new_message: Content,
    ) -> Result<EventStream> {
        let session = self
            .sessions
            .get_session(&self.app_name, user_id, session_id)
            .await?
            .ok_or_else(|| RunnerError::SessionNotFound(session_id.to_string()))?;

        let mut contents = session.history;
        contents.push(new_message.clone());

        // The user turn is recorded before the model call so a failed turn
        // still leaves the question in the transcript.
        self.sessions
            .append_history(&self.app_name, user_id, session_id, vec![new_message])
            .await?;

        let mut upstream = self.client.stream_generate(&self.agent, contents).await?;

        let sessions = Arc::clone(&self.sessions);
        let app_name = self.app_name.clone();
        let user_id = user_id.to_string();
        let session_id = session_id.to_string();

        let stream = async_stream::stream! {
            let mut reply = String::new();

            while let Some(item) = upstream.next().await {
                match item {
                    Ok(event) => {
                        if let Some(content) = &event.content {
                            reply.push_str(&content.joined_text());
                        }
                        yield Ok(event);
                    }
                    Err(err) => {
                        log::error!("[{}] Gemini stream failed: {}", session_id, err);
                        yield Err(err);
                        return;
                    }
                }
            }

            if !reply.is_empty() {
                if let Err(err) = sessions
                    .append_history(&app_name, &user_id, &session_id, vec![Content::model(reply)])
                    .await
                {
                    log::error!("[{}] Failed to persist model turn: {}", session_id, err);
                    yield Err(RunnerError::from(err));
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::{legal_counsel_agent, AgentEvent, InMemorySessionService, Role, APP_NAME};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn runner_against(server: &MockServer, sessions: Arc<dyn SessionService>) -> GeminiRunner {
        GeminiRunner::new(
            legal_counsel_agent("gemini-2.5-flash"),
            APP_NAME,
            sessions,
            GeminiClient::new("test-key").with_base_url(server.uri()),
        )
    }

    async fn drain(mut stream: EventStream) -> Vec<AgentEvent> {
        let mut events = Vec::new();
        while let Some(item) = stream.next().await {
            events.push(item.expect("event"));
        }
        events
    }

    #[tokio::test]
    async fn run_streams_events_and_persists_the_turn() {
        let server = MockServer::start().await;

        let sse_body = concat!(
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Hello \"}],\"role\":\"model\"}}]}\n",
            "\n",
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"world.\"}],\"role\":\"model\"}}],\"modelVersion\":\"gemini-2.5-flash\"}\n",
            "\n",
        );

        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash:streamGenerateContent"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(sse_body),
            )
            .mount(&server)
            .await;

        let sessions: Arc<dyn SessionService> = Arc::new(InMemorySessionService::new());
        sessions
            .create_session(APP_NAME, "alice", "s1")
            .await
            .unwrap();

        let runner = runner_against(&server, Arc::clone(&sessions)).await;
        let stream = runner
            .run("alice", "s1", Content::user("hi"))
            .await
            .expect("stream");
        let events = drain(stream).await;

        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0].content.as_ref().unwrap().joined_text(),
            "Hello "
        );
        assert_eq!(
            events[1].model_version.as_deref(),
            Some("gemini-2.5-flash")
        );

        let session = sessions
            .get_session(APP_NAME, "alice", "s1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.history.len(), 2);
        assert_eq!(session.history[0], Content::user("hi"));
        assert_eq!(session.history[1].role, Role::Model);
        assert_eq!(session.history[1].joined_text(), "Hello world.");
    }

    #[tokio::test]
    async fn run_rejects_unknown_sessions() {
        let server = MockServer::start().await;
        let sessions: Arc<dyn SessionService> = Arc::new(InMemorySessionService::new());
        let runner = runner_against(&server, sessions).await;

        let err = runner
            .run("alice", "missing", Content::user("hi"))
            .await
            .map(|_| ())
            .unwrap_err();
        assert!(matches!(err, RunnerError::SessionNotFound(id) if id == "missing"));
    }

    #[tokio::test]
    async fn auth_failures_map_to_auth_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash:streamGenerateContent"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key invalid"))
            .mount(&server)
            .await;

        let sessions: Arc<dyn SessionService> = Arc::new(InMemorySessionService::new());
        sessions
            .create_session(APP_NAME, "alice", "s1")
            .await
            .unwrap();

        let runner = runner_against(&server, sessions).await;
        let err = runner
            .run("alice", "s1", Content::user("hi"))
            .await
            .map(|_| ())
            .unwrap_err();
        assert!(matches!(err, RunnerError::Auth(_)));
    }
}
