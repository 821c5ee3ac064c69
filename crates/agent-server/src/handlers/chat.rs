use actix_web::web::{Data, Json};
use actix_web::HttpResponse;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agent_core::Content;

use crate::error::{ApiError, Result};
use crate::handlers::default_user_id;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default)]
    pub session_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub response: String,
    pub model: String,
}

/// POST /chat
///
/// Maps one stateless request onto a stateful session and reduces the
/// runner's event stream to a single response body.
pub async fn handler(state: Data<AppState>, req: Json<ChatRequest>) -> Result<HttpResponse> {
    let req = req.into_inner();

    if req.message.is_empty() {
        return Err(ApiError::EmptyMessage);
    }

    // Omitted id: lazily create a fresh session. Explicit id: a claim of
    // prior existence, so an unknown one is rejected rather than resurrected.
    let session_id = match &req.session_id {
        None => {
            let session_id = Uuid::new_v4().to_string();
            state
                .sessions
                .create_session(&state.app_name, &req.user_id, &session_id)
                .await?;
            log::info!("[{}] Session created lazily for chat", session_id);
            session_id
        }
        Some(session_id) => {
            state
                .sessions
                .get_session(&state.app_name, &req.user_id, session_id)
                .await?
                .ok_or(ApiError::SessionNotFound)?;
            session_id.clone()
        }
    };

    let mut events = state
        .runner
        .run(&req.user_id, &session_id, Content::user(req.message))
        .await?;

    // Drain the whole stream: text fragments concatenate in arrival order,
    // the last reported model version wins.
    let mut response_text = String::new();
    let mut model_version: Option<String> = None;

    while let Some(event) = events.next().await {
        let event = event?;
        if let Some(content) = event.content {
            for part in content.parts {
                response_text.push_str(&part.text);
            }
        }
        if let Some(version) = event.model_version {
            model_version = Some(version);
        }
    }

    Ok(HttpResponse::Ok().json(ChatResponse {
        session_id,
        response: response_text,
        model: model_version.unwrap_or_else(|| state.default_model.clone()),
    }))
}
