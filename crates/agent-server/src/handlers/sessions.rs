use actix_web::web::{Data, Json, Path};
use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::handlers::default_user_id;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub user_id: String,
    pub app_name: String,
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub user_id: String,
    pub sessions: Vec<String>,
}

/// POST /sessions
pub async fn create(
    state: Data<AppState>,
    req: Json<CreateSessionRequest>,
) -> Result<HttpResponse> {
    let session_id = Uuid::new_v4().to_string();
    let session = state
        .sessions
        .create_session(&state.app_name, &req.user_id, &session_id)
        .await?;

    log::info!("[{}] Session created for user {}", session.id, req.user_id);

    Ok(HttpResponse::Ok().json(SessionInfo {
        session_id: session.id,
        user_id: req.user_id.clone(),
        app_name: state.app_name.clone(),
    }))
}

/// GET /sessions/{user_id} — projects ids only, not session contents.
pub async fn list(state: Data<AppState>, path: Path<String>) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    let sessions = state
        .sessions
        .list_sessions(&state.app_name, &user_id)
        .await?;

    Ok(HttpResponse::Ok().json(SessionListResponse {
        user_id,
        sessions: sessions.into_iter().map(|s| s.id).collect(),
    }))
}

/// DELETE /sessions/{user_id}/{session_id} — acknowledged whether or not
/// the session exists.
pub async fn delete(state: Data<AppState>, path: Path<(String, String)>) -> Result<HttpResponse> {
    let (user_id, session_id) = path.into_inner();
    state
        .sessions
        .delete_session(&state.app_name, &user_id, &session_id)
        .await?;

    log::info!("[{}] Session deleted for user {}", session_id, user_id);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "deleted",
        "session_id": session_id
    })))
}
