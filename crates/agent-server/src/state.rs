use std::sync::Arc;

use agent_core::{ConversationRunner, SessionService};

/// Shared service object handed to the HTTP layer at startup. Built once in
/// `main` and injected via `web::Data`; handlers never reach for globals.
pub struct AppState {
    pub app_name: String,
    /// Reported in chat responses when no event carries a model version.
    pub default_model: String,
    pub sessions: Arc<dyn SessionService>,
    pub runner: Arc<dyn ConversationRunner>,
}
