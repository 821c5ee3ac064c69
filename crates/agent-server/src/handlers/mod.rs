pub mod chat;
pub mod health;
pub mod sessions;

pub(crate) fn default_user_id() -> String {
    "default_user".to_string()
}
