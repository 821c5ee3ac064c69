pub mod agent;
pub mod runner;
pub mod session;

pub use agent::{
    legal_counsel_agent, AgentDefinition, AgentEvent, Content, Part, Role, Tool, APP_NAME,
    DEFAULT_MODEL, LEGAL_COUNSEL_INSTRUCTION,
};
pub use runner::{ConversationRunner, EventStream, RunnerError};
pub use session::{InMemorySessionService, Session, SessionError, SessionService};
