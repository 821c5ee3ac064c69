pub mod events;
pub mod types;

pub use events::AgentEvent;
pub use types::{Content, Part, Role};

/// Application name under which all sessions are keyed.
pub const APP_NAME: &str = "legal_search_Agent";

/// Model used when the backend never reports a version for a turn.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// System prompt for the legal counsel persona. The numbered rules are part
/// of the observable contract: search before answering, cite sources, and
/// close with the not-legal-advice disclaimer.
///
/// The backend receives these exact bytes, whitespace included, so the
/// indentation and trailing spaces are spelled out line by line.
pub const LEGAL_COUNSEL_INSTRUCTION: &str = concat!(
    "\n",
    "    You are a professional Legal Counsel assistant. \n",
    "    Your goal is to provide helpful, basic-level legal information to user queries.\n",
    "    \n",
    "    1. Always use the 'google_search' tool to find the most up-to-date laws, regulations, or legal precedents relevant to the user's question.\n",
    "    2. Curate your response based on the search results.\n",
    "    3. Always cite your sources with links from the web search.\n",
    "    4. Provide a clear disclaimer that you are an AI and not a substitute for professional legal advice from a qualified attorney.\n",
    "    ",
);

/// A callable capability the agent may invoke mid-turn.
///
/// Google Search is a Gemini built-in: it is declared on the request and
/// executed server-side, so there is no local executor for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    GoogleSearch,
}

/// Static description of a conversational agent. Immutable after
/// construction; built once at startup and injected where needed.
#[derive(Debug, Clone)]
pub struct AgentDefinition {
    pub name: String,
    pub description: String,
    pub model: String,
    pub instruction: String,
    pub tools: Vec<Tool>,
}

/// Build the legal counsel agent backed by the given model.
pub fn legal_counsel_agent(model: impl Into<String>) -> AgentDefinition {
    AgentDefinition {
        name: "legal_counsel_agent".to_string(),
        description:
            "A basic-level legal counsel assistant that uses web search to provide cited information."
                .to_string(),
        model: model.into(),
        instruction: LEGAL_COUNSEL_INSTRUCTION.to_string(),
        tools: vec![Tool::GoogleSearch],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legal_counsel_agent_declares_search_tool() {
        let agent = legal_counsel_agent(DEFAULT_MODEL);
        assert_eq!(agent.name, "legal_counsel_agent");
        assert_eq!(agent.model, "gemini-2.5-flash");
        assert_eq!(agent.tools, vec![Tool::GoogleSearch]);
    }

    #[test]
    fn instruction_whitespace_is_exact() {
        assert!(LEGAL_COUNSEL_INSTRUCTION
            .starts_with("\n    You are a professional Legal Counsel assistant. \n"));
        assert!(LEGAL_COUNSEL_INSTRUCTION.ends_with("qualified attorney.\n    "));
        // Blank separator line keeps its indentation.
        assert!(LEGAL_COUNSEL_INSTRUCTION.contains("queries.\n    \n    1."));
    }

    #[test]
    fn instruction_keeps_the_behavioral_rules() {
        let agent = legal_counsel_agent(DEFAULT_MODEL);
        assert!(agent.instruction.contains("'google_search' tool"));
        assert!(agent.instruction.contains("cite your sources"));
        assert!(agent
            .instruction
            .contains("not a substitute for professional legal advice"));
    }
}
