use std::io;
use std::sync::Arc;

use clap::Parser;

use agent_core::{
    legal_counsel_agent, ConversationRunner, InMemorySessionService, SessionService, APP_NAME,
    DEFAULT_MODEL,
};
use agent_runner::{GeminiClient, GeminiRunner, DEFAULT_BASE_URL};
use agent_server::{run_server, AppState};

#[derive(Parser, Debug)]
#[command(name = "agent-server")]
#[command(about = "Legal Search Agent HTTP API")]
#[command(version)]
struct Cli {
    /// Server port
    #[arg(long, env = "PORT", default_value = "8000")]
    port: u16,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY")]
    api_key: String,

    /// Model name
    #[arg(long, env = "AGENT_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Gemini API base URL
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();

    log::info!("Starting Legal Search Agent server on port {}", cli.port);
    log::info!("  Model: {}", cli.model);
    log::info!("  Base URL: {}", cli.base_url);

    let sessions: Arc<dyn SessionService> = Arc::new(InMemorySessionService::new());
    let agent = legal_counsel_agent(cli.model.clone());
    let client = GeminiClient::new(cli.api_key).with_base_url(cli.base_url);
    let runner: Arc<dyn ConversationRunner> = Arc::new(GeminiRunner::new(
        agent,
        APP_NAME,
        Arc::clone(&sessions),
        client,
    ));

    let state = AppState {
        app_name: APP_NAME.to_string(),
        default_model: cli.model,
        sessions,
        runner,
    };

    run_server(state, cli.port).await
}
