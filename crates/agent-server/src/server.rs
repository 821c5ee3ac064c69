use std::io;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};

use crate::handlers;
use crate::state::AppState;

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::health::handler))
        .route("/sessions", web::post().to(handlers::sessions::create))
        .route("/chat", web::post().to(handlers::chat::handler))
        .route(
            "/sessions/{user_id}",
            web::get().to(handlers::sessions::list),
        )
        .route(
            "/sessions/{user_id}/{session_id}",
            web::delete().to(handlers::sessions::delete),
        );
}

/// Bind and serve until shutdown. CORS is fully open for browser frontends.
pub async fn run_server(state: AppState, port: u16) -> io::Result<()> {
    let state = web::Data::new(state);

    log::info!("Starting Legal Search Agent API on http://0.0.0.0:{port}");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .configure(app_config)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
