use actix_web::{HttpResponse, Responder};

pub async fn handler() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "message": "Legal Search Agent API is running"
    }))
}
