use actix_web::HttpResponse;
use serde_json::json;

// 健康检查，不依赖上游服务
pub(crate) async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "message": "AP Scoring API is running"
    }))
}
