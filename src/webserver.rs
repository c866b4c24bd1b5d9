use std::io;

use actix_cors::Cors;
use actix_web::error::JsonPayloadError;
use actix_web::middleware::Logger;
use actix_web::{web, App, Error, HttpRequest, HttpServer};

use crate::config::ServerConfig;
use crate::error::ScoringError;
use crate::grading_server::GradingServerHandle;
use crate::service::{health, score};

// 学生答案可能很长，放宽默认的32KB限制
pub const MAX_BODY_BYTES: usize = 1 << 20;

/// 注册全部路由，测试中也复用这一套配置
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(MAX_BODY_BYTES)
            .error_handler(json_error_handler),
    )
    .route("/health", web::get().to(health::health))
    .route("/score/", web::post().to(score::score))
    .route("/score", web::post().to(score::score));
}

// 超出大小限制返回413，其余不是合法json对象的请求体都按校验错误处理
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    match err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            ScoringError::TooLarge(err.to_string()).into()
        }
        _ => ScoringError::validation(format!("Invalid request body: {}", err)).into(),
    }
}

// 启动actix服务
pub async fn run(config: &ServerConfig, grading_server: GradingServerHandle) -> io::Result<()> {
    let grading_server = web::Data::new(grading_server);
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .app_data(grading_server.clone())
            .configure(configure)
    });
    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }
    let server = server.bind((config.host.as_str(), config.port))?.run();
    log::info!("HTTP服务启动成功: {}:{}", config.host, config.port);
    server.await
}
