use std::io;

use ap_scoring_server::config::Config;
use ap_scoring_server::grading_server::GradingServer;
use ap_scoring_server::webserver;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::load_from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("读取配置失败: {}", e);
            return Err(io::Error::new(io::ErrorKind::InvalidInput, e.to_string()));
        }
    };
    if config.upstream.api_key.is_empty() {
        log::warn!("未配置上游API密钥，评分请求将会失败");
    }

    let (grading_server, grading_server_handle) = match GradingServer::new(config.upstream.clone()) {
        Ok(pair) => pair,
        Err(e) => {
            log::error!("创建评分网关失败: {}", e);
            return Err(io::Error::new(io::ErrorKind::InvalidInput, e.to_string()));
        }
    };
    tokio::spawn(async move {
        if let Err(e) = grading_server.run().await {
            log::error!("评分网关意外退出: {}", e);
        }
    });

    webserver::run(&config.server, grading_server_handle).await
}
