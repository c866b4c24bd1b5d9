use std::error::Error;
use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::structs::respond::Respond;

/// 一次评分请求中可能出现的全部错误，均为终止性错误，不做自动重试
#[derive(Debug)]
pub enum ScoringError {
    /// 客户端提交的内容不合法
    Validation(String),
    /// 请求体超过允许的大小
    TooLarge(String),
    /// 上游AI服务不可达、超时或返回了非成功状态
    Upstream(String),
    /// 上游有响应，但内容无法解析为评分结果
    Parse(String),
}

impl ScoringError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ScoringError::Validation(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        ScoringError::Upstream(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        ScoringError::Parse(msg.into())
    }
}

impl fmt::Display for ScoringError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScoringError::Validation(msg) => write!(f, "{}", msg), // user-facing output
            ScoringError::TooLarge(msg) => write!(f, "Request body too large: {}", msg),
            ScoringError::Upstream(msg) => write!(f, "Error calling grading service: {}", msg),
            ScoringError::Parse(msg) => write!(f, "Invalid response from grading service: {}", msg),
        }
    }
}

impl Error for ScoringError {}

impl ResponseError for ScoringError {
    fn status_code(&self) -> StatusCode {
        match self {
            ScoringError::Validation(_) => StatusCode::BAD_REQUEST,
            ScoringError::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ScoringError::Upstream(_) | ScoringError::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(Respond {
            code: status.as_u16(),
            msg: self.to_string(),
        })
    }
}

/// 读取配置文件时出现的错误
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config file: {}", e),
            ConfigError::Toml(e) => write!(f, "failed to parse config file: {}", e),
            ConfigError::Invalid(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Toml(e)
    }
}
