use std::fs;
use std::path::Path;

use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

const OPENAI_BASE_URL: &str = "https://api.openai.com";
const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const OPENAI_MODEL: &str = "o1";
const ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-20241022";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 不设置时使用actix默认的worker数量
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8000,
            workers: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub provider: Provider,
    pub base_url: Option<String>,
    pub api_key: String,
    pub model: Option<String>,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    /// 只对openai推理模型生效，留空则不发送
    pub reasoning_effort: String,
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        UpstreamConfig {
            provider: Provider::OpenAi,
            base_url: None,
            api_key: String::new(),
            model: None,
            max_tokens: 8192,
            temperature: None,
            reasoning_effort: "medium".to_string(),
            timeout_secs: 120,
        }
    }
}

impl UpstreamConfig {
    pub fn base_url(&self) -> &str {
        match (&self.base_url, self.provider) {
            (Some(url), _) => url.as_str(),
            (None, Provider::OpenAi) => OPENAI_BASE_URL,
            (None, Provider::Anthropic) => ANTHROPIC_BASE_URL,
        }
    }

    pub fn model(&self) -> &str {
        match (&self.model, self.provider) {
            (Some(model), _) => model.as_str(),
            (None, Provider::OpenAi) => OPENAI_MODEL,
            (None, Provider::Anthropic) => ANTHROPIC_MODEL,
        }
    }

    /// anthropic接口必须带temperature，openai推理模型不接受该参数
    pub fn temperature(&self) -> Option<f32> {
        match self.provider {
            Provider::OpenAi => self.temperature,
            Provider::Anthropic => Some(self.temperature.unwrap_or(0.0)),
        }
    }

    pub fn reasoning_effort(&self) -> Option<&str> {
        match self.provider {
            Provider::OpenAi if !self.reasoning_effort.trim().is_empty() => Some(self.reasoning_effort.trim()),
            _ => None,
        }
    }

    /// 拼接出具体的接口地址
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let mut base = Url::parse(self.base_url())
            .map_err(|e| ConfigError::Invalid(format!("upstream.base_url: {}", e)))?;
        // 保证join时不会丢掉base_url中的路径前缀
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let path = match self.provider {
            Provider::OpenAi => "v1/chat/completions",
            Provider::Anthropic => "v1/messages",
        };
        base.join(path)
            .map_err(|e| ConfigError::Invalid(format!("upstream.base_url: {}", e)))
    }
}

impl Config {
    /// 从默认位置读取配置，`AP_SCORING_CONFIG`可以指定其他路径
    pub fn load_from_env() -> Result<Config, ConfigError> {
        let path = std::env::var("AP_SCORING_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Config::load(Path::new(&path), |key| std::env::var(key).ok())
    }

    /// 读取配置文件并应用环境变量覆盖，文件不存在时全部使用默认值
    pub fn load<F>(path: &Path, env: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path)?;
            Config::from_toml_str(&contents)?
        } else {
            log::info!("配置文件{}不存在，使用默认配置", path.display());
            Config::default()
        };
        config.apply_env(env)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Config, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    fn apply_env<F>(&mut self, env: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = env("AP_SCORING_BIND") {
            self.server.host = host;
        }
        if let Some(port) = env("AP_SCORING_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("AP_SCORING_PORT is not a port: {}", port)))?;
        }
        let provider_key = match self.upstream.provider {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
        };
        if let Some(key) = env("AP_SCORING_API_KEY") {
            self.upstream.api_key = key;
        } else if self.upstream.api_key.is_empty() {
            if let Some(key) = env(provider_key) {
                self.upstream.api_key = key;
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.model().trim().is_empty() {
            return Err(ConfigError::Invalid("upstream.model must not be empty".to_string()));
        }
        if self.upstream.timeout_secs == 0 {
            return Err(ConfigError::Invalid("upstream.timeout_secs must be greater than 0".to_string()));
        }
        self.upstream.endpoint()?;
        Ok(())
    }
}
