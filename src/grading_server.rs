use std::io;

use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::config::UpstreamConfig;
use crate::error::{ConfigError, ScoringError};
use crate::parser::parse_completion;
use crate::prompt::build_scoring_prompt;
use crate::structs::score::{ScoreFields, ScoreResult};
use crate::upstream::UpstreamClient;

#[derive(Debug)]
enum Command {
    Score {
        request_id: Uuid,
        fields: ScoreFields,
        res_tx: oneshot::Sender<Result<ScoreResult, ScoringError>>,
    },
}

/// 评分网关，负责调用上游模型并把结果规整为ScoreResult
pub struct GradingServer {
    client: UpstreamClient,

    /// 接收命令的管道
    cmd_rx: mpsc::UnboundedReceiver<Command>,
}

/// 命令执行层
impl GradingServer {
    pub fn new(config: UpstreamConfig) -> Result<(GradingServer, GradingServerHandle), ConfigError> {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let client = UpstreamClient::new(config)?;
        log::info!("评分网关使用上游接口: {}", client.endpoint());
        Ok((GradingServer { client, cmd_rx }, GradingServerHandle { cmd_tx }))
    }

    pub async fn run(mut self) -> io::Result<()> {
        while let Some(cmd) = self.cmd_rx.recv().await {
            match cmd {
                Command::Score { request_id, fields, res_tx } => {
                    // 每个请求单独一个任务，互不阻塞
                    let client = self.client.clone();
                    tokio::spawn(score_or_cancel(client, request_id, fields, res_tx));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Delivered,
    Cancelled,
}

// 客户端断开后res_rx会被丢弃，此时直接放弃上游调用
async fn score_or_cancel(
    client: UpstreamClient,
    request_id: Uuid,
    fields: ScoreFields,
    mut res_tx: oneshot::Sender<Result<ScoreResult, ScoringError>>,
) -> Outcome {
    let result = tokio::select! {
        result = grade(&client, request_id, &fields) => Some(result),
        _ = res_tx.closed() => None,
    };
    match result {
        Some(result) => {
            let _ = res_tx.send(result);
            Outcome::Delivered
        }
        None => {
            log::warn!("[{}] 客户端已断开，取消上游调用", request_id);
            Outcome::Cancelled
        }
    }
}

async fn grade(client: &UpstreamClient, request_id: Uuid, fields: &ScoreFields) -> Result<ScoreResult, ScoringError> {
    let prompt = build_scoring_prompt(fields);
    let completion = client.complete(&prompt).await?;
    log::debug!("[{}] 上游返回内容: {}", request_id, completion);
    parse_completion(&completion)
}

/// handler层
#[derive(Debug, Clone)]
pub struct GradingServerHandle {
    cmd_tx: mpsc::UnboundedSender<Command>,
}

impl GradingServerHandle {
    /// 对一份已校验的答案评分
    pub async fn score(&self, request_id: Uuid, fields: ScoreFields) -> Result<ScoreResult, ScoringError> {
        let (res_tx, res_rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Score { request_id, fields, res_tx })
            .map_err(|_| ScoringError::upstream("grading gateway is not running"))?;
        res_rx
            .await
            .map_err(|_| ScoringError::upstream("grading gateway dropped the request"))?
    }
}
