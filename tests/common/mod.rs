#![allow(dead_code)]

use ap_scoring_server::config::{Provider, UpstreamConfig};
use ap_scoring_server::grading_server::{GradingServer, GradingServerHandle};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const API_KEY: &str = "test-key";

pub fn upstream_config(server: &MockServer, provider: Provider) -> UpstreamConfig {
    UpstreamConfig {
        provider,
        base_url: Some(server.uri()),
        api_key: API_KEY.to_string(),
        timeout_secs: 5,
        ..UpstreamConfig::default()
    }
}

/// 启动评分网关并返回handle
pub fn start_gateway(config: UpstreamConfig) -> GradingServerHandle {
    let (server, handle) = GradingServer::new(config).unwrap();
    tokio::spawn(server.run());
    handle
}

pub fn grading_json(total: f64, awarded: f64) -> Value {
    json!({
        "total_points": total,
        "awarded_points": awarded,
        "score": 0,
        "rationale_for_the_score": "You named a valid cause but did not explain it.",
        "feedback_to_the_student": [
            "Consider explaining how the cause leads to the effect.",
            "Use the vocabulary from the unit.",
            "Tie your answer back to the question."
        ]
    })
}

pub fn openai_envelope(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

pub fn anthropic_envelope(content: &str) -> Value {
    json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "content": [{ "type": "text", "text": content }],
        "stop_reason": "end_turn"
    })
}

pub fn score_body() -> Value {
    json!({
        "question": "Q",
        "student_answer": "A",
        "scoring_rubric": "1 point for X"
    })
}
