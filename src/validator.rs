use serde_json::Value;

use crate::error::ScoringError;
use crate::structs::score::{ScoreFields, ScoreRequest};

/// 检查三个必填字段，全部存在且去掉空白后非空才算通过
pub fn validate(request: &ScoreRequest) -> Result<ScoreFields, ScoringError> {
    Ok(ScoreFields {
        question: required_text(request.get("question"), "question")?,
        student_answer: required_text(request.get("student_answer"), "student_answer")?,
        scoring_rubric: required_text(request.get("scoring_rubric"), "scoring_rubric")?,
    })
}

fn required_text(value: Option<&Value>, field: &str) -> Result<String, ScoringError> {
    match value {
        None | Some(Value::Null) => Err(ScoringError::validation(format!("{} is required", field))),
        Some(Value::String(text)) => {
            let text = text.trim();
            if text.is_empty() {
                Err(ScoringError::validation(format!("{} must not be empty", field)))
            } else {
                Ok(text.to_string())
            }
        }
        Some(_) => Err(ScoringError::validation(format!("{} must be a string", field))),
    }
}
