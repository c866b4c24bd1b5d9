use serde_json::{Map, Value};

use crate::error::ScoringError;
use crate::structs::score::ScoreResult;
use crate::utils::{extract_json_object, round_one_decimal};

/// 返回给学生的建议条数
pub const FEEDBACK_ITEMS: usize = 3;

/// 把模型返回的文本解析为评分结果
///
/// score 一律按 awarded_points / total_points 重新计算，模型给出的值会被忽略。
/// 建议少于三条视为解析失败，多于三条只保留前三条。
pub fn parse_completion(text: &str) -> Result<ScoreResult, ScoringError> {
    let object = extract_json_object(text)
        .ok_or_else(|| ScoringError::parse("no JSON object found in model output"))?;

    let total_points = read_points(&object, "total_points")?;
    let awarded_points = read_points(&object, "awarded_points")?;
    if total_points <= 0.0 {
        return Err(ScoringError::parse(format!(
            "total_points must be greater than zero, got {}",
            total_points
        )));
    }
    if awarded_points < 0.0 || awarded_points > total_points {
        return Err(ScoringError::parse(format!(
            "awarded_points {} is outside 0..={}",
            awarded_points, total_points
        )));
    }

    let rationale = match object.get("rationale_for_the_score") {
        Some(Value::String(text)) if !text.trim().is_empty() => text.trim().to_string(),
        Some(Value::String(_)) => return Err(ScoringError::parse("rationale_for_the_score is empty")),
        Some(_) => return Err(ScoringError::parse("rationale_for_the_score must be a string")),
        None => return Err(ScoringError::parse("rationale_for_the_score is missing")),
    };

    let feedback = read_feedback(&object)?;

    Ok(ScoreResult {
        total_points,
        awarded_points,
        score: round_one_decimal(awarded_points / total_points * 100.0),
        rationale_for_the_score: rationale,
        feedback_to_the_student: feedback,
    })
}

// 数字和数字字符串都接受
fn read_points(object: &Map<String, Value>, key: &str) -> Result<f64, ScoringError> {
    let value = match object.get(key) {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        Some(Value::Null) | None => return Err(ScoringError::parse(format!("{} is missing", key))),
        Some(_) => None,
    };
    match value {
        Some(points) if points.is_finite() => Ok(points),
        _ => Err(ScoringError::parse(format!("{} is not a number", key))),
    }
}

fn read_feedback(object: &Map<String, Value>) -> Result<Vec<String>, ScoringError> {
    let items = match object.get("feedback_to_the_student") {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(ScoringError::parse("feedback_to_the_student must be a list")),
        None => return Err(ScoringError::parse("feedback_to_the_student is missing")),
    };
    let mut feedback = Vec::with_capacity(FEEDBACK_ITEMS);
    for item in items {
        match item {
            Value::String(text) if text.trim().is_empty() => continue,
            Value::String(text) => feedback.push(text.trim().to_string()),
            _ => return Err(ScoringError::parse("feedback_to_the_student must contain only text")),
        }
    }
    if feedback.len() < FEEDBACK_ITEMS {
        return Err(ScoringError::parse(format!(
            "expected {} feedback items, got {}",
            FEEDBACK_ITEMS,
            feedback.len()
        )));
    }
    feedback.truncate(FEEDBACK_ITEMS);
    Ok(feedback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn completion(value: Value) -> String {
        value.to_string()
    }

    fn parse_error(result: Result<ScoreResult, ScoringError>) -> String {
        match result {
            Err(ScoringError::Parse(msg)) => msg,
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    fn valid() -> Value {
        json!({
            "total_points": 2,
            "awarded_points": 1,
            "score": 50,
            "rationale_for_the_score": "You identified X but missed Y.",
            "feedback_to_the_student": ["First", "Second", "Third"],
        })
    }

    #[test]
    fn half_credit_scores_fifty() {
        let result = parse_completion(&completion(valid())).unwrap();
        assert_eq!(result.total_points, 2.0);
        assert_eq!(result.awarded_points, 1.0);
        assert_eq!(result.score, 50.0);
        assert_eq!(result.rationale_for_the_score, "You identified X but missed Y.");
        assert_eq!(result.feedback_to_the_student, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn upstream_score_is_recomputed() {
        let mut value = valid();
        value["total_points"] = json!(3);
        value["awarded_points"] = json!(2);
        value["score"] = json!(90);
        let result = parse_completion(&completion(value)).unwrap();
        assert_eq!(result.score, 66.7);
    }

    #[test]
    fn missing_upstream_score_is_fine() {
        let mut value = valid();
        value.as_object_mut().unwrap().remove("score");
        assert_eq!(parse_completion(&completion(value)).unwrap().score, 50.0);
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let mut value = valid();
        value["total_points"] = json!("4");
        value["awarded_points"] = json!(" 3.5 ");
        let result = parse_completion(&completion(value)).unwrap();
        assert_eq!(result.total_points, 4.0);
        assert_eq!(result.awarded_points, 3.5);
        assert_eq!(result.score, 87.5);
    }

    #[test]
    fn fenced_output_is_parsed() {
        let text = format!("```json\n{}\n```", serde_json::to_string_pretty(&valid()).unwrap());
        assert_eq!(parse_completion(&text).unwrap().score, 50.0);
    }

    #[test]
    fn zero_total_is_rejected() {
        let mut value = valid();
        value["total_points"] = json!(0);
        value["awarded_points"] = json!(0);
        assert!(parse_error(parse_completion(&completion(value))).contains("greater than zero"));
    }

    #[test]
    fn missing_total_is_rejected() {
        let mut value = valid();
        value.as_object_mut().unwrap().remove("total_points");
        assert_eq!(parse_error(parse_completion(&completion(value))), "total_points is missing");
    }

    #[test]
    fn non_numeric_points_are_rejected() {
        let mut value = valid();
        value["awarded_points"] = json!("one");
        assert_eq!(parse_error(parse_completion(&completion(value))), "awarded_points is not a number");
    }

    #[test]
    fn awarded_above_total_is_rejected() {
        let mut value = valid();
        value["awarded_points"] = json!(3);
        assert!(parse_error(parse_completion(&completion(value))).contains("outside"));
    }

    #[test]
    fn negative_awarded_is_rejected() {
        let mut value = valid();
        value["awarded_points"] = json!(-1);
        assert!(parse_error(parse_completion(&completion(value))).contains("outside"));
    }

    #[test]
    fn zero_awarded_scores_zero() {
        let mut value = valid();
        value["awarded_points"] = json!(0);
        assert_eq!(parse_completion(&completion(value)).unwrap().score, 0.0);
    }

    #[test]
    fn extra_feedback_is_truncated() {
        let mut value = valid();
        value["feedback_to_the_student"] = json!(["a", "b", "c", "d", "e"]);
        let result = parse_completion(&completion(value)).unwrap();
        assert_eq!(result.feedback_to_the_student, vec!["a", "b", "c"]);
    }

    #[test]
    fn short_feedback_is_rejected() {
        let mut value = valid();
        value["feedback_to_the_student"] = json!(["a", "b"]);
        assert_eq!(
            parse_error(parse_completion(&completion(value))),
            "expected 3 feedback items, got 2"
        );
    }

    #[test]
    fn blank_feedback_does_not_count() {
        let mut value = valid();
        value["feedback_to_the_student"] = json!(["a", "  ", "b"]);
        assert!(parse_completion(&completion(value)).is_err());
    }

    #[test]
    fn feedback_must_be_text() {
        let mut value = valid();
        value["feedback_to_the_student"] = json!(["a", 2, "c"]);
        assert!(parse_error(parse_completion(&completion(value))).contains("only text"));

        let mut value = valid();
        value["feedback_to_the_student"] = json!("just one string");
        assert!(parse_error(parse_completion(&completion(value))).contains("must be a list"));
    }

    #[test]
    fn missing_rationale_is_rejected() {
        let mut value = valid();
        value.as_object_mut().unwrap().remove("rationale_for_the_score");
        assert_eq!(
            parse_error(parse_completion(&completion(value))),
            "rationale_for_the_score is missing"
        );
    }

    #[test]
    fn prose_without_json_is_rejected() {
        assert_eq!(
            parse_error(parse_completion("I'm sorry, I can't grade this answer.")),
            "no JSON object found in model output"
        );
    }
}
