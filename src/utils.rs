use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

lazy_static! {
    // markdown代码块，模型经常会把json包在```json ... ```里
    static ref FENCED_BLOCK: Regex = Regex::new(r"(?s)```[A-Za-z]*\s*(.*?)\s*```").unwrap();
}

/// 从模型返回的文本中找出json对象
///
/// 依次尝试：整段文本、代码块内容、第一个`{`到最后一个`}`之间的内容
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    let trimmed = text.trim();
    if let Some(map) = parse_object(trimmed) {
        return Some(map);
    }
    for caps in FENCED_BLOCK.captures_iter(trimmed) {
        if let Some(map) = caps.get(1).and_then(|body| parse_object(body.as_str())) {
            return Some(map);
        }
    }
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    parse_object(&trimmed[start..=end])
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

// 保留一位小数
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
