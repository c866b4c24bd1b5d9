use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// 客户端提交的原始评分请求，只接受json对象，字段类型在校验阶段再检查
pub type ScoreRequest = Map<String, Value>;

// 通过校验后的三个文本字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreFields {
    pub question: String,
    pub student_answer: String,
    pub scoring_rubric: String,
}

// 返回给客户端的评分结果
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub total_points: f64,
    pub awarded_points: f64,
    pub score: f64,
    pub rationale_for_the_score: String,
    pub feedback_to_the_student: Vec<String>,
}
