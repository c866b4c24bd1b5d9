use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::ScoringError;
use crate::grading_server::GradingServerHandle;
use crate::structs::score::ScoreRequest;
use crate::validator::validate;

// 对学生答案进行评分
pub(crate) async fn score(
    req_body: web::Json<ScoreRequest>,
    grading_server: web::Data<GradingServerHandle>,
) -> Result<HttpResponse, ScoringError> {
    let request_id = Uuid::new_v4();
    // 先校验再调用上游
    let fields = validate(&req_body).map_err(|e| {
        log::warn!("[{}] 拒绝评分请求: {}", request_id, e);
        e
    })?;
    log::info!(
        "[{}] 收到评分请求，答案{}字符，评分标准{}字符",
        request_id,
        fields.student_answer.chars().count(),
        fields.scoring_rubric.chars().count()
    );

    let result = grading_server.score(request_id, fields).await.map_err(|e| {
        log::error!("[{}] 评分失败: {}", request_id, e);
        e
    })?;
    log::info!(
        "[{}] 评分完成: {}/{} ({}%)",
        request_id,
        result.awarded_points,
        result.total_points,
        result.score
    );
    Ok(HttpResponse::Ok().json(result))
}
