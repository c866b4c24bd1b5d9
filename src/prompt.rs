use crate::structs::score::ScoreFields;

// 要求模型严格按照这个格式返回
const RESPONSE_TEMPLATE: &str = r#"{
  "total_points": "<maximum points possible based on rubric>",
  "awarded_points": "<points the student earned on this response>",
  "score": "<student's percentage score (awarded_points / total_points) * 100>",
  "rationale_for_the_score": "<personalized explanation of the student's score highlighting strengths and areas for growth>",
  "feedback_to_the_student": [
    "<first specific suggestion to help the student improve>",
    "<second specific suggestion to help the student improve>",
    "<third specific suggestion to help the student improve>"
  ]
}"#;

/// 生成发送给上游模型的评分提示词
pub fn build_scoring_prompt(fields: &ScoreFields) -> String {
    format!(
        r#"You are an encouraging AP teacher providing personalized feedback to help students improve. Your role is to evaluate their work and offer constructive guidance. When writing feedback, imagine having a supportive one-on-one conversation with the student.

Task Description:
1. Review the student's work with an encouraging mindset
2. Calculate points earned and total possible points
3. Determine the percentage score
4. Explain the score in a way that recognizes strengths while gently pointing out areas for growth
5. Provide specific, actionable suggestions for improvement

Components to Evaluate:
Question Answered: {question}
Student's Response: {answer}
Scoring Criteria: {rubric}

CRITICAL INSTRUCTIONS:
1. Respond with a JSON object containing these specific fields:
   - total_points: The maximum points possible for this question
   - awarded_points: The points earned by the student's response
   - score: The percentage score (awarded_points / total_points) * 100
   - rationale_for_the_score: A personalized 2-3 line explanation of the score, highlighting what the student did well and where they can grow
   - feedback_to_the_student: Exactly three specific suggestions written encouragingly (e.g., "Consider including more...")

IMPORTANT ADDITIONAL INSTRUCTION:
If the student's answer is similar to the reference text or is a direct copy-paste of the reference text, you must award zero points in awarded_points and score and explain the reason in the rationale. The total points follow the number of parts and the information required by the question.

2. Format Requirements:
   - Use this exact JSON format:
{template}
   - Use plain numbers for total_points, awarded_points and score
   - Keep all feedback within the JSON structure
   - Avoid any additional formatting

Note: All feedback should be:
- Personalized to the student's response
- Specific and actionable
- Encouraging and constructive
- Focused on improvement
- Relevant to AP course standards

Any response not in the exact JSON format specified above cannot be used. Respond with the JSON object only.
"#,
        question = fields.question,
        answer = fields.student_answer,
        rubric = fields.scoring_rubric,
        template = RESPONSE_TEMPLATE,
    )
}
