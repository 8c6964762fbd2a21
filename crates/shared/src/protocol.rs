use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AnswerSet, QuestionGroups, QuestionId, ResponseId};

/// Body of `GET /api/questions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionGroupsResponse {
    pub groups: QuestionGroups,
}

/// Body of `POST /api/responses`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitAnswersRequest {
    pub answers: AnswerSet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAnswersResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_id: Option<ResponseId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredAnswer {
    pub question_id: QuestionId,
    pub question: String,
    pub selected_option: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredResponsePayload {
    pub response_id: ResponseId,
    pub answers: Vec<StructuredAnswer>,
    pub created_at: DateTime<Utc>,
}
