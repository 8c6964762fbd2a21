use shared::{
    domain::{AnswerSet, QuestionGroups, ResponseId},
    error::{ApiError, ErrorCode},
    protocol::{StoredResponsePayload, StructuredAnswer},
};
use storage::Storage;
use tracing::{info, warn};

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub fn questions_route() -> &'static str {
    "/api/questions"
}

pub fn responses_route() -> &'static str {
    "/api/responses"
}

pub async fn list_question_groups(ctx: &ApiContext) -> Result<QuestionGroups, ApiError> {
    let groups = ctx
        .storage
        .list_question_groups()
        .await
        .map_err(internal)?;
    Ok(groups)
}

/// Resolves each answer against the stored questions and records the set as one response.
///
/// Answers for unknown question ids are skipped. An answer naming an option the
/// question does not offer rejects the whole submission.
pub async fn save_responses(ctx: &ApiContext, answers: &AnswerSet) -> Result<ResponseId, ApiError> {
    if answers.is_empty() {
        return Err(validation("answers must not be empty"));
    }

    let mut structured = Vec::with_capacity(answers.len());
    for (question_id, selected_option) in answers.iter() {
        let Some(question) = ctx.storage.question(question_id).await.map_err(internal)? else {
            warn!(%question_id, "skipping answer for unknown question");
            continue;
        };
        if !question.offers(selected_option) {
            return Err(validation(format!(
                "'{selected_option}' is not an option of question '{question_id}'"
            )));
        }
        structured.push(StructuredAnswer {
            question_id: question.id,
            question: question.question,
            selected_option: selected_option.to_string(),
        });
    }

    if structured.is_empty() {
        return Err(validation("no answer matched a known question"));
    }

    let response_id = ctx
        .storage
        .insert_response(&structured)
        .await
        .map_err(internal)?;
    info!(
        response_id = response_id.0,
        answers = structured.len(),
        "stored questionnaire response"
    );
    Ok(response_id)
}

pub async fn get_response(
    ctx: &ApiContext,
    response_id: ResponseId,
) -> Result<StoredResponsePayload, ApiError> {
    let stored = ctx
        .storage
        .response(response_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| {
            ApiError::new(
                ErrorCode::NotFound,
                format!("response {} not found", response_id.0),
            )
        })?;
    Ok(StoredResponsePayload {
        response_id: stored.response_id,
        answers: stored.answers,
        created_at: stored.created_at,
    })
}

fn validation(message: impl Into<String>) -> ApiError {
    ApiError::new(ErrorCode::Validation, message)
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, err.to_string())
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
