use shared::domain::QuestionId;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("failed to load questions: {0}")]
    LoadFailed(String),
    #[error("{} question(s) still need an answer", missing.len())]
    Validation { missing: Vec<QuestionId> },
    #[error("failed to submit answers: {0}")]
    Submission(String),
    #[error("caller contract violated: {0}")]
    CallerContract(String),
    #[error("questionnaire is {state}, not accepting input")]
    NotInProgress { state: &'static str },
}

impl FlowError {
    pub fn missing(&self) -> &[QuestionId] {
        match self {
            Self::Validation { missing } => missing,
            _ => &[],
        }
    }
}
