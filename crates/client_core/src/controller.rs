use shared::domain::{AnswerSet, Question, QuestionGroups, QuestionId};
use tracing::{debug, info, warn};

use crate::{
    api::{AnswerSink, QuestionSource},
    error::FlowError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Loading,
    LoadFailed { reason: String },
    NoQuestions,
    InProgress,
    Submitting,
    Completed,
}

impl FlowState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::LoadFailed { .. } => "load failed",
            Self::NoQuestions => "empty",
            Self::InProgress => "in progress",
            Self::Submitting => "submitting",
            Self::Completed => "completed",
        }
    }
}

/// Position as (group index, question index within that group).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub group: usize,
    pub question: usize,
}

impl Cursor {
    pub fn new(group: usize, question: usize) -> Self {
        Self { group, question }
    }
}

/// What "Back" does to the answer of the question being left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RetreatPolicy {
    #[default]
    KeepAnswers,
    DiscardAbandoned,
}

/// Drives one questionnaire session: load, answer, navigate, submit.
///
/// Navigation and answering are only accepted while [`FlowState::InProgress`].
/// A controller that reaches [`FlowState::Completed`] stays there; start a new
/// session with a new controller.
#[derive(Debug)]
pub struct QuestionnaireController {
    state: FlowState,
    groups: QuestionGroups,
    answers: AnswerSet,
    cursor: Cursor,
    retreat_policy: RetreatPolicy,
}

impl Default for QuestionnaireController {
    fn default() -> Self {
        Self::new(RetreatPolicy::default())
    }
}

impl QuestionnaireController {
    pub fn new(retreat_policy: RetreatPolicy) -> Self {
        Self {
            state: FlowState::Loading,
            groups: QuestionGroups::new(),
            answers: AnswerSet::new(),
            cursor: Cursor::default(),
            retreat_policy,
        }
    }

    pub async fn load(&mut self, source: &dyn QuestionSource) -> Result<(), FlowError> {
        self.expect_state(&FlowState::Loading)?;
        let fetched = source.fetch_groups().await;
        self.finish_load(fetched)
    }

    /// Applies the outcome of a question fetch started while `Loading`.
    pub fn finish_load(&mut self, fetched: anyhow::Result<QuestionGroups>) -> Result<(), FlowError> {
        self.expect_state(&FlowState::Loading)?;

        let groups = match fetched {
            Ok(groups) => groups.without_empty_groups(),
            Err(err) => return Err(self.fail_load(format!("{err:#}"))),
        };
        if let Err(err) = groups.validate() {
            return Err(self.fail_load(format!("malformed question data: {err}")));
        }

        if groups.is_empty() {
            info!("questionnaire: no questions available");
            self.state = FlowState::NoQuestions;
            return Ok(());
        }

        info!(
            groups = groups.len(),
            questions = groups.total_questions(),
            "questionnaire: questions loaded"
        );
        self.groups = groups;
        self.cursor = Cursor::default();
        self.state = FlowState::InProgress;
        Ok(())
    }

    fn fail_load(&mut self, reason: String) -> FlowError {
        warn!(%reason, "questionnaire: load failed");
        self.state = FlowState::LoadFailed {
            reason: reason.clone(),
        };
        FlowError::LoadFailed(reason)
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn retreat_policy(&self) -> RetreatPolicy {
        self.retreat_policy
    }

    pub fn groups(&self) -> &QuestionGroups {
        &self.groups
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn selected_option(&self, question_id: &QuestionId) -> Option<&str> {
        self.answers.get(question_id)
    }

    pub fn total_questions(&self) -> usize {
        self.groups.total_questions()
    }

    /// `(answered, total)` over the loaded questions.
    pub fn progress(&self) -> (usize, usize) {
        let total = self.total_questions();
        (total - self.unanswered().len(), total)
    }

    fn has_questions(&self) -> bool {
        matches!(
            self.state,
            FlowState::InProgress | FlowState::Submitting | FlowState::Completed
        )
    }

    pub fn current_group_name(&self) -> Option<&str> {
        if !self.has_questions() {
            return None;
        }
        self.groups.group_at(self.cursor.group).map(|(name, _)| name)
    }

    pub fn current_question(&self) -> Option<&Question> {
        if !self.has_questions() {
            return None;
        }
        self.groups
            .group_at(self.cursor.group)
            .and_then(|(_, questions)| questions.get(self.cursor.question))
    }

    pub fn is_at_first_question(&self) -> bool {
        self.has_questions() && self.cursor == Cursor::default()
    }

    pub fn is_at_last_question(&self) -> bool {
        if !self.has_questions() {
            return false;
        }
        let last_group = self.groups.len() - 1;
        match self.groups.group_at(last_group) {
            Some((_, questions)) => self.cursor == Cursor::new(last_group, questions.len() - 1),
            None => false,
        }
    }

    /// Question ids without an answer, in presentation order.
    pub fn unanswered(&self) -> Vec<QuestionId> {
        self.groups
            .questions()
            .filter(|question| !self.answers.contains(&question.id))
            .map(|question| question.id.clone())
            .collect()
    }

    pub fn select_option(&mut self, question_id: &QuestionId, option: &str) -> Result<(), FlowError> {
        self.accepting_input()?;
        let current = self
            .current_question()
            .ok_or_else(|| FlowError::CallerContract("no question at cursor".into()))?;
        if &current.id != question_id {
            return Err(FlowError::CallerContract(format!(
                "question '{question_id}' is not displayed; cursor is on '{}'",
                current.id
            )));
        }
        if !current.offers(option) {
            return Err(FlowError::CallerContract(format!(
                "'{option}' is not an option of question '{question_id}'"
            )));
        }

        let id = current.id.clone();
        debug!(question_id = %id, option, "questionnaire: option selected");
        self.answers.record(id, option);
        Ok(())
    }

    /// Moves to the next question. Returns `false` at the terminal position.
    pub fn advance(&mut self) -> Result<bool, FlowError> {
        self.accepting_input()?;
        let next = if self.cursor.question + 1 < self.group_len(self.cursor.group) {
            Cursor::new(self.cursor.group, self.cursor.question + 1)
        } else if self.cursor.group + 1 < self.groups.len() {
            Cursor::new(self.cursor.group + 1, 0)
        } else {
            return Ok(false);
        };
        self.move_to(next);
        Ok(true)
    }

    /// Moves to the previous question. Returns `false` at the first question.
    pub fn retreat(&mut self) -> Result<bool, FlowError> {
        self.accepting_input()?;
        let previous = if self.cursor.question > 0 {
            Cursor::new(self.cursor.group, self.cursor.question - 1)
        } else if self.cursor.group > 0 {
            let group = self.cursor.group - 1;
            Cursor::new(group, self.group_len(group) - 1)
        } else {
            return Ok(false);
        };

        if self.retreat_policy == RetreatPolicy::DiscardAbandoned {
            if let Some(id) = self.current_question().map(|q| q.id.clone()) {
                if self.answers.remove(&id).is_some() {
                    debug!(question_id = %id, "questionnaire: answer discarded on back");
                }
            }
        }
        self.move_to(previous);
        Ok(true)
    }

    /// Validates completeness and enters `Submitting`, returning the answers
    /// to hand to the sink.
    pub fn begin_submit(&mut self) -> Result<AnswerSet, FlowError> {
        self.accepting_input()?;
        let missing = self.unanswered();
        if !missing.is_empty() {
            warn!(missing = missing.len(), "questionnaire: submit blocked, answers missing");
            return Err(FlowError::Validation { missing });
        }
        self.state = FlowState::Submitting;
        Ok(self.answers.clone())
    }

    /// Applies the sink outcome of a submission started with
    /// [`Self::begin_submit`].
    pub fn finish_submit(&mut self, outcome: anyhow::Result<()>) -> Result<(), FlowError> {
        self.expect_state(&FlowState::Submitting)?;
        match outcome {
            Ok(()) => {
                info!(answers = self.answers.len(), "questionnaire: answers submitted");
                self.answers.clear();
                self.state = FlowState::Completed;
                Ok(())
            }
            Err(err) => {
                let reason = format!("{err:#}");
                warn!(%reason, "questionnaire: submission failed, answers kept");
                self.state = FlowState::InProgress;
                Err(FlowError::Submission(reason))
            }
        }
    }

    pub async fn submit(&mut self, sink: &dyn AnswerSink) -> Result<(), FlowError> {
        let answers = self.begin_submit()?;
        let outcome = sink.submit_answers(&answers).await;
        self.finish_submit(outcome)
    }

    fn group_len(&self, group: usize) -> usize {
        self.groups
            .group_at(group)
            .map_or(0, |(_, questions)| questions.len())
    }

    fn move_to(&mut self, cursor: Cursor) {
        debug!(
            group = cursor.group,
            question = cursor.question,
            "questionnaire: cursor moved"
        );
        self.cursor = cursor;
    }

    fn accepting_input(&self) -> Result<(), FlowError> {
        self.expect_state(&FlowState::InProgress)
    }

    fn expect_state(&self, expected: &FlowState) -> Result<(), FlowError> {
        if &self.state == expected {
            Ok(())
        } else {
            Err(FlowError::NotInProgress {
                state: self.state.name(),
            })
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
