use std::{collections::BTreeMap, fmt};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(ResponseId);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub question: String,
    pub options: Vec<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imagekey: Option<String>,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        question: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            id: QuestionId::new(id),
            question: question.into(),
            options: options.into_iter().map(Into::into).collect(),
            kind: None,
            imagekey: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_imagekey(mut self, imagekey: impl Into<String>) -> Self {
        self.imagekey = Some(imagekey.into());
        self
    }

    pub fn offers(&self, option: &str) -> bool {
        self.options.iter().any(|candidate| candidate == option)
    }

    /// Image key with blank values treated as absent.
    pub fn image_key(&self) -> Option<&str> {
        self.imagekey
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GroupsError {
    #[error("question id '{0}' appears more than once")]
    DuplicateQuestionId(QuestionId),
    #[error("question '{0}' has no options")]
    NoOptions(QuestionId),
}

/// Question groups keyed by name, iterated in presentation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionGroups(IndexMap<String, Vec<Question>>);

impl QuestionGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends questions to `name`, creating the group at the end if it is new.
    pub fn push(&mut self, name: impl Into<String>, question: Question) {
        self.0.entry(name.into()).or_default().push(question);
    }

    pub fn insert_group(&mut self, name: impl Into<String>, questions: Vec<Question>) {
        self.0.insert(name.into(), questions);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total_questions(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn group_at(&self, index: usize) -> Option<(&str, &[Question])> {
        self.0
            .get_index(index)
            .map(|(name, questions)| (name.as_str(), questions.as_slice()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Question])> {
        self.0
            .iter()
            .map(|(name, questions)| (name.as_str(), questions.as_slice()))
    }

    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.0.values().flatten()
    }

    pub fn find(&self, id: &QuestionId) -> Option<&Question> {
        self.questions().find(|question| &question.id == id)
    }

    /// Drops groups without questions, keeping the order of the rest.
    pub fn without_empty_groups(mut self) -> Self {
        self.0.retain(|_, questions| !questions.is_empty());
        self
    }

    pub fn validate(&self) -> Result<(), GroupsError> {
        let mut seen = std::collections::HashSet::new();
        for question in self.questions() {
            if !seen.insert(&question.id) {
                return Err(GroupsError::DuplicateQuestionId(question.id.clone()));
            }
            if question.options.is_empty() {
                return Err(GroupsError::NoOptions(question.id.clone()));
            }
        }
        Ok(())
    }
}

impl FromIterator<(String, Vec<Question>)> for QuestionGroups {
    fn from_iter<T: IntoIterator<Item = (String, Vec<Question>)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Selected option per question for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<QuestionId, String>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, id: QuestionId, option: impl Into<String>) {
        self.0.insert(id, option.into());
    }

    pub fn remove(&mut self, id: &QuestionId) -> Option<String> {
        self.0.remove(id)
    }

    pub fn get(&self, id: &QuestionId) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: &QuestionId) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &str)> {
        self.0.iter().map(|(id, option)| (id, option.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AnswerSet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(id, option)| (QuestionId(id.into()), option.into()))
                .collect(),
        )
    }
}
