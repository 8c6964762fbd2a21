//! Client side of the NeuroCare questionnaire: the flow controller, the HTTP
//! question source and answer sink, and the read-only app content.

pub mod api;
pub mod config;
pub mod content;
pub mod controller;
pub mod error;
pub mod images;
pub mod theme;

pub use api::{AnswerSink, HttpQuestionnaireApi, QuestionSource};
pub use config::{load_client_config, ClientConfig};
pub use controller::{Cursor, FlowState, QuestionnaireController, RetreatPolicy};
pub use error::FlowError;
