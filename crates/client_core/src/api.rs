use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{AnswerSet, QuestionGroups},
    protocol::{QuestionGroupsResponse, SubmitAnswersRequest, SubmitAnswersResponse},
};
use tracing::{info, warn};
use url::Url;

use crate::config::ClientConfig;

pub const QUESTIONS_ROUTE: &str = "api/questions";
pub const RESPONSES_ROUTE: &str = "api/responses";

#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn fetch_groups(&self) -> Result<QuestionGroups>;
}

#[async_trait]
pub trait AnswerSink: Send + Sync {
    async fn submit_answers(&self, answers: &AnswerSet) -> Result<()>;
}

/// Question source and answer sink backed by the NeuroCare HTTP API.
#[derive(Debug, Clone)]
pub struct HttpQuestionnaireApi {
    http: Client,
    base_url: Url,
}

impl HttpQuestionnaireApi {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            http,
            base_url: config.base_url()?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, route: &str) -> Result<Url> {
        self.base_url
            .join(route)
            .with_context(|| format!("invalid endpoint '{route}' for {}", self.base_url))
    }
}

#[async_trait]
impl QuestionSource for HttpQuestionnaireApi {
    async fn fetch_groups(&self) -> Result<QuestionGroups> {
        let url = self.endpoint(QUESTIONS_ROUTE)?;
        let res = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()?;
        let body: QuestionGroupsResponse = res
            .json()
            .await
            .context("question payload is not shaped like {\"groups\": {...}}")?;
        info!(groups = body.groups.len(), "api: fetched question groups");
        Ok(body.groups)
    }
}

#[async_trait]
impl AnswerSink for HttpQuestionnaireApi {
    async fn submit_answers(&self, answers: &AnswerSet) -> Result<()> {
        let url = self.endpoint(RESPONSES_ROUTE)?;
        let res = self
            .http
            .post(url.clone())
            .json(&SubmitAnswersRequest {
                answers: answers.clone(),
            })
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()?;

        match res.json::<SubmitAnswersResponse>().await {
            Ok(body) => info!(
                response_id = body.response_id.map(|id| id.0),
                message = %body.message,
                "api: answers accepted"
            ),
            Err(error) => warn!(%error, "api: answers accepted with unreadable body"),
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
