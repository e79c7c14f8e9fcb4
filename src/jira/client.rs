use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};
use tracing::debug;

use crate::config::JiraConfig;
use crate::errors::{JiraError, JiraResult};
use crate::jira::parser::{RawIssue, RawSearchResult, RawTransition, RawTransitions};
use crate::jira::query::SearchQuery;

/// How Jira acknowledged a transition request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionAck {
    /// `204 No Content`, the transition was applied
    Applied,
    /// Any other 2xx status
    Unexpected(u16),
}

/// Upstream issue tracker operations the service relies on
#[async_trait]
pub trait IssueTracker: Send + Sync {
    async fn get_issue(&self, key: &str) -> JiraResult<RawIssue>;

    async fn search_issues(&self, query: &SearchQuery) -> JiraResult<Vec<RawIssue>>;

    async fn get_transitions(&self, key: &str) -> JiraResult<Vec<RawTransition>>;

    async fn transition_issue(&self, key: &str, transition_id: &str) -> JiraResult<TransitionAck>;
}

/// Jira REST API v2 client using basic auth
pub struct JiraClient {
    client: Client,
    api_root: String,
    username: String,
    api_token: String,
}

impl JiraClient {
    pub fn new(config: &JiraConfig) -> JiraResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            api_root: config.api_root(),
            username: config.username.clone(),
            api_token: config.api_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_root, path)
    }

    // The key is a single path segment, so `/` and `?` must not escape it
    fn issue_url(&self, key: &str, suffix: &str) -> String {
        self.url(&format!("/issue/{}{}", urlencoding::encode(key), suffix))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> JiraResult<T> {
        let response = self
            .client
            .get(url)
            .basic_auth(&self.username, Some(&self.api_token))
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await?;

        let response = check_response(response).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn get_issue(&self, key: &str) -> JiraResult<RawIssue> {
        let url = self.issue_url(key, "");
        debug!("GET {}", url);
        self.get_json(&url, &[]).await
    }

    async fn search_issues(&self, query: &SearchQuery) -> JiraResult<Vec<RawIssue>> {
        let url = self.url("/search");
        debug!("GET {} jql={} maxResults={}", url, query.jql, query.max_results);

        let result: RawSearchResult = self
            .get_json(
                &url,
                &[
                    ("jql", query.jql.clone()),
                    ("maxResults", query.max_results.to_string()),
                ],
            )
            .await?;
        Ok(result.issues)
    }

    async fn get_transitions(&self, key: &str) -> JiraResult<Vec<RawTransition>> {
        let url = self.issue_url(key, "/transitions");
        debug!("GET {}", url);

        let result: RawTransitions = self.get_json(&url, &[]).await?;
        Ok(result.transitions)
    }

    async fn transition_issue(&self, key: &str, transition_id: &str) -> JiraResult<TransitionAck> {
        let url = self.issue_url(key, "/transitions");
        debug!("POST {} transition={}", url, transition_id);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.username, Some(&self.api_token))
            .json(&json!({ "transition": { "id": transition_id } }))
            .send()
            .await?;

        let response = check_response(response).await?;
        match response.status() {
            StatusCode::NO_CONTENT => Ok(TransitionAck::Applied),
            other => Ok(TransitionAck::Unexpected(other.as_u16())),
        }
    }
}

/// Turn a non-2xx response into `JiraError::Upstream` with the best message available
async fn check_response(response: Response) -> JiraResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(JiraError::Upstream {
        status: status.as_u16(),
        message: error_message(status, &body),
    })
}

// Jira error format: {"errorMessages":["..."], "errors":{"field":"..."}}
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let mut messages = Vec::new();

        if let Some(errors) = value.get("errorMessages").and_then(|e| e.as_array()) {
            messages.extend(errors.iter().filter_map(|e| e.as_str()).map(str::to_string));
        }

        if let Some(errors) = value.get("errors").and_then(|e| e.as_object()) {
            for (field, msg) in errors {
                if let Some(s) = msg.as_str() {
                    messages.push(format!("{}: {}", field, s));
                }
            }
        }

        if !messages.is_empty() {
            return messages.join("; ");
        }
    }

    if body.trim().is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        body.to_string()
    }
}
