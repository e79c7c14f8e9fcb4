//! Ticket operations shared by the REST routes and the MCP tools.
//!
//! The service holds no mutable state: every call goes straight to the
//! upstream tracker and parses a fresh response.

use std::sync::Arc;

use tracing::info;

use crate::config::JiraConfig;
use crate::errors::{require, JiraResult};
use crate::jira::parser::{parse_ticket, parse_transition};
use crate::jira::{resolve_transition, IssueTracker, JiraClient, SearchQuery, TransitionAck};
use crate::models::{ChangedTicket, StatusChange, Ticket, Transition};

pub struct IssueService {
    tracker: Arc<dyn IssueTracker>,
}

impl IssueService {
    pub fn new(tracker: Arc<dyn IssueTracker>) -> Self {
        Self { tracker }
    }

    /// Service backed by a live Jira client
    pub fn from_config(config: &JiraConfig) -> JiraResult<Self> {
        Ok(Self::new(Arc::new(JiraClient::new(config)?)))
    }

    pub async fn get_ticket(&self, ticket_key: &str) -> JiraResult<Ticket> {
        require(ticket_key, "ticket_key")?;
        info!("Getting ticket: {}", ticket_key);

        let raw = self.tracker.get_issue(ticket_key).await?;
        Ok(parse_ticket(raw))
    }

    pub async fn search_tickets(&self, jql: &str, limit: Option<u32>) -> JiraResult<Vec<Ticket>> {
        self.search(SearchQuery::jql(jql, limit)?).await
    }

    pub async fn search_tickets_by_text(
        &self,
        text: &str,
        limit: Option<u32>,
    ) -> JiraResult<Vec<Ticket>> {
        info!("Searching for tickets containing text: {}", text);
        self.search(SearchQuery::text(text, limit)?).await
    }

    pub async fn get_tickets_by_project(
        &self,
        project_key: &str,
        limit: Option<u32>,
    ) -> JiraResult<Vec<Ticket>> {
        info!("Getting tickets for project: {}", project_key);
        self.search(SearchQuery::project(project_key, limit)?).await
    }

    pub async fn get_my_assigned_tickets(&self, limit: Option<u32>) -> JiraResult<Vec<Ticket>> {
        info!("Getting my assigned tickets");
        self.search(SearchQuery::assigned_to_me(limit)).await
    }

    pub async fn get_recently_updated_tickets(
        &self,
        limit: Option<u32>,
    ) -> JiraResult<Vec<Ticket>> {
        info!("Getting recently updated tickets");
        self.search(SearchQuery::recent(limit)).await
    }

    pub async fn get_transitions(&self, ticket_key: &str) -> JiraResult<Vec<Transition>> {
        require(ticket_key, "ticket_key")?;

        let raw = self.tracker.get_transitions(ticket_key).await?;
        Ok(raw.into_iter().map(parse_transition).collect())
    }

    /// Move a ticket to `status_name`.
    ///
    /// Transitions are fetched right before resolving, so an id is never
    /// reused across calls. Steps run strictly in order: list, resolve,
    /// execute, re-fetch.
    pub async fn change_status(
        &self,
        ticket_key: &str,
        status_name: &str,
    ) -> JiraResult<StatusChange> {
        info!("Changing status of ticket {} to {}", ticket_key, status_name);
        require(ticket_key, "ticket_key")?;
        require(status_name, "status_name")?;

        let transitions = self.get_transitions(ticket_key).await?;
        let transition = resolve_transition(ticket_key, &transitions, status_name)?;

        match self
            .tracker
            .transition_issue(ticket_key, &transition.id)
            .await?
        {
            TransitionAck::Applied => {
                info!(
                    "Successfully changed status of {} to {}",
                    ticket_key, status_name
                );
                let updated = self.get_ticket(ticket_key).await?;
                Ok(StatusChange {
                    success: true,
                    message: format!("Status changed to {}", status_name),
                    ticket: Some(ChangedTicket::from(&updated)),
                })
            }
            TransitionAck::Unexpected(status) => {
                tracing::warn!(
                    "Transition of {} answered with HTTP {} instead of 204",
                    ticket_key,
                    status
                );
                Ok(StatusChange {
                    success: false,
                    message: "Unknown error occurred".to_string(),
                    ticket: None,
                })
            }
        }
    }

    async fn search(&self, query: SearchQuery) -> JiraResult<Vec<Ticket>> {
        info!("Searching for tickets with JQL: {}", query.jql);

        let raw = self.tracker.search_issues(&query).await?;
        let tickets: Vec<Ticket> = raw.into_iter().map(parse_ticket).collect();

        info!("Found {} tickets", tickets.len());
        Ok(tickets)
    }
}
