use serde::Serialize;

use crate::models::{Ticket, Transition, User};

/// Ticket row used by every list result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketSummary {
    pub key: Option<String>,
    pub id: Option<String>,
    pub summary: Option<String>,
    pub status: Option<String>,
    pub assignee: Option<String>,
    pub updated: Option<String>,
}

impl From<&Ticket> for TicketSummary {
    fn from(ticket: &Ticket) -> Self {
        Self {
            key: ticket.key.clone(),
            id: ticket.id.clone(),
            summary: ticket.fields.summary.clone(),
            status: ticket.status_name().map(str::to_string),
            assignee: ticket.assignee_name().map(str::to_string),
            updated: ticket.fields.updated.clone(),
        }
    }
}

/// Single-ticket view with the self link and full people records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketDetail {
    pub key: Option<String>,
    pub id: Option<String>,
    #[serde(rename = "self")]
    pub self_url: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub issuetype: Option<String>,
    pub assignee: Option<User>,
    pub reporter: Option<User>,
    pub created: Option<String>,
    pub updated: Option<String>,
}

impl From<&Ticket> for TicketDetail {
    fn from(ticket: &Ticket) -> Self {
        let fields = &ticket.fields;
        Self {
            key: ticket.key.clone(),
            id: ticket.id.clone(),
            self_url: ticket.self_url.clone(),
            summary: fields.summary.clone(),
            description: fields.description.clone(),
            status: ticket.status_name().map(str::to_string),
            priority: fields.priority.as_ref().and_then(|p| p.name.clone()),
            issuetype: fields.issue_type.as_ref().and_then(|t| t.name.clone()),
            assignee: fields.assignee.clone(),
            reporter: fields.reporter.clone(),
            created: fields.created.clone(),
            updated: fields.updated.clone(),
        }
    }
}

pub fn summaries(tickets: &[Ticket]) -> Vec<TicketSummary> {
    tickets.iter().map(TicketSummary::from).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionList {
    pub transitions: Vec<Transition>,
}
