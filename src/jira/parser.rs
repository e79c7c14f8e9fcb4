//! Projection of raw Jira REST payloads onto the ticket model.
//!
//! The raw structs mirror the upstream JSON with every nested object
//! optional, so a missing or `null` sub-object deserializes to `None`
//! instead of failing. The projection functions never fail.

use serde::Deserialize;

use crate::models::{Fields, IssueType, Priority, Status, Ticket, Transition, User};

/// Issue as returned by `GET /issue/{key}` and inside search results
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawIssue {
    pub id: Option<String>,
    pub key: Option<String>,
    #[serde(rename = "self")]
    pub self_url: Option<String>,
    pub fields: Option<RawFields>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFields {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub status: Option<RawStatus>,
    pub priority: Option<RawPriority>,
    pub issuetype: Option<RawIssueType>,
    pub assignee: Option<RawUser>,
    pub reporter: Option<RawUser>,
    pub created: Option<String>,
    pub updated: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStatus {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPriority {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawIssueType {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUser {
    pub display_name: Option<String>,
    pub email_address: Option<String>,
}

/// Body of `GET /search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSearchResult {
    #[serde(default)]
    pub issues: Vec<RawIssue>,
}

/// Body of `GET /issue/{key}/transitions`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTransitions {
    #[serde(default)]
    pub transitions: Vec<RawTransition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTransition {
    pub id: String,
    pub name: Option<String>,
    pub to: Option<RawStatus>,
}

pub fn parse_ticket(raw: RawIssue) -> Ticket {
    let fields = raw.fields.unwrap_or_default();

    Ticket {
        id: raw.id,
        key: raw.key,
        self_url: raw.self_url,
        fields: Fields {
            summary: fields.summary,
            description: fields.description,
            status: fields.status.map(parse_status),
            priority: fields.priority.map(|p| Priority { name: p.name }),
            issue_type: fields.issuetype.map(|t| IssueType {
                name: t.name,
                description: t.description,
            }),
            assignee: fields.assignee.map(parse_user),
            reporter: fields.reporter.map(parse_user),
            created: fields.created,
            updated: fields.updated,
        },
    }
}

pub fn parse_transition(raw: RawTransition) -> Transition {
    Transition {
        id: raw.id,
        name: raw.name,
        to: raw.to.map(parse_status).unwrap_or_default(),
    }
}

fn parse_status(raw: RawStatus) -> Status {
    Status {
        name: raw.name,
        description: raw.description,
    }
}

fn parse_user(raw: RawUser) -> User {
    User {
        display_name: raw.display_name,
        email_address: raw.email_address,
    }
}
