use serde::{Deserialize, Serialize};

// Define the structure for a Jira user
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub display_name: Option<String>,
    pub email_address: Option<String>,
}

// Status of a ticket, also used as the target of a transition
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Status {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Priority {
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IssueType {
    pub name: Option<String>,
    pub description: Option<String>,
}

// Every field is optional: an absent value stays None, never an empty string
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fields {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub issue_type: Option<IssueType>,
    pub assignee: Option<User>,
    pub reporter: Option<User>,
    pub created: Option<String>,
    pub updated: Option<String>,
}

/// A ticket as fetched from Jira.
///
/// Built fresh from every upstream response and never mutated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ticket {
    pub id: Option<String>,
    pub key: Option<String>,
    pub self_url: Option<String>,
    pub fields: Fields,
}

impl Ticket {
    pub fn status_name(&self) -> Option<&str> {
        self.fields.status.as_ref()?.name.as_deref()
    }

    pub fn assignee_name(&self) -> Option<&str> {
        self.fields.assignee.as_ref()?.display_name.as_deref()
    }
}

/// A workflow transition available on a ticket.
///
/// `to` is the status the ticket will have after the transition runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub id: String,
    pub name: Option<String>,
    pub to: Status,
}

impl Transition {
    /// Case-insensitive match against either the target status or the action name
    pub fn matches(&self, desired: &str) -> bool {
        let desired = desired.to_lowercase();
        let same = |name: &Option<String>| {
            name.as_deref()
                .is_some_and(|n| n.to_lowercase() == desired)
        };
        same(&self.to.name) || same(&self.name)
    }
}

// Key, status and summary of a ticket re-fetched after a status change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangedTicket {
    pub key: Option<String>,
    pub status: Option<String>,
    pub summary: Option<String>,
}

impl From<&Ticket> for ChangedTicket {
    fn from(ticket: &Ticket) -> Self {
        Self {
            key: ticket.key.clone(),
            status: ticket.status_name().map(str::to_string),
            summary: ticket.fields.summary.clone(),
        }
    }
}

/// Outcome of `change_status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    pub success: bool,
    pub message: String,
    pub ticket: Option<ChangedTicket>,
}
