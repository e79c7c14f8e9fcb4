//! Jira upstream access and workflow transition resolution.

pub mod client;
pub mod parser;
pub mod query;
pub mod resolver;

pub use self::client::{IssueTracker, JiraClient, TransitionAck};
pub use self::query::SearchQuery;
pub use self::resolver::resolve_transition;
