use thiserror::Error;

/// Result alias used across the service and the upstream client
pub type JiraResult<T> = Result<T, JiraError>;

/// Errors raised while serving a ticket operation
#[derive(Debug, Error)]
pub enum JiraError {
    #[error("{0} is required")]
    MissingArgument(&'static str),

    #[error(
        "Status '{status}' not available for ticket {ticket_key}. Available statuses: {available_statuses:?}. Available transitions: {available_transitions:?}"
    )]
    TransitionNotFound {
        ticket_key: String,
        status: String,
        available_statuses: Vec<String>,
        available_transitions: Vec<String>,
    },

    #[error("Jira API error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl JiraError {
    /// Whether the caller can fix the request and retry.
    ///
    /// Everything else is an upstream or local failure and maps to a
    /// server-side error on the wire.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            JiraError::MissingArgument(_) | JiraError::TransitionNotFound { .. }
        )
    }
}

/// Fail with `MissingArgument` when `value` is empty after trimming
pub fn require(value: &str, name: &'static str) -> JiraResult<()> {
    if value.trim().is_empty() {
        return Err(JiraError::MissingArgument(name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_rejects_blank() {
        assert!(matches!(
            require("   ", "ticket_key"),
            Err(JiraError::MissingArgument("ticket_key"))
        ));
        assert!(require("PROJ-1", "ticket_key").is_ok());
    }

    #[test]
    fn test_transition_not_found_message_lists_choices() {
        let err = JiraError::TransitionNotFound {
            ticket_key: "PROJ-1".to_string(),
            status: "Done".to_string(),
            available_statuses: vec!["In Progress".to_string()],
            available_transitions: vec!["Start Progress".to_string()],
        };

        let message = err.to_string();
        assert!(message.contains("Status 'Done' not available for ticket PROJ-1"));
        assert!(message.contains("[\"In Progress\"]"));
        assert!(message.contains("[\"Start Progress\"]"));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_upstream_is_not_client_error() {
        let err = JiraError::Upstream {
            status: 404,
            message: "Issue does not exist".to_string(),
        };
        assert!(!err.is_client_error());
        assert_eq!(err.to_string(), "Jira API error (404): Issue does not exist");
    }
}
