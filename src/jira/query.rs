use crate::errors::{require, JiraResult};

/// Page size used when the caller does not pass a limit
pub const DEFAULT_MAX_RESULTS: u32 = 50;

/// Lookback of the recently-updated query, in days
pub const RECENT_WINDOW_DAYS: u32 = 7;

const ORDER_BY_UPDATED_DESC: &str = "ORDER BY updated DESC";

/// A single bounded page request against `GET /search`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub jql: String,
    pub max_results: u32,
}

impl SearchQuery {
    /// Caller-supplied JQL, passed through with no forced ordering
    pub fn jql(jql: &str, limit: Option<u32>) -> JiraResult<Self> {
        require(jql, "jql_query")?;
        Ok(Self::new(jql.to_string(), limit))
    }

    pub fn text(text: &str, limit: Option<u32>) -> JiraResult<Self> {
        require(text, "text")?;
        Ok(Self::ordered(
            format!("text ~ \"{}\"", escape_string(text)),
            limit,
        ))
    }

    pub fn project(project_key: &str, limit: Option<u32>) -> JiraResult<Self> {
        require(project_key, "project_key")?;
        Ok(Self::ordered(
            format!("project = {}", project_key.trim()),
            limit,
        ))
    }

    pub fn assigned_to_me(limit: Option<u32>) -> Self {
        Self::ordered("assignee = currentUser()".to_string(), limit)
    }

    pub fn recent(limit: Option<u32>) -> Self {
        Self::ordered(format!("updated >= -{}d", RECENT_WINDOW_DAYS), limit)
    }

    fn ordered(predicate: String, limit: Option<u32>) -> Self {
        Self::new(format!("{} {}", predicate, ORDER_BY_UPDATED_DESC), limit)
    }

    fn new(jql: String, limit: Option<u32>) -> Self {
        Self {
            jql,
            max_results: limit.unwrap_or(DEFAULT_MAX_RESULTS),
        }
    }
}

// JQL string literals are double-quoted with backslash escapes
fn escape_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::JiraError;

    #[test]
    fn test_recent_query() {
        let query = SearchQuery::recent(Some(5));
        assert_eq!(query.jql, "updated >= -7d ORDER BY updated DESC");
        assert_eq!(query.max_results, 5);
    }

    #[test]
    fn test_default_limit() {
        assert_eq!(SearchQuery::assigned_to_me(None).max_results, 50);
        assert_eq!(
            SearchQuery::assigned_to_me(None).jql,
            "assignee = currentUser() ORDER BY updated DESC"
        );
    }

    #[test]
    fn test_jql_passthrough_has_no_ordering() {
        let query = SearchQuery::jql("project = PROJ AND status = Open", Some(10)).unwrap();
        assert_eq!(query.jql, "project = PROJ AND status = Open");
        assert_eq!(query.max_results, 10);
    }

    #[test]
    fn test_text_and_project_queries() {
        assert_eq!(
            SearchQuery::text("login bug", None).unwrap().jql,
            "text ~ \"login bug\" ORDER BY updated DESC"
        );
        assert_eq!(
            SearchQuery::text("say \"hi\"", None).unwrap().jql,
            "text ~ \"say \\\"hi\\\"\" ORDER BY updated DESC"
        );
        assert_eq!(
            SearchQuery::project(" PROJ ", Some(3)).unwrap().jql,
            "project = PROJ ORDER BY updated DESC"
        );
    }

    #[test]
    fn test_blank_arguments_are_rejected() {
        assert!(matches!(
            SearchQuery::jql("  ", None),
            Err(JiraError::MissingArgument("jql_query"))
        ));
        assert!(matches!(
            SearchQuery::text("", None),
            Err(JiraError::MissingArgument("text"))
        ));
        assert!(matches!(
            SearchQuery::project("\t", None),
            Err(JiraError::MissingArgument("project_key"))
        ));
    }
}
