use crate::errors::{JiraError, JiraResult};
use crate::models::Transition;

/// Pick the transition that moves a ticket to `desired`.
///
/// Scans in upstream workflow order and returns the first transition whose
/// target status or action name equals `desired`, ignoring case. When
/// nothing matches, the error lists every target status and action name so
/// the caller can retry with a valid one.
pub fn resolve_transition<'a>(
    ticket_key: &str,
    transitions: &'a [Transition],
    desired: &str,
) -> JiraResult<&'a Transition> {
    if let Some(found) = transitions.iter().find(|t| t.matches(desired)) {
        return Ok(found);
    }

    Err(JiraError::TransitionNotFound {
        ticket_key: ticket_key.to_string(),
        status: desired.to_string(),
        available_statuses: transitions
            .iter()
            .filter_map(|t| t.to.name.clone())
            .collect(),
        available_transitions: transitions
            .iter()
            .filter_map(|t| t.name.clone())
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;

    fn transition(id: &str, name: &str, to: &str) -> Transition {
        Transition {
            id: id.to_string(),
            name: Some(name.to_string()),
            to: Status {
                name: Some(to.to_string()),
                description: None,
            },
        }
    }

    fn workflow() -> Vec<Transition> {
        vec![
            transition("11", "Start Progress", "In Progress"),
            transition("21", "Block", "In Progress"),
            transition("31", "Resolve", "Resolved"),
        ]
    }

    #[test]
    fn test_first_match_wins() {
        let transitions = workflow();
        let found = resolve_transition("PROJ-1", &transitions, "in progress").unwrap();
        assert_eq!(found.id, "11");
        assert_eq!(found.name.as_deref(), Some("Start Progress"));
    }

    #[test]
    fn test_matches_action_name() {
        let transitions = workflow();
        let found = resolve_transition("PROJ-1", &transitions, "BLOCK").unwrap();
        assert_eq!(found.id, "21");
    }

    #[test]
    fn test_upstream_order_is_authoritative() {
        let mut transitions = workflow();
        transitions.reverse();
        let found = resolve_transition("PROJ-1", &transitions, "In Progress").unwrap();
        assert_eq!(found.id, "21");
    }

    #[test]
    fn test_no_match_enumerates_choices() {
        let transitions = workflow();
        let err = resolve_transition("PROJ-1", &transitions, "Done").unwrap_err();

        match err {
            JiraError::TransitionNotFound {
                ticket_key,
                status,
                available_statuses,
                available_transitions,
            } => {
                assert_eq!(ticket_key, "PROJ-1");
                assert_eq!(status, "Done");
                assert_eq!(
                    available_statuses,
                    vec!["In Progress", "In Progress", "Resolved"]
                );
                assert_eq!(
                    available_transitions,
                    vec!["Start Progress", "Block", "Resolve"]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_workflow_fails_with_empty_lists() {
        let err = resolve_transition("PROJ-1", &[], "Done").unwrap_err();
        assert!(matches!(
            err,
            JiraError::TransitionNotFound { ref available_statuses, ref available_transitions, .. }
                if available_statuses.is_empty() && available_transitions.is_empty()
        ));
    }
}
