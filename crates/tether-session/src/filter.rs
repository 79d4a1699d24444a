//! Query filtering of session groups
//!
//! Case-insensitive substring match. A group whose `cwd` matches is kept whole;
//! otherwise it is kept with only the sessions that match on path, cwd, display
//! name, first user message preview or last model.

use crate::model::{SessionGroup, SessionIndexState, SessionRecord};
use std::sync::Arc;

/// Filter groups by `query`; a blank query keeps everything
pub fn filter_groups(groups: &[Arc<SessionGroup>], query: &str) -> Vec<Arc<SessionGroup>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return groups.to_vec();
    }

    groups
        .iter()
        .filter_map(|group| filter_group(group, &needle))
        .collect()
}

/// Apply [`filter_groups`] to a state, keeping every other field
pub fn filter_state(state: &SessionIndexState, query: &str) -> SessionIndexState {
    SessionIndexState {
        groups: filter_groups(&state.groups, query),
        ..state.clone()
    }
}

fn filter_group(group: &Arc<SessionGroup>, needle: &str) -> Option<Arc<SessionGroup>> {
    if contains(&group.cwd, needle) {
        return Some(Arc::clone(group));
    }

    let sessions: Vec<Arc<SessionRecord>> = group
        .sessions
        .iter()
        .filter(|session| session_matches(session, needle))
        .cloned()
        .collect();

    if sessions.is_empty() {
        None
    } else if sessions.len() == group.sessions.len() {
        Some(Arc::clone(group))
    } else {
        Some(Arc::new(SessionGroup {
            cwd: group.cwd.clone(),
            sessions,
        }))
    }
}

fn session_matches(session: &SessionRecord, needle: &str) -> bool {
    contains(&session.session_path, needle)
        || contains(&session.cwd, needle)
        || [
            &session.display_name,
            &session.first_user_message_preview,
            &session.last_model,
        ]
        .into_iter()
        .flatten()
        .any(|value| contains(value, needle))
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
