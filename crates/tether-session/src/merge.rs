//! Merging a fresh remote fetch into the session index already held
//!
//! The incoming fetch decides which groups and sessions exist. Existing
//! allocations are reused wherever the content did not change:
//! - a session equal to the one held at the same path keeps the old `Arc`
//! - a group whose resulting session list is pointer-identical to the old one
//!   keeps the old group `Arc`
//!
//! Groups and sessions absent from the fetch are dropped.

use crate::model::{SessionGroup, SessionRecord, newest_first};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Merge `incoming` over `existing`, returning groups ordered by `cwd`
pub fn merge_session_groups(
    existing: &[Arc<SessionGroup>],
    incoming: Vec<SessionGroup>,
) -> Vec<Arc<SessionGroup>> {
    let existing_by_cwd: HashMap<&str, &Arc<SessionGroup>> = existing
        .iter()
        .map(|group| (group.cwd.as_str(), group))
        .collect();

    normalize_incoming(incoming)
        .into_iter()
        .map(|group| match existing_by_cwd.get(group.cwd.as_str()) {
            Some(previous) => merge_group(previous, group),
            None => Arc::new(group),
        })
        .collect()
}

fn merge_group(previous: &Arc<SessionGroup>, incoming: SessionGroup) -> Arc<SessionGroup> {
    let previous_by_path: HashMap<&str, &Arc<SessionRecord>> = previous
        .sessions
        .iter()
        .map(|session| (session.session_path.as_str(), session))
        .collect();

    let sessions: Vec<Arc<SessionRecord>> = incoming
        .sessions
        .into_iter()
        .map(|session| match previous_by_path.get(session.session_path.as_str()) {
            Some(kept) if ***kept == *session => Arc::clone(kept),
            _ => session,
        })
        .collect();

    let unchanged = sessions.len() == previous.sessions.len()
        && sessions
            .iter()
            .zip(previous.sessions.iter())
            .all(|(merged, old)| Arc::ptr_eq(merged, old));

    if unchanged {
        Arc::clone(previous)
    } else {
        Arc::new(SessionGroup {
            cwd: incoming.cwd,
            sessions,
        })
    }
}

/// Sort groups by `cwd`, fold repeated `cwd`s together, order sessions newest
/// first and keep only the first occurrence of each session path.
fn normalize_incoming(incoming: Vec<SessionGroup>) -> Vec<SessionGroup> {
    let mut folded: Vec<SessionGroup> = Vec::with_capacity(incoming.len());
    let mut index_by_cwd: HashMap<String, usize> = HashMap::new();

    for group in incoming {
        match index_by_cwd.get(&group.cwd) {
            Some(&index) => folded[index].sessions.extend(group.sessions),
            None => {
                index_by_cwd.insert(group.cwd.clone(), folded.len());
                folded.push(group);
            }
        }
    }

    folded.sort_by(|a, b| a.cwd.cmp(&b.cwd));
    for group in &mut folded {
        group.sessions.sort_by(|a, b| newest_first(a, b));
        let mut seen = HashSet::new();
        group
            .sessions
            .retain(|session| seen.insert(session.session_path.clone()));
    }
    folded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str, cwd: &str, updated_at: &str) -> SessionRecord {
        SessionRecord::new(path, cwd, "2024-01-01T00:00:00Z", updated_at)
    }

    fn group(cwd: &str, sessions: Vec<SessionRecord>) -> SessionGroup {
        SessionGroup::new(cwd, sessions)
    }

    fn existing_groups() -> Vec<Arc<SessionGroup>> {
        merge_session_groups(
            &[],
            vec![
                group(
                    "/repo/api",
                    vec![
                        record("/s/a", "/repo/api", "2024-03-01T10:00:00Z")
                            .with_preview("fix auth"),
                        record("/s/b", "/repo/api", "2024-03-02T10:00:00Z"),
                    ],
                ),
                group(
                    "/repo/web",
                    vec![record("/s/c", "/repo/web", "2024-03-03T10:00:00Z")],
                ),
            ],
        )
    }

    #[test]
    fn test_fresh_fetch_is_sorted() {
        let merged = existing_groups();

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].cwd, "/repo/api");
        let paths: Vec<&str> = merged[0]
            .sessions
            .iter()
            .map(|s| s.session_path.as_str())
            .collect();
        assert_eq!(paths, vec!["/s/b", "/s/a"]);
    }

    #[test]
    fn test_unchanged_fetch_preserves_identity() {
        let existing = existing_groups();
        let incoming = vec![
            group(
                "/repo/web",
                vec![record("/s/c", "/repo/web", "2024-03-03T10:00:00Z")],
            ),
            group(
                "/repo/api",
                vec![
                    record("/s/a", "/repo/api", "2024-03-01T10:00:00Z").with_preview("fix auth"),
                    record("/s/b", "/repo/api", "2024-03-02T10:00:00Z"),
                ],
            ),
        ];

        let merged = merge_session_groups(&existing, incoming);

        assert_eq!(merged.len(), 2);
        assert!(Arc::ptr_eq(&merged[0], &existing[0]));
        assert!(Arc::ptr_eq(&merged[1], &existing[1]));
    }

    #[test]
    fn test_changed_session_is_replaced() {
        let existing = existing_groups();
        let incoming = vec![group(
            "/repo/api",
            vec![
                record("/s/a", "/repo/api", "2024-03-01T10:00:00Z").with_preview("fix auth flow"),
                record("/s/b", "/repo/api", "2024-03-02T10:00:00Z"),
            ],
        )];

        let merged = merge_session_groups(&existing, incoming);
        let api = &merged[0];

        assert!(!Arc::ptr_eq(api, &existing[0]));
        // /s/b unchanged, same allocation
        assert!(Arc::ptr_eq(&api.sessions[0], &existing[0].sessions[0]));
        // /s/a changed, new content
        assert!(!Arc::ptr_eq(&api.sessions[1], &existing[0].sessions[1]));
        assert_eq!(
            api.sessions[1].first_user_message_preview.as_deref(),
            Some("fix auth flow")
        );
    }

    #[test]
    fn test_missing_group_is_dropped() {
        let existing = existing_groups();
        let incoming = vec![group(
            "/repo/web",
            vec![record("/s/c", "/repo/web", "2024-03-03T10:00:00Z")],
        )];

        let merged = merge_session_groups(&existing, incoming);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].cwd, "/repo/web");
        assert!(Arc::ptr_eq(&merged[0], &existing[1]));
    }

    #[test]
    fn test_missing_session_is_dropped() {
        let existing = existing_groups();
        let incoming = vec![group(
            "/repo/api",
            vec![record("/s/b", "/repo/api", "2024-03-02T10:00:00Z")],
        )];

        let merged = merge_session_groups(&existing, incoming);

        assert_eq!(merged[0].sessions.len(), 1);
        assert!(Arc::ptr_eq(&merged[0].sessions[0], &existing[0].sessions[0]));
        assert!(!Arc::ptr_eq(&merged[0], &existing[0]));
    }

    #[test]
    fn test_reordered_sessions_build_new_group() {
        let existing = existing_groups();
        // /s/a becomes the newest one
        let incoming = vec![group(
            "/repo/api",
            vec![
                record("/s/a", "/repo/api", "2024-03-05T10:00:00Z").with_preview("fix auth"),
                record("/s/b", "/repo/api", "2024-03-02T10:00:00Z"),
            ],
        )];

        let merged = merge_session_groups(&existing, incoming);

        assert!(!Arc::ptr_eq(&merged[0], &existing[0]));
        assert_eq!(merged[0].sessions[0].session_path, "/s/a");
    }

    #[test]
    fn test_duplicates_are_folded() {
        let incoming = vec![
            group("/repo", vec![record("/s/1", "/repo", "2024-03-01T00:00:00Z")]),
            group(
                "/repo",
                vec![
                    record("/s/2", "/repo", "2024-03-02T00:00:00Z"),
                    record("/s/1", "/repo", "2024-02-01T00:00:00Z"),
                ],
            ),
        ];

        let merged = merge_session_groups(&[], incoming);

        assert_eq!(merged.len(), 1);
        let sessions = &merged[0].sessions;
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].session_path, "/s/2");
        assert_eq!(sessions[1].updated_at, "2024-03-01T00:00:00Z");
    }
}
