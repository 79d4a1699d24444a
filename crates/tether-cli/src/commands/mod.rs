//! CLI commands

pub mod cache;
pub mod config;
pub mod replay;
pub mod sessions;

use colored::Colorize;
use tether_session::{SessionIndexSource, SessionIndexState};

/// Print one published session index state
pub(crate) fn print_state(state: &SessionIndexState) {
    let source = match state.source {
        SessionIndexSource::None => "NONE".dimmed(),
        SessionIndexSource::Cache => "CACHE".yellow(),
        SessionIndexSource::Remote => "REMOTE".green(),
    };
    let refreshing = if state.is_refreshing {
        " (refreshing)".dimmed().to_string()
    } else {
        String::new()
    };
    let updated = state
        .last_updated_epoch_ms
        .map(|ms| format!(" updated at {}", ms))
        .unwrap_or_default();

    println!(
        "\n{} [{}]{}{}",
        state.host_id.bold(),
        source,
        refreshing,
        updated.dimmed()
    );

    if let Some(error) = &state.error_message {
        println!("  {} {}", "error:".red(), error);
    }

    if state.groups.is_empty() {
        println!("  {}", "No sessions".dimmed());
        return;
    }

    for group in &state.groups {
        println!("  {}", group.cwd.cyan());
        for session in &group.sessions {
            let title = session
                .display_name
                .as_deref()
                .or(session.first_user_message_preview.as_deref())
                .unwrap_or(&session.session_path);
            let messages = session
                .message_count
                .map(|n| format!(" {} msgs", n))
                .unwrap_or_default();
            println!(
                "    {} {}{}",
                title,
                session.updated_at.dimmed(),
                messages.dimmed()
            );
        }
    }
}
