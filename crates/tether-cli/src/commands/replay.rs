//! Replay of recorded bridge frames

use anyhow::Context;
use colored::Colorize;
use std::path::Path;
use std::time::Duration;
use tether_core::{BridgeEvent, StreamingTextPipeline, TetherConfig, TextUpdateResult};

/// Feed every frame of `events` through the streaming text pipeline and print
/// the updates it lets through.
pub async fn execute(
    config: &TetherConfig,
    events: &Path,
    delay_ms: u64,
    min_interval_ms: Option<u64>,
) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(events)
        .await
        .with_context(|| format!("Failed to read {}", events.display()))?;

    let min_interval_ms = min_interval_ms.unwrap_or(config.throttle.min_interval_ms);
    let mut pipeline =
        StreamingTextPipeline::new(config.assembler.max_tracked_messages, min_interval_ms);

    let mut frames = 0usize;
    let mut skipped = 0usize;
    let mut rendered = 0usize;

    for (line_number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        frames += 1;

        let event = match BridgeEvent::from_json(line) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("Skipping malformed frame on line {}: {}", line_number + 1, e);
                skipped += 1;
                continue;
            }
        };

        if let Some(update) = event.into_message_update() {
            for result in pipeline.apply(&update) {
                print_update(&result);
                rendered += 1;
            }
        }
        for result in pipeline.drain_ready() {
            print_update(&result);
            rendered += 1;
        }

        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
    }

    for result in pipeline.flush_all() {
        print_update(&result);
        rendered += 1;
    }

    println!(
        "\n{}",
        format!(
            "{} frames, {} skipped, {} updates rendered, {} messages tracked",
            frames,
            skipped,
            rendered,
            pipeline.assembler().tracked_message_count()
        )
        .dimmed()
    );
    Ok(())
}

fn print_update(update: &TextUpdateResult) {
    let slot = format!("[{}#{}]", update.message_key, update.content_index);
    let marker = if update.is_final {
        "final".green()
    } else {
        "partial".dimmed()
    };
    println!("{} {} {}", slot.cyan(), marker, update.text);
}
