#![forbid(unsafe_code)]

pub(crate) mod delta;
pub(crate) mod query;

use serde_json::Value;
use sg_storage::StoryRow;
use time::OffsetDateTime;

/// The timestamp a story is compared and reported by: `updated_at`, falling
/// back to `created_at` when `updated_at` is blank.
fn effective_timestamp(row: &StoryRow) -> &str {
    if row.updated_at.trim().is_empty() {
        &row.created_at
    } else {
        &row.updated_at
    }
}

/// Strict watermark test. A story whose effective timestamp cannot be parsed
/// is excluded whenever a watermark is in effect.
fn strictly_after(row: &StoryRow, since: OffsetDateTime) -> bool {
    match crate::parse_timestamp(effective_timestamp(row)) {
        Some(ts) => ts > since,
        None => false,
    }
}

fn last_note(row: &StoryRow) -> Option<&Value> {
    row.progress_notes.as_array().and_then(|notes| notes.last())
}

/// Single-line story digest: "{title} — {phase}: {latest note text}". The
/// note text is empty when no progress has been recorded.
fn summary_line(row: &StoryRow) -> String {
    let note_text = last_note(row)
        .and_then(|note| note.get("notes"))
        .and_then(|v| v.as_str())
        .unwrap_or("");
    format!("{} — {}: {}", row.title, row.current_phase, note_text)
}

#[cfg(test)]
fn story_fixture(id: &str, updated_at: &str) -> StoryRow {
    StoryRow {
        id: id.to_string(),
        title: format!("Story {id}"),
        as_a: "user".to_string(),
        i_want: "progress".to_string(),
        so_that: "value ships".to_string(),
        acceptance_criteria: serde_json::json!([]),
        current_phase: "defining".to_string(),
        progress_notes: serde_json::json!([]),
        goal_id: None,
        user_key: "alice".to_string(),
        created_at: "2025-01-01T00:00:00Z".to_string(),
        updated_at: updated_at.to_string(),
    }
}
