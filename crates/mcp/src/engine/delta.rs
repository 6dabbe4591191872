#![forbid(unsafe_code)]

use super::{effective_timestamp, last_note, strictly_after, summary_line};
use serde_json::{Map, Value, json};
use sg_storage::StoryRow;

pub(crate) struct StoryDeltaOptions {
    pub(crate) since: Option<String>,
    pub(crate) story_ids: Vec<String>,
    pub(crate) confirm: bool,
}

/// Builds `list_story_changes` records: id filter, watermark filter, then an
/// ascending sort by effective timestamp. Oldest-first lets callers page by
/// feeding the last `updated_at` they saw back in as `since`.
pub(crate) fn render_changes(mut rows: Vec<StoryRow>, options: &StoryDeltaOptions) -> Vec<Value> {
    if !options.story_ids.is_empty() {
        rows.retain(|row| options.story_ids.iter().any(|id| id == &row.id));
    }

    if let Some(since) = options.since.as_deref().and_then(crate::parse_timestamp) {
        rows.retain(|row| strictly_after(row, since));
    }

    rows.sort_by(|a, b| effective_timestamp(a).cmp(effective_timestamp(b)));

    rows.iter().map(|row| change_json(row, options.confirm)).collect()
}

fn change_json(row: &StoryRow, confirm: bool) -> Value {
    let mut changed = Map::new();
    changed.insert(
        "current_phase".to_string(),
        Value::String(row.current_phase.clone()),
    );
    changed.insert("title".to_string(), Value::String(row.title.clone()));
    // Presence check only: non-empty criteria read as "changed". Tracking
    // per-watermark criteria diffs would need history the schema does not
    // keep.
    changed.insert(
        "acceptance_criteria_changed".to_string(),
        Value::Bool(criteria_present(row)),
    );

    let note = last_note(row).cloned().unwrap_or(Value::Null);
    // Compact mode drops the absent note; confirm mode reports it as an
    // explicit null.
    if confirm || !note.is_null() {
        changed.insert("last_note".to_string(), note);
    }

    let mut record = json!({
        "id": row.id,
        "updated_at": effective_timestamp(row),
        "changed": Value::Object(changed),
    });
    if confirm {
        if let Some(obj) = record.as_object_mut() {
            obj.insert("summary".to_string(), Value::String(summary_line(row)));
        }
    }
    record
}

fn criteria_present(row: &StoryRow) -> bool {
    row.acceptance_criteria
        .as_array()
        .is_some_and(|criteria| !criteria.is_empty())
}
