#![forbid(unsafe_code)]

use super::{last_note, strictly_after, summary_line};
use serde_json::{Map, Value, json};
use sg_storage::StoryRow;

pub(crate) struct StoryQueryOptions {
    pub(crate) since: Option<String>,
    pub(crate) fields: Option<Vec<String>>,
    pub(crate) confirm: bool,
}

/// Post-SQL rendering stage for `list_stories`: watermark filter, field
/// projection, then the confirm summary. Order matters; the summary is built
/// from the full row even when projection has dropped its inputs.
pub(crate) fn render_stories(rows: Vec<StoryRow>, options: &StoryQueryOptions) -> Vec<Value> {
    // An unparsable watermark disables the filter rather than failing the
    // call.
    let since = options.since.as_deref().and_then(crate::parse_timestamp);

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some(since) = since {
            if !strictly_after(&row, since) {
                continue;
            }
        }

        let mut rendered = match &options.fields {
            Some(fields) => project_fields(&row, fields),
            None => story_json(&row),
        };
        if options.confirm {
            if let Some(obj) = rendered.as_object_mut() {
                obj.insert("summary".to_string(), Value::String(summary_line(&row)));
            }
        }
        out.push(rendered);
    }
    out
}

fn story_json(row: &StoryRow) -> Value {
    json!({
        "id": row.id,
        "title": row.title,
        "as_a": row.as_a,
        "i_want": row.i_want,
        "so_that": row.so_that,
        "acceptance_criteria": row.acceptance_criteria,
        "current_phase": row.current_phase,
        "progress_notes": row.progress_notes,
        "goal_id": row.goal_id,
        "created_at": row.created_at,
        "updated_at": row.updated_at,
    })
}

/// Keeps only the requested keys. `last_note` is a synthesized pseudo-field
/// (the final progress note, or null); unknown names are silently dropped.
fn project_fields(row: &StoryRow, fields: &[String]) -> Value {
    let full = story_json(row);
    let Some(source) = full.as_object() else {
        return full;
    };

    let mut projected = Map::new();
    for field in fields {
        if field == "last_note" {
            let note = last_note(row).cloned().unwrap_or(Value::Null);
            projected.insert("last_note".to_string(), note);
            continue;
        }
        if let Some(value) = source.get(field) {
            projected.insert(field.clone(), value.clone());
        }
    }
    Value::Object(projected)
}
