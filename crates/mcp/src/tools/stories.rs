#![forbid(unsafe_code)]

use crate::engine::delta::{StoryDeltaOptions, render_changes};
use crate::engine::query::{StoryQueryOptions, render_stories};
use crate::{
    McpServer, ToolError, now_rfc3339, optional_bool, optional_str, optional_str_list,
    required_str, short_id,
};
use serde_json::{Value, json};
use sg_core::model::{GoalRef, StoryPhase};
use sg_storage::{
    CreateStoryRequest, ListStoriesRequest, StoryDetailsRow, UpdateStoryProgressRequest,
};

pub(crate) fn create_story(server: &mut McpServer, args: &Value) -> Result<Value, ToolError> {
    let user_key = required_str(args, "user_key")?;
    let title = required_str(args, "title")?;
    let as_a = required_str(args, "as_a")?;
    let i_want = required_str(args, "i_want")?;
    let so_that = required_str(args, "so_that")?;
    // Goal references are deliberately unchecked; a dangling or foreign
    // goal_id is stored verbatim.
    let goal_id = optional_str(args, "goal_id").map(GoalRef::new);

    let story = server.store.create_story(CreateStoryRequest {
        story_id: short_id(user_key),
        user_key: user_key.to_string(),
        title: title.to_string(),
        as_a: as_a.to_string(),
        i_want: i_want.to_string(),
        so_that: so_that.to_string(),
        goal_id: goal_id.map(GoalRef::into_string),
        now: now_rfc3339(),
    })?;

    Ok(json!({
        "id": story.id,
        "title": story.title,
        "as_a": story.as_a,
        "i_want": story.i_want,
        "so_that": story.so_that,
        "current_phase": story.current_phase,
        "goal_id": story.goal_id,
        "created_at": story.created_at,
    }))
}

pub(crate) fn update_story_progress(
    server: &mut McpServer,
    args: &Value,
) -> Result<Value, ToolError> {
    let user_key = required_str(args, "user_key")?;
    let story_id = required_str(args, "story_id")?;
    let phase_raw = required_str(args, "phase")?;
    let notes = required_str(args, "notes")?;

    // An unrecognized phase is a boolean failure, not a protocol error; the
    // record stays untouched.
    let Some(phase) = StoryPhase::parse(phase_raw) else {
        return Ok(json!({ "success": false, "story_id": story_id, "phase": phase_raw }));
    };

    let success = server.store.update_story_progress(UpdateStoryProgressRequest {
        user_key: user_key.to_string(),
        story_id: story_id.to_string(),
        phase,
        notes: notes.to_string(),
        now: now_rfc3339(),
    })?;

    Ok(json!({ "success": success, "story_id": story_id, "phase": phase_raw }))
}

pub(crate) fn list_stories(server: &mut McpServer, args: &Value) -> Result<Value, ToolError> {
    let user_key = required_str(args, "user_key")?;
    let rows = server.store.list_stories(ListStoriesRequest {
        user_key: user_key.to_string(),
        goal_id: optional_str(args, "goal_id").map(str::to_string),
        phase: optional_str(args, "phase").map(str::to_string),
    })?;

    let options = StoryQueryOptions {
        since: optional_str(args, "since").map(str::to_string),
        fields: optional_str_list(args, "fields"),
        confirm: optional_bool(args, "confirm"),
    };
    Ok(Value::Array(render_stories(rows, &options)))
}

pub(crate) fn get_story_details(server: &mut McpServer, args: &Value) -> Result<Value, ToolError> {
    let user_key = required_str(args, "user_key")?;
    let story_id = required_str(args, "story_id")?;

    // Missing and foreign stories are indistinguishable to the caller.
    match server.store.story_details(user_key, story_id)? {
        Some(details) => Ok(details_json(details)),
        None => Ok(Value::Null),
    }
}

pub(crate) fn list_story_changes(server: &mut McpServer, args: &Value) -> Result<Value, ToolError> {
    let user_key = required_str(args, "user_key")?;
    let rows = server.store.list_stories(ListStoriesRequest {
        user_key: user_key.to_string(),
        goal_id: None,
        phase: optional_str(args, "phase").map(str::to_string),
    })?;

    let options = StoryDeltaOptions {
        since: optional_str(args, "since").map(str::to_string),
        story_ids: optional_str_list(args, "story_ids").unwrap_or_default(),
        confirm: optional_bool(args, "confirm"),
    };
    Ok(Value::Array(render_changes(rows, &options)))
}

fn details_json(details: StoryDetailsRow) -> Value {
    let story = details.story;
    json!({
        "id": story.id,
        "title": story.title,
        "as_a": story.as_a,
        "i_want": story.i_want,
        "so_that": story.so_that,
        "acceptance_criteria": story.acceptance_criteria,
        "current_phase": story.current_phase,
        "progress_notes": story.progress_notes,
        "goal_id": story.goal_id,
        "created_at": story.created_at,
        "updated_at": story.updated_at,
        "goal_title": details.goal_title,
        "goal_vision": details.goal_vision,
    })
}
