#![forbid(unsafe_code)]

use crate::{McpServer, ToolError, now_rfc3339, optional_str, required_str, short_id};
use serde_json::{Value, json};
use sg_storage::CreateGoalRequest;

pub(crate) fn create_goal(server: &mut McpServer, args: &Value) -> Result<Value, ToolError> {
    let user_key = required_str(args, "user_key")?;
    let title = required_str(args, "title")?;
    let vision = required_str(args, "vision")?;
    let success_metrics = optional_str(args, "success_metrics").unwrap_or("");

    let goal = server.store.create_goal(CreateGoalRequest {
        goal_id: short_id(user_key),
        user_key: user_key.to_string(),
        title: title.to_string(),
        vision: vision.to_string(),
        success_metrics: success_metrics.to_string(),
        now: now_rfc3339(),
    })?;

    Ok(json!({
        "id": goal.id,
        "title": goal.title,
        "vision": goal.vision,
        "success_metrics": goal.success_metrics,
        "created_at": goal.created_at,
    }))
}

pub(crate) fn list_goals(server: &mut McpServer, args: &Value) -> Result<Value, ToolError> {
    let user_key = required_str(args, "user_key")?;
    let goals = server.store.list_goals(user_key)?;

    Ok(Value::Array(
        goals
            .into_iter()
            .map(|goal| {
                json!({
                    "id": goal.id,
                    "title": goal.title,
                    "vision": goal.vision,
                    "success_metrics": goal.success_metrics,
                    "created_at": goal.created_at,
                    "updated_at": goal.updated_at,
                    "total_stories": goal.total_stories,
                    "completed_stories": goal.completed_stories,
                })
            })
            .collect(),
    ))
}
