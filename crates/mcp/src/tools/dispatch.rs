#![forbid(unsafe_code)]

use super::{goals, stories, workspace};
use crate::{McpServer, ToolError};
use serde_json::Value;

pub(crate) fn dispatch_tool(
    server: &mut McpServer,
    name: &str,
    args: &Value,
) -> Result<Value, ToolError> {
    match name {
        "story_goal_handshake" => workspace::handshake(server, args),
        "create_goal" => goals::create_goal(server, args),
        "list_goals" => goals::list_goals(server, args),
        "create_story" => stories::create_story(server, args),
        "update_story_progress" => stories::update_story_progress(server, args),
        "list_stories" => stories::list_stories(server, args),
        "get_story_details" => stories::get_story_details(server, args),
        "list_story_changes" => stories::list_story_changes(server, args),
        _ => Err(ToolError::UnknownTool(name.to_string())),
    }
}
