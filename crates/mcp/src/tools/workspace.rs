#![forbid(unsafe_code)]

use crate::{McpServer, ToolError, now_rfc3339, optional_str, required_str};
use serde_json::{Value, json};
use sg_storage::HandshakeRequest;

/// Registers the workspace on first contact and reports its current shape.
/// Safe to repeat; a stored display name survives later calls that omit one.
pub(crate) fn handshake(server: &mut McpServer, args: &Value) -> Result<Value, ToolError> {
    let user_key = required_str(args, "user_key")?;
    let name = optional_str(args, "name").map(str::to_string);

    let summary = server.store.handshake(HandshakeRequest {
        user_key: user_key.to_string(),
        name,
        now: now_rfc3339(),
    })?;

    Ok(json!({
        "user_key": summary.user_key,
        "name": summary.name,
        "goals": summary.goals,
        "stories": summary.stories,
        "active_stories": summary.active_stories,
        "handshake_time": now_rfc3339(),
    }))
}
