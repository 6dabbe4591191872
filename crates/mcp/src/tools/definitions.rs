#![forbid(unsafe_code)]

use serde_json::{Value, json};

/// The advertised tool catalog. `add_acceptance_criteria` exists in storage
/// but is intentionally not listed or dispatched; criteria arrive as part of
/// future story shapes, not through a standalone call.
pub(crate) fn tool_definitions() -> Vec<Value> {
    vec![
        json!({
            "name": "story_goal_handshake",
            "description": "Register or verify user workspace",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user_key": {"type": "string"},
                    "name": {"type": "string", "optional": true}
                },
                "required": ["user_key"]
            }
        }),
        json!({
            "name": "create_goal",
            "description": "Create a new goal with vision and success metrics",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user_key": {"type": "string"},
                    "title": {"type": "string"},
                    "vision": {"type": "string"},
                    "success_metrics": {"type": "string", "optional": true}
                },
                "required": ["user_key", "title", "vision"]
            }
        }),
        json!({
            "name": "create_story",
            "description": "Create a user story with full context",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user_key": {"type": "string"},
                    "title": {"type": "string"},
                    "as_a": {"type": "string"},
                    "i_want": {"type": "string"},
                    "so_that": {"type": "string"},
                    "goal_id": {"type": "string", "optional": true}
                },
                "required": ["user_key", "title", "as_a", "i_want", "so_that"]
            }
        }),
        json!({
            "name": "update_story_progress",
            "description": "Update story phase and add progress notes",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user_key": {"type": "string"},
                    "story_id": {"type": "string"},
                    "phase": {
                        "type": "string",
                        "enum": ["defining", "developing", "validating", "complete"]
                    },
                    "notes": {"type": "string"}
                },
                "required": ["user_key", "story_id", "phase", "notes"]
            }
        }),
        json!({
            "name": "list_goals",
            "description": "Get all goals for a user with story counts",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user_key": {"type": "string"}
                },
                "required": ["user_key"]
            }
        }),
        json!({
            "name": "list_stories",
            "description": "Get stories for a user, optionally filtered",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user_key": {"type": "string"},
                    "goal_id": {"type": "string", "optional": true},
                    "phase": {"type": "string", "optional": true},
                    "since": {"type": "string", "optional": true},
                    "fields": {
                        "type": "array",
                        "items": {"type": "string"},
                        "optional": true
                    },
                    "confirm": {"type": "boolean", "optional": true}
                },
                "required": ["user_key"]
            }
        }),
        json!({
            "name": "get_story_details",
            "description": "Get detailed view of a specific story",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user_key": {"type": "string"},
                    "story_id": {"type": "string"}
                },
                "required": ["user_key", "story_id"]
            }
        }),
        json!({
            "name": "list_story_changes",
            "description": "Get per-story change records since a watermark, oldest first",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user_key": {"type": "string"},
                    "since": {"type": "string", "optional": true},
                    "story_ids": {
                        "type": "array",
                        "items": {"type": "string"},
                        "optional": true
                    },
                    "phase": {"type": "string", "optional": true},
                    "confirm": {"type": "boolean", "optional": true}
                },
                "required": ["user_key"]
            }
        }),
    ]
}
