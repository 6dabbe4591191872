#![forbid(unsafe_code)]

use serde_json::Value;

/// Counts reported by the handshake operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkspaceSummary {
    pub user_key: String,
    pub name: String,
    pub goals: i64,
    pub stories: i64,
    pub active_stories: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoalRow {
    pub id: String,
    pub title: String,
    pub vision: String,
    pub success_metrics: String,
    pub user_key: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Goal row annotated with story counts for list views.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoalSummaryRow {
    pub id: String,
    pub title: String,
    pub vision: String,
    pub success_metrics: String,
    pub created_at: String,
    pub updated_at: String,
    pub total_stories: i64,
    pub completed_stories: i64,
}

/// Story row as persisted. `acceptance_criteria` and `progress_notes` carry
/// the stored JSON arrays; `current_phase` stays a raw string here because
/// read views echo it, while phase transitions go through
/// `sg_core::model::StoryPhase` before they reach the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoryRow {
    pub id: String,
    pub title: String,
    pub as_a: String,
    pub i_want: String,
    pub so_that: String,
    pub acceptance_criteria: Value,
    pub current_phase: String,
    pub progress_notes: Value,
    pub goal_id: Option<String>,
    pub user_key: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Story row joined with the (possibly absent) referenced goal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoryDetailsRow {
    pub story: StoryRow,
    pub goal_title: Option<String>,
    pub goal_vision: Option<String>,
}
