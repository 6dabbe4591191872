#![forbid(unsafe_code)]

use sg_core::model::StoryPhase;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandshakeRequest {
    pub user_key: String,
    pub name: Option<String>,
    pub now: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateGoalRequest {
    pub goal_id: String,
    pub user_key: String,
    pub title: String,
    pub vision: String,
    pub success_metrics: String,
    pub now: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateStoryRequest {
    pub story_id: String,
    pub user_key: String,
    pub title: String,
    pub as_a: String,
    pub i_want: String,
    pub so_that: String,
    pub goal_id: Option<String>,
    pub now: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateStoryProgressRequest {
    pub user_key: String,
    pub story_id: String,
    pub phase: StoryPhase,
    pub notes: String,
    pub now: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddAcceptanceCriteriaRequest {
    pub user_key: String,
    pub story_id: String,
    pub criteria: Vec<String>,
    pub now: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ListStoriesRequest {
    pub user_key: String,
    pub goal_id: Option<String>,
    pub phase: Option<String>,
}
