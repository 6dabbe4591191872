#![forbid(unsafe_code)]

mod support;

use serde_json::{Value, json};
use support::Server;

fn create_story(server: &mut Server, user: &str, title: &str, goal_id: Option<&str>) -> String {
    let mut args = json!({
        "user_key": user,
        "title": title,
        "as_a": "user",
        "i_want": "progress",
        "so_that": "value ships"
    });
    if let Some(goal_id) = goal_id {
        args["goal_id"] = json!(goal_id);
    }
    let story = server.call_tool("create_story", args);
    story["id"].as_str().expect("story id").to_string()
}

fn update_story(server: &mut Server, user: &str, story_id: &str, phase: &str, notes: &str) {
    let resp = server.call_tool(
        "update_story_progress",
        json!({ "user_key": user, "story_id": story_id, "phase": phase, "notes": notes }),
    );
    assert_eq!(resp["success"], true);
}

#[test]
fn list_stories_filters_by_goal_and_phase() {
    let mut server = Server::start_initialized("filters");
    let goal = server.call_tool(
        "create_goal",
        json!({ "user_key": "dev", "title": "Ship", "vision": "Done" }),
    );
    let goal_id = goal["id"].as_str().expect("goal id").to_string();

    let in_goal = create_story(&mut server, "dev", "In goal", Some(&goal_id));
    let loose = create_story(&mut server, "dev", "Loose", None);
    update_story(&mut server, "dev", &loose, "developing", "started");

    let by_goal = server.call_tool(
        "list_stories",
        json!({ "user_key": "dev", "goal_id": goal_id }),
    );
    let ids: Vec<&str> = by_goal
        .as_array()
        .expect("array")
        .iter()
        .map(|s| s["id"].as_str().expect("id"))
        .collect();
    assert_eq!(ids, [in_goal.as_str()]);

    let by_phase = server.call_tool(
        "list_stories",
        json!({ "user_key": "dev", "phase": "developing" }),
    );
    let ids: Vec<&str> = by_phase
        .as_array()
        .expect("array")
        .iter()
        .map(|s| s["id"].as_str().expect("id"))
        .collect();
    assert_eq!(ids, [loose.as_str()]);
}

#[test]
fn list_stories_orders_newest_first() {
    let mut server = Server::start_initialized("ordering");
    let first = create_story(&mut server, "dev", "First", None);
    let second = create_story(&mut server, "dev", "Second", None);
    update_story(&mut server, "dev", &first, "developing", "bumped");

    let stories = server.call_tool("list_stories", json!({ "user_key": "dev" }));
    let ids: Vec<&str> = stories
        .as_array()
        .expect("array")
        .iter()
        .map(|s| s["id"].as_str().expect("id"))
        .collect();
    assert_eq!(ids, [first.as_str(), second.as_str()]);
}

#[test]
fn since_watermark_is_strictly_greater() {
    let mut server = Server::start_initialized("since_strict");
    create_story(&mut server, "dev", "Older", None);
    let newer = create_story(&mut server, "dev", "Newer", None);
    update_story(&mut server, "dev", &newer, "developing", "moved on");

    let all = server.call_tool("list_stories", json!({ "user_key": "dev" }));
    let rows = all.as_array().expect("array");
    assert_eq!(rows[0]["id"], Value::String(newer.clone()));
    let newer_ts = rows[0]["updated_at"].as_str().expect("ts").to_string();
    let older_ts = rows[1]["updated_at"].as_str().expect("ts").to_string();

    // A story whose timestamp equals the watermark is already seen.
    let none = server.call_tool(
        "list_stories",
        json!({ "user_key": "dev", "since": newer_ts }),
    );
    assert_eq!(none, json!([]));

    let fresh = server.call_tool(
        "list_stories",
        json!({ "user_key": "dev", "since": older_ts }),
    );
    let ids: Vec<&str> = fresh
        .as_array()
        .expect("array")
        .iter()
        .map(|s| s["id"].as_str().expect("id"))
        .collect();
    assert_eq!(ids, [newer.as_str()]);
}

#[test]
fn unparsable_since_returns_everything() {
    let mut server = Server::start_initialized("since_garbage");
    create_story(&mut server, "dev", "Only", None);
    let stories = server.call_tool(
        "list_stories",
        json!({ "user_key": "dev", "since": "last tuesday" }),
    );
    assert_eq!(stories.as_array().expect("array").len(), 1);
}

#[test]
fn fields_projection_and_confirm_summary() {
    let mut server = Server::start_initialized("projection");
    let story_id = create_story(&mut server, "dev", "Checkout", None);
    update_story(&mut server, "dev", &story_id, "developing", "cart wired up");

    let projected = server.call_tool(
        "list_stories",
        json!({
            "user_key": "dev",
            "fields": ["id", "current_phase", "last_note"]
        }),
    );
    let row = &projected[0];
    let obj = row.as_object().expect("object");
    assert_eq!(obj.len(), 3);
    assert_eq!(row["id"], Value::String(story_id.clone()));
    assert_eq!(row["current_phase"], "developing");
    assert_eq!(row["last_note"]["notes"], "cart wired up");

    let confirmed = server.call_tool(
        "list_stories",
        json!({ "user_key": "dev", "fields": ["id"], "confirm": true }),
    );
    let row = &confirmed[0];
    assert_eq!(row.as_object().expect("object").len(), 2);
    assert_eq!(row["summary"], "Checkout — developing: cart wired up");
}

#[test]
fn change_records_sort_oldest_first_and_page_by_watermark() {
    let mut server = Server::start_initialized("delta_paging");
    let first = create_story(&mut server, "dev", "First", None);
    let second = create_story(&mut server, "dev", "Second", None);
    update_story(&mut server, "dev", &first, "developing", "revisited");

    let changes = server.call_tool("list_story_changes", json!({ "user_key": "dev" }));
    let rows = changes.as_array().expect("array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], Value::String(second.clone()));
    assert_eq!(rows[1]["id"], Value::String(first.clone()));

    // Feeding the newest updated_at back in yields nothing new.
    let watermark = rows[1]["updated_at"].as_str().expect("ts").to_string();
    let rerun = server.call_tool(
        "list_story_changes",
        json!({ "user_key": "dev", "since": watermark }),
    );
    assert_eq!(rerun, json!([]));

    let partial = server.call_tool(
        "list_story_changes",
        json!({
            "user_key": "dev",
            "since": rows[0]["updated_at"].as_str().expect("ts")
        }),
    );
    let partial_rows = partial.as_array().expect("array");
    assert_eq!(partial_rows.len(), 1);
    assert_eq!(partial_rows[0]["id"], Value::String(first.clone()));
}

#[test]
fn change_records_compact_and_confirm_shapes() {
    let mut server = Server::start_initialized("delta_shapes");
    let bare = create_story(&mut server, "dev", "Bare", None);

    let compact = server.call_tool("list_story_changes", json!({ "user_key": "dev" }));
    let changed = compact[0]["changed"].as_object().expect("changed");
    assert_eq!(changed["current_phase"], "defining");
    assert_eq!(changed["title"], "Bare");
    assert_eq!(changed["acceptance_criteria_changed"], false);
    assert!(!changed.contains_key("last_note"));
    assert!(compact[0].get("summary").is_none());

    let confirmed = server.call_tool(
        "list_story_changes",
        json!({ "user_key": "dev", "confirm": true }),
    );
    let changed = confirmed[0]["changed"].as_object().expect("changed");
    assert_eq!(changed["last_note"], Value::Null);
    assert_eq!(confirmed[0]["summary"], "Bare — defining: ");

    update_story(&mut server, "dev", &bare, "validating", "checking");
    let after = server.call_tool("list_story_changes", json!({ "user_key": "dev" }));
    assert_eq!(after[0]["changed"]["last_note"]["notes"], "checking");
}

#[test]
fn change_records_filter_by_story_ids_and_phase() {
    let mut server = Server::start_initialized("delta_filters");
    let a = create_story(&mut server, "dev", "A", None);
    let b = create_story(&mut server, "dev", "B", None);
    update_story(&mut server, "dev", &b, "developing", "moving");

    let picked = server.call_tool(
        "list_story_changes",
        json!({ "user_key": "dev", "story_ids": [a] }),
    );
    let rows = picked.as_array().expect("array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], Value::String(a.clone()));

    let by_phase = server.call_tool(
        "list_story_changes",
        json!({ "user_key": "dev", "phase": "developing" }),
    );
    let rows = by_phase.as_array().expect("array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], Value::String(b.clone()));
}
