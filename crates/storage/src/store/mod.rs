#![forbid(unsafe_code)]

mod error;
mod requests;
mod rows;

pub use error::StoreError;
pub use requests::*;
pub use rows::*;

use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use serde_json::{Value, json};
use sg_core::ids::UserKey;
use sg_core::model::{ProgressNote, StoryPhase};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

const SCHEMA_VERSION: i64 = 1;
const UNKNOWN_NAME: &str = "Unknown";

#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: PathBuf,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join("story_goals.db");
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;

        preflight_gate(&conn)?;
        install_schema(&conn)?;

        Ok(Self { conn, storage_dir })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Idempotent identity registration plus workspace counts. Repeated
    /// calls never duplicate the user row or touch its `created_at`.
    pub fn handshake(&mut self, request: HandshakeRequest) -> Result<WorkspaceSummary, StoreError> {
        let user_key = canonicalize_user_key(&request.user_key)?;

        let tx = self.conn.transaction()?;
        let stored_name = tx
            .query_row(
                "SELECT name FROM users WHERE user_key=?1",
                params![user_key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        if stored_name.is_none() {
            tx.execute(
                "INSERT INTO users(user_key, name, created_at) VALUES (?1, ?2, ?3)",
                params![
                    user_key,
                    request.name.as_deref().unwrap_or(UNKNOWN_NAME),
                    request.now,
                ],
            )?;
        }

        let goals = tx.query_row(
            "SELECT COUNT(1) FROM goals WHERE user_key=?1",
            params![user_key],
            |row| row.get::<_, i64>(0),
        )?;
        let stories = tx.query_row(
            "SELECT COUNT(1) FROM stories WHERE user_key=?1",
            params![user_key],
            |row| row.get::<_, i64>(0),
        )?;
        let active_stories = tx.query_row(
            "SELECT COUNT(1) FROM stories WHERE user_key=?1 AND current_phase <> ?2",
            params![user_key, StoryPhase::Complete.as_str()],
            |row| row.get::<_, i64>(0),
        )?;
        tx.commit()?;

        // A supplied name wins in the response, then the stored one. The
        // stored row itself is immutable after creation.
        let name = request
            .name
            .or(stored_name)
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());

        Ok(WorkspaceSummary {
            user_key,
            name,
            goals,
            stories,
            active_stories,
        })
    }

    pub fn create_goal(&mut self, request: CreateGoalRequest) -> Result<GoalRow, StoreError> {
        let user_key = canonicalize_user_key(&request.user_key)?;
        if request.title.trim().is_empty() {
            return Err(StoreError::InvalidInput("goal title must not be empty"));
        }
        if request.vision.trim().is_empty() {
            return Err(StoreError::InvalidInput("goal vision must not be empty"));
        }

        self.conn.execute(
            "INSERT INTO goals(id, title, vision, success_metrics, user_key, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                request.goal_id,
                request.title,
                request.vision,
                request.success_metrics,
                user_key,
                request.now,
            ],
        )?;

        Ok(GoalRow {
            id: request.goal_id,
            title: request.title,
            vision: request.vision,
            success_metrics: request.success_metrics,
            user_key,
            created_at: request.now.clone(),
            updated_at: request.now,
        })
    }

    pub fn create_story(&mut self, request: CreateStoryRequest) -> Result<StoryRow, StoreError> {
        let user_key = canonicalize_user_key(&request.user_key)?;

        // goal_id is a soft reference: persisted verbatim, never checked
        // against the goals table.
        self.conn.execute(
            "INSERT INTO stories(id, title, as_a, i_want, so_that, acceptance_criteria, \
                                 current_phase, progress_notes, goal_id, user_key, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, '[]', ?6, '[]', ?7, ?8, ?9, ?9)",
            params![
                request.story_id,
                request.title,
                request.as_a,
                request.i_want,
                request.so_that,
                StoryPhase::Defining.as_str(),
                request.goal_id,
                user_key,
                request.now,
            ],
        )?;

        Ok(StoryRow {
            id: request.story_id,
            title: request.title,
            as_a: request.as_a,
            i_want: request.i_want,
            so_that: request.so_that,
            acceptance_criteria: json!([]),
            current_phase: StoryPhase::Defining.as_str().to_string(),
            progress_notes: json!([]),
            goal_id: request.goal_id,
            user_key,
            created_at: request.now.clone(),
            updated_at: request.now,
        })
    }

    /// Appends a progress note and moves the phase in one atomic write.
    /// Returns `Ok(false)` when the story does not exist for this owner.
    pub fn update_story_progress(
        &mut self,
        request: UpdateStoryProgressRequest,
    ) -> Result<bool, StoreError> {
        let user_key = canonicalize_user_key(&request.user_key)?;

        let tx = self.conn.transaction()?;
        let stored = tx
            .query_row(
                "SELECT progress_notes FROM stories WHERE id=?1 AND user_key=?2",
                params![request.story_id, user_key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        let Some(stored) = stored else {
            return Ok(false);
        };

        let mut notes = parse_json_array(&stored, "stored progress_notes is not a JSON array")?;
        let note = ProgressNote {
            timestamp: request.now.clone(),
            phase: request.phase,
            notes: request.notes,
        };
        notes.push(progress_note_json(&note));

        tx.execute(
            "UPDATE stories SET current_phase=?1, progress_notes=?2, updated_at=?3 \
             WHERE id=?4 AND user_key=?5",
            params![
                request.phase.as_str(),
                Value::Array(notes).to_string(),
                request.now,
                request.story_id,
                user_key,
            ],
        )?;

        tx.commit()?;
        Ok(true)
    }

    /// Appends criteria (no dedup). Same not-found signal as progress updates.
    pub fn add_acceptance_criteria(
        &mut self,
        request: AddAcceptanceCriteriaRequest,
    ) -> Result<bool, StoreError> {
        let user_key = canonicalize_user_key(&request.user_key)?;

        let tx = self.conn.transaction()?;
        let stored = tx
            .query_row(
                "SELECT acceptance_criteria FROM stories WHERE id=?1 AND user_key=?2",
                params![request.story_id, user_key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        let Some(stored) = stored else {
            return Ok(false);
        };

        let mut criteria = parse_json_array(&stored, "stored acceptance_criteria is not a JSON array")?;
        criteria.extend(request.criteria.into_iter().map(Value::String));

        tx.execute(
            "UPDATE stories SET acceptance_criteria=?1, updated_at=?2 \
             WHERE id=?3 AND user_key=?4",
            params![
                Value::Array(criteria).to_string(),
                request.now,
                request.story_id,
                user_key,
            ],
        )?;

        tx.commit()?;
        Ok(true)
    }

    pub fn list_goals(&self, user_key: &str) -> Result<Vec<GoalSummaryRow>, StoreError> {
        let user_key = canonicalize_user_key(user_key)?;

        let mut stmt = self.conn.prepare(
            "SELECT g.id, g.title, g.vision, g.success_metrics, g.created_at, g.updated_at, \
                    COUNT(s.id), \
                    COUNT(CASE WHEN s.current_phase = ?2 THEN 1 END) \
             FROM goals g \
             LEFT JOIN stories s ON g.id = s.goal_id \
             WHERE g.user_key = ?1 \
             GROUP BY g.id \
             ORDER BY g.created_at DESC",
        )?;

        let mut rows = stmt.query(params![user_key, StoryPhase::Complete.as_str()])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(GoalSummaryRow {
                id: row.get(0)?,
                title: row.get(1)?,
                vision: row.get(2)?,
                success_metrics: row.get(3)?,
                created_at: row.get(4)?,
                updated_at: row.get(5)?,
                total_stories: row.get(6)?,
                completed_stories: row.get(7)?,
            });
        }

        Ok(out)
    }

    pub fn list_stories(&self, request: ListStoriesRequest) -> Result<Vec<StoryRow>, StoreError> {
        let user_key = canonicalize_user_key(&request.user_key)?;

        let mut sql = String::from(
            "SELECT id, title, as_a, i_want, so_that, acceptance_criteria, current_phase, \
                    progress_notes, goal_id, user_key, created_at, updated_at \
             FROM stories WHERE user_key = ?",
        );
        let mut values = vec![user_key];
        if let Some(goal_id) = request.goal_id {
            sql.push_str(" AND goal_id = ?");
            values.push(goal_id);
        }
        if let Some(phase) = request.phase {
            sql.push_str(" AND current_phase = ?");
            values.push(phase);
        }
        sql.push_str(" ORDER BY updated_at DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(values.iter()))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(read_story_row(row)?);
        }

        Ok(out)
    }

    pub fn story_details(
        &self,
        user_key: &str,
        story_id: &str,
    ) -> Result<Option<StoryDetailsRow>, StoreError> {
        let user_key = canonicalize_user_key(user_key)?;

        let mut stmt = self.conn.prepare(
            "SELECT s.id, s.title, s.as_a, s.i_want, s.so_that, s.acceptance_criteria, \
                    s.current_phase, s.progress_notes, s.goal_id, s.user_key, s.created_at, \
                    s.updated_at, g.title, g.vision \
             FROM stories s \
             LEFT JOIN goals g ON s.goal_id = g.id \
             WHERE s.id = ?1 AND s.user_key = ?2",
        )?;

        let mut rows = stmt.query(params![story_id, user_key])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let story = read_story_row(row)?;
        Ok(Some(StoryDetailsRow {
            story,
            goal_title: row.get(12)?,
            goal_vision: row.get(13)?,
        }))
    }
}

fn read_story_row(row: &rusqlite::Row<'_>) -> Result<StoryRow, StoreError> {
    let acceptance_criteria: String = row.get(5)?;
    let progress_notes: String = row.get(7)?;

    Ok(StoryRow {
        id: row.get(0)?,
        title: row.get(1)?,
        as_a: row.get(2)?,
        i_want: row.get(3)?,
        so_that: row.get(4)?,
        acceptance_criteria: Value::Array(parse_json_array(
            &acceptance_criteria,
            "stored acceptance_criteria is not a JSON array",
        )?),
        current_phase: row.get(6)?,
        progress_notes: Value::Array(parse_json_array(&progress_notes, "stored progress_notes is not a JSON array")?),
        goal_id: row.get(8)?,
        user_key: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn parse_json_array(raw: &str, message: &'static str) -> Result<Vec<Value>, StoreError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => Ok(items),
        _ => Err(StoreError::InvalidInput(message)),
    }
}

fn progress_note_json(note: &ProgressNote) -> Value {
    json!({
        "timestamp": note.timestamp,
        "phase": note.phase.as_str(),
        "notes": note.notes,
    })
}

fn canonicalize_user_key(value: &str) -> Result<String, StoreError> {
    UserKey::try_new(value)
        .map(|key| key.as_str().to_string())
        .map_err(|_| StoreError::InvalidInput("invalid user_key"))
}

fn preflight_gate(conn: &Connection) -> Result<(), StoreError> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
    )?;
    let mut rows = stmt.query([])?;
    let mut tables = BTreeSet::new();
    while let Some(row) = rows.next()? {
        tables.insert(row.get::<_, String>(0)?);
    }

    if tables.is_empty() {
        return Ok(());
    }

    let required: BTreeSet<&str> = ["store_state", "users", "goals", "stories"]
        .into_iter()
        .collect();

    if tables
        .iter()
        .any(|table| !required.contains(table.as_str()))
    {
        return Err(StoreError::InvalidInput(
            "RESET_REQUIRED: unsupported tables detected",
        ));
    }

    for table in required {
        if !tables.contains(table) {
            return Err(StoreError::InvalidInput(
                "RESET_REQUIRED: required table is missing",
            ));
        }
    }

    let version = conn
        .query_row(
            "SELECT schema_version FROM store_state WHERE singleton=1",
            [],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;

    match version {
        Some(v) if v == SCHEMA_VERSION => Ok(()),
        Some(_) => Err(StoreError::InvalidInput(
            "RESET_REQUIRED: schema version mismatch",
        )),
        None => Err(StoreError::InvalidInput(
            "RESET_REQUIRED: schema state row is missing",
        )),
    }
}

fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    // No foreign keys on purpose: stories.goal_id (and user_key on both
    // tables) are soft references, matching the exposed write semantics.
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS store_state (
          singleton INTEGER PRIMARY KEY CHECK(singleton = 1),
          schema_version INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS users (
          user_key TEXT PRIMARY KEY,
          name TEXT NOT NULL,
          created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS goals (
          id TEXT PRIMARY KEY,
          title TEXT NOT NULL,
          vision TEXT NOT NULL,
          success_metrics TEXT NOT NULL,
          user_key TEXT NOT NULL,
          created_at TEXT NOT NULL,
          updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_goals_user_created
          ON goals(user_key, created_at);

        CREATE TABLE IF NOT EXISTS stories (
          id TEXT PRIMARY KEY,
          title TEXT NOT NULL,
          as_a TEXT NOT NULL,
          i_want TEXT NOT NULL,
          so_that TEXT NOT NULL,
          acceptance_criteria TEXT NOT NULL,
          current_phase TEXT NOT NULL,
          progress_notes TEXT NOT NULL,
          goal_id TEXT,
          user_key TEXT NOT NULL,
          created_at TEXT NOT NULL,
          updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_stories_user_updated
          ON stories(user_key, updated_at);

        CREATE INDEX IF NOT EXISTS idx_stories_goal
          ON stories(goal_id);
        "#,
    )?;

    conn.execute(
        "INSERT INTO store_state(singleton, schema_version) VALUES (1, ?1) \
         ON CONFLICT(singleton) DO UPDATE SET schema_version=excluded.schema_version",
        params![SCHEMA_VERSION],
    )?;

    Ok(())
}
