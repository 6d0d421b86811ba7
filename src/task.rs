//! Task data structure.
//!
//! A task is one card on a project's board. Status is an open string
//! (conventionally "To Do", "In Progress" or "Done") so automation rules can
//! target arbitrary column names.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Conventional board columns used for new tasks and board rendering.
pub const DEFAULT_STATUSES: [&str; 3] = ["To Do", "In Progress", "Done"];

/// Status given to new tasks unless one is passed explicitly.
pub const STATUS_TODO: &str = "To Do";

/// Status treated as "completed" by list filtering.
pub const STATUS_DONE: &str = "Done";

/// A single work item belonging to exactly one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub project_id: u64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub due: Option<NaiveDate>,
    pub assignee_id: Option<u64>,
    #[serde(default)]
    pub created_by: Option<u64>,
    pub created_at_utc: i64,
    pub updated_at_utc: i64,
}
