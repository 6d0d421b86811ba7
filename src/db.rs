//! The board store and shared utility functions.
//!
//! `Database` is the single in-memory container for every collection (users,
//! projects, tasks, automation rules, notifications), serialized as one JSON
//! file. Commands load it, mutate it, and save it back; there is exactly one
//! actor, so no locking exists.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::project::{Project, User};
use crate::rules::{Automation, Notification};
use crate::task::{Task, DEFAULT_STATUSES};

/// In-memory store for all board data.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub automations: Vec<Automation>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

impl Database {
    /// Load the store from a JSON file, starting empty if the file is missing.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Database::default();
        }
        let mut buf = String::new();
        match File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
            Ok(_) => match serde_json::from_str(&buf) {
                Ok(db) => db,
                Err(e) => {
                    eprintln!("Error parsing store, starting fresh: {e}");
                    Database::default()
                }
            },
            Err(e) => {
                eprintln!("Error reading store, starting fresh: {e}");
                Database::default()
            }
        }
    }

    /// Save the store to a JSON file using atomic write (temp file + rename).
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        // Atomic-ish write via temp + rename.
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        let data = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.projects.is_empty()
            && self.tasks.is_empty()
            && self.automations.is_empty()
            && self.notifications.is_empty()
    }

    /// Generate the next available task ID.
    pub fn next_task_id(&self) -> u64 {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    /// Generate the next available project ID.
    pub fn next_project_id(&self) -> u64 {
        self.projects.iter().map(|p| p.id).max().unwrap_or(0) + 1
    }

    /// Generate the next available user ID.
    pub fn next_user_id(&self) -> u64 {
        self.users.iter().map(|u| u.id).max().unwrap_or(0) + 1
    }

    /// Generate the next available automation rule ID.
    pub fn next_automation_id(&self) -> u64 {
        self.automations.iter().map(|a| a.id).max().unwrap_or(0) + 1
    }

    /// Generate the next available notification ID.
    pub fn next_notification_id(&self) -> u64 {
        self.notifications.iter().map(|n| n.id).max().unwrap_or(0) + 1
    }

    pub fn task(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn project(&self, id: u64) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn project_mut(&mut self, id: u64) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == id)
    }

    pub fn user(&self, id: u64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn automation(&self, id: u64) -> Option<&Automation> {
        self.automations.iter().find(|a| a.id == id)
    }

    pub fn automation_mut(&mut self, id: u64) -> Option<&mut Automation> {
        self.automations.iter_mut().find(|a| a.id == id)
    }

    /// Rules scoped to one project, in storage order. Storage order is the
    /// only ordering guarantee rules get.
    pub fn automations_for_project(&self, project_id: u64) -> Vec<u64> {
        self.automations
            .iter()
            .filter(|a| a.project_id == project_id)
            .map(|a| a.id)
            .collect()
    }

    /// Remove a project and everything scoped to it: tasks, rules and
    /// notifications.
    pub fn remove_project(&mut self, id: u64) {
        self.projects.retain(|p| p.id != id);
        self.tasks.retain(|t| t.project_id != id);
        self.automations.retain(|a| a.project_id != id);
        self.notifications.retain(|n| n.project_id != id);
    }

    /// Board columns for a set of tasks: the three conventional statuses
    /// first, then any other status present, in first-seen order.
    pub fn board_columns(tasks: &[&Task]) -> Vec<String> {
        let mut columns: Vec<String> = DEFAULT_STATUSES.iter().map(|s| s.to_string()).collect();
        for t in tasks {
            if !columns.iter().any(|c| c == &t.status) {
                columns.push(t.status.clone());
            }
        }
        columns
    }
}

/// Resolve a task identifier (numeric ID or exact title, case-insensitive) to
/// a task ID. Ambiguous titles list the candidates and ask for the ID.
pub fn resolve_task(identifier: &str, db: &Database) -> Result<u64, String> {
    if let Ok(id) = identifier.parse::<u64>() {
        return if db.task(id).is_some() {
            Ok(id)
        } else {
            Err(format!("Task with ID {} not found", id))
        };
    }

    let matches: Vec<&Task> = db
        .tasks
        .iter()
        .filter(|t| t.title.to_lowercase() == identifier.to_lowercase())
        .collect();

    match matches.len() {
        0 => Err(format!("No task found with title '{}'", identifier)),
        1 => Ok(matches[0].id),
        _ => {
            let mut msg = format!("Multiple tasks found with title '{}':\n", identifier);
            for t in matches {
                let project = db
                    .project(t.project_id)
                    .map(|p| p.title.clone())
                    .unwrap_or_else(|| format!("#{}", t.project_id));
                msg.push_str(&format!("  ID {}: {} [project: {}]\n", t.id, t.title, project));
            }
            msg.push_str("Please use the specific ID instead.");
            Err(msg)
        }
    }
}

/// Resolve a project identifier (numeric ID or exact title, case-insensitive).
pub fn resolve_project(identifier: &str, db: &Database) -> Result<u64, String> {
    if let Ok(id) = identifier.parse::<u64>() {
        return if db.project(id).is_some() {
            Ok(id)
        } else {
            Err(format!("Project with ID {} not found", id))
        };
    }

    let matches: Vec<&Project> = db
        .projects
        .iter()
        .filter(|p| p.title.to_lowercase() == identifier.to_lowercase())
        .collect();

    match matches.len() {
        0 => Err(format!("No project found with title '{}'", identifier)),
        1 => Ok(matches[0].id),
        _ => Err(format!(
            "Multiple projects found with title '{}'. Please use the specific ID instead.",
            identifier
        )),
    }
}

/// Resolve a user identifier (numeric ID or exact name, case-insensitive).
pub fn resolve_user(identifier: &str, db: &Database) -> Result<u64, String> {
    if let Ok(id) = identifier.parse::<u64>() {
        return if db.user(id).is_some() {
            Ok(id)
        } else {
            Err(format!("User with ID {} not found", id))
        };
    }

    let matches: Vec<&User> = db
        .users
        .iter()
        .filter(|u| u.name.to_lowercase() == identifier.to_lowercase())
        .collect();

    match matches.len() {
        0 => Err(format!("No user found with name '{}'", identifier)),
        1 => Ok(matches[0].id),
        _ => Err(format!(
            "Multiple users found with name '{}'. Please use the specific ID instead.",
            identifier
        )),
    }
}

/// Resolve an automation rule identifier (numeric ID or exact name).
pub fn resolve_rule(identifier: &str, db: &Database) -> Result<u64, String> {
    if let Ok(id) = identifier.parse::<u64>() {
        return if db.automation(id).is_some() {
            Ok(id)
        } else {
            Err(format!("Rule with ID {} not found", id))
        };
    }

    let matches: Vec<&Automation> = db
        .automations
        .iter()
        .filter(|a| a.name.to_lowercase() == identifier.to_lowercase())
        .collect();

    match matches.len() {
        0 => Err(format!("No rule found with name '{}'", identifier)),
        1 => Ok(matches[0].id),
        _ => Err(format!(
            "Multiple rules found with name '{}'. Please use the specific ID instead.",
            identifier
        )),
    }
}

/// Parse human-readable due date input.
///
/// Supports "today", "tomorrow", "yesterday", "in Nd", "in Nw" and the
/// "YYYY-MM-DD" format.
pub fn parse_due_input(s: &str) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();
    let today = Local::now().date_naive();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "yesterday" => return Some(today - Duration::days(1)),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(nd) = rest.strip_suffix('d') {
            if let Ok(days) = nd.trim().parse::<i64>() {
                return Some(today + Duration::days(days));
            }
        }
        if let Some(nw) = rest.strip_suffix('w') {
            if let Ok(weeks) = nw.trim().parse::<i64>() {
                return Some(today + Duration::weeks(weeks));
            }
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Calculate the start and end dates of the current ISO week (Monday to Sunday).
pub fn start_end_of_this_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    use chrono::Datelike;
    let weekday = today.weekday().num_days_from_monday() as i64;
    let start = today - Duration::days(weekday);
    let end = start + Duration::days(6);
    (start, end)
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => {
            let delta = d - today;
            if delta.num_days() == 0 {
                "today".into()
            } else if delta.num_days() == 1 {
                "tomorrow".into()
            } else if delta.num_days() > 1 {
                format!("in {}d", delta.num_days())
            } else {
                format!("{}d late", -delta.num_days())
            }
        }
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

/// Print tasks in a formatted table.
pub fn print_task_table(db: &Database, tasks: &[&Task]) {
    println!(
        "{:<5} {:<13} {:<12} {:<12} {:<16} {}",
        "ID", "Status", "Due", "Assignee", "Project", "Title"
    );
    let today = Local::now().date_naive();
    for t in tasks {
        let assignee = t
            .assignee_id
            .map(|id| db.user(id).map(|u| u.name.clone()).unwrap_or_else(|| format!("#{id}")))
            .unwrap_or_else(|| "-".into());
        let project = db
            .project(t.project_id)
            .map(|p| p.title.clone())
            .unwrap_or_else(|| format!("#{}", t.project_id));
        println!(
            "{:<5} {:<13} {:<12} {:<12} {:<16} {}",
            t.id,
            truncate(&t.status, 13),
            format_due_relative(t.due, today),
            truncate(&assignee, 12),
            truncate(&project, 16),
            t.title
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Action, Trigger};

    fn task(id: u64, project_id: u64, status: &str) -> Task {
        Task {
            id,
            project_id,
            title: format!("task {id}"),
            description: None,
            status: status.to_string(),
            due: None,
            assignee_id: None,
            created_by: None,
            created_at_utc: 0,
            updated_at_utc: 0,
        }
    }

    #[test]
    fn test_next_ids_start_at_one() {
        let db = Database::default();
        assert_eq!(db.next_task_id(), 1);
        assert_eq!(db.next_project_id(), 1);
        assert_eq!(db.next_automation_id(), 1);
    }

    #[test]
    fn test_remove_project_cascades() {
        let mut db = Database::default();
        db.projects.push(Project {
            id: 1,
            title: "p1".into(),
            description: None,
            created_by: None,
            created_at_utc: 0,
            members: Vec::new(),
        });
        db.tasks.push(task(1, 1, "To Do"));
        db.tasks.push(task(2, 2, "To Do"));
        db.automations.push(Automation {
            id: 1,
            project_id: 1,
            name: "r".into(),
            trigger: Trigger::DueDatePassed,
            trigger_value: None,
            action: Action::SendNotification,
            action_value: None,
            created_by: None,
            created_at_utc: 0,
        });
        db.notifications.push(Notification {
            id: 1,
            user_id: None,
            message: "m".into(),
            read: false,
            project_id: 1,
            task_id: 1,
            created_at_utc: 0,
        });

        db.remove_project(1);
        assert!(db.projects.is_empty());
        assert_eq!(db.tasks.len(), 1);
        assert_eq!(db.tasks[0].project_id, 2);
        assert!(db.automations.is_empty());
        assert!(db.notifications.is_empty());
    }

    #[test]
    fn test_resolve_task_by_title() {
        let mut db = Database::default();
        db.tasks.push(Task {
            title: "Fix login".into(),
            ..task(7, 1, "To Do")
        });
        assert_eq!(resolve_task("7", &db), Ok(7));
        assert_eq!(resolve_task("fix login", &db), Ok(7));
        assert!(resolve_task("8", &db).is_err());
        assert!(resolve_task("missing", &db).is_err());
    }

    #[test]
    fn test_resolve_task_ambiguous_title() {
        let mut db = Database::default();
        db.tasks.push(Task {
            title: "Dup".into(),
            ..task(1, 1, "To Do")
        });
        db.tasks.push(Task {
            title: "dup".into(),
            ..task(2, 1, "To Do")
        });
        assert!(resolve_task("dup", &db).is_err());
        assert_eq!(resolve_task("1", &db), Ok(1));
    }

    #[test]
    fn test_parse_due_input() {
        let today = Local::now().date_naive();
        assert_eq!(parse_due_input("today"), Some(today));
        assert_eq!(parse_due_input("tomorrow"), Some(today + Duration::days(1)));
        assert_eq!(parse_due_input("in 3d"), Some(today + Duration::days(3)));
        assert_eq!(parse_due_input("in 2w"), Some(today + Duration::weeks(2)));
        assert_eq!(
            parse_due_input("2026-09-01"),
            NaiveDate::from_ymd_opt(2026, 9, 1)
        );
        assert_eq!(parse_due_input("not a date"), None);
    }

    #[test]
    fn test_format_due_relative() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        assert_eq!(format_due_relative(None, today), "-");
        assert_eq!(format_due_relative(Some(today), today), "today");
        assert_eq!(
            format_due_relative(Some(today + Duration::days(3)), today),
            "in 3d"
        );
        assert_eq!(
            format_due_relative(Some(today - Duration::days(2)), today),
            "2d late"
        );
    }

    #[test]
    fn test_board_columns_include_custom_statuses() {
        let t1 = task(1, 1, "To Do");
        let t2 = task(2, 1, "Review");
        let refs: Vec<&Task> = vec![&t1, &t2];
        let cols = Database::board_columns(&refs);
        assert_eq!(cols, vec!["To Do", "In Progress", "Done", "Review"]);
    }
}
