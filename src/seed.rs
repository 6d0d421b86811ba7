//! Bundled sample dataset.
//!
//! Seeds the store with a small, deterministic dataset: three users, three
//! projects, five tasks and three automation rules. Rows are inserted
//! directly, without running the evaluator, so the seeded state is exactly
//! what is listed here; automations first fire on the next task mutation.

use std::path::Path;

use chrono::NaiveDate;

use crate::db::Database;
use crate::fields::{Action, Role, Trigger};
use crate::project::{Project, ProjectMember, User};
use crate::rules::Automation;
use crate::task::Task;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid seed date")
}

fn ts(y: i32, m: u32, d: u32) -> i64 {
    date(y, m, d)
        .and_hms_opt(0, 0, 0)
        .expect("valid seed time")
        .and_utc()
        .timestamp()
}

/// Load the sample dataset. Refuses to touch a non-empty store unless forced.
pub fn cmd_seed(db: &mut Database, db_path: &Path, force: bool) {
    if !db.is_empty() && !force {
        eprintln!("Store is not empty. Use --force to replace it with the sample dataset.");
        std::process::exit(1);
    }

    *db = sample_database();
    if let Err(e) = db.save(db_path) {
        eprintln!("Failed to save store: {e}");
        std::process::exit(1);
    }
    println!(
        "Seeded {} user(s), {} project(s), {} task(s), {} rule(s).",
        db.users.len(),
        db.projects.len(),
        db.tasks.len(),
        db.automations.len()
    );
}

/// The sample dataset itself.
pub fn sample_database() -> Database {
    let users = vec![
        User { id: 1, name: "John Doe".into(), email: "john@example.com".into() },
        User { id: 2, name: "Jane Smith".into(), email: "jane@example.com".into() },
        User { id: 3, name: "Bob Johnson".into(), email: "bob@example.com".into() },
    ];

    let projects = vec![
        Project {
            id: 1,
            title: "Website Redesign".into(),
            description: Some(
                "Redesign the company website with a modern look and improved UX".into(),
            ),
            created_by: Some(1),
            created_at_utc: ts(2023, 5, 15),
            members: vec![
                ProjectMember { user_id: 1, role: Role::Owner },
                ProjectMember { user_id: 2, role: Role::Admin },
            ],
        },
        Project {
            id: 2,
            title: "Mobile App Development".into(),
            description: Some("Create a cross-platform mobile app for our product".into()),
            created_by: Some(1),
            created_at_utc: ts(2023, 6, 20),
            members: vec![
                ProjectMember { user_id: 1, role: Role::Owner },
                ProjectMember { user_id: 2, role: Role::Admin },
                ProjectMember { user_id: 3, role: Role::Member },
            ],
        },
        Project {
            id: 3,
            title: "Content Marketing Campaign".into(),
            description: Some("Plan and execute a content marketing campaign for Q3".into()),
            created_by: Some(2),
            created_at_utc: ts(2023, 7, 10),
            members: vec![
                ProjectMember { user_id: 2, role: Role::Admin },
                ProjectMember { user_id: 3, role: Role::Member },
            ],
        },
    ];

    let tasks = vec![
        Task {
            id: 1,
            project_id: 1,
            title: "Design new homepage".into(),
            description: Some("Create a modern homepage design with improved UX".into()),
            status: "To Do".into(),
            due: Some(date(2023, 6, 15)),
            assignee_id: Some(2),
            created_by: Some(1),
            created_at_utc: ts(2023, 5, 16),
            updated_at_utc: ts(2023, 5, 16),
        },
        Task {
            id: 2,
            project_id: 1,
            title: "Implement new design".into(),
            description: Some("Implement the approved homepage design with HTML/CSS".into()),
            status: "To Do".into(),
            due: Some(date(2023, 6, 30)),
            assignee_id: Some(3),
            created_by: Some(1),
            created_at_utc: ts(2023, 5, 18),
            updated_at_utc: ts(2023, 5, 18),
        },
        Task {
            id: 3,
            project_id: 2,
            title: "Create wireframes".into(),
            description: Some("Design wireframes for the mobile app".into()),
            status: "In Progress".into(),
            due: Some(date(2023, 7, 5)),
            assignee_id: Some(2),
            created_by: Some(1),
            created_at_utc: ts(2023, 6, 21),
            updated_at_utc: ts(2023, 6, 25),
        },
        Task {
            id: 4,
            project_id: 2,
            title: "Setup development environment".into(),
            description: Some("Configure development environment for React Native".into()),
            status: "Done".into(),
            due: None,
            assignee_id: Some(3),
            created_by: Some(1),
            created_at_utc: ts(2023, 6, 22),
            updated_at_utc: ts(2023, 6, 23),
        },
        Task {
            id: 5,
            project_id: 3,
            title: "Content calendar".into(),
            description: Some("Create content calendar for Q3".into()),
            status: "In Progress".into(),
            due: Some(date(2023, 7, 20)),
            assignee_id: Some(1),
            created_by: Some(2),
            created_at_utc: ts(2023, 7, 12),
            updated_at_utc: ts(2023, 7, 15),
        },
    ];

    let automations = vec![
        Automation {
            id: 1,
            project_id: 1,
            name: "Mark as In Progress when assigned".into(),
            trigger: Trigger::TaskAssignedToUser,
            trigger_value: None,
            action: Action::MoveToStatus,
            action_value: Some("In Progress".into()),
            created_by: Some(1),
            created_at_utc: ts(2023, 5, 16),
        },
        Automation {
            id: 2,
            project_id: 2,
            name: "Notify on overdue tasks".into(),
            trigger: Trigger::DueDatePassed,
            trigger_value: None,
            action: Action::SendNotification,
            action_value: Some("Task is overdue!".into()),
            created_by: Some(1),
            created_at_utc: ts(2023, 6, 22),
        },
        Automation {
            id: 3,
            project_id: 3,
            name: "Assign to Jane when Done".into(),
            trigger: Trigger::TaskMovedToStatus,
            trigger_value: Some("Done".into()),
            action: Action::AssignToUser,
            action_value: Some("2".into()),
            created_by: Some(2),
            created_at_utc: ts(2023, 7, 12),
        },
    ];

    Database {
        users,
        projects,
        tasks,
        automations,
        notifications: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{resolve_project, resolve_user};
    use crate::rules::run_automations;

    #[test]
    fn test_sample_references_are_consistent() {
        let db = sample_database();
        for t in &db.tasks {
            assert!(db.project(t.project_id).is_some());
            if let Some(uid) = t.assignee_id {
                assert!(db.user(uid).is_some());
            }
        }
        for a in &db.automations {
            assert!(db.project(a.project_id).is_some());
        }
        assert_eq!(resolve_project("Website Redesign", &db), Ok(1));
        assert_eq!(resolve_user("jane smith", &db), Ok(2));
    }

    #[test]
    fn test_sample_done_rule_assigns_jane() {
        // Moving the content calendar task to Done assigns it to Jane.
        let mut db = sample_database();
        let today = date(2023, 7, 10);
        db.task_mut(5).unwrap().status = "Done".into();
        run_automations(&mut db, 5, today, 0);
        assert_eq!(db.task(5).unwrap().assignee_id, Some(2));
    }
}
