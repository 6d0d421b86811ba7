//! Command implementations for the CLI interface.
//!
//! This module contains all the command handlers, from basic CRUD operations
//! on projects, tasks, users and rules through to the board view and the
//! sample-data seeder. Every task-mutating handler runs the automation
//! evaluator before saving and reports which rules fired.

use clap::Subcommand;
use clap_complete::{generate, Shell};

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{Local, NaiveDate, TimeZone, Utc};

use crate::db::*;
use crate::fields::*;
use crate::project::{parse_member_arg, Project, ProjectMember, User};
use crate::rules::{describe_fired, run_automations, Automation};
use crate::task::{Task, STATUS_DONE, STATUS_TODO};

#[derive(Subcommand)]
pub enum Commands {
    /// Manage projects.
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Manage the user directory.
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Project ID or title.
        #[arg(long)]
        project: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", or "in Nd".
        #[arg(long)]
        due: Option<String>,
        /// Assignee user ID or name.
        #[arg(long)]
        assignee: Option<String>,
        /// Board column, free-form. Defaults to "To Do".
        #[arg(long)]
        status: Option<String>,
        /// Creating user ID or name.
        #[arg(long)]
        by: Option<String>,
    },

    /// List tasks with optional filters.
    List {
        /// Include tasks in the "Done" column.
        #[arg(long)]
        all: bool,
        /// Filter by project ID or title.
        #[arg(long)]
        project: Option<String>,
        /// Filter by status (board column).
        #[arg(long)]
        status: Option<String>,
        /// Filter by assignee user ID or name.
        #[arg(long)]
        assignee: Option<String>,
        /// Due filter: today | this-week | overdue | none.
        #[arg(long, value_enum)]
        due: Option<DueFilter>,
        /// Sort key.
        #[arg(long, value_enum, default_value_t = SortKey::Due)]
        sort: SortKey,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// View a single task by ID or title.
    View {
        /// Task ID or title.
        id: String,
    },

    /// Update fields on a task, then run automations.
    Update {
        /// Task ID or title.
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", or "in Nd".
        #[arg(long)]
        due: Option<String>,
        /// Clear due date.
        #[arg(long)]
        clear_due: bool,
        /// Assignee user ID or name.
        #[arg(long)]
        assignee: Option<String>,
        /// Clear assignee.
        #[arg(long)]
        clear_assignee: bool,
        /// Board column, free-form.
        #[arg(long)]
        status: Option<String>,
    },

    /// Move a task to another board column (status-only update).
    Move {
        /// Task ID or title.
        id: String,
        /// Target board column.
        status: String,
    },

    /// Assign a task to a user.
    Assign {
        /// Task ID or title.
        id: String,
        /// User ID or name.
        user: String,
    },

    /// Delete a task by ID or title.
    Delete {
        /// Task ID or title.
        id: String,
    },

    /// Render a project's tasks as a kanban board.
    Board {
        /// Project ID or title.
        project: String,
        /// Include tasks in the "Done" column.
        #[arg(long)]
        all: bool,
    },

    /// Manage automation rules.
    Rule {
        #[command(subcommand)]
        action: RuleAction,
    },

    /// List recorded notifications.
    Notifications {
        /// Only show unread notifications.
        #[arg(long)]
        unread: bool,
    },

    /// Mark notifications as read.
    NotificationsRead {
        /// Notification ID to mark read.
        id: Option<u64>,
        /// Mark every notification read.
        #[arg(long)]
        all: bool,
    },

    /// Load the bundled sample dataset.
    Seed {
        /// Overwrite a non-empty store.
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a project.
    Add {
        /// Project title.
        title: String,
        /// Optional description.
        #[arg(long)]
        desc: Option<String>,
        /// Member as user[:role], role one of owner|admin|member. May be repeated.
        #[arg(long = "member")]
        members: Vec<String>,
        /// Creating user ID or name.
        #[arg(long)]
        by: Option<String>,
    },
    /// List projects with task counts.
    List,
    /// View a project and its members.
    View {
        /// Project ID or title.
        id: String,
    },
    /// Update a project's title or description.
    Update {
        /// Project ID or title.
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
    },
    /// Delete a project along with its tasks, rules and notifications.
    Delete {
        /// Project ID or title.
        id: String,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Add a user to the directory.
    Add {
        /// Display name.
        name: String,
        /// Email address.
        #[arg(long)]
        email: String,
    },
    /// List users.
    List,
}

#[derive(Subcommand)]
pub enum RuleAction {
    /// Create an automation rule.
    Add {
        /// Rule name.
        name: String,
        /// Project ID or title the rule is scoped to.
        #[arg(long)]
        project: String,
        /// Trigger condition.
        #[arg(long, value_enum)]
        trigger: Trigger,
        /// Trigger value: a status for task-moved-to-status, a user for
        /// task-assigned-to-user. Ignored by due-date-passed.
        #[arg(long)]
        trigger_value: Option<String>,
        /// Action to execute when the trigger holds.
        #[arg(long, value_enum)]
        action: Action,
        /// Action value: target status, target user, or notification message.
        #[arg(long)]
        action_value: Option<String>,
        /// Creating user ID or name.
        #[arg(long)]
        by: Option<String>,
    },
    /// List rules, optionally scoped to one project.
    List {
        /// Project ID or title.
        #[arg(long)]
        project: Option<String>,
    },
    /// Update fields on a rule.
    Update {
        /// Rule ID or name.
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_enum)]
        trigger: Option<Trigger>,
        #[arg(long)]
        trigger_value: Option<String>,
        /// Clear the trigger value.
        #[arg(long)]
        clear_trigger_value: bool,
        #[arg(long, value_enum)]
        action: Option<Action>,
        #[arg(long)]
        action_value: Option<String>,
        /// Clear the action value.
        #[arg(long)]
        clear_action_value: bool,
    },
    /// Delete a rule.
    Delete {
        /// Rule ID or name.
        id: String,
    },
}

fn save_db(db: &Database, db_path: &Path) {
    if let Err(e) = db.save(db_path) {
        eprintln!("Failed to save store: {e}");
        std::process::exit(1);
    }
}

fn resolve_or_exit(result: Result<u64, String>, what: &str) -> u64 {
    match result {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Error resolving {what}: {e}");
            std::process::exit(1);
        }
    }
}

fn report_fired(fired: &[crate::rules::Fired]) {
    for f in fired {
        println!("  automation: {}", describe_fired(f));
    }
}

/// Handle project management commands.
pub fn cmd_project(db: &mut Database, db_path: &Path, action: ProjectAction) {
    match action {
        ProjectAction::Add { title, desc, members, by } => {
            if title.trim().is_empty() {
                eprintln!("Project title cannot be empty.");
                std::process::exit(1);
            }
            let created_by = by.map(|u| resolve_or_exit(resolve_user(&u, db), "user"));
            let mut member_list = Vec::new();
            for raw in &members {
                let (user, role) = match parse_member_arg(raw) {
                    Ok(m) => m,
                    Err(e) => {
                        eprintln!("Invalid --member '{raw}': {e}");
                        std::process::exit(1);
                    }
                };
                let user_id = resolve_or_exit(resolve_user(&user, db), "member");
                member_list.push(ProjectMember { user_id, role });
            }
            let id = db.next_project_id();
            db.projects.push(Project {
                id,
                title: title.trim().to_string(),
                description: desc,
                created_by,
                created_at_utc: Utc::now().timestamp(),
                members: member_list,
            });
            save_db(db, db_path);
            println!("Added project {id}");
        }

        ProjectAction::List => {
            let mut task_counts: BTreeMap<u64, usize> = BTreeMap::new();
            for t in &db.tasks {
                *task_counts.entry(t.project_id).or_default() += 1;
            }
            let mut rule_counts: BTreeMap<u64, usize> = BTreeMap::new();
            for a in &db.automations {
                *rule_counts.entry(a.project_id).or_default() += 1;
            }
            println!("{:<5} {:<24} {:<7} {:<7} {}", "ID", "Title", "Tasks", "Rules", "Members");
            for p in &db.projects {
                println!(
                    "{:<5} {:<24} {:<7} {:<7} {}",
                    p.id,
                    truncate(&p.title, 24),
                    task_counts.get(&p.id).copied().unwrap_or(0),
                    rule_counts.get(&p.id).copied().unwrap_or(0),
                    p.members.len()
                );
            }
        }

        ProjectAction::View { id } => {
            let project_id = resolve_or_exit(resolve_project(&id, db), "project");
            let Some(p) = db.project(project_id) else {
                eprintln!("Project {project_id} not found.");
                std::process::exit(1);
            };
            println!("ID:           {}", p.id);
            println!("Title:        {}", p.title);
            println!("Description:  {}", p.description.as_deref().unwrap_or("-"));
            println!("Created by:   {}", user_label(db, p.created_by));
            println!(
                "Created UTC:  {}",
                Utc.timestamp_opt(p.created_at_utc, 0)
                    .single()
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "-".into())
            );
            println!("Members:");
            if p.members.is_empty() {
                println!("  -");
            }
            for m in &p.members {
                println!("  {} ({})", user_label(db, Some(m.user_id)), format_role(m.role));
            }
            let task_count = db.tasks.iter().filter(|t| t.project_id == project_id).count();
            let rule_count = db.automations.iter().filter(|a| a.project_id == project_id).count();
            println!("Tasks:        {task_count}");
            println!("Rules:        {rule_count}");
        }

        ProjectAction::Update { id, title, desc } => {
            let project_id = resolve_or_exit(resolve_project(&id, db), "project");
            let Some(p) = db.project_mut(project_id) else {
                eprintln!("Project {project_id} not found.");
                std::process::exit(1);
            };
            if let Some(t) = title {
                if t.trim().is_empty() {
                    eprintln!("Project title cannot be empty.");
                    std::process::exit(1);
                }
                p.title = t.trim().to_string();
            }
            if let Some(d) = desc {
                p.description = if d.is_empty() { None } else { Some(d) };
            }
            save_db(db, db_path);
            println!("Updated project {project_id}");
        }

        ProjectAction::Delete { id } => {
            let project_id = resolve_or_exit(resolve_project(&id, db), "project");
            let tasks = db.tasks.iter().filter(|t| t.project_id == project_id).count();
            let rules = db.automations.iter().filter(|a| a.project_id == project_id).count();
            db.remove_project(project_id);
            save_db(db, db_path);
            println!("Deleted project {project_id} ({tasks} task(s), {rules} rule(s)).");
        }
    }
}

/// Handle user directory commands.
pub fn cmd_user(db: &mut Database, db_path: &Path, action: UserAction) {
    match action {
        UserAction::Add { name, email } => {
            if name.trim().is_empty() {
                eprintln!("User name cannot be empty.");
                std::process::exit(1);
            }
            let id = db.next_user_id();
            db.users.push(User {
                id,
                name: name.trim().to_string(),
                email,
            });
            save_db(db, db_path);
            println!("Added user {id}");
        }
        UserAction::List => {
            println!("{:<5} {:<20} {}", "ID", "Name", "Email");
            for u in &db.users {
                println!("{:<5} {:<20} {}", u.id, truncate(&u.name, 20), u.email);
            }
        }
    }
}

/// Add a new task and run automations against it.
pub fn cmd_add(
    db: &mut Database,
    db_path: &Path,
    title: String,
    project: String,
    desc: Option<String>,
    due: Option<String>,
    assignee: Option<String>,
    status: Option<String>,
    by: Option<String>,
) {
    let project_id = resolve_or_exit(resolve_project(&project, db), "project");
    let assignee_id = assignee.map(|u| resolve_or_exit(resolve_user(&u, db), "assignee"));
    let created_by = by.map(|u| resolve_or_exit(resolve_user(&u, db), "user"));

    let due = match due {
        None => None,
        Some(ds) => match parse_due_input(&ds) {
            Some(d) => Some(d),
            None => {
                eprintln!("Unrecognised due date. Use YYYY-MM-DD, 'today', 'tomorrow', or 'in Nd'.");
                std::process::exit(1);
            }
        },
    };

    let now_utc = Utc::now().timestamp();
    let id = db.next_task_id();
    db.tasks.push(Task {
        id,
        project_id,
        title,
        description: desc,
        status: status.unwrap_or_else(|| STATUS_TODO.to_string()),
        due,
        assignee_id,
        created_by,
        created_at_utc: now_utc,
        updated_at_utc: now_utc,
    });

    let fired = run_automations(db, id, Local::now().date_naive(), now_utc);
    save_db(db, db_path);
    println!("Added task {id}");
    report_fired(&fired);
}

/// List tasks with optional filtering and sorting.
pub fn cmd_list(
    db: &Database,
    all: bool,
    project: Option<String>,
    status: Option<String>,
    assignee: Option<String>,
    due: Option<DueFilter>,
    sort: SortKey,
    limit: Option<usize>,
) {
    let project_id = project.map(|p| resolve_or_exit(resolve_project(&p, db), "project"));
    let assignee_id = assignee.map(|u| resolve_or_exit(resolve_user(&u, db), "assignee"));
    let today = Local::now().date_naive();
    let (week_start, week_end) = start_end_of_this_week(today);

    let mut filtered: Vec<&Task> = db
        .tasks
        .iter()
        .filter(|t| {
            if !all && status.is_none() && t.status == STATUS_DONE {
                return false;
            }
            if let Some(pid) = project_id {
                if t.project_id != pid {
                    return false;
                }
            }
            if let Some(ref s) = status {
                if !t.status.eq_ignore_ascii_case(s) {
                    return false;
                }
            }
            if let Some(uid) = assignee_id {
                if t.assignee_id != Some(uid) {
                    return false;
                }
            }
            if let Some(df) = due {
                match df {
                    DueFilter::Today => {
                        if t.due != Some(today) {
                            return false;
                        }
                    }
                    DueFilter::ThisWeek => {
                        if let Some(d) = t.due {
                            if d < week_start || d > week_end {
                                return false;
                            }
                        } else {
                            return false;
                        }
                    }
                    DueFilter::Overdue => {
                        if let Some(d) = t.due {
                            if d >= today {
                                return false;
                            }
                        } else {
                            return false;
                        }
                    }
                    DueFilter::None => {
                        if t.due.is_some() {
                            return false;
                        }
                    }
                }
            }
            true
        })
        .collect();

    match sort {
        SortKey::Due => filtered.sort_by_key(|t| (t.due.unwrap_or(NaiveDate::MAX), t.id)),
        SortKey::Updated => filtered.sort_by_key(|t| (std::cmp::Reverse(t.updated_at_utc), t.id)),
        SortKey::Id => filtered.sort_by_key(|t| t.id),
    }

    if let Some(n) = limit {
        filtered.truncate(n);
    }

    print_task_table(db, &filtered);
}

/// View detailed information about a specific task.
pub fn cmd_view(db: &Database, id: String) {
    let task_id = resolve_or_exit(resolve_task(&id, db), "task");
    let Some(task) = db.task(task_id) else {
        eprintln!("Task {task_id} not found.");
        std::process::exit(1);
    };
    let today = Local::now().date_naive();
    let project = db
        .project(task.project_id)
        .map(|p| p.title.clone())
        .unwrap_or_else(|| format!("#{}", task.project_id));
    println!("ID:           {}", task.id);
    println!("Title:        {}", task.title);
    println!("Project:      {project}");
    println!("Status:       {}", task.status);
    println!(
        "Due:          {}",
        match task.due {
            Some(d) => format!("{d} ({})", format_due_relative(Some(d), today)),
            None => "-".into(),
        }
    );
    println!("Assignee:     {}", user_label(db, task.assignee_id));
    println!("Created by:   {}", user_label(db, task.created_by));
    println!(
        "Created UTC:  {}",
        Utc.timestamp_opt(task.created_at_utc, 0)
            .single()
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "-".into())
    );
    println!(
        "Updated UTC:  {}",
        Utc.timestamp_opt(task.updated_at_utc, 0)
            .single()
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "-".into())
    );
    println!(
        "Description:\n{}\n",
        task.description.as_deref().unwrap_or("-")
    );
}

/// Update an existing task's fields, then run automations.
pub fn cmd_update(
    db: &mut Database,
    db_path: &Path,
    id: String,
    title: Option<String>,
    desc: Option<String>,
    due: Option<String>,
    clear_due: bool,
    assignee: Option<String>,
    clear_assignee: bool,
    status: Option<String>,
) {
    let task_id = resolve_or_exit(resolve_task(&id, db), "task");
    let assignee_id = assignee.map(|u| resolve_or_exit(resolve_user(&u, db), "assignee"));

    let due = match due {
        None => None,
        Some(ds) => match parse_due_input(&ds) {
            Some(d) => Some(d),
            None => {
                eprintln!("Unrecognised due date. Use YYYY-MM-DD, 'today', 'tomorrow', or 'in Nd'.");
                std::process::exit(1);
            }
        },
    };

    let now_utc = Utc::now().timestamp();
    {
        let Some(t) = db.task_mut(task_id) else {
            eprintln!("Task {task_id} not found.");
            std::process::exit(1);
        };
        if let Some(s) = title {
            t.title = s;
        }
        if let Some(d) = desc {
            t.description = if d.is_empty() { None } else { Some(d) };
        }
        if clear_due {
            t.due = None;
        }
        if let Some(d) = due {
            t.due = Some(d);
        }
        if clear_assignee {
            t.assignee_id = None;
        }
        if let Some(uid) = assignee_id {
            t.assignee_id = Some(uid);
        }
        if let Some(s) = status {
            t.status = s;
        }
        t.updated_at_utc = now_utc;
    }

    let fired = run_automations(db, task_id, Local::now().date_naive(), now_utc);
    save_db(db, db_path);
    println!("Updated task {task_id}");
    report_fired(&fired);
}

/// Move a task to another board column. Status-only shorthand for update.
pub fn cmd_move(db: &mut Database, db_path: &Path, id: String, status: String) {
    let task_id = resolve_or_exit(resolve_task(&id, db), "task");
    let now_utc = Utc::now().timestamp();
    {
        let Some(t) = db.task_mut(task_id) else {
            eprintln!("Task {task_id} not found.");
            std::process::exit(1);
        };
        t.status = status.clone();
        t.updated_at_utc = now_utc;
    }
    let fired = run_automations(db, task_id, Local::now().date_naive(), now_utc);
    save_db(db, db_path);
    println!("Moved task {task_id} to '{status}'");
    report_fired(&fired);
}

/// Assign a task to a user, then run automations.
pub fn cmd_assign(db: &mut Database, db_path: &Path, id: String, user: String) {
    let task_id = resolve_or_exit(resolve_task(&id, db), "task");
    let user_id = resolve_or_exit(resolve_user(&user, db), "user");
    let now_utc = Utc::now().timestamp();
    {
        let Some(t) = db.task_mut(task_id) else {
            eprintln!("Task {task_id} not found.");
            std::process::exit(1);
        };
        t.assignee_id = Some(user_id);
        t.updated_at_utc = now_utc;
    }
    let fired = run_automations(db, task_id, Local::now().date_naive(), now_utc);
    save_db(db, db_path);
    println!("Assigned task {task_id} to user {user_id}");
    report_fired(&fired);
}

/// Delete a task. Deletion does not run automations.
pub fn cmd_delete(db: &mut Database, db_path: &Path, id: String) {
    let task_id = resolve_or_exit(resolve_task(&id, db), "task");
    db.tasks.retain(|t| t.id != task_id);
    db.notifications.retain(|n| n.task_id != task_id);
    save_db(db, db_path);
    println!("Deleted task {task_id}");
}

/// Render a project's tasks as kanban columns.
pub fn cmd_board(db: &Database, project: String, all: bool) {
    let project_id = resolve_or_exit(resolve_project(&project, db), "project");
    let title = db
        .project(project_id)
        .map(|p| p.title.clone())
        .unwrap_or_else(|| format!("#{project_id}"));
    let tasks: Vec<&Task> = db
        .tasks
        .iter()
        .filter(|t| t.project_id == project_id)
        .collect();

    println!("Board: {title}");
    let today = Local::now().date_naive();
    for column in Database::board_columns(&tasks) {
        if !all && column == STATUS_DONE {
            continue;
        }
        let in_column: Vec<&&Task> = tasks.iter().filter(|t| t.status == column).collect();
        println!("\n  {} ({})", column, in_column.len());
        for t in in_column {
            let assignee = t
                .assignee_id
                .map(|uid| user_label(db, Some(uid)))
                .unwrap_or_else(|| "-".into());
            println!(
                "    #{:<4} {:<32} {:<12} {}",
                t.id,
                truncate(&t.title, 32),
                format_due_relative(t.due, today),
                assignee
            );
        }
    }
}

/// Handle automation rule commands.
pub fn cmd_rule(db: &mut Database, db_path: &Path, action: RuleAction) {
    match action {
        RuleAction::Add {
            name,
            project,
            trigger,
            trigger_value,
            action,
            action_value,
            by,
        } => {
            if name.trim().is_empty() {
                eprintln!("Rule name cannot be empty.");
                std::process::exit(1);
            }
            let project_id = resolve_or_exit(resolve_project(&project, db), "project");
            let created_by = by.map(|u| resolve_or_exit(resolve_user(&u, db), "user"));
            if matches!(action, Action::MoveToStatus | Action::AssignToUser)
                && action_value.is_none()
            {
                println!(
                    "note: '{}' has no --action-value; the action will be skipped when the rule fires.",
                    format_action(action)
                );
            }
            let id = db.next_automation_id();
            db.automations.push(Automation {
                id,
                project_id,
                name: name.trim().to_string(),
                trigger,
                trigger_value,
                action,
                action_value,
                created_by,
                created_at_utc: Utc::now().timestamp(),
            });
            save_db(db, db_path);
            println!("Added rule {id}");
        }

        RuleAction::List { project } => {
            let project_id = project.map(|p| resolve_or_exit(resolve_project(&p, db), "project"));
            println!(
                "{:<5} {:<24} {:<16} {:<22} {:<14} {:<18} {}",
                "ID", "Name", "Project", "Trigger", "Value", "Action", "Value"
            );
            for a in &db.automations {
                if let Some(pid) = project_id {
                    if a.project_id != pid {
                        continue;
                    }
                }
                let project = db
                    .project(a.project_id)
                    .map(|p| p.title.clone())
                    .unwrap_or_else(|| format!("#{}", a.project_id));
                println!(
                    "{:<5} {:<24} {:<16} {:<22} {:<14} {:<18} {}",
                    a.id,
                    truncate(&a.name, 24),
                    truncate(&project, 16),
                    format_trigger(a.trigger),
                    truncate(a.trigger_value.as_deref().unwrap_or("-"), 14),
                    format_action(a.action),
                    a.action_value.as_deref().unwrap_or("-")
                );
            }
        }

        RuleAction::Update {
            id,
            name,
            trigger,
            trigger_value,
            clear_trigger_value,
            action,
            action_value,
            clear_action_value,
        } => {
            let rule_id = resolve_or_exit(resolve_rule(&id, db), "rule");
            let Some(a) = db.automation_mut(rule_id) else {
                eprintln!("Rule {rule_id} not found.");
                std::process::exit(1);
            };
            if let Some(n) = name {
                a.name = n;
            }
            if let Some(t) = trigger {
                a.trigger = t;
            }
            if clear_trigger_value {
                a.trigger_value = None;
            }
            if let Some(v) = trigger_value {
                a.trigger_value = Some(v);
            }
            if let Some(act) = action {
                a.action = act;
            }
            if clear_action_value {
                a.action_value = None;
            }
            if let Some(v) = action_value {
                a.action_value = Some(v);
            }
            save_db(db, db_path);
            println!("Updated rule {rule_id}");
        }

        RuleAction::Delete { id } => {
            let rule_id = resolve_or_exit(resolve_rule(&id, db), "rule");
            db.automations.retain(|a| a.id != rule_id);
            save_db(db, db_path);
            println!("Deleted rule {rule_id}");
        }
    }
}

/// List recorded notifications.
pub fn cmd_notifications(db: &Database, unread: bool) {
    println!(
        "{:<5} {:<6} {:<12} {:<6} {}",
        "ID", "Read", "Recipient", "Task", "Message"
    );
    for n in &db.notifications {
        if unread && n.read {
            continue;
        }
        println!(
            "{:<5} {:<6} {:<12} {:<6} {}",
            n.id,
            if n.read { "yes" } else { "no" },
            truncate(&user_label(db, n.user_id), 12),
            n.task_id,
            n.message
        );
    }
}

/// Mark one or all notifications as read.
pub fn cmd_notifications_read(db: &mut Database, db_path: &Path, id: Option<u64>, all: bool) {
    match (id, all) {
        (Some(id), false) => {
            let Some(n) = db.notifications.iter_mut().find(|n| n.id == id) else {
                eprintln!("Notification {id} not found.");
                std::process::exit(1);
            };
            n.read = true;
            save_db(db, db_path);
            println!("Marked notification {id} read.");
        }
        (None, true) => {
            let mut count = 0;
            for n in db.notifications.iter_mut().filter(|n| !n.read) {
                n.read = true;
                count += 1;
            }
            save_db(db, db_path);
            println!("Marked {count} notification(s) read.");
        }
        _ => {
            eprintln!("Specify exactly one of a notification ID or --all.");
            std::process::exit(1);
        }
    }
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

fn user_label(db: &Database, id: Option<u64>) -> String {
    match id {
        None => "-".into(),
        Some(id) => db
            .user(id)
            .map(|u| u.name.clone())
            .unwrap_or_else(|| format!("#{id}")),
    }
}
