//! Enumerations shared across the data model and CLI.
//!
//! Automation triggers and actions are closed tagged unions that are matched
//! exhaustively wherever rules are evaluated. Task status is deliberately NOT
//! an enum: board columns are free-form strings so rules can target any column
//! name a project invents.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Condition evaluated against a task after every create/update.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Fires when the task's status equals the rule's trigger value.
    TaskMovedToStatus,
    /// Fires when the task's assignee equals the rule's trigger value.
    TaskAssignedToUser,
    /// Fires when the task has a due date strictly in the past.
    DueDatePassed,
}

/// Effect applied when a rule's trigger condition holds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Move the task to the status named by the action value.
    MoveToStatus,
    /// Assign the task to the user id named by the action value.
    AssignToUser,
    /// Record a notification; never mutates the task.
    SendNotification,
}

/// Membership role within a project. Informational only; a single-user tool
/// enforces no permissions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Owner,
    Admin,
    Member,
}

/// Available sorting options for task lists.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortKey {
    Due,
    Updated,
    Id,
}

/// Filtering options for tasks based on due dates.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DueFilter {
    Today,
    ThisWeek,
    Overdue,
    None,
}

/// Format a trigger for display.
pub fn format_trigger(t: Trigger) -> &'static str {
    match t {
        Trigger::TaskMovedToStatus => "task-moved-to-status",
        Trigger::TaskAssignedToUser => "task-assigned-to-user",
        Trigger::DueDatePassed => "due-date-passed",
    }
}

/// Format an action for display.
pub fn format_action(a: Action) -> &'static str {
    match a {
        Action::MoveToStatus => "move-to-status",
        Action::AssignToUser => "assign-to-user",
        Action::SendNotification => "send-notification",
    }
}

/// Format a role for display.
pub fn format_role(r: Role) -> &'static str {
    match r {
        Role::Owner => "owner",
        Role::Admin => "admin",
        Role::Member => "member",
    }
}
