//! Automation rules and the trigger/action evaluator.
//!
//! Every task create or update feeds the task through `run_automations`: each
//! rule scoped to the task's project is checked independently against a
//! snapshot of the task taken at pass entry, and its action executes if the
//! trigger condition holds. Mutating actions (move, assign) re-invoke
//! evaluation on the updated task, so rules can chain.
//!
//! The re-invocation is what makes chains possible and also what makes cycles
//! possible, so three guards bound it: a rule that has already fired for this
//! mutation is never executed again (so each rule's action runs at most once
//! per mutation), an action that leaves the field unchanged does not
//! re-invoke, and a chain through many distinct rules stops at
//! `MAX_CHAIN_DEPTH` passes.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::fields::{Action, Trigger};
use crate::task::Task;

/// Hard cap on chained evaluation passes for a single user-visible mutation.
/// A backstop behind the fired-once-per-rule guard, for projects whose rules
/// chain through many distinct statuses.
pub const MAX_CHAIN_DEPTH: usize = 8;

/// A trigger/action pair scoped to one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Automation {
    pub id: u64,
    pub project_id: u64,
    pub name: String,
    pub trigger: Trigger,
    pub trigger_value: Option<String>,
    pub action: Action,
    pub action_value: Option<String>,
    #[serde(default)]
    pub created_by: Option<u64>,
    pub created_at_utc: i64,
}

/// Notification recorded by a `send_notification` action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub user_id: Option<u64>,
    pub message: String,
    pub read: bool,
    pub project_id: u64,
    pub task_id: u64,
    pub created_at_utc: i64,
}

/// One rule firing, reported back to the command layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fired {
    MovedToStatus { rule: String, status: String },
    Assigned { rule: String, user_id: u64 },
    Notified { rule: String },
}

/// Whether `rule` fires for `task`. Checked against the task snapshot taken
/// at pass entry, not mid-pass state.
pub fn trigger_fires(rule: &Automation, task: &Task, today: NaiveDate) -> bool {
    match rule.trigger {
        Trigger::TaskMovedToStatus => rule.trigger_value.as_deref() == Some(task.status.as_str()),
        Trigger::TaskAssignedToUser => match rule.trigger_value.as_deref() {
            // No trigger value matches unassigned tasks, mirroring the
            // loose equality the original app relied on.
            None => task.assignee_id.is_none(),
            Some(v) => v
                .parse::<u64>()
                .ok()
                .is_some_and(|id| task.assignee_id == Some(id)),
        },
        Trigger::DueDatePassed => task.due.is_some_and(|d| d < today),
    }
}

/// Evaluate every rule in the task's project against the task and execute the
/// actions that fire. Returns what fired, in execution order, across all
/// chained passes. Each rule fires at most once per mutation.
pub fn run_automations(db: &mut Database, task_id: u64, today: NaiveDate, now_utc: i64) -> Vec<Fired> {
    let mut fired = Vec::new();
    let mut visited = HashSet::new();
    run_pass(db, task_id, today, now_utc, 0, &mut visited, &mut fired);
    fired
}

fn run_pass(
    db: &mut Database,
    task_id: u64,
    today: NaiveDate,
    now_utc: i64,
    depth: usize,
    visited: &mut HashSet<u64>,
    fired: &mut Vec<Fired>,
) {
    if depth >= MAX_CHAIN_DEPTH {
        eprintln!(
            "Automation chain for task {task_id} exceeded {MAX_CHAIN_DEPTH} passes; stopping. \
             Check the project's rules for a cycle."
        );
        return;
    }
    let Some(snapshot) = db.task(task_id).cloned() else {
        return;
    };
    for rule_id in db.automations_for_project(snapshot.project_id) {
        // A rule that already fired for this mutation never fires again,
        // whether in this pass or a chained one.
        if visited.contains(&rule_id) {
            continue;
        }
        let Some(rule) = db.automation(rule_id).cloned() else {
            continue;
        };
        if !trigger_fires(&rule, &snapshot, today) {
            continue;
        }
        visited.insert(rule_id);
        execute_action(db, task_id, &rule, today, now_utc, depth, visited, fired);
    }
}

/// Execute a fired rule's action. Missing action values on mutating actions
/// are a silent skip, not an error.
fn execute_action(
    db: &mut Database,
    task_id: u64,
    rule: &Automation,
    today: NaiveDate,
    now_utc: i64,
    depth: usize,
    visited: &mut HashSet<u64>,
    fired: &mut Vec<Fired>,
) {
    match rule.action {
        Action::MoveToStatus => {
            let Some(status) = rule.action_value.clone() else {
                return;
            };
            let changed = {
                let Some(task) = db.task_mut(task_id) else {
                    return;
                };
                if task.status == status {
                    false
                } else {
                    task.status = status.clone();
                    task.updated_at_utc = now_utc;
                    true
                }
            };
            fired.push(Fired::MovedToStatus {
                rule: rule.name.clone(),
                status,
            });
            if changed {
                run_pass(db, task_id, today, now_utc, depth + 1, visited, fired);
            }
        }
        Action::AssignToUser => {
            let Some(user_id) = rule.action_value.as_deref().and_then(|v| v.parse::<u64>().ok())
            else {
                return;
            };
            let changed = {
                let Some(task) = db.task_mut(task_id) else {
                    return;
                };
                if task.assignee_id == Some(user_id) {
                    false
                } else {
                    task.assignee_id = Some(user_id);
                    task.updated_at_utc = now_utc;
                    true
                }
            };
            fired.push(Fired::Assigned {
                rule: rule.name.clone(),
                user_id,
            });
            if changed {
                run_pass(db, task_id, today, now_utc, depth + 1, visited, fired);
            }
        }
        Action::SendNotification => {
            let Some(task) = db.task(task_id) else {
                return;
            };
            let recipient = task.assignee_id.or(task.created_by);
            let message = rule
                .action_value
                .clone()
                .unwrap_or_else(|| format!("Rule '{}' fired for task '{}'", rule.name, task.title));
            let notification = Notification {
                id: db.next_notification_id(),
                user_id: recipient,
                message,
                read: false,
                project_id: rule.project_id,
                task_id,
                created_at_utc: now_utc,
            };
            db.notifications.push(notification);
            fired.push(Fired::Notified {
                rule: rule.name.clone(),
            });
        }
    }
}

/// Describe a firing for command output.
pub fn describe_fired(f: &Fired) -> String {
    match f {
        Fired::MovedToStatus { rule, status } => {
            format!("rule '{rule}' moved the task to '{status}'")
        }
        Fired::Assigned { rule, user_id } => {
            format!("rule '{rule}' assigned the task to user {user_id}")
        }
        Fired::Notified { rule } => format!("rule '{rule}' sent a notification"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 24).unwrap()
    }

    fn db_with_task(status: &str, assignee_id: Option<u64>) -> Database {
        let mut db = Database::default();
        db.tasks.push(Task {
            id: 1,
            project_id: 1,
            title: "task".into(),
            description: None,
            status: status.to_string(),
            due: None,
            assignee_id,
            created_by: Some(1),
            created_at_utc: 0,
            updated_at_utc: 0,
        });
        db
    }

    fn rule(
        id: u64,
        project_id: u64,
        trigger: Trigger,
        trigger_value: Option<&str>,
        action: Action,
        action_value: Option<&str>,
    ) -> Automation {
        Automation {
            id,
            project_id,
            name: format!("rule {id}"),
            trigger,
            trigger_value: trigger_value.map(str::to_string),
            action,
            action_value: action_value.map(str::to_string),
            created_by: None,
            created_at_utc: 0,
        }
    }

    #[test]
    fn test_status_trigger_assigns_user() {
        // Task already "Done"; rule assigns user 2 on "Done".
        let mut db = db_with_task("Done", None);
        db.automations.push(rule(
            1,
            1,
            Trigger::TaskMovedToStatus,
            Some("Done"),
            Action::AssignToUser,
            Some("2"),
        ));
        let fired = run_automations(&mut db, 1, today(), 10);
        assert_eq!(db.task(1).unwrap().assignee_id, Some(2));
        assert_eq!(
            fired,
            vec![Fired::Assigned { rule: "rule 1".into(), user_id: 2 }]
        );
    }

    #[test]
    fn test_assignment_trigger_moves_status() {
        // Task assigned to user 1; rule moves assigned-to-1 tasks to In Progress.
        let mut db = db_with_task("To Do", Some(1));
        db.automations.push(rule(
            1,
            1,
            Trigger::TaskAssignedToUser,
            Some("1"),
            Action::MoveToStatus,
            Some("In Progress"),
        ));
        run_automations(&mut db, 1, today(), 10);
        assert_eq!(db.task(1).unwrap().status, "In Progress");
    }

    #[test]
    fn test_missing_action_value_is_noop() {
        let mut db = db_with_task("Done", None);
        db.automations.push(rule(
            1,
            1,
            Trigger::TaskMovedToStatus,
            Some("Done"),
            Action::MoveToStatus,
            None,
        ));
        let fired = run_automations(&mut db, 1, today(), 10);
        assert!(fired.is_empty());
        assert_eq!(db.task(1).unwrap().status, "Done");
        assert_eq!(db.task(1).unwrap().updated_at_utc, 0);
    }

    #[test]
    fn test_due_date_passed_is_strict() {
        let mut db = db_with_task("To Do", None);
        db.automations.push(rule(
            1,
            1,
            Trigger::DueDatePassed,
            None,
            Action::SendNotification,
            Some("Task is overdue!"),
        ));

        // Due today: not past.
        db.task_mut(1).unwrap().due = Some(today());
        run_automations(&mut db, 1, today(), 10);
        assert!(db.notifications.is_empty());

        // No due date at all: never fires.
        db.task_mut(1).unwrap().due = None;
        run_automations(&mut db, 1, today(), 10);
        assert!(db.notifications.is_empty());

        // Due yesterday: fires.
        db.task_mut(1).unwrap().due = Some(today() - Duration::days(1));
        run_automations(&mut db, 1, today(), 10);
        assert_eq!(db.notifications.len(), 1);
        assert_eq!(db.notifications[0].message, "Task is overdue!");
        assert_eq!(db.notifications[0].task_id, 1);
    }

    #[test]
    fn test_rules_from_other_projects_do_not_fire() {
        let mut db = db_with_task("Done", None);
        db.automations.push(rule(
            1,
            2,
            Trigger::TaskMovedToStatus,
            Some("Done"),
            Action::AssignToUser,
            Some("2"),
        ));
        let fired = run_automations(&mut db, 1, today(), 10);
        assert!(fired.is_empty());
        assert_eq!(db.task(1).unwrap().assignee_id, None);
    }

    #[test]
    fn test_each_matching_rule_fires_once_per_pass() {
        let mut db = db_with_task("Done", None);
        db.automations.push(rule(
            1,
            1,
            Trigger::TaskMovedToStatus,
            Some("Done"),
            Action::SendNotification,
            Some("first"),
        ));
        db.automations.push(rule(
            2,
            1,
            Trigger::TaskMovedToStatus,
            Some("Done"),
            Action::SendNotification,
            Some("second"),
        ));
        let fired = run_automations(&mut db, 1, today(), 10);
        assert_eq!(fired.len(), 2);
        assert_eq!(db.notifications.len(), 2);
        assert_eq!(db.notifications[0].message, "first");
        assert_eq!(db.notifications[1].message, "second");
    }

    #[test]
    fn test_self_retriggering_rule_terminates() {
        // Moving to "Done" triggers a move to "Done": the second pass is a
        // no-op, so evaluation stops instead of looping.
        let mut db = db_with_task("Done", None);
        db.automations.push(rule(
            1,
            1,
            Trigger::TaskMovedToStatus,
            Some("Done"),
            Action::MoveToStatus,
            Some("Done"),
        ));
        let fired = run_automations(&mut db, 1, today(), 10);
        assert_eq!(fired.len(), 1);
        assert_eq!(db.task(1).unwrap().status, "Done");
    }

    #[test]
    fn test_ping_pong_cycle_fires_each_rule_once() {
        // Rule A: "To Do" -> "Done". Rule B: "Done" -> "To Do". The cycle
        // ends after each rule has fired once, back at "To Do".
        let mut db = db_with_task("To Do", None);
        db.automations.push(rule(
            1,
            1,
            Trigger::TaskMovedToStatus,
            Some("To Do"),
            Action::MoveToStatus,
            Some("Done"),
        ));
        db.automations.push(rule(
            2,
            1,
            Trigger::TaskMovedToStatus,
            Some("Done"),
            Action::MoveToStatus,
            Some("To Do"),
        ));
        let fired = run_automations(&mut db, 1, today(), 10);
        assert_eq!(
            fired,
            vec![
                Fired::MovedToStatus { rule: "rule 1".into(), status: "Done".into() },
                Fired::MovedToStatus { rule: "rule 2".into(), status: "To Do".into() },
            ]
        );
        assert_eq!(db.task(1).unwrap().status, "To Do");
    }

    #[test]
    fn test_mutating_rule_reports_once_across_chained_passes() {
        // The assignment changes the task, so a chained pass runs; the rule
        // still matches there but must not execute or report again.
        let mut db = db_with_task("Done", None);
        db.automations.push(rule(
            1,
            1,
            Trigger::TaskMovedToStatus,
            Some("Done"),
            Action::AssignToUser,
            Some("2"),
        ));
        db.automations.push(rule(
            2,
            1,
            Trigger::TaskMovedToStatus,
            Some("Done"),
            Action::SendNotification,
            Some("done!"),
        ));
        let fired = run_automations(&mut db, 1, today(), 10);
        assert_eq!(fired.len(), 2);
        assert_eq!(db.notifications.len(), 1);
        assert_eq!(db.task(1).unwrap().assignee_id, Some(2));
    }

    #[test]
    fn test_triggers_check_pass_entry_snapshot() {
        // Rule A moves the task to "Done"; rule B notifies on "Done". Within
        // pass 0 rule B sees the entry snapshot ("To Do") and does not fire;
        // it fires once in the chained pass over the updated task.
        let mut db = db_with_task("To Do", None);
        db.automations.push(rule(
            1,
            1,
            Trigger::TaskMovedToStatus,
            Some("To Do"),
            Action::MoveToStatus,
            Some("Done"),
        ));
        db.automations.push(rule(
            2,
            1,
            Trigger::TaskMovedToStatus,
            Some("Done"),
            Action::SendNotification,
            Some("landed"),
        ));
        let fired = run_automations(&mut db, 1, today(), 10);
        assert_eq!(
            fired,
            vec![
                Fired::MovedToStatus { rule: "rule 1".into(), status: "Done".into() },
                Fired::Notified { rule: "rule 2".into() },
            ]
        );
        assert_eq!(db.notifications.len(), 1);
    }

    #[test]
    fn test_chained_rules_both_apply() {
        // Assigning to user 1 moves the task to In Progress, which in turn
        // notifies.
        let mut db = db_with_task("To Do", Some(1));
        db.automations.push(rule(
            1,
            1,
            Trigger::TaskAssignedToUser,
            Some("1"),
            Action::MoveToStatus,
            Some("In Progress"),
        ));
        db.automations.push(rule(
            2,
            1,
            Trigger::TaskMovedToStatus,
            Some("In Progress"),
            Action::SendNotification,
            Some("picked up"),
        ));
        let fired = run_automations(&mut db, 1, today(), 10);
        assert_eq!(db.task(1).unwrap().status, "In Progress");
        assert_eq!(db.notifications.len(), 1);
        assert_eq!(fired.len(), 2);
    }

    #[test]
    fn test_notification_recipient_prefers_assignee() {
        let mut db = db_with_task("Done", Some(5));
        db.automations.push(rule(
            1,
            1,
            Trigger::TaskMovedToStatus,
            Some("Done"),
            Action::SendNotification,
            None,
        ));
        run_automations(&mut db, 1, today(), 10);
        assert_eq!(db.notifications.len(), 1);
        assert_eq!(db.notifications[0].user_id, Some(5));
        // Default message names the rule.
        assert!(db.notifications[0].message.contains("rule 1"));
    }

    #[test]
    fn test_notification_does_not_mutate_task() {
        let mut db = db_with_task("Done", None);
        db.automations.push(rule(
            1,
            1,
            Trigger::TaskMovedToStatus,
            Some("Done"),
            Action::SendNotification,
            Some("hi"),
        ));
        run_automations(&mut db, 1, today(), 10);
        let t = db.task(1).unwrap();
        assert_eq!(t.status, "Done");
        assert_eq!(t.updated_at_utc, 0);
    }

    #[test]
    fn test_unassigned_trigger_value_matches_unassigned_task() {
        // A task-assigned-to-user rule with no trigger value matches tasks
        // with no assignee.
        let mut db = db_with_task("To Do", None);
        db.automations.push(rule(
            1,
            1,
            Trigger::TaskAssignedToUser,
            None,
            Action::MoveToStatus,
            Some("Backlog"),
        ));
        run_automations(&mut db, 1, today(), 10);
        assert_eq!(db.task(1).unwrap().status, "Backlog");
    }

    #[test]
    fn test_non_numeric_assignee_trigger_value_never_fires() {
        let mut db = db_with_task("To Do", None);
        db.automations.push(rule(
            1,
            1,
            Trigger::TaskAssignedToUser,
            Some("jane"),
            Action::MoveToStatus,
            Some("In Progress"),
        ));
        let fired = run_automations(&mut db, 1, today(), 10);
        assert!(fired.is_empty());
        assert_eq!(db.task(1).unwrap().status, "To Do");
    }

    #[test]
    fn test_assign_action_updates_timestamp() {
        let mut db = db_with_task("Done", None);
        db.automations.push(rule(
            1,
            1,
            Trigger::TaskMovedToStatus,
            Some("Done"),
            Action::AssignToUser,
            Some("2"),
        ));
        run_automations(&mut db, 1, today(), 42);
        assert_eq!(db.task(1).unwrap().updated_at_utc, 42);
    }
}
