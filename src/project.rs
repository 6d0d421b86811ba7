//! Project and user data structures.
//!
//! Projects scope everything else: tasks, automation rules and notifications
//! all carry a `project_id` and are removed when the project is. Users exist
//! only as an assignment directory; there is no authentication.

use serde::{Deserialize, Serialize};

use crate::fields::Role;

/// A project: a board of tasks plus the automation rules scoped to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub created_by: Option<u64>,
    pub created_at_utc: i64,
    #[serde(default)]
    pub members: Vec<ProjectMember>,
}

/// Membership record linking a user to a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMember {
    pub user_id: u64,
    pub role: Role,
}

/// Someone tasks can be assigned to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

/// Parse a `user[:role]` member argument, e.g. "2" or "2:admin".
pub fn parse_member_arg(s: &str) -> Result<(String, Role), String> {
    match s.split_once(':') {
        None => Ok((s.trim().to_string(), Role::Member)),
        Some((user, role)) => {
            let role = match role.trim().to_lowercase().as_str() {
                "owner" => Role::Owner,
                "admin" => Role::Admin,
                "member" => Role::Member,
                other => return Err(format!("Unknown role '{other}'. Use owner, admin or member.")),
            };
            Ok((user.trim().to_string(), role))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_member_arg() {
        assert!(matches!(parse_member_arg("3"), Ok((ref u, Role::Member)) if u == "3"));
        assert!(matches!(parse_member_arg("jane:admin"), Ok((ref u, Role::Admin)) if u == "jane"));
        assert!(matches!(parse_member_arg("1:owner"), Ok((_, Role::Owner))));
        assert!(parse_member_arg("1:boss").is_err());
    }
}
