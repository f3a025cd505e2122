use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

/// Application-wide role. A user holds exactly one role at a time; it is
/// mutated either by an admin or by redeeming a chef/membre invite code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Chef,
    Membre,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Trimmed user shape embedded in project/task/message payloads.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SyncUser {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRole {
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct UserTaskStats {
    pub done: i64,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct UserStats {
    pub tasks: UserTaskStats,
    pub projects_created: i64,
}
