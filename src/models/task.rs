use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use super::project::Project;
use super::user::UserSummary;

/// Task lifecycle: To Do -> In Progress -> Done. Done is terminal and must
/// carry a solution description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
pub enum TaskStatus {
    #[serde(rename = "To Do")]
    #[strum(serialize = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    #[strum(serialize = "In Progress")]
    InProgress,
    #[serde(rename = "Done")]
    #[strum(serialize = "Done")]
    Done,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub description: String,
    pub due_date: Option<i64>,
    pub status: TaskStatus,
    pub solution_description: Option<String>,
    pub project_id: String,
    pub created_by_id: String,
    /// Assignee. Defaults to the creator when unspecified at creation.
    pub user_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Task with its assignee and creator resolved, as embedded in project detail.
#[derive(Debug, Serialize)]
pub struct TaskWithUsers {
    #[serde(flatten)]
    pub task: Task,
    pub user: Option<UserSummary>,
    pub created_by: Option<UserSummary>,
}

/// Full task detail for the task page.
#[derive(Debug, Serialize)]
pub struct TaskWithDetails {
    #[serde(flatten)]
    pub task: Task,
    pub project: Project,
    pub user: Option<UserSummary>,
    pub created_by: Option<UserSummary>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTask {
    pub name: String,
    pub description: String,
    pub due_date: Option<i64>,
    pub project_id: String,
    /// Assignee email; must be a current project member.
    pub assign_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskStatus {
    pub status: TaskStatus,
    pub solution_description: Option<String>,
}
