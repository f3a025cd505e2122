use serde::{Deserialize, Serialize};

use super::task::TaskWithUsers;
use super::user::UserSummary;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    /// General membership code: joins the project without a role change.
    pub invite_code: String,
    /// Joining with this code assigns the CHEF role and project leadership.
    pub invite_code_chef: String,
    /// Joining with this code assigns the MEMBRE role.
    pub invite_code_membre: String,
    pub created_by_id: String,
    pub chef_de_projet_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Lightweight shape for the global project listing.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub chef_de_projet_id: Option<String>,
}

/// Project with its tasks, members, and creator resolved.
#[derive(Debug, Serialize)]
pub struct ProjectWithDetails {
    #[serde(flatten)]
    pub project: Project,
    pub tasks: Vec<TaskWithUsers>,
    pub users: Vec<UserSummary>,
    pub created_by: Option<UserSummary>,
}

/// Project overview for the creator's dashboard: detail plus the summed
/// `spent` of the project's cost lines.
#[derive(Debug, Serialize)]
pub struct ProjectWithTotalCost {
    #[serde(flatten)]
    pub details: ProjectWithDetails,
    pub total_cost: f64,
}

#[derive(Debug, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    /// `Some(None)` clears the leader, `Some(Some(id))` assigns one.
    #[serde(default, with = "serde_double_option")]
    pub chef_id: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct AssignChef {
    pub project_id: String,
    pub chef_id: String,
}

#[derive(Debug, Deserialize)]
pub struct JoinProject {
    pub code: String,
}

/// Distinguishes "field absent" from "field set to null" for PUT bodies.
mod serde_double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer).map(Some)
    }
}
