use serde::{Deserialize, Serialize};

/// Project membership row. The (user, project) pair is unique; rows are
/// created only through invite redemption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectUser {
    pub id: String,
    pub user_id: String,
    pub project_id: String,
    pub created_at: i64,
}
