use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cost {
    pub id: String,
    pub project_id: String,
    pub budget: f64,
    /// Spent to date.
    pub spent: f64,
    pub updated_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateCost {
    pub project_id: String,
    pub budget: f64,
    pub spent: f64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCost {
    pub budget: Option<f64>,
    pub spent: Option<f64>,
}
