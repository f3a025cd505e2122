use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum ResourceType {
    Human,
    Material,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    /// Unit cost.
    pub cost: f64,
    pub project_id: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateResource {
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub cost: f64,
    pub project_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateResource {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: Option<ResourceType>,
    pub cost: Option<f64>,
}

/// A resource allocated to a task, with a quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResource {
    pub id: String,
    pub task_id: String,
    pub resource_id: String,
    pub quantity: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct TaskResourceWithResource {
    #[serde(flatten)]
    pub assignment: TaskResource,
    pub resource: Resource,
}

#[derive(Debug, Deserialize)]
pub struct AssignResource {
    pub task_id: String,
    pub resource_id: String,
    pub quantity: Option<f64>,
}
