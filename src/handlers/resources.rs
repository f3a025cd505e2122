use axum::extract::{Extension, Query, State};
use serde::Deserialize;

use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path};
use crate::middleware::AuthContext;
use crate::models::{AssignResource, CreateResource, Resource, TaskResource, UpdateResource};

#[derive(Deserialize)]
pub struct ResourceQuery {
    pub project_id: Option<String>,
}

pub async fn list_resources(
    State(state): State<AppState>,
    Query(query): Query<ResourceQuery>,
) -> Result<Json<Vec<Resource>>> {
    let conn = state.db.get()?;
    let resources = match &query.project_id {
        Some(project_id) => queries::list_resources_for_project(&conn, project_id)?,
        None => queries::list_resources(&conn)?,
    };
    Ok(Json(resources))
}

pub async fn create_resource(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(input): Json<CreateResource>,
) -> Result<Json<Resource>> {
    ctx.require_admin()?;
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("Resource name is required".into()));
    }

    let conn = state.db.get()?;
    if let Some(project_id) = &input.project_id {
        if queries::get_project_by_id(&conn, project_id)?.is_none() {
            return Err(AppError::NotFound("Project not found".into()));
        }
    }

    let resource = queries::create_resource(&conn, &input)?;
    Ok(Json(resource))
}

pub async fn get_resource(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Resource>> {
    let conn = state.db.get()?;
    let resource = queries::get_resource_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound("Resource not found".into()))?;
    Ok(Json(resource))
}

pub async fn update_resource(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(input): Json<UpdateResource>,
) -> Result<Json<Resource>> {
    ctx.require_admin()?;

    let conn = state.db.get()?;
    if !queries::update_resource(&conn, &id, &input)? {
        return Err(AppError::NotFound("Resource not found".into()));
    }

    let resource = queries::get_resource_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound("Resource not found".into()))?;
    Ok(Json(resource))
}

pub async fn delete_resource(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    ctx.require_admin()?;

    let conn = state.db.get()?;
    if !queries::delete_resource(&conn, &id)? {
        return Err(AppError::NotFound("Resource not found".into()));
    }
    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Allocate a resource to a task with an optional quantity.
pub async fn assign_resource(
    State(state): State<AppState>,
    Json(input): Json<AssignResource>,
) -> Result<Json<TaskResource>> {
    let conn = state.db.get()?;
    if queries::get_task_by_id(&conn, &input.task_id)?.is_none() {
        return Err(AppError::NotFound("Task not found".into()));
    }
    if queries::get_resource_by_id(&conn, &input.resource_id)?.is_none() {
        return Err(AppError::NotFound("Resource not found".into()));
    }

    let assignment = queries::assign_resource(&conn, &input)?;
    Ok(Json(assignment))
}

pub async fn unassign_resource(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let conn = state.db.get()?;
    if !queries::unassign_resource(&conn, &id)? {
        return Err(AppError::NotFound("Assignment not found".into()));
    }
    Ok(Json(serde_json::json!({ "deleted": true })))
}
