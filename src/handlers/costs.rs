use axum::extract::{Query, State};
use serde::Deserialize;

use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path};
use crate::models::{Cost, CreateCost, UpdateCost};

#[derive(Deserialize)]
pub struct CostQuery {
    pub project_id: Option<String>,
}

pub async fn list_costs(
    State(state): State<AppState>,
    Query(query): Query<CostQuery>,
) -> Result<Json<Vec<Cost>>> {
    let project_id = query
        .project_id
        .ok_or_else(|| AppError::Validation("project_id is required".into()))?;

    let conn = state.db.get()?;
    Ok(Json(queries::list_costs_for_project(&conn, &project_id)?))
}

pub async fn create_cost(
    State(state): State<AppState>,
    Json(input): Json<CreateCost>,
) -> Result<Json<Cost>> {
    let conn = state.db.get()?;
    if queries::get_project_by_id(&conn, &input.project_id)?.is_none() {
        return Err(AppError::NotFound("Project not found".into()));
    }

    let cost = queries::create_cost(&conn, &input)?;
    Ok(Json(cost))
}

pub async fn get_cost(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Cost>> {
    let conn = state.db.get()?;
    let cost = queries::get_cost_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound("Cost not found".into()))?;
    Ok(Json(cost))
}

pub async fn update_cost(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateCost>,
) -> Result<Json<Cost>> {
    let conn = state.db.get()?;
    if !queries::update_cost(&conn, &id, &input)? {
        return Err(AppError::NotFound("Cost not found".into()));
    }

    let cost = queries::get_cost_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound("Cost not found".into()))?;
    Ok(Json(cost))
}

pub async fn delete_cost(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let conn = state.db.get()?;
    if !queries::delete_cost(&conn, &id)? {
        return Err(AppError::NotFound("Cost not found".into()));
    }
    Ok(Json(serde_json::json!({ "deleted": true })))
}
