use axum::extract::{Extension, Query, State};
use serde::Deserialize;

use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path};
use crate::middleware::AuthContext;
use crate::models::{
    AssignChef, CreateProject, Project, ProjectSummary, ProjectWithDetails, ProjectWithTotalCost,
    Role, UpdateProject, UserSummary,
};

/// Create a project with freshly generated invite codes. Admin-only; the
/// codes are returned once here and re-readable by the creator afterwards.
pub async fn create_project(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(input): Json<CreateProject>,
) -> Result<Json<Project>> {
    ctx.require_admin()?;
    if input.name.trim().is_empty() || input.description.trim().is_empty() {
        return Err(AppError::Validation("Name and description are required".into()));
    }

    let conn = state.db.get()?;
    let project = queries::create_project(&conn, &input, &ctx.user.id)?;
    tracing::info!(project_id = %project.id, "project created");
    Ok(Json(project))
}

pub async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<ProjectSummary>>> {
    let conn = state.db.get()?;
    Ok(Json(queries::list_project_summaries(&conn)?))
}

/// Projects created by the caller, with detail and summed cost spend.
pub async fn my_projects(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Vec<ProjectWithTotalCost>>> {
    let conn = state.db.get()?;
    let projects = queries::list_projects_created_by(&conn, &ctx.user.id)?;

    let mut results = Vec::with_capacity(projects.len());
    for project in projects {
        let total_cost = queries::project_total_cost(&conn, &project.id)?;
        let details = queries::load_project_details(&conn, project)?;
        results.push(ProjectWithTotalCost {
            details,
            total_cost,
        });
    }
    Ok(Json(results))
}

/// Projects the caller is a member of.
pub async fn joined_projects(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Vec<ProjectWithDetails>>> {
    let conn = state.db.get()?;
    let projects = queries::list_projects_for_member(&conn, &ctx.user.id)?;

    let mut results = Vec::with_capacity(projects.len());
    for project in projects {
        results.push(queries::load_project_details(&conn, project)?);
    }
    Ok(Json(results))
}

#[derive(Deserialize)]
pub struct ProjectQuery {
    #[serde(default)]
    pub details: bool,
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ProjectQuery>,
) -> Result<axum::response::Response> {
    use axum::response::IntoResponse;

    let conn = state.db.get()?;
    let project = queries::get_project_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

    if query.details {
        let details = queries::load_project_details(&conn, project)?;
        Ok(Json(details).into_response())
    } else {
        Ok(Json(project).into_response())
    }
}

/// Partial update of name/description/leader. Gated to the project's
/// creator, its leader, or an admin.
pub async fn update_project(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(input): Json<UpdateProject>,
) -> Result<Json<Project>> {
    let conn = state.db.get()?;
    let project = queries::get_project_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

    if !ctx.can_edit_project(&project) {
        return Err(AppError::Forbidden(
            "Only the creator, the chef de projet, or an admin may edit a project".into(),
        ));
    }

    // A leader change must point at a user actually holding the CHEF role.
    if let Some(Some(chef_id)) = &input.chef_id {
        let chef = queries::get_user_by_id(&conn, chef_id)?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        if chef.role != Role::Chef {
            return Err(AppError::Validation(
                "Selected user is not a chef de projet".into(),
            ));
        }
    }

    queries::update_project(&conn, &id, &input)?;

    let project = queries::get_project_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;
    Ok(Json(project))
}

/// Admin-only leader assignment; the target must hold the CHEF role.
pub async fn assign_chef(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(input): Json<AssignChef>,
) -> Result<Json<Project>> {
    ctx.require_admin()?;

    let conn = state.db.get()?;
    let chef = queries::get_user_by_id(&conn, &input.chef_id)?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    if chef.role != Role::Chef {
        return Err(AppError::Validation(
            "Selected user is not a chef de projet".into(),
        ));
    }

    if !queries::set_project_chef(&conn, &input.project_id, &chef.id)? {
        return Err(AppError::NotFound("Project not found".into()));
    }

    let project = queries::get_project_by_id(&conn, &input.project_id)?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;
    Ok(Json(project))
}

/// Admin-only. Removes resources, costs, and memberships, then the project
/// row, in a single transaction; tasks and messages cascade.
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    ctx.require_admin()?;

    let mut conn = state.db.get()?;
    if !queries::delete_project_cascade(&mut conn, &id)? {
        return Err(AppError::NotFound("Project not found".into()));
    }
    tracing::info!(project_id = %id, "project deleted");
    Ok(Json(serde_json::json!({ "deleted": true })))
}

pub async fn list_project_users(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<UserSummary>>> {
    let conn = state.db.get()?;
    if queries::get_project_by_id(&conn, &id)?.is_none() {
        return Err(AppError::NotFound("Project not found".into()));
    }
    Ok(Json(queries::list_project_members(&conn, &id)?))
}
