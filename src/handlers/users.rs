use axum::extract::{Extension, State};
use serde::Serialize;

use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path};
use crate::middleware::AuthContext;
use crate::models::{Project, Role, UpdateUserRole, UserStats, UserSummary};

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserSummary>>> {
    let conn = state.db.get()?;
    let users = queries::list_users(&conn)?;
    Ok(Json(users.into_iter().map(UserSummary::from).collect()))
}

#[derive(Serialize)]
pub struct RoleResponse {
    pub role: Role,
}

/// Role lookup by stable id or email. Absent users are 404; callers treat
/// the default role as USER.
pub async fn get_user_role(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RoleResponse>> {
    let conn = state.db.get()?;
    let user = queries::get_user_by_id_or_email(&conn, &id)?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(Json(RoleResponse { role: user.role }))
}

pub async fn update_user_role(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(input): Json<UpdateUserRole>,
) -> Result<Json<UserSummary>> {
    ctx.require_admin()?;

    let conn = state.db.get()?;
    if !queries::update_user_role(&conn, &id, input.role)? {
        return Err(AppError::NotFound("User not found".into()));
    }

    let user = queries::get_user_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(Json(UserSummary::from(user)))
}

#[derive(Serialize)]
pub struct UserProjectsResponse {
    pub projects: Vec<Project>,
}

/// Projects the user belongs to or leads, de-duplicated.
pub async fn get_user_projects(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserProjectsResponse>> {
    let conn = state.db.get()?;
    let user = queries::get_user_by_id_or_email(&conn, &id)?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    let projects = queries::list_projects_for_user(&conn, &user.id)?;
    Ok(Json(UserProjectsResponse { projects }))
}

pub async fn get_user_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserStats>> {
    let conn = state.db.get()?;
    let user = queries::get_user_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    let stats = queries::get_user_stats(&conn, &user.id)?;
    Ok(Json(stats))
}
