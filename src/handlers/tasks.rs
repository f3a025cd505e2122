use axum::extract::{Extension, State};

use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path};
use crate::middleware::AuthContext;
use crate::models::{
    CreateTask, Task, TaskResourceWithResource, TaskStatus, TaskWithDetails, UpdateTaskStatus,
};

/// Create a task. Only the project's chef de projet or an admin may create;
/// an explicit assignee must be a current project member and defaults to the
/// creator when omitted.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(input): Json<CreateTask>,
) -> Result<Json<Task>> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("Task name is required".into()));
    }

    let conn = state.db.get()?;
    let project = queries::get_project_by_id(&conn, &input.project_id)?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

    if !ctx.can_manage_tasks(&project) {
        return Err(AppError::Forbidden(
            "Only the chef de projet or an admin may create tasks".into(),
        ));
    }

    let assignee_id = match &input.assign_to {
        Some(email) => {
            let assignee = queries::get_user_by_email(&conn, email)?
                .ok_or_else(|| AppError::NotFound(format!("No user with email {email}")))?;
            if !queries::is_project_member(&conn, &assignee.id, &project.id)? {
                return Err(AppError::Forbidden(
                    "Assignee is not a member of this project".into(),
                ));
            }
            assignee.id
        }
        None => ctx.user.id.clone(),
    };

    let task = queries::create_task(&conn, &input, &ctx.user.id, &assignee_id)?;
    Ok(Json(task))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskWithDetails>> {
    let conn = state.db.get()?;
    let task = queries::get_task_with_details(&conn, &id)?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    Ok(Json(task))
}

/// Same gate as creation: chef de projet or admin.
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let conn = state.db.get()?;
    let task = queries::get_task_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    let project = queries::get_project_by_id(&conn, &task.project_id)?
        .ok_or_else(|| AppError::Internal("Task references a missing project".into()))?;

    if !ctx.can_manage_tasks(&project) {
        return Err(AppError::Forbidden(
            "Only the chef de projet or an admin may delete tasks".into(),
        ));
    }

    queries::delete_task(&conn, &id)?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Status transition. Done is terminal and requires a solution description.
pub async fn update_task_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateTaskStatus>,
) -> Result<Json<Task>> {
    let conn = state.db.get()?;
    let task = queries::get_task_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    if task.status == TaskStatus::Done {
        return Err(AppError::Conflict("Task is already done".into()));
    }

    let solution = match input.status {
        TaskStatus::Done => {
            let solution = input
                .solution_description
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    AppError::Validation(
                        "A solution description is required to complete a task".into(),
                    )
                })?;
            Some(solution)
        }
        _ => None,
    };

    queries::update_task_status(&conn, &id, input.status, solution)?;

    let task = queries::get_task_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    Ok(Json(task))
}

pub async fn list_task_resources(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<TaskResourceWithResource>>> {
    let conn = state.db.get()?;
    if queries::get_task_by_id(&conn, &id)?.is_none() {
        return Err(AppError::NotFound("Task not found".into()));
    }
    Ok(Json(queries::list_task_resources(&conn, &id)?))
}
