use axum::extract::{Extension, State};
use serde::Serialize;

use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::extractors::Json;
use crate::middleware::AuthContext;
use crate::models::{JoinProject, Project, Role};

#[derive(Debug, Serialize)]
pub struct JoinResponse {
    pub project: Project,
    /// Role the code granted, when it was a role-bearing code.
    pub assigned_role: Option<Role>,
}

/// Redeem an invite code for the caller. The chef code makes the caller the
/// project's chef de projet; the membre code grants the MEMBRE role; the
/// general code joins without touching the role. Joining twice is a 409.
pub async fn join_project(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(input): Json<JoinProject>,
) -> Result<Json<JoinResponse>> {
    let code = input.code.trim();
    if code.is_empty() {
        return Err(AppError::Validation("Invite code is required".into()));
    }

    let mut conn = state.db.get()?;
    let redemption = queries::redeem_invite(&mut conn, &ctx.user, code)?;

    tracing::info!(
        project_id = %redemption.project.id,
        user_id = %ctx.user.id,
        role = ?redemption.assigned_role,
        "invite redeemed"
    );

    Ok(Json(JoinResponse {
        project: redemption.project,
        assigned_role: redemption.assigned_role,
    }))
}
