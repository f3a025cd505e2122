//! Identity comes from the auth proxy in front of this service: it verifies
//! the session and injects the caller's email as `x-user-email`. Identity is
//! never read from request bodies.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::models::{Project, Role, User};

pub const IDENTITY_HEADER: &str = "x-user-email";

/// Verified caller identity, before any user row is required to exist.
/// Used by the sign-in sync endpoint.
#[derive(Clone)]
pub struct Identity {
    pub email: String,
}

/// Fully resolved caller: identity plus the stored user row.
#[derive(Clone)]
pub struct AuthContext {
    pub user: User,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.user.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin role required".into()))
        }
    }

    /// Task creation and deletion gate: project leader or admin.
    pub fn can_manage_tasks(&self, project: &Project) -> bool {
        self.is_admin() || project.chef_de_projet_id.as_deref() == Some(self.user.id.as_str())
    }

    /// Project mutation gate: creator, leader, or admin.
    pub fn can_edit_project(&self, project: &Project) -> bool {
        self.is_admin()
            || project.created_by_id == self.user.id
            || project.chef_de_projet_id.as_deref() == Some(self.user.id.as_str())
    }
}

fn extract_identity(headers: &HeaderMap) -> Option<String> {
    headers
        .get(IDENTITY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Attach the verified email without requiring a user row. The sync endpoint
/// runs behind this, everything else behind `user_auth`.
pub async fn identity_auth(
    mut request: Request,
    next: Next,
) -> std::result::Result<Response, StatusCode> {
    let email = extract_identity(request.headers()).ok_or(StatusCode::UNAUTHORIZED)?;
    request.extensions_mut().insert(Identity { email });
    Ok(next.run(request).await)
}

/// Resolve the caller to a stored user and attach the auth context.
pub async fn user_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> std::result::Result<Response, StatusCode> {
    let email = extract_identity(request.headers()).ok_or(StatusCode::UNAUTHORIZED)?;

    let conn = state
        .db
        .get()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let user = queries::get_user_by_email(&conn, &email)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::UNAUTHORIZED)?;
    // Return the connection to the pool before running the handler, which
    // checks out its own connection; holding it here deadlocks a size-1 pool.
    drop(conn);

    request.extensions_mut().insert(AuthContext { user });
    Ok(next.run(request).await)
}
