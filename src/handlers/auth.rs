use axum::extract::{Extension, State};

use crate::db::{AppState, queries};
use crate::error::Result;
use crate::extractors::Json;
use crate::middleware::Identity;
use crate::models::{SyncUser, User};

/// Create-on-first-sign-in. The auth proxy has already verified the email;
/// the body only carries the display name. Idempotent.
pub async fn sync_user(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(input): Json<SyncUser>,
) -> Result<Json<User>> {
    let conn = state.db.get()?;

    if let Some(existing) = queries::get_user_by_email(&conn, &identity.email)? {
        return Ok(Json(existing));
    }

    let user = queries::create_user(&conn, &identity.email, &input.name)?;
    tracing::info!(email = %user.email, "created user on first sign-in");
    Ok(Json(user))
}
