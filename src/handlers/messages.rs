use axum::extract::{Extension, Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path};
use crate::middleware::AuthContext;
use crate::models::{BroadcastResult, Message, MessageWithUser, SendMessage, UnreadCount};

/// Send a message within a project. Sender is always the caller. Direct
/// sends require both parties to be project members; with `broadcast` the
/// message fans out to every other member in one transaction.
pub async fn send_message(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(input): Json<SendMessage>,
) -> Result<axum::response::Response> {
    if input.content.trim().is_empty() {
        return Err(AppError::Validation("Message content is required".into()));
    }

    let mut conn = state.db.get()?;
    if queries::get_project_by_id(&conn, &input.project_id)?.is_none() {
        return Err(AppError::NotFound("Project not found".into()));
    }

    if !queries::is_project_member(&conn, &ctx.user.id, &input.project_id)? {
        return Err(AppError::Forbidden(
            "Sender is not a member of this project".into(),
        ));
    }

    if input.broadcast {
        let sent = queries::broadcast_message(
            &mut conn,
            &ctx.user.id,
            &input.project_id,
            &input.content,
        )?;
        return Ok(Json(BroadcastResult { sent }).into_response());
    }

    let receiver_id = input
        .receiver_id
        .as_deref()
        .ok_or_else(|| AppError::Validation("receiver_id is required".into()))?;

    if !queries::is_project_member(&conn, receiver_id, &input.project_id)? {
        return Err(AppError::Forbidden(
            "Receiver is not a member of this project".into(),
        ));
    }

    let message = queries::create_message(
        &conn,
        &ctx.user.id,
        receiver_id,
        &input.project_id,
        &input.content,
    )?;
    Ok(Json(message).into_response())
}

#[derive(Deserialize)]
pub struct MessageQuery {
    pub project_id: String,
}

pub async fn sent_messages(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(query): Query<MessageQuery>,
) -> Result<Json<Vec<MessageWithUser>>> {
    let conn = state.db.get()?;
    Ok(Json(queries::list_sent_messages(
        &conn,
        &ctx.user.id,
        &query.project_id,
    )?))
}

pub async fn received_messages(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(query): Query<MessageQuery>,
) -> Result<Json<Vec<MessageWithUser>>> {
    let conn = state.db.get()?;
    Ok(Json(queries::list_received_messages(
        &conn,
        &ctx.user.id,
        &query.project_id,
    )?))
}

#[derive(Deserialize)]
pub struct UnreadQuery {
    pub project_id: Option<String>,
}

/// Unread-count poll target for the notification badge.
pub async fn unread_count(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(query): Query<UnreadQuery>,
) -> Result<Json<UnreadCount>> {
    let conn = state.db.get()?;
    let count =
        queries::count_unread_messages(&conn, &ctx.user.id, query.project_id.as_deref())?;
    Ok(Json(UnreadCount { count }))
}

/// Mark a message read. One-way, and only the receiver may do it.
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<Message>> {
    let conn = state.db.get()?;
    let message = queries::get_message_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound("Message not found".into()))?;

    if message.receiver_id != ctx.user.id {
        return Err(AppError::Forbidden(
            "Only the receiver may mark a message as read".into(),
        ));
    }

    queries::mark_message_read(&conn, &id)?;
    Ok(Json(Message {
        read: true,
        ..message
    }))
}
