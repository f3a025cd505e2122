use serde::{Deserialize, Serialize};

use super::user::UserSummary;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub project_id: String,
    pub content: String,
    pub read: bool,
    pub created_at: i64,
}

/// Message with the counterpart user resolved (receiver for the sent view,
/// sender for the received view).
#[derive(Debug, Serialize)]
pub struct MessageWithUser {
    #[serde(flatten)]
    pub message: Message,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<UserSummary>,
}

#[derive(Debug, Deserialize)]
pub struct SendMessage {
    /// Required unless `broadcast` is set.
    pub receiver_id: Option<String>,
    pub project_id: String,
    pub content: String,
    #[serde(default)]
    pub broadcast: bool,
}

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct BroadcastResult {
    /// Number of members the message was fanned out to.
    pub sent: i64,
}
