//! Shared helpers for integration tests: an in-memory app state, seeding
//! utilities, and request/response plumbing for driving the router with
//! `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use chantier::db::{self, AppState, queries};
use chantier::models::{Project, Role, User};

/// Single-connection in-memory pool so every request sees the same database.
pub fn test_state() -> AppState {
    let manager = SqliteConnectionManager::memory()
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
    let pool = r2d2::Pool::builder().max_size(1).build(manager).unwrap();
    db::init_schema(&pool.get().unwrap()).unwrap();
    AppState { db: pool }
}

pub fn test_app(state: AppState) -> Router {
    chantier::app(state)
}

pub fn seed_user(conn: &Connection, email: &str, name: &str, role: Role) -> User {
    let user = queries::create_user(conn, email, name).unwrap();
    if role != Role::User {
        queries::update_user_role(conn, &user.id, role).unwrap();
    }
    queries::get_user_by_id(conn, &user.id).unwrap().unwrap()
}

pub fn seed_project(conn: &Connection, name: &str, creator: &User) -> Project {
    queries::create_project(
        conn,
        &chantier::models::CreateProject {
            name: name.to_string(),
            description: format!("{name} description"),
        },
        &creator.id,
    )
    .unwrap()
}

/// Join via the general code so the user's role is untouched.
pub fn seed_member(conn: &mut Connection, user: &User, project: &Project) {
    queries::redeem_invite(conn, user, &project.invite_code).unwrap();
}

pub fn request(method: &str, uri: &str, email: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(email) = email {
        builder = builder.header("x-user-email", email);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn json_request(
    method: &str,
    uri: &str,
    email: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(email) = email {
        builder = builder.header("x-user-email", email);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
