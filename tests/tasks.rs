//! Task creation authorization and the status state machine.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use chantier::db::queries;
use chantier::models::{Role, TaskStatus};

mod common;
use common::*;

struct Fixture {
    state: chantier::db::AppState,
    project: chantier::models::Project,
}

/// Admin-created project with a chef (leader) and one plain member.
fn fixture() -> Fixture {
    let state = test_state();
    let project;
    {
        let mut conn = state.db.get().unwrap();
        let admin = seed_user(&conn, "admin@example.com", "Admin", Role::Admin);
        project = seed_project(&conn, "Alpha", &admin);
        let chef = seed_user(&conn, "chef@example.com", "Chef", Role::User);
        queries::redeem_invite(&mut conn, &chef, &project.invite_code_chef).unwrap();
        let member = seed_user(&conn, "member@example.com", "Member", Role::User);
        queries::redeem_invite(&mut conn, &member, &project.invite_code_membre).unwrap();
    }
    Fixture { state, project }
}

#[tokio::test]
async fn non_leader_cannot_create_tasks() {
    let fx = fixture();
    let app = test_app(fx.state);

    let response = app
        .oneshot(json_request(
            "POST",
            "/tasks",
            Some("member@example.com"),
            json!({
                "name": "Pour the foundation",
                "description": "Section B",
                "project_id": fx.project.id,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn leader_creates_task_defaulting_assignee_to_creator() {
    let fx = fixture();
    let app = test_app(fx.state.clone());

    let response = app
        .oneshot(json_request(
            "POST",
            "/tasks",
            Some("chef@example.com"),
            json!({
                "name": "Pour the foundation",
                "description": "Section B",
                "project_id": fx.project.id,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "To Do");

    let conn = fx.state.db.get().unwrap();
    let chef = queries::get_user_by_email(&conn, "chef@example.com")
        .unwrap()
        .unwrap();
    assert_eq!(body["user_id"], chef.id.as_str());
    assert_eq!(body["created_by_id"], chef.id.as_str());
}

#[tokio::test]
async fn admin_can_create_tasks_with_member_assignee() {
    let fx = fixture();
    let app = test_app(fx.state.clone());

    let response = app
        .oneshot(json_request(
            "POST",
            "/tasks",
            Some("admin@example.com"),
            json!({
                "name": "Order materials",
                "description": "Cement and rebar",
                "project_id": fx.project.id,
                "assign_to": "member@example.com",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let conn = fx.state.db.get().unwrap();
    let member = queries::get_user_by_email(&conn, "member@example.com")
        .unwrap()
        .unwrap();
    assert_eq!(body["user_id"], member.id.as_str());
}

#[tokio::test]
async fn assignee_outside_the_project_is_forbidden() {
    let fx = fixture();
    {
        let conn = fx.state.db.get().unwrap();
        seed_user(&conn, "outsider@example.com", "Outsider", Role::User);
    }
    let app = test_app(fx.state);

    let response = app
        .oneshot(json_request(
            "POST",
            "/tasks",
            Some("chef@example.com"),
            json!({
                "name": "Order materials",
                "description": "Cement and rebar",
                "project_id": fx.project.id,
                "assign_to": "outsider@example.com",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn completing_a_task_requires_a_solution() {
    let fx = fixture();
    let task_id;
    {
        let conn = fx.state.db.get().unwrap();
        let chef = queries::get_user_by_email(&conn, "chef@example.com")
            .unwrap()
            .unwrap();
        let task = queries::create_task(
            &conn,
            &chantier::models::CreateTask {
                name: "Inspect site".into(),
                description: "Weekly inspection".into(),
                due_date: None,
                project_id: fx.project.id.clone(),
                assign_to: None,
            },
            &chef.id,
            &chef.id,
        )
        .unwrap();
        task_id = task.id;
    }
    let app = test_app(fx.state.clone());

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/tasks/{task_id}/status"),
            Some("chef@example.com"),
            json!({ "status": "Done" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/tasks/{task_id}/status"),
            Some("chef@example.com"),
            json!({ "status": "Done", "solution_description": "Replaced the fixture" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let conn = fx.state.db.get().unwrap();
    let task = queries::get_task_by_id(&conn, &task_id).unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::Done);
    assert_eq!(task.solution_description.as_deref(), Some("Replaced the fixture"));
}

#[tokio::test]
async fn done_is_terminal() {
    let fx = fixture();
    let task_id;
    {
        let conn = fx.state.db.get().unwrap();
        let chef = queries::get_user_by_email(&conn, "chef@example.com")
            .unwrap()
            .unwrap();
        let task = queries::create_task(
            &conn,
            &chantier::models::CreateTask {
                name: "Inspect site".into(),
                description: "Weekly inspection".into(),
                due_date: None,
                project_id: fx.project.id.clone(),
                assign_to: None,
            },
            &chef.id,
            &chef.id,
        )
        .unwrap();
        queries::update_task_status(&conn, &task.id, TaskStatus::Done, Some("All clear")).unwrap();
        task_id = task.id;
    }
    let app = test_app(fx.state);

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/tasks/{task_id}/status"),
            Some("chef@example.com"),
            json!({ "status": "In Progress" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn only_leader_or_admin_may_delete_tasks() {
    let fx = fixture();
    let task_id;
    {
        let conn = fx.state.db.get().unwrap();
        let chef = queries::get_user_by_email(&conn, "chef@example.com")
            .unwrap()
            .unwrap();
        let task = queries::create_task(
            &conn,
            &chantier::models::CreateTask {
                name: "Inspect site".into(),
                description: "Weekly inspection".into(),
                due_date: None,
                project_id: fx.project.id.clone(),
                assign_to: None,
            },
            &chef.id,
            &chef.id,
        )
        .unwrap();
        task_id = task.id;
    }
    let app = test_app(fx.state.clone());

    let response = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/tasks/{task_id}"),
            Some("member@example.com"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(request(
            "DELETE",
            &format!("/tasks/{task_id}"),
            Some("chef@example.com"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let conn = fx.state.db.get().unwrap();
    assert!(queries::get_task_by_id(&conn, &task_id).unwrap().is_none());
}
