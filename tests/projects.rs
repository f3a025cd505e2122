//! Project lifecycle: admin-gated creation and deletion, edit permissions,
//! leader assignment, and cascade behavior on delete.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use chantier::db::queries;
use chantier::models::Role;

mod common;
use common::*;

#[tokio::test]
async fn project_creation_is_admin_only() {
    let state = test_state();
    {
        let conn = state.db.get().unwrap();
        seed_user(&conn, "admin@example.com", "Admin", Role::Admin);
        seed_user(&conn, "u@example.com", "U", Role::User);
    }
    let app = test_app(state);

    let denied = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/projects",
            Some("u@example.com"),
            json!({ "name": "Alpha", "description": "First site" }),
        ))
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let created = app
        .oneshot(json_request(
            "POST",
            "/projects",
            Some("admin@example.com"),
            json!({ "name": "Alpha", "description": "First site" }),
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::OK);

    let body = body_json(created).await;
    // Three distinct invite codes are generated at creation.
    let general = body["invite_code"].as_str().unwrap();
    let chef = body["invite_code_chef"].as_str().unwrap();
    let membre = body["invite_code_membre"].as_str().unwrap();
    assert_eq!(general.len(), 12);
    assert_ne!(general, chef);
    assert_ne!(general, membre);
    assert_ne!(chef, membre);
}

#[tokio::test]
async fn deletion_is_admin_only_and_cascades() {
    let state = test_state();
    let project;
    {
        let mut conn = state.db.get().unwrap();
        let admin = seed_user(&conn, "admin@example.com", "Admin", Role::Admin);
        project = seed_project(&conn, "Alpha", &admin);
        let member = seed_user(&conn, "member@example.com", "Member", Role::User);
        seed_member(&mut conn, &member, &project);

        queries::create_resource(
            &conn,
            &chantier::models::CreateResource {
                name: "Crane".into(),
                resource_type: chantier::models::ResourceType::Material,
                cost: 1500.0,
                project_id: Some(project.id.clone()),
            },
        )
        .unwrap();
        queries::create_cost(
            &conn,
            &chantier::models::CreateCost {
                project_id: project.id.clone(),
                budget: 10_000.0,
                spent: 2_500.0,
            },
        )
        .unwrap();
    }
    let app = test_app(state.clone());

    let denied = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/projects/{}", project.id),
            Some("member@example.com"),
        ))
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let deleted = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/projects/{}", project.id),
            Some("admin@example.com"),
        ))
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::OK);

    {
        let conn = state.db.get().unwrap();
        assert!(queries::get_project_by_id(&conn, &project.id)
            .unwrap()
            .is_none());
        assert!(queries::list_resources_for_project(&conn, &project.id)
            .unwrap()
            .is_empty());
        assert!(queries::list_costs_for_project(&conn, &project.id)
            .unwrap()
            .is_empty());
        assert!(queries::list_project_members(&conn, &project.id)
            .unwrap()
            .is_empty());
    }

    // No longer retrievable over HTTP either.
    let gone = app
        .oneshot(request(
            "GET",
            &format!("/projects/{}", project.id),
            Some("admin@example.com"),
        ))
        .await
        .unwrap();
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn edit_is_gated_to_creator_leader_or_admin() {
    let state = test_state();
    let project;
    {
        let mut conn = state.db.get().unwrap();
        let admin = seed_user(&conn, "admin@example.com", "Admin", Role::Admin);
        project = seed_project(&conn, "Alpha", &admin);
        let member = seed_user(&conn, "member@example.com", "Member", Role::User);
        seed_member(&mut conn, &member, &project);
    }
    let app = test_app(state);

    let denied = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/projects/{}", project.id),
            Some("member@example.com"),
            json!({ "name": "Renamed" }),
        ))
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let updated = app
        .oneshot(json_request(
            "PUT",
            &format!("/projects/{}", project.id),
            Some("admin@example.com"),
            json!({ "name": "Renamed" }),
        ))
        .await
        .unwrap();
    assert_eq!(updated.status(), StatusCode::OK);
    let body = body_json(updated).await;
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["description"], project.description);
}

#[tokio::test]
async fn chef_can_edit_their_own_project() {
    let state = test_state();
    let project;
    {
        let mut conn = state.db.get().unwrap();
        let admin = seed_user(&conn, "admin@example.com", "Admin", Role::Admin);
        project = seed_project(&conn, "Alpha", &admin);
        let chef = seed_user(&conn, "chef@example.com", "Chef", Role::User);
        queries::redeem_invite(&mut conn, &chef, &project.invite_code_chef).unwrap();
    }
    let app = test_app(state);

    let updated = app
        .oneshot(json_request(
            "PUT",
            &format!("/projects/{}", project.id),
            Some("chef@example.com"),
            json!({ "description": "Updated by the chef" }),
        ))
        .await
        .unwrap();
    assert_eq!(updated.status(), StatusCode::OK);
}

#[tokio::test]
async fn assign_chef_requires_chef_role_on_target() {
    let state = test_state();
    let (project, plain_id, chef_id);
    {
        let conn = state.db.get().unwrap();
        let admin = seed_user(&conn, "admin@example.com", "Admin", Role::Admin);
        project = seed_project(&conn, "Alpha", &admin);
        plain_id = seed_user(&conn, "u@example.com", "U", Role::User).id;
        chef_id = seed_user(&conn, "chef@example.com", "Chef", Role::Chef).id;
    }
    let app = test_app(state);

    let rejected = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/projects/assign-chef",
            Some("admin@example.com"),
            json!({ "project_id": project.id, "chef_id": plain_id }),
        ))
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);

    let assigned = app
        .oneshot(json_request(
            "POST",
            "/projects/assign-chef",
            Some("admin@example.com"),
            json!({ "project_id": project.id, "chef_id": chef_id }),
        ))
        .await
        .unwrap();
    assert_eq!(assigned.status(), StatusCode::OK);
    let body = body_json(assigned).await;
    assert_eq!(body["chef_de_projet_id"], chef_id.as_str());
}

#[tokio::test]
async fn my_projects_includes_total_cost() {
    let state = test_state();
    let project;
    {
        let conn = state.db.get().unwrap();
        let admin = seed_user(&conn, "admin@example.com", "Admin", Role::Admin);
        project = seed_project(&conn, "Alpha", &admin);
        for spent in [1_000.0, 250.5] {
            queries::create_cost(
                &conn,
                &chantier::models::CreateCost {
                    project_id: project.id.clone(),
                    budget: 5_000.0,
                    spent,
                },
            )
            .unwrap();
        }
    }
    let app = test_app(state);

    let response = app
        .oneshot(request("GET", "/projects/mine", Some("admin@example.com")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body[0]["id"], project.id.as_str());
    assert_eq!(body[0]["total_cost"], 1250.5);
}

#[tokio::test]
async fn requests_without_identity_are_unauthorized() {
    let state = test_state();
    let app = test_app(state);

    let response = app
        .oneshot(request("GET", "/projects", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
