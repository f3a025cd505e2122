mod auth;
mod costs;
mod invites;
mod messages;
mod projects;
mod resources;
mod tasks;
mod users;

pub use auth::*;
pub use costs::*;
pub use invites::*;
pub use messages::*;
pub use projects::*;
pub use resources::*;
pub use tasks::*;
pub use users::*;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::db::AppState;
use crate::middleware::{identity_auth, user_auth};

pub fn router(state: AppState) -> Router<AppState> {
    // First-sign-in sync only needs a verified identity, not a user row.
    let sync_routes = Router::new()
        .route("/auth/sync", post(sync_user))
        .layer(middleware::from_fn(identity_auth));

    let api_routes = Router::new()
        // Users & roles
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user_role))
        .route("/users/{id}/role", put(update_user_role))
        .route("/users/{id}/projects", get(get_user_projects))
        .route("/users/{id}/stats", get(get_user_stats))
        // Projects
        .route("/projects", get(list_projects))
        .route("/projects", post(create_project))
        .route("/projects/mine", get(my_projects))
        .route("/projects/joined", get(joined_projects))
        .route("/projects/join", post(join_project))
        .route("/projects/assign-chef", post(assign_chef))
        .route("/projects/{id}", get(get_project))
        .route("/projects/{id}", put(update_project))
        .route("/projects/{id}", delete(delete_project))
        .route("/projects/{id}/users", get(list_project_users))
        // Tasks
        .route("/tasks", post(create_task))
        .route("/tasks/{id}", get(get_task))
        .route("/tasks/{id}", delete(delete_task))
        .route("/tasks/{id}/status", put(update_task_status))
        .route("/tasks/{id}/resources", get(list_task_resources))
        // Resources
        .route("/resources", get(list_resources))
        .route("/resources", post(create_resource))
        .route("/resources/assign", post(assign_resource))
        .route("/resources/assign/{id}", delete(unassign_resource))
        .route("/resources/{id}", get(get_resource))
        .route("/resources/{id}", put(update_resource))
        .route("/resources/{id}", delete(delete_resource))
        // Costs
        .route("/costs", get(list_costs))
        .route("/costs", post(create_cost))
        .route("/costs/{id}", get(get_cost))
        .route("/costs/{id}", put(update_cost))
        .route("/costs/{id}", delete(delete_cost))
        // Messaging
        .route("/messages", post(send_message))
        .route("/messages/sent", get(sent_messages))
        .route("/messages/received", get(received_messages))
        .route("/messages/unread", get(unread_count))
        .route("/messages/{id}/read", put(mark_read))
        .layer(middleware::from_fn_with_state(state.clone(), user_auth));

    sync_routes.merge(api_routes)
}
