use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/projects", get(handlers::projects_page))
        .route("/projects/create", post(handlers::create_project))
        .route("/project/:id", get(handlers::project_page))
        .route("/project/:id/links/:owner_id", get(handlers::owner_links_page))
        .route("/project/:id/links/create", post(handlers::create_link))
        .route("/project/:id/members/add", post(handlers::add_member))
        .route("/members", get(handlers::members_page))
        .route("/members/create", post(handlers::create_member))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/go/:id", get(handlers::go))
        .with_state(state)
}
