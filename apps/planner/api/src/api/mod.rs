use axum::Router;
use domain_projects::{PgProjectRepository, ProjectService};
use domain_tasks::{PgTaskRepository, TaskService};

pub mod health;

pub const PROJECTS_PATH: &str = "/project";
pub const TASKS_PATH: &str = "/task";

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
pub fn routes(state: &crate::state::AppState) -> Router {
    let limits = state.config.pagination;

    let projects = ProjectService::new(PgProjectRepository::new(state.db.clone()))
        .with_page_limits(limits);
    let tasks =
        TaskService::new(PgTaskRepository::new(state.db.clone())).with_page_limits(limits);

    Router::new()
        .nest(PROJECTS_PATH, domain_projects::handlers::router(projects))
        .nest(TASKS_PATH, domain_tasks::handlers::router(tasks))
}

/// Router with the /ready endpoint, which pings the database.
///
/// Has its state applied, so it merges into the stateless app router.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
