use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Planner API",
        version = "0.1.0",
        description = "Projects and their tasks, with overdue status derived from due dates"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = crate::api::PROJECTS_PATH, api = domain_projects::ApiDoc),
        (path = crate::api::TASKS_PATH, api = domain_tasks::ApiDoc)
    )
)]
pub struct ApiDoc;
