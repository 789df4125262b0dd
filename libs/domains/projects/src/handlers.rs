use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_helpers::{
    DetailResponse, ErrorResponse, IdPath, ValidatedJson, ValidatedQuery,
    errors::responses::{
        BadRequestIdResponse, BadRequestPaginationResponse, BadRequestValidationResponse,
        ConflictResponse, InternalServerErrorResponse, NotFoundResponse,
    },
    paginated,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProjectResult;
use crate::models::{CreateProject, ListParams, Project, ProjectIdQuery, UpdateProject};
use crate::repository::ProjectRepository;
use crate::service::ProjectService;

pub const TAG: &str = "projects";

/// OpenAPI documentation for Projects API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_projects,
        create_project,
        get_project,
        update_project,
        update_project_by_query,
        delete_project,
        delete_project_by_query,
    ),
    components(
        schemas(Project, CreateProject, UpdateProject, DetailResponse, ErrorResponse),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            BadRequestPaginationResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Project management endpoints")
    )
)]
pub struct ApiDoc;

/// Project routes, relative to where the caller nests them
pub fn router<R: ProjectRepository + 'static>(service: ProjectService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/",
            get(list_projects)
                .post(create_project)
                .patch(update_project_by_query)
                .delete(delete_project_by_query),
        )
        .route(
            "/{id}",
            get(get_project)
                .patch(update_project)
                .delete(delete_project),
        )
        .with_state(shared_service)
}

/// List projects
///
/// The `X-Total-Count` header carries the number of projects regardless of the window.
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(ListParams),
    responses(
        (status = 200, description = "List of projects", body = Vec<Project>,
            headers(("x-total-count" = u64, description = "Total number of projects"))),
        (status = 400, response = BadRequestPaginationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_projects<R: ProjectRepository>(
    State(service): State<Arc<ProjectService<R>>>,
    ValidatedQuery(params): ValidatedQuery<ListParams>,
) -> ProjectResult<Response> {
    let (projects, total) = service.list_projects(params).await?;
    Ok(paginated(projects, total))
}

/// Create a new project
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateProject,
    responses(
        (status = 201, description = "Project created successfully", body = Project),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_project<R: ProjectRepository>(
    State(service): State<Arc<ProjectService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateProject>,
) -> ProjectResult<impl IntoResponse> {
    let project = service.create_project(input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// Get a project by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project found", body = Project),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_project<R: ProjectRepository>(
    State(service): State<Arc<ProjectService<R>>>,
    IdPath(id): IdPath,
) -> ProjectResult<Json<Project>> {
    let project = service.get_project(id).await?;
    Ok(Json(project))
}

/// Partially update a project
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Project ID")
    ),
    request_body = UpdateProject,
    responses(
        (status = 200, description = "Project updated successfully", body = Project),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_project<R: ProjectRepository>(
    State(service): State<Arc<ProjectService<R>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateProject>,
) -> ProjectResult<Json<Project>> {
    let project = service.update_project(id, input).await?;
    Ok(Json(project))
}

/// Partially update the project selected by `?project_id=`
#[utoipa::path(
    patch,
    path = "",
    tag = TAG,
    params(ProjectIdQuery),
    request_body = UpdateProject,
    responses(
        (status = 200, description = "Project updated successfully", body = Project),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_project_by_query<R: ProjectRepository>(
    State(service): State<Arc<ProjectService<R>>>,
    ValidatedQuery(query): ValidatedQuery<ProjectIdQuery>,
    ValidatedJson(input): ValidatedJson<UpdateProject>,
) -> ProjectResult<Json<Project>> {
    let project = service.update_project(query.project_id, input).await?;
    Ok(Json(project))
}

/// Delete a project and its tasks
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project deleted", body = DetailResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_project<R: ProjectRepository>(
    State(service): State<Arc<ProjectService<R>>>,
    IdPath(id): IdPath,
) -> ProjectResult<DetailResponse> {
    service.delete_project(id).await?;
    Ok(DetailResponse::new("Project deleted"))
}

/// Delete the project selected by `?project_id=` and its tasks
#[utoipa::path(
    delete,
    path = "",
    tag = TAG,
    params(ProjectIdQuery),
    responses(
        (status = 200, description = "Project deleted", body = DetailResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_project_by_query<R: ProjectRepository>(
    State(service): State<Arc<ProjectService<R>>>,
    ValidatedQuery(query): ValidatedQuery<ProjectIdQuery>,
) -> ProjectResult<DetailResponse> {
    service.delete_project(query.project_id).await?;
    Ok(DetailResponse::new("Project deleted"))
}
