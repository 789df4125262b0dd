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
        BadRequestFilterResponse, BadRequestIdResponse, BadRequestValidationResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
    paginated,
};
use domain_projects::ProjectIdQuery;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::TaskResult;
use crate::models::{CreateTask, Task, TaskIdQuery, TaskListParams, TaskStatus, UpdateTask};
use crate::repository::TaskRepository;
use crate::service::TaskService;

pub const TAG: &str = "tasks";

/// OpenAPI documentation for Tasks API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_tasks,
        create_task,
        get_task,
        update_task,
        delete_task,
        delete_task_by_query,
    ),
    components(
        schemas(Task, TaskStatus, CreateTask, UpdateTask, DetailResponse, ErrorResponse),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            BadRequestFilterResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Task management endpoints; reads re-derive overdue status")
    )
)]
pub struct ApiDoc;

/// Task routes, relative to where the caller nests them
pub fn router<R: TaskRepository + 'static>(service: TaskService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/",
            get(list_tasks)
                .post(create_task)
                .delete(delete_task_by_query),
        )
        .route(
            "/{id}",
            get(get_task).patch(update_task).delete(delete_task),
        )
        .with_state(shared_service)
}

/// List a project's tasks
///
/// Filters combine with AND; both due-date bounds are inclusive. The
/// `X-Total-Count` header carries the number of matching tasks regardless of the window.
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(TaskListParams),
    responses(
        (status = 200, description = "List of tasks", body = Vec<Task>,
            headers(("x-total-count" = u64, description = "Number of tasks matching the filters"))),
        (status = 400, response = BadRequestFilterResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_tasks<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    ValidatedQuery(params): ValidatedQuery<TaskListParams>,
) -> TaskResult<Response> {
    let (tasks, total) = service.list_tasks(params).await?;
    Ok(paginated(tasks, total))
}

/// Create a task in the project selected by `?project_id=`
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    params(ProjectIdQuery),
    request_body = CreateTask,
    responses(
        (status = 201, description = "Task created successfully", body = Task),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    ValidatedQuery(query): ValidatedQuery<ProjectIdQuery>,
    ValidatedJson(input): ValidatedJson<CreateTask>,
) -> TaskResult<impl IntoResponse> {
    let task = service.create_task(query.project_id, input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Get a task by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task found, status freshly derived", body = Task),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    IdPath(id): IdPath,
) -> TaskResult<Json<Task>> {
    let task = service.get_task(id).await?;
    Ok(Json(task))
}

/// Partially update a task
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Task ID")
    ),
    request_body = UpdateTask,
    responses(
        (status = 200, description = "Task updated, status freshly derived", body = Task),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateTask>,
) -> TaskResult<Json<Task>> {
    let task = service.update_task(id, input).await?;
    Ok(Json(task))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task deleted", body = DetailResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    IdPath(id): IdPath,
) -> TaskResult<DetailResponse> {
    service.delete_task(id).await?;
    Ok(DetailResponse::new("Task deleted"))
}

/// Delete the task selected by `?task_id=`
#[utoipa::path(
    delete,
    path = "",
    tag = TAG,
    params(TaskIdQuery),
    responses(
        (status = 200, description = "Task deleted", body = DetailResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_task_by_query<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    ValidatedQuery(query): ValidatedQuery<TaskIdQuery>,
) -> TaskResult<DetailResponse> {
    service.delete_task(query.task_id).await?;
    Ok(DetailResponse::new("Task deleted"))
}
