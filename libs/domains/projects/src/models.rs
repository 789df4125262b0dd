use chrono::{DateTime, Utc};
use database::SortDirection;
use sea_orm::ActiveValue::{NotSet, Set};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::entity;

/// Columns a project listing may be ordered by.
pub const SORTABLE_COLUMNS: &[&str] = &["id", "name", "created_at", "updated_at"];

/// Project entity - top-level container owning zero or more tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Project {
    /// Unique identifier
    pub id: i32,
    /// Project name, 1 to 64 characters
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new project
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 64))]
    #[schema(example = "Website relaunch")]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "Everything needed to ship the new site")]
    pub description: String,
}

impl From<CreateProject> for entity::ActiveModel {
    fn from(input: CreateProject) -> Self {
        entity::ActiveModel {
            id: NotSet,
            name: Set(input.name),
            description: Set(input.description),
            created_at: NotSet,
            updated_at: NotSet,
        }
    }
}

/// DTO for partially updating a project; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 64))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub description: Option<String>,
}

impl From<UpdateProject> for entity::ActiveModel {
    fn from(input: UpdateProject) -> Self {
        entity::ActiveModel {
            name: input.name.map_or(NotSet, Set),
            description: input.description.map_or(NotSet, Set),
            ..Default::default()
        }
    }
}

/// Query parameters for listing projects
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Rows to skip (default 0)
    pub skip: Option<i64>,
    /// Page size (default 100, capped at 500)
    pub limit: Option<i64>,
    /// One of `id`, `name`, `created_at`, `updated_at`
    pub order_by: Option<String>,
    /// `asc` (default) or `desc`
    pub order: Option<SortDirection>,
}

/// `?project_id=` selector used by the query-addressed update and delete routes
#[derive(Debug, Clone, Copy, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProjectIdQuery {
    #[validate(range(min = 1))]
    pub project_id: i32,
}
