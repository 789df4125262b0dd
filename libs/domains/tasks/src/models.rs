use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use database::SortDirection;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::entity;
use crate::error::TaskError;

/// Columns a task listing may be ordered by.
pub const SORTABLE_COLUMNS: &[&str] = &[
    "id",
    "title",
    "due_date",
    "status",
    "created_at",
    "updated_at",
];

/// Task status
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "task_status")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskStatus {
    /// Task not started
    #[default]
    #[sea_orm(string_value = "todo")]
    Todo,
    /// Task in progress
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    /// Task completed; never derived to overdue
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Due date elapsed before completion
    #[sea_orm(string_value = "overdue")]
    Overdue,
}

/// Task entity - a unit of work inside exactly one project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Task {
    /// Unique identifier
    pub id: i32,
    /// Owning project
    pub project_id: i32,
    pub title: String,
    pub description: String,
    /// Deadline; a task without one is never overdue
    pub due_date: Option<DateTime<Utc>>,
    /// Status as of the last time the task was read or written
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new task; the project comes from `?project_id=`
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateTask {
    #[validate(length(min = 1, max = 64))]
    #[schema(example = "Write release notes")]
    pub title: String,
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "Summarize every user-facing change")]
    pub description: String,
    /// ISO-8601 date or date-time; naive values are taken as UTC
    #[validate(custom(function = "validate_due_date"))]
    #[schema(example = "2025-01-15T10:00:00Z")]
    pub due_date: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
}

impl CreateTask {
    /// Row to insert under `project_id`.
    pub fn into_active_model(self, project_id: i32) -> Result<entity::ActiveModel, TaskError> {
        let due_date = self.due_date.as_deref().map(due_date_value).transpose()?;

        Ok(entity::ActiveModel {
            id: NotSet,
            project_id: Set(project_id),
            title: Set(self.title),
            description: Set(self.description),
            due_date: Set(due_date.map(Into::into)),
            status: Set(self.status),
            created_at: NotSet,
            updated_at: NotSet,
        })
    }
}

/// DTO for partially updating a task
///
/// Absent fields are left untouched; `"due_date": null` clears the deadline.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateTask {
    #[validate(length(min = 1, max = 64))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(custom(function = "validate_due_date"))]
    #[schema(value_type = Option<String>, example = "2025-01-15T10:00:00Z")]
    pub due_date: Option<Option<String>>,
    pub status: Option<TaskStatus>,
}

impl TryFrom<UpdateTask> for entity::ActiveModel {
    type Error = TaskError;

    fn try_from(input: UpdateTask) -> Result<Self, Self::Error> {
        let due_date = match input.due_date {
            None => NotSet,
            Some(None) => Set(None),
            Some(Some(raw)) => Set(Some(due_date_value(&raw)?.into())),
        };

        Ok(entity::ActiveModel {
            title: input.title.map_or(NotSet, Set),
            description: input.description.map_or(NotSet, Set),
            due_date,
            status: input.status.map_or(NotSet, Set),
            ..Default::default()
        })
    }
}

/// Query parameters for listing the tasks of one project
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TaskListParams {
    /// Project whose tasks are listed
    #[validate(range(min = 1))]
    pub project_id: i32,
    /// Rows to skip (default 0)
    pub skip: Option<i64>,
    /// Page size (default 100, capped at 500)
    pub limit: Option<i64>,
    /// Only tasks with this stored status
    pub status: Option<TaskStatus>,
    /// Inclusive lower bound on `due_date`
    pub due_date_from: Option<String>,
    /// Inclusive upper bound on `due_date`
    pub due_date_to: Option<String>,
    /// One of `id`, `title`, `due_date`, `status`, `created_at`, `updated_at`
    pub order_by: Option<String>,
    /// `asc` (default) or `desc`
    pub order: Option<SortDirection>,
}

/// `?task_id=` selector used by the query-addressed delete route
#[derive(Debug, Clone, Copy, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TaskIdQuery {
    #[validate(range(min = 1))]
    pub task_id: i32,
}

/// Parses an ISO-8601 timestamp.
///
/// RFC 3339 values keep their instant; date-times without an offset and
/// bare dates (midnight) are read as UTC.
pub fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub(crate) fn due_date_value(raw: &str) -> Result<DateTime<Utc>, TaskError> {
    parse_due_date(raw).ok_or_else(|| TaskError::InvalidDueDate(raw.to_string()))
}

fn validate_due_date(raw: &str) -> Result<(), ValidationError> {
    match parse_due_date(raw) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("due_date").with_message("Invalid due date format".into())),
    }
}

/// Keeps an explicit `null` apart from an absent field.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sea_orm::ActiveValue;

    fn create_input() -> CreateTask {
        CreateTask {
            title: "T".to_string(),
            description: "D".to_string(),
            due_date: None,
            status: TaskStatus::Todo,
        }
    }

    #[test]
    fn status_wire_format_is_snake_case() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!("overdue".parse::<TaskStatus>().unwrap(), TaskStatus::Overdue);
        assert_eq!(TaskStatus::Completed.to_string(), "completed");
    }

    #[test]
    fn parses_supported_due_date_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();

        assert_eq!(parse_due_date("2024-01-15T10:00:00Z"), Some(expected));
        assert_eq!(parse_due_date("2024-01-15T12:00:00+02:00"), Some(expected));
        assert_eq!(parse_due_date("2024-01-15T10:00:00"), Some(expected));
        assert_eq!(parse_due_date("2024-01-15 10:00:00"), Some(expected));
        assert_eq!(
            parse_due_date("2024-01-15"),
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn rejects_malformed_due_dates() {
        for raw in ["", "tomorrow", "2024-13-01", "15/01/2024", "2024-01-15T25:00:00"] {
            assert!(parse_due_date(raw).is_none(), "{raw}");
        }
    }

    #[test]
    fn create_defaults_status_to_todo() {
        let input: CreateTask =
            serde_json::from_str(r#"{"title":"T","description":"D"}"#).unwrap();
        assert_eq!(input.status, TaskStatus::Todo);
        assert!(input.due_date.is_none());
    }

    #[test]
    fn create_validates_lengths_and_due_date() {
        assert!(create_input().validate().is_ok());

        let long_title = CreateTask {
            title: "t".repeat(65),
            ..create_input()
        };
        assert!(long_title.validate().is_err());

        let bad_date = CreateTask {
            due_date: Some("next week".to_string()),
            ..create_input()
        };
        let errors = bad_date.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("due_date"));
    }

    #[test]
    fn create_builds_row_for_project() {
        let model = CreateTask {
            due_date: Some("2024-01-15".to_string()),
            ..create_input()
        }
        .into_active_model(7)
        .unwrap();

        assert_eq!(model.project_id, ActiveValue::Set(7));
        assert_eq!(model.id, ActiveValue::NotSet);
        assert!(matches!(model.due_date, ActiveValue::Set(Some(_))));
    }

    #[test]
    fn update_distinguishes_null_from_absent_due_date() {
        let absent: UpdateTask = serde_json::from_str(r#"{"title":"x"}"#).unwrap();
        assert_eq!(absent.due_date, None);

        let cleared: UpdateTask = serde_json::from_str(r#"{"due_date":null}"#).unwrap();
        assert_eq!(cleared.due_date, Some(None));

        let set: UpdateTask = serde_json::from_str(r#"{"due_date":"2024-01-15"}"#).unwrap();
        assert_eq!(set.due_date, Some(Some("2024-01-15".to_string())));
    }

    #[test]
    fn update_sets_only_present_columns() {
        let model = entity::ActiveModel::try_from(UpdateTask {
            status: Some(TaskStatus::Completed),
            due_date: Some(None),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(model.title, ActiveValue::NotSet);
        assert_eq!(model.description, ActiveValue::NotSet);
        assert_eq!(model.status, ActiveValue::Set(TaskStatus::Completed));
        assert_eq!(model.due_date, ActiveValue::Set(None));
    }

    #[test]
    fn update_rejects_malformed_due_date() {
        let update = UpdateTask {
            due_date: Some(Some("soon".to_string())),
            ..Default::default()
        };
        assert!(update.validate().is_err());
        assert!(matches!(
            entity::ActiveModel::try_from(update),
            Err(TaskError::InvalidDueDate(_))
        ));
    }
}
