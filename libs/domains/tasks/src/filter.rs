//! Translation of list query parameters into a composable predicate.

use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, Condition};

use crate::entity;
use crate::error::TaskResult;
use crate::models::{TaskStatus, due_date_value};

/// Optional constraints on a task listing, combined with AND.
///
/// Both due-date bounds are inclusive. A task without a due date never
/// satisfies a bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub due_date_from: Option<DateTime<Utc>>,
    pub due_date_to: Option<DateTime<Utc>>,
}

impl TaskFilter {
    /// Parses the raw query values; a malformed date fails before any query runs.
    pub fn from_params(
        status: Option<TaskStatus>,
        due_date_from: Option<&str>,
        due_date_to: Option<&str>,
    ) -> TaskResult<Self> {
        Ok(Self {
            status,
            due_date_from: due_date_from.map(due_date_value).transpose()?,
            due_date_to: due_date_to.map(due_date_value).transpose()?,
        })
    }

    pub fn condition(&self) -> Condition {
        let mut condition = Condition::all();

        if let Some(status) = self.status {
            condition = condition.add(entity::Column::Status.eq(status));
        }
        if let Some(from) = self.due_date_from {
            condition = condition.add(entity::Column::DueDate.gte(from));
        }
        if let Some(to) = self.due_date_to {
            condition = condition.add(entity::Column::DueDate.lte(to));
        }

        condition
    }
}
