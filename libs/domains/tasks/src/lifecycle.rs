//! Lazily derived task status.
//!
//! Whether a task is overdue is a pure function of its stored status, its
//! due date and the current time. [`refresh_status`] writes the derived
//! value back whenever it differs from the stored one, so reads keep the
//! persisted status fresh without a background job.

use chrono::{DateTime, Utc};
use database::{BaseRepository, Commit, DatabaseResult};
use sea_orm::{
    ActiveEnum, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    QueryFilter, TransactionTrait, UpdateMany,
};

use crate::entity;
use crate::models::TaskStatus;

/// Status a task should have at `now`.
///
/// A task with an elapsed due date becomes overdue unless it is completed.
/// Nothing else changes; in particular overdue is never reverted here.
pub fn derive_status(
    status: TaskStatus,
    due_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> TaskStatus {
    match (status, due_date) {
        (TaskStatus::Completed, _) => TaskStatus::Completed,
        (_, Some(due)) if due < now => TaskStatus::Overdue,
        (current, _) => current,
    }
}

/// Persists the derived status of `task` if it differs from the stored one.
///
/// With [`Commit::Deferred`] the write joins the caller's unit of work.
pub async fn refresh_status<C>(
    conn: &C,
    task: entity::Model,
    now: DateTime<Utc>,
    commit: Commit,
) -> DatabaseResult<entity::Model>
where
    C: ConnectionTrait + TransactionTrait,
{
    let derived = derive_status(
        task.status,
        task.due_date.map(|due| due.with_timezone(&Utc)),
        now,
    );
    if derived == task.status {
        return Ok(task);
    }

    let task_id = task.id;
    let previous = task.status;
    let changes = entity::ActiveModel {
        status: Set(derived),
        ..Default::default()
    };

    let updated = BaseRepository::<entity::Entity>::new()
        .update(conn, task, changes, commit)
        .await?;

    tracing::info!(task_id, from = %previous, to = %derived, "Task status derived from due date");
    Ok(updated)
}

/// Marks every open task in `scope` whose due date has elapsed as overdue.
///
/// Same rule as [`derive_status`], applied in one statement so that a
/// status filter evaluated afterwards sees the derived values.
pub async fn refresh_overdue<C>(
    conn: &C,
    scope: Condition,
    now: DateTime<Utc>,
) -> DatabaseResult<u64>
where
    C: ConnectionTrait,
{
    let result = overdue_update(scope, now).exec(conn).await?;
    if result.rows_affected > 0 {
        tracing::info!(rows = result.rows_affected, "Marked elapsed tasks overdue");
    }
    Ok(result.rows_affected)
}

fn overdue_update(scope: Condition, now: DateTime<Utc>) -> UpdateMany<entity::Entity> {
    let open = Condition::any()
        .add(entity::Column::Status.eq(TaskStatus::Todo))
        .add(entity::Column::Status.eq(TaskStatus::InProgress));

    entity::Entity::update_many()
        .col_expr(entity::Column::Status, TaskStatus::Overdue.as_enum())
        .filter(scope)
        .filter(open)
        .filter(entity::Column::DueDate.lt(now))
}
