//! Generic CRUD operations shared by every entity.
//!
//! [`BaseRepository`] holds no connection. Each method receives the
//! connection or transaction it runs on, so callers decide the scope of a
//! unit of work and can compose several writes under one commit.

use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityName,
    EntityTrait, IntoActiveModel, Iterable, ModelTrait, PaginatorTrait, PrimaryKeyToColumn,
    PrimaryKeyTrait, QueryFilter, QueryOrder, QuerySelect, Select, SqlErr, TransactionSession, TransactionTrait, Value,
};
use std::fmt::{self, Debug};
use std::marker::PhantomData;
use tracing::debug;

use crate::common::{DatabaseError, DatabaseResult};
use crate::query::{Page, SortOrder};

/// Whether a mutating call finalizes its own unit of work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Commit {
    /// Run in a fresh transaction (a savepoint inside an open one) and commit it.
    #[default]
    Immediate,
    /// Run on the given connection and leave commit/rollback to the caller.
    Deferred,
}

/// Runs `$body` with `$c` bound either to `$conn` or to a new transaction
/// that is committed when the body succeeds. A failed body drops the
/// transaction, which rolls it back.
macro_rules! with_commit {
    ($conn:expr, $commit:expr, |$c:ident| $body:expr) => {
        match $commit {
            Commit::Deferred => {
                let $c = $conn;
                $body
            }
            Commit::Immediate => {
                let txn = $conn.begin().await?;
                let $c = &txn;
                let result: DatabaseResult<_> = $body;
                if result.is_ok() {
                    txn.commit().await?;
                }
                result
            }
        }
    };
}

/// CRUD façade instantiated once per entity type.
pub struct BaseRepository<E> {
    _entity: PhantomData<fn() -> E>,
}

impl<E> BaseRepository<E> {
    pub const fn new() -> Self {
        Self {
            _entity: PhantomData,
        }
    }
}

impl<E> Default for BaseRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for BaseRepository<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for BaseRepository<E> {}

impl<E: EntityName> Debug for BaseRepository<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseRepository")
            .field("table", &E::default().table_name())
            .finish()
    }
}

impl<E> BaseRepository<E>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
{
    fn table() -> String {
        E::default().table_name().to_string()
    }

    fn id_column() -> DatabaseResult<E::Column> {
        let mut keys = E::PrimaryKey::iter();
        match (keys.next(), keys.next()) {
            (Some(key), None) => Ok(key.into_column()),
            _ => Err(DbErr::Custom(format!(
                "{} must have a single-column primary key",
                Self::table()
            ))
            .into()),
        }
    }

    /// Unique and foreign key violations surface as [`DatabaseError::Conflict`].
    fn write_error(err: DbErr) -> DatabaseError {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail))
            | Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                DatabaseError::Conflict(detail)
            }
            _ => DatabaseError::Postgres(err),
        }
    }

    /// An update that matched no row means the record is gone.
    fn update_error(err: DbErr) -> DatabaseError {
        match err {
            DbErr::RecordNotUpdated => DatabaseError::NotFound(Self::table()),
            other => Self::write_error(other),
        }
    }

    /// Filtered, ordered, windowed select. Primary key ascending is always the
    /// last sort key so that consecutive pages never overlap.
    pub(crate) fn list_query(
        page: Page,
        filters: Condition,
        order: Option<SortOrder<E::Column>>,
    ) -> Select<E> {
        let mut query = E::find().filter(filters);
        if let Some(order) = order {
            query = query.order_by(order.column, order.direction.into());
        }
        for key in E::PrimaryKey::iter() {
            query = query.order_by_asc(key.into_column());
        }
        query.offset(page.skip).limit(page.limit)
    }

    pub async fn get_one_by_id<C, K>(
        &self,
        conn: &C,
        id: K,
        filters: Condition,
    ) -> DatabaseResult<Option<E::Model>>
    where
        C: ConnectionTrait,
        K: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
    {
        Ok(E::find_by_id(id).filter(filters).one(conn).await?)
    }

    /// Records whose primary key is in `ids`, ordered by primary key.
    /// Ids with no matching row are skipped.
    pub async fn get_many_by_ids<C, K>(
        &self,
        conn: &C,
        ids: Vec<K>,
        filters: Condition,
    ) -> DatabaseResult<Vec<E::Model>>
    where
        C: ConnectionTrait,
        K: Into<Value>,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let column = Self::id_column()?;
        Ok(E::find()
            .filter(column.is_in(ids))
            .filter(filters)
            .order_by_asc(column)
            .all(conn)
            .await?)
    }

    pub async fn get_count<C>(&self, conn: &C, filters: Condition) -> DatabaseResult<u64>
    where
        C: ConnectionTrait,
    {
        Ok(E::find().filter(filters).count(conn).await?)
    }

    pub async fn get_list<C>(
        &self,
        conn: &C,
        page: Page,
        filters: Condition,
        order: Option<SortOrder<E::Column>>,
    ) -> DatabaseResult<Vec<E::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(Self::list_query(page, filters, order).all(conn).await?)
    }

    pub async fn create<C>(
        &self,
        conn: &C,
        model: E::ActiveModel,
        commit: Commit,
    ) -> DatabaseResult<E::Model>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        with_commit!(conn, commit, |c| model
            .insert(c)
            .await
            .map_err(Self::write_error))
    }

    /// Applies the `Set` columns of `changes` that differ from `current`.
    ///
    /// Columns left `NotSet` are untouched. When nothing differs, `current`
    /// is returned as is and no statement is issued.
    pub async fn update<C>(
        &self,
        conn: &C,
        current: E::Model,
        changes: E::ActiveModel,
        commit: Commit,
    ) -> DatabaseResult<E::Model>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let mut active = current.clone().into_active_model();
        let mut dirty = false;

        for column in E::Column::iter() {
            if let ActiveValue::Set(value) = changes.get(column) {
                if current.get(column) != value {
                    active.set(column, value);
                    dirty = true;
                }
            }
        }

        if !dirty {
            debug!(table = %Self::table(), "update skipped, no changed columns");
            return Ok(current);
        }

        with_commit!(conn, commit, |c| active
            .update(c)
            .await
            .map_err(Self::update_error))
    }

    /// Deletes by primary key and returns the removed record.
    pub async fn remove<C, K>(&self, conn: &C, id: K, commit: Commit) -> DatabaseResult<E::Model>
    where
        C: ConnectionTrait + TransactionTrait,
        K: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType> + Clone + Debug,
    {
        with_commit!(conn, commit, |c| {
            match E::find_by_id(id.clone()).one(c).await? {
                Some(model) => {
                    let result = E::delete_by_id(id.clone())
                        .exec(c)
                        .await
                        .map_err(Self::write_error)?;
                    if result.rows_affected == 0 {
                        Err(DatabaseError::NotFound(format!("{} {:?}", Self::table(), id)))
                    } else {
                        Ok(model)
                    }
                }
                None => Err(DatabaseError::NotFound(format!("{} {:?}", Self::table(), id))),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SortDirection;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, QueryTrait, Set};

    mod note {
        use sea_orm::entity::prelude::*;

        #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
        #[sea_orm(table_name = "notes")]
        pub struct Model {
            #[sea_orm(primary_key)]
            pub id: i32,
            pub title: String,
            pub body: String,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}
    }

    fn note(id: i32, title: &str) -> note::Model {
        note::Model {
            id,
            title: title.to_string(),
            body: "body".to_string(),
        }
    }

    type Notes = BaseRepository<note::Entity>;

    #[test]
    fn list_query_orders_by_requested_column_then_id() {
        let order = SortOrder {
            column: note::Column::Title,
            direction: SortDirection::Desc,
        };
        let sql = Notes::list_query(Page { skip: 10, limit: 5 }, Condition::all(), Some(order))
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#"ORDER BY "notes"."title" DESC, "notes"."id" ASC"#));
        assert!(sql.contains("LIMIT 5 OFFSET 10"));
    }

    #[test]
    fn list_query_without_order_is_still_deterministic() {
        let sql = Notes::list_query(Page::default(), Condition::all(), None)
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#"ORDER BY "notes"."id" ASC"#));
        assert!(sql.contains("LIMIT 100"));
    }

    #[tokio::test]
    async fn get_many_by_ids_with_no_ids_skips_the_query() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let found = Notes::new()
            .get_many_by_ids(&db, Vec::<i32>::new(), Condition::all())
            .await
            .unwrap();

        assert!(found.is_empty());
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn get_many_by_ids_returns_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![note(1, "a"), note(3, "c")]])
            .into_connection();

        let found = Notes::new()
            .get_many_by_ids(&db, vec![1, 2, 3], Condition::all())
            .await
            .unwrap();

        assert_eq!(found, vec![note(1, "a"), note(3, "c")]);
    }

    #[tokio::test]
    async fn update_without_changes_returns_current_without_writing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let current = note(7, "same");

        let changes = note::ActiveModel {
            title: Set("same".to_string()),
            ..Default::default()
        };
        let updated = Notes::new()
            .update(&db, current.clone(), changes, Commit::Immediate)
            .await
            .unwrap();

        assert_eq!(updated, current);
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn update_applies_set_columns() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![note(7, "renamed")]])
            .into_connection();

        let changes = note::ActiveModel {
            title: Set("renamed".to_string()),
            ..Default::default()
        };
        let updated = Notes::new()
            .update(&db, note(7, "old"), changes, Commit::Deferred)
            .await
            .unwrap();

        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.body, "body");
    }

    #[tokio::test]
    async fn update_of_vanished_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<note::Model>::new()])
            .into_connection();

        let changes = note::ActiveModel {
            title: Set("renamed".to_string()),
            ..Default::default()
        };
        let err = Notes::new()
            .update(&db, note(7, "old"), changes, Commit::Deferred)
            .await
            .unwrap_err();

        assert!(matches!(err, DatabaseError::NotFound(ref what) if what == "notes"));
    }

    #[tokio::test]
    async fn create_inside_its_own_transaction() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![note(1, "new")]])
            .into_connection();

        let created = Notes::new()
            .create(
                &db,
                note::ActiveModel {
                    title: Set("new".to_string()),
                    body: Set("body".to_string()),
                    ..Default::default()
                },
                Commit::Immediate,
            )
            .await
            .unwrap();

        assert_eq!(created.id, 1);
    }

    #[tokio::test]
    async fn remove_missing_record_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<note::Model>::new()])
            .into_connection();

        let err = Notes::new()
            .remove(&db, 42, Commit::Deferred)
            .await
            .unwrap_err();

        assert!(matches!(err, DatabaseError::NotFound(ref what) if what == "notes 42"));
    }

    #[tokio::test]
    async fn remove_returns_deleted_record() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![note(5, "gone")]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let removed = Notes::new()
            .remove(&db, 5, Commit::Immediate)
            .await
            .unwrap();

        assert_eq!(removed, note(5, "gone"));
    }

    #[test]
    fn unclassified_write_errors_stay_postgres_errors() {
        let err = Notes::write_error(DbErr::Custom("boom".into()));
        assert!(matches!(err, DatabaseError::Postgres(_)));
    }

    #[test]
    fn commit_defaults_to_immediate() {
        assert_eq!(Commit::default(), Commit::Immediate);
    }
}
