use std::marker::PhantomData;

use agate_types::RecordId;
use async_trait::async_trait;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, OptionalExtension};
use tracing::debug;

use super::schema::SqlEntity;
use super::{map_sqlite_error, Database};
use crate::error::{StoreError, StoreResult};
use crate::traits::RecordStore;

/// [`RecordStore`] over one table of a shared [`Database`].
pub struct SqliteRecordStore<E> {
    db: Database,
    _entity: PhantomData<fn() -> E>,
}

impl<E: SqlEntity> SqliteRecordStore<E> {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    fn select_sql() -> String {
        format!(
            "SELECT {}, {} FROM {}",
            E::ID_COLUMN,
            E::COLUMNS.join(", "),
            E::TABLE
        )
    }

    async fn query(&self, sql: String, params: Vec<Value>) -> StoreResult<Vec<E>> {
        debug!(table = E::TABLE, %sql, "query");
        self.db
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql).map_err(map_sqlite_error)?;
                let rows = stmt
                    .query_map(params_from_iter(params), E::from_row)
                    .map_err(map_sqlite_error)?;
                let records = rows
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(map_sqlite_error)?;
                Ok(records)
            })
            .await
    }

    /// Run a write statement and return the affected row count.
    async fn execute(&self, sql: String, params: Vec<Value>) -> StoreResult<usize> {
        debug!(table = E::TABLE, %sql, "execute");
        self.db
            .call(move |conn| {
                conn.execute(&sql, params_from_iter(params))
                    .map_err(map_sqlite_error)
            })
            .await
    }
}

impl<E> Clone for SqliteRecordStore<E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E: SqlEntity> RecordStore<E> for SqliteRecordStore<E> {
    async fn list(&self) -> StoreResult<Vec<E>> {
        let sql = format!("{} ORDER BY {}", Self::select_sql(), E::ID_COLUMN);
        self.query(sql, Vec::new()).await
    }

    async fn list_by(&self, column: &'static str, id: RecordId) -> StoreResult<Vec<E>> {
        if !E::COLUMNS.contains(&column) {
            return Err(StoreError::Internal(format!(
                "{} has no column {column}",
                E::TABLE
            )));
        }
        let sql = format!(
            "{} WHERE {column} = ?1 ORDER BY {}",
            Self::select_sql(),
            E::ID_COLUMN
        );
        self.query(sql, vec![Value::Integer(id)]).await
    }

    async fn get(&self, id: RecordId) -> StoreResult<E> {
        let sql = format!("{} WHERE {} = ?1", Self::select_sql(), E::ID_COLUMN);
        debug!(table = E::TABLE, id, "get");
        let found = self
            .db
            .call(move |conn| {
                conn.query_row(&sql, [id], E::from_row)
                    .optional()
                    .map_err(map_sqlite_error)
            })
            .await?;
        found.ok_or_else(|| StoreError::not_found(E::KIND, id))
    }

    async fn insert(&self, draft: &E::Draft) -> StoreResult<RecordId> {
        let placeholders: Vec<String> = (1..=E::COLUMNS.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            E::TABLE,
            E::COLUMNS.join(", "),
            placeholders.join(", ")
        );
        let params = E::bind(draft);
        debug!(table = E::TABLE, "insert");
        self.db
            .call(move |conn| {
                conn.execute(&sql, params_from_iter(params))
                    .map_err(map_sqlite_error)?;
                Ok(conn.last_insert_rowid())
            })
            .await
    }

    async fn update_fields(&self, id: RecordId, draft: &E::Draft) -> StoreResult<()> {
        let assignments: Vec<String> = E::COLUMNS
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{column} = ?{}", i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?{}",
            E::TABLE,
            assignments.join(", "),
            E::ID_COLUMN,
            E::COLUMNS.len() + 1
        );
        let mut params = E::bind(draft);
        params.push(Value::Integer(id));

        match self.execute(sql, params).await? {
            0 => Err(StoreError::not_found(E::KIND, id)),
            _ => Ok(()),
        }
    }

    async fn delete(&self, id: RecordId) -> StoreResult<()> {
        let sql = format!("DELETE FROM {} WHERE {} = ?1", E::TABLE, E::ID_COLUMN);
        match self.execute(sql, vec![Value::Integer(id)]).await? {
            0 => Err(StoreError::not_found(E::KIND, id)),
            _ => Ok(()),
        }
    }
}

impl<E: SqlEntity> std::fmt::Debug for SqliteRecordStore<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteRecordStore")
            .field("table", &E::TABLE)
            .finish()
    }
}
