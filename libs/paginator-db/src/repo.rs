//! SeaORM-backed [`PageRepository`].
//!
//! Generic over `C: ConnectionTrait`, so it can run against a `DatabaseConnection`
//! or a transaction handed in by the caller.

use anyhow::Context;
use async_trait::async_trait;
use paginator_core::{EntityIdentity, FindQuery, PageRepository};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QuerySelect};
use tracing::{debug, instrument};

use crate::condition::{BuildError, FieldMap, SortExt, WhereExt};

const MAX_OFFSET: u64 = i64::MAX as u64;

pub struct SeaOrmPageRepository<E, C>
where
    E: EntityTrait,
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
    entity: EntityIdentity,
    fields: FieldMap<E>,
}

impl<E, C> SeaOrmPageRepository<E, C>
where
    E: EntityTrait,
    C: ConnectionTrait + Send + Sync,
{
    /// `class_name` is the second column policy lookup key; the table name comes from the entity.
    pub fn new(conn: C, class_name: impl Into<String>, fields: FieldMap<E>) -> Self {
        let table = E::default().table_name().to_owned();
        Self {
            conn,
            entity: EntityIdentity::new(table, class_name),
            fields,
        }
    }

    pub fn fields(&self) -> &FieldMap<E> {
        &self.fields
    }

    /// Build the unbounded `SELECT` for a query (no offset/limit).
    pub fn select(&self, query: &FindQuery) -> Result<sea_orm::Select<E>, BuildError>
    where
        E::Column: ColumnTrait + Copy,
    {
        if let Some(relation) = query.relations.first() {
            return Err(BuildError::UnsupportedRelation(relation.clone()));
        }
        E::find()
            .apply_where(&query.filter, &self.fields)?
            .apply_sort(&query.order, &self.fields)
    }
}

#[async_trait]
impl<E, C> PageRepository for SeaOrmPageRepository<E, C>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
    E::Model: Sync,
    C: ConnectionTrait + Send + Sync + 'static,
{
    type Item = E::Model;

    fn entity(&self) -> &EntityIdentity {
        &self.entity
    }

    #[instrument(
        name = "paginator_db.find_and_count",
        skip_all,
        fields(table = %self.entity.table_name, skip = query.skip, take = query.take)
    )]
    async fn find_and_count(&self, query: FindQuery) -> anyhow::Result<(Vec<E::Model>, u64)> {
        let select = self.select(&query)?;

        let total = select
            .clone()
            .count(&self.conn)
            .await
            .context("count failed")?;

        if query.skip >= total {
            debug!(total, "offset past the last row");
            return Ok((Vec::new(), total));
        }

        // sql drivers bind OFFSET as a signed 64-bit integer
        let items = select
            .offset(query.skip.min(MAX_OFFSET))
            .limit(query.take)
            .all(&self.conn)
            .await
            .context("page select failed")?;

        debug!(rows = items.len(), total, "query executed");
        Ok((items, total))
    }
}
