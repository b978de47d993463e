//! Query execution seam.

use crate::client::GenericClient;
use crate::error::{SearchError, SearchResult};
use crate::qb::{ParamMap, Placeholders};
use std::future::Future;
use tokio_postgres::types::ToSql;
use tokio_postgres::Row;

/// Runs rendered search SQL against a store.
///
/// Implemented for every [`GenericClient`]. Implement it directly to run
/// searches against something other than tokio-postgres (or a fake in tests).
pub trait QueryExecutor: Send + Sync {
    /// Row type produced by [`fetch_rows`](Self::fetch_rows).
    type Row: Send;

    /// Placeholder dialect this executor expects in SQL text.
    fn placeholders(&self) -> Placeholders {
        Placeholders::Numbered
    }

    /// Run a count query and return the single count value.
    fn fetch_count(&self, sql: &str, params: &ParamMap) -> impl Future<Output = SearchResult<i64>> + Send;

    /// Run a row query. `limit` and `offset` bind after `params`.
    fn fetch_rows(
        &self,
        sql: &str,
        params: &ParamMap,
        limit: i64,
        offset: i64,
    ) -> impl Future<Output = SearchResult<Vec<Self::Row>>> + Send;
}

impl<C: GenericClient> QueryExecutor for C {
    type Row = Row;

    async fn fetch_count(&self, sql: &str, params: &ParamMap) -> SearchResult<i64> {
        let row = self.query_one(sql, &params.as_refs()).await?;
        row.try_get::<_, i64>(0)
            .map_err(|e| SearchError::decode("count", e.to_string()))
    }

    async fn fetch_rows(&self, sql: &str, params: &ParamMap, limit: i64, offset: i64) -> SearchResult<Vec<Row>> {
        let mut refs: Vec<&(dyn ToSql + Sync)> = params.as_refs();
        refs.push(&limit);
        refs.push(&offset);
        self.query(sql, &refs).await
    }
}
