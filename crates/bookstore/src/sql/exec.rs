use super::Sql;
use crate::client::GenericClient;
use crate::error::StoreResult;
use crate::row::FromRow;
use tokio_postgres::Row;

impl Sql {
    fn trace(&self, sql: &str) {
        tracing::debug!(
            tag = self.tag().unwrap_or("-"),
            params = ?self.params(),
            "{sql}"
        );
    }

    /// Execute the built SQL and return all rows.
    pub async fn fetch_all(&self, conn: &impl GenericClient) -> StoreResult<Vec<Row>> {
        let sql = self.to_sql();
        self.trace(&sql);
        conn.query(&sql, &self.params_ref()).await
    }

    /// Execute the built SQL and return all rows mapped to `T`.
    pub async fn fetch_all_as<T: FromRow>(&self, conn: &impl GenericClient) -> StoreResult<Vec<T>> {
        let rows = self.fetch_all(conn).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Execute the built SQL and return the first row, if any.
    pub async fn fetch_opt(&self, conn: &impl GenericClient) -> StoreResult<Option<Row>> {
        let sql = self.to_sql();
        self.trace(&sql);
        conn.query_opt(&sql, &self.params_ref()).await
    }

    /// Execute the built SQL and return at most one row mapped to `T`.
    pub async fn fetch_opt_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> StoreResult<Option<T>> {
        let row = self.fetch_opt(conn).await?;
        row.as_ref().map(T::from_row).transpose()
    }

    /// Execute the built SQL and return affected row count.
    pub async fn execute(&self, conn: &impl GenericClient) -> StoreResult<u64> {
        let sql = self.to_sql();
        self.trace(&sql);
        conn.execute(&sql, &self.params_ref()).await
    }

    /// Execute a writing statement and return the first `RETURNING` row, if any.
    pub async fn execute_returning(&self, conn: &impl GenericClient) -> StoreResult<Option<Row>> {
        let sql = self.to_sql();
        self.trace(&sql);
        conn.execute_returning(&sql, &self.params_ref()).await
    }
}
