// [libs/infra/warehouse/src/client.rs]
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client as HttpClient;
use tracing::{debug, error, instrument};

use crate::errors::WarehouseError;
use crate::schema;

/// Thin wrapper over ClickHouse's HTTP interface. ClickHouse has no
/// long-lived connection handle the way a client-server SQL driver does;
/// every statement is one POST, so what we share across the app is really
/// just the base URL, credentials and a pooled [`reqwest::Client`].
#[derive(Clone)]
pub struct WarehouseClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: HttpClient,
    base_url: String,
    database: String,
    user: String,
    password: String,
}

impl WarehouseClient {
    #[instrument(skip(password))]
    pub async fn connect(
        base_url: &str,
        database: &str,
        user: &str,
        password: &str,
    ) -> Result<Self, WarehouseError> {
        if base_url.is_empty() {
            return Err(WarehouseError::Connection("CLICKHOUSE_URL is empty".into()));
        }
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| WarehouseError::Connection(e.to_string()))?;

        let client = Self {
            inner: Arc::new(Inner {
                http,
                base_url: base_url.trim_end_matches('/').to_string(),
                database: database.to_string(),
                user: user.to_string(),
                password: password.to_string(),
            }),
        };

        client.execute("SELECT 1").await?;
        schema::init_tables(&client).await?;
        Ok(client)
    }

    /// Runs one SQL statement with no expected result body (DDL, ALTER,
    /// INSERT ... FORMAT JSONEachRow with `body` as the payload).
    #[instrument(skip(self, body), fields(sql_len = sql.len()))]
    pub async fn execute_with_body(&self, sql: &str, body: String) -> Result<(), WarehouseError> {
        let response = self
            .inner
            .http
            .post(&self.inner.base_url)
            .query(&[
                ("database", self.inner.database.as_str()),
                ("query", sql),
            ])
            .basic_auth(&self.inner.user, Some(&self.inner.password))
            .body(body)
            .send()
            .await
            .map_err(|e| WarehouseError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("clickhouse rejected statement: {text}");
            return Err(WarehouseError::Query(text));
        }
        Ok(())
    }

    pub async fn execute(&self, sql: &str) -> Result<(), WarehouseError> {
        self.execute_with_body(sql, String::new()).await
    }

    /// Runs a `SELECT` and returns the response body parsed as newline-delimited
    /// JSON objects (`FORMAT JSONEachRow` is appended automatically).
    #[instrument(skip(self), fields(sql_len = sql.len()))]
    pub async fn query_rows(&self, sql: &str) -> Result<Vec<serde_json::Value>, WarehouseError> {
        let full_sql = format!("{sql} FORMAT JSONEachRow");
        let response = self
            .inner
            .http
            .post(&self.inner.base_url)
            .query(&[("database", self.inner.database.as_str())])
            .basic_auth(&self.inner.user, Some(&self.inner.password))
            .body(full_sql)
            .send()
            .await
            .map_err(|e| WarehouseError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(WarehouseError::Query(text));
        }

        let text = response
            .text()
            .await
            .map_err(|e| WarehouseError::Decode(e.to_string()))?;

        text.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(|e| WarehouseError::Decode(e.to_string())))
            .collect()
    }

    pub fn database(&self) -> &str {
        &self.inner.database
    }

    pub(crate) fn debug_ping(&self) {
        debug!(base_url = %self.inner.base_url, "warehouse client alive");
    }
}
