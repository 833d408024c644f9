use crate::config::Config;
use crate::errors::StoreError;
use crate::models::{AttendanceRecord, RosterRecord};
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

const PAGE_SIZE: usize = 1000;

/// Where the poller gets its rows from.
pub trait RecordSource: Send + Sync + 'static {
    fn fetch_attendance(
        &self,
    ) -> impl Future<Output = Result<Vec<AttendanceRecord>, StoreError>> + Send;

    fn fetch_roster(&self) -> impl Future<Output = Result<Vec<RosterRecord>, StoreError>> + Send;
}

/// Read-only client for a PostgREST-style table endpoint.
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: Client,
    base_url: Option<String>,
    api_key: Option<String>,
    attendance_table: String,
    roster_table: Option<String>,
    order: String,
}

impl StoreClient {
    pub fn new(config: &Config) -> Result<Self, StoreError> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            http,
            base_url: config.store_url.clone(),
            api_key: config.store_key.clone(),
            attendance_table: config.attendance_table.clone(),
            roster_table: config.roster_table.clone(),
            order: format!("{}.asc", config.order_column),
        })
    }

    async fn fetch_table<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>, StoreError> {
        let base = self
            .base_url
            .as_deref()
            .ok_or_else(|| StoreError::NotConfigured("STORE_URL is not set".to_string()))?;
        let url = format!("{base}/rest/v1/{table}");

        let mut rows = Vec::new();
        let mut offset = 0usize;
        loop {
            let mut request = self
                .http
                .get(&url)
                .header(ACCEPT, "application/json")
                .query(&[
                    ("select", "*".to_string()),
                    ("order", self.order.clone()),
                    ("limit", PAGE_SIZE.to_string()),
                    ("offset", offset.to_string()),
                ]);
            if let Some(key) = &self.api_key {
                request = request
                    .header("apikey", key)
                    .header(AUTHORIZATION, format!("Bearer {key}"));
            }

            let response = request.send().await?;
            let status = response.status();
            let body = response.text().await?;
            if !status.is_success() {
                return Err(StoreError::Status {
                    table: table.to_string(),
                    status,
                    body,
                });
            }

            let page: Vec<T> = serde_json::from_str(&body).map_err(|source| StoreError::Decode {
                table: table.to_string(),
                source,
            })?;
            let fetched = page.len();
            rows.extend(page);
            debug!(table, offset, fetched, "fetched store page");

            if fetched < PAGE_SIZE {
                return Ok(rows);
            }
            offset += fetched;
        }
    }
}

impl RecordSource for StoreClient {
    async fn fetch_attendance(&self) -> Result<Vec<AttendanceRecord>, StoreError> {
        self.fetch_table(&self.attendance_table).await
    }

    async fn fetch_roster(&self) -> Result<Vec<RosterRecord>, StoreError> {
        match &self.roster_table {
            Some(table) => self.fetch_table(table).await,
            None => Ok(Vec::new()),
        }
    }
}
