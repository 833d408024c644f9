use std::{env, path::PathBuf, time::Duration};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POLL_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub store_url: Option<String>,
    pub store_key: Option<String>,
    pub attendance_table: String,
    pub roster_table: Option<String>,
    /// Column the store sorts by while paging; must be unique per row.
    pub order_column: String,
    pub poll_interval: Duration,
    pub winner_path: PathBuf,
}

impl Config {
    /// Reads the process environment, after loading `.env` if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = non_empty("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let poll_secs = non_empty("POLL_INTERVAL_SECS")
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_POLL_SECS)
            .max(1);

        Self {
            port,
            store_url: non_empty("STORE_URL").map(|url| url.trim_end_matches('/').to_string()),
            store_key: non_empty("STORE_KEY"),
            attendance_table: non_empty("ATTENDANCE_TABLE")
                .unwrap_or_else(|| "attendance".to_string()),
            roster_table: non_empty("ROSTER_TABLE"),
            order_column: non_empty("STORE_ORDER_COLUMN").unwrap_or_else(|| "id".to_string()),
            poll_interval: Duration::from_secs(poll_secs),
            winner_path: non_empty("WINNER_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/winners.json")),
        }
    }
}
