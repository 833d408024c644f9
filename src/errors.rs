use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

/// Failures talking to the remote attendance store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store is not configured: {0}")]
    NotConfigured(String),

    #[error("store request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("store returned {status} for {table}: {body}")]
    Status {
        table: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode {table} rows: {source}")]
    Decode {
        table: String,
        #[source]
        source: serde_json::Error,
    },
}
