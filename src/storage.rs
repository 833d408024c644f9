use crate::errors::AppError;
use crate::winner::WinnerBoard;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::{error, warn};

/// Bump when the lock layout changes; older files are then ignored.
pub const WINNER_STORE_KEY: &str = "winner_locks_v1";

#[derive(Serialize, Deserialize)]
struct WinnerFile {
    #[serde(rename = "winner_locks_v1", default)]
    locks: WinnerBoard,
}

pub async fn load_winners(path: &Path) -> WinnerBoard {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<serde_json::Value>(&bytes) {
            Ok(value) if value.get(WINNER_STORE_KEY).is_some() => {
                match serde_json::from_value::<WinnerFile>(value) {
                    Ok(file) => file.locks,
                    Err(err) => {
                        error!("failed to parse winner locks: {err}");
                        WinnerBoard::default()
                    }
                }
            }
            Ok(_) => {
                warn!("winner file has no {WINNER_STORE_KEY} entry, starting unlocked");
                WinnerBoard::default()
            }
            Err(err) => {
                error!("failed to parse winner file: {err}");
                WinnerBoard::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => WinnerBoard::default(),
        Err(err) => {
            error!("failed to read winner file: {err}");
            WinnerBoard::default()
        }
    }
}

pub async fn persist_winners(path: &Path, board: &WinnerBoard) -> Result<(), AppError> {
    let file = WinnerFile {
        locks: board.clone(),
    };
    let payload = serde_json::to_vec_pretty(&file).map_err(AppError::internal)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    fs::write(path, payload).await?;
    Ok(())
}
