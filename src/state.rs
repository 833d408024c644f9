use crate::models::{AttendanceRecord, RosterRecord, SyncStatus};
use crate::targets::TargetTable;
use crate::winner::WinnerBoard;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// Last good snapshot from the store plus the outcome of the latest poll.
#[derive(Debug, Default)]
pub struct DashboardData {
    pub records: Vec<AttendanceRecord>,
    pub roster: Vec<RosterRecord>,
    pub sync: SyncStatus,
}

#[derive(Clone)]
pub struct AppState {
    pub winner_path: PathBuf,
    pub targets: Arc<TargetTable>,
    pub data: Arc<Mutex<DashboardData>>,
    pub winners: Arc<Mutex<WinnerBoard>>,
}

impl AppState {
    pub fn new(winner_path: PathBuf, targets: TargetTable, winners: WinnerBoard) -> Self {
        Self {
            winner_path,
            targets: Arc::new(targets),
            data: Arc::new(Mutex::new(DashboardData::default())),
            winners: Arc::new(Mutex::new(winners)),
        }
    }
}
