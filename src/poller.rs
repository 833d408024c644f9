use crate::errors::StoreError;
use crate::models::{AttendanceRecord, RosterRecord};
use crate::source::RecordSource;
use crate::state::AppState;
use chrono::Utc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

type Snapshot = (Vec<AttendanceRecord>, Vec<RosterRecord>);

/// Polls `source` every `interval`, starting immediately, until `shutdown`
/// flips to true or its sender is dropped.
pub fn spawn_poller<S: RecordSource>(
    state: AppState,
    source: S,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
                _ = ticker.tick() => {}
            }

            let fetched = fetch_snapshot(&source).await;
            if *shutdown.borrow() {
                debug!("discarding store response that arrived after shutdown");
                break;
            }
            apply_snapshot(&state, fetched).await;
        }
        info!("poller stopped");
    })
}

async fn fetch_snapshot<S: RecordSource>(source: &S) -> Result<Snapshot, StoreError> {
    tokio::try_join!(source.fetch_attendance(), source.fetch_roster())
}

async fn apply_snapshot(state: &AppState, fetched: Result<Snapshot, StoreError>) -> bool {
    let mut data = state.data.lock().await;
    match fetched {
        Ok((records, roster)) => {
            info!(
                attendance = records.len(),
                roster = roster.len(),
                "refreshed attendance data"
            );
            data.sync.attendance_rows = records.len();
            data.sync.roster_rows = roster.len();
            data.sync.last_synced_at = Some(Utc::now());
            data.sync.last_error = None;
            data.records = records;
            data.roster = roster;
            true
        }
        Err(err) => {
            warn!("attendance refresh failed: {err}");
            data.sync.last_error = Some(err.to_string());
            false
        }
    }
}
