use crate::errors::AppError;
use crate::models::{
    DashboardResponse, FilterOptions, FilterQuery, Filters, SyncStatus, WinnersResponse,
};
use crate::state::AppState;
use crate::stats::{build_dashboard, filter_options, session_key};
use crate::storage::persist_winners;
use crate::ui::render_index;
use crate::winner::{WinnerBoard, lock_filters};
use axum::{
    Json,
    extract::{Query, State},
    response::Html,
};
use chrono::Utc;
use tracing::{error, info};

pub async fn index() -> Html<String> {
    Html(render_index())
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<DashboardResponse>, AppError> {
    let filters = Filters::from(&query);
    let judged_by = lock_filters(&filters);
    let (stats, judged, sync) = {
        let data = state.data.lock().await;
        let stats = build_dashboard(&data.records, &data.roster, &filters, &state.targets);
        // The unit selector only changes the view, never who wins.
        let judged = (judged_by != filters)
            .then(|| build_dashboard(&data.records, &data.roster, &judged_by, &state.targets));
        (stats, judged, data.sync.clone())
    };

    let session = session_key(&filters.session);
    let mut winners = state.winners.lock().await;
    let newly_locked = winners
        .observe(&session, judged.as_ref().unwrap_or(&stats), Utc::now())
        .cloned();
    if let Some(lock) = newly_locked {
        info!(
            session = %session,
            unit = %lock.unit,
            percentage = lock.percentage,
            "winner locked"
        );
        if let Err(err) = persist_winners(&state.winner_path, &winners).await {
            error!("failed to persist winner locks: {}", err.message);
        }
    }
    let winner = winners.get(&session).cloned();

    Ok(Json(DashboardResponse {
        stats,
        session,
        winner,
        sync,
    }))
}

pub async fn get_filters(State(state): State<AppState>) -> Json<FilterOptions> {
    let data = state.data.lock().await;
    Json(filter_options(&data.records, &state.targets))
}

pub async fn get_winners(State(state): State<AppState>) -> Json<WinnersResponse> {
    let winners = state.winners.lock().await;
    Json(WinnersResponse {
        winners: winners.locks().clone(),
    })
}

pub async fn clear_winners(
    State(state): State<AppState>,
) -> Result<Json<WinnersResponse>, AppError> {
    let mut winners = state.winners.lock().await;
    persist_winners(&state.winner_path, &WinnerBoard::default()).await?;
    winners.clear();
    info!("winner locks cleared");

    Ok(Json(WinnersResponse {
        winners: winners.locks().clone(),
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<SyncStatus> {
    let data = state.data.lock().await;
    Json(data.sync.clone())
}
