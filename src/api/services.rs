use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use super::{models::ListingEntry, state::AppState};
use crate::api::error::ApiError;

/// Listing endpoint (GET /)
///
/// Returns every fully-downloaded image, newest first. Records whose
/// download has not completed (or whose attempt was rolled back) never
/// appear here.
pub async fn list_images(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let records = state.store.list_by_time()?;

    let entries: Vec<ListingEntry> = records
        .into_iter()
        .filter_map(ListingEntry::from_record)
        .collect();

    Ok(Json(entries))
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
