//! HTTP handler for the weather panel endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::{validate_coordinates, GpsCoordinates, PanelResponse};

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Query parameters for a panel request
#[derive(Debug, Deserialize)]
pub struct PanelQuery {
    pub lat: f64,
    pub lon: f64,
    /// Target time: RFC 3339 with offset, or a naive local time in
    /// the requested zone. Absent means now.
    pub time: Option<String>,
    /// IANA time zone name; falls back to the configured default
    pub tz: Option<String>,
}

/// Assemble the weather panel for a point
pub async fn get_panel(
    State(state): State<AppState>,
    Query(query): Query<PanelQuery>,
) -> AppResult<Json<PanelResponse>> {
    let location = GpsCoordinates::new(query.lat, query.lon);
    validate_coordinates(&location).map_err(|message| AppError::Validation {
        field: "lat/lon".to_string(),
        message: message.to_string(),
    })?;

    let response = state
        .panel
        .assemble(location, query.time.as_deref(), query.tz.as_deref())
        .await?;
    Ok(Json(response))
}
