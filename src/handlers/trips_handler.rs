// src/handlers/trips_handler.rs
use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    models::trip::{PassengerTrip, TripsTab},
    state::AppState,
};

// GET /trips?tab=upcoming
#[derive(Debug, Deserialize)]
pub struct TripsQuery {
    #[serde(default)]
    pub tab: TripsTab,
}

#[derive(Debug, Serialize)]
pub struct TripsResponse {
    pub tab: TripsTab,
    pub trips: Vec<PassengerTrip>,
}

pub async fn list_trips(State(state): State<Arc<AppState>>, Query(query): Query<TripsQuery>) -> Json<TripsResponse> {
    Json(TripsResponse {
        tab: query.tab,
        trips: state.trip_history_service.list(query.tab),
    })
}
