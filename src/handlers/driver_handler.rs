// src/handlers/driver_handler.rs
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use crate::{
    errors::WizaError,
    models::{
        driver::{DriverStatusSnapshot, DriverStatusUpdate},
        trip::{ActiveTrip, CompletedTrip, NewTripRequest, TripRejection, TripRequest},
    },
    services::DriverOperations,
    state::AppState,
};

pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<DriverStatusSnapshot> {
    Json(state.driver_service.get_status().await)
}

pub async fn set_status(
    State(state): State<Arc<AppState>>,
    Json(update): Json<DriverStatusUpdate>,
) -> Result<Json<DriverStatusSnapshot>, WizaError> {
    Ok(Json(state.driver_service.set_status(update.status).await?))
}

pub async fn cycle_status(State(state): State<Arc<AppState>>) -> Result<Json<DriverStatusSnapshot>, WizaError> {
    Ok(Json(state.driver_service.cycle_status().await?))
}

pub async fn list_requests(State(state): State<Arc<AppState>>) -> Json<Vec<TripRequest>> {
    Json(state.driver_service.pending_requests().await)
}

pub async fn create_request(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewTripRequest>,
) -> Result<(StatusCode, Json<TripRequest>), WizaError> {
    let trip = state.driver_service.enqueue_request(request).await?;
    Ok((StatusCode::CREATED, Json(trip)))
}

pub async fn accept_request(
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<String>,
) -> Result<Json<ActiveTrip>, WizaError> {
    Ok(Json(state.driver_service.accept_request(&request_id).await?))
}

pub async fn reject_request(
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<String>,
    rejection: Option<Json<TripRejection>>,
) -> Result<Json<TripRequest>, WizaError> {
    let reason = rejection.and_then(|Json(r)| r.reason);
    Ok(Json(state.driver_service.reject_request(&request_id, reason).await?))
}

pub async fn get_active_trip(State(state): State<Arc<AppState>>) -> Result<Json<ActiveTrip>, WizaError> {
    state
        .driver_service
        .active_trip()
        .await
        .map(Json)
        .ok_or(WizaError::NoActiveTrip)
}

pub async fn passenger_boarded(State(state): State<Arc<AppState>>) -> Result<Json<ActiveTrip>, WizaError> {
    Ok(Json(state.driver_service.passenger_boarded().await?))
}

pub async fn complete_trip(State(state): State<Arc<AppState>>) -> Result<Json<CompletedTrip>, WizaError> {
    Ok(Json(state.driver_service.complete_trip().await?))
}
