// src/handlers/checkin_handler.rs
use axum::{Json, extract::State};
use std::sync::Arc;

use crate::{
    errors::WizaError,
    models::checkin::{CheckInOutcome, ManualCheckInRequest, PassengerHistoryEntry},
    services::checkin_service::CheckInSnapshot,
    state::AppState,
};

pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<CheckInSnapshot> {
    Json(state.checkin_service.snapshot())
}

pub async fn manual(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ManualCheckInRequest>,
) -> Result<Json<CheckInOutcome>, WizaError> {
    Ok(Json(state.checkin_service.submit_code(&request.code)?))
}

pub async fn scan(State(state): State<Arc<AppState>>) -> Result<Json<CheckInOutcome>, WizaError> {
    Ok(Json(state.checkin_service.scan().await?))
}

pub async fn dismiss_feedback(State(state): State<Arc<AppState>>) -> Json<CheckInSnapshot> {
    Json(state.checkin_service.dismiss_feedback())
}

pub async fn feedback_animation_finished(State(state): State<Arc<AppState>>) -> Json<CheckInSnapshot> {
    Json(state.checkin_service.feedback_animation_finished())
}

pub async fn history(State(state): State<Arc<AppState>>) -> Json<Vec<PassengerHistoryEntry>> {
    Json(state.checkin_service.history())
}
