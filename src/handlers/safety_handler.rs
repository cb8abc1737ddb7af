// src/handlers/safety_handler.rs
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use crate::{
    errors::WizaError,
    models::safety::{EmergencyContact, NewEmergencyContact, SosAlert, SosRequest},
    state::AppState,
};

pub async fn list_contacts(State(state): State<Arc<AppState>>) -> Json<Vec<EmergencyContact>> {
    Json(state.safety_service.contacts().await)
}

pub async fn add_contact(
    State(state): State<Arc<AppState>>,
    Json(contact): Json<NewEmergencyContact>,
) -> Result<(StatusCode, Json<EmergencyContact>), WizaError> {
    let contact = state.safety_service.add_contact(contact).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

pub async fn remove_contact(
    State(state): State<Arc<AppState>>,
    Path(contact_id): Path<String>,
) -> Result<StatusCode, WizaError> {
    state.safety_service.remove_contact(&contact_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn send_sos(
    State(state): State<Arc<AppState>>,
    request: Option<Json<SosRequest>>,
) -> Json<SosAlert> {
    let location = request.and_then(|Json(r)| r.location);
    Json(state.safety_service.send_sos(location).await)
}
