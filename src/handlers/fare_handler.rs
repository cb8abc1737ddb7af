// src/handlers/fare_handler.rs
use axum::{Json, extract::State};
use std::sync::Arc;

use crate::{
    errors::WizaError,
    models::fare::{FareQuote, FareQuoteRequest, PaymentMethodInfo},
    state::AppState,
};

pub async fn payment_methods(State(state): State<Arc<AppState>>) -> Json<Vec<PaymentMethodInfo>> {
    Json(state.fare_service.payment_methods())
}

pub async fn quote(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FareQuoteRequest>,
) -> Result<Json<FareQuote>, WizaError> {
    Ok(Json(state.fare_service.quote(&request).await?))
}
