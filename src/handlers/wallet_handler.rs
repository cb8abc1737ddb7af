// src/handlers/wallet_handler.rs
use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;

use crate::{
    errors::WizaError,
    models::wallet::{TopUpRequest, WalletSummary, WalletTransaction},
    state::AppState,
};

pub async fn get_wallet(State(state): State<Arc<AppState>>) -> Json<WalletSummary> {
    Json(state.wallet_service.summary())
}

pub async fn top_up(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TopUpRequest>,
) -> Result<(StatusCode, Json<WalletTransaction>), WizaError> {
    let transaction = state.wallet_service.top_up(&request.amount).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}
