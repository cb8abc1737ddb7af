// src/handlers/earnings_handler.rs
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    errors::WizaError,
    models::wallet::{ChartBucket, EarningEntry, EarningsPeriod, EarningsSummary, WithdrawalReceipt, WithdrawalRequest},
    state::AppState,
};

// GET /earnings?period=week
#[derive(Debug, Deserialize)]
pub struct EarningsQuery {
    #[serde(default)]
    pub period: EarningsPeriod,
}

#[derive(Debug, Serialize)]
pub struct EarningsResponse {
    pub period: EarningsPeriod,
    pub summary: EarningsSummary,
    pub chart: Vec<ChartBucket>,
    pub available_balance: i64,
    pub entries: Vec<EarningEntry>,
}

pub async fn get_earnings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EarningsQuery>,
) -> Json<EarningsResponse> {
    let earnings = &state.earnings_service;
    Json(EarningsResponse {
        period: query.period,
        summary: earnings.summary(),
        chart: earnings.chart(query.period),
        available_balance: earnings.available_balance(),
        entries: earnings.entries(),
    })
}

pub async fn request_withdrawal(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WithdrawalRequest>,
) -> Result<(StatusCode, Json<WithdrawalReceipt>), WizaError> {
    let receipt = state
        .earnings_service
        .request_withdrawal(request.method, request.amount)
        .await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}
