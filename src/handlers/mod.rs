// src/handlers/mod.rs
pub mod checkin_handler;
pub mod driver_handler;
pub mod earnings_handler;
pub mod fare_handler;
pub mod forms_handler;
pub mod navigation_handler;
pub mod safety_handler;
pub mod trips_handler;
pub mod wallet_handler;

use axum::Json;
use serde_json::{Value, json};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
