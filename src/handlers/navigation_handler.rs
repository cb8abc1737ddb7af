// src/handlers/navigation_handler.rs
use axum::{Json, extract::Query};
use serde::Deserialize;

use crate::{
    errors::WizaError,
    models::navigation::{AppRoute, RouteInfo},
};

pub async fn list_routes() -> Json<Vec<RouteInfo>> {
    Json(AppRoute::ALL.into_iter().map(RouteInfo::from).collect())
}

// GET /navigation/resolve?path=/(driver)/check-in
#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub path: String,
}

pub async fn resolve(Query(query): Query<ResolveQuery>) -> Result<Json<RouteInfo>, WizaError> {
    AppRoute::parse(&query.path)
        .map(|route| Json(route.into()))
        .ok_or_else(|| WizaError::not_found(format!("route {}", query.path)))
}
