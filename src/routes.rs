// src/routes.rs
use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{
        self, checkin_handler, driver_handler, earnings_handler, fare_handler, forms_handler, navigation_handler,
        safety_handler, trips_handler, wallet_handler,
    },
    state::AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Driver
        .route(
            "/driver/status",
            get(driver_handler::get_status).put(driver_handler::set_status),
        )
        .route("/driver/status/cycle", post(driver_handler::cycle_status))
        .route(
            "/driver/requests",
            get(driver_handler::list_requests).post(driver_handler::create_request),
        )
        .route("/driver/requests/:id/accept", post(driver_handler::accept_request))
        .route("/driver/requests/:id/reject", post(driver_handler::reject_request))
        .route("/driver/trip", get(driver_handler::get_active_trip))
        .route("/driver/trip/boarded", post(driver_handler::passenger_boarded))
        .route("/driver/trip/complete", post(driver_handler::complete_trip))
        // Fares
        .route("/fares/methods", get(fare_handler::payment_methods))
        .route("/fares/quote", post(fare_handler::quote))
        // Check-in
        .route("/checkin", get(checkin_handler::get_state))
        .route("/checkin/manual", post(checkin_handler::manual))
        .route("/checkin/scan", post(checkin_handler::scan))
        .route("/checkin/feedback/dismiss", post(checkin_handler::dismiss_feedback))
        .route(
            "/checkin/feedback/animation-finished",
            post(checkin_handler::feedback_animation_finished),
        )
        .route("/checkin/history", get(checkin_handler::history))
        // Passenger trips
        .route("/trips", get(trips_handler::list_trips))
        // Wallet and earnings
        .route("/wallet", get(wallet_handler::get_wallet))
        .route("/wallet/top-up", post(wallet_handler::top_up))
        .route("/earnings", get(earnings_handler::get_earnings))
        .route("/earnings/withdrawals", post(earnings_handler::request_withdrawal))
        // Safety
        .route(
            "/safety/contacts",
            get(safety_handler::list_contacts).post(safety_handler::add_contact),
        )
        .route("/safety/contacts/:id", delete(safety_handler::remove_contact))
        .route("/safety/sos", post(safety_handler::send_sos))
        // Navigation
        .route("/navigation/routes", get(navigation_handler::list_routes))
        .route("/navigation/resolve", get(navigation_handler::resolve))
        // Auth forms
        .route("/forms/login", post(forms_handler::validate_login))
        .route("/forms/register", post(forms_handler::validate_registration))
        .route("/forms/password-reset", post(forms_handler::validate_password_reset))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
