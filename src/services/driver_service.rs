// src/services/driver_service.rs
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing;

use crate::{
    errors::WizaError,
    models::{
        driver::{DriverStatus, DriverStatusSnapshot},
        trip::{ActiveTrip, CompletedTrip, NewTripRequest, TripRequest, TripRequestStatus},
    },
    services::{
        driver_status::DriverStatusController,
        earnings_service::EarningsService,
        notification_service::{NotificationMessage, NotificationService, Recipient},
        trip_history_service::TripHistoryService,
        trip_queue::TripRequestQueue,
        wallet_service::WalletService,
    },
    utils::{
        clock::Clock,
        id_generator::{IdGenerator, IdType},
    },
};

#[async_trait]
pub trait DriverOperations: Send + Sync {
    async fn get_status(&self) -> DriverStatusSnapshot;
    async fn cycle_status(&self) -> Result<DriverStatusSnapshot, WizaError>;
    async fn set_status(&self, status: DriverStatus) -> Result<DriverStatusSnapshot, WizaError>;
    async fn enqueue_request(&self, request: NewTripRequest) -> Result<TripRequest, WizaError>;
    async fn pending_requests(&self) -> Vec<TripRequest>;
    async fn accept_request(&self, request_id: &str) -> Result<ActiveTrip, WizaError>;
    async fn reject_request(&self, request_id: &str, reason: Option<String>) -> Result<TripRequest, WizaError>;
    async fn passenger_boarded(&self) -> Result<ActiveTrip, WizaError>;
    async fn complete_trip(&self) -> Result<CompletedTrip, WizaError>;
    async fn active_trip(&self) -> Option<ActiveTrip>;
}

struct DriverState {
    controller: DriverStatusController,
    queue: TripRequestQueue,
    active: Option<ActiveTrip>,
}

pub struct DriverService {
    state: Mutex<DriverState>,
    earnings_service: Arc<EarningsService>,
    wallet_service: Arc<WalletService>,
    trip_history: Arc<TripHistoryService>,
    notification_service: Arc<dyn NotificationService>,
    clock: Arc<dyn Clock>,
}

impl DriverService {
    pub fn new(
        clock: Arc<dyn Clock>,
        earnings_service: Arc<EarningsService>,
        wallet_service: Arc<WalletService>,
        trip_history: Arc<TripHistoryService>,
        notification_service: Arc<dyn NotificationService>,
    ) -> Self {
        Self {
            state: Mutex::new(DriverState {
                controller: DriverStatusController::new(clock.clone()),
                queue: TripRequestQueue::new(),
                active: None,
            }),
            earnings_service,
            wallet_service,
            trip_history,
            notification_service,
            clock,
        }
    }

    // Delivery is best effort; a failed push never undoes a state change.
    async fn notify_passenger(&self, message: NotificationMessage) {
        if let Err(e) = self.notification_service.send(&Recipient::Passenger, message).await {
            tracing::warn!("Passenger notification failed: {}", e);
        }
    }
}

#[async_trait]
impl DriverOperations for DriverService {
    async fn get_status(&self) -> DriverStatusSnapshot {
        tracing::debug!("Getting driver status");
        self.state.lock().await.controller.snapshot()
    }

    async fn cycle_status(&self) -> Result<DriverStatusSnapshot, WizaError> {
        let mut state = self.state.lock().await;
        state.controller.cycle_status()?;
        Ok(state.controller.snapshot())
    }

    async fn set_status(&self, status: DriverStatus) -> Result<DriverStatusSnapshot, WizaError> {
        let mut state = self.state.lock().await;
        state.controller.set_status(status)?;
        Ok(state.controller.snapshot())
    }

    async fn enqueue_request(&self, request: NewTripRequest) -> Result<TripRequest, WizaError> {
        request.validate()?;

        let now = self.clock.now();
        let trip = TripRequest {
            id: IdGenerator::generate_with_timestamp(IdType::Trip, now),
            origin: request.origin.trim().to_string(),
            destination: request.destination.trim().to_string(),
            estimated_time_min: request.estimated_time_min,
            passengers: request.passengers,
            payment_method: request.payment_method,
            quoted_price: request.quoted_price,
            status: TripRequestStatus::Pending,
            created_at: now,
        };

        tracing::info!(
            "Trip request {} queued: {} -> {} ({})",
            trip.id,
            trip.origin,
            trip.destination,
            trip.display_price()
        );
        self.state.lock().await.queue.push(trip.clone());
        Ok(trip)
    }

    async fn pending_requests(&self) -> Vec<TripRequest> {
        self.state.lock().await.queue.pending()
    }

    async fn accept_request(&self, request_id: &str) -> Result<ActiveTrip, WizaError> {
        let active = {
            let mut state = self.state.lock().await;
            let pending = state
                .queue
                .get(request_id)
                .cloned()
                .ok_or_else(|| WizaError::TripRequestNotFound(request_id.to_string()))?;
            state.controller.ensure_can_begin_trip()?;
            // TDS fares are paid up front; an uncovered fare leaves the request pending.
            if pending.payment_method.debits_wallet() && pending.quoted_price > 0 {
                self.wallet_service.charge_trip(
                    pending.quoted_price,
                    &format!("Viagem {} → {}", pending.origin, pending.destination),
                )?;
            }
            state.controller.begin_trip(request_id)?;
            let request = state.queue.resolve(request_id, TripRequestStatus::Accepted)?;
            let active = ActiveTrip {
                request,
                accepted_at: self.clock.now(),
                boarded_at: None,
            };
            state.active = Some(active.clone());
            active
        };

        self.trip_history.trip_started(&active.request);
        tracing::info!("Trip request {} accepted", request_id);
        self.notify_passenger(NotificationMessage::trip_accepted(&active.request)).await;
        Ok(active)
    }

    async fn reject_request(&self, request_id: &str, reason: Option<String>) -> Result<TripRequest, WizaError> {
        let rejected = self
            .state
            .lock()
            .await
            .queue
            .resolve(request_id, TripRequestStatus::Rejected)?;
        self.trip_history.trip_cancelled(&rejected);
        tracing::info!(
            "Trip request {} rejected: {}",
            request_id,
            reason.as_deref().unwrap_or("no reason given")
        );
        Ok(rejected)
    }

    async fn passenger_boarded(&self) -> Result<ActiveTrip, WizaError> {
        let mut state = self.state.lock().await;
        state.controller.passenger_boarded()?;
        let now = self.clock.now();
        let active = state.active.as_mut().ok_or(WizaError::NoActiveTrip)?;
        active.boarded_at.get_or_insert(now);
        Ok(active.clone())
    }

    async fn complete_trip(&self) -> Result<CompletedTrip, WizaError> {
        let completed = {
            let mut state = self.state.lock().await;
            state.controller.complete_trip()?;
            let active = state.active.take().ok_or(WizaError::NoActiveTrip)?;
            let completed = CompletedTrip {
                request: active.request,
                accepted_at: active.accepted_at,
                completed_at: self.clock.now(),
            };
            completed
        };

        self.earnings_service.record_trip(&completed);
        self.trip_history.trip_completed(&completed);
        tracing::info!("Trip {} completed", completed.request.id);
        self.notify_passenger(NotificationMessage::trip_completed(&completed.request)).await;
        Ok(completed)
    }

    async fn active_trip(&self) -> Option<ActiveTrip> {
        self.state.lock().await.active.clone()
    }
}
