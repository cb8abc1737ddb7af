// src/services/trip_history_service.rs
use chrono::Duration;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing;

use crate::{
    models::{
        fare::PaymentMethod,
        trip::{AssignedDriver, CompletedTrip, PassengerTrip, TripHistoryStatus, TripRequest, TripsTab},
    },
    utils::{
        clock::Clock,
        currency::format_kwanza,
        id_generator::{IdGenerator, IdType},
    },
};

/// The passenger's trips: running ones under "upcoming", finished and
/// cancelled ones under "recent".
pub struct TripHistoryService {
    trips: Mutex<Vec<PassengerTrip>>,
    clock: Arc<dyn Clock>,
}

impl TripHistoryService {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            trips: Mutex::new(Vec::new()),
            clock,
        }
    }

    pub fn with_demo_history(self) -> Self {
        let now = self.clock.now();
        let seed = [
            (
                ("João Santos", "Toyota Corolla", "LD-45-78-KZ"),
                ("Maianga", "Miramar"),
                -Duration::hours(2),
                (850, 5.2, 12),
                TripHistoryStatus::Completed,
                Some(5),
                PaymentMethod::WizaTds,
            ),
            (
                ("Maria Costa", "Hyundai HB20", "LD-78-92-AN"),
                ("Viana", "Talatona"),
                -Duration::hours(29),
                (1200, 12.8, 18),
                TripHistoryStatus::Completed,
                Some(4),
                PaymentMethod::Cash,
            ),
            (
                ("Pedro Alves", "Kia Rio", "LD-33-56-LU"),
                ("Cacuaco", "Centro"),
                -Duration::days(3),
                (1500, 18.5, 25),
                TripHistoryStatus::Cancelled,
                None,
                PaymentMethod::WizaTds,
            ),
            (
                ("Carlos Silva", "Nissan March", "LD-12-34-BG"),
                ("Casa", "Aeroporto"),
                Duration::hours(15),
                (2500, 25.0, 35),
                TripHistoryStatus::InProgress,
                None,
                PaymentMethod::WizaTds,
            ),
        ];
        {
            let mut trips = self.lock();
            for ((name, vehicle, plate), (origin, destination), offset, (price, km, minutes), status, rating, method) in
                seed
            {
                let scheduled_at = now + offset;
                trips.push(PassengerTrip {
                    id: IdGenerator::generate_with_timestamp(IdType::Trip, scheduled_at),
                    driver: Some(AssignedDriver {
                        name: name.to_string(),
                        vehicle_model: vehicle.to_string(),
                        plate_number: plate.to_string(),
                    }),
                    origin: origin.to_string(),
                    destination: destination.to_string(),
                    scheduled_at,
                    price,
                    display_price: format_kwanza(price),
                    distance_km: Some(km),
                    duration_min: minutes,
                    status,
                    status_label: status.label().to_string(),
                    rating,
                    payment_method: method,
                });
            }
        }
        self
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PassengerTrip>> {
        self.trips.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Recent trips newest first; upcoming trips soonest first.
    pub fn list(&self, tab: TripsTab) -> Vec<PassengerTrip> {
        let mut trips: Vec<PassengerTrip> = self.lock().iter().filter(|t| tab.includes(t.status)).cloned().collect();
        match tab {
            TripsTab::Recent => trips.sort_by(|a, b| b.scheduled_at.cmp(&a.scheduled_at)),
            TripsTab::Upcoming => trips.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at)),
        }
        trips
    }

    pub fn trip_started(&self, request: &TripRequest) {
        let trip = PassengerTrip::from_request(request, TripHistoryStatus::InProgress, self.clock.now());
        tracing::debug!("Trip {} in progress", trip.id);
        self.upsert(trip);
    }

    pub fn trip_completed(&self, completed: &CompletedTrip) {
        let mut trips = self.lock();
        match trips.iter_mut().find(|t| t.id == completed.request.id) {
            Some(trip) => trip.set_status(TripHistoryStatus::Completed),
            None => trips.push(PassengerTrip::from_request(
                &completed.request,
                TripHistoryStatus::Completed,
                completed.accepted_at,
            )),
        }
        tracing::debug!("Trip {} completed", completed.request.id);
    }

    pub fn trip_cancelled(&self, request: &TripRequest) {
        let trip = PassengerTrip::from_request(request, TripHistoryStatus::Cancelled, self.clock.now());
        tracing::debug!("Trip {} cancelled", trip.id);
        self.upsert(trip);
    }

    fn upsert(&self, trip: PassengerTrip) {
        let mut trips = self.lock();
        match trips.iter_mut().find(|t| t.id == trip.id) {
            Some(existing) => *existing = trip,
            None => trips.push(trip),
        }
    }
}
