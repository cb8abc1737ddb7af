// src/services/driver_status.rs
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing;

use crate::{
    errors::{WizaError, WizaResult},
    models::driver::{DriverStatus, DriverStatusSnapshot, StatusChangeSource},
    utils::clock::Clock,
};

/// Owns a driver's availability and the trip currently holding it.
///
/// Driver taps may move freely between the three states, except that while
/// a trip is active only trip completion can make the driver available.
pub struct DriverStatusController {
    status: DriverStatus,
    changed_at: DateTime<Utc>,
    active_trip_id: Option<String>,
    clock: Arc<dyn Clock>,
}

impl DriverStatusController {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let changed_at = clock.now();
        Self {
            status: DriverStatus::default(),
            changed_at,
            active_trip_id: None,
            clock,
        }
    }

    pub fn status(&self) -> DriverStatus {
        self.status
    }

    pub fn active_trip_id(&self) -> Option<&str> {
        self.active_trip_id.as_deref()
    }

    pub fn time_in_status(&self) -> chrono::Duration {
        self.clock.now() - self.changed_at
    }

    pub fn snapshot(&self) -> DriverStatusSnapshot {
        DriverStatusSnapshot {
            status: self.status,
            label: self.status.label().to_string(),
            description: self.status.description().to_string(),
            changed_at: self.changed_at,
            seconds_in_status: self.time_in_status().num_seconds(),
            active_trip_id: self.active_trip_id.clone(),
        }
    }

    /// available -> on_way -> busy -> available
    pub fn cycle_status(&mut self) -> WizaResult<DriverStatus> {
        let next = self.status.next();
        self.check_driver_transition(next)?;
        self.apply(next, StatusChangeSource::Driver);
        Ok(next)
    }

    /// Setting the current status is a no-op and keeps the timer running.
    pub fn set_status(&mut self, target: DriverStatus) -> WizaResult<DriverStatus> {
        if target == self.status {
            return Ok(target);
        }
        self.check_driver_transition(target)?;
        self.apply(target, StatusChangeSource::Driver);
        Ok(target)
    }

    /// Trip accepted: the driver heads to the pickup.
    /// Fails unless the driver is available with no trip running.
    pub fn ensure_can_begin_trip(&self) -> WizaResult<()> {
        if let Some(active) = &self.active_trip_id {
            return Err(WizaError::TripAlreadyActive(active.clone()));
        }
        if self.status != DriverStatus::Available {
            return Err(WizaError::DriverNotAvailable(self.status));
        }
        Ok(())
    }

    pub fn begin_trip(&mut self, trip_id: &str) -> WizaResult<()> {
        self.ensure_can_begin_trip()?;
        self.active_trip_id = Some(trip_id.to_string());
        self.apply(DriverStatus::OnWay, StatusChangeSource::TripAccepted);
        Ok(())
    }

    pub fn passenger_boarded(&mut self) -> WizaResult<()> {
        if self.active_trip_id.is_none() {
            return Err(WizaError::NoActiveTrip);
        }
        if self.status != DriverStatus::Busy {
            self.apply(DriverStatus::Busy, StatusChangeSource::PassengerBoarded);
        }
        Ok(())
    }

    /// The only way back to `available` once a trip is running.
    pub fn complete_trip(&mut self) -> WizaResult<String> {
        let trip_id = self.active_trip_id.take().ok_or(WizaError::NoActiveTrip)?;
        self.apply(DriverStatus::Available, StatusChangeSource::TripCompleted);
        Ok(trip_id)
    }

    fn check_driver_transition(&self, target: DriverStatus) -> WizaResult<()> {
        if target == DriverStatus::Available && self.active_trip_id.is_some() {
            return Err(WizaError::InvalidStatusTransition {
                from: self.status,
                to: target,
                reason: "trip in progress; complete the trip first".to_string(),
            });
        }
        Ok(())
    }

    fn apply(&mut self, status: DriverStatus, source: StatusChangeSource) {
        tracing::info!("Driver status {} -> {} ({:?})", self.status, status, source);
        self.status = status;
        self.changed_at = self.clock.now();
    }
}
