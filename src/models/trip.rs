// src/models/trip.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{ValidationErrors, WizaResult};
use crate::models::fare::PaymentMethod;
use crate::utils::currency::{MAX_AMOUNT, format_kwanza};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TripRequestStatus {
    Pending,  // Shown to the driver, awaiting a decision
    Accepted, // Driver took it; becomes the active trip
    Rejected, // Driver declined
}

/// A ride request as offered to a driver by dispatch.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TripRequest {
    pub id: String,
    pub origin: String,
    pub destination: String,
    pub estimated_time_min: u32,
    pub passengers: u8,
    pub payment_method: PaymentMethod,
    pub quoted_price: i64,
    pub status: TripRequestStatus,
    pub created_at: DateTime<Utc>,
}

impl TripRequest {
    pub fn display_price(&self) -> String {
        format_kwanza(self.quoted_price)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NewTripRequest {
    pub origin: String,
    pub destination: String,
    pub estimated_time_min: u32,
    pub passengers: u8,
    pub payment_method: PaymentMethod,
    pub quoted_price: i64,
}

impl NewTripRequest {
    pub fn validate(&self) -> WizaResult<()> {
        let mut errors = ValidationErrors::new();
        errors.require_non_blank("origin", &self.origin);
        errors.require_non_blank("destination", &self.destination);
        if self.passengers == 0 {
            errors.add("passengers", "must be at least 1");
        }
        if self.quoted_price < 0 {
            errors.add("quoted_price", "must not be negative");
        } else if self.quoted_price > MAX_AMOUNT {
            errors.add("quoted_price", &format!("must not exceed {}", format_kwanza(MAX_AMOUNT)));
        }
        errors.into_result()
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct TripRejection {
    pub reason: Option<String>,
}

/// The trip a driver is currently serving.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ActiveTrip {
    pub request: TripRequest,
    pub accepted_at: DateTime<Utc>,
    pub boarded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CompletedTrip {
    pub request: TripRequest,
    pub accepted_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TripHistoryStatus {
    Completed,
    Cancelled,
    InProgress,
}

impl TripHistoryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TripHistoryStatus::Completed => "Concluída",
            TripHistoryStatus::Cancelled => "Cancelada",
            TripHistoryStatus::InProgress => "Em andamento",
        }
    }
}

/// Tabs of the passenger's trip list.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TripsTab {
    #[default]
    Recent,   // Finished or cancelled, newest first
    Upcoming, // Still running, soonest first
}

impl TripsTab {
    pub fn includes(&self, status: TripHistoryStatus) -> bool {
        match self {
            TripsTab::Recent => status != TripHistoryStatus::InProgress,
            TripsTab::Upcoming => status == TripHistoryStatus::InProgress,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AssignedDriver {
    pub name: String,
    pub vehicle_model: String,
    pub plate_number: String,
}

/// One row of the passenger's trip history.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PassengerTrip {
    pub id: String,
    /// Unknown for trips dispatched to this device's driver.
    pub driver: Option<AssignedDriver>,
    pub origin: String,
    pub destination: String,
    pub scheduled_at: DateTime<Utc>,
    pub price: i64,
    pub display_price: String,
    pub distance_km: Option<f64>,
    pub duration_min: u32,
    pub status: TripHistoryStatus,
    pub status_label: String,
    pub rating: Option<u8>,
    pub payment_method: PaymentMethod,
}

impl PassengerTrip {
    pub fn from_request(request: &TripRequest, status: TripHistoryStatus, at: DateTime<Utc>) -> Self {
        Self {
            id: request.id.clone(),
            driver: None,
            origin: request.origin.clone(),
            destination: request.destination.clone(),
            scheduled_at: at,
            price: request.quoted_price,
            display_price: request.display_price(),
            distance_km: None,
            duration_min: request.estimated_time_min,
            status,
            status_label: status.label().to_string(),
            rating: None,
            payment_method: request.payment_method,
        }
    }

    pub fn set_status(&mut self, status: TripHistoryStatus) {
        self.status = status;
        self.status_label = status.label().to_string();
    }
}

/// Requests the demo server starts with, standing in for live dispatch.
pub fn demo_requests() -> Vec<NewTripRequest> {
    vec![
        NewTripRequest {
            origin: "Maianga".to_string(),
            destination: "Miramar".to_string(),
            estimated_time_min: 8,
            passengers: 2,
            payment_method: PaymentMethod::WizaTds,
            quoted_price: 850,
        },
        NewTripRequest {
            origin: "Viana".to_string(),
            destination: "Talatona".to_string(),
            estimated_time_min: 15,
            passengers: 1,
            payment_method: PaymentMethod::Cash,
            quoted_price: 1200,
        },
        NewTripRequest {
            origin: "Cacuaco".to_string(),
            destination: "Centro".to_string(),
            estimated_time_min: 25,
            passengers: 3,
            payment_method: PaymentMethod::WizaTds,
            quoted_price: 1500,
        },
    ]
}
