// src/models/driver.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    #[default]
    Available, // Visible to passengers, taxi filling up
    OnWay,     // Heading to pick up a passenger
    Busy,      // Taxi full, on a trip
}

impl DriverStatus {
    /// Order used when the driver taps the status card.
    pub const CYCLE: [DriverStatus; 3] = [DriverStatus::Available, DriverStatus::OnWay, DriverStatus::Busy];

    pub fn next(self) -> Self {
        match self {
            DriverStatus::Available => DriverStatus::OnWay,
            DriverStatus::OnWay => DriverStatus::Busy,
            DriverStatus::Busy => DriverStatus::Available,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DriverStatus::Available => "available",
            DriverStatus::OnWay => "on_way",
            DriverStatus::Busy => "busy",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DriverStatus::Available => "Disponível (A Lotar)",
            DriverStatus::OnWay => "A Caminho",
            DriverStatus::Busy => "Táxi Cheio",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DriverStatus::Available => "Você está visível para passageiros",
            DriverStatus::OnWay => "Indo buscar passageiro",
            DriverStatus::Busy => "Em viagem com passageiros",
        }
    }
}

impl fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DriverStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::CYCLE
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown driver status '{}'", s))
    }
}

/// Who asked for a status change.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatusChangeSource {
    Driver,
    TripAccepted,
    PassengerBoarded,
    TripCompleted,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DriverStatusSnapshot {
    pub status: DriverStatus,
    pub label: String,
    pub description: String,
    pub changed_at: DateTime<Utc>,
    pub seconds_in_status: i64,
    pub active_trip_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DriverStatusUpdate {
    pub status: DriverStatus,
}
