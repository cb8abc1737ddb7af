// src/models/checkin.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{WizaError, WizaResult};

pub const CHECKIN_CODE_LEN: usize = 6;

/// A boarding code: exactly six ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CheckInCode(String);

impl CheckInCode {
    pub fn parse(raw: &str) -> WizaResult<Self> {
        let code = raw.trim();
        if code.len() != CHECKIN_CODE_LEN || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(WizaError::validation_error("code", "O código deve ter 6 dígitos"));
        }
        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CheckInCode {
    type Error = WizaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CheckInCode> for String {
    fn from(code: CheckInCode) -> Self {
        code.0
    }
}

impl fmt::Display for CheckInCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckInStatus {
    Confirmed,
    Error,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PassengerHistoryEntry {
    pub id: String,
    pub name: String,
    pub checked_in_at: DateTime<Utc>,
    pub status: CheckInStatus,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CheckInOutcome {
    Confirmed { title: String, passenger_name: String },
    Rejected { title: String, reason: String },
}

impl CheckInOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, CheckInOutcome::Confirmed { .. })
    }
}

/// What the QR decoder read off the camera frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanResult {
    Passenger { name: String },
    Unreadable,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum CheckInPhase {
    Scanning,
    Validating,
    Feedback { outcome: CheckInOutcome },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ManualCheckInRequest {
    pub code: String,
}
