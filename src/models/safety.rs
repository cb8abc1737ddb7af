// src/models/safety.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{ValidationErrors, WizaResult};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EmergencyContact {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub relationship: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewEmergencyContact {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub relationship: String,
}

impl NewEmergencyContact {
    pub fn validate(&self) -> WizaResult<()> {
        let mut errors = ValidationErrors::new();
        errors.require_non_blank("name", &self.name);
        errors.require_non_blank("phone", &self.phone);
        let digits = self.phone.chars().filter(|c| c.is_ascii_digit()).count();
        if !self.phone.trim().is_empty() && digits < 3 {
            errors.add("phone", "must contain at least 3 digits");
        }
        errors.into_result()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct SosRequest {
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SosAlert {
    pub id: String,
    pub sent_at: DateTime<Utc>,
    pub location: Option<GeoPoint>,
    pub contacts_notified: usize,
    pub contacts_failed: usize,
}
