use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::driver::DriverStatus;

/// Main error type for the wiza core service
#[derive(Debug)]
pub enum WizaError {
    NotFound(String),

    // Validation errors
    ValidationFailed(Vec<ValidationError>),

    // Driver and trip lifecycle errors
    InvalidStatusTransition { from: DriverStatus, to: DriverStatus, reason: String },
    DriverNotAvailable(DriverStatus),
    TripRequestNotFound(String),
    TripAlreadyActive(String),
    NoActiveTrip,

    // Check-in errors
    ScannerNotActive,

    // Wallet and earnings errors
    InsufficientBalance { available: i64, requested: i64 },

    // Upstream call errors
    RequestTimedOut(String),
    RequestRejected(String),
    ServiceUnavailable(String),
    NotificationFailed(String),

    // Serialization
    JsonParsing(String),
    JsonSerialization(String),

    // Configuration
    InvalidConfiguration(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl fmt::Display for WizaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WizaError::NotFound(msg) => write!(f, "Not found: {}", msg),

            WizaError::ValidationFailed(errors) => match errors.as_slice() {
                [single] => write!(f, "Validation failed: {}: {}", single.field, single.message),
                _ => write!(f, "Validation failed: {} errors", errors.len()),
            },

            WizaError::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Cannot change driver status from {} to {}: {}", from, to, reason)
            }
            WizaError::DriverNotAvailable(status) => {
                write!(f, "Driver is not available (current status: {})", status)
            }
            WizaError::TripRequestNotFound(id) => write!(f, "Trip request not found: {}", id),
            WizaError::TripAlreadyActive(id) => write!(f, "Driver already has an active trip: {}", id),
            WizaError::NoActiveTrip => write!(f, "Driver has no active trip"),

            WizaError::ScannerNotActive => write!(f, "Scanner is not active"),

            WizaError::InsufficientBalance { available, requested } => write!(
                f,
                "Insufficient balance: requested {} but only {} available",
                requested, available
            ),

            WizaError::RequestTimedOut(msg) => write!(f, "Request timed out: {}", msg),
            WizaError::RequestRejected(msg) => write!(f, "Request rejected: {}", msg),
            WizaError::ServiceUnavailable(service) => write!(f, "Service unavailable: {}", service),
            WizaError::NotificationFailed(msg) => write!(f, "Notification failed: {}", msg),

            WizaError::JsonParsing(msg) => write!(f, "JSON parsing error: {}", msg),
            WizaError::JsonSerialization(msg) => write!(f, "JSON serialization error: {}", msg),

            WizaError::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for WizaError {}

impl IntoResponse for WizaError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match self {
            WizaError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),

            WizaError::ValidationFailed(errors) => {
                let details = serde_json::to_value(&errors).ok();
                (StatusCode::BAD_REQUEST, "validation_failed", "Validation errors occurred".to_string(), details)
            }

            err @ WizaError::InvalidStatusTransition { .. } => {
                (StatusCode::CONFLICT, "invalid_status_transition", err.to_string(), None)
            }
            err @ WizaError::DriverNotAvailable(_) => {
                (StatusCode::CONFLICT, "driver_not_available", err.to_string(), None)
            }
            WizaError::TripRequestNotFound(id) => {
                (StatusCode::NOT_FOUND, "trip_request_not_found", format!("Trip request not found: {}", id), None)
            }
            err @ WizaError::TripAlreadyActive(_) => (StatusCode::CONFLICT, "trip_already_active", err.to_string(), None),
            WizaError::NoActiveTrip => (StatusCode::CONFLICT, "no_active_trip", "Driver has no active trip".to_string(), None),
            WizaError::ScannerNotActive => (StatusCode::CONFLICT, "scanner_not_active", "Scanner is not active".to_string(), None),
            err @ WizaError::InsufficientBalance { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "insufficient_balance", err.to_string(), None)
            }

            WizaError::RequestTimedOut(msg) => (StatusCode::GATEWAY_TIMEOUT, "request_timed_out", msg, None),
            WizaError::RequestRejected(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "request_rejected", msg, None),
            WizaError::ServiceUnavailable(service) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", format!("Service unavailable: {}", service), None)
            }

            WizaError::JsonParsing(msg) => (StatusCode::BAD_REQUEST, "invalid_json", msg, None),

            // All other errors are treated as internal server errors
            other => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", other.to_string(), None),
        };

        let error_response = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, axum::Json(error_response)).into_response()
    }
}

// Convenience type alias for Results
pub type WizaResult<T> = Result<T, WizaError>;

impl From<serde_json::Error> for WizaError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() || err.is_eof() {
            WizaError::JsonParsing(err.to_string())
        } else {
            WizaError::JsonSerialization(err.to_string())
        }
    }
}

impl WizaError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        WizaError::NotFound(resource.into())
    }

    pub fn validation_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        WizaError::ValidationFailed(vec![ValidationError {
            field: field.into(),
            message: message.into(),
        }])
    }

    /// Failures worth retrying: the same request may succeed later.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            WizaError::RequestTimedOut(_) | WizaError::ServiceUnavailable(_)
        )
    }

    pub fn validation_errors(&self) -> Option<&[ValidationError]> {
        match self {
            WizaError::ValidationFailed(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Collects field errors so a form reports every problem at once.
#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.errors.push(ValidationError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn require_non_blank(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "must not be empty");
        }
    }

    pub fn into_result(self) -> WizaResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(WizaError::ValidationFailed(self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = WizaError::TripRequestNotFound("trp-250901-abc12".to_string());
        assert_eq!(error.to_string(), "Trip request not found: trp-250901-abc12");

        let error = WizaError::InvalidStatusTransition {
            from: DriverStatus::Busy,
            to: DriverStatus::Available,
            reason: "trip in progress".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Cannot change driver status from busy to available: trip in progress"
        );
    }

    #[test]
    fn test_validation_error() {
        let error = WizaError::validation_error("code", "must have 6 digits");
        match error {
            WizaError::ValidationFailed(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "code");
                assert_eq!(errors[0].message, "must have 6 digits");
            }
            _ => panic!("Expected ValidationFailed error"),
        }
    }

    #[test]
    fn test_transient_classification() {
        assert!(WizaError::RequestTimedOut("quote".into()).is_transient());
        assert!(WizaError::ServiceUnavailable("dispatch".into()).is_transient());
        assert!(!WizaError::RequestRejected("quote".into()).is_transient());
        assert!(!WizaError::validation_error("surge", "too low").is_transient());
    }

    #[test]
    fn test_collected_validation_errors() {
        let mut errors = ValidationErrors::new();
        errors.require_non_blank("email", "  ");
        errors.require_non_blank("password", "secret");
        errors.add("phone", "invalid");

        let err = errors.into_result().unwrap_err();
        let fields: Vec<_> = err
            .validation_errors()
            .unwrap()
            .iter()
            .map(|e| e.field.as_str())
            .collect();
        assert_eq!(fields, vec!["email", "phone"]);

        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn test_status_codes() {
        let response = WizaError::validation_error("amount", "must be positive").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = WizaError::RequestTimedOut("fare quote".into()).into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);

        let response = WizaError::NoActiveTrip.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
