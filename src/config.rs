// src/config.rs
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::{
    errors::{WizaError, WizaResult},
    models::checkin::CheckInCode,
    services::{checkin_service::DEFAULT_SCAN_SUCCESS_RATE, fare_service::RetryPolicy, wallet_service::DEFAULT_OPENING_BALANCE},
};

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    pub checkin_codes: Vec<String>,
    pub scan_delay: Duration,
    pub scan_success_rate: f64,
    pub fare_max_attempts: u32,
    pub fare_backoff: Duration,
    pub fare_timeout: Duration,
    pub wallet_opening_balance: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            checkin_codes: vec!["123456".to_string(), "654321".to_string()],
            scan_delay: Duration::from_millis(1000),
            scan_success_rate: DEFAULT_SCAN_SUCCESS_RATE,
            fare_max_attempts: 3,
            fare_backoff: Duration::from_millis(200),
            fare_timeout: Duration::from_millis(2000),
            wallet_opening_balance: DEFAULT_OPENING_BALANCE,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; missing or unparsable values
    /// fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            port: parse_or(&lookup, "PORT", defaults.port),
            checkin_codes: lookup("CHECKIN_CODES")
                .map(|v| {
                    v.split(',')
                        .map(|c| c.trim().to_string())
                        .filter(|c| !c.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.checkin_codes),
            scan_delay: parsed("SCAN_DELAY_MS").map(Duration::from_millis).unwrap_or(defaults.scan_delay),
            scan_success_rate: parse_or(&lookup, "SCAN_SUCCESS_RATE", defaults.scan_success_rate),
            fare_max_attempts: parse_or(&lookup, "FARE_MAX_ATTEMPTS", defaults.fare_max_attempts),
            fare_backoff: parsed("FARE_BACKOFF_MS").map(Duration::from_millis).unwrap_or(defaults.fare_backoff),
            fare_timeout: parsed("FARE_TIMEOUT_MS").map(Duration::from_millis).unwrap_or(defaults.fare_timeout),
            wallet_opening_balance: parse_or(&lookup, "WALLET_OPENING_BALANCE", defaults.wallet_opening_balance),
        }
    }

    pub fn validate(&self) -> WizaResult<()> {
        if self.checkin_codes.is_empty() {
            return Err(WizaError::InvalidConfiguration("CHECKIN_CODES must list at least one code".to_string()));
        }
        for code in &self.checkin_codes {
            CheckInCode::parse(code).map_err(|_| {
                WizaError::InvalidConfiguration(format!("CHECKIN_CODES entry '{}' is not 6 digits", code))
            })?;
        }
        if !(0.0..=1.0).contains(&self.scan_success_rate) {
            return Err(WizaError::InvalidConfiguration(format!(
                "SCAN_SUCCESS_RATE must be between 0 and 1, got {}",
                self.scan_success_rate
            )));
        }
        if self.fare_max_attempts == 0 {
            return Err(WizaError::InvalidConfiguration("FARE_MAX_ATTEMPTS must be at least 1".to_string()));
        }
        if self.fare_timeout.is_zero() {
            return Err(WizaError::InvalidConfiguration("FARE_TIMEOUT_MS must be positive".to_string()));
        }
        if self.wallet_opening_balance < 0 {
            return Err(WizaError::InvalidConfiguration("WALLET_OPENING_BALANCE must not be negative".to_string()));
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.fare_max_attempts,
            initial_backoff: self.fare_backoff,
            max_backoff: self.fare_backoff.saturating_mul(8),
            attempt_timeout: self.fare_timeout,
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key).and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
