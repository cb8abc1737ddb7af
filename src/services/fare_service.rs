// src/services/fare_service.rs
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing;

use crate::{
    errors::{WizaError, WizaResult},
    models::fare::{FareQuote, FareQuoteRequest, PaymentMethod, PaymentMethodInfo},
    utils::currency::{CURRENCY_SYMBOL, format_kwanza, round_to_unit},
};

/// Pure price arithmetic shared by every quote source.
pub struct FareCalculator;

impl FareCalculator {
    /// `base x surge x (1 - discount/100)`, rounded to the nearest Kwanza.
    pub fn compute_final(base: f64, surge: Option<f64>, discount_percent: Option<f64>) -> WizaResult<i64> {
        Self::check_inputs(base, surge, discount_percent)?;
        let surge = surge.unwrap_or(1.0);
        let discount = discount_percent.unwrap_or(0.0);
        Ok(round_to_unit(base * surge * (1.0 - discount / 100.0)))
    }

    pub fn quote(request: &FareQuoteRequest) -> WizaResult<FareQuote> {
        let breakdown = request.breakdown();
        let final_price =
            Self::compute_final(breakdown.base_price, breakdown.surge_multiplier, breakdown.discount_percent)?;

        let base_price = round_to_unit(breakdown.base_price);
        let subtotal = round_to_unit(breakdown.base_price * breakdown.surge_multiplier.unwrap_or(1.0));

        Ok(FareQuote {
            payment_method: request.payment_method,
            base_price,
            surge_multiplier: breakdown.surge_multiplier,
            surge_amount: subtotal - base_price,
            subtotal,
            discount_percent: breakdown.discount_percent,
            discount_amount: subtotal - final_price,
            final_price,
            currency: CURRENCY_SYMBOL.to_string(),
            display_total: format_kwanza(final_price),
        })
    }

    pub fn payment_methods() -> Vec<PaymentMethodInfo> {
        PaymentMethod::ALL.into_iter().map(PaymentMethodInfo::from).collect()
    }

    fn check_inputs(base: f64, surge: Option<f64>, discount_percent: Option<f64>) -> WizaResult<()> {
        if !base.is_finite() || base < 0.0 {
            return Err(WizaError::validation_error("base_price", "must be a finite amount of at least 0"));
        }
        if surge.is_some_and(|s| !s.is_finite() || s < 1.0) {
            return Err(WizaError::validation_error("surge_multiplier", "must be at least 1.0"));
        }
        if discount_percent.is_some_and(|d| !(0.0..=100.0).contains(&d)) {
            return Err(WizaError::validation_error("discount_percent", "must be between 0 and 100"));
        }
        Ok(())
    }
}

/// Where quotes come from. The local source prices on-device; a remote
/// pricing backend would implement the same trait.
#[async_trait]
pub trait FareQuoteSource: Send + Sync {
    async fn fetch_quote(&self, request: &FareQuoteRequest) -> WizaResult<FareQuote>;
}

#[derive(Debug, Default)]
pub struct LocalFareSource;

#[async_trait]
impl FareQuoteSource for LocalFareSource {
    async fn fetch_quote(&self, request: &FareQuoteRequest) -> WizaResult<FareQuote> {
        FareCalculator::quote(request)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(2),
            attempt_timeout: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based), doubling each time.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff.saturating_mul(factor).min(self.max_backoff)
    }
}

pub struct FareService {
    source: Arc<dyn FareQuoteSource>,
    policy: RetryPolicy,
}

impl FareService {
    pub fn new(source: Arc<dyn FareQuoteSource>, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    pub fn local(policy: RetryPolicy) -> Self {
        Self::new(Arc::new(LocalFareSource), policy)
    }

    pub fn payment_methods(&self) -> Vec<PaymentMethodInfo> {
        FareCalculator::payment_methods()
    }

    pub async fn quote(&self, request: &FareQuoteRequest) -> WizaResult<FareQuote> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let result = match timeout(self.policy.attempt_timeout, self.source.fetch_quote(request)).await {
                Ok(result) => result,
                Err(_) => Err(WizaError::RequestTimedOut(format!(
                    "fare quote exceeded {}ms",
                    self.policy.attempt_timeout.as_millis()
                ))),
            };

            match result {
                Ok(quote) => {
                    tracing::debug!("Fare quote {} after {} attempt(s)", quote.display_total, attempt);
                    return Ok(quote);
                }
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    let delay = self.policy.backoff_for(attempt);
                    tracing::warn!(
                        "Fare quote attempt {}/{} failed: {}. Retrying in {:?}",
                        attempt,
                        max_attempts,
                        e,
                        delay
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::warn!("Fare quote failed after {} attempt(s): {}", attempt, e);
                    return Err(e);
                }
            }
        }
    }
}
