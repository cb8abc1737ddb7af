// src/state.rs
use rand::{SeedableRng, rngs::StdRng};
use std::sync::Arc;
use tracing;

use crate::{
    config::AppConfig,
    errors::WizaResult,
    models::trip::demo_requests,
    services::{
        CheckInService, CheckInValidator, DriverOperations, DriverService, EarningsService, FareService,
        LoggingNotificationService, NotificationService, SafetyService, ScanDecoder, SimulatedScanDecoder,
        TripHistoryService, WalletService,
    },
    utils::clock::{Clock, SystemClock},
};

pub struct AppState {
    pub driver_service: Arc<DriverService>,
    pub fare_service: Arc<FareService>,
    pub checkin_service: Arc<CheckInService>,
    pub wallet_service: Arc<WalletService>,
    pub earnings_service: Arc<EarningsService>,
    pub safety_service: Arc<SafetyService>,
    pub trip_history_service: Arc<TripHistoryService>,
    pub notification_service: Arc<dyn NotificationService>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        tracing::warn!("No push provider configured, notifications are logged only");
        let decoder = SimulatedScanDecoder::new(StdRng::from_os_rng(), config.scan_success_rate);
        Self::with_services(
            config,
            Arc::new(SystemClock),
            Arc::new(LoggingNotificationService),
            Box::new(decoder),
        )
    }

    /// Wires every service around the given seams.
    pub fn with_services(
        config: AppConfig,
        clock: Arc<dyn Clock>,
        notification_service: Arc<dyn NotificationService>,
        scan_decoder: Box<dyn ScanDecoder>,
    ) -> Self {
        let earnings_service =
            Arc::new(EarningsService::new(clock.clone(), notification_service.clone()).with_demo_history());
        let wallet_service = Arc::new(
            WalletService::new(clock.clone(), notification_service.clone(), config.wallet_opening_balance)
                .with_demo_history(),
        );
        let trip_history_service = Arc::new(TripHistoryService::new(clock.clone()).with_demo_history());
        let driver_service = Arc::new(DriverService::new(
            clock.clone(),
            earnings_service.clone(),
            wallet_service.clone(),
            trip_history_service.clone(),
            notification_service.clone(),
        ));
        let fare_service = Arc::new(FareService::local(config.retry_policy()));
        let checkin_service = Arc::new(CheckInService::new(
            CheckInValidator::new(config.checkin_codes.iter().cloned(), clock.clone()).with_demo_history(),
            scan_decoder,
            config.scan_delay,
        ));
        let safety_service = Arc::new(SafetyService::new(clock, notification_service.clone()).with_demo_contacts());

        Self {
            driver_service,
            fare_service,
            checkin_service,
            wallet_service,
            earnings_service,
            safety_service,
            trip_history_service,
            notification_service,
            config,
        }
    }

    /// Fills the driver's queue with the sample requests dispatch would send.
    pub async fn seed_demo_requests(&self) -> WizaResult<()> {
        for request in demo_requests() {
            self.driver_service.enqueue_request(request).await?;
        }
        Ok(())
    }
}
