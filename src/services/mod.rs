// src/services/mod.rs
pub mod checkin_service;
pub mod driver_service;
pub mod driver_status;
pub mod earnings_service;
pub mod fare_service;
pub mod notification_service;
pub mod safety_service;
pub mod trip_history_service;
pub mod trip_queue;
pub mod wallet_service;

pub use checkin_service::{CheckInService, CheckInValidator, ScanDecoder, SimulatedScanDecoder};
pub use driver_service::{DriverOperations, DriverService};
pub use earnings_service::EarningsService;
pub use fare_service::{FareCalculator, FareQuoteSource, FareService, RetryPolicy};
pub use notification_service::{LoggingNotificationService, NotificationService};
pub use safety_service::SafetyService;
pub use trip_history_service::TripHistoryService;
pub use wallet_service::WalletService;
