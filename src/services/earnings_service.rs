// src/services/earnings_service.rs
use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing;

use crate::{
    errors::{WizaError, WizaResult},
    models::{
        fare::PaymentMethod,
        trip::CompletedTrip,
        wallet::{ChartBucket, EarningEntry, EarningKind, EarningsPeriod, EarningsSummary, WithdrawalReceipt},
    },
    services::notification_service::{NotificationMessage, NotificationService, Recipient},
    utils::{
        clock::Clock,
        currency::format_kwanza,
        id_generator::{IdGenerator, IdType},
    },
};

const DAY_BUCKET_START_HOUR: u32 = 8;
const DAY_BUCKET_HOURS: u32 = 2;
const DAY_BUCKETS: usize = 6;
const WEEKDAY_LABELS: [&str; 7] = ["Seg", "Ter", "Qua", "Qui", "Sex", "Sáb", "Dom"];
const MONTH_BUCKETS: usize = 4;

const WITHDRAWAL_LABEL: &str = "Resgate Solicitado";

/// The driver's earnings ledger. Withdrawals are recorded alongside trip
/// earnings and reduce the available balance.
pub struct EarningsService {
    /// Newest first.
    entries: Mutex<Vec<EarningEntry>>,
    notification_service: Arc<dyn NotificationService>,
    clock: Arc<dyn Clock>,
}

impl EarningsService {
    pub fn new(clock: Arc<dyn Clock>, notification_service: Arc<dyn NotificationService>) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            notification_service,
            clock,
        }
    }

    pub fn with_demo_history(self) -> Self {
        let now = self.clock.now();
        let seed = [
            ("Maria Silva", PaymentMethod::Cash, 2500, EarningKind::Earning, Duration::minutes(30)),
            ("João Santos", PaymentMethod::WizaTds, 3200, EarningKind::Earning, Duration::minutes(105)),
            ("Ana Costa", PaymentMethod::DigitalWallet, 1800, EarningKind::Earning, Duration::minutes(150)),
            (WITHDRAWAL_LABEL, PaymentMethod::Cash, 15000, EarningKind::Withdrawal, Duration::hours(26)),
            ("Carlos Lima", PaymentMethod::Cash, 2800, EarningKind::Earning, Duration::hours(29)),
            ("Lucia Mendes", PaymentMethod::WizaTds, 2200, EarningKind::Earning, Duration::hours(31)),
            ("Pedro Neto", PaymentMethod::WizaTds, 9500, EarningKind::Earning, Duration::days(9)),
            ("Rosa Fernandes", PaymentMethod::Cash, 12000, EarningKind::Earning, Duration::days(12)),
        ];
        {
            let mut entries = self.lock();
            for (passenger, payment_method, amount, kind, ago) in seed {
                let recorded_at = now - ago;
                let id_type = match kind {
                    EarningKind::Earning => IdType::Earning,
                    EarningKind::Withdrawal => IdType::Withdrawal,
                };
                entries.push(EarningEntry {
                    id: IdGenerator::generate_with_timestamp(id_type, recorded_at),
                    passenger: passenger.to_string(),
                    payment_method,
                    amount,
                    kind,
                    recorded_at,
                });
            }
        }
        self
    }

    fn lock(&self) -> MutexGuard<'_, Vec<EarningEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn entries(&self) -> Vec<EarningEntry> {
        self.lock().clone()
    }

    pub fn record_trip(&self, trip: &CompletedTrip) -> EarningEntry {
        let entry = EarningEntry {
            id: IdGenerator::generate_with_timestamp(IdType::Earning, trip.completed_at),
            passenger: format!("{} → {}", trip.request.origin, trip.request.destination),
            payment_method: trip.request.payment_method,
            amount: trip.request.quoted_price,
            kind: EarningKind::Earning,
            recorded_at: trip.completed_at,
        };
        tracing::info!("Recorded earning {} for trip {}", format_kwanza(entry.amount), trip.request.id);
        self.lock().insert(0, entry.clone());
        entry
    }

    /// Rolling totals for the last 24 hours, 7 days and 30 days.
    pub fn summary(&self) -> EarningsSummary {
        let now = self.clock.now();
        let entries = self.lock();
        let total_since = |window: Duration| -> i64 {
            let since = now - window;
            entries
                .iter()
                .filter(|e| e.kind == EarningKind::Earning && e.recorded_at > since && e.recorded_at <= now)
                .fold(0, |total, e| total.saturating_add(e.amount))
        };
        EarningsSummary {
            day: total_since(Duration::hours(24)),
            week: total_since(Duration::days(7)),
            month: total_since(Duration::days(30)),
        }
    }

    pub fn chart(&self, period: EarningsPeriod) -> Vec<ChartBucket> {
        let now = self.clock.now();
        let entries = self.lock();
        let earnings = entries.iter().filter(|e| e.kind == EarningKind::Earning);

        let (labels, values): (Vec<String>, Vec<i64>) = match period {
            EarningsPeriod::Day => {
                let labels: Vec<String> = (0..DAY_BUCKETS as u32)
                    .map(|i| format!("{}h", DAY_BUCKET_START_HOUR + i * DAY_BUCKET_HOURS))
                    .collect();
                (labels, bucket(earnings, DAY_BUCKETS, |at| day_bucket(at, now)))
            }
            EarningsPeriod::Week => {
                let labels = WEEKDAY_LABELS.iter().map(|l| l.to_string()).collect();
                (labels, bucket(earnings, WEEKDAY_LABELS.len(), |at| week_bucket(at, now)))
            }
            EarningsPeriod::Month => {
                let labels = (1..=MONTH_BUCKETS).map(|i| format!("Sem {}", i)).collect();
                (labels, bucket(earnings, MONTH_BUCKETS, |at| month_bucket(at, now)))
            }
        };

        labels
            .into_iter()
            .zip(values)
            .map(|(label, value)| ChartBucket { label, value })
            .collect()
    }

    pub fn available_balance(&self) -> i64 {
        net_balance(&self.lock())
    }

    /// Withdraws `amount`, or the whole available balance when absent.
    pub async fn request_withdrawal(&self, method: PaymentMethod, amount: Option<i64>) -> WizaResult<WithdrawalReceipt> {
        let receipt = {
            let mut entries = self.lock();
            let available = net_balance(&entries);
            let amount = amount.unwrap_or(available);

            if amount <= 0 {
                return Err(WizaError::validation_error("amount", "nothing to withdraw"));
            }
            if amount > available {
                return Err(WizaError::InsufficientBalance {
                    available,
                    requested: amount,
                });
            }

            let now = self.clock.now();
            let id = IdGenerator::generate_with_timestamp(IdType::Withdrawal, now);
            entries.insert(
                0,
                EarningEntry {
                    id: id.clone(),
                    passenger: WITHDRAWAL_LABEL.to_string(),
                    payment_method: method,
                    amount,
                    kind: EarningKind::Withdrawal,
                    recorded_at: now,
                },
            );
            WithdrawalReceipt {
                id,
                method,
                amount,
                remaining_balance: available - amount,
                requested_at: now,
            }
        };

        tracing::info!("Withdrawal of {} requested via {}", format_kwanza(receipt.amount), receipt.method);
        if let Err(e) = self
            .notification_service
            .send(&Recipient::Driver, NotificationMessage::withdrawal_requested(&receipt))
            .await
        {
            tracing::warn!("Withdrawal notification failed: {}", e);
        }
        Ok(receipt)
    }
}

// Earnings minus withdrawals, clamped to the i64 range.
fn net_balance(entries: &[EarningEntry]) -> i64 {
    let net: i128 = entries
        .iter()
        .map(|e| match e.kind {
            EarningKind::Earning => i128::from(e.amount),
            EarningKind::Withdrawal => -i128::from(e.amount),
        })
        .sum();
    net.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

fn bucket<'a>(
    entries: impl Iterator<Item = &'a EarningEntry>,
    len: usize,
    index_of: impl Fn(DateTime<Utc>) -> Option<usize>,
) -> Vec<i64> {
    let mut values: Vec<i64> = vec![0; len];
    for entry in entries {
        if let Some(i) = index_of(entry.recorded_at).filter(|&i| i < len) {
            values[i] = values[i].saturating_add(entry.amount);
        }
    }
    values
}

// 8h covers 08:00-09:59, ..., 18h covers 18:00-19:59 of the current day.
fn day_bucket(at: DateTime<Utc>, now: DateTime<Utc>) -> Option<usize> {
    if at.date_naive() != now.date_naive() || at.hour() < DAY_BUCKET_START_HOUR {
        return None;
    }
    Some(((at.hour() - DAY_BUCKET_START_HOUR) / DAY_BUCKET_HOURS) as usize)
}

fn week_bucket(at: DateTime<Utc>, now: DateTime<Utc>) -> Option<usize> {
    let monday = now.date_naive() - Duration::days(now.weekday().num_days_from_monday() as i64);
    let offset = (at.date_naive() - monday).num_days();
    (0..7).contains(&offset).then_some(offset as usize)
}

// Days 1-7, 8-14, 15-21 and 22 onwards.
fn month_bucket(at: DateTime<Utc>, now: DateTime<Utc>) -> Option<usize> {
    if at.year() != now.year() || at.month() != now.month() {
        return None;
    }
    Some((((at.day() - 1) / 7) as usize).min(MONTH_BUCKETS - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trip::{TripRequest, TripRequestStatus};
    use crate::services::notification_service::LoggingNotificationService;
    use crate::utils::clock::ManualClock;
    use chrono::TimeZone;

    // Tuesday 26 August 2025, 15:00 UTC.
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 26, 15, 0, 0).unwrap()
    }

    fn service() -> EarningsService {
        EarningsService::new(Arc::new(ManualClock::new(now())), Arc::new(LoggingNotificationService))
            .with_demo_history()
    }

    fn trip(price: i64, completed_at: DateTime<Utc>) -> CompletedTrip {
        CompletedTrip {
            request: TripRequest {
                id: "trp-250826-aaaaa".to_string(),
                origin: "Viana".to_string(),
                destination: "Talatona".to_string(),
                estimated_time_min: 15,
                passengers: 1,
                payment_method: PaymentMethod::Cash,
                quoted_price: price,
                status: TripRequestStatus::Accepted,
                created_at: completed_at,
            },
            accepted_at: completed_at,
            completed_at,
        }
    }

    #[test]
    fn test_summary_uses_rolling_windows() {
        let summary = service().summary();
        assert_eq!(summary.day, 2500 + 3200 + 1800);
        assert_eq!(summary.week, 2500 + 3200 + 1800 + 2800 + 2200);
        assert_eq!(summary.month, 2500 + 3200 + 1800 + 2800 + 2200 + 9500 + 12000);
    }

    #[test]
    fn test_day_chart() {
        let chart = service().chart(EarningsPeriod::Day);
        let labels: Vec<_> = chart.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["8h", "10h", "12h", "14h", "16h", "18h"]);
        // 14:30 -> 14h; 13:15 and 12:30 -> 12h
        assert_eq!(chart[3].value, 2500);
        assert_eq!(chart[2].value, 3200 + 1800);
        assert_eq!(chart[4].value, 0);
    }

    #[test]
    fn test_week_and_month_charts() {
        let week = service().chart(EarningsPeriod::Week);
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].label, "Seg");
        assert_eq!(week[6].label, "Dom");
        assert_eq!(week[0].value, 2800 + 2200); // Monday
        assert_eq!(week[1].value, 2500 + 3200 + 1800); // Tuesday

        let month = service().chart(EarningsPeriod::Month);
        let labels: Vec<_> = month.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Sem 1", "Sem 2", "Sem 3", "Sem 4"]);
        assert_eq!(month[1].value, 12000); // 14 Aug
        assert_eq!(month[2].value, 9500); // 17 Aug
        assert_eq!(month[3].value, 2500 + 3200 + 1800 + 2800 + 2200);
    }

    #[tokio::test]
    async fn test_withdrawal_defaults_to_available_balance() {
        let service = service();
        let available = service.available_balance();
        assert_eq!(available, 19000);

        let receipt = service.request_withdrawal(PaymentMethod::DigitalWallet, None).await.unwrap();
        assert_eq!(receipt.amount, 19000);
        assert_eq!(receipt.remaining_balance, 0);
        assert_eq!(service.available_balance(), 0);

        let err = service.request_withdrawal(PaymentMethod::Cash, None).await.unwrap_err();
        assert!(matches!(err, WizaError::ValidationFailed(_)));
    }

    #[tokio::test]
    async fn test_withdrawal_bounds() {
        let service = service();
        assert!(matches!(
            service.request_withdrawal(PaymentMethod::Cash, Some(20000)).await,
            Err(WizaError::InsufficientBalance { available: 19000, .. })
        ));
        assert!(service.request_withdrawal(PaymentMethod::Cash, Some(-1)).await.is_err());

        let receipt = service.request_withdrawal(PaymentMethod::WizaTds, Some(4000)).await.unwrap();
        assert_eq!(receipt.remaining_balance, 15000);
        // Withdrawals never count as earnings
        assert_eq!(service.summary().day, 7500);
    }

    #[test]
    fn test_completed_trip_is_recorded() {
        let service = service();
        service.record_trip(&trip(1200, now()));
        assert_eq!(service.available_balance(), 20200);
        assert_eq!(service.entries()[0].passenger, "Viana → Talatona");
    }

    #[tokio::test]
    async fn test_oversized_earning_saturates_totals() {
        let service = service();
        service.record_trip(&trip(i64::MAX, now()));

        assert_eq!(service.available_balance(), i64::MAX);
        assert_eq!(service.summary().day, i64::MAX);
        assert_eq!(service.chart(EarningsPeriod::Day)[3].value, i64::MAX);

        let receipt = service.request_withdrawal(PaymentMethod::Cash, Some(1000)).await.unwrap();
        assert_eq!(receipt.remaining_balance, i64::MAX - 1000);
    }
}
