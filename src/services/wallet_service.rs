// src/services/wallet_service.rs
use chrono::Duration;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing;

use crate::{
    errors::{WizaError, WizaResult},
    models::wallet::{TransactionKind, WalletSummary, WalletTransaction},
    services::notification_service::{NotificationMessage, NotificationService, Recipient},
    utils::{
        clock::Clock,
        currency::{MAX_AMOUNT, format_kwanza, round_to_unit},
        id_generator::{IdGenerator, IdType},
    },
};

pub const DEFAULT_OPENING_BALANCE: i64 = 2450;

struct WalletState {
    balance: i64,
    /// Newest first.
    transactions: Vec<WalletTransaction>,
}

/// The passenger's in-app TDS wallet.
pub struct WalletService {
    state: Mutex<WalletState>,
    notification_service: Arc<dyn NotificationService>,
    clock: Arc<dyn Clock>,
}

impl WalletService {
    pub fn new(clock: Arc<dyn Clock>, notification_service: Arc<dyn NotificationService>, opening_balance: i64) -> Self {
        Self {
            state: Mutex::new(WalletState {
                balance: opening_balance,
                transactions: Vec::new(),
            }),
            notification_service,
            clock,
        }
    }

    /// Past activity already reflected in the opening balance.
    pub fn with_demo_history(self) -> Self {
        let now = self.clock.now();
        let history = [
            (TransactionKind::Payment, -850, "Viagem Maianga → Miramar", 0),
            (TransactionKind::Payment, -1200, "Viagem Viana → Talatona", 1),
            (TransactionKind::Bonus, 500, "Bónus primeira viagem", 3),
            (TransactionKind::Refund, 300, "Reembolso viagem cancelada", 4),
        ];
        {
            let mut state = self.lock();
            state.transactions = history
                .into_iter()
                .map(|(kind, amount, description, days_ago)| {
                    let created_at = now - Duration::days(days_ago);
                    WalletTransaction {
                        id: IdGenerator::generate_with_timestamp(IdType::Transaction, created_at),
                        kind,
                        amount,
                        description: description.to_string(),
                        created_at,
                    }
                })
                .collect();
        }
        self
    }

    fn lock(&self) -> MutexGuard<'_, WalletState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn balance(&self) -> i64 {
        self.lock().balance
    }

    pub fn summary(&self) -> WalletSummary {
        let state = self.lock();
        WalletSummary {
            balance: state.balance,
            display_balance: format_kwanza(state.balance),
            transactions: state.transactions.clone(),
        }
    }

    /// Loads credit from the raw text the passenger typed.
    pub async fn top_up(&self, raw_amount: &str) -> WizaResult<WalletTransaction> {
        let amount = parse_top_up_amount(raw_amount)?;

        let (transaction, balance) = {
            let mut state = self.lock();
            let balance = state
                .balance
                .checked_add(amount)
                .ok_or_else(|| WizaError::validation_error("amount", "O saldo máximo da carteira foi atingido"))?;
            let transaction = self.transaction(TransactionKind::TopUp, amount, "Recarga TDS".to_string());
            state.balance = balance;
            state.transactions.insert(0, transaction.clone());
            (transaction, state.balance)
        };

        tracing::info!("Wallet topped up by {}; balance {}", format_kwanza(amount), format_kwanza(balance));
        if let Err(e) = self
            .notification_service
            .send(&Recipient::Passenger, NotificationMessage::top_up(&transaction, balance))
            .await
        {
            tracing::warn!("Top-up notification failed: {}", e);
        }
        Ok(transaction)
    }

    /// Pays a trip fare from the wallet.
    pub fn charge_trip(&self, amount: i64, description: &str) -> WizaResult<WalletTransaction> {
        if amount <= 0 {
            return Err(WizaError::validation_error("amount", "must be greater than zero"));
        }

        let mut state = self.lock();
        if amount > state.balance {
            tracing::warn!("Wallet charge of {} refused; balance {}", amount, state.balance);
            return Err(WizaError::InsufficientBalance {
                available: state.balance,
                requested: amount,
            });
        }

        let transaction = self.transaction(TransactionKind::Payment, -amount, description.to_string());
        state.balance -= amount;
        state.transactions.insert(0, transaction.clone());
        tracing::info!("Wallet charged {} for {}", format_kwanza(amount), description);
        Ok(transaction)
    }

    fn transaction(&self, kind: TransactionKind, amount: i64, description: String) -> WalletTransaction {
        let now = self.clock.now();
        WalletTransaction {
            id: IdGenerator::generate_with_timestamp(IdType::Transaction, now),
            kind,
            amount,
            description,
            created_at: now,
        }
    }
}

/// Accepts `"500"`, `"1500.50"` or `"1500,50"`; the result is whole Kwanza
/// between 1 and `MAX_AMOUNT`.
pub fn parse_top_up_amount(raw: &str) -> WizaResult<i64> {
    let trimmed = raw.trim();
    let invalid = || WizaError::validation_error("amount", "Digite um valor válido");

    let value: f64 = trimmed.replace(',', ".").parse().map_err(|_| invalid())?;
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid());
    }
    if value > MAX_AMOUNT as f64 {
        return Err(WizaError::validation_error(
            "amount",
            format!("O valor máximo de recarga é {}", format_kwanza(MAX_AMOUNT)),
        ));
    }
    let amount = round_to_unit(value);
    if amount < 1 {
        return Err(invalid());
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notification_service::LoggingNotificationService;
    use crate::utils::clock::SystemClock;

    fn wallet() -> WalletService {
        WalletService::new(
            Arc::new(SystemClock),
            Arc::new(LoggingNotificationService),
            DEFAULT_OPENING_BALANCE,
        )
        .with_demo_history()
    }

    #[test]
    fn test_parse_top_up_amount() {
        assert_eq!(parse_top_up_amount("500").unwrap(), 500);
        assert_eq!(parse_top_up_amount(" 1500,5 ").unwrap(), 1501);
        assert_eq!(parse_top_up_amount("0.6").unwrap(), 1);
        for raw in ["-5", "0", "0.2", "", "abc", "NaN", "inf"] {
            assert!(parse_top_up_amount(raw).is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn test_parse_top_up_amount_ceiling() {
        assert_eq!(parse_top_up_amount("10000000").unwrap(), MAX_AMOUNT);
        for raw in ["10000000,6", "1e300", "9223372036854775807"] {
            let err = parse_top_up_amount(raw).unwrap_err();
            assert_eq!(err.validation_errors().unwrap()[0].field, "amount", "{raw:?}");
        }
    }

    #[tokio::test]
    async fn test_huge_top_up_is_rejected_without_touching_balance() {
        let wallet = wallet();
        let before = wallet.summary();
        assert!(matches!(wallet.top_up("1e300").await, Err(WizaError::ValidationFailed(_))));
        assert_eq!(wallet.summary(), before);
    }

    #[tokio::test]
    async fn test_top_up_cannot_overflow_balance() {
        let wallet = WalletService::new(Arc::new(SystemClock), Arc::new(LoggingNotificationService), i64::MAX - 10);
        let err = wallet.top_up("500").await.unwrap_err();
        assert!(matches!(err, WizaError::ValidationFailed(_)));
        assert_eq!(wallet.balance(), i64::MAX - 10);
        assert!(wallet.summary().transactions.is_empty());
    }

    #[tokio::test]
    async fn test_negative_top_up_leaves_balance_alone() {
        let wallet = wallet();
        let before = wallet.summary();

        let err = wallet.top_up("-5").await.unwrap_err();
        assert!(matches!(err, WizaError::ValidationFailed(_)));
        assert_eq!(wallet.summary(), before);
    }

    #[tokio::test]
    async fn test_top_up_credits_wallet() {
        let wallet = wallet();
        let transaction = wallet.top_up("1000").await.unwrap();
        assert_eq!(transaction.kind, TransactionKind::TopUp);

        let summary = wallet.summary();
        assert_eq!(summary.balance, 3450);
        assert_eq!(summary.display_balance, "Kz 3.450");
        assert_eq!(summary.transactions[0], transaction);
        assert_eq!(summary.transactions.len(), 5);
    }

    #[test]
    fn test_charge_trip() {
        let wallet = wallet();
        let transaction = wallet.charge_trip(850, "Viagem Maianga → Miramar").unwrap();
        assert_eq!(transaction.amount, -850);
        assert_eq!(wallet.balance(), 1600);

        let err = wallet.charge_trip(5000, "Viagem longa").unwrap_err();
        assert!(matches!(
            err,
            WizaError::InsufficientBalance {
                available: 1600,
                requested: 5000
            }
        ));
        assert_eq!(wallet.balance(), 1600);
        assert!(wallet.charge_trip(0, "nada").is_err());
    }
}
