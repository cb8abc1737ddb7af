// src/models/wallet.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::fare::PaymentMethod;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Payment, // Trip paid from the wallet
    Bonus,   // Promotional credit
    Refund,  // Cancelled trip refund
    TopUp,   // Passenger loaded credit
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WalletTransaction {
    pub id: String,
    pub kind: TransactionKind,
    /// Signed: debits are negative.
    pub amount: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WalletSummary {
    pub balance: i64,
    pub display_balance: String,
    pub transactions: Vec<WalletTransaction>,
}

/// Raw text from the top-up field; parsed and validated server side.
#[derive(Debug, Serialize, Deserialize)]
pub struct TopUpRequest {
    pub amount: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EarningKind {
    Earning,
    Withdrawal,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EarningEntry {
    pub id: String,
    pub passenger: String,
    pub payment_method: PaymentMethod,
    pub amount: i64,
    pub kind: EarningKind,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EarningsPeriod {
    #[default]
    Day,
    Week,
    Month,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct EarningsSummary {
    pub day: i64,
    pub week: i64,
    pub month: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChartBucket {
    pub label: String,
    pub value: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    pub method: PaymentMethod,
    /// Defaults to everything available.
    pub amount: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WithdrawalReceipt {
    pub id: String,
    pub method: PaymentMethod,
    pub amount: i64,
    pub remaining_balance: i64,
    pub requested_at: DateTime<Utc>,
}
