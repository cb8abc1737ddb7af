// src/services/notification_service.rs
use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;
use tracing;

use crate::{
    errors::WizaError,
    models::{
        safety::{EmergencyContact, SosAlert},
        trip::TripRequest,
        wallet::{WalletTransaction, WithdrawalReceipt},
    },
    utils::currency::format_kwanza,
};

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("delivery failed: {0}")]
    Delivery(String),

    #[error("recipient has no device token: {0}")]
    NoDeviceToken(String),
}

impl From<NotificationError> for WizaError {
    fn from(err: NotificationError) -> Self {
        WizaError::NotificationFailed(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Recipient {
    Driver,
    Passenger,
    Contact { name: String, phone: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationMessage {
    pub title: String,
    pub body: String,
    pub data: Option<serde_json::Value>,
    pub priority: NotificationPriority,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum NotificationPriority {
    #[default]
    Normal,
    High, // Wakes sleeping devices
}

impl NotificationMessage {
    pub fn new(title: &str, body: &str) -> Self {
        Self {
            title: title.to_string(),
            body: body.to_string(),
            data: None,
            priority: NotificationPriority::default(),
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_priority(mut self, priority: NotificationPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn trip_accepted(trip: &TripRequest) -> Self {
        Self::new(
            "Viagem Confirmada!",
            &format!("O motorista está a caminho de {}.", trip.origin),
        )
        .with_data(json!({
            "type": "trip_accepted",
            "trip_id": trip.id,
            "origin": trip.origin,
            "destination": trip.destination,
            "price": trip.quoted_price,
        }))
        .with_priority(NotificationPriority::High)
    }

    pub fn trip_completed(trip: &TripRequest) -> Self {
        Self::new(
            "Viagem Concluída",
            &format!("Chegou a {}. Obrigado por viajar com a Wiza!", trip.destination),
        )
        .with_data(json!({ "type": "trip_completed", "trip_id": trip.id }))
    }

    pub fn sos(contact: &EmergencyContact, alert: &SosAlert) -> Self {
        let location = alert
            .location
            .map(|p| json!({ "latitude": p.latitude, "longitude": p.longitude }));
        Self::new(
            "🚨 EMERGÊNCIA",
            &format!("{}, um contacto seu acionou o SOS na Wiza.", contact.name),
        )
        .with_data(json!({
            "type": "sos",
            "alert_id": alert.id,
            "sent_at": alert.sent_at.to_rfc3339(),
            "location": location,
        }))
        .with_priority(NotificationPriority::High)
    }

    pub fn top_up(transaction: &WalletTransaction, balance: i64) -> Self {
        Self::new(
            "Recarga realizada",
            &format!(
                "{} carregados. Saldo: {}",
                format_kwanza(transaction.amount),
                format_kwanza(balance)
            ),
        )
        .with_data(json!({ "type": "top_up", "transaction_id": transaction.id }))
    }

    pub fn withdrawal_requested(receipt: &WithdrawalReceipt) -> Self {
        Self::new(
            "Solicitação de Resgate",
            &format!(
                "Resgate de {} via {} enviado. Será notificado quando for processado.",
                format_kwanza(receipt.amount),
                receipt.method
            ),
        )
        .with_data(json!({ "type": "withdrawal", "withdrawal_id": receipt.id }))
    }
}

/// Push delivery seam. The real provider lives outside this crate.
#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn send(&self, recipient: &Recipient, message: NotificationMessage) -> Result<(), NotificationError>;
}

/// Logs every message instead of delivering it.
#[derive(Debug, Default)]
pub struct LoggingNotificationService;

#[async_trait]
impl NotificationService for LoggingNotificationService {
    async fn send(&self, recipient: &Recipient, message: NotificationMessage) -> Result<(), NotificationError> {
        match recipient {
            Recipient::Contact { name, phone } => {
                tracing::info!("[notify] contact {} ({}): {} - {}", name, phone, message.title, message.body)
            }
            other => tracing::info!("[notify] {:?}: {} - {}", other, message.title, message.body),
        }
        Ok(())
    }
}
