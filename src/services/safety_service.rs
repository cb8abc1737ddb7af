// src/services/safety_service.rs
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing;

use crate::{
    errors::{WizaError, WizaResult},
    models::safety::{EmergencyContact, GeoPoint, NewEmergencyContact, SosAlert},
    services::notification_service::{NotificationMessage, NotificationService, Recipient},
    utils::{
        clock::Clock,
        id_generator::{IdGenerator, IdType},
    },
};

pub struct SafetyService {
    contacts: RwLock<Vec<EmergencyContact>>,
    notification_service: Arc<dyn NotificationService>,
    clock: Arc<dyn Clock>,
}

impl SafetyService {
    pub fn new(clock: Arc<dyn Clock>, notification_service: Arc<dyn NotificationService>) -> Self {
        Self {
            contacts: RwLock::new(Vec::new()),
            notification_service,
            clock,
        }
    }

    pub fn with_demo_contacts(self) -> Self {
        let now = self.clock.now();
        let contacts: Vec<EmergencyContact> = [
            ("Ana Silva", "+244 923 456 789", "Mãe"),
            ("Carlos Santos", "+244 912 345 678", "Irmão"),
        ]
        .into_iter()
        .map(|(name, phone, relationship)| EmergencyContact {
            id: IdGenerator::generate_with_timestamp(IdType::Contact, now),
            name: name.to_string(),
            phone: phone.to_string(),
            relationship: relationship.to_string(),
        })
        .collect();
        Self {
            contacts: RwLock::new(contacts),
            ..self
        }
    }

    pub async fn contacts(&self) -> Vec<EmergencyContact> {
        self.contacts.read().await.clone()
    }

    pub async fn add_contact(&self, contact: NewEmergencyContact) -> WizaResult<EmergencyContact> {
        contact.validate()?;

        let contact = EmergencyContact {
            id: IdGenerator::generate_with_timestamp(IdType::Contact, self.clock.now()),
            name: contact.name.trim().to_string(),
            phone: contact.phone.trim().to_string(),
            relationship: contact.relationship.trim().to_string(),
        };
        tracing::info!("Emergency contact added: {} ({})", contact.name, contact.id);
        self.contacts.write().await.push(contact.clone());
        Ok(contact)
    }

    pub async fn remove_contact(&self, contact_id: &str) -> WizaResult<EmergencyContact> {
        let mut contacts = self.contacts.write().await;
        let index = contacts
            .iter()
            .position(|c| c.id == contact_id)
            .ok_or_else(|| WizaError::not_found(format!("emergency contact {}", contact_id)))?;
        let removed = contacts.remove(index);
        tracing::info!("Emergency contact removed: {}", removed.id);
        Ok(removed)
    }

    /// Alerts every emergency contact. Individual delivery failures are
    /// counted, not propagated.
    pub async fn send_sos(&self, location: Option<GeoPoint>) -> SosAlert {
        let contacts = self.contacts().await;
        let sent_at = self.clock.now();
        let mut alert = SosAlert {
            id: IdGenerator::generate_with_timestamp(IdType::SosAlert, sent_at),
            sent_at,
            location,
            contacts_notified: 0,
            contacts_failed: 0,
        };

        if contacts.is_empty() {
            tracing::warn!("SOS {} raised with no emergency contacts", alert.id);
            return alert;
        }

        tracing::info!("SOS {} raised, alerting {} contact(s)", alert.id, contacts.len());
        for contact in &contacts {
            let recipient = Recipient::Contact {
                name: contact.name.clone(),
                phone: contact.phone.clone(),
            };
            match self
                .notification_service
                .send(&recipient, NotificationMessage::sos(contact, &alert))
                .await
            {
                Ok(()) => alert.contacts_notified += 1,
                Err(e) => {
                    tracing::warn!("SOS delivery to {} failed: {}", contact.name, e);
                    alert.contacts_failed += 1;
                }
            }
        }
        alert
    }
}
