// src/models/fare.rs
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,          // Physical cash, no discount
    DigitalWallet, // Multicaixa Express, BAI Directo
    WizaTds,       // In-app TDS credits
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [PaymentMethod::Cash, PaymentMethod::DigitalWallet, PaymentMethod::WizaTds];

    /// Digital payments are rewarded with a discount on the fare.
    pub fn discount_percent(&self) -> Option<f64> {
        match self {
            PaymentMethod::Cash => None,
            PaymentMethod::DigitalWallet => Some(5.0),
            PaymentMethod::WizaTds => Some(10.0),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Dinheiro",
            PaymentMethod::DigitalWallet => "Carteira Digital",
            PaymentMethod::WizaTds => "WIZA TDS",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Pagamento em dinheiro físico",
            PaymentMethod::DigitalWallet => "Multicaixa Express, BAI Directo",
            PaymentMethod::WizaTds => "Sistema de créditos Wiza",
        }
    }

    /// Whether paying with this method debits the passenger's in-app wallet.
    pub fn debits_wallet(&self) -> bool {
        matches!(self, PaymentMethod::WizaTds)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PaymentMethodInfo {
    pub id: PaymentMethod,
    pub name: String,
    pub description: String,
    pub discount_percent: Option<f64>,
}

impl From<PaymentMethod> for PaymentMethodInfo {
    fn from(method: PaymentMethod) -> Self {
        Self {
            id: method,
            name: method.display_name().to_string(),
            description: method.description().to_string(),
            discount_percent: method.discount_percent(),
        }
    }
}

/// Trip pricing inputs as shown in the booking confirmation.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FareBreakdown {
    pub base_price: f64,
    pub distance_km: f64,
    pub duration_min: u32,
    pub surge_multiplier: Option<f64>,
    pub discount_percent: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FareQuoteRequest {
    pub base_price: f64,
    #[serde(default)]
    pub distance_km: f64,
    #[serde(default)]
    pub duration_min: u32,
    pub surge_multiplier: Option<f64>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

impl FareQuoteRequest {
    pub fn breakdown(&self) -> FareBreakdown {
        FareBreakdown {
            base_price: self.base_price,
            distance_km: self.distance_km,
            duration_min: self.duration_min,
            surge_multiplier: self.surge_multiplier,
            discount_percent: self.payment_method.discount_percent(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FareQuote {
    pub payment_method: PaymentMethod,
    pub base_price: i64,
    pub surge_multiplier: Option<f64>,
    pub surge_amount: i64,
    pub subtotal: i64,
    pub discount_percent: Option<f64>,
    pub discount_amount: i64,
    pub final_price: i64,
    pub currency: String,
    pub display_total: String,
}
