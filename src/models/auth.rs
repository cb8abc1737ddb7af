// src/models/auth.rs
// Client-side form checks only; credentials are verified by the backend.
use serde::{Deserialize, Serialize};

use crate::errors::{ValidationErrors, WizaResult};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    #[serde(alias = "cliente")]
    Passenger,
    #[serde(alias = "vendedor")]
    Driver,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> WizaResult<()> {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, &self.email);
        errors.require_non_blank("password", &self.password);
        errors.into_result()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub account_type: AccountType,
    pub full_name: String,
    pub phone_number: String,
    pub email: String,
    pub address: String,
    pub password: String,
    pub tax_id: Option<String>,         // NIF, optional for drivers
    pub license_number: Option<String>, // Driving licence, drivers only
}

impl RegistrationForm {
    pub fn validate(&self) -> WizaResult<()> {
        let mut errors = ValidationErrors::new();
        errors.require_non_blank("full_name", &self.full_name);
        errors.require_non_blank("phone_number", &self.phone_number);
        check_email(&mut errors, &self.email);
        errors.require_non_blank("address", &self.address);
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add("password", "must have at least 6 characters");
        }
        if self.account_type == AccountType::Driver {
            errors.require_non_blank("license_number", self.license_number.as_deref().unwrap_or(""));
        }
        errors.into_result()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PasswordResetForm {
    pub email: String,
}

impl PasswordResetForm {
    pub fn validate(&self) -> WizaResult<()> {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, &self.email);
        errors.into_result()
    }
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    let email = email.trim();
    if email.is_empty() {
        errors.add("email", "must not be empty");
        return;
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
        _ => errors.add("email", "is not a valid address"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(result: WizaResult<()>) -> Vec<String> {
        result
            .unwrap_err()
            .validation_errors()
            .unwrap()
            .iter()
            .map(|e| e.field.clone())
            .collect()
    }

    #[test]
    fn test_login_requires_email_and_password() {
        let form = LoginForm { email: "".into(), password: "".into() };
        assert_eq!(fields(form.validate()), vec!["email", "password"]);

        let form = LoginForm { email: "joao@wiza.ao".into(), password: "segredo".into() };
        assert!(form.validate().is_ok());

        let form = LoginForm { email: "joao.wiza.ao".into(), password: "segredo".into() };
        assert_eq!(fields(form.validate()), vec!["email"]);
    }

    #[test]
    fn test_driver_registration_needs_license() {
        let mut form = RegistrationForm {
            account_type: AccountType::Driver,
            full_name: "João Silva".into(),
            phone_number: "+244 923 456 789".into(),
            email: "joao@wiza.ao".into(),
            address: "Maianga, Luanda".into(),
            password: "123".into(),
            tax_id: None,
            license_number: None,
        };
        assert_eq!(fields(form.validate()), vec!["password", "license_number"]);

        form.password = "segredo".into();
        form.license_number = Some("LD-0042".into());
        assert!(form.validate().is_ok());

        form.account_type = AccountType::Passenger;
        form.license_number = None;
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_account_type_accepts_legacy_names() {
        let parsed: AccountType = serde_json::from_str("\"vendedor\"").unwrap();
        assert_eq!(parsed, AccountType::Driver);
        let parsed: AccountType = serde_json::from_str("\"passenger\"").unwrap();
        assert_eq!(parsed, AccountType::Passenger);
    }

    #[test]
    fn test_password_reset_needs_email() {
        assert!(PasswordResetForm { email: "ana@wiza.ao".into() }.validate().is_ok());
        assert_eq!(fields(PasswordResetForm { email: " ".into() }.validate()), vec!["email"]);
    }
}
