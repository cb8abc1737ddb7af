// src/handlers/forms_handler.rs
// Server-side checks for the auth screens; every failure is field-level.
use axum::{Json, http::StatusCode};

use crate::{
    errors::WizaError,
    models::auth::{LoginForm, PasswordResetForm, RegistrationForm},
};

pub async fn validate_login(Json(form): Json<LoginForm>) -> Result<StatusCode, WizaError> {
    form.validate()?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn validate_registration(Json(form): Json<RegistrationForm>) -> Result<StatusCode, WizaError> {
    form.validate()?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn validate_password_reset(Json(form): Json<PasswordResetForm>) -> Result<StatusCode, WizaError> {
    form.validate()?;
    Ok(StatusCode::NO_CONTENT)
}
