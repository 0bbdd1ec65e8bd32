use serde::{Deserialize, Serialize};

use super::code::is_well_formed;
use crate::accounts::{normalize_email, PublicUser};
use crate::error::AppError;

/// Body of `POST /send-otp`.
#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    pub email: Option<String>,
}

/// Body of `POST /verify-otp`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub email: Option<String>,
    pub otp: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
}

/// Validated issuance command.
#[derive(Debug, Clone)]
pub struct SendOtp {
    pub email: String,
}

/// Validated verification command.
#[derive(Debug, Clone)]
pub struct VerifyOtp {
    pub email: String,
    pub otp: String,
    pub password: String,
    pub full_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendOtpResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyOtpResponse {
    pub success: bool,
    pub message: String,
    pub user: PublicUser,
}

fn required(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl SendOtpRequest {
    pub fn validate(self) -> Result<SendOtp, AppError> {
        let email = required(self.email)
            .ok_or_else(|| AppError::Validation("Email is required".into()))?;
        Ok(SendOtp {
            email: normalize_email(&email),
        })
    }
}

impl VerifyOtpRequest {
    pub fn validate(self, password_min_length: usize) -> Result<VerifyOtp, AppError> {
        let (Some(email), Some(otp), Some(password)) = (
            required(self.email),
            required(self.otp),
            // passwords are taken verbatim, only emptiness is checked
            self.password.filter(|p| !p.is_empty()),
        ) else {
            return Err(AppError::Validation(
                "Email, OTP, and password are required".into(),
            ));
        };

        if !is_well_formed(&otp) {
            return Err(AppError::Validation("OTP must be a 6-digit code".into()));
        }
        if password.chars().count() < password_min_length {
            return Err(AppError::Validation(format!(
                "Password must be at least {password_min_length} characters"
            )));
        }

        Ok(VerifyOtp {
            email: normalize_email(&email),
            otp,
            password,
            full_name: required(self.full_name),
        })
    }
}
