use serde::Deserialize;

use crate::domain::models::tenant::BusinessAddress;
use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 6;

fn required(value: &str, message: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}

pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|part| !part.is_empty())
}

fn valid_email(email: &str) -> Result<(), AppError> {
    if !is_valid_email(email) {
        return Err(AppError::Validation("Please include a valid email".into()));
    }
    Ok(())
}

#[derive(Deserialize)]
pub struct SendMailRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
pub enum VerificationCodeInput {
    Number(i64),
    Text(String),
}

impl VerificationCodeInput {
    pub fn as_code(&self) -> Option<i64> {
        match self {
            VerificationCodeInput::Number(code) => Some(*code),
            VerificationCodeInput::Text(text) => text.trim().parse().ok(),
        }
    }
}

#[derive(Deserialize)]
pub struct VerifyCodeRequest {
    #[serde(default)]
    pub email: String,
    pub code: Option<VerificationCodeInput>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub business_name: String,
    #[serde(default)]
    pub business_address: BusinessAddress,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        required(&self.name, "Name is required")?;
        valid_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(
                "Password is required and must be 6 or more characters".into(),
            ));
        }
        required(&self.phone, "Phone number is required")?;
        required(&self.business_name, "Business name is required")
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        valid_email(&self.email)?;
        required(&self.password, "Password is required")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTenantRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub business_name: Option<String>,
    pub business_address: Option<BusinessAddress>,
    pub subscription_plan: Option<String>,
}

impl UpdateTenantRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            required(name, "Name is required")?;
        }
        if let Some(email) = &self.email {
            valid_email(email)?;
        }
        if let Some(phone) = &self.phone {
            required(phone, "Phone number is required")?;
        }
        if let Some(business_name) = &self.business_name {
            required(business_name, "Business name is required")?;
        }
        if let Some(field) = self.business_address.as_ref().and_then(BusinessAddress::first_missing_field) {
            return Err(AppError::Validation(format!("Business address {} is required", field)));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionRequest {
    #[serde(default)]
    pub user_id: String,
}

#[derive(Deserialize)]
pub struct CreateAdminRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub role: Option<String>,
}

impl CreateAdminRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        required(&self.name, "Name is required")?;
        valid_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(
                "Password is required and must be 6 or more characters".into(),
            ));
        }
        validate_role(self.role.as_deref())
    }
}

#[derive(Deserialize)]
pub struct UpdateAdminRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

impl UpdateAdminRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            required(name, "Name is required")?;
        }
        if let Some(email) = &self.email {
            valid_email(email)?;
        }
        if let Some(password) = &self.password
            && password.chars().count() < MIN_PASSWORD_LEN
        {
            return Err(AppError::Validation("Password must be 6 or more characters".into()));
        }
        validate_role(self.role.as_deref())
    }
}

fn validate_role(role: Option<&str>) -> Result<(), AppError> {
    match role {
        Some(role) if !crate::domain::models::admin::is_admin_role(role) => {
            Err(AppError::Validation("Role must be 'admin' or 'super-admin'".into()))
        }
        _ => Ok(()),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl CreateTicketRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        required(&self.user_id, "User ID is required")?;
        required(&self.subject, "Subject is required")?;
        required(&self.message, "Message is required")
    }
}

#[derive(Deserialize)]
pub struct UpdateTicketRequest {
    pub subject: Option<String>,
    pub message: Option<String>,
    pub status: Option<String>,
}

impl UpdateTicketRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(subject) = &self.subject {
            required(subject, "Subject is required")?;
        }
        if let Some(message) = &self.message {
            required(message, "Message is required")?;
        }
        if let Some(status) = &self.status
            && !crate::domain::models::support::TICKET_STATUSES.contains(&status.as_str())
        {
            return Err(AppError::Validation(
                "Status should be one of 'open', 'in-progress', 'closed'".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
pub struct PostMessageRequest {
    #[serde(default)]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email(" owner@my-cafe.co.uk "));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@@b.com"));
        assert!(!is_valid_email("a@b..com"));
    }

    #[test]
    fn register_requires_long_enough_password() {
        let request: RegisterRequest = serde_json::from_value(serde_json::json!({
            "name": "Ann", "email": "a@b.com", "password": "12345",
            "phone": "555", "businessName": "My Cafe"
        })).unwrap();
        assert!(matches!(request.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn verification_code_accepts_numbers_and_digit_strings() {
        let numeric: VerifyCodeRequest = serde_json::from_str(r#"{"email":"a@b.com","code":123456}"#).unwrap();
        let text: VerifyCodeRequest = serde_json::from_str(r#"{"email":"a@b.com","code":"123456"}"#).unwrap();
        let junk: VerifyCodeRequest = serde_json::from_str(r#"{"email":"a@b.com","code":"12ab"}"#).unwrap();

        assert_eq!(numeric.code.and_then(|c| c.as_code()), Some(123456));
        assert_eq!(text.code.and_then(|c| c.as_code()), Some(123456));
        assert_eq!(junk.code.and_then(|c| c.as_code()), None);
    }

    #[test]
    fn ticket_status_must_be_known() {
        let update = UpdateTicketRequest { subject: None, message: None, status: Some("pending".into()) };
        assert!(update.validate().is_err());
        let update = UpdateTicketRequest { subject: None, message: None, status: Some("in-progress".into()) };
        assert!(update.validate().is_ok());
    }
}
