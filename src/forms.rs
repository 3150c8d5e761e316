//! Form bodies posted by the dashboard and their presence/format checks.
//! Anything deeper is the upstream API's job.

use std::fmt;

use serde::Deserialize;

use crate::models::{BulkActionKind, NewNetwork, NewUser, ProfileUpdate, UserFlag};

pub const NETWORK_CODE_MAX: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ValidationError {
    fn from(s: &str) -> Self {
        ValidationError(s.to_string())
    }
}

/// An identifier containing `@` is an email, anything else a phone number.
/// The value is only trimmed; format checks belong to the upstream API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Email(String),
    Phone(String),
}

impl Identifier {
    pub fn classify(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.contains('@') {
            Identifier::Email(raw.to_string())
        } else {
            Identifier::Phone(raw.to_string())
        }
    }

    pub fn is_email(&self) -> bool {
        matches!(self, Identifier::Email(_))
    }
}

/// HTML checkboxes are absent when unchecked and `on` when checked.
fn checked(value: &Option<String>) -> bool {
    value
        .as_deref()
        .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "on" | "true" | "1" | "yes"))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
    #[serde(default)]
    pub is_partner: Option<String>,
    #[serde(default)]
    pub can_process_ussd_transaction: Option<String>,
}

impl RegisterForm {
    pub fn is_partner(&self) -> bool {
        checked(&self.is_partner)
    }

    pub fn can_process_ussd(&self) -> bool {
        checked(&self.can_process_ussd_transaction)
    }

    pub fn validate(&self) -> Result<NewUser, ValidationError> {
        if self.first_name.trim().is_empty()
            || self.last_name.trim().is_empty()
            || self.identifier.trim().is_empty()
            || self.password.is_empty()
            || self.password_confirm.is_empty()
        {
            return Err("All fields are required".into());
        }

        if self.password != self.password_confirm {
            return Err("Passwords do not match".into());
        }

        let (email, phone) = match Identifier::classify(&self.identifier) {
            Identifier::Email(email) => (Some(email), None),
            Identifier::Phone(phone) => (None, Some(phone)),
        };

        Ok(NewUser {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email,
            phone,
            password: self.password.clone(),
            password_confirm: self.password_confirm.clone(),
            is_partner: self.is_partner(),
            can_process_ussd_transaction: self.can_process_ussd(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkForm {
    #[serde(default)]
    pub nom: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub ussd_base_code: String,
    #[serde(default)]
    pub is_active: Option<String>,
    #[serde(default)]
    pub sent_deposit_to_module: Option<String>,
    #[serde(default)]
    pub sent_withdrawal_to_module: Option<String>,
}

impl NetworkForm {
    /// Defaults for a fresh form: active, nothing forwarded.
    pub fn blank() -> Self {
        Self {
            is_active: Some("on".to_string()),
            ..Self::default()
        }
    }

    pub fn is_active(&self) -> bool {
        checked(&self.is_active)
    }

    pub fn sends_deposits(&self) -> bool {
        checked(&self.sent_deposit_to_module)
    }

    pub fn sends_withdrawals(&self) -> bool {
        checked(&self.sent_withdrawal_to_module)
    }

    pub fn validate(&self) -> Result<NewNetwork, ValidationError> {
        let nom = self.nom.trim();
        let code = self.code.trim().to_uppercase();
        let country = self.country.trim();

        if nom.is_empty() {
            return Err("Network name is required".into());
        }
        if code.is_empty() {
            return Err("Network code is required".into());
        }
        if code.chars().count() > NETWORK_CODE_MAX {
            return Err(ValidationError(format!(
                "Network code must be at most {NETWORK_CODE_MAX} characters"
            )));
        }
        if country.is_empty() {
            return Err("Country is required".into());
        }

        Ok(NewNetwork {
            nom: nom.to_string(),
            code,
            country: country.to_string(),
            ussd_base_code: self.ussd_base_code.trim().to_string(),
            is_active: self.is_active(),
            sent_deposit_to_module: self.sends_deposits(),
            sent_withdrawal_to_module: self.sends_withdrawals(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlagForm {
    pub flag: UserFlag,
    pub value: String,
}

impl FlagForm {
    pub fn value(&self) -> bool {
        checked(&Some(self.value.clone()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkForm {
    pub action: BulkActionKind,
    #[serde(default)]
    pub user_ids: Vec<String>,
}

impl BulkForm {
    /// Selected ids, deduplicated, in selection order.
    pub fn selected(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::with_capacity(self.user_ids.len());
        for id in &self.user_ids {
            let id = id.trim();
            if !id.is_empty() && !ids.iter().any(|existing| existing == id) {
                ids.push(id.to_string());
            }
        }
        ids
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub password: String,
}

pub fn validate_profile(update: &ProfileUpdate) -> Result<ProfileUpdate, ValidationError> {
    let first_name = update.first_name.trim();
    let last_name = update.last_name.trim();
    let email = update.email.trim();
    let phone = update.phone.trim();

    if first_name.is_empty() || last_name.is_empty() {
        return Err("First and last name are required".into());
    }
    if !email.is_empty() && !email.contains('@') {
        return Err("Invalid email address".into());
    }

    Ok(ProfileUpdate {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
    })
}
