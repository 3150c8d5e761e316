use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::de;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct User {
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "de::flexible_bool")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "de::flexible_bool")]
    pub email_verified: bool,
    #[serde(default, deserialize_with = "de::flexible_bool")]
    pub phone_verified: bool,
    #[serde(default, deserialize_with = "de::flexible_bool")]
    pub is_partner: bool,
    #[serde(default, deserialize_with = "de::flexible_bool")]
    pub can_process_ussd_transaction: bool,
    #[serde(default, deserialize_with = "de::flexible_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::flexible_datetime")]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Display name, falling back to first/last name, then to a placeholder.
    pub fn name(&self) -> String {
        if let Some(name) = self.display_name.as_deref().filter(|s| !s.trim().is_empty()) {
            return name.to_string();
        }
        let full = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        );
        let full = full.trim();
        if full.is_empty() {
            "Unnamed".to_string()
        } else {
            full.to_string()
        }
    }

    pub fn initial(&self) -> String {
        self.display_name
            .as_deref()
            .and_then(|s| s.trim().chars().next())
            .or_else(|| self.email.as_deref().and_then(|s| s.chars().next()))
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_else(|| "U".to_string())
    }

    /// Apply the fields present in a (possibly partial) user object.
    pub fn merge_patch(&mut self, patch: &Value) {
        let Some(obj) = patch.as_object() else {
            return;
        };

        for (key, value) in obj {
            match key.as_str() {
                "email" => self.email = value.as_str().map(str::to_string),
                "phone" => self.phone = value.as_str().map(str::to_string),
                "display_name" => self.display_name = value.as_str().map(str::to_string),
                "first_name" => self.first_name = value.as_str().map(str::to_string),
                "last_name" => self.last_name = value.as_str().map(str::to_string),
                "is_active" => self.is_active = de::value_as_bool(value),
                "email_verified" => self.email_verified = de::value_as_bool(value),
                "phone_verified" => self.phone_verified = de::value_as_bool(value),
                "is_partner" => self.is_partner = de::value_as_bool(value),
                "can_process_ussd_transaction" => {
                    self.can_process_ussd_transaction = de::value_as_bool(value)
                }
                "created_at" => self.created_at = value.as_str().and_then(de::parse_timestamp),
                "last_login_at" => self.last_login_at = value.as_str().and_then(de::parse_timestamp),
                _ => {}
            }
        }
    }
}

/// Flags an administrator can flip from the user detail modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserFlag {
    EmailVerified,
    PhoneVerified,
    IsPartner,
    CanProcessUssdTransaction,
}

impl UserFlag {
    pub fn field(self) -> &'static str {
        match self {
            UserFlag::EmailVerified => "email_verified",
            UserFlag::PhoneVerified => "phone_verified",
            UserFlag::IsPartner => "is_partner",
            UserFlag::CanProcessUssdTransaction => "can_process_ussd_transaction",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UserFlag::EmailVerified => "Email verification",
            UserFlag::PhoneVerified => "Phone verification",
            UserFlag::IsPartner => "Partner status",
            UserFlag::CanProcessUssdTransaction => "USSD transactions",
        }
    }

    pub fn apply(self, user: &mut User, value: bool) {
        match self {
            UserFlag::EmailVerified => user.email_verified = value,
            UserFlag::PhoneVerified => user.phone_verified = value,
            UserFlag::IsPartner => user.is_partner = value,
            UserFlag::CanProcessUssdTransaction => user.can_process_ussd_transaction = value,
        }
    }

    /// PATCH body for `/update/`: only the one field.
    pub fn patch_body(self, value: bool) -> Value {
        let mut body = serde_json::Map::new();
        body.insert(self.field().to_string(), Value::Bool(value));
        Value::Object(body)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkActionKind {
    Activate,
    Deactivate,
    Delete,
}

impl BulkActionKind {
    pub fn past_tense(self) -> &'static str {
        match self {
            BulkActionKind::Activate => "activated",
            BulkActionKind::Deactivate => "deactivated",
            BulkActionKind::Delete => "deleted",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkAction {
    pub action: BulkActionKind,
    pub user_ids: Vec<String>,
}

/// Reply of the activate/deactivate/update/bulk endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MutationReply {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub user: Option<Value>,
}

impl MutationReply {
    /// The returned user, only when it is complete enough to render a row on
    /// its own: uid plus a name and a contact field. Anything less is a patch
    /// to merge over the previous record.
    pub fn full_user(&self) -> Option<User> {
        let user = self.user.as_ref()?;
        let present = |keys: &[&str]| keys.iter().any(|k| user.get(*k).is_some_and(|v| !v.is_null()));

        if user.get("uid").and_then(Value::as_str).is_none()
            || !present(&["display_name", "first_name", "last_name"])
            || !present(&["email", "phone"])
        {
            return None;
        }
        serde_json::from_value(user.clone()).ok()
    }
}

/// Body of `POST /api/auth/register/`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: String,
    pub password_confirm: String,
    pub is_partner: bool,
    pub can_process_ussd_transaction: bool,
}
