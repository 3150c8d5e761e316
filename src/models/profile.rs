use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::de;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "de::flexible_bool")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "de::flexible_bool")]
    pub email_verified: bool,
    #[serde(default, deserialize_with = "de::flexible_bool")]
    pub phone_verified: bool,
    #[serde(default)]
    pub contact_method: Option<String>,
    #[serde(default, deserialize_with = "de::flexible_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::flexible_datetime")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn initials(&self) -> String {
        let name = self
            .display_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| {
                format!(
                    "{} {}",
                    self.first_name.as_deref().unwrap_or_default(),
                    self.last_name.as_deref().unwrap_or_default()
                )
            });
        let initials: String = name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .collect::<String>()
            .to_uppercase();
        if initials.is_empty() { "?".to_string() } else { initials }
    }

    pub fn apply(&mut self, update: &ProfileUpdate) {
        self.first_name = Some(update.first_name.clone());
        self.last_name = Some(update.last_name.clone());
        self.email = Some(update.email.clone()).filter(|s| !s.is_empty());
        self.phone = Some(update.phone.clone()).filter(|s| !s.is_empty());
        self.display_name = Some(format!("{} {}", update.first_name, update.last_name).trim().to_string());
        self.updated_at = Some(Utc::now());
    }
}

/// Editable part of the profile; also the form body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl ProfileUpdate {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            first_name: profile.first_name.clone().unwrap_or_default(),
            last_name: profile.last_name.clone().unwrap_or_default(),
            email: profile.email.clone().unwrap_or_default(),
            phone: profile.phone.clone().unwrap_or_default(),
        }
    }
}
