use serde::{Deserialize, Serialize};

use super::de;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Country {
    #[serde(default, deserialize_with = "de::flexible_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de::flexible_id")]
    pub uid: Option<String>,
    #[serde(default)]
    pub nom: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl Country {
    /// Value submitted as the network's `country` reference.
    pub fn key(&self) -> Option<&str> {
        self.id.as_deref().or(self.uid.as_deref())
    }

    pub fn label(&self) -> String {
        match (self.nom.as_deref(), self.code.as_deref()) {
            (Some(nom), Some(code)) => format!("{nom} ({code})"),
            (Some(nom), None) => nom.to_string(),
            (None, Some(code)) => code.to_string(),
            (None, None) => self.key().unwrap_or("?").to_string(),
        }
    }
}

/// Body of `POST /api/payments/networks/`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewNetwork {
    pub nom: String,
    pub code: String,
    pub country: String,
    pub ussd_base_code: String,
    pub is_active: bool,
    pub sent_deposit_to_module: bool,
    pub sent_withdrawal_to_module: bool,
}
