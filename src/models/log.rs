use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::de;

/// One SMS delivery attempt. Field names vary between backend versions,
/// so the record is read from the raw object with fallbacks.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(from = "Map<String, Value>")]
pub struct SmsLog {
    pub id: Option<String>,
    pub phone_number: Option<String>,
    pub message: Option<String>,
    pub kind: Option<String>,
    pub status: Option<String>,
    pub cost: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Map<String, Value>> for SmsLog {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            id: first_id(&map, &["id", "uid"]),
            phone_number: first_str(&map, &["phone_number", "phone", "recipient"]),
            message: first_str(&map, &["message", "content", "text"]),
            kind: first_str(&map, &["type", "message_type"]),
            status: first_str(&map, &["status", "delivery_status"]),
            cost: first_f64(&map, &["cost", "price"]),
            created_at: first_timestamp(&map, &["created_at", "timestamp", "date"]),
        }
    }
}

/// One push-notification delivery attempt.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(from = "Map<String, Value>")]
pub struct FcmLog {
    pub id: Option<String>,
    pub device_id: Option<String>,
    pub message: Option<String>,
    pub data: Option<Value>,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Map<String, Value>> for FcmLog {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            id: first_id(&map, &["id", "uid"]),
            device_id: first_str(&map, &["device_id", "device"]),
            message: first_str(&map, &["message", "title", "body", "content"]),
            data: map.get("data").filter(|v| !v.is_null()).cloned(),
            status: first_str(&map, &["status"]),
            created_at: first_timestamp(&map, &["created_at", "timestamp"]),
        }
    }
}

/// Badge class for a delivery status.
pub fn status_class(status: &str) -> &'static str {
    match status {
        "success" | "delivered" => "badge-success",
        "sent" => "badge-default",
        "failed" | "error" => "badge-danger",
        "pending" => "badge-warning",
        _ => "badge-muted",
    }
}

pub fn kind_class(kind: &str) -> &'static str {
    match kind {
        "verification" => "badge-info",
        "notification" => "badge-default",
        "error" => "badge-danger",
        "welcome" => "badge-success",
        _ => "badge-muted",
    }
}

fn first_str(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match map.get(*k) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn first_id(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    first_str(map, keys)
}

fn first_f64(map: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| match map.get(*k) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn first_timestamp(map: &Map<String, Value>, keys: &[&str]) -> Option<DateTime<Utc>> {
    keys.iter()
        .find_map(|k| map.get(*k).and_then(Value::as_str).and_then(de::parse_timestamp))
}
