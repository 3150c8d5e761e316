//! Where the signed-in administrator's own account record comes from.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use dashmap::DashMap;

use crate::api::{ApiClient, ApiError};
use crate::auth::session::token_key;
use crate::models::{Profile, ProfileUpdate};

#[async_trait]
pub trait ProfileProvider: Send + Sync {
    /// Short name shown on the profile page.
    fn source(&self) -> &str;
    async fn load(&self, token: &str) -> Result<Profile, ApiError>;
    async fn update(&self, token: &str, update: &ProfileUpdate) -> Result<Profile, ApiError>;

    /// Drop per-session state untouched for `max_age`. Returns how many
    /// entries were removed.
    fn sweep(&self, _max_age: Duration) -> usize {
        0
    }
}

/// Live profile read from and written to an upstream endpoint.
pub struct UpstreamProfile {
    api: ApiClient,
    path: String,
}

impl UpstreamProfile {
    pub fn new(api: ApiClient, path: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') { path } else { format!("/{path}") };
        Self { api, path }
    }
}

#[async_trait]
impl ProfileProvider for UpstreamProfile {
    fn source(&self) -> &str {
        "upstream"
    }

    async fn load(&self, token: &str) -> Result<Profile, ApiError> {
        self.api.fetch_profile(token, &self.path).await
    }

    async fn update(&self, token: &str, update: &ProfileUpdate) -> Result<Profile, ApiError> {
        let reply = self.api.update_profile(token, &self.path, update).await?;
        let record = reply.get("user").cloned().unwrap_or(reply);
        match serde_json::from_value::<Profile>(record) {
            Ok(profile) if !profile.uid.is_empty() => Ok(profile),
            // Reply without a record: read it back
            _ => self.load(token).await,
        }
    }
}

/// Built-in demo record for deployments without a profile endpoint.
/// Edits live in memory, per session.
pub struct StaticProfile {
    /// session hash -> edited profile and when it was last touched
    edits: DashMap<String, (Profile, Instant)>,
}

impl StaticProfile {
    pub fn new() -> Self {
        Self {
            edits: DashMap::new(),
        }
    }

    pub fn demo() -> Profile {
        Profile {
            uid: "user_12345".to_string(),
            email: Some("john.doe@example.com".to_string()),
            phone: Some("+1234567890".to_string()),
            first_name: Some("John".to_string()),
            last_name: Some("Doe".to_string()),
            display_name: Some("John Doe".to_string()),
            is_active: true,
            email_verified: true,
            phone_verified: false,
            contact_method: Some("email".to_string()),
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).single(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 20, 14, 45, 0).single(),
        }
    }
}

impl Default for StaticProfile {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileProvider for StaticProfile {
    fn source(&self) -> &str {
        "demo"
    }

    async fn load(&self, token: &str) -> Result<Profile, ApiError> {
        Ok(match self.edits.get_mut(&token_key(token)) {
            Some(mut entry) => {
                entry.1 = Instant::now();
                entry.0.clone()
            }
            None => Self::demo(),
        })
    }

    async fn update(&self, token: &str, update: &ProfileUpdate) -> Result<Profile, ApiError> {
        let mut entry = self
            .edits
            .entry(token_key(token))
            .or_insert_with(|| (Self::demo(), Instant::now()));
        entry.0.apply(update);
        entry.1 = Instant::now();
        Ok(entry.0.clone())
    }

    fn sweep(&self, max_age: Duration) -> usize {
        let before = self.edits.len();
        self.edits
            .retain(|_, (_, touched)| touched.elapsed() < max_age);
        before - self.edits.len()
    }
}
