use reqwest::Method;
use serde_json::Value;

use super::page::Page;
use super::query::{ListQuery, OrderingStyle};
use super::{ApiClient, ApiError};
use crate::models::{BulkAction, MutationReply, NewUser, Partner, User, UserFlag};

pub const USERS_PATH: &str = "/api/auth/admin/users/";
pub const PENDING_USERS_PATH: &str = "/api/auth/admin/users/pending/";
pub const PARTNERS_PATH: &str = "/api/auth/admin/users/partners/";
pub const BULK_ACTION_PATH: &str = "/api/auth/admin/users/bulk-action/";
pub const REGISTER_PATH: &str = "/api/auth/register/";

pub const USERS_ORDERING: OrderingStyle = OrderingStyle::Signed;
pub const PARTNERS_ORDERING: OrderingStyle = OrderingStyle::Django;

fn user_path(uid: &str, suffix: &str) -> String {
    let uid: String = form_urlencoded::byte_serialize(uid.as_bytes()).collect();
    format!("{USERS_PATH}{uid}/{suffix}")
}

impl ApiClient {
    pub async fn list_users(
        &self,
        token: &str,
        pending_only: bool,
        query: &ListQuery,
    ) -> Result<Page<User>, ApiError> {
        let path = if pending_only { PENDING_USERS_PATH } else { USERS_PATH };
        self.fetch_page(token, path, query, USERS_ORDERING).await
    }

    pub async fn user_detail(&self, token: &str, uid: &str) -> Result<User, ApiError> {
        self.get(token, &user_path(uid, "")).await
    }

    pub async fn activate_user(&self, token: &str, uid: &str) -> Result<MutationReply, ApiError> {
        self.send(Method::PATCH, Some(token), &user_path(uid, "activate/"), None::<&()>)
            .await
    }

    pub async fn deactivate_user(&self, token: &str, uid: &str) -> Result<MutationReply, ApiError> {
        self.send(Method::PATCH, Some(token), &user_path(uid, "deactivate/"), None::<&()>)
            .await
    }

    pub async fn update_user_flag(
        &self,
        token: &str,
        uid: &str,
        flag: UserFlag,
        value: bool,
    ) -> Result<MutationReply, ApiError> {
        let body = flag.patch_body(value);
        self.send(Method::PATCH, Some(token), &user_path(uid, "update/"), Some(&body))
            .await
    }

    pub async fn bulk_action(&self, token: &str, action: &BulkAction) -> Result<MutationReply, ApiError> {
        self.send(Method::POST, Some(token), BULK_ACTION_PATH, Some(action))
            .await
    }

    /// Registration. A 2xx reply that still carries `detail` is a rejection.
    pub async fn register_user(&self, token: &str, user: &NewUser) -> Result<Value, ApiError> {
        let reply: Value = self
            .send(Method::POST, Some(token), REGISTER_PATH, Some(user))
            .await?;

        if reply.get("detail").is_some_and(|d| !d.is_null()) {
            let message = super::error_text::extract_error_message(&reply)
                .unwrap_or_else(|| "Registration was rejected".to_string());
            return Err(ApiError::Status { status: 200, message });
        }

        Ok(reply)
    }

    pub async fn list_partners(&self, token: &str, query: &ListQuery) -> Result<Page<Partner>, ApiError> {
        self.fetch_page(token, PARTNERS_PATH, query, PARTNERS_ORDERING).await
    }

    pub async fn partner_detail(&self, token: &str, uid: &str) -> Result<Partner, ApiError> {
        let uid: String = form_urlencoded::byte_serialize(uid.as_bytes()).collect();
        self.get(token, &format!("{PARTNERS_PATH}{uid}/")).await
    }
}
