use reqwest::Method;
use serde_json::Value;

use super::page::Page;
use super::query::{ListQuery, OrderingStyle};
use super::{ApiClient, ApiError};
use crate::models::{Country, FcmLog, NewNetwork, SmsLog};

pub const SMS_LOGS_PATH: &str = "/api/payments/sms-logs/";
pub const FCM_LOGS_PATH: &str = "/api/payments/fcm-logs/";
pub const NETWORKS_PATH: &str = "/api/payments/networks/";
pub const COUNTRIES_PATH: &str = "/api/payments/countries/";

pub const LOGS_ORDERING: OrderingStyle = OrderingStyle::Signed;

impl ApiClient {
    pub async fn list_sms_logs(&self, token: &str, query: &ListQuery) -> Result<Page<SmsLog>, ApiError> {
        self.fetch_page(token, SMS_LOGS_PATH, query, LOGS_ORDERING).await
    }

    pub async fn list_fcm_logs(&self, token: &str, query: &ListQuery) -> Result<Page<FcmLog>, ApiError> {
        self.fetch_page(token, FCM_LOGS_PATH, query, LOGS_ORDERING).await
    }

    pub async fn list_countries(&self, token: &str) -> Result<Vec<Country>, ApiError> {
        let page: Page<Country> = self
            .fetch_page(token, COUNTRIES_PATH, &ListQuery::unpaged(), LOGS_ORDERING)
            .await?;
        Ok(page.results)
    }

    pub async fn create_network(&self, token: &str, network: &NewNetwork) -> Result<Value, ApiError> {
        self.send(Method::POST, Some(token), NETWORKS_PATH, Some(network))
            .await
    }
}
