use std::net::IpAddr;

use crate::api::query::OrderingStyle;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub host: IpAddr,
    pub port: u16,
    pub api_timeout_secs: u64,
    pub secure_cookies: bool,
    pub ordering_style: Option<OrderingStyle>,
    pub partners_enabled: bool,
    pub profile_endpoint: Option<String>,
    pub log_level: String,
    pub login_max_failures: u32,
    pub login_window_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let api_base_url = env_required("PALADMIN_API_BASE_URL")?
            .trim_end_matches('/')
            .to_string();
        if api_base_url.is_empty() {
            return Err("PALADMIN_API_BASE_URL must not be empty".to_string());
        }

        let api_token = env_optional("PALADMIN_API_TOKEN");

        let host: IpAddr = env_or("PALADMIN_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid PALADMIN_HOST: {e}"))?;

        let port: u16 = env_or("PALADMIN_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid PALADMIN_PORT: {e}"))?;

        let api_timeout_secs: u64 = env_or("PALADMIN_API_TIMEOUT_SECS", "30")
            .parse()
            .map_err(|e| format!("Invalid PALADMIN_API_TIMEOUT_SECS: {e}"))?;

        let secure_cookies = parse_bool("PALADMIN_SECURE_COOKIES", &env_or("PALADMIN_SECURE_COOKIES", "true"))?;

        let ordering_style = match env_optional("PALADMIN_ORDERING_STYLE") {
            Some(raw) => Some(
                raw.parse::<OrderingStyle>()
                    .map_err(|e| format!("Invalid PALADMIN_ORDERING_STYLE: {e}"))?,
            ),
            None => None,
        };

        let partners_enabled =
            parse_bool("PALADMIN_PARTNERS_ENABLED", &env_or("PALADMIN_PARTNERS_ENABLED", "false"))?;

        let profile_endpoint = env_optional("PALADMIN_PROFILE_ENDPOINT");

        let log_level = env_or("PALADMIN_LOG_LEVEL", "info");

        let login_max_failures: u32 = env_or("PALADMIN_LOGIN_MAX_FAILURES", "5")
            .parse()
            .map_err(|e| format!("Invalid PALADMIN_LOGIN_MAX_FAILURES: {e}"))?;

        let login_window_secs: u64 = env_or("PALADMIN_LOGIN_WINDOW_SECS", "900")
            .parse()
            .map_err(|e| format!("Invalid PALADMIN_LOGIN_WINDOW_SECS: {e}"))?;

        Ok(Config {
            api_base_url,
            api_token,
            host,
            port,
            api_timeout_secs,
            secure_cookies,
            ordering_style,
            partners_enabled,
            profile_endpoint,
            log_level,
            login_max_failures,
            login_window_secs,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("Invalid {key}: expected a boolean, got '{other}'")),
    }
}
