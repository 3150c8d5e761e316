#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use reqwest::Client;
use serde_json::{json, Value};

use paladmin::config::Config;

pub const TOKEN: &str = "test-session-token";

/// One request as seen by the mock upstream API.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    /// Raw query string, exactly as it arrived on the wire.
    pub query: String,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
    pub delay: Duration,
}

impl Reply {
    pub fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body,
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body,
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Default)]
struct MockState {
    requests: Mutex<Vec<Recorded>>,
    /// (method, path) -> queued replies; the last one keeps answering
    replies: Mutex<HashMap<(String, String), VecDeque<Reply>>>,
}

/// A stand-in for the remote back-office API that records every request.
#[derive(Clone)]
pub struct MockUpstream {
    pub addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Queue a reply for `method path`. Replies are used in order; the last
    /// one is repeated.
    pub fn on(&self, method: &str, path: &str, reply: Reply) {
        self.state
            .replies
            .lock()
            .unwrap()
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

async fn mock_handler(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let path = uri.path().to_string();
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: path.clone(),
        query: uri.query().unwrap_or_default().to_string(),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    let reply = {
        let mut replies = state.replies.lock().unwrap();
        match replies.get_mut(&(method.to_string(), path)) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        }
    };

    let reply = reply.unwrap_or_else(|| {
        Reply::status(StatusCode::NOT_FOUND, json!({ "detail": "Not found." }))
    });
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }
    (reply.status, axum::Json(reply.body))
}

pub async fn spawn_upstream() -> MockUpstream {
    let state = Arc::new(MockState::default());
    let router = Router::new()
        .fallback(mock_handler)
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock upstream");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    MockUpstream { addr, state }
}

/// A running dashboard wired to its own mock upstream.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub upstream: MockUpstream,
}

pub struct Page {
    pub status: StatusCode,
    pub headers: reqwest::header::HeaderMap,
    pub body: String,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn into_page(resp: reqwest::Response) -> Page {
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.text().await.unwrap_or_default();
        Page {
            status,
            headers,
            body,
        }
    }

    /// GET with the session cookie set.
    pub async fn get(&self, path: &str) -> Page {
        let resp = self
            .client
            .get(self.url(path))
            .header("cookie", format!("accessToken={TOKEN}"))
            .send()
            .await
            .expect("get request failed");
        Self::into_page(resp).await
    }

    /// GET as htmx would issue it.
    pub async fn get_htmx(&self, path: &str) -> Page {
        let resp = self
            .client
            .get(self.url(path))
            .header("cookie", format!("accessToken={TOKEN}"))
            .header("hx-request", "true")
            .send()
            .await
            .expect("htmx request failed");
        Self::into_page(resp).await
    }

    pub async fn get_anonymous(&self, path: &str) -> Page {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("get request failed");
        Self::into_page(resp).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> Page {
        let resp = self
            .client
            .get(self.url(path))
            .header("cookie", format!("accessToken={token}"))
            .send()
            .await
            .expect("get request failed");
        Self::into_page(resp).await
    }

    /// Form POST with the session cookie set.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Page {
        let resp = self
            .client
            .post(self.url(path))
            .header("cookie", format!("accessToken={TOKEN}"))
            .form(form)
            .send()
            .await
            .expect("post request failed");
        Self::into_page(resp).await
    }

    pub async fn post_anonymous(&self, path: &str, form: &[(&str, &str)]) -> Page {
        let resp = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("post request failed");
        Self::into_page(resp).await
    }
}

impl Page {
    pub fn location(&self) -> Option<&str> {
        self.headers.get("location").and_then(|v| v.to_str().ok())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// `hx-get` targets in the body, with HTML entity escaping undone.
    pub fn hx_links(&self) -> Vec<String> {
        self.body
            .split("hx-get=\"")
            .skip(1)
            .filter_map(|rest| rest.split('"').next())
            .map(|url| url.replace("&#38;", "&").replace("&amp;", "&"))
            .collect()
    }

    pub fn cookies(&self) -> Vec<String> {
        self.headers
            .get_all("set-cookie")
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect()
    }
}

pub fn test_config(upstream: &MockUpstream) -> Config {
    Config {
        api_base_url: upstream.base_url(),
        api_token: None,
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        api_timeout_secs: 5,
        secure_cookies: false,
        ordering_style: None,
        partners_enabled: true,
        profile_endpoint: None,
        log_level: "warn".to_string(),
        login_max_failures: 5,
        login_window_secs: 900,
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Spawn a dashboard after letting the test adjust its configuration.
pub async fn spawn_app_with(adjust: impl FnOnce(&mut Config)) -> TestApp {
    let upstream = spawn_upstream().await;
    let mut config = test_config(&upstream);
    adjust(&mut config);

    let state = paladmin::build_state(config).expect("Failed to build state");
    let app = paladmin::build_app(state);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        client,
        upstream,
    }
}

pub fn user_json(uid: &str, name: &str, active: bool) -> Value {
    json!({
        "uid": uid,
        "email": format!("{uid}@example.com"),
        "phone": null,
        "display_name": name,
        "first_name": name,
        "last_name": "Tester",
        "is_active": active,
        "email_verified": false,
        "phone_verified": false,
        "is_partner": false,
        "can_process_ussd_transaction": false,
        "created_at": "2024-03-01T09:30:00Z",
        "last_login_at": null
    })
}
