mod common;

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

use common::{user_json, Reply};
use paladmin::api::query::OrderingStyle;

const USERS: &str = "/api/auth/admin/users/";

// ── Shell ───────────────────────────────────────────────────────

#[tokio::test]
async fn health_returns_ok() {
    let app = common::spawn_app().await;

    let page = app.get_anonymous("/health").await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.body, "ok");
    assert_eq!(page.header("x-content-type-options"), Some("nosniff"));
    assert_eq!(page.header("x-frame-options"), Some("DENY"));
}

// ── Sessions ────────────────────────────────────────────────────

#[tokio::test]
async fn dashboard_without_token_redirects_to_sign_in() {
    let app = common::spawn_app().await;

    for path in ["/dashboard", "/dashboard/users/list", "/dashboard/profile"] {
        let page = app.get_anonymous(path).await;
        assert_eq!(page.status, StatusCode::SEE_OTHER, "{path}");
        assert_eq!(page.location(), Some("/sign-in"), "{path}");
    }
    assert!(app.upstream.requests().is_empty());
}

#[tokio::test]
async fn htmx_request_without_token_gets_hx_redirect() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .get(app.url("/htmx/users/table"))
        .header("hx-request", "true")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        resp.headers().get("hx-redirect").and_then(|v| v.to_str().ok()),
        Some("/sign-in")
    );
}

#[tokio::test]
async fn expired_jwt_redirects_without_calling_upstream() {
    let app = common::spawn_app().await;
    let claims = json!({ "user_id": "admin-1", "exp": Utc::now().timestamp() - 3600 });
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"upstream")).unwrap();

    let page = app.get_with_token("/dashboard/users/list", &token).await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/sign-in"));
    assert!(app.upstream.requests().is_empty());
}

#[tokio::test]
async fn upstream_401_ends_the_session() {
    let app = common::spawn_app().await;
    app.upstream.on(
        "GET",
        USERS,
        Reply::status(StatusCode::UNAUTHORIZED, json!({ "detail": "Token expired" })),
    );

    let page = app.get("/dashboard/users/list").await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/sign-in"));
}

#[tokio::test]
async fn sign_in_page_redirects_when_signed_in() {
    let app = common::spawn_app().await;

    let page = app.get("/sign-in").await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/dashboard"));

    let page = app.get_anonymous("/sign-in").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("name=\"identifier\""));
}

#[tokio::test]
async fn sign_in_sets_access_cookie() {
    let app = common::spawn_app().await;
    app.upstream.on(
        "POST",
        "/api/auth/login/",
        Reply::ok(json!({ "tokens": { "access": "fresh-token", "refresh": "r" } })),
    );

    let page = app
        .post_anonymous("/sign-in", &[("identifier", "admin@example.com"), ("password", "secret")])
        .await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/dashboard"));
    assert!(page.cookies().iter().any(|c| c.starts_with("accessToken=fresh-token")));

    let login = &app.upstream.requests_to("/api/auth/login/")[0];
    assert_eq!(login.body["identifier"], "admin@example.com");
    assert_eq!(login.body["password"], "secret");
}

#[tokio::test]
async fn sign_in_with_bad_credentials_shows_error() {
    let app = common::spawn_app().await;
    app.upstream.on(
        "POST",
        "/api/auth/login/",
        Reply::status(StatusCode::UNAUTHORIZED, json!({ "detail": "No active account" })),
    );

    let page = app
        .post_anonymous("/sign-in", &[("identifier", "admin@example.com"), ("password", "nope")])
        .await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Invalid credentials"));
    assert!(page.cookies().iter().all(|c| !c.starts_with("accessToken=")));
}

#[tokio::test]
async fn sign_in_is_throttled_after_repeated_failures() {
    let app = common::spawn_app().await;
    app.upstream.on(
        "POST",
        "/api/auth/login/",
        Reply::status(StatusCode::UNAUTHORIZED, json!({ "detail": "No active account" })),
    );

    for _ in 0..5 {
        app.post_anonymous("/sign-in", &[("identifier", "admin@example.com"), ("password", "x")])
            .await;
    }
    let page = app
        .post_anonymous("/sign-in", &[("identifier", "ADMIN@example.com"), ("password", "x")])
        .await;
    assert!(page.body.contains("Too many sign-in attempts"));
    assert_eq!(app.upstream.requests_to("/api/auth/login/").len(), 5);
}

#[tokio::test]
async fn sign_out_clears_the_cookie() {
    let app = common::spawn_app().await;

    let page = app.post_form("/sign-out", &[]).await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/sign-in"));
    assert!(
        page.cookies()
            .iter()
            .any(|c| c.starts_with("accessToken=;") && c.contains("Max-Age=0"))
    );
}

// ── List-fetch cycle ────────────────────────────────────────────

#[tokio::test]
async fn empty_lists_render_their_empty_state() {
    let app = common::spawn_app().await;
    let empty = json!({ "count": 0, "next": null, "previous": null, "results": [] });
    app.upstream.on("GET", USERS, Reply::ok(empty.clone()));
    app.upstream.on("GET", "/api/auth/admin/users/partners/", Reply::ok(empty.clone()));
    app.upstream.on("GET", "/api/payments/sms-logs/", Reply::ok(empty.clone()));
    app.upstream.on("GET", "/api/payments/fcm-logs/", Reply::ok(empty));

    let cases = [
        ("/dashboard/users/list", "No users found.", "user-row"),
        ("/dashboard/partner", "No partners found.", "partner-row"),
        ("/dashboard/sms-logs/list", "No SMS logs found.", "log-row"),
        ("/dashboard/fcm-logs/list", "No FCM logs found.", "log-row"),
    ];
    for (path, empty_text, row_class) in cases {
        let page = app.get(path).await;
        assert_eq!(page.status, StatusCode::OK, "{path}");
        assert!(page.body.contains(empty_text), "{path}");
        assert!(!page.body.contains(row_class), "{path}");
        assert!(page.body.contains("data-count=\"0\""), "{path}");
    }
}

#[tokio::test]
async fn bare_array_counts_its_rows() {
    let app = common::spawn_app().await;
    app.upstream.on(
        "GET",
        USERS,
        Reply::ok(json!([user_json("u1", "Ada", true), user_json("u2", "Grace", false)])),
    );

    let page = app.get("/dashboard/users/list").await;
    assert!(page.body.contains("data-count=\"2\""));
    assert_eq!(page.body.matches("class=\"user-row\"").count(), 2);
    assert!(page.body.contains("Ada"));
    assert!(page.body.contains("Grace"));
}

#[tokio::test]
async fn failed_fetch_resets_count_until_refresh() {
    let app = common::spawn_app().await;
    app.upstream.on(
        "GET",
        USERS,
        Reply::status(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "detail": "Database unavailable" }),
        ),
    );
    app.upstream.on(
        "GET",
        USERS,
        Reply::ok(json!({ "count": 3, "results": [user_json("u1", "Ada", true)] })),
    );

    let page = app.get("/dashboard/users/list").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("data-count=\"0\""));
    assert!(page.body.contains("Database unavailable"));
    assert!(page.body.contains("Failed to load users"));

    let partial = app.get_htmx("/htmx/users/table?page=1").await;
    assert_eq!(partial.status, StatusCode::OK);
    assert!(partial.body.contains("data-count=\"3\""));
    assert!(!partial.body.contains("Database unavailable"));
    assert!(partial.body.contains("Users loaded"));
}

#[tokio::test]
async fn users_query_sends_literal_plus_ordering() {
    let app = common::spawn_app().await;
    app.upstream.on("GET", USERS, Reply::ok(json!({ "count": 0, "results": [] })));

    app.get_htmx("/htmx/users/table?sort=created_at&dir=asc&search=%20%20&status=all")
        .await;

    let request = &app.upstream.requests_to(USERS)[0];
    assert!(request.query.contains("ordering=+created_at"), "{}", request.query);
    assert!(!request.query.contains("%2B"));
    assert!(request.query.contains("page=1"));
    assert!(request.query.contains("page_size=10"));
    assert!(!request.query.contains("search="));
    assert!(!request.query.contains("status="));
}

#[tokio::test]
async fn pending_status_uses_pending_endpoint() {
    let app = common::spawn_app().await;
    let pending = "/api/auth/admin/users/pending/";
    app.upstream.on("GET", pending, Reply::ok(json!({ "count": 0, "results": [] })));

    app.get("/dashboard/users/list?status=pending").await;

    let requests = app.upstream.requests_to(pending);
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].query.contains("status="));
}

#[tokio::test]
async fn partners_use_django_ordering_and_keyed_envelope() {
    let app = common::spawn_app().await;
    let partners = "/api/auth/admin/users/partners/";
    let mut partner = user_json("p1", "Kofi", true);
    partner["total_commissions_received"] = json!("15000.50");
    partner["total_transactions"] = json!(12);
    app.upstream.on(
        "GET",
        partners,
        Reply::ok(json!({ "partners": [partner], "pagination": { "total_count": 40, "total_pages": 2 } })),
    );

    let page = app
        .get("/dashboard/partner?sort=email&dir=asc&is_active=true")
        .await;
    assert!(page.body.contains("data-count=\"40\""));
    assert!(page.body.contains("15 001 XOF"));

    let request = &app.upstream.requests_to(partners)[0];
    assert!(request.query.contains("ordering=email"), "{}", request.query);
    assert!(!request.query.contains("ordering=+"));
    assert!(request.query.contains("is_active=true"));
    assert!(request.query.contains("page_size=20"));
}

#[tokio::test]
async fn ordering_style_override_applies_to_every_list() {
    let app = common::spawn_app_with(|c| c.ordering_style = Some(OrderingStyle::Django)).await;
    app.upstream.on("GET", USERS, Reply::ok(json!([])));

    app.get("/dashboard/users/list?sort=display_name&dir=asc").await;

    let request = &app.upstream.requests_to(USERS)[0];
    assert!(request.query.contains("ordering=display_name"));
}

#[tokio::test]
async fn sort_headers_toggle_direction() {
    let app = common::spawn_app().await;
    app.upstream.on("GET", USERS, Reply::ok(json!([user_json("u1", "Ada", true)])));

    let page = app
        .get_htmx("/htmx/users/table?sort=created_at&dir=desc")
        .await;
    let links = page.hx_links();
    // Same field flips, another field starts descending
    let created_asc = links
        .iter()
        .find(|l| l.ends_with("page=1&sort=created_at&dir=asc"))
        .expect("created_at header should flip to ascending");
    assert!(links.iter().any(|l| l.ends_with("page=1&sort=email&dir=desc")));

    // Clicking the flipped header again flips it back
    let page = app.get_htmx(created_asc).await;
    assert!(
        page.hx_links()
            .iter()
            .any(|l| l.ends_with("page=1&sort=created_at&dir=desc"))
    );

    let requests = app.upstream.requests_to(USERS);
    assert!(requests[0].query.contains("ordering=-created_at"));
    assert!(requests[1].query.contains("ordering=+created_at"));
}

#[tokio::test]
async fn pager_disables_previous_on_first_and_next_on_last_page() {
    let app = common::spawn_app().await;
    app.upstream.on(
        "GET",
        USERS,
        Reply::ok(json!({ "count": 25, "results": [user_json("u1", "Ada", true)] })),
    );

    let first = app.get_htmx("/htmx/users/table?page=1").await;
    assert!(first.body.contains("disabled>Previous"));
    assert!(!first.body.contains("disabled>Next"));
    assert!(first.body.contains("Showing 1 to 10 of 25"));

    let last = app.get_htmx("/htmx/users/table?page=3").await;
    assert!(!last.body.contains("disabled>Previous"));
    assert!(last.body.contains("disabled>Next"));
    assert!(last.body.contains("Showing 21 to 25 of 25"));
}

#[tokio::test]
async fn superseded_partial_is_discarded() {
    let app = common::spawn_app().await;
    app.upstream.on(
        "GET",
        USERS,
        Reply::ok(json!({ "count": 1, "results": [user_json("old", "Stale", true)] }))
            .delayed(Duration::from_millis(400)),
    );
    app.upstream.on(
        "GET",
        USERS,
        Reply::ok(json!({ "count": 2, "results": [user_json("new", "Fresh", true)] })),
    );

    let client = app.client.clone();
    let slow_url = app.url("/htmx/users/table?search=slow");
    let slow = tokio::spawn(async move {
        client
            .get(slow_url)
            .header("cookie", format!("accessToken={}", common::TOKEN))
            .send()
            .await
            .unwrap()
            .status()
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    let fast = app.get_htmx("/htmx/users/table?search=fast").await;

    assert_eq!(fast.status, StatusCode::OK);
    assert!(fast.body.contains("Fresh"));
    assert_eq!(slow.await.unwrap(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn sms_logs_read_alternate_field_names() {
    let app = common::spawn_app().await;
    app.upstream.on(
        "GET",
        "/api/payments/sms-logs/",
        Reply::ok(json!({
            "count": 1,
            "results": [{
                "id": 7,
                "recipient": "+22500000",
                "content": "Your code is 1234",
                "message_type": "verification",
                "delivery_status": "delivered",
                "price": "12.5",
                "timestamp": "2024-05-01T10:00:00"
            }]
        })),
    );

    let page = app
        .get("/dashboard/sms-logs/list?type=all&status=failed")
        .await;
    assert!(page.body.contains("+22500000"));
    assert!(page.body.contains("Your code is 1234"));
    assert!(page.body.contains("12.50"));
    assert!(page.body.contains("2024-05-01 10:00"));
    assert!(page.body.contains("badge-success"));

    let request = &app.upstream.requests_to("/api/payments/sms-logs/")[0];
    assert!(request.query.contains("status=failed"));
    assert!(!request.query.contains("type="));
    assert!(request.query.contains("page_size=20"));
}

#[tokio::test]
async fn fcm_page_size_is_limited_to_offered_sizes() {
    let app = common::spawn_app().await;
    let path = "/api/payments/fcm-logs/";
    app.upstream.on("GET", path, Reply::ok(json!([])));

    app.get("/dashboard/fcm-logs/list?page_size=50&device_id=abc").await;
    app.get("/dashboard/fcm-logs/list?page_size=37").await;

    let requests = app.upstream.requests_to(path);
    assert!(requests[0].query.contains("page_size=50"));
    assert!(requests[0].query.contains("device_id=abc"));
    assert!(requests[1].query.contains("page_size=100"));
}

#[tokio::test]
async fn partner_screen_is_disabled_by_default() {
    let app = common::spawn_app_with(|c| c.partners_enabled = false).await;

    let page = app.get("/dashboard/partner").await;
    assert_eq!(page.status, StatusCode::NOT_FOUND);
    assert!(app.upstream.requests().is_empty());
}

// ── Detail-on-demand ────────────────────────────────────────────

#[tokio::test]
async fn detail_modal_fetches_on_every_open() {
    let app = common::spawn_app().await;
    app.upstream.on(
        "GET",
        "/api/auth/admin/users/u1/",
        Reply::ok(user_json("u1", "Ada", true)),
    );

    for _ in 0..2 {
        let page = app.get_htmx("/htmx/users/u1").await;
        assert_eq!(page.status, StatusCode::OK);
        assert!(page.body.contains("User details"));
        assert!(page.body.contains("u1@example.com"));
    }
    assert_eq!(app.upstream.requests_to("/api/auth/admin/users/u1/").len(), 2);
}

#[tokio::test]
async fn detail_modal_shows_its_own_error() {
    let app = common::spawn_app().await;

    let page = app.get_htmx("/htmx/users/missing").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("banner-error"));
    assert!(page.body.contains("Not found."));
}

// ── Mutations ───────────────────────────────────────────────────

#[tokio::test]
async fn register_with_mismatched_passwords_never_calls_upstream() {
    let app = common::spawn_app().await;

    let page = app
        .post_form(
            "/dashboard/users/register",
            &[
                ("first_name", "Ada"),
                ("last_name", "Lovelace"),
                ("identifier", "ada@example.com"),
                ("password", "one-password"),
                ("password_confirm", "another-password"),
            ],
        )
        .await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Passwords do not match"));
    // Form state is kept
    assert!(page.body.contains("value=\"Ada\""));
    assert!(app.upstream.requests_to("/api/auth/register/").is_empty());
}

#[tokio::test]
async fn register_sends_email_or_phone() {
    let app = common::spawn_app_with(|c| c.api_token = Some("service-token".to_string())).await;
    app.upstream.on(
        "POST",
        "/api/auth/register/",
        Reply::status(StatusCode::CREATED, json!({ "uid": "new-1" })),
    );

    let page = app
        .post_form(
            "/dashboard/users/register",
            &[
                ("first_name", "Ama"),
                ("last_name", "Mensah"),
                ("identifier", "+225 07 00 00 00"),
                ("password", "pw-123456"),
                ("password_confirm", "pw-123456"),
                ("is_partner", "on"),
            ],
        )
        .await;
    assert!(page.body.contains("User registered successfully"));

    let request = &app.upstream.requests_to("/api/auth/register/")[0];
    assert_eq!(request.authorization.as_deref(), Some("Bearer service-token"));
    assert_eq!(request.body["phone"], "+225 07 00 00 00");
    assert!(request.body["email"].is_null());
    assert_eq!(request.body["is_partner"], true);
    assert_eq!(request.body["can_process_ussd_transaction"], false);
}

#[tokio::test]
async fn register_treats_detail_in_success_reply_as_failure() {
    let app = common::spawn_app().await;
    app.upstream.on(
        "POST",
        "/api/auth/register/",
        Reply::ok(json!({ "detail": "A user with this email already exists" })),
    );

    let page = app
        .post_form(
            "/dashboard/users/register",
            &[
                ("first_name", "Ada"),
                ("last_name", "Lovelace"),
                ("identifier", "ada@example.com"),
                ("password", "pw"),
                ("password_confirm", "pw"),
            ],
        )
        .await;
    assert!(page.body.contains("A user with this email already exists"));
    assert!(!page.body.contains("User registered successfully"));
}

#[tokio::test]
async fn activate_swaps_the_single_row() {
    let app = common::spawn_app().await;
    app.upstream.on(
        "PATCH",
        "/api/auth/admin/users/u1/activate/",
        Reply::ok(json!({ "message": "User activated", "user": user_json("u1", "Ada", true) })),
    );

    let page = app.post_form("/dashboard/users/u1/activate", &[]).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.trim_start().starts_with("<tr class=\"user-row\" id=\"user-u1\""));
    assert!(page.body.contains("/dashboard/users/u1/deactivate"));
    assert!(page.body.contains("User activated"));
}

#[tokio::test]
async fn deactivate_without_user_in_reply_rereads_the_record() {
    let app = common::spawn_app().await;
    app.upstream.on(
        "PATCH",
        "/api/auth/admin/users/u1/deactivate/",
        Reply::ok(json!({ "message": "Done", "user": { "is_active": false } })),
    );
    app.upstream.on(
        "GET",
        "/api/auth/admin/users/u1/",
        Reply::ok(user_json("u1", "Ada", true)),
    );

    let page = app.post_form("/dashboard/users/u1/deactivate", &[]).await;
    assert!(page.body.contains("/dashboard/users/u1/activate"));
    assert!(page.body.contains("Inactive"));
    assert_eq!(app.upstream.requests_to("/api/auth/admin/users/u1/").len(), 1);
}

#[tokio::test]
async fn partial_user_in_reply_is_merged_over_the_stored_record() {
    let app = common::spawn_app().await;
    app.upstream.on(
        "PATCH",
        "/api/auth/admin/users/u1/activate/",
        Reply::ok(json!({ "message": "ok", "user": { "uid": "u1", "is_active": true } })),
    );
    app.upstream.on(
        "GET",
        "/api/auth/admin/users/u1/",
        Reply::ok(user_json("u1", "Ada", false)),
    );

    let page = app.post_form("/dashboard/users/u1/activate", &[]).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Ada"));
    assert!(page.body.contains("u1@example.com"));
    assert!(!page.body.contains("Unnamed"));
    assert!(page.body.contains("/dashboard/users/u1/deactivate"));
    assert_eq!(app.upstream.requests_to("/api/auth/admin/users/u1/").len(), 1);
}

#[tokio::test]
async fn failed_activation_only_raises_a_toast() {
    let app = common::spawn_app().await;
    app.upstream.on(
        "PATCH",
        "/api/auth/admin/users/u1/activate/",
        Reply::status(StatusCode::BAD_REQUEST, json!({ "non_field_errors": ["User is locked"] })),
    );

    let page = app.post_form("/dashboard/users/u1/activate", &[]).await;
    assert_eq!(page.header("hx-retarget"), Some("#toasts"));
    assert!(page.body.contains("User is locked"));
    assert!(!page.body.contains("<tr"));
}

#[tokio::test]
async fn flag_update_rerenders_detail_with_flag_applied() {
    let app = common::spawn_app().await;
    app.upstream.on(
        "PATCH",
        "/api/auth/admin/users/u1/update/",
        Reply::ok(json!({ "message": "Updated" })),
    );
    app.upstream.on(
        "GET",
        "/api/auth/admin/users/u1/",
        Reply::ok(user_json("u1", "Ada", true)),
    );

    let page = app
        .post_form("/dashboard/users/u1/flags", &[("flag", "email_verified"), ("value", "true")])
        .await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Email verification enabled."));
    assert!(page.body.contains("verified"));

    let request = &app.upstream.requests_to("/api/auth/admin/users/u1/update/")[0];
    assert_eq!(request.method, "PATCH");
    assert_eq!(request.body, json!({ "email_verified": true }));
}

#[tokio::test]
async fn bulk_action_without_selection_is_a_no_op() {
    let app = common::spawn_app().await;

    let page = app
        .post_form("/dashboard/users/bulk-action", &[("action", "activate")])
        .await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/dashboard/users/list"));
    assert!(page.cookies().iter().any(|c| c.starts_with("flash=")));
    assert!(app.upstream.requests().is_empty());
}

#[tokio::test]
async fn bulk_action_posts_selected_ids_and_returns_to_first_page() {
    let app = common::spawn_app().await;
    app.upstream.on(
        "POST",
        "/api/auth/admin/users/bulk-action/",
        Reply::ok(json!({ "message": "2 users deactivated" })),
    );

    let page = app
        .post_form(
            "/dashboard/users/bulk-action",
            &[("action", "deactivate"), ("user_ids", "u1"), ("user_ids", "u2"), ("user_ids", "u1")],
        )
        .await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/dashboard/users/list?page=1"));

    let request = &app.upstream.requests_to("/api/auth/admin/users/bulk-action/")[0];
    assert_eq!(request.body, json!({ "action": "deactivate", "user_ids": ["u1", "u2"] }));
}

#[tokio::test]
async fn network_form_survives_a_failed_country_load() {
    let app = common::spawn_app().await;
    app.upstream.on(
        "GET",
        "/api/payments/countries/",
        Reply::status(StatusCode::SERVICE_UNAVAILABLE, json!({ "error": "maintenance" })),
    );

    let page = app.get("/dashboard/network/create").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Create network"));
    assert!(page.body.contains("Failed to load countries"));
    assert!(page.body.contains("No countries available."));
}

#[tokio::test]
async fn network_validation_blocks_the_request() {
    let app = common::spawn_app().await;
    app.upstream.on(
        "GET",
        "/api/payments/countries/",
        Reply::ok(json!([{ "id": 1, "nom": "Côte d'Ivoire", "code": "CI" }])),
    );

    let page = app
        .post_form("/dashboard/network/create", &[("nom", "Orange Money"), ("country", "1")])
        .await;
    assert!(page.body.contains("Network code is required"));
    assert!(page.body.contains("value=\"Orange Money\""));
    assert!(app.upstream.requests_to("/api/payments/networks/").is_empty());
}

#[tokio::test]
async fn network_creation_redirects_to_list() {
    let app = common::spawn_app().await;
    app.upstream.on(
        "POST",
        "/api/payments/networks/",
        Reply::status(StatusCode::CREATED, json!({ "id": 3 })),
    );

    let page = app
        .post_form(
            "/dashboard/network/create",
            &[("nom", "Orange Money"), ("code", "om"), ("country", "1"), ("is_active", "on")],
        )
        .await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/dashboard/network/list"));

    let request = &app.upstream.requests_to("/api/payments/networks/")[0];
    assert_eq!(request.body["code"], "OM");
    assert_eq!(request.body["is_active"], true);
    assert_eq!(request.body["sent_deposit_to_module"], false);
}

#[tokio::test]
async fn demo_profile_keeps_edits_per_session() {
    let app = common::spawn_app().await;

    let page = app.get("/dashboard/profile").await;
    assert!(page.body.contains("John Doe"));

    let page = app
        .post_form(
            "/dashboard/profile",
            &[("first_name", "Jane"), ("last_name", "Smith"), ("email", "jane@example.com"), ("phone", "")],
        )
        .await;
    assert!(page.body.contains("Profile updated successfully"));

    let page = app.get("/dashboard/profile").await;
    assert!(page.body.contains("Jane Smith"));

    let other = app.get_with_token("/dashboard/profile", "another-session").await;
    assert!(other.body.contains("John Doe"));
}
