use axum::extract::Request;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

pub const SIGN_IN_PATH: &str = "/sign-in";

/// Middleware that sends 401 responses to the sign-in page. htmx requests get
/// an `HX-Redirect` header so the whole page navigates, not just the swapped
/// fragment.
pub async fn redirect_unauthorized(req: Request, next: Next) -> Response {
    let is_htmx = req.headers().contains_key("hx-request");
    let response = next.run(req).await;
    if response.status() != StatusCode::UNAUTHORIZED {
        return response;
    }

    if is_htmx {
        let mut resp = StatusCode::NO_CONTENT.into_response();
        resp.headers_mut()
            .insert("hx-redirect", HeaderValue::from_static(SIGN_IN_PATH));
        resp
    } else {
        Redirect::to(SIGN_IN_PATH).into_response()
    }
}
