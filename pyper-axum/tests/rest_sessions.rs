use axum::body::Body;
use axum::http::{HeaderValue, Request};
use http_body_util::BodyExt;
use pyper_axum::{axum, AxumApp};
use pyper_core::config::SESSION_MAX_SESSIONS;
use pyper_core::{PyperApp, PyperConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

fn server(max_sessions: usize) -> AxumApp {
    let mut config = PyperConfig::with_defaults();
    config.set(SESSION_MAX_SESSIONS, max_sessions.to_string());
    axum(PyperApp::new(&config).unwrap())
}

fn request(method: &str, uri: &str, session: &str, body: Option<Value>) -> Request<Body> {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-session-id", session);
    match body {
        Some(v) => req
            .header("content-type", "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    }
}

async fn send(ax: &AxumApp, req: Request<Body>) -> (u16, Value) {
    let res = ax.router.clone().oneshot(req).await.unwrap();
    let status = res.status().as_u16();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn tenant_of(ax: &AxumApp, session: &str) -> Value {
    let (_, body) = send(ax, request("GET", "/session", session, None)).await;
    body["tenant"].clone()
}

#[tokio::test]
async fn ending_a_session_shrinks_the_registry() {
    let ax = server(16);
    for id in ["s1", "s2", "s3"] {
        send(&ax, request("GET", "/session", id, None)).await;
    }
    assert_eq!(ax.sessions.len().await, 3);

    let body = json!({"tenant": "org-b"});
    send(&ax, request("PUT", "/session/tenant", "s1", Some(body))).await;

    let (status, body) = send(&ax, request("DELETE", "/session", "s1", None)).await;
    assert_eq!(status, 204);
    assert_eq!(body, Value::Null);
    assert_eq!(ax.sessions.len().await, 2);

    let (status, body) = send(&ax, request("DELETE", "/session", "s1", None)).await;
    assert_eq!(status, 404);
    assert_eq!(body["name"], "NotFound");
    assert_eq!(ax.sessions.len().await, 2);

    // A returning caller starts over from the configured defaults.
    assert_eq!(tenant_of(&ax, "s1").await, "org-a");
    assert_eq!(ax.sessions.len().await, 3);
}

#[tokio::test]
async fn new_callers_evict_the_least_recently_used_session() {
    let ax = server(2);

    let body = json!({"tenant": "org-b"});
    send(&ax, request("PUT", "/session/tenant", "a", Some(body))).await;
    send(&ax, request("GET", "/session", "b", None)).await;
    send(&ax, request("GET", "/leads", "a", None)).await;
    send(&ax, request("GET", "/session", "c", None)).await;

    assert_eq!(ax.sessions.len().await, 2);
    assert_eq!(tenant_of(&ax, "a").await, "org-b");
    assert_eq!(ax.sessions.len().await, 2);

    for id in 0..10 {
        send(&ax, request("GET", "/session", &format!("burst-{id}"), None)).await;
    }
    assert_eq!(ax.sessions.len().await, 2);
}

#[tokio::test]
async fn unreadable_session_header_is_rejected() {
    let ax = server(16);
    let req = Request::builder()
        .uri("/session")
        .header("x-session-id", HeaderValue::from_bytes(b"caf\xc3\xa9").unwrap())
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&ax, req).await;
    assert_eq!(status, 400);
    assert_eq!(body["name"], "BadRequest");
    assert!(body["errors"]["x-session-id"].is_array());
    assert!(ax.sessions.is_empty().await);
}
