use axum::body::Body;
use axum::http::{HeaderValue, Request};
use http_body_util::BodyExt;
use pyper_axum::{axum, AxumApp};
use pyper_core::{PyperApp, PyperConfig};
use serde_json::Value;
use tower::ServiceExt;

fn app() -> AxumApp {
    let app = PyperApp::new(&PyperConfig::with_defaults()).unwrap();
    axum(app).with_http_layers()
}

async fn json_body(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn malformed_json_returns_bad_request() {
    let res = app()
        .router
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/session/tenant")
                .header("content-type", "application/json")
                .body(Body::from("{\"tenant\":"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 400);
    assert!(res.headers().get("x-request-id").is_some());
    let body = json_body(res).await;
    assert_eq!(body["name"], "BadRequest");
    assert_eq!(body["code"], 400);
    assert_eq!(body["className"], "bad-request");
    assert!(body["errors"]["_schema"].is_array());
}

#[tokio::test]
async fn request_id_is_preserved_when_provided() {
    let provided = HeaderValue::from_static("req-test-123");
    let res = app()
        .router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/session")
                .header("x-request-id", provided.clone())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(res.headers().get("x-request-id").unwrap(), &provided);
}

#[tokio::test]
async fn bad_query_reports_each_field() {
    let res = app()
        .router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/leads?status=hot&loading=sometimes")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 400);
    let body = json_body(res).await;
    assert_eq!(body["message"], "Invalid query parameters");
    assert!(body["errors"]["status"].is_array());
    assert!(body["errors"]["loading"].is_array());
}

#[tokio::test]
async fn unknown_route_is_not_found_shape() {
    let res = app()
        .router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/reports")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 404);
    let body = json_body(res).await;
    assert_eq!(body["name"], "NotFound");
    assert_eq!(body["className"], "not-found");
    assert_eq!(body["data"]["path"], "/reports");
}

#[tokio::test]
async fn create_lead_is_forbidden_for_agents() {
    let ax = app();

    let res = ax
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/session/role")
                .header("content-type", "application/json")
                .header("x-session-id", "agent-1")
                .body(Body::from("{\"role\":\"agent\"}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);

    let res = ax
        .router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/leads")
                .header("content-type", "application/json")
                .header("x-session-id", "agent-1")
                .body(Body::from("{\"name\":\"New Lead\"}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 403);
    let body = json_body(res).await;
    assert_eq!(body["name"], "Forbidden");
    assert_eq!(body["message"], "Role 'agent' lacks the 'create_leads' permission");
}

#[tokio::test]
async fn create_lead_is_not_implemented_for_admins() {
    let res = app()
        .router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/leads")
                .header("content-type", "application/json")
                .body(Body::from("{\"name\":\"New Lead\"}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 501);
    let body = json_body(res).await;
    assert_eq!(body["name"], "NotImplemented");
    assert_eq!(body["code"], 501);
    assert_eq!(body["message"], "Creating leads is not available yet");
}
