use std::collections::HashMap;

use axum::{
    extract::rejection::JsonRejection,
    extract::{OriginalUri, Query, State},
    http::{HeaderMap, StatusCode},
    routing, Json, Router,
};
use pyper_core::errors::{PyperError, PyperResult};
use pyper_core::view::{
    render_call_logs, render_settings, CallLogsView, DashboardView, LeadsView, SessionView,
    SettingsView,
};
use pyper_core::{Permission, TenantInfo};
use serde_json::{json, Value};

use crate::{
    params::{RoleSwitch, TenantSwitch, ViewParams},
    session::session_from_headers,
    PyperAxumError, PyperAxumState,
};

type RestResult<T> = Result<Json<T>, PyperAxumError>;

fn map_json_rejection(rejection: JsonRejection) -> PyperAxumError {
    PyperError::bad_request("Failed to parse the request body as JSON")
        .with_errors(json!({"_schema": [rejection.to_string()]}))
        .into()
}

pub fn dashboard_router(state: PyperAxumState) -> Router<()> {
    Router::new()
        .route("/tenants", routing::get(list_tenants))
        .route("/session", routing::get(get_session).delete(end_session))
        .route("/session/tenant", routing::put(switch_tenant))
        .route("/session/role", routing::put(switch_role))
        .route("/leads", routing::get(get_leads).post(create_lead))
        .route("/calls", routing::get(get_calls))
        .route("/settings", routing::get(get_settings))
        .route("/dashboard", routing::get(get_dashboard))
        .fallback(not_found)
        .with_state(state)
}

async fn list_tenants(State(state): State<PyperAxumState>) -> Json<Vec<TenantInfo>> {
    Json(state.app.store().tenants())
}

async fn get_session(
    State(state): State<PyperAxumState>,
    headers: HeaderMap,
) -> RestResult<SessionView> {
    let sid = session_from_headers(&headers)?;
    let session = state.sessions.get_or_create(&sid, &state.app).await;
    let session = session.lock().await;

    Ok(Json(SessionView::build(
        &session.access,
        state.app.store(),
        session.dashboard.active_tab(),
    )))
}

async fn switch_tenant(
    State(state): State<PyperAxumState>,
    headers: HeaderMap,
    body: Result<Json<TenantSwitch>, JsonRejection>,
) -> RestResult<SessionView> {
    let Json(body) = body.map_err(map_json_rejection)?;

    let sid = session_from_headers(&headers)?;
    let session = state.sessions.get_or_create(&sid, &state.app).await;
    let mut session = session.lock().await;
    session.switch_tenant(&state.app, &body.tenant);

    Ok(Json(SessionView::build(
        &session.access,
        state.app.store(),
        session.dashboard.active_tab(),
    )))
}

async fn switch_role(
    State(state): State<PyperAxumState>,
    headers: HeaderMap,
    body: Result<Json<RoleSwitch>, JsonRejection>,
) -> RestResult<SessionView> {
    let Json(body) = body.map_err(map_json_rejection)?;

    let sid = session_from_headers(&headers)?;
    let session = state.sessions.get_or_create(&sid, &state.app).await;
    let mut session = session.lock().await;
    session.switch_role(&body.role);

    Ok(Json(SessionView::build(
        &session.access,
        state.app.store(),
        session.dashboard.active_tab(),
    )))
}

async fn get_leads(
    State(state): State<PyperAxumState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> RestResult<LeadsView> {
    let params = ViewParams::from_query(&query)?;

    let sid = session_from_headers(&headers)?;
    let session = state.sessions.get_or_create(&sid, &state.app).await;
    let mut session = session.lock().await;
    let session = &mut *session;

    if let Some(filter) = params.status {
        session.dashboard.leads_mut().set_filter(filter);
    }
    let view = session
        .dashboard
        .leads_mut()
        .render(&session.access, state.app.store(), params.loading);
    Ok(Json(view))
}

/// Forget the caller's session; the next request starts from the defaults.
async fn end_session(
    State(state): State<PyperAxumState>,
    headers: HeaderMap,
) -> Result<StatusCode, PyperAxumError> {
    let sid = session_from_headers(&headers)?;
    if !state.sessions.remove(&sid).await {
        return Err(PyperError::not_found(format!("No session '{sid}'")).into());
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Lead creation is reserved: callers without `create_leads` are refused,
/// everyone else learns it is not there yet.
async fn create_lead(
    State(state): State<PyperAxumState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> RestResult<Value> {
    let sid = session_from_headers(&headers)?;
    let session = state.sessions.get_or_create(&sid, &state.app).await;
    let session = session.lock().await;
    session.access.require(Permission::CreateLeads)?;

    let Json(_lead) = body.map_err(map_json_rejection)?;
    Ok(Json(not_yet_available("Creating leads")?))
}

fn not_yet_available(what: &str) -> PyperResult<Value> {
    pyper_core::bail_pyper!(not_implemented, "{} is not available yet", what);
}

async fn get_calls(
    State(state): State<PyperAxumState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> RestResult<CallLogsView> {
    let params = ViewParams::from_query(&query)?;

    let sid = session_from_headers(&headers)?;
    let session = state.sessions.get_or_create(&sid, &state.app).await;
    let session = session.lock().await;

    Ok(Json(render_call_logs(
        &session.access,
        state.app.store(),
        params.loading,
    )))
}

async fn get_settings(
    State(state): State<PyperAxumState>,
    headers: HeaderMap,
) -> RestResult<SettingsView> {
    let sid = session_from_headers(&headers)?;
    let session = state.sessions.get_or_create(&sid, &state.app).await;
    let session = session.lock().await;

    Ok(Json(render_settings(
        &session.access,
        state.app.store(),
        state.app.info(),
    )))
}

async fn get_dashboard(
    State(state): State<PyperAxumState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> RestResult<DashboardView> {
    let params = ViewParams::from_query(&query)?;

    let sid = session_from_headers(&headers)?;
    let session = state.sessions.get_or_create(&sid, &state.app).await;
    let mut session = session.lock().await;
    let session = &mut *session;

    if let Some(tab) = params.tab {
        session.dashboard.set_active_tab(tab);
    }
    if let Some(filter) = params.status {
        session.dashboard.leads_mut().set_filter(filter);
    }

    Ok(Json(session.dashboard.render(
        &session.access,
        state.app.store(),
        state.app.info(),
        params.loading,
    )))
}

async fn not_found(OriginalUri(uri): OriginalUri) -> PyperAxumError {
    PyperError::not_found(format!("Page not found: {}", uri.path()))
        .with_data(json!({"path": uri.path()}))
        .into()
}
