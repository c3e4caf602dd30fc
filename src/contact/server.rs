use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::signal;
use tracing::{debug, error, info, warn};

use super::{
    form::ContactRequest,
    mailer::{Email, Mailer},
};
use crate::config::ContactConfig;

pub const CONTACT_PATH: &str = "/api/contact";

#[derive(Clone)]
pub struct AppState {
    mailer: Arc<dyn Mailer>,
    contact: Arc<ContactConfig>,
}

impl AppState {
    pub fn new(mailer: Arc<dyn Mailer>, contact: ContactConfig) -> Self {
        Self {
            mailer,
            contact: Arc::new(contact),
        }
    }
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Incoming body; every field is optional so a missing one is a 400, not a
/// deserialization failure.
#[derive(Debug, Default, Deserialize)]
struct ContactPayload {
    name: Option<String>,
    email: Option<String>,
    message: Option<String>,
}

impl ContactPayload {
    fn into_request(self) -> Option<ContactRequest> {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());
        Some(ContactRequest {
            name: present(self.name)?,
            email: present(self.email)?,
            message: present(self.message)?,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(CONTACT_PATH, post(send_contact).fallback(method_not_allowed))
        .with_state(state)
}

async fn method_not_allowed() -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Only POST allowed")
}

async fn send_contact(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<Value>> {
    let payload: ContactPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            debug!("Unreadable contact body: {}", e);
            ContactPayload::default()
        }
    };
    let Some(request) = payload.into_request() else {
        warn!("Rejecting contact request with missing fields");
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Missing fields"));
    };

    let email = Email::inquiry(&state.contact, &request);
    if let Err(e) = state.mailer.send(&email).await {
        error!("Failed to send contact mail via {}: {:#}", state.mailer.name(), e);
        return Err(ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Email failed to send",
        ));
    }

    info!("Forwarded contact request from {}", request.email);
    Ok(Json(json!({ "success": true })))
}

pub async fn serve(bind: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind to {}", bind))?;
    info!("Contact endpoint listening on http://{}{}", bind, CONTACT_PATH);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Contact server failed")?;

    info!("Contact server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {}", e);
    }
}
