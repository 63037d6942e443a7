//! Handler faults and the single responder that turns them into error pages

use std::fmt;

use axum::{
    extract::{State, rejection::FormRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::domain::DomainError;
use crate::infrastructure::AppState;

/// Failures a handler cannot deal with itself
///
/// Validation failures and blocked deletes never get here: handlers render
/// those inline.
#[derive(Debug)]
pub enum AppError {
    /// Target record missing (404)
    NotFound(String),
    /// Request body the extractor refused (415, 400, 422...)
    Rejected(StatusCode, String),
    /// Store failure (500)
    Store(DomainError),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Rejected(status, _) => *status,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) | AppError::Rejected(_, msg) => write!(f, "{}", msg),
            AppError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AppError {}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => AppError::not_found("Not Found"),
            other => AppError::Store(other),
        }
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::Rejected(rejection.status(), rejection.body_text())
    }
}

/// Marker left on a faulted response for [`render_faults`]
#[derive(Debug, Clone)]
pub struct Fault {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = status.into_response();
        response.extensions_mut().insert(Fault {
            status,
            message: self.to_string(),
        });
        response
    }
}

/// Catch-all for paths no route matches
pub async fn not_found() -> AppError {
    AppError::not_found("Not Found")
}

/// Render every faulted response as the `error` view
///
/// Fault details are only exposed in development mode; a server fault's
/// message is replaced by a generic one otherwise. Error responses produced
/// by the router itself (405 and the like) carry no fault and get their
/// status' reason phrase as message.
pub async fn render_faults(State(state): State<AppState>, response: Response) -> Response {
    let status = response.status();
    let fault = match response.extensions().get::<Fault>() {
        Some(fault) => fault.clone(),
        None if status.is_client_error() || status.is_server_error() => Fault {
            status,
            message: status.canonical_reason().unwrap_or("Error").to_string(),
        },
        None => return response,
    };

    if fault.status.is_server_error() {
        tracing::error!("{}: {}", fault.status, fault.message);
    } else {
        tracing::warn!("{}: {}", fault.status, fault.message);
    }

    let message = if fault.status.is_server_error() && !state.development {
        "Internal Server Error".to_string()
    } else {
        fault.message.clone()
    };

    let error = if state.development {
        json!({ "status": fault.status.as_u16(), "detail": fault.message })
    } else {
        json!({})
    };

    let mut page = state.render(
        "error",
        json!({ "title": "Error", "message": message, "error": error }),
    );
    *page.status_mut() = fault.status;
    if let Some(allow) = response.headers().get(header::ALLOW) {
        page.headers_mut().insert(header::ALLOW, allow.clone());
    }
    page
}
