//! Every failure ends up as the same toast-shaped body: a generic title and a
//! localized description of what the caller was trying to do.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: &'static str,
    pub description: String,
}

impl Notification {
    pub fn success(description: impl Into<String>) -> Self {
        Notification {
            title: "Berhasil",
            description: description.into(),
        }
    }

    pub fn titled(title: &'static str, description: impl Into<String>) -> Self {
        Notification {
            title,
            description: description.into(),
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Notification {
            title: "Error",
            description: description.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),
    #[error("admin access required")]
    Forbidden,
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("password hashing failed: {0}")]
    Hash(#[from] argon2::Error),
    #[error("internal error: {0}")]
    Internal(&'static str),
    #[error("session lookup pending")]
    SessionPending,
}

impl AppError {
    /// Wraps a store failure with the message the user should see.
    pub fn store(context: &'static str) -> impl FnOnce(StoreError) -> AppError {
        move |source| AppError::Store { context, source }
    }

    pub fn description(&self) -> String {
        match self {
            AppError::Store { context, .. } => (*context).to_string(),
            AppError::Validation(msg) | AppError::NotFound(msg) | AppError::Conflict(msg) => {
                msg.clone()
            }
            AppError::InvalidCredentials => "Email atau password salah".to_string(),
            AppError::Unauthorized(msg) => (*msg).to_string(),
            AppError::Forbidden => {
                "Anda tidak memiliki akses untuk halaman ini. Hanya admin yang dapat mengakses dashboard ini."
                    .to_string()
            }
            AppError::Token(_) | AppError::Hash(_) | AppError::Internal(_) => {
                "Terjadi kesalahan yang tidak terduga".to_string()
            }
            AppError::SessionPending => "Memuat sesi, silakan coba lagi".to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    #[serde(flatten)]
    notification: Notification,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect: Option<&'static str>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::SessionPending => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Store { .. }
            | AppError::Token(_)
            | AppError::Hash(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(status).json(ErrorBody {
            notification: Notification::error(self.description()),
            redirect: matches!(self, AppError::Forbidden).then_some("/"),
        })
    }
}
