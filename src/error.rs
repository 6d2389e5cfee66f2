// region:    --- Imports
use crate::store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::error;

// endregion: --- Imports

// region:    --- Field Errors
/// 폼 필드별 검증 오류 (필드 이름 -> 메시지)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// 단일 필드 오류 생성
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// 필드 오류 추가 (같은 필드의 첫 오류만 유지)
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 오류가 없으면 Ok, 있으면 Validation 오류
    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}
// endregion: --- Field Errors

// region:    --- App Error
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    #[error("{0}")]
    Forbidden(String),

    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Invalid username and/or password.")]
    InvalidCredentials,

    #[error("ERROR: Page doesn't exist")]
    UnknownAction,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// 단일 필드 검증 오류
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation(FieldErrors::single(field, message))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Store(StoreError::Database(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "message": message })),
            )
                .into_response(),
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({ "errors": errors })),
            )
                .into_response(),
            AppError::Forbidden(message) => (StatusCode::FORBIDDEN, message).into_response(),
            AppError::AuthenticationRequired => Redirect::to("/login").into_response(),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "message": AppError::InvalidCredentials.to_string() })),
            )
                .into_response(),
            AppError::UnknownAction => {
                (StatusCode::BAD_REQUEST, AppError::UnknownAction.to_string()).into_response()
            }
            err @ (AppError::Store(_) | AppError::Config(_) | AppError::Internal(_)) => {
                error!("{:<12} --> 요청 처리 실패: {}", "Error", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "message": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
// endregion: --- App Error

// endregion: --- Tests
