use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::models::common::ErrorResponse;

/// Bikram Sambat to Gregorian conversion failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("BS year {0} out of supported range")]
    OutOfRange(i32),
    #[error("invalid BS month {0}")]
    InvalidMonth(u32),
    #[error("invalid BS day {day} for month {month} of {year}")]
    InvalidDay { year: i32, month: u32, day: u32 },
    #[error("malformed BS date '{0}'")]
    Malformed(String),
}

/// Failures talking to the depository platform.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Bad credentials and platform outages look the same from here.
    #[error("failed to login account")]
    LoginFailed { status: Option<u16> },
    #[error("failed to fetch {what}: HTTP {status}")]
    FetchFailed { what: &'static str, status: u16 },
    #[error("{0}")]
    InvalidPin(String),
    #[error("conflict: {0}")]
    ConflictOther(String),
    #[error("failed to apply for share: {0}")]
    SubmissionFailed(u16),
    #[error("request to depository platform failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl PlatformError {
    /// The platform answers a rejected login with 401/403; anything else
    /// (5xx, missing auth header, transport) may be transient.
    pub fn is_invalid_credentials(&self) -> bool {
        matches!(
            self,
            PlatformError::LoginFailed {
                status: Some(401 | 403)
            }
        )
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("duplicate record: {0}")]
    Duplicate(String),
    #[error("database error: {0}")]
    Db(DbErr),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::Duplicate(detail),
            _ => match err {
                DbErr::RecordNotFound(_) => StoreError::NotFound,
                other => StoreError::Db(other),
            },
        }
    }
}

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("unable to authenticate with the depository platform")]
    Unauthenticated,
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error("depository platform returned no bank record")]
    NoBankRecord,
    #[error("metadata fetch task failed: {0}")]
    Task(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors surfaced by the HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    BadGateway(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "UNAUTHORIZED_ERROR",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::NotFound(_) => "NOT_FOUND_ERROR",
            ApiError::Conflict(_) => "CONFLICT_ERROR",
            ApiError::BadGateway(_) => "UPSTREAM_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error_type: self.error_type().to_string(),
            message: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound("Account not found".to_string()),
            StoreError::Duplicate(_) => {
                ApiError::Conflict("Account is already linked".to_string())
            }
            StoreError::Db(e) => {
                tracing::error!(error = %e, "Database error");
                ApiError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<LinkError> for ApiError {
    fn from(err: LinkError) -> Self {
        match err {
            LinkError::Unauthenticated => ApiError::Unauthorized(err.to_string()),
            LinkError::Platform(_) | LinkError::NoBankRecord => {
                ApiError::BadGateway(err.to_string())
            }
            LinkError::Task(_) => ApiError::Internal(err.to_string()),
            LinkError::Store(e) => e.into(),
        }
    }
}
