// Client error types
use thiserror::Error;

use crate::editor::ValidationError;

/// Failure of a single backend call, classified by HTTP status where one exists
#[derive(Debug, Error)]
pub enum ApiError {
    // 400 Bad Request
    #[error("{}", .0.as_deref().unwrap_or("Bad request"))]
    BadRequest(Option<String>),

    // 401 Unauthorized
    #[error("{}", .0.as_deref().unwrap_or("Unauthorized"))]
    Unauthorized(Option<String>),

    // 403 Forbidden
    #[error("{}", .0.as_deref().unwrap_or("Forbidden"))]
    Forbidden(Option<String>),

    // 404 Not Found
    #[error("{}", .0.as_deref().unwrap_or("Not found"))]
    NotFound(Option<String>),

    // 409 Conflict
    #[error("{}", .0.as_deref().unwrap_or("Conflict"))]
    Conflict(Option<String>),

    // 422 Unprocessable Entity
    #[error("{}", .0.as_deref().unwrap_or("Unprocessable entity"))]
    UnprocessableEntity(Option<String>),

    // 429 Too Many Requests
    #[error("{}", .0.as_deref().unwrap_or("Too many requests"))]
    TooManyRequests(Option<String>),

    // 500 Internal Server Error
    #[error("{}", .0.as_deref().unwrap_or("Internal server error"))]
    InternalServerError(Option<String>),

    // 502 Bad Gateway
    #[error("{}", .0.as_deref().unwrap_or("Bad gateway"))]
    BadGateway(Option<String>),

    // 503 Service Unavailable
    #[error("{}", .0.as_deref().unwrap_or("Service unavailable"))]
    ServiceUnavailable(Option<String>),

    // Any other non-2xx status
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("request failed"))]
    Status { status: u16, message: Option<String> },

    /// Connection refused, DNS failure, TLS error, body read error
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// 2xx response whose body did not match the expected shape
    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Identifier that cannot stand as a single path segment
    #[error("Invalid path segment: {0:?}")]
    InvalidPath(String),
}

impl ApiError {
    /// Classify a non-2xx response
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            400 => ApiError::BadRequest(message),
            401 => ApiError::Unauthorized(message),
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            409 => ApiError::Conflict(message),
            422 => ApiError::UnprocessableEntity(message),
            429 => ApiError::TooManyRequests(message),
            500 => ApiError::InternalServerError(message),
            502 => ApiError::BadGateway(message),
            503 => ApiError::ServiceUnavailable(message),
            status => ApiError::Status { status, message },
        }
    }

    /// HTTP status code, if the backend answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::BadRequest(_) => Some(400),
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Forbidden(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::Conflict(_) => Some(409),
            ApiError::UnprocessableEntity(_) => Some(422),
            ApiError::TooManyRequests(_) => Some(429),
            ApiError::InternalServerError(_) => Some(500),
            ApiError::BadGateway(_) => Some(502),
            ApiError::ServiceUnavailable(_) => Some(503),
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(_) | ApiError::Decode(_) | ApiError::InvalidUrl(_) | ApiError::InvalidPath(_) => None,
        }
    }

    /// Human-readable message supplied by the backend, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::UnprocessableEntity(msg)
            | ApiError::TooManyRequests(msg)
            | ApiError::InternalServerError(msg)
            | ApiError::BadGateway(msg)
            | ApiError::ServiceUnavailable(msg) => msg.as_deref(),
            ApiError::Status { message, .. } => message.as_deref(),
            ApiError::Transport(_) | ApiError::Decode(_) | ApiError::InvalidUrl(_) | ApiError::InvalidPath(_) => None,
        }
    }

    /// Stable error code for JSON output
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::UnprocessableEntity(_) => "UNPROCESSABLE_ENTITY",
            ApiError::TooManyRequests(_) => "TOO_MANY_REQUESTS",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::BadGateway(_) => "BAD_GATEWAY",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            ApiError::Status { .. } => "HTTP_ERROR",
            ApiError::Transport(_) => "NETWORK_ERROR",
            ApiError::Decode(_) => "DECODE_ERROR",
            ApiError::InvalidUrl(_) => "INVALID_URL",
            ApiError::InvalidPath(_) => "INVALID_PATH",
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}

/// Errors surfaced by controllers and editors
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Another submission is already in progress")]
    Busy,

    #[error("No entry with id '{0}' in the current list")]
    UnknownEntity(String),
}

impl AdminError {
    /// Text for a user-visible notice: the backend message when it sent one,
    /// the validation reason for client-side rejections, otherwise `fallback`.
    pub fn notice_text(&self, fallback: &str) -> String {
        match self {
            AdminError::Api(err) => err.message().unwrap_or(fallback).to_string(),
            AdminError::Validation(err) => err.to_string(),
            AdminError::NotAuthenticated => "Please log in to continue".to_string(),
            AdminError::Busy => self.to_string(),
            AdminError::UnknownEntity(_) => fallback.to_string(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AdminError::Api(err) => err.error_code(),
            AdminError::Validation(_) => "VALIDATION_ERROR",
            AdminError::NotAuthenticated => "NOT_AUTHENTICATED",
            AdminError::Busy => "BUSY",
            AdminError::UnknownEntity(_) => "UNKNOWN_ENTITY",
        }
    }
}
