//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! Domain and store errors are translated here into an HTTP status plus a
//! serialized `{code, message}` body. The translation is the whole job: by
//! the time an error reaches this type, the failed operation's transaction
//! has already been discarded and the store is unchanged.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use sklad_core::CoreError;
use sklad_db::DbError;

/// API error returned from HTTP handlers.
///
/// Serialized as:
/// ```json
/// { "code": "INSUFFICIENT_STOCK", "message": "Insufficient stock for product 7: available 3, requested 5" }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation or parse failure (400)
    ValidationError,

    /// Requested quantity exceeds available stock (409)
    InsufficientStock,

    /// Unique constraint conflict, e.g. a consignment numbering race (409)
    Conflict,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::InsufficientStock | ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: i64) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{resource} not found: {id}"))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", *id),
            CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            CoreError::EmptyInvoice
            | CoreError::UnknownInvoiceType(_)
            | CoreError::MissingArrivalDate
            | CoreError::UnexpectedArrivalDate
            | CoreError::NonPositiveQuantity(_)
            | CoreError::Parse(_) => ApiError::validation(err.to_string()),
        }
    }
}

/// Converts store errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Domain(core) => core.into(),
            DbError::NotFound { entity, id } => ApiError::not_found(entity, id),
            DbError::UniqueViolation(msg) => ApiError::new(ErrorCode::Conflict, msg),
            DbError::ForeignKeyViolation(_) => ApiError::validation("Invalid reference"),
            DbError::ConnectionFailed(_) | DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database unavailable")
            }
            DbError::QueryFailed(e) | DbError::Internal(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        (status, Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_maps_to_conflict() {
        let api: ApiError = CoreError::InsufficientStock {
            product_id: 7,
            available: 3,
            requested: 5,
        }
        .into();
        assert_eq!(api.code, ErrorCode::InsufficientStock);
        assert_eq!(api.code.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_domain_error_unwraps_through_db_error() {
        let api: ApiError = DbError::Domain(CoreError::EmptyInvoice).into();
        assert_eq!(api.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let api: ApiError = DbError::not_found("Invoice", 3).into();
        assert_eq!(api.code.status(), StatusCode::NOT_FOUND);
        assert_eq!(api.message, "Invoice not found: 3");
    }

    #[test]
    fn test_wire_shape() {
        let api = ApiError::not_found("Product", 7);
        let value = serde_json::to_value(&api).unwrap();
        assert_eq!(value["code"], "NOT_FOUND");
        assert_eq!(value["message"], "Product not found: 7");
    }
}
