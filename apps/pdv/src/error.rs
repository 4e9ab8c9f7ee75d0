//! # API Error Type
//!
//! Unified error type for PDV commands.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Gelato PDV                             │
//! │                                                                         │
//! │  Command Function  ── Result<T, ApiError>                               │
//! │         │                                                               │
//! │         ├── CoreError (cart, checkout, validation) ──┐                 │
//! │         ├── StorageError (adapter open/health)  ─────┼──► ApiError     │
//! │         └── ConfigError (startup)  ──────────────────┘   {code,msg}    │
//! │                                                                         │
//! │  Store persistence failures never reach here: the stores keep the      │
//! │  in-memory update and expose `last_error` instead.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Serialized for the front end as:
//! ```json
//! { "code": "PAYMENT_ERROR", "message": "Insufficient cash: total R$ 21,00, tendered R$ 20,00" }
//! ```

use gelato_core::{CoreError, ValidationError};
use gelato_store::StorageError;
use serde::Serialize;

use crate::state::config::ConfigError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    StorageError,
    /// Operation not allowed in the order's current state
    BusinessLogic,
    Internal,
    CartError,
    PaymentError,
    /// No operator logged in, or wrong password
    Unauthorized,
    /// Teardown interrupted a pending login or sale completion
    Cancelled,
    ConfigError,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    pub fn cancelled(operation: &str) -> Self {
        ApiError::new(ErrorCode::Cancelled, format!("{} was cancelled", operation))
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id.to_string()),
            CoreError::OrderNotFound(id) => ApiError::not_found("Order", &id),
            err @ CoreError::InvalidOrderStatus { .. } => ApiError::new(ErrorCode::BusinessLogic, err.to_string()),
            err @ (CoreError::CartTooLarge { .. }
            | CoreError::LineNotFound(_)
            | CoreError::WrongProductKind { .. }
            | CoreError::EmptyOrder) => ApiError::new(ErrorCode::CartError, err.to_string()),
            err @ CoreError::QuantityTooLarge { .. } => ApiError::validation(err.to_string()),
            CoreError::Validation(err @ ValidationError::InsufficientCash { .. }) => {
                ApiError::new(ErrorCode::PaymentError, err.to_string())
            }
            CoreError::Validation(err) => ApiError::validation(err.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        CoreError::from(err).into()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        // Details go to the log, the operator gets a generic message
        tracing::error!(error = %err, "Storage operation failed");
        match err {
            StorageError::ConnectionFailed(_) => ApiError::new(ErrorCode::StorageError, "Storage connection failed"),
            StorageError::MigrationFailed(_) => ApiError::new(ErrorCode::StorageError, "Storage migration failed"),
            StorageError::PoolExhausted => ApiError::new(ErrorCode::StorageError, "Storage pool exhausted"),
            _ => ApiError::new(ErrorCode::StorageError, "Storage operation failed"),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use gelato_core::Money;

    use super::*;

    #[test]
    fn test_insufficient_cash_is_payment_error() {
        let err: ApiError = CoreError::Validation(ValidationError::InsufficientCash {
            total: Money::from_cents(2100),
            tendered: Money::from_cents(2000),
        })
        .into();

        assert_eq!(err.code, ErrorCode::PaymentError);
        assert!(err.message.contains("Insufficient cash"));
    }

    #[test]
    fn test_core_error_mapping() {
        assert_eq!(ApiError::from(CoreError::ProductNotFound(7)).code, ErrorCode::NotFound);
        assert_eq!(ApiError::from(CoreError::EmptyOrder).code, ErrorCode::CartError);
        assert_eq!(
            ApiError::from(CoreError::InvalidOrderStatus {
                order_id: "abc".into(),
                current_status: "completed".into(),
            })
            .code,
            ErrorCode::BusinessLogic
        );
        let required: ApiError = ValidationError::Required {
            field: "customer name".into(),
        }
        .into();
        assert_eq!(required.code, ErrorCode::ValidationError);
        assert_eq!(required.message, "customer name is required");
    }

    #[test]
    fn test_serialization_shape() {
        let err = ApiError::cancelled("Login");
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["code"], "CANCELLED");
        assert_eq!(json["message"], "Login was cancelled");
        assert_eq!(err.to_string(), "[Cancelled] Login was cancelled");
    }
}
