//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use jsonrpsee::types::ErrorObjectOwned;
use studentqueue_core::error::AppError;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const CONFLICT: i32 = 4002;
    pub const THROTTLED: i32 = 4003;
    pub const UNAUTHORIZED: i32 = 4004;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const DB_ERROR: i32 = 5001;
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    match err {
        AppError::Validation(msg) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, msg, None::<()>)
        }
        AppError::Domain(e) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, e.to_string(), None::<()>)
        }
        AppError::NotFound(msg) => ErrorObjectOwned::owned(code::NOT_FOUND, msg, None::<()>),
        AppError::Conflict(msg) => ErrorObjectOwned::owned(code::CONFLICT, msg, None::<()>),
        AppError::Unauthorized(msg) => {
            ErrorObjectOwned::owned(code::UNAUTHORIZED, msg, None::<()>)
        }
        AppError::Database(msg) => ErrorObjectOwned::owned(code::DB_ERROR, msg, None::<()>),
        AppError::Config(msg) | AppError::Internal(msg) => {
            ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>)
        }
    }
}

pub fn throttled() -> ErrorObjectOwned {
    ErrorObjectOwned::owned(
        code::THROTTLED,
        "Too many submissions. Please slow down.",
        None::<()>,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use studentqueue_core::domain::DomainError;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            to_rpc_error(AppError::Conflict("dup".into())).code(),
            code::CONFLICT
        );
        assert_eq!(
            to_rpc_error(AppError::NotFound("x".into())).code(),
            code::NOT_FOUND
        );
        assert_eq!(
            to_rpc_error(AppError::Unauthorized("x".into())).code(),
            code::UNAUTHORIZED
        );
        assert_eq!(
            to_rpc_error(DomainError::MissingField("id").into()).code(),
            code::VALIDATION_ERROR
        );
        assert_eq!(
            to_rpc_error(AppError::Database("locked".into())).code(),
            code::DB_ERROR
        );
        assert_eq!(throttled().code(), code::THROTTLED);
    }

    #[test]
    fn test_message_passed_through() {
        let err = to_rpc_error(AppError::Database("no such table: x".into()));
        assert_eq!(err.message(), "no such table: x");
    }
}
