/// Error handling for the API server
///
/// Handlers return `ApiResult<T>`; every failure converts into [`ApiError`],
/// which renders as a JSON body with a stable machine-readable `error` code:
///
/// | Variant             | Status | `error`              |
/// |---------------------|--------|----------------------|
/// | `BadRequest`        | 400    | `validation_error`   |
/// | `ValidationError`   | 400    | `validation_error`   |
/// | `Unauthorized`      | 401    | `unauthenticated`    |
/// | `Forbidden`         | 403    | `forbidden`          |
/// | `NotFound`          | 404    | `not_found`          |
/// | `Conflict`          | 409    | `conflict`           |
/// | `InsufficientStock` | 400    | `insufficient_stock` |
/// | `InternalError`     | 500    | `internal_error`     |

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use eshop_shared::auth::authorization::AuthzError;
use eshop_shared::auth::middleware::{AuthError, UNAUTHENTICATED_MESSAGE};
use eshop_shared::DomainError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing input (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Field-level validation failures (400)
    #[error("Validation failed: {} errors", .0.len())]
    ValidationError(Vec<ValidationErrorDetail>),

    /// Missing, invalid or expired credentials (401)
    ///
    /// The response message is always the same; the reason is only logged.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated caller with the wrong role (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource absent or owned by another shop (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate email (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Sale larger than the stock on hand (400)
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "validation_error", "not_found")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::Unauthorized(reason) => {
                tracing::debug!(reason = %reason, "Request not authenticated");
                (
                    StatusCode::UNAUTHORIZED,
                    "unauthenticated",
                    UNAUTHENTICATED_MESSAGE.to_string(),
                    None,
                )
            }
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::InsufficientStock(msg) => {
                (StatusCode::BAD_REQUEST, "insufficient_stock", msg, None)
            }
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Flattens validator output into one detail per failed rule
pub fn validation_details(errors: &validator::ValidationErrors) -> Vec<ValidationErrorDetail> {
    let mut details: Vec<ValidationErrorDetail> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();

    details.sort_by(|a, b| a.field.cmp(&b.field));
    details
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ApiError::BadRequest(msg),
            DomainError::InvalidFields(errors) => {
                ApiError::ValidationError(validation_details(&errors))
            }
            DomainError::Unauthenticated => ApiError::Unauthorized("Rejected credentials".to_string()),
            DomainError::Forbidden(msg) => ApiError::Forbidden(msg),
            err @ DomainError::NotFound(_) => ApiError::NotFound(err.to_string()),
            DomainError::Conflict(msg) => ApiError::Conflict(msg),
            err @ DomainError::InsufficientStock { .. } => {
                ApiError::InsufficientStock(err.to_string())
            }
            DomainError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Unauthorized(err.to_string())
    }
}

impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        ApiError::Forbidden(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Product not found".to_string());
        assert_eq!(err.to_string(), "Not found: Product not found");

        let err = ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "stock".to_string(),
            message: "must be at least 0".to_string(),
        }]);
        assert_eq!(err.to_string(), "Validation failed: 1 errors");
    }

    #[test]
    fn test_domain_error_mapping() {
        assert!(matches!(
            ApiError::from(DomainError::NotFound("Product")),
            ApiError::NotFound(msg) if msg == "Product not found"
        ));
        assert!(matches!(
            ApiError::from(DomainError::InsufficientStock { requested: 3, available: 1 }),
            ApiError::InsufficientStock(_)
        ));
        assert!(matches!(
            ApiError::from(DomainError::Conflict("Email already registered".to_string())),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(DomainError::Unauthenticated),
            ApiError::Unauthorized(_)
        ));
    }

    #[tokio::test]
    async fn test_status_codes_and_identifiers() {
        let cases = vec![
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST, "validation_error"),
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED, "unauthenticated"),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN, "forbidden"),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND, "not_found"),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT, "conflict"),
            (ApiError::InsufficientStock("x".into()), StatusCode::BAD_REQUEST, "insufficient_stock"),
            (ApiError::InternalError("x".into()), StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        ];

        for (err, status, code) in cases {
            let response = err.into_response();
            assert_eq!(response.status(), status);
            assert_eq!(body_json(response).await["error"], code);
        }
    }

    #[tokio::test]
    async fn test_unauthorized_message_is_uniform() {
        let expired = ApiError::Unauthorized("Token expired".to_string()).into_response();
        let missing = ApiError::Unauthorized("Missing credentials".to_string()).into_response();

        let expired = body_json(expired).await;
        let missing = body_json(missing).await;
        assert_eq!(expired, missing);
        assert_eq!(expired["message"], UNAUTHENTICATED_MESSAGE);
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let response = ApiError::InternalError("connection refused on 10.0.0.3".to_string()).into_response();
        let body = body_json(response).await;
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(email(message = "Invalid email format"))]
        email: String,

        #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
        password: String,
    }

    #[tokio::test]
    async fn test_validation_details() {
        let errors = Sample {
            email: "nope".to_string(),
            password: "123".to_string(),
        }
        .validate()
        .unwrap_err();

        let err = ApiError::from(DomainError::InvalidFields(errors));
        assert_eq!(err.to_string(), "Validation failed: 2 errors");

        let body = body_json(err.into_response()).await;
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["details"][0]["field"], "email");
        assert_eq!(body["details"][0]["message"], "Invalid email format");
        assert_eq!(body["details"][1]["field"], "password");
    }
}
