/// JWT token generation and validation
///
/// Tokens are signed with HS256 using a shared secret supplied by the caller;
/// nothing in this module reads ambient configuration. Verification pins the
/// algorithm to HS256, so tokens declaring `none` or any other algorithm are
/// rejected before the signature is even considered.
///
/// # Claims
///
/// - `user_id`: authenticated user
/// - `shop_id`: the shop the user belongs to (the tenant boundary)
/// - `role`: `SuperAdmin` or `Admin`
/// - `email`: the user's normalized email
/// - `iat` / `exp`: issue and expiry timestamps (Unix seconds)
///
/// Malformed claims (non-UUID ids, unknown roles, missing fields) fail
/// deserialization and are reported as invalid tokens.
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use eshop_shared::auth::jwt::{create_token, validate_token, Claims};
/// use eshop_shared::models::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-shared-secret-of-at-least-32-bytes!";
/// let claims = Claims::new(
///     Uuid::new_v4(),
///     Uuid::new_v4(),
///     Role::Admin,
///     "ama@example.com",
///     Duration::hours(24),
/// );
///
/// let token = create_token(&claims, secret)?;
/// let validated = validate_token(&token, secret)?;
/// assert_eq!(validated.user_id, claims.user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Role, User};

/// Default token lifetime
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Signature did not verify against the secret
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Token declares an algorithm other than HS256
    #[error("Unexpected signing algorithm")]
    InvalidAlgorithm,

    /// Token is structurally broken or carries malformed claims
    #[error("Invalid token format: {0}")]
    InvalidFormat(String),
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,

    pub shop_id: Uuid,

    pub role: Role,

    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims valid for `ttl` from now
    pub fn new(user_id: Uuid, shop_id: Uuid, role: Role, email: &str, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            shop_id,
            role,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Creates claims for an authenticated user
    pub fn for_user(user: &User, ttl: Duration) -> Self {
        Self::new(user.id, user.shop_id, user.role, &user.email, ttl)
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Secret and lifetime used to issue tokens at login
#[derive(Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub ttl: Duration,
}

impl TokenSettings {
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    /// Issues a token for an authenticated user
    pub fn issue_for(&self, user: &User) -> Result<String, JwtError> {
        create_token(&Claims::for_user(user, self.ttl), &self.secret)
    }
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Signs claims into a compact HS256 token
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Verifies a token and returns its claims
///
/// Checks the HS256 signature, requires `exp`, and compares it to the current
/// time without leeway.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims(&["exp"]);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => JwtError::Expired,
        ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        ErrorKind::InvalidAlgorithm => JwtError::InvalidAlgorithm,
        _ => JwtError::InvalidFormat(e.to_string()),
    })?;

    Ok(token_data.claims)
}
