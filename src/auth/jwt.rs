use crate::models::Claims;
use jsonwebtoken::{DecodingKey, Validation, decode};

/// Verify a bearer token issued by the external identity service. Token
/// issuance (login, refresh) lives in that service; this one only checks
/// signatures and expiry.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}
