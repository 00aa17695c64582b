use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quill_core::api::auth::TokenPairResponse;

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

/// HS256 claims. `token_type` keeps a refresh token from being replayed
/// as an access token (and vice versa).
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

pub fn issue_token(
    secret: &str,
    user_id: Uuid,
    token_type: &str,
    ttl_seconds: i64,
) -> Result<String, &'static str> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        token_type: token_type.to_string(),
        exp: now + ttl_seconds,
        iat: now,
        jti: Uuid::now_v7().to_string(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| "token_encode_failed")
}

/// Both tokens carry the same subject; only type and lifetime differ.
pub fn issue_pair(
    secret: &str,
    user_id: Uuid,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
) -> Result<TokenPairResponse, &'static str> {
    let access = issue_token(secret, user_id, TOKEN_TYPE_ACCESS, access_ttl_seconds)?;
    let refresh = issue_token(secret, user_id, TOKEN_TYPE_REFRESH, refresh_ttl_seconds)?;
    Ok(TokenPairResponse { refresh, access })
}

pub fn decode_token(
    secret: &str,
    token: &str,
    expected_type: &str,
) -> Result<Claims, &'static str> {
    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| "token_invalid")?;
    if data.claims.token_type != expected_type {
        return Err("token_type_mismatch");
    }
    Ok(data.claims)
}
