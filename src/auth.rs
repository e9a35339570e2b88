// ABOUTME: HS256 JWT authentication resolving the caller's user id from the userID claim
// ABOUTME: Accepts the token header, an Authorization Bearer header, or a token cookie
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

//! # Authentication
//!
//! Tokens are signed elsewhere (the account service) with a shared secret. The
//! server only verifies them and reads `userID`, which may be encoded as a JSON
//! string or number. Expiry is enforced when the token carries `exp`.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use http::header::{AUTHORIZATION, COOKIE};
use http::HeaderMap;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult, ErrorCode};

const TOKEN_HEADER: &str = "token";
const TOKEN_COOKIE: &str = "token";
const BEARER_PREFIX: &str = "Bearer ";

/// Claims carried by a login token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Owning user, string or number
    #[serde(rename = "userID")]
    pub user_id: Option<Value>,
    /// Expiry (seconds since epoch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Any other claims the issuer added
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Claims {
    /// `userID` rendered as a string
    #[must_use]
    pub fn user_id(&self) -> Option<String> {
        match self.user_id.as_ref()? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Identity used for memory and tool calls
    pub user_id: String,
}

/// Verifies HS256 tokens signed with the shared secret
#[derive(Clone)]
pub struct JwtAuthenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtAuthenticator {
    /// Authenticator for `secret`
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign a token for `user_id` valid for `ttl`
    ///
    /// # Errors
    ///
    /// Returns an error if the claims cannot be encoded
    pub fn issue(&self, user_id: &str, ttl: Duration) -> AppResult<String> {
        let claims = Claims {
            user_id: Some(Value::String(user_id.to_owned())),
            exp: Some((Utc::now() + ttl).timestamp()),
            extra: HashMap::new(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))
    }

    /// Verify `token` and return its claims
    ///
    /// # Errors
    ///
    /// Returns `AuthExpired` for expired tokens and `AuthInvalid` for anything
    /// malformed or wrongly signed
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                warn!("Token validation failed: {:?}", e.kind());
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        AppError::new(ErrorCode::AuthExpired, "登录已过期，请重新登录")
                    }
                    _ => AppError::auth_invalid("无效的 token"),
                }
            })
    }

    /// Resolve the caller from request headers
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` when no token is present, otherwise the
    /// verification error or `AuthInvalid` when `userID` is missing
    pub fn authenticate(&self, headers: &HeaderMap) -> AppResult<AuthenticatedUser> {
        let Some(token) = extract_token(headers) else {
            debug!("Request carried no token");
            return Err(AppError::new(
                ErrorCode::AuthRequired,
                "未登录或登录已过期，请重新登录",
            ));
        };
        let user_id = self
            .verify(&token)?
            .user_id()
            .ok_or_else(|| AppError::auth_invalid("Token 中未包含 userID"))?;
        Ok(AuthenticatedUser { user_id })
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: impl http::header::AsHeaderName) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Token from the `token` header, a Bearer authorization, or the `token` cookie
#[must_use]
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = header_str(headers, TOKEN_HEADER) {
        return Some(token.to_owned());
    }
    if let Some(token) = header_str(headers, AUTHORIZATION)
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
    {
        return Some(token.to_owned());
    }
    header_str(headers, COOKIE).and_then(|cookies| {
        cookies.split(';').find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == TOKEN_COOKIE && !value.is_empty()).then(|| value.to_owned())
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers(name: &'static str, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_resolves_user() {
        let auth = JwtAuthenticator::new("secret");
        let token = auth.issue("42", Duration::hours(1)).unwrap();
        let user = auth
            .authenticate(&headers("authorization", &format!("Bearer {token}")))
            .unwrap();
        assert_eq!(user.user_id, "42");
    }

    #[test]
    fn test_numeric_user_id_claim() {
        let auth = JwtAuthenticator::new("secret");
        let token = encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "userID": 7 }),
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        assert_eq!(auth.verify(&token).unwrap().user_id().as_deref(), Some("7"));
    }

    #[test]
    fn test_cookie_and_token_header_sources() {
        assert_eq!(extract_token(&headers("token", "abc")).as_deref(), Some("abc"));
        assert_eq!(
            extract_token(&headers("cookie", "theme=dark; token=xyz")).as_deref(),
            Some("xyz")
        );
        assert!(extract_token(&headers("authorization", "Basic abc")).is_none());
    }

    #[test]
    fn test_wrong_secret_and_expiry_are_rejected() {
        let token = JwtAuthenticator::new("other").issue("1", Duration::hours(1)).unwrap();
        let auth = JwtAuthenticator::new("secret");
        assert_eq!(auth.verify(&token).unwrap_err().code, ErrorCode::AuthInvalid);

        let expired = auth.issue("1", Duration::hours(-2)).unwrap();
        assert_eq!(auth.verify(&expired).unwrap_err().code, ErrorCode::AuthExpired);
    }
}
