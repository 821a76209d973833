//! JWT token utilities for authentication.
//!
//! Provides the token service that mints and verifies the signed,
//! time-limited access and refresh tokens. Tokens are stateless: validity
//! is purely a function of signature and expiry, so revocation before
//! natural expiry is impossible by design.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::{ServiceError, ServiceResult};

/// JWT claims: the owning user's id plus the standard timestamps.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Issued-at timestamp
    pub iat: usize,
    /// Expiration timestamp
    pub exp: usize,
}

/// Per-call error messages for [`TokenService::verify`]. Unset fields fall
/// back to `general`, then to a fixed default.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenErrorMessages {
    pub expired: Option<&'static str>,
    pub invalid: Option<&'static str>,
    pub general: Option<&'static str>,
}

impl TokenErrorMessages {
    /// One message for every failure cause.
    pub fn general_only(message: &'static str) -> Self {
        Self {
            general: Some(message),
            ..Default::default()
        }
    }
}

/// Mints and verifies access and refresh tokens with a single shared
/// secret. Built once from the startup-validated [`Config`].
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(config: &Config) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        TokenService {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            access_ttl: Duration::seconds(config.access_token_ttl_seconds as i64),
            refresh_ttl: Duration::seconds(config.refresh_token_ttl_seconds as i64),
        }
    }

    fn issue(&self, user_id: &str, ttl: Duration) -> ServiceResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp() as usize,
            exp: (now + ttl).timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::internal(format!("Token generation failed: {}", e)))
    }

    /// Short-lived token returned in response bodies.
    pub fn issue_access_token(&self, user_id: &str) -> ServiceResult<String> {
        self.issue(user_id, self.access_ttl)
    }

    /// Long-lived token delivered only via the refresh cookie.
    pub fn issue_refresh_token(&self, user_id: &str) -> ServiceResult<String> {
        self.issue(user_id, self.refresh_ttl)
    }

    /// Decodes a token and validates signature and expiry. Failures map to
    /// 401 with a cause-specific message from `messages`.
    pub fn verify(&self, token: &str, messages: TokenErrorMessages) -> ServiceResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let message = match e.kind() {
                    ErrorKind::ExpiredSignature => messages
                        .expired
                        .or(messages.general)
                        .unwrap_or("Token has expired."),
                    ErrorKind::InvalidToken
                    | ErrorKind::InvalidSignature
                    | ErrorKind::ImmatureSignature
                    | ErrorKind::InvalidAlgorithm
                    | ErrorKind::Base64(_)
                    | ErrorKind::Json(_)
                    | ErrorKind::Utf8(_) => messages
                        .invalid
                        .or(messages.general)
                        .unwrap_or("Invalid token."),
                    _ => messages.general.unwrap_or("Token verification failed."),
                };
                ServiceError::unauthorized(message)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 5,
            acquire_timeout_seconds: 3,
            server_port: 0,
            jwt_secret: "test-secret".to_string(),
            access_token_ttl_seconds: 60,
            refresh_token_ttl_seconds: 3600,
        }
    }

    fn expired_token(secret: &str, age_seconds: i64) -> String {
        // Well past the default verification leeway.
        let now = Utc::now();
        let claims = Claims {
            sub: "user-1".to_string(),
            iat: (now - Duration::seconds(age_seconds + 60)).timestamp() as usize,
            exp: (now - Duration::seconds(age_seconds)).timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn unauthorized_message(result: ServiceResult<Claims>) -> String {
        match result.unwrap_err() {
            ServiceError::Unauthorized { message } => message,
            other => panic!("expected unauthorized, got {other:?}"),
        }
    }

    #[test]
    fn issued_tokens_verify_with_matching_subject_and_ttl() {
        let tokens = TokenService::new(&test_config());

        let at = tokens.issue_access_token("user-1").unwrap();
        let claims = tokens.verify(&at, TokenErrorMessages::default()).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.exp - claims.iat, 60);

        let rt = tokens.issue_refresh_token("user-1").unwrap();
        let claims = tokens.verify(&rt, TokenErrorMessages::default()).unwrap();
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn tampered_token_fails_with_the_invalid_message() {
        let tokens = TokenService::new(&test_config());
        let mut token = tokens.issue_access_token("user-1").unwrap();
        token.push('x');

        assert_eq!(
            unauthorized_message(tokens.verify(&token, TokenErrorMessages::default())),
            "Invalid token."
        );
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let tokens = TokenService::new(&test_config());
        let mut other = test_config();
        other.jwt_secret = "other-secret".to_string();
        let foreign = TokenService::new(&other)
            .issue_access_token("user-1")
            .unwrap();

        assert!(tokens.verify(&foreign, TokenErrorMessages::default()).is_err());
    }

    #[test]
    fn expired_token_fails_with_the_expired_message() {
        let tokens = TokenService::new(&test_config());
        let token = expired_token("test-secret", 3600);

        assert_eq!(
            unauthorized_message(tokens.verify(&token, TokenErrorMessages::default())),
            "Token has expired."
        );
    }

    #[test]
    fn general_override_replaces_both_cause_messages() {
        let tokens = TokenService::new(&test_config());
        let messages = TokenErrorMessages::general_only("Invalid refresh token.");

        let expired = expired_token("test-secret", 3600);
        assert_eq!(
            unauthorized_message(tokens.verify(&expired, messages)),
            "Invalid refresh token."
        );

        assert_eq!(
            unauthorized_message(tokens.verify("garbage", messages)),
            "Invalid refresh token."
        );
    }
}
