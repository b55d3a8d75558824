//! Bearer token verification.
//!
//! Tokens are HS256 JWTs minted by the identity service with a shared
//! secret. Everything the permission gates need travels in [`Claims`], so
//! a request never triggers a user lookup.

use chrono::Utc;
use cursos_core::permissions::Principal;
use cursos_core::types::DbId;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload of an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id.
    pub sub: DbId,
    pub username: String,
    #[serde(default)]
    pub is_superuser: bool,
    /// `app.codename` permission strings, e.g. `cursos.change_curso`.
    #[serde(default)]
    pub permissions: Vec<String>,
    pub exp: i64,
    pub iat: i64,
    #[serde(default)]
    pub jti: String,
}

impl Claims {
    /// Claims for `principal`, valid for `ttl_secs` from now.
    pub fn for_principal(principal: &Principal, ttl_secs: i64) -> Self {
        let iat = Utc::now().timestamp();
        Claims {
            sub: principal.user_id,
            username: principal.username.clone(),
            is_superuser: principal.is_superuser,
            permissions: principal.permissions.clone(),
            exp: iat + ttl_secs,
            iat,
            jti: Uuid::new_v4().to_string(),
        }
    }
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Principal {
            user_id: claims.sub,
            username: claims.username,
            is_superuser: claims.is_superuser,
            permissions: claims.permissions,
        }
    }
}

/// Token settings shared with the identity service.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Lifetime of tokens minted by [`generate_access_token`].
    pub access_token_expiry_mins: i64,
    /// Clock skew tolerated on `exp`, in seconds.
    pub leeway_secs: u64,
}

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;
const DEFAULT_LEEWAY_SECS: u64 = 60;

impl JwtConfig {
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `JWT_SECRET`             | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS` | no       | `15`    |
    /// | `JWT_LEEWAY_SECS`        | no       | `60`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is unset or empty, or a number fails to parse.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .map(|v| v.parse().expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64"))
            .unwrap_or(DEFAULT_ACCESS_EXPIRY_MINS);

        let leeway_secs = std::env::var("JWT_LEEWAY_SECS")
            .map(|v| v.parse().expect("JWT_LEEWAY_SECS must be a valid u64"))
            .unwrap_or(DEFAULT_LEEWAY_SECS);

        Self {
            secret,
            access_token_expiry_mins,
            leeway_secs,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_secs;
        // jsonwebtoken only recognises string subjects; the numeric `sub` is
        // required by `Claims` deserialization instead.
        validation.set_required_spec_claims(&["exp"]);
        validation
    }
}

/// Mint a token for `principal`. Used by operators' tooling and tests.
pub fn generate_access_token(
    principal: &Principal,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims::for_principal(principal, config.access_token_expiry_mins * 60);
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check signature, algorithm and expiry, then return the [`Claims`].
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &config.validation(),
    )
    .map(|data| data.claims)
}
