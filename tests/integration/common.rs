//! Shared fixtures for the integration tests.

use anyhow::{Context, Result};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode, get_current_timestamp};
use serde_json::{Value, json};
use storefront_gate::auth::{JwtConfig, JwtResolver};
use storefront_gate::{Decision, RedirectTarget};

/// Session secret shared by the minting helpers and [`jwt_resolver`].
pub const SECRET: &str = "integration-secret-integration-secret";

/// Roles seen in the storefront.
pub const ROLES: [&str; 4] = ["SUPERADMIN", "ADMINISTRATOR", "STAKEHOLDER", "CUSTOMER"];

/// A resolver verifying tokens signed with [`SECRET`].
pub fn jwt_resolver() -> JwtResolver {
    JwtResolver::new(JwtConfig::builder().secret(SECRET).build())
        .expect("test secret is long enough")
}

/// Signs arbitrary claims with [`SECRET`].
pub fn sign(claims: &Value) -> Result<String> {
    encode(&Header::new(Algorithm::HS256), claims, &EncodingKey::from_secret(SECRET.as_bytes()))
        .context("failed to sign test token")
}

/// A session token valid for an hour.
pub fn session_token(role: Option<&str>) -> Result<String> {
    let mut claims = json!({
        "sub": "user_7",
        "exp": get_current_timestamp() + 3600,
    });
    if let Some(role) = role {
        claims["role"] = role.into();
    }
    sign(&claims)
}

/// A session token that expired an hour ago.
pub fn expired_token(role: &str) -> Result<String> {
    sign(&json!({
        "sub": "user_7",
        "role": role,
        "exp": get_current_timestamp() - 3600,
    }))
}

/// Shorthand for a redirect decision.
pub fn redirect(path: &str) -> Decision {
    Decision::Redirect(RedirectTarget::new(path).expect("valid test target"))
}
