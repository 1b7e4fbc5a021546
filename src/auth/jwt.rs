//! JWT session token resolver.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde_json::Value;
use zeroize::Zeroizing;

use super::{Credential, CredentialResolver, FaultKind, Resolution, ResolveFuture};
use crate::{Error, GateRequest};

/// Minimum accepted length of the HMAC signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Environment variable holding the signing secret.
pub const SECRET_ENV: &str = "STOREFRONT_GATE_SECRET";
/// Environment variable holding the expected token issuer.
pub const ISSUER_ENV: &str = "STOREFRONT_GATE_ISSUER";
/// Environment variable holding the expected token audience.
pub const AUDIENCE_ENV: &str = "STOREFRONT_GATE_AUDIENCE";
/// Environment variable naming the claim that carries the role.
pub const ROLE_CLAIM_ENV: &str = "STOREFRONT_GATE_ROLE_CLAIM";

fn default_session_cookies() -> Vec<String> {
    vec!["next-auth.session-token".to_string(), "__Secure-next-auth.session-token".to_string()]
}

/// The shared secret session tokens are signed with.
///
/// - Secret bytes are zeroized on drop
/// - Debug output hides the contents
/// - Clone is not implemented
pub struct SessionSecret(Zeroizing<Vec<u8>>);

impl SessionSecret {
    /// Wraps raw secret bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Zeroizing::new(bytes.into()))
    }

    /// Length of the secret in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for SessionSecret {
    fn from(secret: &str) -> Self {
        Self::new(secret.as_bytes())
    }
}

impl From<String> for SessionSecret {
    fn from(secret: String) -> Self {
        Self::new(secret.into_bytes())
    }
}

impl From<Vec<u8>> for SessionSecret {
    fn from(secret: Vec<u8>) -> Self {
        Self::new(secret)
    }
}

impl fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionSecret([REDACTED])")
    }
}

/// Settings for [`JwtResolver`].
///
/// ## Example
///
/// ```rust
/// use storefront_gate::auth::JwtConfig;
/// use std::time::Duration;
///
/// let config = JwtConfig::builder()
///     .secret("0123456789abcdef0123456789abcdef")
///     .issuer("https://shop.example")
///     .leeway(Duration::from_secs(30))
///     .build();
///
/// assert_eq!(config.role_claim, "role");
/// ```
#[derive(Debug, bon::Builder)]
pub struct JwtConfig {
    /// HMAC secret the tokens are signed with (HS256).
    #[builder(into)]
    pub secret: SessionSecret,

    /// Expected `iss` claim. Unchecked when unset.
    #[builder(into)]
    pub issuer: Option<String>,

    /// Expected `aud` claim. Unchecked when unset.
    #[builder(into)]
    pub audience: Option<String>,

    /// Claim holding the user's role.
    #[builder(into, default = "role".to_string())]
    pub role_claim: String,

    /// Clock skew tolerated when checking `exp` and `nbf`.
    #[builder(default = Duration::from_secs(60))]
    pub leeway: Duration,

    /// Cookies searched for the session token when there is no bearer header.
    ///
    /// Names match exactly; chunked cookies (`name.0`, `name.1`) are not
    /// reassembled. Defaults to the next-auth cookie names, which only carry
    /// a verifiable token when the issuer signs them with HS256.
    #[builder(default = default_session_cookies())]
    pub cookie_names: Vec<String>,
}

impl JwtConfig {
    /// Loads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an [`Unauthorized`](crate::ErrorKind::Unauthorized) error if
    /// `STOREFRONT_GATE_SECRET` is unset.
    pub fn from_env() -> Result<Self, Error> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_kv(&vars)
    }

    /// Loads settings from a key/value map using the environment variable names.
    pub fn from_kv(kv: &HashMap<String, String>) -> Result<Self, Error> {
        let secret = kv
            .get(SECRET_ENV)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| Error::unauthorized(format!("{} must be set", SECRET_ENV)))?;

        let non_empty = |key: &str| kv.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        Ok(Self::builder()
            .secret(secret.as_str())
            .maybe_issuer(non_empty(ISSUER_ENV))
            .maybe_audience(non_empty(AUDIENCE_ENV))
            .role_claim(non_empty(ROLE_CLAIM_ENV).unwrap_or("role"))
            .build())
    }
}

/// Resolves HS256-signed session tokens.
///
/// The token is read from the `Authorization: Bearer` header, falling back to
/// the configured session cookies. Verification checks the signature, `exp`
/// (always required), and `iss`/`aud` when configured.
///
/// The session issuer must write a signed HS256 JWT (a JWS) into the cookie.
/// Stock next-auth cookies are encrypted JWEs and may be split across
/// `.0`/`.1` chunks; those resolve as `Fault(Malformed)` or `Absent`. Point
/// next-auth's `jwt.encode` at an HS256 signer with the same secret, or set
/// [`JwtConfig::cookie_names`] to the cookie the issuer actually writes.
///
/// | Request state                       | Resolution                      |
/// |-------------------------------------|---------------------------------|
/// | no bearer header, no session cookie | `Absent`                        |
/// | token not decodable                 | `Fault(Malformed)`              |
/// | wrong secret or algorithm           | `Fault(InvalidSignature)`       |
/// | `exp` in the past                   | `Fault(Expired)`                |
/// | wrong issuer/audience, bad role     | `Fault(InvalidClaims)`          |
/// | otherwise                           | `Resolved(sub, role)`           |
pub struct JwtResolver {
    key: DecodingKey,
    validation: Validation,
    role_claim: String,
    cookie_names: Vec<String>,
}

impl JwtResolver {
    /// Builds a resolver.
    ///
    /// # Errors
    ///
    /// Returns an [`Unauthorized`](crate::ErrorKind::Unauthorized) error if the
    /// secret is shorter than [`MIN_SECRET_LEN`] bytes, and a configuration
    /// error if the role claim name is empty.
    pub fn new(config: JwtConfig) -> Result<Self, Error> {
        if config.secret.len() < MIN_SECRET_LEN {
            return Err(Error::unauthorized(format!(
                "session secret must be at least {} bytes, got {}",
                MIN_SECRET_LEN,
                config.secret.len()
            )));
        }
        if config.role_claim.trim().is_empty() {
            return Err(Error::configuration("role claim name must be non-empty"));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway.as_secs();
        let mut required = vec!["exp"];
        if let Some(issuer) = config.issuer.as_ref() {
            validation.set_issuer(std::slice::from_ref(issuer));
            required.push("iss");
        }
        if let Some(audience) = config.audience.as_ref() {
            validation.set_audience(std::slice::from_ref(audience));
            required.push("aud");
        } else {
            validation.validate_aud = false;
        }
        validation.set_required_spec_claims(&required);

        Ok(Self {
            key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            role_claim: config.role_claim,
            cookie_names: config.cookie_names,
        })
    }

    /// Builds a resolver from the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::new(JwtConfig::from_env()?)
    }

    /// Finds the raw token on the request, if any.
    pub fn extract_token<'r>(&self, request: &'r GateRequest) -> Option<&'r str> {
        request
            .bearer_token()
            .or_else(|| self.cookie_names.iter().find_map(|name| request.cookie(name)))
    }

    /// Verifies a raw token.
    pub fn verify(&self, token: &str) -> Resolution {
        let claims = match decode::<Value>(token, &self.key, &self.validation) {
            Ok(data) => data.claims,
            Err(err) => {
                let kind = fault_kind(err.kind());
                return Resolution::fault(kind, format!("session token rejected: {}", err));
            },
        };

        let role = match claims.get(&self.role_claim) {
            None | Some(Value::Null) => None,
            Some(Value::String(role)) if role.is_empty() => None,
            // Roles compare byte for byte; " SUPERADMIN " is not SUPERADMIN.
            Some(Value::String(role)) => Some(role.clone()),
            Some(_) => {
                return Resolution::fault(
                    FaultKind::InvalidClaims,
                    format!("claim `{}` must be a string", self.role_claim),
                );
            },
        };

        let mut credential = Credential::new();
        if let Some(sub) = claims.get("sub").and_then(Value::as_str) {
            credential = credential.with_subject(sub);
        }
        if let Some(role) = role {
            credential = credential.with_role(role);
        }
        Resolution::Resolved(credential)
    }
}

fn fault_kind(kind: &JwtErrorKind) -> FaultKind {
    match kind {
        JwtErrorKind::ExpiredSignature => FaultKind::Expired,
        JwtErrorKind::InvalidSignature | JwtErrorKind::InvalidAlgorithm => {
            FaultKind::InvalidSignature
        },
        JwtErrorKind::InvalidIssuer
        | JwtErrorKind::InvalidAudience
        | JwtErrorKind::InvalidSubject
        | JwtErrorKind::ImmatureSignature
        | JwtErrorKind::MissingRequiredClaim(_) => FaultKind::InvalidClaims,
        _ => FaultKind::Malformed,
    }
}

impl CredentialResolver for JwtResolver {
    fn resolve<'a>(&'a self, request: &'a GateRequest) -> ResolveFuture<'a> {
        Box::pin(async move {
            match self.extract_token(request) {
                Some(token) => self.verify(token),
                None => Resolution::Absent,
            }
        })
    }
}

impl fmt::Debug for JwtResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtResolver")
            .field("key", &"[REDACTED]")
            .field("role_claim", &self.role_claim)
            .field("cookie_names", &self.cookie_names)
            .finish()
    }
}
