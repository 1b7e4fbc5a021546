//! Top-level gate configuration and loading.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use super::PolicyConfig;
use crate::{Error, ErrorKind, MatcherConfig};

/// Environment variable pointing at a JSON config file.
pub const CONFIG_PATH_ENV: &str = "STOREFRONT_GATE_CONFIG";

/// Environment variable overriding the resolver timeout, in milliseconds.
pub const RESOLVE_TIMEOUT_ENV: &str = "STOREFRONT_GATE_RESOLVE_TIMEOUT_MS";

/// Environment variable setting the public origin redirects point at.
pub const PUBLIC_ORIGIN_ENV: &str = "STOREFRONT_GATE_PUBLIC_ORIGIN";

const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(2);

fn default_resolve_timeout() -> Duration {
    DEFAULT_RESOLVE_TIMEOUT
}

/// Everything the gate reads once at startup.
///
/// ## Example: Builder
///
/// ```rust
/// use storefront_gate::GateConfig;
/// use std::time::Duration;
///
/// let config = GateConfig::builder()
///     .resolve_timeout(Duration::from_millis(500))
///     .build();
///
/// assert_eq!(config.policy.superadmin_role, "SUPERADMIN");
/// ```
///
/// ## Example: JSON
///
/// ```rust
/// use storefront_gate::GateConfig;
///
/// let config = GateConfig::from_json_str(r#"{
///     "resolve_timeout_ms": 750,
///     "policy": { "public_paths": ["/login", "/api/auth"] },
///     "matcher": { "exclude_prefixes": ["/static"] }
/// }"#).unwrap();
///
/// assert_eq!(config.resolve_timeout.as_millis(), 750);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(default)]
pub struct GateConfig {
    /// The access policy.
    #[builder(default)]
    pub policy: PolicyConfig,

    /// Which inbound paths reach the gate at all.
    #[builder(default)]
    pub matcher: MatcherConfig,

    /// Upper bound on a single credential resolution.
    #[serde(rename = "resolve_timeout_ms", with = "duration_millis")]
    #[builder(default = default_resolve_timeout())]
    pub resolve_timeout: Duration,

    /// Origin (`scheme://host[:port]`) absolute redirects are built on.
    ///
    /// When unset, redirects reuse the origin of the request, which comes
    /// from the client-supplied `Host` and `X-Forwarded-Proto` headers. Set
    /// this when the gate is reachable under more than one host name or
    /// behind a proxy that does not overwrite those headers.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub public_origin: Option<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GateConfig {
    /// Parses a JSON document. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|err| {
            Error::new(ErrorKind::Io, format!("reading gate config {}: {}", path.display(), err))
                .with_source(err)
        })?;
        Self::from_json_str(&raw)
    }

    /// Loads configuration from the process environment.
    ///
    /// Reads the file named by `STOREFRONT_GATE_CONFIG` when set, otherwise
    /// starts from defaults; `STOREFRONT_GATE_RESOLVE_TIMEOUT_MS` overrides the
    /// timeout either way.
    pub fn from_env() -> Result<Self, Error> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_kv(&vars)
    }

    /// Same as [`from_env`](Self::from_env), reading from a key/value map.
    pub fn from_kv(kv: &HashMap<String, String>) -> Result<Self, Error> {
        let mut config = match kv.get(CONFIG_PATH_ENV).map(|p| p.trim()).filter(|p| !p.is_empty()) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        let origin = kv.get(PUBLIC_ORIGIN_ENV).map(|o| o.trim()).filter(|o| !o.is_empty());
        if let Some(origin) = origin {
            config.public_origin = Some(origin.to_string());
        }

        if let Some(raw) = kv.get(RESOLVE_TIMEOUT_ENV) {
            let millis: u64 = raw.trim().parse().map_err(|_| {
                Error::configuration(format!(
                    "{} must be an integer number of milliseconds",
                    RESOLVE_TIMEOUT_ENV
                ))
            })?;
            config.resolve_timeout = Duration::from_millis(millis);
        }

        Ok(config)
    }

    /// Parses [`public_origin`](Self::public_origin).
    ///
    /// # Errors
    ///
    /// Returns a configuration error unless the origin is an `http` or
    /// `https` URL with a host and nothing after the authority.
    pub fn public_origin_url(&self) -> Result<Option<Url>, Error> {
        let Some(raw) = self.public_origin.as_deref() else {
            return Ok(None);
        };
        let invalid = || Error::configuration(format!("public origin `{}` is not an origin", raw));

        let url = Url::parse(raw).map_err(|err| invalid().with_source(err))?;
        if !matches!(url.scheme(), "http" | "https")
            || !url.has_host()
            || url.path() != "/"
            || url.query().is_some()
            || url.fragment().is_some()
            || !url.username().is_empty()
        {
            return Err(invalid());
        }
        Ok(Some(url))
    }
}

// Duration as integer milliseconds
mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
