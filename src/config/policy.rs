//! Policy table configuration.

use serde::{Deserialize, Serialize};

use crate::RedirectTarget;

fn default_public_paths() -> Vec<String> {
    [
        "/auth/sign-in",
        "/auth/sign-up",
        "/auth/forgot-password",
        "/api/auth/signin",
        "/api/auth/signup",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_landing_paths() -> Vec<String> {
    vec!["/".to_string(), "/dashboard".to_string()]
}

fn default_superadmin_role() -> String {
    "SUPERADMIN".to_string()
}

/// Path prefixes of one protected tier and the roles admitted to it.
///
/// ## Example
///
/// ```rust
/// use storefront_gate::TierConfig;
///
/// let tier = TierConfig::new(["/reports"], ["ANALYST"]);
/// assert_eq!(tier.paths, vec!["/reports".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Path prefixes belonging to the tier.
    pub paths: Vec<String>,
    /// Roles admitted to the tier.
    pub roles: Vec<String>,
}

impl TierConfig {
    /// Creates a tier from paths and roles.
    pub fn new<P, R>(paths: P, roles: R) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// The storefront admin area, open to `SUPERADMIN` only.
    pub fn storefront_admin() -> Self {
        Self::new(["/admin", "/api/admin", "/admin/users"], ["SUPERADMIN"])
    }

    /// The storefront dashboard, open to `ADMINISTRATOR` and `STAKEHOLDER`.
    pub fn storefront_dashboard() -> Self {
        Self::new(["/dashboard"], ["ADMINISTRATOR", "STAKEHOLDER"])
    }
}

/// Where each kind of rejected request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
pub struct RedirectConfig {
    /// Unauthenticated requests and failed dashboard checks.
    #[serde(default = "RedirectConfig::default_sign_in")]
    #[builder(default = RedirectConfig::default_sign_in())]
    pub sign_in: RedirectTarget,

    /// Failed admin checks.
    #[serde(default = "RedirectConfig::default_dashboard")]
    #[builder(default = RedirectConfig::default_dashboard())]
    pub dashboard: RedirectTarget,

    /// Superadmin landing page.
    #[serde(default = "RedirectConfig::default_admin_users")]
    #[builder(default = RedirectConfig::default_admin_users())]
    pub admin_users: RedirectTarget,
}

impl RedirectConfig {
    fn default_sign_in() -> RedirectTarget {
        RedirectTarget::from_static("/auth/sign-in")
    }

    fn default_dashboard() -> RedirectTarget {
        RedirectTarget::from_static("/dashboard")
    }

    fn default_admin_users() -> RedirectTarget {
        RedirectTarget::from_static("/admin/users")
    }
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// The static access policy: public paths, tiers, and landing behaviour.
///
/// Every field defaults to the storefront policy, so a JSON document only
/// needs the fields it changes.
///
/// ## Example
///
/// ```rust
/// use storefront_gate::{PolicyConfig, TierConfig};
///
/// let config = PolicyConfig::builder()
///     .dashboard(TierConfig::new(["/dashboard", "/orders"], ["ADMINISTRATOR"]))
///     .build();
///
/// assert_eq!(config.superadmin_role, "SUPERADMIN");
/// assert_eq!(config.public_paths.len(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(default)]
pub struct PolicyConfig {
    /// Prefixes reachable without a credential.
    #[builder(default = default_public_paths())]
    pub public_paths: Vec<String>,

    /// The admin tier.
    #[builder(default = TierConfig::storefront_admin())]
    pub admin: TierConfig,

    /// The dashboard tier.
    #[builder(default = TierConfig::storefront_dashboard())]
    pub dashboard: TierConfig,

    /// Role that gets the fixed landing page.
    #[builder(into, default = default_superadmin_role())]
    pub superadmin_role: String,

    /// Exact paths on which the superadmin is sent to the landing page.
    #[builder(default = default_landing_paths())]
    pub landing_paths: Vec<String>,

    /// Redirect destinations.
    #[builder(default)]
    pub redirects: RedirectConfig,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
