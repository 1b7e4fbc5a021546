//! The validated, immutable policy table.

use super::{normalize_path, rules};
use crate::auth::{Credential, FaultKind, Resolution};
use crate::config::{PolicyConfig, RedirectConfig, TierConfig};
use crate::{DecisionReason, Error, RouteClass, Verdict};

/// A protected tier: path prefixes and the roles admitted to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tier {
    prefixes: Vec<String>,
    roles: Vec<String>,
}

impl Tier {
    fn from_config(name: &str, config: &TierConfig) -> Result<Self, Error> {
        if config.paths.is_empty() {
            return Err(Error::configuration(format!("{} tier has no paths", name)));
        }
        if config.roles.is_empty() {
            return Err(Error::configuration(format!(
                "{} tier has no roles and could never be entered",
                name
            )));
        }
        if config.roles.iter().any(|role| role.trim().is_empty()) {
            return Err(Error::configuration(format!("{} tier has an empty role", name)));
        }
        Ok(Self {
            prefixes: normalize_prefixes(&format!("{} tier", name), &config.paths)?,
            roles: config.roles.clone(),
        })
    }

    fn assemble(config: &TierConfig) -> Self {
        Self {
            prefixes: config.paths.iter().map(|p| normalize_path(p)).collect(),
            roles: config.roles.clone(),
        }
    }

    /// Returns `true` if the path starts with any tier prefix.
    pub fn matches(&self, path: &str) -> bool {
        starts_with_any(path, &self.prefixes)
    }

    /// Returns `true` if the role is admitted. No role is never admitted.
    pub fn permits(&self, role: Option<&str>) -> bool {
        role.is_some_and(|role| self.roles.iter().any(|r| r == role))
    }

    /// The normalized path prefixes.
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// The admitted roles.
    pub fn roles(&self) -> &[String] {
        &self.roles
    }
}

/// A normalized request path and its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    path: String,
    class: RouteClass,
}

impl Route {
    /// The normalized path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The route class.
    pub fn class(&self) -> RouteClass {
        self.class
    }

    /// Returns `true` for public routes.
    pub fn is_public(&self) -> bool {
        self.class == RouteClass::Public
    }
}

/// The access policy, validated once and never mutated.
///
/// Build it at startup and share it behind an `Arc`. Every lookup works on
/// the normalized path (see [`normalize_path`]).
///
/// ## Example
///
/// ```rust
/// use storefront_gate::auth::Resolution;
/// use storefront_gate::policy::PolicyTable;
/// use storefront_gate::{Decision, DecisionReason, PolicyConfig};
///
/// let table = PolicyTable::from_config(&PolicyConfig::default()).unwrap();
///
/// let verdict = table.decide("/admin/users", &Resolution::role("ADMINISTRATOR"));
/// assert_eq!(verdict.reason(), DecisionReason::AdminRoleRequired);
/// assert_eq!(verdict.decision().redirect_target().unwrap().as_str(), "/dashboard");
///
/// let verdict = table.decide("/auth/sign-in", &Resolution::Absent);
/// assert_eq!(verdict.decision(), &Decision::Allow);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTable {
    public: Vec<String>,
    admin: Tier,
    dashboard: Tier,
    superadmin_role: String,
    landing: Vec<String>,
    redirects: RedirectConfig,
}

impl PolicyTable {
    /// Validates a policy configuration and builds the table.
    ///
    /// # Errors
    ///
    /// Returns a [`Configuration`](crate::ErrorKind::Configuration) error if:
    /// - a prefix or landing path does not start with `/`
    /// - a public prefix is `/`, which would make every path public
    /// - a tier has no paths or no roles, or names an empty role
    /// - the superadmin role is empty
    pub fn from_config(config: &PolicyConfig) -> Result<Self, Error> {
        if config.superadmin_role.trim().is_empty() {
            return Err(Error::configuration("superadmin role must not be empty"));
        }

        let public = normalize_prefixes("public paths", &config.public_paths)?;
        if public.iter().any(|p| p == "/") {
            return Err(Error::configuration(
                "`/` cannot be a public prefix; it matches every path",
            ));
        }

        Ok(Self {
            public,
            admin: Tier::from_config("admin", &config.admin)?,
            dashboard: Tier::from_config("dashboard", &config.dashboard)?,
            superadmin_role: config.superadmin_role.clone(),
            landing: normalize_prefixes("landing paths", &config.landing_paths)?,
            redirects: config.redirects.clone(),
        })
    }

    // Built-in defaults are known to be valid.
    fn assemble(config: &PolicyConfig) -> Self {
        Self {
            public: config.public_paths.iter().map(|p| normalize_path(p)).collect(),
            admin: Tier::assemble(&config.admin),
            dashboard: Tier::assemble(&config.dashboard),
            superadmin_role: config.superadmin_role.clone(),
            landing: config.landing_paths.iter().map(|p| normalize_path(p)).collect(),
            redirects: config.redirects.clone(),
        }
    }

    /// Normalizes and classifies a raw request path.
    ///
    /// Public wins over admin, admin over dashboard.
    pub fn route(&self, raw_path: &str) -> Route {
        let path = normalize_path(raw_path);
        let class = self.classify(&path);
        Route { path, class }
    }

    /// Classifies an already-normalized path.
    pub fn classify(&self, path: &str) -> RouteClass {
        if self.is_public(path) {
            RouteClass::Public
        } else if self.admin.matches(path) {
            RouteClass::AdminProtected
        } else if self.dashboard.matches(path) {
            RouteClass::DashboardProtected
        } else {
            RouteClass::Unclassified
        }
    }

    /// Returns `true` if a normalized path starts with a public prefix.
    pub fn is_public(&self, path: &str) -> bool {
        starts_with_any(path, &self.public)
    }

    /// Returns `true` if a normalized path is exactly a landing path.
    pub fn is_landing(&self, path: &str) -> bool {
        self.landing.iter().any(|landing| landing == path)
    }

    /// Decides a raw path against a resolution.
    pub fn decide(&self, raw_path: &str, resolution: &Resolution) -> Verdict {
        self.decide_route(&self.route(raw_path), resolution)
    }

    /// Decides an already-classified route against a resolution.
    ///
    /// Public routes are allowed without looking at the resolution. Absent
    /// and faulted credentials redirect to sign-in.
    pub fn decide_route(&self, route: &Route, resolution: &Resolution) -> Verdict {
        if route.is_public() {
            return Verdict::allow(DecisionReason::PublicPath, route.class());
        }

        match resolution {
            Resolution::Absent => Verdict::redirect(
                &self.redirects.sign_in,
                DecisionReason::MissingCredential,
                route.class(),
            ),
            Resolution::Fault(fault) => {
                let reason = match fault.kind() {
                    FaultKind::Timeout => DecisionReason::ResolutionTimeout,
                    _ => DecisionReason::CredentialFault,
                };
                Verdict::redirect(&self.redirects.sign_in, reason, route.class())
            },
            Resolution::Resolved(credential) => self.authorize(route, credential),
        }
    }

    /// Applies the role rules to a verified credential.
    pub fn authorize(&self, route: &Route, credential: &Credential) -> Verdict {
        rules::evaluate(self, route, credential.role())
    }

    /// Normalized public prefixes.
    pub fn public_paths(&self) -> &[String] {
        &self.public
    }

    /// The admin tier.
    pub fn admin(&self) -> &Tier {
        &self.admin
    }

    /// The dashboard tier.
    pub fn dashboard(&self) -> &Tier {
        &self.dashboard
    }

    /// The role sent to the landing page.
    pub fn superadmin_role(&self) -> &str {
        &self.superadmin_role
    }

    /// Exact paths that trigger the superadmin landing redirect.
    pub fn landing_paths(&self) -> &[String] {
        &self.landing
    }

    /// Redirect destinations.
    pub fn redirects(&self) -> &RedirectConfig {
        &self.redirects
    }
}

impl Default for PolicyTable {
    /// The storefront policy.
    fn default() -> Self {
        Self::assemble(&PolicyConfig::default())
    }
}

impl TryFrom<&PolicyConfig> for PolicyTable {
    type Error = Error;

    fn try_from(config: &PolicyConfig) -> Result<Self, Self::Error> {
        Self::from_config(config)
    }
}

impl TryFrom<PolicyConfig> for PolicyTable {
    type Error = Error;

    fn try_from(config: PolicyConfig) -> Result<Self, Self::Error> {
        Self::from_config(&config)
    }
}

fn normalize_prefixes(what: &str, paths: &[String]) -> Result<Vec<String>, Error> {
    paths
        .iter()
        .map(|path| {
            if path.starts_with('/') {
                Ok(normalize_path(path))
            } else {
                Err(Error::configuration(format!("{} entry `{}` must start with '/'", what, path)))
            }
        })
        .collect()
}

fn starts_with_any(path: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
}
