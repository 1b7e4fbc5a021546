//! Decision types for gate evaluation results.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use super::RouteClass;
use crate::Error;

/// A site-relative redirect destination.
///
/// Targets are absolute paths on the same origin (`/auth/sign-in`). Anything
/// that a browser could read as another origin is rejected at construction:
/// scheme-qualified URLs, protocol-relative `//host` paths, and backslashes
/// (which some browsers fold into `/`).
///
/// ```rust
/// use storefront_gate::RedirectTarget;
///
/// assert!(RedirectTarget::new("/auth/sign-in").is_ok());
/// assert!(RedirectTarget::new("https://evil.example/").is_err());
/// assert!(RedirectTarget::new("//evil.example/").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RedirectTarget(String);

impl RedirectTarget {
    /// Validates and wraps a redirect path.
    pub fn new(path: impl Into<String>) -> Result<Self, Error> {
        let path = path.into();
        if !path.starts_with('/') {
            return Err(Error::configuration(format!(
                "redirect target `{}` must be an absolute path starting with '/'",
                path
            )));
        }
        if path.starts_with("//") || path.contains('\\') {
            return Err(Error::configuration(format!(
                "redirect target `{}` could be read as another origin",
                path
            )));
        }
        if path.chars().any(|c| c.is_control() || c.is_whitespace()) {
            return Err(Error::configuration(format!(
                "redirect target `{}` contains whitespace or control characters",
                path.escape_debug()
            )));
        }
        Ok(Self(path))
    }

    /// Wraps a built-in target without re-validating it.
    pub(crate) fn from_static(path: &'static str) -> Self {
        debug_assert!(Self::new(path).is_ok(), "invalid built-in redirect target {path}");
        Self(path.to_string())
    }

    /// Returns the target path.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolves the target against the request URL, keeping its origin.
    ///
    /// ```rust
    /// use storefront_gate::RedirectTarget;
    /// use url::Url;
    ///
    /// let target = RedirectTarget::new("/auth/sign-in").unwrap();
    /// let base = Url::parse("https://shop.example/dashboard?tab=orders").unwrap();
    /// assert_eq!(target.resolve(&base).unwrap().as_str(), "https://shop.example/auth/sign-in");
    /// ```
    pub fn resolve(&self, base: &Url) -> Result<Url, url::ParseError> {
        base.join(&self.0)
    }
}

impl TryFrom<String> for RedirectTarget {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RedirectTarget> for String {
    fn from(target: RedirectTarget) -> Self {
        target.0
    }
}

impl AsRef<str> for RedirectTarget {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RedirectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The terminal outcome of one gate evaluation.
///
/// The host turns `Allow` into pass-through and `Redirect` into a 3xx
/// response (see [`Decision::into_response`](crate::Decision::into_response)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "decision", content = "location")]
pub enum Decision {
    /// Continue processing the request.
    Allow,
    /// Send the client to another path on the same origin.
    Redirect(RedirectTarget),
}

impl Decision {
    /// Returns `true` if the request may continue.
    #[inline]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Returns `true` if the request is redirected.
    #[inline]
    pub fn is_redirect(&self) -> bool {
        matches!(self, Decision::Redirect(_))
    }

    /// Returns the redirect target, if any.
    pub fn redirect_target(&self) -> Option<&RedirectTarget> {
        match self {
            Decision::Allow => None,
            Decision::Redirect(target) => Some(target),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Allow => write!(f, "allow"),
            Decision::Redirect(target) => write!(f, "redirect to {}", target),
        }
    }
}

/// Why the gate reached its decision.
///
/// Reasons keep apart outcomes that look identical to the client (several
/// reasons all redirect to sign-in) so they can be logged and counted
/// separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// Path is public; no credential was consulted.
    PublicPath,
    /// No credential was attached to the request.
    MissingCredential,
    /// A credential was attached but could not be verified.
    CredentialFault,
    /// The resolver did not answer within the configured timeout.
    ResolutionTimeout,
    /// Admin path, role outside the admin tier.
    AdminRoleRequired,
    /// Superadmin landed on the root or dashboard root.
    SuperadminLanding,
    /// Dashboard path, role outside the dashboard tier.
    DashboardRoleRequired,
    /// Every rule passed.
    Authorized,
}

impl DecisionReason {
    /// Returns `true` for valid credentials that failed a tier requirement.
    pub fn is_policy_violation(&self) -> bool {
        matches!(self, DecisionReason::AdminRoleRequired | DecisionReason::DashboardRoleRequired)
    }

    /// Returns `true` when the credential itself was the problem.
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self,
            DecisionReason::MissingCredential
                | DecisionReason::CredentialFault
                | DecisionReason::ResolutionTimeout
        )
    }

    /// Stable label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionReason::PublicPath => "public_path",
            DecisionReason::MissingCredential => "missing_credential",
            DecisionReason::CredentialFault => "credential_fault",
            DecisionReason::ResolutionTimeout => "resolution_timeout",
            DecisionReason::AdminRoleRequired => "admin_role_required",
            DecisionReason::SuperadminLanding => "superadmin_landing",
            DecisionReason::DashboardRoleRequired => "dashboard_role_required",
            DecisionReason::Authorized => "authorized",
        }
    }
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decision with the reason and route class that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    decision: Decision,
    reason: DecisionReason,
    class: RouteClass,
}

impl Verdict {
    /// Creates a verdict.
    pub fn new(decision: Decision, reason: DecisionReason, class: RouteClass) -> Self {
        Self { decision, reason, class }
    }

    /// Creates an allowing verdict.
    pub fn allow(reason: DecisionReason, class: RouteClass) -> Self {
        Self::new(Decision::Allow, reason, class)
    }

    /// Creates a redirecting verdict.
    pub fn redirect(target: &RedirectTarget, reason: DecisionReason, class: RouteClass) -> Self {
        Self::new(Decision::Redirect(target.clone()), reason, class)
    }

    /// The decision itself.
    pub fn decision(&self) -> &Decision {
        &self.decision
    }

    /// Why the decision was reached.
    pub fn reason(&self) -> DecisionReason {
        self.reason
    }

    /// The route class of the evaluated path.
    pub fn class(&self) -> RouteClass {
        self.class
    }

    /// Consumes the verdict, keeping only the decision.
    pub fn into_decision(self) -> Decision {
        self.decision
    }
}

impl From<Verdict> for Decision {
    fn from(verdict: Verdict) -> Self {
        verdict.decision
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.decision, self.reason, self.class)
    }
}
