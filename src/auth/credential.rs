//! Resolved credentials and resolution outcomes.

use std::borrow::Cow;

/// An identity recovered from a request credential.
///
/// Only the role takes part in policy decisions. The subject is carried for
/// logging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credential {
    subject: Option<String>,
    role: Option<String>,
}

impl Credential {
    /// Creates a credential with no subject and no role.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a credential carrying the given role.
    ///
    /// ```rust
    /// use storefront_gate::Credential;
    ///
    /// let credential = Credential::for_role("SUPERADMIN");
    /// assert_eq!(credential.role(), Some("SUPERADMIN"));
    /// ```
    pub fn for_role(role: impl Into<String>) -> Self {
        Self { subject: None, role: Some(role.into()) }
    }

    /// Sets the subject.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// The subject identifier, if the credential names one.
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// The role, if the credential carries one.
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }
}

/// Category of credential verification failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum FaultKind {
    /// The token could not be decoded at all.
    #[error("malformed credential")]
    Malformed,
    /// The token decoded but has expired.
    #[error("expired credential")]
    Expired,
    /// The signature does not match the configured secret.
    #[error("invalid signature")]
    InvalidSignature,
    /// Issuer, audience, or another required claim did not check out.
    #[error("invalid claims")]
    InvalidClaims,
    /// The resolver itself could not do its job (key store down, I/O).
    #[error("resolver unavailable")]
    Unavailable,
    /// Resolution did not finish within the gate's time budget.
    #[error("resolution timed out")]
    Timeout,
}

/// A credential was presented but could not be verified.
///
/// Faults never escape the gate; they turn into a sign-in redirect and a
/// warning log line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct CredentialFault {
    kind: FaultKind,
    message: Cow<'static, str>,
}

impl CredentialFault {
    /// Creates a fault.
    pub fn new(kind: FaultKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self { kind, message: message.into() }
    }

    /// The fault category.
    pub fn kind(&self) -> FaultKind {
        self.kind
    }

    /// Details for logs. Never shown to the client.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Outcome of resolving the credential attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A verified credential.
    Resolved(Credential),
    /// No credential was attached. Not an error.
    Absent,
    /// A credential was attached but could not be verified.
    Fault(CredentialFault),
}

impl Resolution {
    /// Shorthand for a resolved credential with a role.
    pub fn role(role: impl Into<String>) -> Self {
        Resolution::Resolved(Credential::for_role(role))
    }

    /// Shorthand for a fault.
    pub fn fault(kind: FaultKind, message: impl Into<Cow<'static, str>>) -> Self {
        Resolution::Fault(CredentialFault::new(kind, message))
    }

    /// The credential, if resolution succeeded.
    pub fn credential(&self) -> Option<&Credential> {
        match self {
            Resolution::Resolved(credential) => Some(credential),
            Resolution::Absent | Resolution::Fault(_) => None,
        }
    }
}

impl From<Credential> for Resolution {
    fn from(credential: Credential) -> Self {
        Resolution::Resolved(credential)
    }
}

impl From<CredentialFault> for Resolution {
    fn from(fault: CredentialFault) -> Self {
        Resolution::Fault(fault)
    }
}
