//! Error types for the storefront gate.
//!
//! The gate keeps two kinds of failure apart:
//! - [`Error`]: setup-time failures (bad configuration, missing secret, unreadable files)
//! - [`CredentialFault`](crate::auth::CredentialFault): per-request credential problems
//!
//! ## Key Invariant
//!
//! [`Gate::evaluate`](crate::Gate::evaluate) never returns an `Error`. Every
//! per-request failure is folded into a redirect decision. `Error` only shows up
//! while building the gate.
//!
//! ```rust,ignore
//! // Setup can fail
//! let config = GateConfig::from_env()?;
//!
//! // Evaluation cannot
//! let verdict = gate.evaluate(&request, &resolver).await;
//! ```

mod core;
mod kind;

pub use self::core::Error;
pub use kind::ErrorKind;

/// A specialized `Result` type for gate setup operations.
pub type Result<T> = std::result::Result<T, Error>;
