//! Credential resolution for the storefront gate.
//!
//! The gate never looks at tokens itself. It asks a [`CredentialResolver`] for
//! a [`Resolution`] and branches on the tag:
//!
//! - [`Resolution::Resolved`]: a verified [`Credential`] (subject and role)
//! - [`Resolution::Absent`]: nothing attached, the normal unauthenticated case
//! - [`Resolution::Fault`]: something attached but unverifiable ([`CredentialFault`])
//!
//! ## Session Tokens
//!
//! [`JwtResolver`] handles the storefront's HS256 session tokens, read from a
//! bearer header or the session cookie:
//!
//! ```rust,ignore
//! use storefront_gate::auth::{JwtConfig, JwtResolver};
//!
//! let resolver = JwtResolver::new(
//!     JwtConfig::builder()
//!         .secret(std::env::var("STOREFRONT_GATE_SECRET")?)
//!         .build(),
//! )?;
//! ```
//!
//! ## Custom Resolvers
//!
//! Anything that can answer "who is this request?" can implement
//! [`CredentialResolver`]; see the trait docs for an example.

mod credential;
mod jwt;
mod resolver;

pub use credential::{Credential, CredentialFault, FaultKind, Resolution};
pub use jwt::{
    AUDIENCE_ENV, ISSUER_ENV, JwtConfig, JwtResolver, MIN_SECRET_LEN, ROLE_CLAIM_ENV, SECRET_ENV,
    SessionSecret,
};
pub use resolver::{CredentialResolver, ResolveFuture};
