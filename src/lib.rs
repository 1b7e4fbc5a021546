//! # storefront-gate
//!
//! Request authorization gate for the storefront.
//!
//! The gate runs in front of every page and API handler and answers one
//! question: may this request proceed, and if not, where should the client
//! go instead?
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use storefront_gate::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), storefront_gate::Error> {
//!     let gate = Gate::new(&GateConfig::from_env()?)?;
//!     let resolver = JwtResolver::from_env()?;
//!
//!     let request = GateRequest::new("/admin/users")
//!         .with_header(http::header::AUTHORIZATION, "Bearer eyJ...");
//!
//!     match gate.evaluate(&request, &resolver).await.into_decision() {
//!         Decision::Allow => println!("serve the page"),
//!         Decision::Redirect(target) => println!("send the client to {}", target),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Key Concepts
//!
//! - **Fail closed**: a missing, unverifiable or slow credential redirects to
//!   sign-in. Evaluation never returns an error.
//! - **Public first**: public paths are allowed without touching the credential.
//! - **Ordered rules**: admin tier, then superadmin landing, then dashboard tier.
//!   The first rule that fires decides.
//! - **Immutable policy**: the [`PolicyTable`](policy::PolicyTable) is validated
//!   once at startup and shared read-only.
//!
//! ## Features
//!
//! - `axum` (default): axum 0.8 middleware in [`middleware`]

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

// Core modules
pub mod auth;
pub mod config;
pub mod error;
pub mod gate;
pub mod policy;
pub mod types;

// Host integration
pub mod matcher;
pub mod response;

#[cfg(feature = "axum")]
#[cfg_attr(docsrs, doc(cfg(feature = "axum")))]
pub mod middleware;

// Observability
pub mod metrics;

// Testing utilities
pub mod testing;

// Prelude for convenient imports
pub mod prelude;

// Re-export main types at crate root for convenience
pub use error::{Error, ErrorKind, Result};
pub use gate::Gate;
pub use types::{Decision, DecisionReason, GateRequest, RedirectTarget, RouteClass, Verdict};

// Re-export auth types
pub use auth::{Credential, CredentialFault, CredentialResolver, FaultKind, Resolution};

// Re-export config types
pub use config::{GateConfig, PolicyConfig, RedirectConfig, TierConfig};
pub use matcher::{MatcherConfig, RouteMatcher};
pub use metrics::{GateMetrics, MetricsSnapshot};
