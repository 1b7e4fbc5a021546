//! Prelude module for convenient imports.
//!
//! ```rust
//! use storefront_gate::prelude::*;
//! ```
//!
//! This provides access to:
//! - The gate and its configuration
//! - Decision types
//! - Credential resolution types
//! - Error types

pub use crate::{
    auth::{Credential, CredentialResolver, FaultKind, JwtConfig, JwtResolver, Resolution},
    config::{GateConfig, PolicyConfig, RedirectConfig, TierConfig},
    error::{Error, ErrorKind, Result},
    gate::Gate,
    matcher::RouteMatcher,
    policy::PolicyTable,
    types::{Decision, DecisionReason, GateRequest, RedirectTarget, RouteClass, Verdict},
};
