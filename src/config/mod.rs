//! Configuration types for the storefront gate.
//!
//! This module provides:
//! - [`GateConfig`]: Top-level settings, loaded from JSON or the environment
//! - [`PolicyConfig`]: Public paths, protected tiers, landing behaviour
//! - [`TierConfig`]: Prefixes and roles of one protected tier
//! - [`RedirectConfig`]: Where rejected requests are sent
//!
//! Configuration is plain data. It is checked when it is turned into a
//! [`PolicyTable`](crate::policy::PolicyTable), so an invalid document fails at
//! startup rather than on the first request.

mod gate;
mod policy;

pub use gate::{CONFIG_PATH_ENV, GateConfig, PUBLIC_ORIGIN_ENV, RESOLVE_TIMEOUT_ENV};
pub use policy::{PolicyConfig, RedirectConfig, TierConfig};
