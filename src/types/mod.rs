//! Core types for the storefront gate.
//!
//! - [`GateRequest`]: the inbound request as the gate sees it
//! - [`RouteClass`]: access tier a path falls into
//! - [`Decision`]: terminal outcome, `Allow` or `Redirect`
//! - [`Verdict`]: a decision plus the reason it was reached

mod decision;
mod request;
mod route;

pub use decision::{Decision, DecisionReason, RedirectTarget, Verdict};
pub use request::GateRequest;
pub use route::RouteClass;
