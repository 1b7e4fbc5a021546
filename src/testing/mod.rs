//! Testing utilities for code that sits behind the gate.
//!
//! - [`ScriptedResolver`]: Answers every request with a fixed resolution and
//!   records which paths asked
//! - [`PendingResolver`]: Never answers, for exercising the resolve timeout
//! - [`DelayedResolver`]: Answers after a fixed delay
//! - [`PanickingResolver`]: Panics when polled
//!
//! ## Quick Start
//!
//! ```rust
//! use storefront_gate::testing::ScriptedResolver;
//! use storefront_gate::{Gate, GateRequest};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let gate = Gate::default();
//! let resolver = ScriptedResolver::role("STAKEHOLDER");
//!
//! let verdict = gate.evaluate(&GateRequest::new("/dashboard"), &resolver).await;
//! assert!(verdict.decision().is_allowed());
//! assert_eq!(resolver.call_count(), 1);
//! # }
//! ```

mod resolvers;

pub use resolvers::{DelayedResolver, PanickingResolver, PendingResolver, ScriptedResolver};
