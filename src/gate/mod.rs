//! The authorization gate.
//!
//! [`Gate::evaluate`] runs once per request, before any handler:
//!
//! ```text
//! path ──► normalize ──► public? ──yes──► Allow
//!                          │
//!                          no
//!                          ▼
//!               resolve credential (bounded by timeout)
//!                          │
//!   absent / fault / timeout / panic ──► Redirect(sign-in)
//!                          │
//!                       resolved
//!                          ▼
//!        admin tier ► superadmin landing ► dashboard tier ► Allow
//! ```
//!
//! Every branch ends in a [`Verdict`]; evaluation never returns an error.

use std::{any::Any, panic::AssertUnwindSafe, sync::Arc, time::Duration};

use futures::FutureExt;
use tracing::{Instrument, field};

use crate::auth::{CredentialResolver, FaultKind, Resolution};
use crate::policy::{PolicyTable, Route};
use crate::{DecisionReason, Error, GateConfig, GateMetrics, GateRequest, Verdict};

/// Evaluates requests against an immutable [`PolicyTable`].
///
/// Cheap to clone; clones share the table and the metrics.
///
/// ## Example
///
/// ```rust
/// use storefront_gate::testing::ScriptedResolver;
/// use storefront_gate::{Decision, Gate, GateConfig, GateRequest};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), storefront_gate::Error> {
/// let gate = Gate::new(&GateConfig::default())?;
///
/// let verdict = gate
///     .evaluate(&GateRequest::new("/admin/users"), &ScriptedResolver::role("STAKEHOLDER"))
///     .await;
///
/// assert_eq!(verdict.decision().redirect_target().unwrap().as_str(), "/dashboard");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Gate {
    table: Arc<PolicyTable>,
    resolve_timeout: Duration,
    metrics: GateMetrics,
}

impl Gate {
    /// Validates the configuration and builds a gate.
    ///
    /// # Errors
    ///
    /// Returns a [`Configuration`](crate::ErrorKind::Configuration) error if
    /// the policy is invalid or the resolve timeout is zero.
    pub fn new(config: &GateConfig) -> Result<Self, Error> {
        if config.resolve_timeout.is_zero() {
            return Err(Error::configuration("resolve timeout must be greater than zero"));
        }
        let table = PolicyTable::from_config(&config.policy)?;
        Ok(Self::from_table(table, config.resolve_timeout))
    }

    /// Builds a gate from an already-validated table.
    pub fn from_table(table: impl Into<Arc<PolicyTable>>, resolve_timeout: Duration) -> Self {
        Self { table: table.into(), resolve_timeout, metrics: GateMetrics::new() }
    }

    /// Records into the given metrics instead of a private set.
    #[must_use]
    pub fn with_metrics(mut self, metrics: GateMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// The policy table.
    pub fn table(&self) -> &PolicyTable {
        &self.table
    }

    /// Upper bound on a single credential resolution.
    pub fn resolve_timeout(&self) -> Duration {
        self.resolve_timeout
    }

    /// The decision counters.
    pub fn metrics(&self) -> &GateMetrics {
        &self.metrics
    }

    /// Decides whether `request` may proceed.
    ///
    /// Public paths are allowed without calling `resolver`. Otherwise the
    /// resolver runs under the gate's timeout; if it does not answer in time,
    /// or panics, the request is treated as unauthenticated.
    pub async fn evaluate<R>(&self, request: &GateRequest, resolver: &R) -> Verdict
    where
        R: CredentialResolver + ?Sized,
    {
        let route = self.table.route(request.path());
        let span = tracing::info_span!(
            "gate.evaluate",
            path = %route.path(),
            class = %route.class(),
            outcome = field::Empty,
            reason = field::Empty,
        );

        async {
            let verdict = if route.is_public() {
                self.table.decide_route(&route, &Resolution::Absent)
            } else {
                let resolution = self.resolve(request, resolver).await;
                self.table.decide_route(&route, &resolution)
            };

            let span = tracing::Span::current();
            let outcome = if verdict.decision().is_allowed() { "allow" } else { "redirect" };
            span.record("outcome", outcome);
            span.record("reason", verdict.reason().as_str());
            log_verdict(&route, &verdict);

            self.metrics.record(&verdict);
            verdict
        }
        .instrument(span)
        .await
    }

    async fn resolve<R>(&self, request: &GateRequest, resolver: &R) -> Resolution
    where
        R: CredentialResolver + ?Sized,
    {
        let started = tokio::time::Instant::now();
        // The call sits inside the async block so a panic before the first
        // poll is caught too.
        let guarded = AssertUnwindSafe(async { resolver.resolve(request).await }).catch_unwind();
        let result = tokio::time::timeout(self.resolve_timeout, guarded).await;
        self.metrics.record_resolve_latency(started.elapsed());

        match result {
            Ok(Err(panic)) => {
                let message = panic_message(panic.as_ref());
                tracing::error!(
                    fault_kind = %FaultKind::Unavailable,
                    error = %message,
                    "credential resolver panicked"
                );
                Resolution::fault(FaultKind::Unavailable, format!("resolver panicked: {message}"))
            },
            Ok(Ok(Resolution::Fault(fault))) => {
                tracing::warn!(
                    fault_kind = %fault.kind(),
                    error = %fault.message(),
                    "credential resolution failed"
                );
                Resolution::Fault(fault)
            },
            Ok(Ok(resolution)) => resolution,
            Err(_) => {
                tracing::warn!(
                    fault_kind = %FaultKind::Timeout,
                    timeout_ms = self.resolve_timeout.as_millis() as u64,
                    "credential resolution timed out"
                );
                Resolution::fault(
                    FaultKind::Timeout,
                    format!("resolver did not answer within {:?}", self.resolve_timeout),
                )
            },
        }
    }
}

impl Default for Gate {
    /// The storefront policy with the default resolve timeout.
    fn default() -> Self {
        let config = GateConfig::default();
        Self::from_table(PolicyTable::default(), config.resolve_timeout)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

fn log_verdict(route: &Route, verdict: &Verdict) {
    let location = verdict.decision().redirect_target().map(|t| t.as_str()).unwrap_or("");
    match verdict.reason() {
        DecisionReason::MissingCredential => {
            tracing::debug!(location, "no credential, redirecting to sign-in");
        },
        DecisionReason::CredentialFault | DecisionReason::ResolutionTimeout => {
            tracing::debug!(location, "unverified credential, redirecting to sign-in");
        },
        reason if reason.is_policy_violation() => {
            tracing::info!(path = %route.path(), %reason, location, "role not admitted");
        },
        reason => {
            tracing::trace!(%reason, location, "request decided");
        },
    }
}
