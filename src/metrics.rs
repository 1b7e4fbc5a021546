//! Decision counters for the gate.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use serde::Serialize;

use crate::{DecisionReason, Verdict};

/// Lock-free counters updated on every evaluation.
///
/// Cloning shares the counters, so a host can keep a handle for its own
/// `/metrics` endpoint while the gate records into the same values.
///
/// ## Example
///
/// ```rust
/// use storefront_gate::{DecisionReason, GateMetrics, RouteClass, Verdict};
///
/// let metrics = GateMetrics::default();
/// metrics.record(&Verdict::allow(DecisionReason::PublicPath, RouteClass::Public));
///
/// let snapshot = metrics.snapshot();
/// assert_eq!(snapshot.evaluations, 1);
/// assert_eq!(snapshot.public, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GateMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    evaluations: AtomicU64,
    allowed: AtomicU64,
    redirected: AtomicU64,
    // Breakdown by reason
    public: AtomicU64,
    missing_credential: AtomicU64,
    credential_faults: AtomicU64,
    timeouts: AtomicU64,
    policy_violations: AtomicU64,
    superadmin_landings: AtomicU64,
    // Resolver latency (sum and count)
    resolve_latency_sum_ns: AtomicU64,
    resolve_latency_count: AtomicU64,
}

impl GateMetrics {
    /// Creates a zeroed set of counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one finished evaluation.
    pub fn record(&self, verdict: &Verdict) {
        let inner = &self.inner;
        inner.evaluations.fetch_add(1, Ordering::Relaxed);
        if verdict.decision().is_allowed() {
            inner.allowed.fetch_add(1, Ordering::Relaxed);
        } else {
            inner.redirected.fetch_add(1, Ordering::Relaxed);
        }

        let counter = match verdict.reason() {
            DecisionReason::PublicPath => &inner.public,
            DecisionReason::MissingCredential => &inner.missing_credential,
            DecisionReason::CredentialFault => &inner.credential_faults,
            DecisionReason::ResolutionTimeout => &inner.timeouts,
            DecisionReason::AdminRoleRequired | DecisionReason::DashboardRoleRequired => {
                &inner.policy_violations
            },
            DecisionReason::SuperadminLanding => &inner.superadmin_landings,
            DecisionReason::Authorized => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Records how long the credential resolver took.
    pub fn record_resolve_latency(&self, duration: Duration) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.inner.resolve_latency_sum_ns.fetch_add(nanos, Ordering::Relaxed);
        self.inner.resolve_latency_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a snapshot of the current values.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let inner = &self.inner;
        let latency_count = inner.resolve_latency_count.load(Ordering::Relaxed);
        let latency_sum_ns = inner.resolve_latency_sum_ns.load(Ordering::Relaxed);

        MetricsSnapshot {
            evaluations: inner.evaluations.load(Ordering::Relaxed),
            allowed: inner.allowed.load(Ordering::Relaxed),
            redirected: inner.redirected.load(Ordering::Relaxed),
            public: inner.public.load(Ordering::Relaxed),
            missing_credential: inner.missing_credential.load(Ordering::Relaxed),
            credential_faults: inner.credential_faults.load(Ordering::Relaxed),
            timeouts: inner.timeouts.load(Ordering::Relaxed),
            policy_violations: inner.policy_violations.load(Ordering::Relaxed),
            superadmin_landings: inner.superadmin_landings.load(Ordering::Relaxed),
            resolve_latency_avg_ns: latency_sum_ns.checked_div(latency_count).unwrap_or(0),
        }
    }

    /// Resets every counter to zero.
    pub fn reset(&self) {
        let inner = &self.inner;
        for counter in [
            &inner.evaluations,
            &inner.allowed,
            &inner.redirected,
            &inner.public,
            &inner.missing_credential,
            &inner.credential_faults,
            &inner.timeouts,
            &inner.policy_violations,
            &inner.superadmin_landings,
            &inner.resolve_latency_sum_ns,
            &inner.resolve_latency_count,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// Point-in-time copy of [`GateMetrics`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Total evaluations.
    pub evaluations: u64,
    /// Evaluations that allowed the request.
    pub allowed: u64,
    /// Evaluations that redirected the request.
    pub redirected: u64,
    /// Allowed because the path is public.
    pub public: u64,
    /// Redirected because no credential was attached.
    pub missing_credential: u64,
    /// Redirected because the credential could not be verified.
    pub credential_faults: u64,
    /// Redirected because the resolver timed out.
    pub timeouts: u64,
    /// Redirected by a tier rule.
    pub policy_violations: u64,
    /// Superadmins sent to the landing page.
    pub superadmin_landings: u64,
    /// Average resolver latency in nanoseconds.
    pub resolve_latency_avg_ns: u64,
}

impl MetricsSnapshot {
    /// Returns the average resolver latency as a Duration.
    pub fn resolve_latency_avg(&self) -> Duration {
        Duration::from_nanos(self.resolve_latency_avg_ns)
    }

    /// Returns the share of evaluations that redirected (0.0 - 1.0).
    pub fn redirect_rate(&self) -> f64 {
        if self.evaluations == 0 {
            return 0.0;
        }
        self.redirected as f64 / self.evaluations as f64
    }
}
