//! Resolvers with scripted behaviour.

use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;

use crate::GateRequest;
use crate::auth::{CredentialResolver, FaultKind, ResolveFuture, Resolution};

/// A resolver that returns the same resolution for every request.
///
/// Clones share the call log.
///
/// ## Example
///
/// ```rust
/// use storefront_gate::auth::FaultKind;
/// use storefront_gate::testing::ScriptedResolver;
///
/// let expired = ScriptedResolver::fault(FaultKind::Expired);
/// assert_eq!(expired.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedResolver {
    resolution: Resolution,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedResolver {
    /// Creates a resolver answering with `resolution`.
    pub fn new(resolution: Resolution) -> Self {
        Self { resolution, calls: Arc::new(Mutex::new(Vec::new())) }
    }

    /// No credential attached.
    pub fn absent() -> Self {
        Self::new(Resolution::Absent)
    }

    /// A verified credential with the given role.
    pub fn role(role: impl Into<String>) -> Self {
        Self::new(Resolution::role(role))
    }

    /// A faulted credential of the given kind.
    pub fn fault(kind: FaultKind) -> Self {
        Self::new(Resolution::fault(kind, "scripted fault"))
    }

    /// Number of times the resolver was consulted.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Paths of the requests that consulted the resolver, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Clears the call log.
    pub fn reset(&self) {
        self.calls.lock().clear();
    }
}

impl CredentialResolver for ScriptedResolver {
    fn resolve<'a>(&'a self, request: &'a GateRequest) -> ResolveFuture<'a> {
        Box::pin(async move {
            self.calls.lock().push(request.path().to_string());
            self.resolution.clone()
        })
    }
}

/// A resolver whose future never completes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PendingResolver;

impl CredentialResolver for PendingResolver {
    fn resolve<'a>(&'a self, _request: &'a GateRequest) -> ResolveFuture<'a> {
        Box::pin(std::future::pending())
    }
}

/// A resolver that sleeps before answering.
///
/// Uses the tokio clock, so paused-time tests stay deterministic.
#[derive(Debug, Clone)]
pub struct DelayedResolver {
    delay: Duration,
    resolution: Resolution,
}

impl DelayedResolver {
    /// Answers with `resolution` after `delay`.
    pub fn new(delay: Duration, resolution: Resolution) -> Self {
        Self { delay, resolution }
    }
}

impl CredentialResolver for DelayedResolver {
    fn resolve<'a>(&'a self, _request: &'a GateRequest) -> ResolveFuture<'a> {
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            self.resolution.clone()
        })
    }
}

/// A resolver whose future panics when polled.
///
/// The gate turns the panic into an `Unavailable` fault.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanickingResolver;

impl CredentialResolver for PanickingResolver {
    #[allow(clippy::panic)]
    fn resolve<'a>(&'a self, request: &'a GateRequest) -> ResolveFuture<'a> {
        Box::pin(async move { panic!("resolver failed on {}", request.path()) })
    }
}
