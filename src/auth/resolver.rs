//! Credential resolver trait.

use std::{future::Future, pin::Pin, sync::Arc};

use super::Resolution;
use crate::GateRequest;

/// A type alias for the boxed future returned by credential resolvers.
pub type ResolveFuture<'a> = Pin<Box<dyn Future<Output = Resolution> + Send + 'a>>;

/// Looks up and verifies the credential attached to a request.
///
/// Resolvers report every outcome through [`Resolution`]: a verified
/// credential, no credential at all, or a fault. They do not return errors and
/// should not panic; the gate treats anything that is not `Resolved` as
/// unauthenticated.
///
/// The gate bounds each call with its own timeout, so implementations do not
/// need one of their own. A resolver that is dropped mid-flight must leave no
/// state behind.
///
/// ## Object Safety
///
/// This trait is object-safe and can be used as `Arc<dyn CredentialResolver>`.
///
/// ## Example: Header-Based Resolver
///
/// ```rust
/// use storefront_gate::{Credential, CredentialResolver, GateRequest, Resolution};
/// use storefront_gate::auth::ResolveFuture;
///
/// /// Trusts a role header set by an upstream proxy.
/// struct ProxyRoleResolver;
///
/// impl CredentialResolver for ProxyRoleResolver {
///     fn resolve<'a>(&'a self, request: &'a GateRequest) -> ResolveFuture<'a> {
///         Box::pin(async move {
///             match request.headers().get("x-user-role").and_then(|v| v.to_str().ok()) {
///                 Some(role) => Resolution::Resolved(Credential::for_role(role)),
///                 None => Resolution::Absent,
///             }
///         })
///     }
/// }
/// ```
pub trait CredentialResolver: Send + Sync {
    /// Resolves the credential attached to `request`.
    fn resolve<'a>(&'a self, request: &'a GateRequest) -> ResolveFuture<'a>;
}

// Allow using Arc<dyn CredentialResolver> as CredentialResolver
impl<T: CredentialResolver + ?Sized> CredentialResolver for Arc<T> {
    fn resolve<'a>(&'a self, request: &'a GateRequest) -> ResolveFuture<'a> {
        (**self).resolve(request)
    }
}

// Allow using Box<dyn CredentialResolver> as CredentialResolver
impl<T: CredentialResolver + ?Sized> CredentialResolver for Box<T> {
    fn resolve<'a>(&'a self, request: &'a GateRequest) -> ResolveFuture<'a> {
        (**self).resolve(request)
    }
}
