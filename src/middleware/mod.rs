//! axum integration.
//!
//! [`gate`] is an axum 0.8 middleware function. Requests in the matcher's
//! scope are evaluated; allowed requests continue with their [`Verdict`] in
//! the request extensions, redirected ones get a `307` with `Location`.
//!
//! The gate decides on the normalized path (see
//! [`normalize_path`](crate::policy::normalize_path)), and an allowed request
//! is forwarded with that same path, so `/api/admin/..` reaches the router as
//! `/api` and never as a request for `/api/admin/{id}`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use axum::{Router, middleware, routing::get};
//! use storefront_gate::auth::JwtResolver;
//! use storefront_gate::middleware::{GateState, gate};
//! use storefront_gate::GateConfig;
//!
//! let state = GateState::from_config(&GateConfig::from_env()?, JwtResolver::from_env()?)?;
//!
//! let app = Router::new()
//!     .route("/dashboard", get(|| async { "dashboard" }))
//!     .layer(middleware::from_fn_with_state(state, gate));
//! ```

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::Uri;
use url::Url;

use crate::auth::CredentialResolver;
use crate::policy::normalize_path;
use crate::{Error, Gate, GateConfig, GateRequest, RouteMatcher, Verdict};

/// Shared state for the [`gate`] middleware.
#[derive(Clone)]
pub struct GateState {
    gate: Gate,
    resolver: Arc<dyn CredentialResolver>,
    matcher: Arc<RouteMatcher>,
    origin: Option<Arc<Url>>,
}

impl GateState {
    /// Wraps a gate and a resolver. Uses the default route matcher.
    pub fn new(gate: Gate, resolver: impl CredentialResolver + 'static) -> Self {
        Self {
            gate,
            resolver: Arc::new(resolver),
            matcher: Arc::new(RouteMatcher::default()),
            origin: None,
        }
    }

    /// Builds the gate, matcher and redirect origin from configuration.
    pub fn from_config(
        config: &GateConfig,
        resolver: impl CredentialResolver + 'static,
    ) -> Result<Self, Error> {
        let gate = Gate::new(config)?;
        let mut state = Self::new(gate, resolver).with_matcher(RouteMatcher::new(&config.matcher));
        if let Some(origin) = config.public_origin_url()? {
            state = state.with_public_origin(origin);
        }
        Ok(state)
    }

    /// Builds redirect locations on `origin` instead of the request's
    /// `Host` and `X-Forwarded-Proto` headers.
    #[must_use]
    pub fn with_public_origin(mut self, origin: Url) -> Self {
        self.origin = Some(Arc::new(origin));
        self
    }

    /// Replaces the route matcher.
    #[must_use]
    pub fn with_matcher(mut self, matcher: RouteMatcher) -> Self {
        self.matcher = Arc::new(matcher);
        self
    }

    /// The wrapped gate.
    pub fn gate(&self) -> &Gate {
        &self.gate
    }
}

impl std::fmt::Debug for GateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateState")
            .field("gate", &self.gate)
            .field("matcher", &self.matcher)
            .field("origin", &self.origin.as_ref().map(|o| o.as_str()))
            .finish_non_exhaustive()
    }
}

/// Evaluates the request and either forwards it or redirects.
///
/// Use with [`axum::middleware::from_fn_with_state`].
pub async fn gate(State(state): State<GateState>, mut request: Request, next: Next) -> Response {
    if !state.matcher.matches(request.uri().path()) {
        return next.run(request).await;
    }

    let gate_request = GateRequest::from_http(&request);
    let verdict = state.gate.evaluate(&gate_request, state.resolver.as_ref()).await;

    if verdict.decision().is_allowed() {
        // Route on the path the gate decided on.
        let path = normalize_path(request.uri().path());
        if path != request.uri().path() {
            let Some(uri) = with_path(request.uri(), &path) else {
                tracing::error!(%verdict, %path, "normalized path is not a valid URI");
                return forbidden();
            };
            tracing::debug!(
                from = %request.uri().path(),
                to = %path,
                "forwarding normalized path"
            );
            *request.uri_mut() = uri;
        }
        request.extensions_mut().insert(verdict);
        return next.run(request).await;
    }

    let base = state.origin.as_deref().or(gate_request.url());
    match verdict.clone().into_response::<Body>(base) {
        Some(response) => response,
        None => {
            // Redirect verdicts always render; stay closed if one ever doesn't.
            tracing::error!(%verdict, "redirect verdict rendered no response");
            forbidden()
        },
    }
}

/// `uri` with its path replaced and its query kept.
fn with_path(uri: &Uri, path: &str) -> Option<Uri> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse().ok()?);
    Uri::from_parts(parts).ok()
}

fn forbidden() -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = http::StatusCode::FORBIDDEN;
    response
}
