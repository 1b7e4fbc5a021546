//! The inbound request as seen by the gate.

use http::{HeaderMap, HeaderName, HeaderValue, header};
use url::Url;

/// An inbound request, reduced to what the gate and resolvers need.
///
/// The gate only reads the path. Resolvers read headers and cookies to find
/// the credential. The optional URL lets redirects keep the request origin.
///
/// ## Example
///
/// ```rust
/// use storefront_gate::GateRequest;
///
/// let request = GateRequest::new("/dashboard")
///     .with_header(http::header::COOKIE, "next-auth.session-token=abc; theme=dark");
///
/// assert_eq!(request.path(), "/dashboard");
/// assert_eq!(request.cookie("next-auth.session-token"), Some("abc"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct GateRequest {
    path: String,
    url: Option<Url>,
    headers: HeaderMap,
}

impl GateRequest {
    /// Creates a request for a path with no headers.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), url: None, headers: HeaderMap::new() }
    }

    /// Creates a request from an absolute URL; the path is taken from it.
    pub fn from_url(url: Url) -> Self {
        Self { path: url.path().to_string(), url: Some(url), headers: HeaderMap::new() }
    }

    /// Builds a request from an `http::Request`, borrowing nothing from the body.
    ///
    /// The absolute URL is taken from the request URI when it carries an
    /// authority, otherwise rebuilt from the `Host` header and
    /// `X-Forwarded-Proto` (defaulting to `http`).
    pub fn from_http<B>(request: &http::Request<B>) -> Self {
        let uri = request.uri();
        let headers = request.headers().clone();

        let url = if uri.authority().is_some() {
            Url::parse(&uri.to_string()).ok()
        } else {
            let host = headers.get(header::HOST).and_then(|v| v.to_str().ok());
            let scheme = headers
                .get("x-forwarded-proto")
                .and_then(|v| v.to_str().ok())
                .filter(|p| matches!(*p, "http" | "https"))
                .unwrap_or("http");
            let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
            host.and_then(|host| Url::parse(&format!("{scheme}://{host}{path_and_query}")).ok())
        };

        Self { path: uri.path().to_string(), url, headers }
    }

    /// Adds a header. Values that are not valid header values are dropped.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: impl AsRef<str>) -> Self {
        if let Ok(value) = HeaderValue::from_str(value.as_ref()) {
            self.headers.append(name, value);
        }
        self
    }

    /// Sets the absolute request URL without changing the path.
    #[must_use]
    pub fn with_url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    /// The raw request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The absolute request URL, if known.
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// The request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The bearer token from the `Authorization` header, if any.
    ///
    /// Returns `None` when the header is missing or is not a bearer
    /// credential; an empty bearer value also yields `None`.
    pub fn bearer_token(&self) -> Option<&str> {
        let authz = self.headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
        let token = authz.strip_prefix("Bearer ").or_else(|| authz.strip_prefix("bearer "))?;
        let token = token.trim();
        if token.is_empty() { None } else { Some(token) }
    }

    /// Looks up a cookie by name across all `Cookie` headers.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
    }
}
