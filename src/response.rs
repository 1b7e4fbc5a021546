//! Rendering decisions as HTTP responses.
//!
//! Framework-agnostic: any host built on the `http` crate can turn a
//! [`Decision`] into a `307 Temporary Redirect`. The axum middleware uses the
//! same conversion.

use http::{HeaderValue, Response, StatusCode, header};
use url::Url;

use crate::{Decision, RedirectTarget, Verdict};

/// Status used for every gate redirect.
///
/// 307 keeps the request method, so a rejected `POST` is not silently
/// replayed as a `GET` against the sign-in page.
pub const REDIRECT_STATUS: StatusCode = StatusCode::TEMPORARY_REDIRECT;

impl Decision {
    /// The `Location` value for a redirect, or `None` for `Allow`.
    ///
    /// With a base URL the target is joined onto the request origin; without
    /// one the site-relative path is used as is.
    ///
    /// ```rust
    /// use storefront_gate::{Decision, RedirectTarget};
    /// use url::Url;
    ///
    /// let decision = Decision::Redirect(RedirectTarget::new("/auth/sign-in").unwrap());
    /// let base = Url::parse("https://shop.example/dashboard").unwrap();
    ///
    /// assert_eq!(decision.location(Some(&base)).unwrap(), "https://shop.example/auth/sign-in");
    /// assert_eq!(decision.location(None).unwrap(), "/auth/sign-in");
    /// assert!(Decision::Allow.location(None).is_none());
    /// ```
    pub fn location(&self, base: Option<&Url>) -> Option<String> {
        self.redirect_target().map(|target| location_for(target, base))
    }

    /// Renders a redirect as an empty-bodied 307 response.
    ///
    /// Returns `None` for `Allow`; the host passes the request on instead.
    ///
    /// ```rust
    /// use storefront_gate::{Decision, RedirectTarget};
    ///
    /// let decision = Decision::Redirect(RedirectTarget::new("/dashboard").unwrap());
    /// let response: http::Response<String> = decision.into_response(None).unwrap();
    ///
    /// assert_eq!(response.status(), http::StatusCode::TEMPORARY_REDIRECT);
    /// assert_eq!(response.headers()[http::header::LOCATION], "/dashboard");
    /// ```
    pub fn into_response<B: Default>(self, base: Option<&Url>) -> Option<Response<B>> {
        let location = self.location(base)?;
        let mut response = Response::new(B::default());
        *response.status_mut() = REDIRECT_STATUS;
        response.headers_mut().insert(header::LOCATION, location_header(&location));
        response.headers_mut().insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
        Some(response)
    }
}

impl Verdict {
    /// Renders the verdict's decision; see [`Decision::into_response`].
    pub fn into_response<B: Default>(self, base: Option<&Url>) -> Option<Response<B>> {
        self.into_decision().into_response(base)
    }
}

fn location_for(target: &RedirectTarget, base: Option<&Url>) -> String {
    match base.map(|base| target.resolve(base)) {
        Some(Ok(url)) => url.into(),
        Some(Err(err)) => {
            tracing::debug!(target = %target, error = %err, "falling back to relative redirect");
            target.as_str().to_string()
        },
        None => target.as_str().to_string(),
    }
}

// Targets hold no control characters, so raw bytes always form a valid value.
fn location_header(location: &str) -> HeaderValue {
    HeaderValue::from_bytes(location.as_bytes()).unwrap_or_else(|_| HeaderValue::from_static("/"))
}
