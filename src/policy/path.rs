//! Request path normalization.

/// Normalizes a request path before classification.
///
/// - Query string and fragment are dropped
/// - Repeated slashes collapse
/// - `.` segments are removed and `..` pops one segment, never above root
///   (percent-encoded dots such as `%2e%2E` count as dots)
/// - A trailing slash is removed, except on the root
/// - A relative path is treated as rooted
///
/// ```rust
/// use storefront_gate::policy::normalize_path;
///
/// assert_eq!(normalize_path("/dashboard/"), "/dashboard");
/// assert_eq!(normalize_path("/auth/sign-in/../../admin/users"), "/admin/users");
/// assert_eq!(normalize_path("//admin//users?x=1"), "/admin/users");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(raw: &str) -> String {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());

    let mut segments: Vec<&str> = Vec::new();
    for segment in raw[..end].split('/') {
        if segment.is_empty() || is_single_dot(segment) {
            continue;
        }
        if is_double_dot(segment) {
            segments.pop();
            continue;
        }
        segments.push(segment);
    }

    if segments.is_empty() {
        return "/".to_string();
    }

    let mut normalized = String::with_capacity(end + 1);
    for segment in segments {
        normalized.push('/');
        normalized.push_str(segment);
    }
    normalized
}

fn is_single_dot(segment: &str) -> bool {
    segment == "." || segment.eq_ignore_ascii_case("%2e")
}

fn is_double_dot(segment: &str) -> bool {
    matches!(segment.to_ascii_lowercase().as_str(), ".." | ".%2e" | "%2e." | "%2e%2e")
}
