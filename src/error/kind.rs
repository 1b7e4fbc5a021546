//! Error kind enumeration for categorizing gate setup errors.

/// Categorization of gate errors.
///
/// This enum provides a stable interface for matching on error types. None of
/// these are produced while evaluating a request; they describe why a gate or
/// resolver could not be built.
///
/// | ErrorKind       | Typical cause                                  |
/// |-----------------|------------------------------------------------|
/// | `Configuration` | Invalid policy table, bad redirect target      |
/// | `Io`            | Config file could not be read                  |
/// | `Unauthorized`  | Signing secret missing or too short            |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Configuration error (invalid path list, empty role set, unsafe redirect).
    ///
    /// **Fix the configuration.**
    #[error("configuration error")]
    Configuration,

    /// Reading configuration from disk failed.
    #[error("io error")]
    Io,

    /// Credential material (the session signing secret) is unusable.
    #[error("unauthorized")]
    Unauthorized,
}

impl ErrorKind {
    /// Returns `true` if the error is caused by operator-supplied configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use storefront_gate::ErrorKind;
    ///
    /// assert!(ErrorKind::Configuration.is_configuration());
    /// assert!(ErrorKind::Io.is_configuration());
    /// assert!(!ErrorKind::Unauthorized.is_configuration());
    /// ```
    #[inline]
    pub fn is_configuration(&self) -> bool {
        matches!(self, ErrorKind::Configuration | ErrorKind::Io)
    }
}
