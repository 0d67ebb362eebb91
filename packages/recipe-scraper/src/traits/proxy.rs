//! Outbound proxy source.

/// Supplies an upstream proxy per request.
///
/// `None` means "connect directly" and is never an error.
#[cfg_attr(test, mockall::automock)]
pub trait ProxySource: Send + Sync {
    /// Next proxy in rotation.
    fn next_proxy(&self) -> Option<String>;

    /// Exclude a proxy from rotation after a failed request.
    fn mark_failed(&self, proxy: &str);
}
