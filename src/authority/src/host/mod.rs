/// Host pattern module
///
/// Parses grant-table host patterns and ranks them by specificity so the
/// registry can pick the most specific grant for a connecting host.
///
/// # Examples
///
/// ```
/// use proxy_authority::host::HostPattern;
///
/// let pattern = HostPattern::new("%.example.com").unwrap();
/// assert!(pattern.matches("db1.example.com"));
/// assert!(!pattern.matches("example.org"));
/// ```

mod pattern;

#[cfg(test)]
mod tests;

pub use pattern::{HostPattern, HostPatternError, HostPatternResult, Specificity, ANY_HOST};
