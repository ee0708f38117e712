//! Epoch-millisecond timestamps and URL cache-busting

use chrono::Utc;

/// Current time as milliseconds since the Unix epoch
#[inline]
pub fn epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Appends a cache-busting stamp to a URL.
///
/// Uses `?` when the URL has no query string yet, `&` otherwise, so the
/// result stays a valid URL either way.
pub fn cache_bust(url: &str, stamp: i64) -> String {
    if url.contains('?') {
        format!("{url}&{stamp}")
    } else {
        format!("{url}?{stamp}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_bust_plain_url() {
        assert_eq!(
            cache_bust("https://cdn.example/logo.png", 1700000000000),
            "https://cdn.example/logo.png?1700000000000"
        );
    }

    #[test]
    fn test_cache_bust_existing_query() {
        assert_eq!(
            cache_bust("https://cdn.example/logo.png?v=2", 1700000000000),
            "https://cdn.example/logo.png?v=2&1700000000000"
        );
    }

    #[test]
    fn test_epoch_ms_monotonic_enough() {
        let a = epoch_ms();
        let b = epoch_ms();
        assert!(b >= a);
    }
}
