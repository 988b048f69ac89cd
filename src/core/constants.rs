//! Shared constants
//!
//! Granularity labels accepted by the market endpoint.

/// Candle granularity handling
pub mod granularity {
    /// Granularity labels and their duration in seconds
    ///
    /// The set matches the bucket sizes the Deriv tick-history API accepts
    /// for candle-style requests.
    pub const SUPPORTED: &[(&str, u32)] = &[
        ("1m", 60),
        ("2m", 120),
        ("3m", 180),
        ("5m", 300),
        ("10m", 600),
        ("15m", 900),
        ("30m", 1800),
        ("1h", 3600),
        ("2h", 7200),
        ("4h", 14400),
        ("8h", 28800),
        ("1d", 86400),
    ];

    /// Resolve a granularity label ("5m", "1h", ...) to seconds
    pub fn seconds(label: &str) -> Option<u32> {
        SUPPORTED
            .iter()
            .find(|(name, _)| *name == label)
            .map(|(_, secs)| *secs)
    }

    /// All supported labels, for error messages
    pub fn labels() -> Vec<&'static str> {
        SUPPORTED.iter().map(|(name, _)| *name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::granularity;

    #[test]
    fn test_known_granularities() {
        assert_eq!(granularity::seconds("1m"), Some(60));
        assert_eq!(granularity::seconds("1h"), Some(3600));
        assert_eq!(granularity::seconds("1d"), Some(86400));
    }

    #[test]
    fn test_unknown_granularity() {
        assert_eq!(granularity::seconds("7m"), None);
        assert_eq!(granularity::seconds(""), None);
    }
}
