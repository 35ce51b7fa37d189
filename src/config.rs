// Configuration module for quiesce
// Debounce parameters can be loaded from TOML so hosts can tune edge
// behavior and windows without recompiling.

use serde::Deserialize;

use crate::debouncer::DebounceOptions;
use crate::error::DebounceError;

/// Debounce parameters as they appear in a TOML table.
///
/// ```toml
/// wait_ms = 150
/// leading = false
/// trailing = true
/// max_wait_ms = 500
/// ```
///
/// Malformed documents (wrong types, invalid TOML) are rejected with
/// [`DebounceError::InvalidArgument`]. Well-typed but out-of-range values
/// are normalized: negative windows become 0, and a `max_wait_ms` below
/// `wait_ms` is clamped up at construction.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DebounceConfig {
    /// Quiet-period window in milliseconds.
    pub wait_ms: i64,
    /// Invoke immediately on the first call of a burst.
    pub leading: bool,
    /// Invoke once more after the burst settles. Unset falls back to the
    /// edge defaults (true, or false when only `leading` is set).
    pub trailing: Option<bool>,
    /// Ceiling in milliseconds between the first suppressed call and a
    /// forced invocation.
    pub max_wait_ms: Option<i64>,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            wait_ms: 0,
            leading: false,
            trailing: None,
            max_wait_ms: None,
        }
    }
}

impl DebounceConfig {
    /// Parse a config from a TOML document. Unrecognized keys are ignored.
    pub fn from_toml(contents: &str) -> Result<Self, DebounceError> {
        toml::from_str(contents).map_err(|e| DebounceError::InvalidArgument(e.to_string()))
    }

    /// The normalized wait window.
    pub fn wait(&self) -> u64 {
        if self.wait_ms < 0 {
            log::warn!("negative wait_ms {} normalized to 0", self.wait_ms);
            return 0;
        }
        self.wait_ms as u64
    }

    /// The normalized edge options.
    pub fn options(&self) -> DebounceOptions {
        let mut options = DebounceOptions::new().leading(self.leading);
        if let Some(trailing) = self.trailing {
            options = options.trailing(trailing);
        }
        if let Some(max_wait_ms) = self.max_wait_ms {
            let max_wait = if max_wait_ms < 0 {
                log::warn!("negative max_wait_ms {max_wait_ms} normalized to 0");
                0
            } else {
                max_wait_ms as u64
            };
            options = options.max_wait(max_wait);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = DebounceConfig::from_toml("").unwrap();
        assert_eq!(config, DebounceConfig::default());
        assert_eq!(config.wait(), 0);
        assert_eq!(config.options(), DebounceOptions::new());
    }

    #[test]
    fn test_full_document() {
        let config = DebounceConfig::from_toml(
            r#"
wait_ms = 150
leading = true
trailing = true
max_wait_ms = 500
"#,
        )
        .unwrap();
        assert_eq!(config.wait(), 150);
        let options = config.options();
        assert!(options.leading);
        assert_eq!(options.trailing, Some(true));
        assert_eq!(options.max_wait, Some(500));
    }

    #[test]
    fn test_unrecognized_keys_are_ignored() {
        let config = DebounceConfig::from_toml("wait_ms = 50\nfoo = \"bar\"").unwrap();
        assert_eq!(config.wait(), 50);
    }

    #[test]
    fn test_wrong_type_is_invalid_argument() {
        let err = DebounceConfig::from_toml("wait_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, DebounceError::InvalidArgument(_)));
    }

    #[test]
    fn test_negative_wait_normalized_to_zero() {
        let config = DebounceConfig::from_toml("wait_ms = -20").unwrap();
        assert_eq!(config.wait(), 0);
    }

    #[test]
    fn test_negative_max_wait_normalized() {
        let config = DebounceConfig::from_toml("wait_ms = 100\nmax_wait_ms = -1").unwrap();
        // Normalized to 0 here; Debounced::new clamps it up to the wait window.
        assert_eq!(config.options().max_wait, Some(0));
    }

    #[test]
    fn test_trailing_unset_stays_unset() {
        let config = DebounceConfig::from_toml("leading = true").unwrap();
        assert_eq!(config.options().trailing, None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_any_integer_windows_parse_and_normalize(
            wait_ms in -1000i64..=1000,
            max_wait_ms in -1000i64..=1000,
        ) {
            let doc = format!("wait_ms = {wait_ms}\nmax_wait_ms = {max_wait_ms}");
            let config = DebounceConfig::from_toml(&doc).unwrap();

            prop_assert_eq!(config.wait(), wait_ms.max(0) as u64);
            prop_assert_eq!(config.options().max_wait, Some(max_wait_ms.max(0) as u64));
        }
    }
}
