//! Resource limits for attestation decoding.
//!
//! Carriers arrive from registries we do not control, so every size the
//! decoder touches is bounded before any allocation proportional to it.

use serde::Deserialize;

/// Resource limits for decoding one carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    pub max_envelope_bytes: usize,
    pub max_payload_bytes: usize,
    pub max_signatures: usize,
    pub max_json_depth: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_envelope_bytes: 4 * 1024 * 1024, // 4 MB
            max_payload_bytes: 4 * 1024 * 1024,  // 4 MB
            max_signatures: 64,
            max_json_depth: 64,
        }
    }
}

/// Partial overrides for `DecodeLimits`. Used for config JSON parsing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecodeLimitsOverrides {
    pub max_envelope_bytes: Option<usize>,
    pub max_payload_bytes: Option<usize>,
    pub max_signatures: Option<usize>,
    pub max_json_depth: Option<usize>,
}

impl DecodeLimits {
    /// Apply overrides onto these limits. Only `Some` values override.
    pub fn apply(self, overrides: DecodeLimitsOverrides) -> Self {
        Self {
            max_envelope_bytes: overrides
                .max_envelope_bytes
                .unwrap_or(self.max_envelope_bytes),
            max_payload_bytes: overrides
                .max_payload_bytes
                .unwrap_or(self.max_payload_bytes),
            max_signatures: overrides.max_signatures.unwrap_or(self.max_signatures),
            max_json_depth: overrides.max_json_depth.unwrap_or(self.max_json_depth),
        }
    }

    /// Create limits from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `ASSAY_ATTESTATION_MAX_ENVELOPE_BYTES` | Max DSSE envelope size |
    /// | `ASSAY_ATTESTATION_MAX_PAYLOAD_BYTES` | Max decoded statement size |
    /// | `ASSAY_ATTESTATION_MAX_SIGNATURES` | Max signatures per envelope |
    /// | `ASSAY_ATTESTATION_MAX_JSON_DEPTH` | Max statement nesting depth |
    ///
    /// Unset or unparseable values keep the defaults.
    pub fn from_env() -> Self {
        fn var(name: &str) -> Option<usize> {
            std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
        }

        Self::default().apply(DecodeLimitsOverrides {
            max_envelope_bytes: var("ASSAY_ATTESTATION_MAX_ENVELOPE_BYTES"),
            max_payload_bytes: var("ASSAY_ATTESTATION_MAX_PAYLOAD_BYTES"),
            max_signatures: var("ASSAY_ATTESTATION_MAX_SIGNATURES"),
            max_json_depth: var("ASSAY_ATTESTATION_MAX_JSON_DEPTH"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_overrides_apply_only_some() {
        let overrides: DecodeLimitsOverrides =
            serde_json::from_str(r#"{"max_signatures": 2}"#).unwrap();
        let limits = DecodeLimits::default().apply(overrides);
        assert_eq!(limits.max_signatures, 2);
        assert_eq!(
            limits.max_payload_bytes,
            DecodeLimits::default().max_payload_bytes
        );
    }

    #[test]
    fn test_overrides_reject_unknown_fields() {
        let result = serde_json::from_str::<DecodeLimitsOverrides>(r#"{"max_sigs": 2}"#);
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var("ASSAY_ATTESTATION_MAX_SIGNATURES", "3");
        std::env::set_var("ASSAY_ATTESTATION_MAX_JSON_DEPTH", "not-a-number");
        let limits = DecodeLimits::from_env();
        std::env::remove_var("ASSAY_ATTESTATION_MAX_SIGNATURES");
        std::env::remove_var("ASSAY_ATTESTATION_MAX_JSON_DEPTH");

        assert_eq!(limits.max_signatures, 3);
        assert_eq!(limits.max_json_depth, DecodeLimits::default().max_json_depth);
    }
}
