//! in-toto statement header and type routing.
//!
//! See: <https://github.com/in-toto/attestation/blob/main/spec/v1/statement.md>

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, warn};

use crate::error::{AttestationError, AttestationResult};
use crate::limits::DecodeLimits;
use crate::strict_json::validate_strict;

/// The in-toto Statement v0.1 type identifier.
pub const STATEMENT_TYPE_V0_1: &str = "https://in-toto.io/Statement/v0.1";

/// The in-toto Statement v1 type identifier.
pub const STATEMENT_TYPE_V1: &str = "https://in-toto.io/Statement/v1";

/// SLSA provenance v0.2 predicate type.
pub const PREDICATE_SLSA_PROVENANCE_V0_2: &str = "https://slsa.dev/provenance/v0.2";

/// SLSA provenance v1 predicate type.
pub const PREDICATE_SLSA_PROVENANCE_V1: &str = "https://slsa.dev/provenance/v1";

/// Digest algorithm name to hex-encoded value.
pub type DigestSet = BTreeMap<String, String>;

/// Recognized in-toto statement types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementType {
    V0_1,
    V1,
}

impl StatementType {
    pub const ALL: [StatementType; 2] = [Self::V0_1, Self::V1];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::V0_1 => STATEMENT_TYPE_V0_1,
            Self::V1 => STATEMENT_TYPE_V1,
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn from_uri(uri: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == uri)
    }
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StatementType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Predicate types this crate can decode.
///
/// Adding a provenance version means adding a variant here and a parser in
/// [`crate::provenance`]; the dispatch match is exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateType {
    SlsaProvenanceV0_2,
    SlsaProvenanceV1,
}

impl PredicateType {
    pub const ALL: [PredicateType; 2] = [Self::SlsaProvenanceV0_2, Self::SlsaProvenanceV1];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SlsaProvenanceV0_2 => PREDICATE_SLSA_PROVENANCE_V0_2,
            Self::SlsaProvenanceV1 => PREDICATE_SLSA_PROVENANCE_V1,
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn from_uri(uri: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == uri)
    }
}

impl fmt::Display for PredicateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PredicateType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A subject of an in-toto statement (an artifact being attested to).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub digest: DigestSet,
}

/// Full in-toto statement with a typed predicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement<P> {
    #[serde(rename = "_type", alias = "type")]
    pub statement_type: String,

    #[serde(rename = "predicateType")]
    pub predicate_type: String,

    #[serde(default)]
    pub subject: Vec<Subject>,

    pub predicate: P,
}

/// The minimal statement shape used for routing. The predicate is not read.
#[derive(Debug, Deserialize)]
struct StatementHeader {
    #[serde(rename = "_type", alias = "type")]
    statement_type: String,

    #[serde(rename = "predicateType")]
    predicate_type: String,
}

/// Check the statement header and resolve the predicate parser to use.
///
/// Checks run in order: strict JSON and header shape, then `_type`, then
/// `predicateType`.
pub(crate) fn validate_statement_shape(
    bytes: &[u8],
    limits: &DecodeLimits,
) -> AttestationResult<(StatementType, PredicateType)> {
    validate_strict(bytes, limits.max_json_depth)
        .map_err(|e| AttestationError::malformed_caused_by("statement is not strict JSON", e))?;

    let header: StatementHeader = serde_json::from_slice(bytes).map_err(|e| {
        AttestationError::malformed_caused_by("statement does not match the in-toto shape", e)
    })?;

    let Some(statement_type) = StatementType::from_uri(&header.statement_type) else {
        warn!(found = %header.statement_type, "rejecting unexpected statement type");
        return Err(AttestationError::UnexpectedStatementType {
            found: header.statement_type,
        });
    };

    let Some(predicate_type) = PredicateType::from_uri(&header.predicate_type) else {
        warn!(found = %header.predicate_type, "rejecting unexpected predicate type");
        return Err(AttestationError::UnexpectedPredicateType {
            found: header.predicate_type,
        });
    };

    debug!(%statement_type, %predicate_type, "statement header validated");
    Ok((statement_type, predicate_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn validate(doc: &str) -> AttestationResult<(StatementType, PredicateType)> {
        validate_statement_shape(doc.as_bytes(), &DecodeLimits::default())
    }

    #[test]
    fn test_constants_match_upstream() {
        assert_eq!(STATEMENT_TYPE_V0_1, "https://in-toto.io/Statement/v0.1");
        assert_eq!(STATEMENT_TYPE_V1, "https://in-toto.io/Statement/v1");
        assert_eq!(
            PREDICATE_SLSA_PROVENANCE_V0_2,
            "https://slsa.dev/provenance/v0.2"
        );
        assert_eq!(PREDICATE_SLSA_PROVENANCE_V1, "https://slsa.dev/provenance/v1");
    }

    #[test]
    fn test_routes_supported_combinations() {
        let ok = validate(
            r#"{"_type":"https://in-toto.io/Statement/v0.1","predicateType":"https://slsa.dev/provenance/v0.2","predicate":{}}"#,
        )
        .unwrap();
        assert_eq!(ok, (StatementType::V0_1, PredicateType::SlsaProvenanceV0_2));

        let ok = validate(
            r#"{"type":"https://in-toto.io/Statement/v1","predicateType":"https://slsa.dev/provenance/v1"}"#,
        )
        .unwrap();
        assert_eq!(ok, (StatementType::V1, PredicateType::SlsaProvenanceV1));
    }

    #[test]
    fn test_predicate_body_is_not_read() {
        // The predicate is garbage for every schema, but routing only needs the header.
        let ok = validate(
            r#"{"_type":"https://in-toto.io/Statement/v0.1","predicateType":"https://slsa.dev/provenance/v0.2","predicate":42}"#,
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn test_unexpected_statement_type_checked_before_predicate() {
        let err = validate(
            r#"{"_type":"https://in-toto.io/Statement/v0.2","predicateType":"https://slsa.dev/provenance/v9.9"}"#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedStatementType);
        assert_eq!(err.found(), Some("https://in-toto.io/Statement/v0.2"));
    }

    #[test]
    fn test_unexpected_predicate_type_carries_value() {
        let err = validate(
            r#"{"_type":"https://in-toto.io/Statement/v0.1","predicateType":"https://slsa.dev/provenance/v9.9"}"#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedPredicateType);
        assert_eq!(err.found(), Some("https://slsa.dev/provenance/v9.9"));
    }

    #[test]
    fn test_type_lookup_is_exact() {
        assert_eq!(
            PredicateType::from_uri("https://slsa.dev/provenance/V0.2"),
            None
        );
        assert_eq!(
            PredicateType::from_uri("https://slsa.dev/provenance/v0.2 "),
            None
        );
        assert_eq!(StatementType::from_uri(""), None);
    }

    #[test]
    fn test_malformed_shapes() {
        for doc in [
            r#"{"_type":"https://in-toto.io/Statement/v0.1""#,
            r#"[]"#,
            r#"{"predicateType":"https://slsa.dev/provenance/v0.2"}"#,
            r#"{"_type":7,"predicateType":"https://slsa.dev/provenance/v0.2"}"#,
            r#"{"_type":"https://in-toto.io/Statement/v0.1","type":"https://in-toto.io/Statement/v0.1","predicateType":"https://slsa.dev/provenance/v0.2"}"#,
            r#"{"_type":"https://in-toto.io/Statement/v0.1","predicateType":"https://slsa.dev/provenance/v0.2","predicateType":"https://slsa.dev/provenance/v0.2"}"#,
            "",
        ] {
            let err = validate(doc).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedStatement, "doc: {doc}");
        }
    }
}
