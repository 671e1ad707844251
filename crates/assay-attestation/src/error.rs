//! Error types for attestation decoding.

use std::fmt;

use crate::carrier::CarrierError;
use crate::statement::PredicateType;

/// Boxed low-level cause carried by some error variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Attestation decoding errors.
///
/// The set is closed: every failure of [`crate::decode_attestation`] is one of
/// these kinds, and none of them is ever downgraded into a partial attestation.
#[derive(Debug, thiserror::Error)]
pub enum AttestationError {
    /// Carrier payload missing, oversized, or transport decoding failed.
    ///
    /// `retryable` is set only when the carrier itself reported a transient
    /// failure; bad envelope content is permanent.
    #[error("payload extraction failed: {reason}")]
    PayloadExtractionFailed {
        reason: String,
        retryable: bool,
        #[source]
        source: Option<BoxError>,
    },

    /// Payload is not structured data in the minimal statement shape.
    #[error("malformed statement: {reason}")]
    MalformedStatement {
        reason: String,
        #[source]
        source: Option<BoxError>,
    },

    /// `_type` present but not a recognized in-toto statement type.
    #[error("unexpected statement type: {found:?}")]
    UnexpectedStatementType { found: String },

    /// `predicateType` present but not in the supported set.
    #[error("unexpected predicate type: {found:?}")]
    UnexpectedPredicateType { found: String },

    /// Statement shape was valid, but the version-specific predicate was not.
    #[error("failed to decode {predicate_type} predicate: {source}")]
    PredicateDecodeFailed {
        predicate_type: PredicateType,
        #[source]
        source: serde_json::Error,
    },

    /// A signer identity could not be derived from one of the signatures.
    #[error("signature extraction failed: {reason}")]
    SignatureExtractionFailed {
        reason: String,
        retryable: bool,
        #[source]
        source: Option<BoxError>,
    },
}

/// Discriminant of [`AttestationError`], with a stable diagnostic code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    PayloadExtractionFailed,
    MalformedStatement,
    UnexpectedStatementType,
    UnexpectedPredicateType,
    PredicateDecodeFailed,
    SignatureExtractionFailed,
}

impl ErrorKind {
    /// Stable diagnostic code (`AT001`..`AT006`).
    pub fn code(self) -> &'static str {
        match self {
            Self::PayloadExtractionFailed => "AT001",
            Self::MalformedStatement => "AT002",
            Self::UnexpectedStatementType => "AT003",
            Self::UnexpectedPredicateType => "AT004",
            Self::SignatureExtractionFailed => "AT005",
            Self::PredicateDecodeFailed => "AT006",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl AttestationError {
    pub(crate) fn payload(reason: impl Into<String>) -> Self {
        Self::PayloadExtractionFailed {
            reason: reason.into(),
            retryable: false,
            source: None,
        }
    }

    pub(crate) fn payload_caused_by(
        reason: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::PayloadExtractionFailed {
            reason: reason.into(),
            retryable: false,
            source: Some(source.into()),
        }
    }

    pub(crate) fn payload_from_carrier(reason: impl Into<String>, source: CarrierError) -> Self {
        Self::PayloadExtractionFailed {
            reason: reason.into(),
            retryable: source.is_transient(),
            source: Some(source.into()),
        }
    }

    pub(crate) fn malformed_caused_by(
        reason: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::MalformedStatement {
            reason: reason.into(),
            source: Some(source.into()),
        }
    }

    pub(crate) fn signature(reason: impl Into<String>) -> Self {
        Self::SignatureExtractionFailed {
            reason: reason.into(),
            retryable: false,
            source: None,
        }
    }

    pub(crate) fn signature_from_carrier(reason: impl Into<String>, source: CarrierError) -> Self {
        Self::SignatureExtractionFailed {
            reason: reason.into(),
            retryable: source.is_transient(),
            source: Some(source.into()),
        }
    }

    /// The classified kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PayloadExtractionFailed { .. } => ErrorKind::PayloadExtractionFailed,
            Self::MalformedStatement { .. } => ErrorKind::MalformedStatement,
            Self::UnexpectedStatementType { .. } => ErrorKind::UnexpectedStatementType,
            Self::UnexpectedPredicateType { .. } => ErrorKind::UnexpectedPredicateType,
            Self::PredicateDecodeFailed { .. } => ErrorKind::PredicateDecodeFailed,
            Self::SignatureExtractionFailed { .. } => ErrorKind::SignatureExtractionFailed,
        }
    }

    /// Stable diagnostic code of this error's kind.
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// The offending `_type` / `predicateType` value, when one was read.
    pub fn found(&self) -> Option<&str> {
        match self {
            Self::UnexpectedStatementType { found } | Self::UnexpectedPredicateType { found } => {
                Some(found.as_str())
            }
            _ => None,
        }
    }

    /// Whether re-fetching the carrier could change the outcome.
    ///
    /// True only when the carrier reported itself unavailable. Content
    /// failures are permanent for the given bytes.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::PayloadExtractionFailed { retryable, .. }
            | Self::SignatureExtractionFailed { retryable, .. } => *retryable,
            _ => false,
        }
    }
}

/// Result type for attestation decoding.
pub type AttestationResult<T> = Result<T, AttestationError>;
