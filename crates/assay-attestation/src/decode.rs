//! Attestation decoding entry point.
//!
//! # Pipeline
//!
//! 1. Extract and base64-decode the statement from the carrier's DSSE envelope
//! 2. Validate the statement header (`_type`, `predicateType`)
//! 3. Fully decode the predicate with the matching version parser
//! 4. Derive one signer identity per envelope signature
//!
//! Each step fails with its own [`crate::ErrorKind`]. Nothing is retried and
//! nothing is defaulted.

use tracing::debug;

use crate::carrier::SignedCarrier;
use crate::error::AttestationResult;
use crate::limits::DecodeLimits;
use crate::payload::extract_payload;
use crate::provenance::{parse_predicate, ProvenanceAttestation};
use crate::signature::extract_signatures;
use crate::statement::validate_statement_shape;

/// Decoder for signed provenance attestations.
///
/// Holds no state besides its limits; one decoder can be shared across
/// threads and reused for any number of carriers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttestationDecoder {
    limits: DecodeLimits,
}

impl AttestationDecoder {
    /// Create a decoder with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with limits taken from the environment.
    ///
    /// See [`DecodeLimits::from_env`].
    pub fn from_env() -> Self {
        Self::with_limits(DecodeLimits::from_env())
    }

    pub fn with_limits(limits: DecodeLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &DecodeLimits {
        &self.limits
    }

    /// Decode one carrier into a normalized attestation.
    pub fn decode<C>(&self, carrier: &C) -> AttestationResult<ProvenanceAttestation>
    where
        C: SignedCarrier + ?Sized,
    {
        let payload = extract_payload(carrier, &self.limits)?;
        let (statement_type, predicate_type) =
            validate_statement_shape(&payload.statement, &self.limits)?;
        let decoded = parse_predicate(predicate_type, &payload.statement)?;
        let signatures = extract_signatures(carrier, &payload.envelope, &self.limits)?;

        let attestation = decoded.into_attestation(statement_type, payload.statement, signatures);

        debug!(
            %predicate_type,
            signatures = payload.envelope.signatures.len(),
            "decoded attestation"
        );
        Ok(attestation)
    }
}

/// Decode one carrier with default limits.
pub fn decode_attestation<C>(carrier: &C) -> AttestationResult<ProvenanceAttestation>
where
    C: SignedCarrier + ?Sized,
{
    AttestationDecoder::new().decode(carrier)
}
