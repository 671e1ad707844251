//! Statement payload extraction from the carrier.
//!
//! Locates the DSSE envelope, checks its payload type, and removes the base64
//! transport encoding. The statement itself is not parsed here.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tracing::debug;

use crate::carrier::SignedCarrier;
use crate::envelope::{DsseEnvelope, PAYLOAD_TYPE_INTOTO};
use crate::error::{AttestationError, AttestationResult};
use crate::limits::DecodeLimits;

/// Envelope plus the decoded statement bytes it carried.
#[derive(Debug)]
pub(crate) struct ExtractedPayload {
    pub(crate) envelope: DsseEnvelope,
    pub(crate) statement: Vec<u8>,
}

pub(crate) fn extract_payload<C>(
    carrier: &C,
    limits: &DecodeLimits,
) -> AttestationResult<ExtractedPayload>
where
    C: SignedCarrier + ?Sized,
{
    let raw = carrier
        .envelope()
        .map_err(|e| AttestationError::payload_from_carrier("carrier has no payload", e))?;

    if raw.is_empty() {
        return Err(AttestationError::payload("carrier payload is empty"));
    }
    if raw.len() > limits.max_envelope_bytes {
        return Err(AttestationError::payload(format!(
            "envelope size {} exceeds maximum {}",
            raw.len(),
            limits.max_envelope_bytes
        )));
    }

    let envelope: DsseEnvelope = serde_json::from_slice(&raw)
        .map_err(|e| AttestationError::payload_caused_by("invalid DSSE envelope", e))?;

    if envelope.payload_type != PAYLOAD_TYPE_INTOTO {
        return Err(AttestationError::payload(format!(
            "payload type mismatch: expected {}, got {}",
            PAYLOAD_TYPE_INTOTO, envelope.payload_type
        )));
    }

    // base64 expands 3 bytes to 4; refuse before decoding anything oversized.
    if envelope.payload.len() / 4 * 3 > limits.max_payload_bytes.saturating_add(2) {
        return Err(payload_too_large(limits));
    }

    let statement = BASE64
        .decode(envelope.payload.as_bytes())
        .map_err(|e| AttestationError::payload_caused_by("invalid base64 payload", e))?;

    if statement.is_empty() {
        return Err(AttestationError::payload("envelope payload is empty"));
    }
    if statement.len() > limits.max_payload_bytes {
        return Err(payload_too_large(limits));
    }

    debug!(
        envelope_bytes = raw.len(),
        statement_bytes = statement.len(),
        signatures = envelope.signatures.len(),
        "extracted statement payload"
    );

    Ok(ExtractedPayload {
        envelope,
        statement,
    })
}

fn payload_too_large(limits: &DecodeLimits) -> AttestationError {
    AttestationError::payload(format!(
        "payload exceeds maximum {} bytes",
        limits.max_payload_bytes
    ))
}
