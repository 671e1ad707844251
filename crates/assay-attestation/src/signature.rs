//! Signer identities bound to an attestation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::carrier::SignedCarrier;
use crate::envelope::DsseEnvelope;
use crate::error::{AttestationError, AttestationResult};
use crate::limits::DecodeLimits;

/// Identity record for one signature on the carrier.
///
/// Contents are produced by the carrier's signing method and passed through
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySignature {
    /// Key ID from the DSSE signature (empty for keyless signing).
    #[serde(rename = "keyid", default)]
    pub key_id: String,

    /// Base64-encoded signature value.
    #[serde(default)]
    pub signature: String,

    /// Signing certificate (PEM), if the signature is certificate based.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<String>,

    /// Certificate chain (PEM).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chain: Vec<String>,

    /// Free-form identity metadata (e.g. certificate subject and issuer).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

/// Derive one [`EntitySignature`] per envelope signature, in envelope order.
///
/// A single failing derivation fails the whole extraction.
pub(crate) fn extract_signatures<C>(
    carrier: &C,
    envelope: &DsseEnvelope,
    limits: &DecodeLimits,
) -> AttestationResult<Vec<EntitySignature>>
where
    C: SignedCarrier + ?Sized,
{
    let count = envelope.signatures.len();
    if count > limits.max_signatures {
        return Err(AttestationError::signature(format!(
            "{} signatures exceeds maximum {}",
            count, limits.max_signatures
        )));
    }

    let signatures = envelope
        .signatures
        .iter()
        .enumerate()
        .map(|(index, sig)| {
            carrier.entity_signature(sig).map_err(|e| {
                AttestationError::signature_from_carrier(
                    format!("signature #{} (keyid {:?})", index, sig.key_id),
                    e,
                )
            })
        })
        .collect::<AttestationResult<Vec<_>>>()?;

    debug!(count, "extracted entity signatures");
    Ok(signatures)
}
