//! Signed carrier capability.
//!
//! A carrier is whatever the upstream signature-verification step hands us:
//! the DSSE envelope bytes it already checked, plus a way to describe who
//! produced each signature on that envelope. This crate never looks behind
//! the trait, so registry layers, bundles and test fixtures all plug in the
//! same way.

use std::borrow::Cow;
use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::envelope::DsseSignature;
use crate::error::BoxError;
use crate::signature::EntitySignature;

/// Errors reported by carrier implementations.
#[derive(Debug, thiserror::Error)]
pub enum CarrierError {
    /// The carrier could not produce what was asked for right now, e.g. the
    /// registry layer holding it was unreachable. Re-fetching may help.
    #[error("carrier unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The carrier's content is unusable. Permanent for these bytes.
    #[error("invalid carrier content: {message}")]
    Invalid { message: String },
}

impl CarrierError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
            source: None,
        }
    }

    pub fn unavailable_caused_by(
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Unavailable {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Returns true if asking again could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// An already signature-verified container of a DSSE envelope.
pub trait SignedCarrier {
    /// Raw transport bytes of the DSSE envelope (JSON).
    fn envelope(&self) -> Result<Cow<'_, [u8]>, CarrierError>;

    /// Derive the signer identity for one signature of the envelope.
    ///
    /// Called once per entry of the envelope's `signatures`, in order.
    fn entity_signature(&self, signature: &DsseSignature)
        -> Result<EntitySignature, CarrierError>;
}

impl<C: SignedCarrier + ?Sized> SignedCarrier for &C {
    fn envelope(&self) -> Result<Cow<'_, [u8]>, CarrierError> {
        (**self).envelope()
    }

    fn entity_signature(
        &self,
        signature: &DsseSignature,
    ) -> Result<EntitySignature, CarrierError> {
        (**self).entity_signature(signature)
    }
}

/// Carrier for a cosign-style attestation layer.
///
/// Holds the envelope bytes together with the signing material attached to
/// the layer: an optional leaf certificate (PEM), its chain, and free-form
/// metadata such as Fulcio identity claims. Every envelope signature shares
/// that material and contributes its own `keyid` and `sig`.
#[derive(Debug, Clone, Default)]
pub struct DsseCarrier {
    envelope: Vec<u8>,
    certificate: Option<String>,
    chain: Vec<String>,
    metadata: BTreeMap<String, String>,
}

impl DsseCarrier {
    /// Create a carrier from raw envelope bytes.
    pub fn new(envelope: impl Into<Vec<u8>>) -> Self {
        Self {
            envelope: envelope.into(),
            ..Self::default()
        }
    }

    /// Set the signing certificate (PEM).
    pub fn with_certificate(mut self, pem: impl Into<String>) -> Self {
        self.certificate = Some(pem.into());
        self
    }

    /// Set the certificate chain (PEM, leaf-most first).
    pub fn with_chain(mut self, chain: Vec<String>) -> Self {
        self.chain = chain;
        self
    }

    /// Add one metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

impl SignedCarrier for DsseCarrier {
    fn envelope(&self) -> Result<Cow<'_, [u8]>, CarrierError> {
        Ok(Cow::Borrowed(&self.envelope))
    }

    fn entity_signature(
        &self,
        signature: &DsseSignature,
    ) -> Result<EntitySignature, CarrierError> {
        if signature.signature.is_empty() {
            return Err(CarrierError::invalid("empty signature value"));
        }
        BASE64
            .decode(&signature.signature)
            .map_err(|e| CarrierError::invalid(format!("invalid base64 signature: {}", e)))?;

        Ok(EntitySignature {
            key_id: signature.key_id.clone(),
            signature: signature.signature.clone(),
            certificate: self.certificate.clone(),
            chain: self.chain.clone(),
            metadata: self.metadata.clone(),
        })
    }
}
