//! Decoding of signed container-image provenance attestations.
//!
//! This crate turns an already signature-verified DSSE envelope into a
//! normalized, version-agnostic attestation for policy evaluation:
//!
//! - Base64 payload extraction from the DSSE envelope
//! - Strict in-toto statement header validation (`_type`, `predicateType`)
//! - Full decoding of SLSA provenance v0.2 and v1 predicates
//! - Signer identity extraction, one record per envelope signature
//!
//! Cryptographic verification happens before this crate is called; nothing
//! here re-verifies signatures, performs I/O, or caches results.
//!
//! # Quick Start
//!
//! ```no_run
//! use assay_attestation::{decode_attestation, Attestation, DsseCarrier};
//!
//! # fn example(envelope_json: Vec<u8>) -> Result<(), assay_attestation::AttestationError> {
//! let carrier = DsseCarrier::new(envelope_json);
//! let attestation = decode_attestation(&carrier)?;
//!
//! println!("{} built by {}", attestation.predicate_type(), attestation.builder_id());
//! for signer in attestation.signatures() {
//!     println!("signed by key {:?}", signer.key_id);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Supported types
//!
//! | Statement `_type` | `predicateType` |
//! |-------------------|-----------------|
//! | `https://in-toto.io/Statement/v0.1` or `/v1` | `https://slsa.dev/provenance/v0.2` |
//! | `https://in-toto.io/Statement/v0.1` or `/v1` | `https://slsa.dev/provenance/v1` |
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `ASSAY_ATTESTATION_MAX_ENVELOPE_BYTES` | Max DSSE envelope size (default: 4 MB) |
//! | `ASSAY_ATTESTATION_MAX_PAYLOAD_BYTES` | Max decoded statement size (default: 4 MB) |
//! | `ASSAY_ATTESTATION_MAX_SIGNATURES` | Max signatures per envelope (default: 64) |
//! | `ASSAY_ATTESTATION_MAX_JSON_DEPTH` | Max statement nesting depth (default: 64) |

pub mod carrier;
pub mod decode;
pub mod envelope;
pub mod error;
pub mod limits;
mod payload;
pub mod provenance;
pub mod signature;
pub mod statement;
pub mod strict_json;

// Re-export main types
pub use carrier::{CarrierError, DsseCarrier, SignedCarrier};
pub use decode::{decode_attestation, AttestationDecoder};
pub use envelope::{DsseEnvelope, DsseSignature, PAYLOAD_TYPE_INTOTO};
pub use error::{AttestationError, AttestationResult, BoxError, ErrorKind};
pub use limits::{DecodeLimits, DecodeLimitsOverrides};
pub use provenance::{
    Attestation, Material, ProvenanceAttestation, SlsaProvenanceV02, SlsaProvenanceV1,
};
pub use signature::EntitySignature;
pub use statement::{
    DigestSet, PredicateType, Statement, StatementType, Subject, PREDICATE_SLSA_PROVENANCE_V0_2,
    PREDICATE_SLSA_PROVENANCE_V1, STATEMENT_TYPE_V0_1, STATEMENT_TYPE_V1,
};
