//! Normalized provenance attestations.
//!
//! Each supported SLSA provenance version has its own module with the full
//! schema and a concrete attestation type. Policy code works against the
//! [`Attestation`] trait or the closed [`ProvenanceAttestation`] enum and
//! never needs the version-specific structures.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::AttestationResult;
use crate::signature::EntitySignature;
use crate::statement::{DigestSet, PredicateType, Statement, StatementType, Subject};

pub mod v02;
pub mod v1;

pub use v02::SlsaProvenanceV02;
pub use v1::SlsaProvenanceV1;

/// Read-only view shared by every decoded attestation.
pub trait Attestation {
    /// in-toto statement type the payload declared.
    fn statement_type(&self) -> &'static str;

    /// Predicate type the statement was decoded as.
    fn predicate_type(&self) -> &'static str;

    /// The statement exactly as it was signed.
    ///
    /// Use these bytes for hashing and auditing, never a re-serialization.
    fn statement_bytes(&self) -> &[u8];

    /// Signer identities, in carrier order.
    fn signatures(&self) -> &[EntitySignature];

    fn subjects(&self) -> &[Subject];

    fn builder_id(&self) -> &str;

    fn build_type(&self) -> &str;

    /// Build inputs, normalized across predicate versions.
    fn materials(&self) -> Vec<Material>;
}

/// A build input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub uri: String,
    pub digest: DigestSet,
}

/// A decoded provenance attestation of any supported version.
#[derive(Debug, Clone)]
pub enum ProvenanceAttestation {
    SlsaV02(SlsaProvenanceV02),
    SlsaV1(SlsaProvenanceV1),
}

impl ProvenanceAttestation {
    /// The predicate version this value was decoded as.
    pub fn kind(&self) -> PredicateType {
        match self {
            Self::SlsaV02(_) => PredicateType::SlsaProvenanceV0_2,
            Self::SlsaV1(_) => PredicateType::SlsaProvenanceV1,
        }
    }

    fn inner(&self) -> &dyn Attestation {
        match self {
            Self::SlsaV02(a) => a,
            Self::SlsaV1(a) => a,
        }
    }
}

impl Attestation for ProvenanceAttestation {
    fn statement_type(&self) -> &'static str {
        self.inner().statement_type()
    }

    fn predicate_type(&self) -> &'static str {
        self.inner().predicate_type()
    }

    fn statement_bytes(&self) -> &[u8] {
        self.inner().statement_bytes()
    }

    fn signatures(&self) -> &[EntitySignature] {
        self.inner().signatures()
    }

    fn subjects(&self) -> &[Subject] {
        self.inner().subjects()
    }

    fn builder_id(&self) -> &str {
        self.inner().builder_id()
    }

    fn build_type(&self) -> &str {
        self.inner().build_type()
    }

    fn materials(&self) -> Vec<Material> {
        self.inner().materials()
    }
}

/// Report summary: types, build type and signers. The statement itself is
/// not included; consumers that need it read `statement_bytes()`.
impl Serialize for ProvenanceAttestation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Attestation", 4)?;
        s.serialize_field("type", self.statement_type())?;
        s.serialize_field("predicateType", self.predicate_type())?;
        s.serialize_field("predicateBuildType", self.build_type())?;
        s.serialize_field("signatures", self.signatures())?;
        s.end()
    }
}

/// A fully decoded statement, before signer identities are attached.
#[derive(Debug)]
pub(crate) enum DecodedStatement {
    SlsaV02(Statement<v02::ProvenancePredicate>),
    SlsaV1(Statement<v1::ProvenancePredicate>),
}

impl DecodedStatement {
    /// Assemble the final attestation around the original statement bytes.
    pub(crate) fn into_attestation(
        self,
        statement_type: StatementType,
        data: Vec<u8>,
        signatures: Vec<EntitySignature>,
    ) -> ProvenanceAttestation {
        match self {
            Self::SlsaV02(statement) => ProvenanceAttestation::SlsaV02(SlsaProvenanceV02::new(
                statement_type,
                statement,
                data,
                signatures,
            )),
            Self::SlsaV1(statement) => ProvenanceAttestation::SlsaV1(SlsaProvenanceV1::new(
                statement_type,
                statement,
                data,
                signatures,
            )),
        }
    }
}

/// Route a header-validated statement to its version parser.
pub(crate) fn parse_predicate(
    predicate_type: PredicateType,
    data: &[u8],
) -> AttestationResult<DecodedStatement> {
    Ok(match predicate_type {
        PredicateType::SlsaProvenanceV0_2 => DecodedStatement::SlsaV02(v02::parse(data)?),
        PredicateType::SlsaProvenanceV1 => DecodedStatement::SlsaV1(v1::parse(data)?),
    })
}
