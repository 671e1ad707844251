//! SLSA provenance v0.2.
//!
//! See: <https://slsa.dev/provenance/v0.2>

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AttestationError, AttestationResult};
use crate::signature::EntitySignature;
use crate::statement::{DigestSet, PredicateType, Statement, StatementType, Subject};

use super::{Attestation, Material};

/// SLSA v0.2 provenance predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenancePredicate {
    /// Identifies the entity that executed the build.
    pub builder: Builder,
    /// URI describing what the build did.
    pub build_type: String,
    #[serde(default)]
    pub invocation: Invocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_config: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub materials: Vec<ProvenanceMaterial>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Builder {
    pub id: String,
}

/// Event that kicked off the build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invocation {
    #[serde(default)]
    pub config_source: ConfigSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<serde_json::Value>,
}

/// Where the top-level build configuration came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSource {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub digest: DigestSet,
    #[serde(default)]
    pub entry_point: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(rename = "buildInvocationID", default)]
    pub build_invocation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_started_on: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_finished_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completeness: Completeness,
    #[serde(default)]
    pub reproducible: bool,
}

/// Which parts of the provenance are claimed to be complete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completeness {
    #[serde(default)]
    pub parameters: bool,
    #[serde(default)]
    pub environment: bool,
    #[serde(default)]
    pub materials: bool,
}

/// An input artifact of the build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceMaterial {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub digest: DigestSet,
}

/// A decoded SLSA v0.2 provenance attestation.
#[derive(Debug, Clone)]
pub struct SlsaProvenanceV02 {
    statement_type: StatementType,
    statement: Statement<ProvenancePredicate>,
    data: Vec<u8>,
    signatures: Vec<EntitySignature>,
}

impl SlsaProvenanceV02 {
    /// The typed statement, for policy rules that need v0.2-specific fields.
    pub fn statement(&self) -> &Statement<ProvenancePredicate> {
        &self.statement
    }

    pub fn predicate(&self) -> &ProvenancePredicate {
        &self.statement.predicate
    }

    pub(crate) fn new(
        statement_type: StatementType,
        statement: Statement<ProvenancePredicate>,
        data: Vec<u8>,
        signatures: Vec<EntitySignature>,
    ) -> Self {
        Self {
            statement_type,
            statement,
            data,
            signatures,
        }
    }
}

/// Fully decode a statement already routed to SLSA v0.2.
pub(crate) fn parse(data: &[u8]) -> AttestationResult<Statement<ProvenancePredicate>> {
    serde_json::from_slice(data).map_err(|source| AttestationError::PredicateDecodeFailed {
        predicate_type: PredicateType::SlsaProvenanceV0_2,
        source,
    })
}

impl Attestation for SlsaProvenanceV02 {
    fn statement_type(&self) -> &'static str {
        self.statement_type.as_str()
    }

    fn predicate_type(&self) -> &'static str {
        PredicateType::SlsaProvenanceV0_2.as_str()
    }

    fn statement_bytes(&self) -> &[u8] {
        &self.data
    }

    fn signatures(&self) -> &[EntitySignature] {
        &self.signatures
    }

    fn subjects(&self) -> &[Subject] {
        &self.statement.subject
    }

    fn builder_id(&self) -> &str {
        &self.statement.predicate.builder.id
    }

    fn build_type(&self) -> &str {
        &self.statement.predicate.build_type
    }

    fn materials(&self) -> Vec<Material> {
        self.statement
            .predicate
            .materials
            .iter()
            .map(|m| Material {
                uri: m.uri.clone(),
                digest: m.digest.clone(),
            })
            .collect()
    }
}
