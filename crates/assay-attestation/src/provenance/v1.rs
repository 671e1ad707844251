//! SLSA provenance v1.
//!
//! See: <https://slsa.dev/spec/v1.0/provenance>

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AttestationError, AttestationResult};
use crate::signature::EntitySignature;
use crate::statement::{DigestSet, PredicateType, Statement, StatementType, Subject};

use super::{Attestation, Material};

/// SLSA v1 provenance predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenancePredicate {
    pub build_definition: BuildDefinition,
    pub run_details: RunDetails,
}

/// Inputs that fully describe the build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildDefinition {
    pub build_type: String,
    /// Parameters under external control. Required, and always an object.
    pub external_parameters: serde_json::Map<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_parameters: Option<serde_json::Value>,
    #[serde(default)]
    pub resolved_dependencies: Vec<ResourceDescriptor>,
}

/// Details of this particular execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunDetails {
    pub builder: Builder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BuildMetadata>,
    #[serde(default)]
    pub byproducts: Vec<ResourceDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Builder {
    pub id: String,
    #[serde(default)]
    pub version: BTreeMap<String, String>,
    #[serde(default)]
    pub builder_dependencies: Vec<ResourceDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildMetadata {
    #[serde(default)]
    pub invocation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_on: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_on: Option<DateTime<Utc>>,
}

/// in-toto ResourceDescriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uri: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub digest: DigestSet,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub download_location: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub media_type: String,
    /// Base64-encoded content, left encoded.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<serde_json::Map<String, serde_json::Value>>,
}

/// A decoded SLSA v1 provenance attestation.
#[derive(Debug, Clone)]
pub struct SlsaProvenanceV1 {
    statement_type: StatementType,
    statement: Statement<ProvenancePredicate>,
    data: Vec<u8>,
    signatures: Vec<EntitySignature>,
}

impl SlsaProvenanceV1 {
    /// The typed statement, for policy rules that need v1-specific fields.
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

/// Fully decode a statement already routed to SLSA v1.
pub(crate) fn parse(data: &[u8]) -> AttestationResult<Statement<ProvenancePredicate>> {
    serde_json::from_slice(data).map_err(|source| AttestationError::PredicateDecodeFailed {
        predicate_type: PredicateType::SlsaProvenanceV1,
        source,
    })
}

impl Attestation for SlsaProvenanceV1 {
    fn statement_type(&self) -> &'static str {
        self.statement_type.as_str()
    }

    fn predicate_type(&self) -> &'static str {
        PredicateType::SlsaProvenanceV1.as_str()
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
        &self.statement.predicate.run_details.builder.id
    }

    fn build_type(&self) -> &str {
        &self.statement.predicate.build_definition.build_type
    }

    // Descriptors identified only by name or inline content have no URI;
    // they are kept with an empty one so the count matches the predicate.
    fn materials(&self) -> Vec<Material> {
        self.statement
            .predicate
            .build_definition
            .resolved_dependencies
            .iter()
            .map(|rd| Material {
                uri: rd.uri.clone(),
                digest: rd.digest.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn statement(predicate: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "_type": "https://in-toto.io/Statement/v1",
            "predicateType": "https://slsa.dev/provenance/v1",
            "subject": [{"name": "app.tar.gz", "digest": {"sha256": "abc"}}],
            "predicate": predicate,
        }))
        .unwrap()
    }

    fn valid_predicate() -> serde_json::Value {
        json!({
            "buildDefinition": {
                "buildType": "https://actions.github.io/buildtypes/workflow/v1",
                "externalParameters": {"workflow": {"ref": "refs/heads/main", "path": ".github/workflows/release.yml"}},
                "resolvedDependencies": [
                    {"uri": "git+https://github.com/acme/app@refs/heads/main", "digest": {"gitCommit": "f00"}},
                    {"name": "inline", "content": "aGVsbG8="}
                ]
            },
            "runDetails": {
                "builder": {"id": "https://github.com/actions/runner/github-hosted", "version": {"runner": "2.3"}},
                "metadata": {"invocationId": "https://github.com/acme/app/actions/runs/1", "startedOn": "2024-03-01T12:00:00Z"}
            }
        })
    }

    #[test]
    fn test_parses_valid_predicate() {
        let data = statement(valid_predicate());
        let statement = parse(&data).unwrap();
        let att = SlsaProvenanceV1::new(
            StatementType::V1,
            statement,
            data.clone(),
            Vec::new(),
        );

        assert_eq!(att.statement_type(), "https://in-toto.io/Statement/v1");
        assert_eq!(att.predicate_type(), "https://slsa.dev/provenance/v1");
        assert_eq!(
            att.builder_id(),
            "https://github.com/actions/runner/github-hosted"
        );
        assert_eq!(
            att.build_type(),
            "https://actions.github.io/buildtypes/workflow/v1"
        );
        assert_eq!(att.statement_bytes(), data.as_slice());

        let materials = att.materials();
        assert_eq!(materials.len(), 2);
        assert_eq!(materials[0].digest["gitCommit"], "f00");
        assert_eq!(materials[1].uri, "");

        let run = &att.predicate().run_details;
        assert_eq!(run.builder.version["runner"], "2.3");
        assert!(run.metadata.as_ref().unwrap().started_on.is_some());
    }

    #[test]
    fn test_missing_run_details_builder_fails() {
        let mut predicate = valid_predicate();
        predicate["runDetails"]
            .as_object_mut()
            .unwrap()
            .remove("builder");
        let err = parse(&statement(predicate)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PredicateDecodeFailed);
    }

    #[test]
    fn test_external_parameters_must_be_object() {
        let mut predicate = valid_predicate();
        predicate["buildDefinition"]["externalParameters"] = serde_json::Value::Null;
        let err = parse(&statement(predicate)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PredicateDecodeFailed);

        let mut predicate = valid_predicate();
        predicate["buildDefinition"]
            .as_object_mut()
            .unwrap()
            .remove("externalParameters");
        let err = parse(&statement(predicate)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PredicateDecodeFailed);
    }

    #[test]
    fn test_v02_body_does_not_pass_as_v1() {
        let data = statement(json!({"builder": {"id": "b"}, "buildType": "x"}));
        let err = parse(&data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PredicateDecodeFailed);
        assert!(err.to_string().contains("https://slsa.dev/provenance/v1"));
    }
}
