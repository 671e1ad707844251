//! Property: decoding never alters the signed statement bytes.

use assay_attestation::{decode_attestation, Attestation, DsseCarrier, PAYLOAD_TYPE_INTOTO};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use proptest::prelude::*;

fn carrier_for(statement: &[u8]) -> DsseCarrier {
    let envelope = serde_json::json!({
        "payloadType": PAYLOAD_TYPE_INTOTO,
        "payload": BASE64.encode(statement),
        "signatures": [{"keyid": "k", "sig": BASE64.encode("sig")}],
    });
    DsseCarrier::new(envelope.to_string())
}

fn whitespace() -> impl Strategy<Value = String> {
    proptest::collection::vec(prop_oneof![Just(' '), Just('\n'), Just('\t'), Just('\r')], 0..4)
        .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #[test]
    fn test_statement_bytes_roundtrip(
        ws in proptest::collection::vec(whitespace(), 6),
        builder_id in "[a-z]{1,12}(/[a-z0-9]{1,8}){0,3}",
        note in "[ -~&&[^\"\\\\]]{0,24}",
        subjects_first in any::<bool>(),
    ) {
        let subject = format!(r#""subject":[{{"name":"{note}","digest":{{"sha256":"ab"}}}}]"#);
        let predicate = format!(
            r#""predicate":{}{{"builder":{{"id":"https://{builder_id}"}},"buildType":"t","x-note":"{note}"}}"#,
            ws[0]
        );
        let header = format!(
            r#""_type":{}"https://in-toto.io/Statement/v0.1",{}"predicateType":"https://slsa.dev/provenance/v0.2""#,
            ws[1], ws[2]
        );
        let body = if subjects_first {
            format!("{subject},{}{header},{predicate}", ws[3])
        } else {
            format!("{header},{}{predicate},{subject}", ws[3])
        };
        let statement = format!("{}{{{}{body}{}}}{}", ws[4], ws[5], ws[5], ws[4]);

        let att = decode_attestation(&carrier_for(statement.as_bytes())).unwrap();
        prop_assert_eq!(att.statement_bytes(), statement.as_bytes());
        prop_assert_eq!(att.builder_id(), format!("https://{builder_id}"));
        prop_assert_eq!(att.subjects()[0].name.as_str(), note.as_str());
    }
}
