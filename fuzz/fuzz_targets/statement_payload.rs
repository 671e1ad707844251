#![no_main]

use assay_attestation::{decode_attestation, Attestation, DsseCarrier, PAYLOAD_TYPE_INTOTO};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use libfuzzer_sys::fuzz_target;

// Wrap arbitrary statement bytes in a well-formed envelope so the fuzzer
// reaches the statement and predicate parsers directly.
fuzz_target!(|data: &[u8]| {
    let envelope = format!(
        r#"{{"payloadType":"{}","payload":"{}","signatures":[{{"keyid":"k","sig":"c2ln"}}]}}"#,
        PAYLOAD_TYPE_INTOTO,
        BASE64.encode(data)
    );
    if let Ok(att) = decode_attestation(&DsseCarrier::new(envelope)) {
        assert_eq!(att.statement_bytes(), data);
    }
});
