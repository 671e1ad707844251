#![no_main]

use assay_attestation::{decode_attestation, DsseCarrier};
use libfuzzer_sys::fuzz_target;

// Arbitrary envelope bytes must produce an error, never a panic.
fuzz_target!(|data: &[u8]| {
    let _ = decode_attestation(&DsseCarrier::new(data.to_vec()));
});
