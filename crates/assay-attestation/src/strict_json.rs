//! Strict JSON ingestion for statement payloads.
//!
//! serde_json accepts duplicate object keys with "last key wins" semantics.
//! The statement bytes we hand out are re-read by policy engines that may
//! pick the first occurrence instead, so the same signed bytes could mean two
//! different things:
//!
//! ```text
//! {"predicateType": "https://slsa.dev/provenance/v0.2",
//!  "predicateType": "https://example.com/anything"}
//! ```
//!
//! Payloads are therefore scanned once, before any typed deserialization,
//! and rejected on duplicate keys (compared after unescaping, so `"a"` and
//! `"\u0061"` collide) or on nesting deeper than the configured limit.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;

use serde::de::{self, DeserializeSeed, MapAccess, SeqAccess, Visitor};
use thiserror::Error;

/// Error returned when strict JSON validation fails.
#[derive(Debug, Error)]
pub enum StrictJsonError {
    #[error("duplicate key '{key}' at path '{path}'")]
    DuplicateKey { key: String, path: String },

    #[error("nesting depth {depth} exceeds maximum {max}")]
    NestingTooDeep { depth: usize, max: usize },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Validate `bytes` as a single JSON document without duplicate keys.
pub(crate) fn validate_strict(bytes: &[u8], max_depth: usize) -> Result<(), StrictJsonError> {
    let violation = RefCell::new(None);
    let mut de = serde_json::Deserializer::from_slice(bytes);

    let scan = Scan {
        depth: 0,
        max_depth,
        path: String::new(),
        violation: &violation,
    };

    let result = scan.deserialize(&mut de).and_then(|()| de.end());
    match result {
        Ok(()) => Ok(()),
        Err(e) => Err(violation.into_inner().unwrap_or(StrictJsonError::Parse(e))),
    }
}

/// One level of the scan. Violations are parked in `violation` because the
/// visitor can only return `serde_json::Error`.
struct Scan<'v> {
    depth: usize,
    max_depth: usize,
    path: String,
    violation: &'v RefCell<Option<StrictJsonError>>,
}

impl<'v> Scan<'v> {
    fn child(&self, segment: &str) -> Self {
        Self {
            depth: self.depth + 1,
            max_depth: self.max_depth,
            path: format!("{}/{}", self.path, segment),
            violation: self.violation,
        }
    }

    fn fail<E: de::Error>(&self, violation: StrictJsonError) -> E {
        let message = violation.to_string();
        *self.violation.borrow_mut() = Some(violation);
        E::custom(message)
    }

    fn enter<E: de::Error>(&self) -> Result<(), E> {
        let depth = self.depth + 1;
        if depth > self.max_depth {
            return Err(self.fail(StrictJsonError::NestingTooDeep {
                depth,
                max: self.max_depth,
            }));
        }
        Ok(())
    }
}

impl<'de, 'v> DeserializeSeed<'de> for Scan<'v> {
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> Result<(), D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de, 'v> Visitor<'de> for Scan<'v> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<(), E> {
        Ok(())
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<(), E> {
        Ok(())
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<(), E> {
        Ok(())
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<(), E> {
        Ok(())
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<(), E> {
        Ok(())
    }

    fn visit_unit<E: de::Error>(self) -> Result<(), E> {
        Ok(())
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<(), A::Error>
    where
        A: SeqAccess<'de>,
    {
        self.enter()?;
        let mut index = 0usize;
        while seq
            .next_element_seed(self.child(&index.to_string()))?
            .is_some()
        {
            index += 1;
        }
        Ok(())
    }

    fn visit_map<A>(self, mut map: A) -> Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        self.enter()?;
        let mut keys = HashSet::new();
        while let Some(key) = map.next_key::<String>()? {
            if keys.contains(&key) {
                let path = if self.path.is_empty() {
                    "/".to_string()
                } else {
                    self.path.clone()
                };
                return Err(self.fail(StrictJsonError::DuplicateKey { key, path }));
            }
            map.next_value_seed(self.child(&key))?;
            keys.insert(key);
        }
        Ok(())
    }
}
