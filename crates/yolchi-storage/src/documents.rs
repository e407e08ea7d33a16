// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Versioned load and save of campaign [`Document`]s over a [`StateStore`].
//!
//! Reads never fail on content: a missing, empty, malformed or newer-version
//! value yields the document's default. Only store I/O errors propagate.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use yolchi_core::{Document, StateStore, YolchiError};

#[derive(Serialize)]
struct EnvelopeRef<'a, D> {
    version: u32,
    data: &'a D,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Envelope {
    version: u32,
    data: serde_json::Value,
}

/// Decode a stored value into `D`, falling back to `D::default()`.
pub fn decode<D: Document>(raw: Option<&str>) -> D {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        debug!(key = D::KEY, "document absent, using default");
        return D::default();
    };

    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(key = D::KEY, error = %e, "document is not valid JSON, using default");
            return D::default();
        }
    };

    let (version, data) = match serde_json::from_value::<Envelope>(value.clone()) {
        Ok(envelope) => (envelope.version, envelope.data),
        Err(_) => (0, value),
    };

    if version > D::VERSION {
        warn!(
            key = D::KEY,
            stored = version,
            supported = D::VERSION,
            "document written by a newer version, using default"
        );
        return D::default();
    }

    match D::migrate(version, data) {
        Ok(doc) => doc,
        Err(e) => {
            warn!(key = D::KEY, version, error = %e, "document does not match schema, using default");
            D::default()
        }
    }
}

/// Encode `doc` in the current envelope.
pub fn encode<D: Document>(doc: &D) -> Result<String, YolchiError> {
    serde_json::to_string(&EnvelopeRef {
        version: D::VERSION,
        data: doc,
    })
    .map_err(|source| YolchiError::Document {
        key: D::KEY.to_string(),
        source,
    })
}

/// Typed access to documents held by a [`StateStore`].
#[derive(Clone)]
pub struct DocumentStore {
    store: Arc<dyn StateStore>,
}

impl DocumentStore {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    pub async fn load<D: Document>(&self) -> Result<D, YolchiError> {
        let raw = self.store.get(D::KEY).await?;
        Ok(decode(raw.as_deref()))
    }

    /// Replace the stored document. Last write wins.
    pub async fn save<D: Document>(&self, doc: &D) -> Result<(), YolchiError> {
        let encoded = encode(doc)?;
        self.store.set(D::KEY, &encoded).await
    }

    pub async fn clear<D: Document>(&self) -> Result<(), YolchiError> {
        self.store.delete(D::KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemoryStateStore;
    use tracing_test::traced_test;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    struct Tally {
        total_sent: u32,
        label: String,
    }

    impl Document for Tally {
        const KEY: &'static str = "tally";
    }

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Renamed {
        count: u32,
    }

    impl Document for Renamed {
        const KEY: &'static str = "renamed";
        const VERSION: u32 = 2;

        fn migrate(version: u32, data: serde_json::Value) -> Result<Self, serde_json::Error> {
            if version < 2 {
                #[derive(Deserialize)]
                struct Old {
                    total: u32,
                }
                let old: Old = serde_json::from_value(data)?;
                return Ok(Renamed { count: old.total });
            }
            serde_json::from_value(data)
        }
    }

    #[test]
    fn absent_and_empty_values_default() {
        assert_eq!(decode::<Tally>(None), Tally::default());
        assert_eq!(decode::<Tally>(Some("   ")), Tally::default());
    }

    #[traced_test]
    #[test]
    fn malformed_json_defaults_with_warning() {
        assert_eq!(decode::<Tally>(Some("{not json")), Tally::default());
        assert!(logs_contain("not valid JSON"));
    }

    #[test]
    fn legacy_bare_value_is_read_as_version_zero() {
        let doc = decode::<Tally>(Some(r#"{"totalSent":12,"label":"x"}"#));
        assert_eq!(doc.total_sent, 12);
        assert_eq!(doc.label, "x");

        let migrated = decode::<Renamed>(Some(r#"{"total":7}"#));
        assert_eq!(migrated, Renamed { count: 7 });
    }

    #[test]
    fn older_envelope_is_migrated() {
        let doc = decode::<Renamed>(Some(r#"{"version":1,"data":{"total":3}}"#));
        assert_eq!(doc, Renamed { count: 3 });
    }

    #[traced_test]
    #[test]
    fn newer_envelope_defaults_with_warning() {
        let doc = decode::<Tally>(Some(r#"{"version":9,"data":{"totalSent":1}}"#));
        assert_eq!(doc, Tally::default());
        assert!(logs_contain("newer version"));
    }

    #[test]
    fn encode_wraps_in_envelope() {
        let encoded = encode(&Renamed { count: 4 }).unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value["version"], 2);
        assert_eq!(value["data"]["count"], 4);
    }

    #[tokio::test]
    async fn store_round_trip_and_clear() {
        let docs = DocumentStore::new(Arc::new(MemoryStateStore::new()));
        let tally = Tally {
            total_sent: 5,
            label: "batch".into(),
        };
        docs.save(&tally).await.unwrap();
        assert_eq!(docs.load::<Tally>().await.unwrap(), tally);

        docs.clear::<Tally>().await.unwrap();
        assert_eq!(docs.load::<Tally>().await.unwrap(), Tally::default());
    }
}
