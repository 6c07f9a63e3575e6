//! Turning opaque upstream payloads into records.

use serde_json::Value;

use statline_types::RawRecord;

/// Keys under which upstream APIs commonly wrap their record arrays.
const COLLECTION_KEYS: &[&str] = &[
    "games",
    "scores",
    "teams",
    "standings",
    "rankings",
    "records",
    "players",
    "prospects",
    "tournaments",
    "brackets",
    "data",
    "items",
    "results",
];

#[derive(Debug, Default, PartialEq)]
pub struct ExtractedRecords {
    pub records: Vec<RawRecord>,
    /// Array elements that were not JSON objects
    pub non_objects: usize,
}

fn from_array(items: &[Value]) -> ExtractedRecords {
    let mut extracted = ExtractedRecords::default();
    for item in items {
        match item {
            Value::Object(map) => extracted.records.push(map.clone()),
            _ => extracted.non_objects += 1,
        }
    }
    extracted
}

/// Records in `payload`: a top-level array, an array under a collection key,
/// or a lone object. Scalars yield nothing.
pub fn extract_records(payload: &Value) -> ExtractedRecords {
    match payload {
        Value::Array(items) => from_array(items),
        Value::Object(map) => {
            let wrapped = COLLECTION_KEYS.iter().find_map(|key| map.get(*key).and_then(Value::as_array));
            match wrapped {
                Some(items) => from_array(items),
                None => ExtractedRecords { records: vec![map.clone()], non_objects: 0 },
            }
        },
        _ => ExtractedRecords::default(),
    }
}
