//! Layered JSON configuration.
//!
//! Option structs are deserialized once from the merge of several JSON
//! object layers (defaults, then instance options, then inline metadata).

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{GridcalError, Result};

/// Recursively merge `layer` into `base`. Objects merge key by key; any
/// other value replaces what was there.
pub(crate) fn deep_merge(base: &mut Map<String, Value>, layer: &Map<String, Value>) {
    for (key, value) in layer {
        match (base.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                deep_merge(existing, incoming);
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Merge `layers` left to right and deserialize the result. `null` layers
/// are skipped; any other non-object layer is rejected.
pub(crate) fn from_layers<T: DeserializeOwned>(layers: &[Value]) -> Result<T> {
    let mut merged = Map::new();
    for (i, layer) in layers.iter().enumerate() {
        match layer {
            Value::Object(map) => deep_merge(&mut merged, map),
            Value::Null => {}
            other => {
                return Err(GridcalError::Config(format!(
                    "layer {i} is not an object: {other}"
                )))
            }
        }
    }
    Ok(serde_json::from_value(Value::Object(merged))?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deep_merge_nested_objects() {
        let mut base = json!({"a": {"x": 1, "y": 2}, "b": 1});
        let layer = json!({"a": {"y": 3}, "b": {"z": 1}});
        deep_merge(base.as_object_mut().unwrap(), layer.as_object().unwrap());
        assert_eq!(base, json!({"a": {"x": 1, "y": 3}, "b": {"z": 1}}));
    }

    #[test]
    fn test_from_layers_skips_null() {
        let merged: Value = from_layers(&[json!({"a": 1}), Value::Null, json!({"b": 2})]).unwrap();
        assert_eq!(merged, json!({"a": 1, "b": 2}));
    }
}
