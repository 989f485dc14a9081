// Keystash — Value codec
//
// Structured values travel through the store as JSON bytes under `v_Data`.
// Any serde type can be stored; the target shape is chosen at read time.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::attributes::{attr, AttributeMap, AttributeValue};
use super::error::{ItemError, ItemResult};

/// Serialize a value into the payload stored under `v_Data`.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> ItemResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| {
        tracing::debug!(error = %e, "Value could not be encoded");
        ItemError::InvalidData
    })
}

/// Parse a stored payload as `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> ItemResult<T> {
    serde_json::from_slice(bytes).map_err(|e| {
        tracing::debug!(error = %e, "Stored payload does not match the requested shape");
        ItemError::InvalidData
    })
}

/// Decode the `v_Data` field of a record returned by the store.
pub fn decode_record<T: DeserializeOwned>(record: &AttributeMap) -> ItemResult<T> {
    match record.get(attr::VALUE_DATA) {
        Some(AttributeValue::Data(bytes)) => decode(bytes),
        Some(_) => {
            tracing::debug!("Record value data is not binary");
            Err(ItemError::InvalidData)
        }
        None => {
            tracing::debug!("Record carries no value data");
            Err(ItemError::InvalidData)
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Token {
        name: String,
        scopes: Vec<String>,
        expires_in: Option<u64>,
    }

    #[test]
    fn test_struct_round_trip() {
        let token = Token {
            name: "ci".to_string(),
            scopes: vec!["repo:read".to_string(), "repo:write".to_string()],
            expires_in: Some(3600),
        };
        let bytes = encode(&token).unwrap();
        let back: Token = decode(&bytes).unwrap();
        assert_eq!(back, token);
    }

    #[test]
    fn test_reencoding_decoded_bytes_is_stable() {
        let bytes = encode(&serde_json::json!({"name": "ex", "n": [1, 2, 3]})).unwrap();
        let value: serde_json::Value = decode(&bytes).unwrap();
        assert_eq!(encode(&value).unwrap(), bytes);
    }

    #[test]
    fn test_scalar_values_round_trip() {
        let bytes = encode("plain string").unwrap();
        assert_eq!(decode::<String>(&bytes).unwrap(), "plain string");

        let bytes = encode(&42u32).unwrap();
        assert_eq!(decode::<u32>(&bytes).unwrap(), 42);
    }

    #[test]
    fn test_unrepresentable_value_is_invalid_data() {
        // JSON object keys must be strings.
        let mut map = HashMap::new();
        map.insert(vec![1u8], "x");
        assert_eq!(encode(&map), Err(ItemError::InvalidData));
    }

    #[test]
    fn test_wrong_shape_is_invalid_data() {
        let bytes = encode(&serde_json::json!({"name": "ex"})).unwrap();
        assert_eq!(decode::<Token>(&bytes), Err(ItemError::InvalidData));
        assert_eq!(decode::<Token>(b"\xff\x00"), Err(ItemError::InvalidData));
    }

    #[test]
    fn test_record_without_value_data_is_invalid() {
        let record = AttributeMap::new().with(attr::ACCOUNT, "k");
        assert_eq!(
            decode_record::<serde_json::Value>(&record),
            Err(ItemError::InvalidData)
        );
    }

    #[test]
    fn test_record_with_non_binary_value_data_is_invalid() {
        let record = AttributeMap::new().with(attr::VALUE_DATA, "{\"name\":\"ex\"}");
        assert_eq!(
            decode_record::<serde_json::Value>(&record),
            Err(ItemError::InvalidData)
        );
    }

    #[test]
    fn test_record_decodes_value_data() {
        let record =
            AttributeMap::new().with(attr::VALUE_DATA, encode(&vec![1, 2, 3]).unwrap());
        assert_eq!(decode_record::<Vec<i32>>(&record).unwrap(), vec![1, 2, 3]);
    }
}
