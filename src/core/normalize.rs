//! # Payload Normalization
//!
//! The library endpoints do not agree on a response shape. The same list can
//! arrive as any of:
//!
//! ```text
//! [ {...}, {...} ]                    bare list
//! { "albums": [ {...} ] }             named collection
//! { "count": 2, "items": [ {...} ] }  first list-valued field
//! ```
//!
//! [`normalize`] resolves them by precedence: bare list, then the field named
//! after the expected collection, then the first list-valued field in payload
//! order. Anything else is an empty list, not an error.

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Extracts the ordered item list from a loosely shaped payload.
pub fn normalize(payload: &Value, collection: &str) -> Vec<Value> {
    match payload {
        Value::Array(items) => items.clone(),
        Value::Object(fields) => {
            if let Some(Value::Array(items)) = fields.get(collection) {
                return items.clone();
            }
            fields
                .values()
                .find_map(Value::as_array)
                .cloned()
                .unwrap_or_else(|| {
                    debug!("No list found in '{}' payload, treating as empty", collection);
                    Vec::new()
                })
        }
        _ => Vec::new(),
    }
}

/// Normalizes and decodes items, skipping any that don't fit `T`.
pub fn decode_items<T: DeserializeOwned>(payload: &Value, collection: &str) -> Vec<T> {
    normalize(payload, collection)
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!("Skipping {} item #{}: {}", collection, i, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Album, Artist};
    use serde_json::json;

    #[test]
    fn test_bare_list_is_used_directly() {
        let payload = json!([{"id": "1"}, {"id": "2"}]);
        assert_eq!(normalize(&payload, "artists"), payload.as_array().unwrap().clone());
    }

    #[test]
    fn test_named_field() {
        let list = json!([{"id": "1", "name": "Radiohead"}]);
        let payload = json!({"artists": list});
        assert_eq!(normalize(&payload, "artists"), list.as_array().unwrap().clone());
    }

    #[test]
    fn test_named_field_wins_over_scan() {
        let decoy = json!([{"id": "x"}]);
        let list = json!([{"id": "1"}]);
        let payload = json!({"foo": "bar", "other": decoy, "artists": list});
        assert_eq!(normalize(&payload, "artists"), list.as_array().unwrap().clone());
    }

    #[test]
    fn test_first_list_field_in_payload_order() {
        let first = json!([{"id": "a"}]);
        let second = json!([{"id": "b"}]);
        let payload = json!({"total": 1, "zeta": first, "alpha": second});
        assert_eq!(normalize(&payload, "songs"), first.as_array().unwrap().clone());
    }

    #[test]
    fn test_named_field_that_is_not_a_list_falls_through_to_scan() {
        let list = json!([{"id": "1"}]);
        let payload = json!({"albums": "none", "data": list});
        assert_eq!(normalize(&payload, "albums"), list.as_array().unwrap().clone());
    }

    #[test]
    fn test_unrecognized_shapes_are_empty() {
        assert!(normalize(&json!({}), "artists").is_empty());
        assert!(normalize(&json!({"foo": "bar"}), "artists").is_empty());
        assert!(normalize(&json!(null), "artists").is_empty());
        assert!(normalize(&json!("artists"), "artists").is_empty());
        assert!(normalize(&json!(42), "artists").is_empty());
    }

    #[test]
    fn test_decode_skips_malformed_items() {
        let payload = json!({"artists": [
            {"id": "1", "name": "Radiohead"},
            {"name": "no id"},
            {"id": 2, "name": "Portishead"}
        ]});
        let artists: Vec<Artist> = decode_items(&payload, "artists");
        assert_eq!(artists.len(), 2);
        assert_eq!(artists[0].name, "Radiohead");
        assert_eq!(artists[1].id, "2");
    }

    #[test]
    fn test_decode_albums_from_wrapped_payload() {
        let payload = json!({"albums": [{"id": "10", "name": "OK Computer", "year": "1997"}]});
        let albums: Vec<Album> = decode_items(&payload, "albums");
        assert_eq!(albums[0].label(), "OK Computer (1997)");
    }
}
