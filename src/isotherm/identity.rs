//! Content-addressed identity hashes. Two isotherms are considered equal
//! iff the SHA-256 of their canonical JSON serialisation (all metadata
//! plus every point) is equal.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Hex SHA-256 of a canonical serialisation of the value. Object keys in
/// `serde_json` maps are emitted in insertion order, so callers build the
/// value from sorted collections.
pub fn sha256_json(value: &Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hash_is_stable_and_discriminating() {
        let a = json!({"name": "iso", "points": [1.0, 2.0]});
        let b = json!({"name": "iso", "points": [1.0, 2.0]});
        let c = json!({"name": "iso", "points": [1.0, 2.1]});
        assert_eq!(sha256_json(&a), sha256_json(&b));
        assert_ne!(sha256_json(&a), sha256_json(&c));
    }
}
