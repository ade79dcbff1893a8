use sha2::{Digest, Sha256};

/// Derive a content-addressed identifier: the SHA-256 of `input` as lowercase hex.
pub fn generate_id(input: &str) -> String {
    generate_id_from_parts(&[input])
}

/// Same as [`generate_id`] over the concatenation of `parts`.
pub fn generate_id_from_parts(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}
