//! Transaction id generation: `ct_` + 8 lowercase hex chars from a CSPRNG.

use rand::Rng;
use std::collections::HashSet;

const ID_PREFIX: &str = "ct_";
const ID_HEX_LEN: usize = 8;

fn random_id() -> String {
    let bytes: [u8; 4] = rand::rng().random();
    let mut hex = String::with_capacity(ID_HEX_LEN);
    for b in bytes {
        hex.push_str(&format!("{b:02x}"));
    }
    format!("{ID_PREFIX}{hex}")
}

/// Generates a fresh id guaranteed not to collide with `existing`.
pub fn generate_unique_id(existing: &HashSet<&str>) -> String {
    loop {
        let id = random_id();
        if !existing.contains(id.as_str()) {
            return id;
        }
    }
}
