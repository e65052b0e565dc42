//! Identifier generation
//!
//! Every entity and the per-device identity carry a random UUID v4 in its
//! hyphenated string form. Randomness comes from the operating system via
//! `uuid`'s `getrandom` backend.

use uuid::Uuid;

const SHORT_ID_LEN: usize = 6;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a new entity identifier
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generate a short identifier for filename disambiguation
///
/// Six base-36 characters, so collisions are possible and the value must
/// never be used as an entity key.
pub fn new_short_id() -> String {
    let mut value = Uuid::new_v4().as_u128();
    let mut out = String::with_capacity(SHORT_ID_LEN);
    for _ in 0..SHORT_ID_LEN {
        out.push(BASE36[(value % 36) as usize] as char);
        value /= 36;
    }
    out
}
