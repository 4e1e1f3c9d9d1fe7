//! Content-addressed fingerprinting used to break cycles in recursive
//! schemas (see [`crate::normalize`]).
//!
//! A fingerprint is a `blake3` hash over a canonical JSON encoding of a
//! schema. Any collision-resistant hash over a canonical encoding suffices
//! (spec-level design note) — `blake3` is used here rather than the
//! legacy `sha1` used by the original Python implementation, matching how
//! this pack's sibling `oas3-gen` example reaches for a modern hash when
//! content-addressing JSON.
//!
//! Canonicalization relies on `serde_json::Map` being `BTreeMap`-backed
//! (the default; the `preserve_order` feature is not enabled anywhere in
//! this crate), so `serde_json::to_string` already emits object keys in
//! sorted order and is therefore deterministic across inputs with
//! equivalent-but-differently-ordered keys.

use serde_json::Value;

/// A lowercase-hex content fingerprint of a schema.
pub type Fingerprint = String;

/// Compute the fingerprint of `schema`'s canonical JSON encoding.
#[must_use]
pub fn fingerprint(schema: &Value) -> Fingerprint {
    // `to_string` (not `to_string_pretty`) over a `BTreeMap`-backed `Map`
    // is already a canonical encoding: sorted keys, no insignificant
    // whitespace.
    let canonical = serde_json::to_vec(schema).expect("Value serialization is infallible");
    blake3::hash(&canonical).to_hex().to_string()
}
