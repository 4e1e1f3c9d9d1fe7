//! Rewrites an arbitrary JSON Schema into a restricted disjunctive normal
//! form (DNF): a single top-level `anyOf` whose branches carry no
//! `allOf`/`oneOf`/`not`/`if`/`then`/`else`, suitable for downstream
//! consumption such as test-case generation or graph construction.
//!
//! The pipeline, in order:
//!
//! 1. [`pointer`] — JSON Pointer parsing and resolution against a root document.
//! 2. [`keywords`] — per-keyword merge algebra (the semantic intersection of
//!    two sibling schemas).
//! 3. [`merger`] — lifts the keyword algebra over lists of `{anyOf: [...]}`
//!    schemas, either exactly ([`merger::merge_all`]) or approximately but
//!    linearly ([`merger::merge`]).
//! 4. [`conditional`] — rewrites `if`/`then`/`else` via the standard
//!    implication equivalence.
//! 5. [`inliner`] — substitutes `$ref` with its referent.
//! 6. [`dnf`] — hoists `allOf`/`anyOf`/`oneOf` into a flat `anyOf`.
//! 7. [`normalizer`] — the recursive driver tying 1–6 together with
//!    content-addressed cycle breaking.
//! 8. [`checker`] — verifies a schema actually is in the grammar this crate
//!    produces.
//!
//! Most callers only need [`normalize`], [`normalize_str`], and
//! [`check_normalized`].

pub mod checker;
pub mod conditional;
pub mod config;
pub mod constants;
pub mod dnf;
pub mod error;
pub mod fingerprint;
pub mod inliner;
pub mod keywords;
pub mod merger;
pub mod normalizer;
pub mod pointer;

pub use checker::check_normalized;
pub use config::NormalizeOptions;
pub use error::{ErrorCode, NormalizeError};
pub use normalizer::normalize;

/// Parse `text` as JSON and normalize it, using [`NormalizeOptions::default`].
///
/// # Errors
///
/// Returns [`NormalizeError::JsonError`] if `text` is not valid JSON, or any
/// error [`normalize`] itself can return.
pub fn normalize_str(text: &str) -> Result<serde_json::Value, NormalizeError> {
    normalize_value(&serde_json::from_str(text)?, &NormalizeOptions::default())
}

/// Normalize an already-parsed [`serde_json::Value`] with explicit options.
///
/// # Errors
///
/// See [`normalize`].
pub fn normalize_value(
    schema: &serde_json::Value,
    options: &NormalizeOptions,
) -> Result<serde_json::Value, NormalizeError> {
    normalize(schema, options)
}
