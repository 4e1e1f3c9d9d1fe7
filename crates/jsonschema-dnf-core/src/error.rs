//! Error types for schema normalization.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable, machine-readable error codes for downstream consumers (CLI exit
/// codes, FFI boundaries, structured logs).
///
/// These codes form a **stable API contract** — once published, variant
/// names and their serialized `snake_case` strings must never change across
/// versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ErrorCode {
    /// JSON (de)serialization error.
    JsonParseError,
    /// Top-level input was neither `true`, `false`, nor an object.
    NotAnObject,
    /// A `$ref` target could not be resolved.
    UnresolvedRef,
    /// Two operands of a merge both specified a keyword with no registered
    /// combiner.
    UnmergeableKeyword,
    /// A purported normal-form schema violates the DNF grammar.
    MalformedNormalForm,
    /// Recursion depth guard tripped while walking the schema tree.
    RecursionDepthExceeded,
}

/// Faults raised by the normalization pipeline.
///
/// All faults propagate upward unmodified — there is no internal retry or
/// recovery. Internal invariant violations (non-empty schema lists passed to
/// `merge`, positional arrays with mismatched lengths after padding) are
/// enforced with `assert!`/`debug_assert!` instead, since those indicate an
/// implementation bug rather than a malformed input.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// JSON (de)serialization error surfaced by the `normalize_str` entry
    /// point (parsing itself is not part of the core term-rewriting algebra).
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Top-level input was neither `true`, `false`, nor a keyword-map.
    #[error("schema must be a bool or an object, got {kind}")]
    NotAnObject {
        /// A short description of the offending JSON value's kind.
        kind: String,
    },

    /// A `$ref` pointer could not be resolved against the root schema.
    #[error("unresolved $ref at {path}: {reference}")]
    UnresolvedRef {
        /// Path at which the `$ref` was encountered.
        path: String,
        /// The unresolved `$ref` string.
        reference: String,
    },

    /// Two operands of a merge both specified a keyword with no registered
    /// combiner.
    #[error("do not know how to merge keyword '{keyword}'")]
    UnmergeableKeyword {
        /// The keyword that has no merge combiner.
        keyword: String,
    },

    /// A purported normal-form schema violates the DNF grammar (raised only
    /// by [`crate::check_normalized`]).
    #[error("malformed normal form at {path}: {reason}")]
    MalformedNormalForm {
        /// Path (JSON pointer) of the offending sub-schema.
        path: String,
        /// Human-readable reason.
        reason: String,
    },

    /// The normalizer's recursion-depth guard tripped before the input
    /// could be fully walked.
    #[error("recursion depth exceeded at {path} (max: {max_depth})")]
    RecursionDepthExceeded {
        /// Path at which the guard tripped.
        path: String,
        /// Configured maximum depth.
        max_depth: usize,
    },
}

impl NormalizeError {
    /// Returns the stable error code for this error variant.
    #[must_use]
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::JsonError(_) => ErrorCode::JsonParseError,
            Self::NotAnObject { .. } => ErrorCode::NotAnObject,
            Self::UnresolvedRef { .. } => ErrorCode::UnresolvedRef,
            Self::UnmergeableKeyword { .. } => ErrorCode::UnmergeableKeyword,
            Self::MalformedNormalForm { .. } => ErrorCode::MalformedNormalForm,
            Self::RecursionDepthExceeded { .. } => ErrorCode::RecursionDepthExceeded,
        }
    }

    /// Returns the schema path context, if available.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::JsonError(_) | Self::NotAnObject { .. } | Self::UnmergeableKeyword { .. } => {
                None
            }
            Self::UnresolvedRef { path, .. }
            | Self::MalformedNormalForm { path, .. }
            | Self::RecursionDepthExceeded { path, .. } => Some(path),
        }
    }

    /// Produces a structured JSON error, e.g. for CLI diagnostics.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.error_code(),
            "message": self.to_string(),
            "path": self.path(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_round_trips_through_serde() {
        let code = ErrorCode::UnmergeableKeyword;
        let json = serde_json::to_value(code).unwrap();
        assert_eq!(json, serde_json::json!("unmergeable_keyword"));
    }

    #[test]
    fn to_json_carries_path_when_present() {
        let err = NormalizeError::UnresolvedRef {
            path: "#/properties/a".to_string(),
            reference: "#/$defs/Missing".to_string(),
        };
        let json = err.to_json();
        assert_eq!(json["code"], serde_json::json!("unresolved_ref"));
        assert_eq!(json["path"], serde_json::json!("#/properties/a"));
    }

    #[test]
    fn to_json_path_is_null_for_json_error() {
        let bad = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = NormalizeError::JsonError(bad);
        assert_eq!(err.to_json()["path"], serde_json::Value::Null);
    }
}
