//! JSON Pointer (RFC 6901) parsing and lookup against a root schema document.
//!
//! This is the normalizer's only collaborator for `$ref` resolution. Only
//! fragment-style, root-relative pointers (`"#/a/b/c"`) are supported —
//! external and `$id`/`$anchor`-scoped refs are out of scope for this crate.

use std::borrow::Cow;

use serde_json::Value;

use crate::error::NormalizeError;

/// A parsed, root-relative JSON Pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPointer {
    segments: Vec<String>,
    raw: String,
}

impl JsonPointer {
    /// Parse a fragment-style pointer such as `"#/$defs/Foo"` or `"#"`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let stripped = raw.strip_prefix('#').unwrap_or(raw);
        let segments = if stripped.is_empty() {
            Vec::new()
        } else {
            stripped
                .split('/')
                .filter(|s| !s.is_empty())
                .map(|s| unescape_segment(s).into_owned())
                .collect()
        };
        Self {
            segments,
            raw: raw.to_string(),
        }
    }

    /// Look up the referenced node in `root`, aliasing rather than copying.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::UnresolvedRef`] if any segment is missing.
    pub fn lookup<'a>(&self, root: &'a Value) -> Result<&'a Value, NormalizeError> {
        let mut current = root;
        for segment in &self.segments {
            current = match current {
                Value::Object(map) => map.get(segment).ok_or_else(|| self.unresolved())?,
                Value::Array(arr) => {
                    let idx: usize = segment.parse().map_err(|_| self.unresolved())?;
                    arr.get(idx).ok_or_else(|| self.unresolved())?
                }
                _ => return Err(self.unresolved()),
            };
        }
        Ok(current)
    }

    fn unresolved(&self) -> NormalizeError {
        NormalizeError::UnresolvedRef {
            path: self.raw.clone(),
            reference: self.raw.clone(),
        }
    }
}

impl std::fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Escape a single path segment per RFC 6901 (`~` → `~0`, `/` → `~1`).
#[must_use]
pub fn escape_segment(segment: &str) -> Cow<'_, str> {
    if segment.contains('~') || segment.contains('/') {
        Cow::Owned(segment.replace('~', "~0").replace('/', "~1"))
    } else {
        Cow::Borrowed(segment)
    }
}

/// Unescape a single path segment per RFC 6901 (`~1` → `/`, `~0` → `~`).
///
/// Order matters: unescape `~1` before `~0` to avoid double-unescaping.
#[must_use]
pub fn unescape_segment(segment: &str) -> Cow<'_, str> {
    if segment.contains("~0") || segment.contains("~1") {
        Cow::Owned(segment.replace("~1", "/").replace("~0", "~"))
    } else {
        Cow::Borrowed(segment)
    }
}

/// Build a JSON Pointer by appending escaped segments to a parent path.
#[must_use]
pub fn build_path(parent: &str, segments: &[&str]) -> String {
    let mut path = parent.to_string();
    for segment in segments {
        path.push('/');
        path.push_str(&escape_segment(segment));
    }
    path
}
