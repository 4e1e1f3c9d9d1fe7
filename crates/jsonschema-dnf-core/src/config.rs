//! Configuration for schema normalization.

use serde::{Deserialize, Serialize};

/// Options for [`crate::normalize`].
///
/// ## Serialization Format
///
/// Fields are serialized in `kebab-case` (e.g. `max-depth`), matching this
/// crate's CLI config-file convention.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct NormalizeOptions {
    /// Maximum recursion depth the driver will walk before giving up with
    /// [`crate::NormalizeError::RecursionDepthExceeded`].
    ///
    /// This is **not** part of the normalizer's documented interface —
    /// cyclic schemas always terminate via the content-addressed `$defs`
    /// table (see [`crate::normalize`]) regardless of this setting, and the
    /// normalizer imposes no depth bound by default. `None` (the default)
    /// means unbounded recursion. Callers embedding this crate on a
    /// stack-constrained platform may opt into a backstop by setting this
    /// to `Some(n)`.
    pub max_depth: Option<usize>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self { max_depth: None }
    }
}
