//! Canonical normal-form constants (spec §3).

use serde_json::Value;

/// The unsatisfiable schema in normal form: a single branch whose `type`
/// intersects to the empty set.
#[must_use]
pub fn norm_false() -> Value {
    serde_json::json!({"anyOf": [{"type": []}]})
}

/// The unconstrained schema in normal form: a single empty branch.
#[must_use]
pub fn norm_true() -> Value {
    serde_json::json!({"anyOf": [{}]})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn norm_false_has_unsatisfiable_type() {
        assert_eq!(norm_false(), serde_json::json!({"anyOf": [{"type": []}]}));
    }

    #[test]
    fn norm_true_has_single_empty_branch() {
        assert_eq!(norm_true(), serde_json::json!({"anyOf": [{}]}));
    }
}
