//! Reference inliner: substitutes `$ref` with its referent wrapped in
//! `allOf` against the sibling keywords, and canonicalizes boolean
//! schemas to their normal-form constants.

use serde_json::{Map, Value};

use crate::constants::{norm_false, norm_true};
use crate::error::NormalizeError;
use crate::pointer::JsonPointer;

/// Inline every `$ref` reachable from `schema` (recursing through `anyOf`,
/// `allOf`, `oneOf`, and `not`), resolving pointers against `root`.
///
/// Returns the rewritten schema and whether any `$ref` was inlined
/// anywhere in the tree (the "contains refs" flag the driver uses to
/// decide whether to register the result in the `$defs` table).
///
/// Boolean schemas are canonicalized to [`norm_false`]/[`norm_true`].
/// Faithfully to the source this rewrite is based on, canonicalizing
/// `true` reports `contains_refs = true` even though no `$ref` was
/// literally inlined — this keeps the cycle-breaking fingerprint table
/// (see [`crate::normalizer`]) consistent for schemas that bottom out at
/// an unconstrained leaf reached through a reference chain.
pub fn inline_refs(schema: &Value, root: &Value) -> Result<(Value, bool), NormalizeError> {
    match schema {
        Value::Bool(false) => Ok((norm_false(), false)),
        Value::Bool(true) => Ok((norm_true(), true)),
        Value::Object(map) => inline_refs_object(map, root),
        other => Err(NormalizeError::NotAnObject {
            kind: describe_kind(other),
        }),
    }
}

fn inline_refs_object(map: &Map<String, Value>, root: &Value) -> Result<(Value, bool), NormalizeError> {
    let mut map = map.clone();
    let mut contains_refs = false;

    let mut working = if let Some(ref_value) = map.remove("$ref") {
        let ref_str = ref_value.as_str().ok_or_else(|| NormalizeError::UnresolvedRef {
            path: "$ref".to_string(),
            reference: ref_value.to_string(),
        })?;
        let pointer = JsonPointer::parse(ref_str);
        let referent = pointer.lookup(root)?.clone();
        let side = Value::Object(map);
        contains_refs = true;
        serde_json::json!({"allOf": [side, referent]})
    } else {
        Value::Object(map)
    };

    if let Value::Object(ref mut wmap) = working {
        for keyword in ["anyOf", "allOf", "oneOf"] {
            if let Some(Value::Array(items)) = wmap.get_mut(keyword) {
                for item in items.iter_mut() {
                    let (inlined, refs) = inline_refs(item, root)?;
                    *item = inlined;
                    contains_refs = contains_refs || refs;
                }
            }
        }
        if let Some(not_schema) = wmap.get_mut("not") {
            let (inlined, refs) = inline_refs(not_schema, root)?;
            *not_schema = inlined;
            contains_refs = contains_refs || refs;
        }
    }

    Ok((working, contains_refs))
}

fn describe_kind(v: &Value) -> String {
    match v {
        Value::Null => "null".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Array(_) => "array".to_string(),
        Value::Bool(_) | Value::Object(_) => unreachable!("handled by caller"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inlines_bare_ref() {
        let root = json!({"$defs": {"Foo": {"type": "string"}}});
        let schema = json!({"$ref": "#/$defs/Foo"});
        let (result, refs) = inline_refs(&schema, &root).unwrap();
        assert!(refs);
        assert_eq!(result, json!({"allOf": [{}, {"type": "string"}]}));
    }

    #[test]
    fn inlines_ref_with_siblings_as_allof() {
        let root = json!({"$defs": {"Foo": {"type": "string"}}});
        let schema = json!({"$ref": "#/$defs/Foo", "minLength": 1});
        let (result, refs) = inline_refs(&schema, &root).unwrap();
        assert!(refs);
        assert_eq!(result, json!({"allOf": [{"minLength": 1}, {"type": "string"}]}));
    }

    #[test]
    fn recurses_into_any_of_all_of_one_of_not() {
        let root = json!({"$defs": {"Foo": {"type": "string"}}});
        let schema = json!({
            "anyOf": [{"$ref": "#/$defs/Foo"}],
            "not": {"$ref": "#/$defs/Foo"},
        });
        let (result, refs) = inline_refs(&schema, &root).unwrap();
        assert!(refs);
        assert_eq!(result["anyOf"][0], json!({"allOf": [{}, {"type": "string"}]}));
        assert_eq!(result["not"], json!({"allOf": [{}, {"type": "string"}]}));
    }

    #[test]
    fn no_ref_present_round_trips() {
        let root = json!({});
        let schema = json!({"type": "integer"});
        let (result, refs) = inline_refs(&schema, &root).unwrap();
        assert!(!refs);
        assert_eq!(result, schema);
    }

    #[test]
    fn boolean_true_canonicalizes_and_reports_refs() {
        let (result, refs) = inline_refs(&json!(true), &json!({})).unwrap();
        assert!(refs);
        assert_eq!(result, json!({"anyOf": [{}]}));
    }

    #[test]
    fn boolean_false_canonicalizes_without_refs() {
        let (result, refs) = inline_refs(&json!(false), &json!({})).unwrap();
        assert!(!refs);
        assert_eq!(result, json!({"anyOf": [{"type": []}]}));
    }

    #[test]
    fn unresolved_ref_is_an_error() {
        let root = json!({});
        let schema = json!({"$ref": "#/$defs/Missing"});
        let err = inline_refs(&schema, &root).unwrap_err();
        assert!(matches!(err, NormalizeError::UnresolvedRef { .. }));
    }
}
