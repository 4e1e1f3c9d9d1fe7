//! Well-formedness checker: verifies that a schema actually is in the
//! restricted disjunctive normal form this crate produces.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::NormalizeError;
use crate::pointer::JsonPointer;

const DISALLOWED_IN_BRANCH: &[&str] = &["anyOf", "allOf", "oneOf", "not", "if", "then", "else"];

/// Check that `schema` is a well-formed normal-form schema per this crate's
/// grammar (see [`crate::normalize`]'s invariants).
///
/// # Errors
///
/// Returns [`NormalizeError::MalformedNormalForm`] on the first violation
/// found. `$ref` targets are resolved against `schema` itself (the whole
/// normalized document, `$defs` included) and checked once each — a
/// visited-ref set guards against infinite recursion through cyclic
/// `$defs`.
pub fn check_normalized(schema: &Value) -> Result<(), NormalizeError> {
    let mut visited = HashSet::new();
    check_normalized_inner(schema, schema, &mut visited, "#")
}

fn check_normalized_inner(
    schema: &Value,
    root: &Value,
    visited: &mut HashSet<String>,
    path: &str,
) -> Result<(), NormalizeError> {
    let Value::Object(map) = schema else {
        return Err(NormalizeError::MalformedNormalForm {
            path: path.to_string(),
            reason: format!("must be an object, got {schema}"),
        });
    };

    let keys: Vec<&String> = map
        .keys()
        .filter(|k| k.as_str() != "$schema" && k.as_str() != "$defs")
        .collect();
    if keys.len() != 1 || keys[0] != "anyOf" {
        return Err(NormalizeError::MalformedNormalForm {
            path: path.to_string(),
            reason: format!("expected exactly one key 'anyOf', got {keys:?}"),
        });
    }

    let Some(Value::Array(any_of)) = map.get("anyOf") else {
        return Err(NormalizeError::MalformedNormalForm {
            path: path.to_string(),
            reason: "anyOf must be an array".to_string(),
        });
    };

    for (idx, branch) in any_of.iter().enumerate() {
        let branch_path = crate::pointer::build_path(path, &["anyOf", &idx.to_string()]);
        let Value::Object(branch_map) = branch else {
            return Err(NormalizeError::MalformedNormalForm {
                path: branch_path,
                reason: format!("branch must be an object, got {branch}"),
            });
        };

        for disallowed in DISALLOWED_IN_BRANCH {
            if branch_map.contains_key(*disallowed) {
                return Err(NormalizeError::MalformedNormalForm {
                    path: branch_path,
                    reason: format!("'{disallowed}' not allowed in a normalized branch"),
                });
            }
        }

        if let Some(ref_value) = branch_map.get("$ref") {
            if branch_map.len() != 1 {
                return Err(NormalizeError::MalformedNormalForm {
                    path: branch_path,
                    reason: "a $ref branch must carry no other keys".to_string(),
                });
            }
            let ref_str = ref_value.as_str().ok_or_else(|| NormalizeError::MalformedNormalForm {
                path: branch_path.clone(),
                reason: "$ref must be a string".to_string(),
            })?;
            if visited.insert(ref_str.to_string()) {
                let pointer = JsonPointer::parse(ref_str);
                let referent = pointer.lookup(root)?;
                check_normalized_inner(referent, root, visited, &branch_path)?;
            }
            continue;
        }

        for kw in ["additionalProperties", "items", "additionalItems"] {
            if let Some(sub) = branch_map.get(kw) {
                let sub_path = crate::pointer::build_path(&branch_path, &[kw]);
                check_normalized_inner(sub, root, visited, &sub_path)?;
            }
        }

        if let Some(Value::Object(props)) = branch_map.get("properties") {
            for (name, sub) in props {
                let sub_path = crate::pointer::build_path(&branch_path, &["properties", name]);
                check_normalized_inner(sub, root, visited, &sub_path)?;
            }
        }

        if let Some(Value::Array(items)) = branch_map.get("prefixItems") {
            for (item_idx, sub) in items.iter().enumerate() {
                let sub_path = crate::pointer::build_path(&branch_path, &["prefixItems", &item_idx.to_string()]);
                check_normalized_inner(sub, root, visited, &sub_path)?;
            }
        }
    }

    Ok(())
}
