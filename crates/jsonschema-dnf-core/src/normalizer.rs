//! The normalizer driver: ties the inliner, DNF rewriter, and fingerprint
//! table together into a cycle-safe recursive descent over the whole
//! schema tree, plus the public [`normalize`] entry point.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::config::NormalizeOptions;
use crate::constants::{norm_false, norm_true};
use crate::dnf::to_dnf;
use crate::error::NormalizeError;
use crate::fingerprint::{fingerprint, Fingerprint};
use crate::inliner::inline_refs;

/// Table of DNF schemas registered under their content fingerprint, used
/// both to break recursion cycles and as the final `$defs` map attached to
/// the top-level output.
pub type RefTable = HashMap<Fingerprint, Value>;

/// Normalize an arbitrary JSON Schema into disjunctive normal form.
///
/// - `false` becomes `{"type": []}` — an inline sentinel distinct from the
///   internal [`crate::constants::norm_false`] used during recursion.
/// - `true` becomes `{}`.
/// - Otherwise, `$schema` and `$defs` are stripped from a shallow copy, the
///   tree is recursively normalized with an empty reference table, and the
///   accumulated table is reattached as the output's `$defs` (with
///   `$schema` reattached too, if the input carried one).
#[instrument(skip(schema, options), fields(max_depth = ?options.max_depth))]
pub fn normalize(schema: &Value, options: &NormalizeOptions) -> Result<Value, NormalizeError> {
    match schema {
        Value::Bool(false) => return Ok(serde_json::json!({"type": []})),
        Value::Bool(true) => return Ok(serde_json::json!({})),
        Value::Object(_) => {}
        other => {
            return Err(NormalizeError::NotAnObject {
                kind: describe_kind(other),
            })
        }
    }

    let map = schema.as_object().expect("matched Object above");
    let mut stripped = map.clone();
    let carried_dollar_schema = stripped.remove("$schema");
    stripped.remove("$defs");

    let mut refs = RefTable::new();
    let mut new_schema = normalize_inner(&Value::Object(stripped), schema, &mut refs, options, 0, "#")?;

    if let Value::Object(ref mut out) = new_schema {
        if let Some(dollar_schema) = carried_dollar_schema {
            out.insert("$schema".to_string(), dollar_schema);
        }
        out.insert(
            "$defs".to_string(),
            Value::Object(refs.into_iter().collect::<Map<_, _>>()),
        );
    }

    Ok(new_schema)
}

/// Recursively normalize `schema` (resolving `$ref` against `root`),
/// threading the fingerprint-keyed reference table through every recursive
/// position — including `prefixItems`, where the source algorithm this was
/// distilled from drops the table (a documented bug fixed here).
fn normalize_inner(
    schema: &Value,
    root: &Value,
    refs: &mut RefTable,
    options: &NormalizeOptions,
    depth: usize,
    path: &str,
) -> Result<Value, NormalizeError> {
    if let Some(max_depth) = options.max_depth {
        if depth > max_depth {
            return Err(NormalizeError::RecursionDepthExceeded {
                path: path.to_string(),
                max_depth,
            });
        }
    }

    match schema {
        Value::Bool(false) => return Ok(norm_false()),
        Value::Bool(true) => return Ok(norm_true()),
        Value::Object(_) => {}
        other => {
            return Err(NormalizeError::NotAnObject {
                kind: describe_kind(other),
            })
        }
    }

    let key = fingerprint(schema);
    if refs.contains_key(&key) {
        debug!(path, fingerprint = %key, "cycle detected, emitting $ref");
        return Ok(serde_json::json!({"anyOf": [{"$ref": format!("#/$defs/{key}")}]}));
    }

    let (inlined, contains_refs) = inline_refs(schema, root)?;
    if contains_refs {
        debug!(path, fingerprint = %key, "refs inlined, registering in $defs");
    }

    let mut result = to_dnf(&inlined)?;

    // Register a placeholder under `key` *before* recursing into sub-schemas,
    // mirroring the source's `new_refs[new_ref_name] = result` placement: a
    // cyclic sub-schema encountered during the loop below must see this
    // entry to break the recursion. The source then relies on Python's
    // reference semantics (`result`'s nested dicts are mutated in place, so
    // the table entry reflects the final normalized tree for free); Rust has
    // no such aliasing, so the entry is explicitly refreshed with the fully
    // normalized `result` once the loop below completes.
    if contains_refs {
        refs.insert(key.clone(), result.clone());
    }

    if let Value::Array(branches) = result
        .get_mut("anyOf")
        .expect("to_dnf always produces an anyOf-shaped value")
    {
        for (idx, branch) in branches.iter_mut().enumerate() {
            let Value::Object(branch_map) = branch else {
                continue;
            };

            for kw in ["additionalProperties", "items", "additionalItems"] {
                if let Some(sub) = branch_map.get(kw).cloned() {
                    let sub_path = crate::pointer::build_path(path, &[&idx.to_string(), kw]);
                    let normalized = normalize_inner(&sub, root, refs, options, depth + 1, &sub_path)?;
                    branch_map.insert(kw.to_string(), normalized);
                }
            }

            if let Some(Value::Object(props)) = branch_map.get_mut("properties") {
                let names: Vec<String> = props.keys().cloned().collect();
                for name in names {
                    let sub = props.get(&name).cloned().expect("key just observed present");
                    let sub_path = crate::pointer::build_path(path, &[&idx.to_string(), "properties", &name]);
                    let normalized = normalize_inner(&sub, root, refs, options, depth + 1, &sub_path)?;
                    props.insert(name, normalized);
                }
            }

            if let Some(Value::Array(items)) = branch_map.get_mut("prefixItems") {
                for (item_idx, item) in items.iter_mut().enumerate() {
                    let sub_path =
                        crate::pointer::build_path(path, &[&idx.to_string(), "prefixItems", &item_idx.to_string()]);
                    let normalized = normalize_inner(item, root, refs, options, depth + 1, &sub_path)?;
                    *item = normalized;
                }
            }
        }
    }

    if contains_refs {
        refs.insert(key.clone(), result);
        Ok(serde_json::json!({"anyOf": [{"$ref": format!("#/$defs/{key}")}]}))
    } else {
        Ok(result)
    }
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
