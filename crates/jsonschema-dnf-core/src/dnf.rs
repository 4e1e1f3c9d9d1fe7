//! DNF rewriter: hoists `allOf`/`oneOf`/`not`/`if-then-else` out of a
//! `$ref`-free schema, leaving only a top-level `anyOf` of leaf maps.

use serde_json::{Map, Value};

use crate::conditional::simplify_if_then_else;
use crate::constants::norm_true;
use crate::error::NormalizeError;
use crate::merger::merge;

/// Logical negation of an already-in-normal-form schema.
///
/// This is an identity stub: the normal-form grammar this crate targets has
/// no general complement operation (negating a disjunction of conjunctions
/// of keyword constraints is not itself expressible as a flat DNF without a
/// further, keyword-aware De Morgan expansion). Schemas that embed `not`
/// around a non-trivial sub-schema pass through unchanged rather than being
/// refused; downstream consumers that need true negation support must
/// special-case `not` themselves. This mirrors a documented limitation of
/// the normalizer this crate's algebra was distilled from.
#[must_use]
pub fn invert(schema: &Value) -> Value {
    schema.clone()
}

/// Rewrite `schema` (assumed `$ref`-free, i.e. already passed through
/// [`crate::inliner::inline_refs`]) into disjunctive normal form: a single
/// top-level `{anyOf: [...]}` whose branches carry no `allOf`/`oneOf`/`not`/
/// `if`/`then`/`else`.
pub fn to_dnf(schema: &Value) -> Result<Value, NormalizeError> {
    let map = match schema {
        Value::Object(map) => map.clone(),
        Value::Bool(true) => return Ok(norm_true()),
        Value::Bool(false) => return Ok(crate::constants::norm_false()),
        other => {
            return Err(NormalizeError::NotAnObject {
                kind: describe_kind(other),
            })
        }
    };

    let conditional_free = match simplify_if_then_else(&map) {
        Value::Object(m) => m,
        other => return Ok(other),
    };

    dnf_from_map(conditional_free)
}

fn dnf_from_map(map: Map<String, Value>) -> Result<Value, NormalizeError> {
    // any_ofs: flatten each `anyOf` child's branches and concatenate (union).
    let any_ofs = if let Some(Value::Array(items)) = map.get("anyOf") {
        let mut branches = Vec::new();
        for item in items {
            let normalized = to_dnf(item)?;
            if let Value::Array(sub_branches) = normalized["anyOf"].clone() {
                branches.extend(sub_branches);
            }
        }
        branches
    } else {
        vec![Value::Object(Map::new())]
    };

    // one_ofs: for each child, merge it against the (stub-)inverted siblings
    // and concatenate every resulting branch — an over-approximation of
    // exactly-one-of, not a true exclusive disjunction (see [`invert`]).
    let one_ofs = if let Some(Value::Array(items)) = map.get("oneOf") {
        let normalized: Vec<Value> = items.iter().map(to_dnf).collect::<Result<_, _>>()?;
        let mut branches = Vec::new();
        for idx in 0..normalized.len() {
            let operands: Vec<Value> = normalized
                .iter()
                .enumerate()
                .map(|(j, s)| if j == idx { invert(s) } else { s.clone() })
                .collect();
            let merged = merge(&operands)?;
            if let Value::Array(sub_branches) = merged["anyOf"].clone() {
                branches.extend(sub_branches);
            }
        }
        branches
    } else {
        vec![Value::Object(Map::new())]
    };

    // all_ofs: start from the side schema (logical keywords stripped — `not`
    // is dropped here and never processed further, matching this algebra's
    // documented inability to compute negation of an arbitrary schema), then
    // fold in each `allOf` child's DNF via the same merge used elsewhere.
    let all_of_children = map.get("allOf").and_then(Value::as_array).cloned();
    let mut side = map;
    for logical in ["allOf", "anyOf", "oneOf", "not"] {
        side.remove(logical);
    }
    let mut all_ofs_factors = vec![serde_json::json!({"anyOf": [Value::Object(side)]})];
    if let Some(items) = all_of_children {
        for item in &items {
            all_ofs_factors.push(to_dnf(item)?);
        }
    }
    let all_ofs = merge(&all_ofs_factors)?;

    merge(&[serde_json::json!({"anyOf": any_ofs}), serde_json::json!({"anyOf": one_ofs}), all_ofs])
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
