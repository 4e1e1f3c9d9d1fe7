//! Schema merger: combines two keyword-maps into their semantic
//! intersection, and combines lists of DNF schemas either by full Cartesian
//! product ([`merge_all`]) or positional zip ([`merge`]/[`merge_simple`]).

use serde_json::{Map, Value};

use crate::error::NormalizeError;
use crate::keywords::{self, Keyword};

/// Merge two sibling keyword-maps (e.g. the two operands of an `allOf`
/// entry) into their semantic intersection, per the per-keyword algebra in
/// [`crate::keywords`].
///
/// `properties` and `prefixItems` are handled structurally first (they
/// need access to each operand's `additionalProperties`/`items`
/// siblings); every other shared keyword is dispatched through
/// [`keywords::merge_value`]. Keywords present on only one side are copied
/// verbatim.
pub fn merge_two(
    mut result: Map<String, Value>,
    to_add: Map<String, Value>,
) -> Result<Map<String, Value>, NormalizeError> {
    if result.contains_key("properties") || to_add.contains_key("properties") {
        result.insert("properties".to_string(), keywords::merge_properties(&result, &to_add));
    }
    if result.contains_key("prefixItems") || to_add.contains_key("prefixItems") {
        result.insert(
            "prefixItems".to_string(),
            keywords::merge_prefix_items(&result, &to_add),
        );
    }

    let is_structural =
        |k: &str| matches!(Keyword::parse(k), Keyword::Properties | Keyword::PrefixItems);

    let shared: Vec<String> = result
        .keys()
        .filter(|k| !is_structural(k) && to_add.contains_key(*k))
        .cloned()
        .collect();
    for key in shared {
        let a = result.remove(&key).expect("key was just observed present");
        let b = to_add.get(&key).expect("key membership checked above").clone();
        result.insert(key.clone(), keywords::merge_value(&key, a, b)?);
    }

    for (key, value) in to_add {
        if is_structural(&key) {
            continue;
        }
        result.entry(key).or_insert(value);
    }

    Ok(result)
}

/// Full Cartesian distribution over a list of `{anyOf: [...]}`-shaped
/// schemas. Starts from a single unconstrained branch and, for each input
/// schema, replaces the running branch list with every pairwise merge of
/// (running branch, input branch). Exact but worst-case exponential in the
/// number of branches.
///
/// # Panics
///
/// Panics (via `assert!`) if `schemas` is empty — callers must not pass an
/// empty list, per this crate's invariant-violation policy (see
/// [`crate::error`]).
pub fn merge_all(schemas: &[Value]) -> Result<Value, NormalizeError> {
    assert!(!schemas.is_empty(), "merge_all requires at least one schema");

    let mut running: Vec<Map<String, Value>> = vec![Map::new()];
    for schema in schemas {
        let branches = any_of_branches(schema);
        if branches.is_empty() {
            continue;
        }
        let mut next = Vec::with_capacity(running.len() * branches.len());
        for base in &running {
            for branch in &branches {
                let branch_map = branch.as_object().cloned().unwrap_or_default();
                next.push(merge_two(base.clone(), branch_map)?);
            }
        }
        running = next;
    }

    Ok(Value::Object(
        [("anyOf".to_string(), Value::Array(running.into_iter().map(Value::Object).collect()))]
            .into_iter()
            .collect(),
    ))
}

/// Positional zip over a list of `{anyOf: [...]}`-shaped schemas: branch
/// `i` of the result merges `schemas[k].anyOf[i mod len(schemas[k].anyOf)]`
/// across all `k`. Linear but strictly weaker than [`merge_all`] — this is
/// what [`crate::normalizer`] uses for performance, matching the source.
pub fn merge(schemas: &[Value]) -> Result<Value, NormalizeError> {
    merge_simple(schemas)
}

/// See [`merge`].
///
/// # Panics
///
/// Panics (via `assert!`) if `schemas` is empty.
pub fn merge_simple(schemas: &[Value]) -> Result<Value, NormalizeError> {
    assert!(!schemas.is_empty(), "merge requires at least one schema");

    let branch_lists: Vec<Vec<Value>> = schemas.iter().map(any_of_branches).collect();
    let count = branch_lists.iter().map(Vec::len).max().unwrap_or(0);

    let mut results = Vec::with_capacity(count);
    for idx in 0..count {
        let mut acc = Map::new();
        for branches in &branch_lists {
            if branches.is_empty() {
                continue;
            }
            let option = branches[idx % branches.len()].as_object().cloned().unwrap_or_default();
            acc = merge_two(acc, option)?;
        }
        results.push(Value::Object(acc));
    }

    Ok(Value::Object(
        [("anyOf".to_string(), Value::Array(results))].into_iter().collect(),
    ))
}

fn any_of_branches(schema: &Value) -> Vec<Value> {
    schema
        .get("anyOf")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}
