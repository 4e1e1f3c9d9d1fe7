//! Per-keyword merge algebra: binary combiners computing the semantic
//! intersection of two schemas that both specify a given keyword.
//!
//! Dispatch is table-driven over a [`Keyword`] sum type rather than
//! stringly-typed matching, per this crate's design notes — safer against
//! typos and exhaustive at the call site.
//!
//! `properties` and `prefixItems` are intentionally **not** handled here:
//! their algebra needs access to sibling keywords (`additionalProperties`,
//! `items`) on both operand maps, so [`crate::merger`] special-cases them
//! before falling back to the per-value combiners in this module.

use serde_json::{Map, Value};

use crate::error::NormalizeError;

/// Recognized merge-algebra keywords, with an `Unknown` catch-all for
/// anything not in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyword {
    Type,
    Required,
    MultipleOf,
    Minimum,
    Maximum,
    MinItems,
    MinLength,
    MaxLength,
    Pattern,
    Enum,
    Const,
    Format,
    DependentRequired,
    Deprecated,
    Items,
    /// Handled structurally by [`crate::merger`]; never dispatched here.
    Properties,
    /// Handled structurally by [`crate::merger`]; never dispatched here.
    PrefixItems,
    Unknown(String),
}

impl Keyword {
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "type" => Self::Type,
            "required" => Self::Required,
            "multipleOf" => Self::MultipleOf,
            "minimum" => Self::Minimum,
            "maximum" => Self::Maximum,
            "minItems" => Self::MinItems,
            "minLength" => Self::MinLength,
            "maxLength" => Self::MaxLength,
            "pattern" => Self::Pattern,
            "enum" => Self::Enum,
            "const" => Self::Const,
            "format" => Self::Format,
            "dependentRequired" => Self::DependentRequired,
            "deprecated" => Self::Deprecated,
            "items" => Self::Items,
            "properties" => Self::Properties,
            "prefixItems" => Self::PrefixItems,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Merge two values that both specify keyword `name`, applying the
/// keyword-specific algebra. Called for every keyword **except**
/// `properties` and `prefixItems`, which [`crate::merger`] merges
/// structurally before reaching this function.
pub fn merge_value(name: &str, a: Value, b: Value) -> Result<Value, NormalizeError> {
    match Keyword::parse(name) {
        Keyword::Type => Ok(merge_type(&a, &b)),
        Keyword::Required => Ok(merge_required(&a, &b)),
        Keyword::MultipleOf => Ok(merge_multiple_of(&a, &b)),
        Keyword::Minimum => Ok(merge_numeric(&a, &b, f64::max)),
        Keyword::Maximum => Ok(merge_numeric(&a, &b, f64::min)),
        Keyword::MinItems | Keyword::MinLength => Ok(merge_numeric(&a, &b, f64::max)),
        Keyword::MaxLength => Ok(merge_numeric(&a, &b, f64::min)),
        Keyword::Pattern => Ok(merge_pattern(&a, &b)),
        Keyword::Enum => Ok(merge_enum(a, b)),
        Keyword::Const => Ok(a),
        Keyword::Format | Keyword::DependentRequired => Ok(a),
        Keyword::Deprecated => Ok(merge_deprecated(&a, &b)),
        Keyword::Items => Ok(serde_json::json!({"allOf": [a, b]})),
        Keyword::Properties | Keyword::PrefixItems => {
            unreachable!("merger.rs must intercept '{name}' before calling merge_value")
        }
        Keyword::Unknown(keyword) => Err(NormalizeError::UnmergeableKeyword { keyword }),
    }
}

/// `type`: set intersection of the type list(s). A scalar string is a
/// singleton set. The result is always a JSON array, possibly empty
/// (an empty array means the merged schema is unsatisfiable).
fn merge_type(a: &Value, b: &Value) -> Value {
    let a_set = type_set(a);
    let b_set = type_set(b);
    let mut intersection: Vec<String> = a_set.into_iter().filter(|t| b_set.contains(t)).collect();
    intersection.sort();
    intersection.dedup();
    Value::Array(intersection.into_iter().map(Value::String).collect())
}

fn type_set(v: &Value) -> Vec<String> {
    match v {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// `required`: set union of required property names.
fn merge_required(a: &Value, b: &Value) -> Value {
    let mut names: Vec<String> = a
        .as_array()
        .into_iter()
        .flatten()
        .chain(b.as_array().into_iter().flatten())
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect();
    names.sort();
    names.dedup();
    Value::Array(names.into_iter().map(Value::String).collect())
}

/// `multipleOf`: least common multiple, `|a*b| / gcd(a,b)`, computed over
/// integers when both operands are integral. Non-integer operands keep the
/// left operand (a documented extension of the source's "keep a"
/// placeholder style — the source only ever calls `math.gcd` on ints).
fn merge_multiple_of(a: &Value, b: &Value) -> Value {
    if let (Some(a_int), Some(b_int)) = (as_i64(a), as_i64(b)) {
        let g = gcd(a_int.abs(), b_int.abs());
        if g == 0 {
            return a.clone();
        }
        let lcm = (a_int.abs() * b_int.abs()) / g;
        return Value::Number(lcm.into());
    }
    tracing::warn!("multipleOf merge with non-integer operand(s); keeping left operand");
    a.clone()
}

fn as_i64(v: &Value) -> Option<i64> {
    v.as_i64()
}

fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// Shared numeric-bound merge for `minimum`/`maximum`/`minItems`/
/// `minLength`/`maxLength`, preserving integer-ness when both operands are
/// integers.
fn merge_numeric(a: &Value, b: &Value, combine: impl Fn(f64, f64) -> f64) -> Value {
    let (Some(af), Some(bf)) = (a.as_f64(), b.as_f64()) else {
        return a.clone();
    };
    let result = combine(af, bf);
    let both_integral = a.is_i64() && b.is_i64() || a.is_u64() && b.is_u64();
    if both_integral && result >= 0.0 {
        Value::Number((result as u64).into())
    } else {
        serde_json::Number::from_f64(result)
            .map(Value::Number)
            .unwrap_or_else(|| a.clone())
    }
}

/// `pattern`: textual conjunction `"(a)&(b)"`. Downstream consumers must
/// interpret `&` as intersection; this crate does not attempt to build a
/// regex-intersection AST. Each operand is best-effort validated as a
/// standalone regex (a `tracing::warn!` is emitted, not an error, since an
/// invalid operand doesn't prevent producing the conjunction string).
fn merge_pattern(a: &Value, b: &Value) -> Value {
    let (Some(a_str), Some(b_str)) = (a.as_str(), b.as_str()) else {
        return a.clone();
    };
    for pattern in [a_str, b_str] {
        if let Err(err) = regex::Regex::new(pattern) {
            tracing::warn!(pattern, %err, "pattern operand does not compile as a standalone regex");
        }
    }
    Value::String(format!("({a_str})&({b_str})"))
}

/// `enum`: concatenation `a ++ b` (an under-approximation; duplicates are
/// tolerated, not deduplicated, per spec).
fn merge_enum(a: Value, b: Value) -> Value {
    let mut items = a.as_array().cloned().unwrap_or_default();
    items.extend(b.as_array().cloned().unwrap_or_default());
    Value::Array(items)
}

/// `deprecated`: logical OR.
fn merge_deprecated(a: &Value, b: &Value) -> Value {
    Value::Bool(a.as_bool().unwrap_or(false) || b.as_bool().unwrap_or(false))
}

/// `properties`: per spec §4.2.1.
///
/// For every name in `a`: if `b` also defines it, the result is
/// `{allOf: [a[n], b[n]]}`; else if `b.additionalProperties` is set, the
/// result is `{allOf: [a[n], b.additionalProperties]}`; else `a[n]` as-is.
/// Symmetrically for names only in `b`.
#[must_use]
pub fn merge_properties(a_map: &Map<String, Value>, b_map: &Map<String, Value>) -> Value {
    let empty = Map::new();
    let a_props = a_map
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let b_props = b_map
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let a_additional = a_map.get("additionalProperties");
    let b_additional = b_map.get("additionalProperties");

    let mut result = Map::new();

    for (name, a_schema) in a_props {
        let merged = if let Some(b_schema) = b_props.get(name) {
            serde_json::json!({"allOf": [a_schema, b_schema]})
        } else if let Some(additional) = b_additional {
            serde_json::json!({"allOf": [a_schema, additional]})
        } else {
            a_schema.clone()
        };
        result.insert(name.clone(), merged);
    }

    for (name, b_schema) in b_props {
        if result.contains_key(name) {
            continue;
        }
        let merged = if let Some(additional) = a_additional {
            serde_json::json!({"allOf": [b_schema, additional]})
        } else {
            b_schema.clone()
        };
        result.insert(name.clone(), merged);
    }

    Value::Object(result)
}

/// `prefixItems`: per spec §4.2.2. Extends the shorter `prefixItems` array
/// with its sibling `items` (defaulting to the unconstrained schema) until
/// lengths match, then zips positionally with `allOf`.
#[must_use]
pub fn merge_prefix_items(a_map: &Map<String, Value>, b_map: &Map<String, Value>) -> Value {
    let norm_true = serde_json::json!({});
    let items_a = a_map.get("items").unwrap_or(&norm_true);
    let items_b = b_map.get("items").unwrap_or(&norm_true);
    let mut prefix_a = a_map
        .get("prefixItems")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let mut prefix_b = b_map
        .get("prefixItems")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    while prefix_a.len() < prefix_b.len() {
        prefix_a.push(items_a.clone());
    }
    while prefix_b.len() < prefix_a.len() {
        prefix_b.push(items_b.clone());
    }

    let zipped: Vec<Value> = prefix_a
        .into_iter()
        .zip(prefix_b)
        .map(|(ia, ib)| serde_json::json!({"allOf": [ia, ib]}))
        .collect();

    Value::Array(zipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_type_intersects_scalar_and_list() {
        assert_eq!(
            merge_type(&json!("integer"), &json!(["integer", "string"])),
            json!(["integer"])
        );
    }

    #[test]
    fn merge_type_empty_intersection_is_unsatisfiable() {
        assert_eq!(merge_type(&json!("integer"), &json!("string")), json!([]));
    }

    #[test]
    fn merge_required_unions_and_dedupes() {
        assert_eq!(
            merge_required(&json!(["a", "b"]), &json!(["b", "c"])),
            json!(["a", "b", "c"])
        );
    }

    #[test]
    fn merge_multiple_of_computes_lcm() {
        assert_eq!(merge_multiple_of(&json!(4), &json!(6)), json!(12));
    }

    #[test]
    fn merge_minimum_takes_max() {
        assert_eq!(merge_value("minimum", json!(1), json!(5)).unwrap(), json!(5));
    }

    #[test]
    fn merge_maximum_takes_min() {
        assert_eq!(merge_value("maximum", json!(10), json!(3)).unwrap(), json!(3));
    }

    #[test]
    fn merge_minimum_preserves_float_when_operand_is_float() {
        assert_eq!(
            merge_value("minimum", json!(1.5), json!(2)).unwrap(),
            json!(2.0)
        );
    }

    #[test]
    fn merge_pattern_wraps_conjunction() {
        assert_eq!(
            merge_pattern(&json!("^a"), &json!("b$")),
            json!("(^a)&(b$)")
        );
    }

    #[test]
    fn merge_enum_concatenates_with_duplicates() {
        assert_eq!(
            merge_enum(json!([1, 2]), json!([2, 3])),
            json!([1, 2, 2, 3])
        );
    }

    #[test]
    fn merge_const_keeps_left() {
        assert_eq!(merge_value("const", json!(1), json!(2)).unwrap(), json!(1));
    }

    #[test]
    fn merge_deprecated_is_logical_or() {
        assert_eq!(merge_deprecated(&json!(false), &json!(true)), json!(true));
    }

    #[test]
    fn merge_items_wraps_all_of() {
        assert_eq!(
            merge_value("items", json!({"type": "string"}), json!({"minLength": 1})).unwrap(),
            json!({"allOf": [{"type": "string"}, {"minLength": 1}]})
        );
    }

    #[test]
    fn unknown_keyword_is_unmergeable() {
        let err = merge_value("unknownKeyword", json!(1), json!(2)).unwrap_err();
        assert!(matches!(err, NormalizeError::UnmergeableKeyword { .. }));
    }

    #[test]
    fn merge_properties_follows_asymmetric_table() {
        let a: Map<String, Value> = serde_json::from_value(json!({
            "properties": {"a": {"type": "string"}, "b": {"minLength": 1}},
        }))
        .unwrap();
        let b: Map<String, Value> = serde_json::from_value(json!({
            "properties": {"b": {"maxLength": 5}, "c": {"type": "integer"}},
            "additionalProperties": {"type": "null"},
        }))
        .unwrap();

        let merged = merge_properties(&a, &b);
        assert_eq!(
            merged,
            json!({
                "a": {"allOf": [{"type": "string"}, {"type": "null"}]},
                "b": {"allOf": [{"minLength": 1}, {"maxLength": 5}]},
                "c": {"type": "integer"},
            })
        );
    }

    #[test]
    fn merge_prefix_items_pads_shorter_with_items() {
        let a: Map<String, Value> = serde_json::from_value(json!({
            "prefixItems": [{"type": "string"}],
            "items": {"type": "boolean"},
        }))
        .unwrap();
        let b: Map<String, Value> = serde_json::from_value(json!({
            "prefixItems": [{"minLength": 1}, {"type": "integer"}],
        }))
        .unwrap();

        let merged = merge_prefix_items(&a, &b);
        assert_eq!(
            merged,
            json!([
                {"allOf": [{"type": "string"}, {"minLength": 1}]},
                {"allOf": [{"type": "boolean"}, {"type": "integer"}]},
            ])
        );
    }
}
