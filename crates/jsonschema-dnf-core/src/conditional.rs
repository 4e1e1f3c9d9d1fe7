//! Conditional simplifier: rewrites `if`/`then`/`else` into `allOf`/`not`
//! form via the standard JSON Schema implication equivalence.
//!
//! `(IF → THEN) ∧ (¬IF → ELSE)` is logically equivalent to
//! `(IF ∧ THEN) ∨ (¬IF ∧ ELSE)` — see
//! <https://json-schema.org/understanding-json-schema/reference/conditionals.html#implication>.

use serde_json::{Map, Value};

/// Rewrite `if`/`then`/`else` out of `schema`, returning an equivalent
/// schema.
///
/// - If none of `if`/`then`/`else` are present, `schema` is returned
///   unchanged (including any other logical keywords it carries — those
///   are the caller's concern).
/// - If `if` is missing (even when `then`/`else` are present, which is
///   meaningless per the JSON Schema spec but tolerated here), the result
///   is the unconstrained schema `{anyOf: [{}]}`.
/// - Otherwise the result is `{anyOf: [branch_else, branch_then]}` with
///   `branch_then = {allOf: [side, IF, THEN]}` and
///   `branch_else = {allOf: [side, {not: IF}, ELSE]}`, where `side` is
///   `schema` with `if`/`then`/`else` removed (all other keywords —
///   including `allOf`/`anyOf`/`oneOf`/`properties` — are preserved in
///   `side` and de-sugared by the caller's subsequent recursion).
/// - Missing `then`/`else` each default to the unconstrained schema
///   `true`.
#[must_use]
pub fn simplify_if_then_else(schema: &Map<String, Value>) -> Value {
    if !schema.contains_key("if") && !schema.contains_key("then") && !schema.contains_key("else") {
        return Value::Object(schema.clone());
    }

    let mut side = schema.clone();
    let if_schema = side.remove("if");
    let then_schema = side.remove("then").unwrap_or(Value::Bool(true));
    let else_schema = side.remove("else").unwrap_or(Value::Bool(true));
    let side = Value::Object(side);

    let Some(if_schema) = if_schema else {
        return serde_json::json!({"anyOf": [{}]});
    };

    let else_branch = serde_json::json!({
        "allOf": [side.clone(), {"not": if_schema.clone()}, else_schema]
    });
    let then_branch = serde_json::json!({
        "allOf": [side, if_schema, then_schema]
    });

    serde_json::json!({"anyOf": [else_branch, then_branch]})
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(v: Value) -> Map<String, Value> {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn no_conditional_keywords_is_unchanged() {
        let schema = as_map(json!({"type": "string"}));
        assert_eq!(simplify_if_then_else(&schema), json!({"type": "string"}));
    }

    #[test]
    fn missing_if_yields_unconstrained_schema() {
        let schema = as_map(json!({"then": {"minLength": 1}}));
        assert_eq!(simplify_if_then_else(&schema), json!({"anyOf": [{}]}));
    }

    #[test]
    fn full_if_then_else_produces_two_branches() {
        let schema = as_map(json!({
            "if": {"type": "string"},
            "then": {"minLength": 1},
            "else": {"minimum": 0},
        }));
        let result = simplify_if_then_else(&schema);
        let branches = result["anyOf"].as_array().unwrap();
        assert_eq!(branches.len(), 2);
        assert_eq!(
            branches[0],
            json!({"allOf": [{}, {"not": {"type": "string"}}, {"minimum": 0}]})
        );
        assert_eq!(
            branches[1],
            json!({"allOf": [{}, {"type": "string"}, {"minLength": 1}]})
        );
    }

    #[test]
    fn missing_then_and_else_default_to_true() {
        let schema = as_map(json!({"if": {"type": "string"}}));
        let result = simplify_if_then_else(&schema);
        let branches = result["anyOf"].as_array().unwrap();
        assert_eq!(branches[0]["allOf"][2], json!(true));
        assert_eq!(branches[1]["allOf"][2], json!(true));
    }

    #[test]
    fn side_schema_preserves_other_keywords() {
        let schema = as_map(json!({
            "if": {"type": "string"},
            "then": {"minLength": 1},
            "properties": {"a": {"type": "integer"}},
        }));
        let result = simplify_if_then_else(&schema);
        let branches = result["anyOf"].as_array().unwrap();
        assert_eq!(
            branches[1]["allOf"][0],
            json!({"properties": {"a": {"type": "integer"}}})
        );
    }
}
