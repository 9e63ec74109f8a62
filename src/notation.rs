// src/notation.rs
//! Shape notation: descriptors written as plain JSON.
//!
//! ```text
//! null                          exactly null
//! "string" | "number" | "boolean"
//! "any" | "never"               universal / uninhabited
//! [ <shape> ]                   array whose elements all match <shape>
//! { "$union": [<shape>, ...] }  one of
//! { "$nullable": [<shape>, ...] }
//! { "field": <shape>, ... }     open object shape, document order kept
//! ```
use serde_json::{Map, Value};
use thiserror::Error;

use crate::descriptor::{Descriptor, Prim};
use crate::schema::Schema;

const UNION_KEY: &str = "$union";
const NULLABLE_KEY: &str = "$nullable";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid shape at {}: {reason}", at(.path))]
pub struct NotationError {
    /// JSON Pointer into the notation document.
    pub path: String,
    pub reason: String,
}

pub fn parse(v: &Value) -> Result<Descriptor, NotationError> {
    parse_at(v, "")
}

fn parse_at(v: &Value, path: &str) -> Result<Descriptor, NotationError> {
    match v {
        Value::Null => Ok(Descriptor::Null),
        Value::String(name) => parse_name(name).ok_or_else(|| NotationError {
            path: path.to_string(),
            reason: format!("unknown type name `{name}`"),
        }),
        Value::Array(xs) => match xs.as_slice() {
            [item] => Ok(Descriptor::array_of(parse_at(item, &child(path, "0"))?)),
            _ => Err(NotationError {
                path: path.to_string(),
                reason: format!("array shape takes exactly one element, found {}", xs.len()),
            }),
        },
        Value::Object(map) => parse_object(map, path),
        Value::Bool(_) | Value::Number(_) => Err(NotationError {
            path: path.to_string(),
            reason: format!("expected a type name, array, object or null, found {v}"),
        }),
    }
}

fn parse_name(name: &str) -> Option<Descriptor> {
    let d: Descriptor = match name {
        "string" | "String" => Prim::String.into(),
        "number" | "Number" => Prim::Number.into(),
        "boolean" | "Boolean" => Prim::Boolean.into(),
        "any" | "Any" => Schema::any().into(),
        "never" | "bottom" | "Bottom" => Schema::bottom().into(),
        _ => return None,
    };
    Some(d)
}

fn parse_object(map: &Map<String, Value>, path: &str) -> Result<Descriptor, NotationError> {
    for key in [UNION_KEY, NULLABLE_KEY] {
        let Some(members) = map.get(key) else { continue };
        if map.len() > 1 {
            return Err(NotationError {
                path: path.to_string(),
                reason: format!("`{key}` must be the only key of its object"),
            });
        }
        let members = parse_members(members, &child(path, key))?;
        let schema = if key == UNION_KEY {
            Schema::union(members)
        } else {
            Schema::nullable(members)
        };
        return Ok(schema.into());
    }

    let fields = map
        .iter()
        .map(|(k, sub)| Ok((k.clone(), parse_at(sub, &child(path, k))?)))
        .collect::<Result<Vec<_>, NotationError>>()?;
    Ok(Descriptor::object(fields))
}

fn parse_members(v: &Value, path: &str) -> Result<Vec<Descriptor>, NotationError> {
    let Value::Array(xs) = v else {
        return Err(NotationError {
            path: path.to_string(),
            reason: format!("combinator members must be an array, found {v}"),
        });
    };
    xs.iter()
        .enumerate()
        .map(|(i, x)| parse_at(x, &child(path, &i.to_string())))
        .collect()
}

// RFC 6901 escaping
fn child(path: &str, token: &str) -> String {
    format!("{path}/{}", token.replace('~', "~0").replace('/', "~1"))
}

fn at(path: &str) -> &str {
    if path.is_empty() { "<root>" } else { path }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_the_full_vocabulary() {
        let d = parse(&json!({
            "name": "string",
            "age": "Number",
            "admin": "boolean",
            "tags": ["string"],
            "meta": "any",
            "gone": null,
            "id": {"$union": ["number", "string"]},
            "nick": {"$nullable": ["string"]},
        }))
        .unwrap();
        assert_eq!(
            d.to_string(),
            "{ name: String, age: Number, admin: Boolean, tags: [String], meta: Any, gone: null, \
             id: Union(Number | String), nick: Union(null | String) }"
        );
        assert!(parse(&json!("never")).unwrap().is_bottom());
    }

    #[test]
    fn parsed_shapes_validate_like_hand_built_ones() {
        let schema = Schema::new(parse(&json!({"xs": ["number"], "who": {"$nullable": [{"n": "string"}]}})).unwrap());
        schema.validate(&json!({"xs": [1, 2], "who": null}), false).unwrap();
        schema.validate(&json!({"xs": [], "who": {"n": "a"}}), false).unwrap();
        assert!(schema.validate(&json!({"xs": ["1"]}), false).is_err());
        assert!(schema.validate(&json!({"who": {"n": 1}}), false).is_err());
        assert_eq!(schema.declare_value().unwrap(), json!({"xs": [], "who": null}));
    }

    #[test]
    fn errors_point_at_the_offending_node() {
        let err = parse(&json!({"a": {"b/c": ["strng"]}})).unwrap_err();
        assert_eq!(err.path, "/a/b~1c/0");
        assert!(err.reason.contains("strng"));

        let err = parse(&json!(["number", "string"])).unwrap_err();
        assert_eq!(err.path, "");
        assert_eq!(err.to_string(), "invalid shape at <root>: array shape takes exactly one element, found 2");

        let err = parse(&json!({"x": 3})).unwrap_err();
        assert_eq!(err.path, "/x");

        let err = parse(&json!({"$union": "number"})).unwrap_err();
        assert_eq!(err.path, "/$union");

        let err = parse(&json!({"$nullable": ["number", true]})).unwrap_err();
        assert_eq!(err.path, "/$nullable/1");
    }

    #[test]
    fn combinator_keys_must_stand_alone() {
        let err = parse(&json!({"$union": ["number"], "extra": "string"})).unwrap_err();
        assert!(err.reason.contains("only key"));
    }

    #[test]
    fn empty_union_parses_but_is_uninhabited() {
        let d = parse(&json!({"$union": []})).unwrap();
        assert!(Schema::new(d).declare_value().is_err());
    }
}
