//! Declarative shapes for JSON values.
//!
//! Declare the expected shape of a value with a small vocabulary (primitive
//! tags, arrays, open objects, unions, nullables, `Any`, `Bottom`, custom
//! predicates), then check runtime values against it or synthesize a
//! default value that satisfies it.
//!
//! ```
//! use json_shape::{Descriptor, Prim, Schema};
//! use serde_json::json;
//!
//! let user = Schema::new(Descriptor::object([
//!     ("name", Descriptor::from(Prim::String)),
//!     ("nick", Schema::nullable([Prim::String]).into()),
//!     ("tags", Descriptor::array_of(Prim::String)),
//! ]));
//!
//! user.validate(&json!({"name": "ada", "nick": null, "tags": []}), true).unwrap();
//! assert!(user.validate(&json!({"name": 1}), false).is_err());
//! assert_eq!(user.declare_value().unwrap(), json!({"name": "", "nick": null, "tags": []}));
//! ```
pub mod declval;
pub mod descriptor;
pub mod error;
pub mod matcher;
pub mod notation;
pub mod path_de;
pub mod schema;
pub mod schema_doc;

pub use descriptor::{Descriptor, Prim};
pub use error::Violation;
pub use notation::NotationError;
pub use schema::{Options, Predicate, Schema, Supplier};
pub use schema_doc::SchemaDoc;

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_of_numbers() {
        let s = Schema::new(Descriptor::array_of(Prim::Number));
        s.validate(&json!([1, 2, 3]), false).unwrap();
        assert!(matches!(s.validate(&json!({}), false), Err(Violation::NotAnArray { .. })));
    }

    #[test]
    fn absent_field_is_lenient_by_default() {
        let s = Schema::new(Descriptor::object([("name", Prim::String)]));
        let v = json!({});
        s.validate(&v, false).unwrap();
        assert!(matches!(s.validate(&v, true), Err(Violation::MissingValue { .. })));
    }

    #[test]
    fn union_rejects_what_no_member_accepts() {
        let s = Schema::new(Schema::union([Prim::Number, Prim::String]));
        assert!(matches!(s.validate(&json!(true), false), Err(Violation::UnionMismatch { .. })));
    }

    #[test]
    fn nullable_declares_null() {
        let s = Schema::new(Schema::nullable([Prim::Number]));
        assert_eq!(s.declare_value().unwrap(), json!(null));
    }

    #[test]
    fn declared_values_always_validate() {
        let s = Schema::new(Descriptor::object([
            ("a", Descriptor::from(Prim::Number)),
            ("b", Descriptor::object([("c", Descriptor::from(Prim::String)), ("d", Descriptor::Null)])),
            ("u", Schema::union([Prim::Boolean, Prim::Number]).into()),
            ("any", Schema::any().into()),
            ("xs", Descriptor::array_of(Schema::nullable([Prim::String]))),
        ]));
        let v = s.declare_value().unwrap();
        assert_eq!(v, json!({"a": 0, "b": {"c": "", "d": null}, "u": false, "any": null, "xs": []}));
        s.validate(&v, true).unwrap();
    }
}
