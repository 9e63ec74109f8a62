//! Declared (zero) values: the smallest value of the right shape.
use serde_json::{Map, Value};
use tracing::debug;

use crate::descriptor::{Descriptor, Prim};
use crate::error::Violation;

pub fn synthesize(desc: &Descriptor) -> Result<Value, Violation> {
    match desc {
        Descriptor::Null => Ok(Value::Null),
        Descriptor::Schema(schema) => schema.declare_value(),
        Descriptor::Prim(prim) => Ok(zero_of(*prim)),
        // never synthesizes elements
        Descriptor::ArrayOf(_) => Ok(Value::Array(Vec::new())),
        Descriptor::Object(fields) => {
            let mut out = Map::with_capacity(fields.len());
            for (name, sub) in fields {
                let value = synthesize(sub).inspect_err(|error| {
                    debug!(field = %name, %error, "field has no declarable value");
                })?;
                out.insert(name.clone(), value);
            }
            Ok(Value::Object(out))
        }
    }
}

pub fn zero_of(prim: Prim) -> Value {
    match prim {
        Prim::String => Value::String(String::new()),
        Prim::Number => Value::from(0),
        Prim::Boolean => Value::Bool(false),
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::check;
    use crate::schema::Schema;
    use serde_json::json;

    #[test]
    fn primitives_declare_their_zero() {
        assert_eq!(synthesize(&Descriptor::from(Prim::String)).unwrap(), json!(""));
        assert_eq!(synthesize(&Descriptor::from(Prim::Number)).unwrap(), json!(0));
        assert_eq!(synthesize(&Descriptor::from(Prim::Boolean)).unwrap(), json!(false));
        assert_eq!(synthesize(&Descriptor::Null).unwrap(), json!(null));
    }

    #[test]
    fn arrays_declare_empty() {
        let d = Descriptor::array_of(Descriptor::object([("x", Prim::Number)]));
        assert_eq!(synthesize(&d).unwrap(), json!([]));
    }

    #[test]
    fn nested_objects_compose_and_validate() {
        let d = Descriptor::object([
            ("a", Descriptor::from(Prim::Number)),
            ("b", Descriptor::object([("c", Descriptor::from(Prim::String)), ("d", Descriptor::Null)])),
        ]);
        let v = synthesize(&d).unwrap();
        assert_eq!(v, json!({"a": 0, "b": {"c": "", "d": null}}));
        let keys: Vec<_> = v.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["a", "b"]);
        assert!(check(&d, Some(&v), true, None).is_ok());
    }

    #[test]
    fn uninhabited_fields_poison_the_whole_object() {
        let d = Descriptor::object([
            ("ok", Descriptor::from(Prim::Boolean)),
            ("never", Descriptor::from(Schema::bottom())),
        ]);
        assert!(matches!(synthesize(&d), Err(Violation::UninhabitedType(_))));
    }

    #[test]
    fn supplier_rescues_an_uninhabited_field() {
        let d = Descriptor::object([
            ("never", Schema::bottom().with_declval(|| json!("placeholder"))),
        ]);
        assert_eq!(synthesize(&d).unwrap(), json!({"never": "placeholder"}));
    }
}
