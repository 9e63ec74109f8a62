//! Recursive structural matcher.
//!
//! Walks a [`Descriptor`] and a runtime value side by side and stops at the
//! first violation. Absence (`None`) is distinct from JSON `null`: it is
//! tolerated in lenient mode for every kind except `Bottom`.
//!
//! Dispatch order:
//! 1. absent value → ok, unless strict or the slot is `Bottom`
//! 2. null literal → value must be exactly `null`
//! 3. wrapped schema → the schema's own check (combinators + hooks)
//! 4. primitive tag → JSON kind must agree
//! 5. array-of → every element matches the item descriptor
//! 6. object shape → every declared field matches; extra keys are ignored
use serde_json::Value;

use crate::descriptor::{Descriptor, Prim};
use crate::error::Violation;

pub fn check(
    desc: &Descriptor,
    value: Option<&Value>,
    strict: bool,
    field: Option<&str>,
) -> Result<(), Violation> {
    let Some(value) = value else {
        if strict || desc.is_bottom() {
            return Err(Violation::MissingValue {
                field: field.map(str::to_owned),
                expected: desc.to_string(),
            });
        }
        return Ok(());
    };

    match desc {
        Descriptor::Null => {
            if value.is_null() {
                Ok(())
            } else {
                Err(Violation::NotNull {
                    field: field.map(str::to_owned),
                    found: value.clone(),
                })
            }
        }
        Descriptor::Schema(schema) => schema.check(Some(value), strict, field),
        Descriptor::Prim(prim) => {
            if kind_matches(*prim, value) {
                Ok(())
            } else {
                Err(Violation::TypeMismatch {
                    field: field.map(str::to_owned),
                    expected: *prim,
                    found: value.clone(),
                })
            }
        }
        Descriptor::ArrayOf(item) => {
            let Value::Array(xs) = value else {
                return Err(Violation::NotAnArray {
                    field: field.map(str::to_owned),
                    found: value.clone(),
                });
            };
            for (i, x) in xs.iter().enumerate() {
                let label = element_label(field, i);
                check(item, Some(x), strict, Some(label.as_str()))?;
            }
            Ok(())
        }
        Descriptor::Object(fields) => {
            let Value::Object(map) = value else {
                return Err(Violation::NotAnObject {
                    field: field.map(str::to_owned),
                    found: value.clone(),
                });
            };
            for (name, sub) in fields {
                check(sub, map.get(name), strict, Some(name.as_str()))?;
            }
            Ok(())
        }
    }
}

fn kind_matches(prim: Prim, value: &Value) -> bool {
    match prim {
        Prim::String => value.is_string(),
        Prim::Number => value.is_number(),
        Prim::Boolean => value.is_boolean(),
    }
}

fn element_label(field: Option<&str>, index: usize) -> String {
    format!("{}[{index}]", field.unwrap_or(""))
}

// ------------------------------- Tests ------------------------------------ //
