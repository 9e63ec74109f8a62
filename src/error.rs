//! Violations raised by validation and synthesis.
use serde_json::Value;
use thiserror::Error;

use crate::descriptor::Prim;

/// The first (or, for unions, every) structural problem found while checking
/// a value, or the reason a default value could not be declared.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Violation {
    /// A value was required (strict mode, or a `Bottom` slot) but absent.
    #[error("missing value for {}: expected {expected}", label(.field))]
    MissingValue {
        field: Option<String>,
        expected: String,
    },

    /// A null-literal descriptor saw something other than `null`.
    #[error("value {found} of {} is not null", label(.field))]
    NotNull {
        field: Option<String>,
        found: Value,
    },

    #[error("value {found} of {} is not of type {expected}", label(.field))]
    TypeMismatch {
        field: Option<String>,
        expected: Prim,
        found: Value,
    },

    #[error("value {found} of {} is not an array", label(.field))]
    NotAnArray {
        field: Option<String>,
        found: Value,
    },

    #[error("value {found} of {} is not an object", label(.field))]
    NotAnObject {
        field: Option<String>,
        found: Value,
    },

    /// No member of a union accepted the value. `branches` holds one failure
    /// per member, in member order.
    #[error("value {} of {} matches no member of {expected}, errors: [{}]", found_or_absent(.found), label(.field), join_branches(.branches))]
    UnionMismatch {
        field: Option<String>,
        expected: String,
        found: Option<Value>,
        branches: Vec<Violation>,
    },

    #[error("{} is uninhabited (Bottom), no value can match", label(.field))]
    BottomViolation { field: Option<String> },

    #[error("value of {} was rejected by its custom validator", label(.field))]
    CustomValidationFailed { field: Option<String> },

    /// Synthesis was requested for a schema with no inhabitants.
    #[error("cannot declare a value of uninhabited type {0}")]
    UninhabitedType(String),
}

impl Violation {
    /// Field label the violation was raised for, `None` at the root.
    pub fn field(&self) -> Option<&str> {
        match self {
            Violation::MissingValue { field, .. }
            | Violation::NotNull { field, .. }
            | Violation::TypeMismatch { field, .. }
            | Violation::NotAnArray { field, .. }
            | Violation::NotAnObject { field, .. }
            | Violation::UnionMismatch { field, .. }
            | Violation::BottomViolation { field }
            | Violation::CustomValidationFailed { field } => field.as_deref(),
            Violation::UninhabitedType(_) => None,
        }
    }
}

fn label(field: &Option<String>) -> String {
    match field {
        Some(name) => format!("`{name}`"),
        None => "<root>".to_string(),
    }
}

fn found_or_absent(found: &Option<Value>) -> String {
    match found {
        Some(v) => v.to_string(),
        None => "<absent>".to_string(),
    }
}

fn join_branches(branches: &[Violation]) -> String {
    branches
        .iter()
        .map(|b| b.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn messages_name_the_field_or_root() {
        let e = Violation::TypeMismatch {
            field: Some("age".into()),
            expected: Prim::Number,
            found: json!("x"),
        };
        assert_eq!(e.to_string(), "value \"x\" of `age` is not of type Number");
        assert_eq!(e.field(), Some("age"));

        let e = Violation::NotAnArray { field: None, found: json!({}) };
        assert_eq!(e.to_string(), "value {} of <root> is not an array");
        assert_eq!(e.field(), None);
    }

    #[test]
    fn union_message_lists_every_branch() {
        let e = Violation::UnionMismatch {
            field: None,
            expected: "Union(Number | String)".into(),
            found: Some(json!(true)),
            branches: vec![
                Violation::TypeMismatch { field: None, expected: Prim::Number, found: json!(true) },
                Violation::TypeMismatch { field: None, expected: Prim::String, found: json!(true) },
            ],
        };
        let msg = e.to_string();
        assert!(msg.starts_with("value true of <root> matches no member of Union(Number | String)"));
        assert!(msg.contains("not of type Number; value true of <root> is not of type String"));
    }
}
