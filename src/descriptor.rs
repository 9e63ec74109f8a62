// Raw shape definitions wrapped by `Schema`. No hooks here, those live on the schema.
use std::fmt;

use indexmap::IndexMap;

use crate::schema::Schema;

/// Primitive type markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prim {
    String,
    Number,
    Boolean,
}

#[derive(Debug, Clone)]
pub enum Descriptor {
    Prim(Prim),
    Null,                                 // exactly null
    ArrayOf(Box<Descriptor>),             // every element matches the inner descriptor
    Object(IndexMap<String, Descriptor>), // open: undeclared keys are ignored
    Schema(Schema),                       // combinators and hooked schemas at any depth
}

impl Prim {
    pub fn name(self) -> &'static str {
        match self {
            Prim::String => "String",
            Prim::Number => "Number",
            Prim::Boolean => "Boolean",
        }
    }
}

impl Descriptor {
    pub fn array_of(item: impl Into<Descriptor>) -> Self {
        Descriptor::ArrayOf(Box::new(item.into()))
    }

    /// Object shape from `(field, descriptor)` pairs, keeping declaration order.
    /// A repeated field name keeps its first position and its last descriptor.
    pub fn object<K, D, I>(fields: I) -> Self
    where
        K: Into<String>,
        D: Into<Descriptor>,
        I: IntoIterator<Item = (K, D)>,
    {
        Descriptor::Object(
            fields
                .into_iter()
                .map(|(k, d)| (k.into(), d.into()))
                .collect(),
        )
    }

    pub fn as_schema(&self) -> Option<&Schema> {
        match self {
            Descriptor::Schema(s) => Some(s),
            _ => None,
        }
    }

    /// True for a wrapped `Bottom`, the only kind that rejects absence in lenient mode.
    pub fn is_bottom(&self) -> bool {
        self.as_schema().is_some_and(Schema::is_bottom)
    }
}

impl From<Prim> for Descriptor {
    fn from(p: Prim) -> Self {
        Descriptor::Prim(p)
    }
}

impl From<Schema> for Descriptor {
    fn from(s: Schema) -> Self {
        Descriptor::Schema(s)
    }
}

impl fmt::Display for Prim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Descriptor::Prim(p) => write!(f, "{p}"),
            Descriptor::Null => f.write_str("null"),
            Descriptor::ArrayOf(item) => write!(f, "[{item}]"),
            Descriptor::Object(fields) => {
                if fields.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                for (i, (name, d)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {d}")?;
                }
                f.write_str(" }")
            }
            Descriptor::Schema(s) => write!(f, "{s}"),
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_reads_like_the_declaration() {
        let d = Descriptor::object([
            ("a", Descriptor::from(Prim::Number)),
            ("b", Descriptor::object([("c", Descriptor::from(Prim::String)), ("d", Descriptor::Null)])),
            ("tags", Descriptor::array_of(Prim::String)),
        ]);
        assert_eq!(d.to_string(), "{ a: Number, b: { c: String, d: null }, tags: [String] }");
        assert_eq!(Descriptor::object(Vec::<(String, Descriptor)>::new()).to_string(), "{}");
    }

    #[test]
    fn object_keeps_declaration_order() {
        let d = Descriptor::object([("z", Prim::Boolean), ("a", Prim::Number), ("m", Prim::String)]);
        let Descriptor::Object(fields) = d else { panic!("expected object shape") };
        let names: Vec<_> = fields.keys().map(String::as_str).collect();
        assert_eq!(names, ["z", "a", "m"]);
    }

    #[test]
    fn bottom_is_detected_through_the_wrapper() {
        assert!(Descriptor::from(Schema::bottom()).is_bottom());
        assert!(!Descriptor::from(Schema::any()).is_bottom());
        assert!(!Descriptor::Null.is_bottom());
    }
}
