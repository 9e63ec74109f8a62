//! The public schema handle and its combinators.
//!
//! A [`Schema`] owns either a plain [`Descriptor`] or one of the combinator
//! kinds (`Any`, `Bottom`, `Union`). `Nullable` is a union whose first member
//! is the null literal. Schemas are immutable and cheap to clone; one schema
//! can be shared across threads and reused for any number of checks.
//!
//! Custom hooks are asymmetric:
//! - the validator runs *after* structural validation succeeds and can only
//!   reject more values;
//! - the supplier *replaces* structural synthesis entirely.
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::declval;
use crate::descriptor::Descriptor;
use crate::error::Violation;
use crate::matcher;

pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
pub type Supplier = Arc<dyn Fn() -> Value + Send + Sync>;

/// Optional hooks recognized by [`Schema::with_options`].
#[derive(Clone, Default)]
pub struct Options {
    pub validate: Option<Predicate>,
    pub declval: Option<Supplier>,
}

impl Options {
    pub fn validator(mut self, f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        self.validate = Some(Arc::new(f));
        self
    }

    pub fn supplier(mut self, f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.declval = Some(Arc::new(f));
        self
    }
}

#[derive(Clone)]
pub struct Schema {
    inner: Arc<Inner>,
}

#[derive(Clone)]
struct Inner {
    kind: Kind,
    hooks: Options,
}

#[derive(Debug, Clone)]
enum Kind {
    Shape(Descriptor),
    Any,
    Bottom,
    Union(Vec<Descriptor>),
}

impl Schema {
    pub fn new(desc: impl Into<Descriptor>) -> Self {
        Self::with_options(desc, Options::default())
    }

    pub fn with_options(desc: impl Into<Descriptor>, options: Options) -> Self {
        Self::from_kind(Kind::Shape(desc.into()), options)
    }

    /// The universal type. Only absence in strict mode is rejected.
    pub fn any() -> Self {
        Self::from_kind(Kind::Any, Options::default())
    }

    /// The uninhabited type. Every check and every synthesis fails.
    pub fn bottom() -> Self {
        Self::from_kind(Kind::Bottom, Options::default())
    }

    /// One of `members`. Member order only matters for [`Schema::declare_value`],
    /// which always uses the first one.
    pub fn union<D, I>(members: I) -> Self
    where
        D: Into<Descriptor>,
        I: IntoIterator<Item = D>,
    {
        let members = members.into_iter().map(Into::into).collect();
        Self::from_kind(Kind::Union(members), Options::default())
    }

    /// `null` or one of `members`. Declares `null`.
    pub fn nullable<D, I>(members: I) -> Self
    where
        D: Into<Descriptor>,
        I: IntoIterator<Item = D>,
    {
        let members = std::iter::once(Descriptor::Null)
            .chain(members.into_iter().map(Into::into))
            .collect();
        Self::from_kind(Kind::Union(members), Options::default())
    }

    fn from_kind(kind: Kind, hooks: Options) -> Self {
        Self { inner: Arc::new(Inner { kind, hooks }) }
    }

    pub fn with_validator(self, f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        let mut inner = Arc::unwrap_or_clone(self.inner);
        inner.hooks.validate = Some(Arc::new(f));
        Self { inner: Arc::new(inner) }
    }

    pub fn with_declval(self, f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        let mut inner = Arc::unwrap_or_clone(self.inner);
        inner.hooks.declval = Some(Arc::new(f));
        Self { inner: Arc::new(inner) }
    }

    pub fn is_any(&self) -> bool {
        matches!(self.inner.kind, Kind::Any)
    }

    pub fn is_bottom(&self) -> bool {
        matches!(self.inner.kind, Kind::Bottom)
    }

    /// Members of a union (or nullable), in declaration order.
    pub fn members(&self) -> Option<&[Descriptor]> {
        match &self.inner.kind {
            Kind::Union(members) => Some(members),
            _ => None,
        }
    }

    /// The wrapped descriptor of a plain schema.
    pub fn descriptor(&self) -> Option<&Descriptor> {
        match &self.inner.kind {
            Kind::Shape(desc) => Some(desc),
            _ => None,
        }
    }

    /// Check a present value.
    pub fn validate(&self, value: &Value, strict: bool) -> Result<(), Violation> {
        self.check(Some(value), strict, None)
    }

    /// Check a slot that may be absent (`None`), e.g. the result of a map lookup.
    pub fn validate_field(&self, value: Option<&Value>, strict: bool) -> Result<(), Violation> {
        self.check(value, strict, None)
    }

    pub(crate) fn check(
        &self,
        value: Option<&Value>,
        strict: bool,
        field: Option<&str>,
    ) -> Result<(), Violation> {
        match &self.inner.kind {
            Kind::Shape(desc) => matcher::check(desc, value, strict, field)?,
            Kind::Any => {
                if value.is_none() && strict {
                    return Err(Violation::MissingValue {
                        field: field.map(str::to_owned),
                        expected: self.to_string(),
                    });
                }
            }
            Kind::Bottom => {
                return Err(Violation::BottomViolation { field: field.map(str::to_owned) });
            }
            Kind::Union(members) => self.check_union(members, value, strict, field)?,
        }

        // additive: only ever narrows what the structure already accepted
        if let (Some(pred), Some(v)) = (&self.inner.hooks.validate, value) {
            debug!(field, "running custom validator");
            if !pred(v) {
                return Err(Violation::CustomValidationFailed { field: field.map(str::to_owned) });
            }
        }
        Ok(())
    }

    fn check_union(
        &self,
        members: &[Descriptor],
        value: Option<&Value>,
        strict: bool,
        field: Option<&str>,
    ) -> Result<(), Violation> {
        let mut branches = Vec::with_capacity(members.len());
        for member in members {
            match matcher::check(member, value, strict, field) {
                Ok(()) => return Ok(()),
                Err(error) => {
                    trace!(%member, %error, "union branch rejected value");
                    branches.push(error);
                }
            }
        }
        Err(Violation::UnionMismatch {
            field: field.map(str::to_owned),
            expected: self.to_string(),
            found: value.cloned(),
            branches,
        })
    }

    /// Synthesize a default value. A custom supplier wins outright; otherwise
    /// the value is built from the structure.
    pub fn declare_value(&self) -> Result<Value, Violation> {
        if let Some(supplier) = &self.inner.hooks.declval {
            return Ok(supplier());
        }
        match &self.inner.kind {
            Kind::Shape(desc) => declval::synthesize(desc),
            Kind::Any => Ok(Value::Null),
            Kind::Bottom => Err(Violation::UninhabitedType(self.to_string())),
            Kind::Union(members) => match members.first() {
                Some(first) => declval::synthesize(first),
                None => {
                    debug!("declare_value on an empty union");
                    Err(Violation::UninhabitedType(self.to_string()))
                }
            },
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.kind {
            Kind::Shape(desc) => write!(f, "{desc}"),
            Kind::Any => f.write_str("Any"),
            Kind::Bottom => f.write_str("Bottom"),
            Kind::Union(members) => {
                f.write_str("Union(")?;
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{m}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("kind", &self.inner.kind)
            .field("validate", &self.inner.hooks.validate.is_some())
            .field("declval", &self.inner.hooks.declval.is_some())
            .finish()
    }
}

// ------------------------------- Tests ------------------------------------ //
