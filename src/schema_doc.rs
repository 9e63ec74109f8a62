//! Schema documents: a shape in notation form plus validation settings.
//!
//! ```json
//! { "name": "user", "strict": true, "shape": { "name": "string", "tags": ["string"] } }
//! ```
use serde::Deserialize;
use serde_json::Value;

use crate::notation::{self, NotationError};
use crate::path_de::{self, PathError};
use crate::schema::Schema;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDoc {
    #[serde(default)]
    pub name: Option<String>,
    /// Treat absent fields as violations.
    #[serde(default)]
    pub strict: bool,
    pub shape: Value,
}

impl SchemaDoc {
    pub fn from_str(src: &str) -> Result<Self, PathError> {
        path_de::from_str_with_path(src)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, PathError> {
        path_de::from_slice_with_path(bytes)
    }

    pub fn compile(&self) -> Result<Schema, NotationError> {
        Ok(Schema::new(notation::parse(&self.shape)?))
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

// ------------------------------- Tests ------------------------------------ //
