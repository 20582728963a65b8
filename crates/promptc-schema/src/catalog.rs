//! The full registry payload: every known node class and its schema.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{ClassSchema, Error, Result, TRACING_TARGET};

/// Key under which some transports wrap the class map.
const WRAPPER_KEY: &str = "nodes";

/// One class entry in the registry payload. Only the inputs are consumed.
#[derive(Debug, Deserialize)]
struct ClassRecord {
    #[serde(default)]
    input: ClassSchema,
}

/// Schemas of all known node classes, keyed by class name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaCatalog {
    classes: IndexMap<String, ClassSchema>,
}

impl SchemaCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the schema of a class.
    #[must_use]
    pub fn with_class(mut self, class_type: impl Into<String>, schema: ClassSchema) -> Self {
        self.insert(class_type, schema);
        self
    }

    /// Adds or replaces the schema of a class.
    pub fn insert(&mut self, class_type: impl Into<String>, schema: ClassSchema) {
        self.classes.insert(class_type.into(), schema);
    }

    /// Decodes a raw registry payload.
    ///
    /// The payload is an object keyed by class name, each entry carrying an
    /// `input` record. A payload wrapped under a `nodes` key is unwrapped.
    /// Entries that cannot be decoded are skipped.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut root) = value else {
            return Err(Error::malformed("registry payload must be a JSON object"));
        };

        if is_wrapped(&root)
            && let Some(Value::Object(inner)) = root.remove(WRAPPER_KEY)
        {
            root = inner;
        }

        let mut catalog = Self::new();
        for (class_type, entry) in root {
            match serde_json::from_value::<ClassRecord>(entry) {
                Ok(record) => catalog.insert(class_type, record.input),
                Err(error) => {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        class_type = %class_type,
                        error = %error,
                        "Skipping malformed registry entry"
                    );
                }
            }
        }

        Ok(catalog)
    }

    /// Decodes a registry payload from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    /// Returns the schema of a class.
    pub fn get(&self, class_type: &str) -> Option<&ClassSchema> {
        self.classes.get(class_type)
    }

    /// Returns whether the catalog knows a class.
    pub fn contains(&self, class_type: &str) -> bool {
        self.classes.contains_key(class_type)
    }

    /// Iterates known class names in payload order.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Returns the number of known classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// A payload is wrapped when its `nodes` entry is a class map rather than a
/// class record of its own.
fn is_wrapped(root: &Map<String, Value>) -> bool {
    match root.get(WRAPPER_KEY) {
        Some(Value::Object(inner)) => !inner.contains_key("input"),
        _ => false,
    }
}
