//! Where the registry comes from.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::{Error, Result, SchemaCatalog};

/// Core trait for obtaining the schema registry.
///
/// Implement this trait to plug in a new registry transport. A source is
/// asked for the full catalog at most once per compile call.
#[async_trait::async_trait]
pub trait SchemaSource: Send + Sync {
    /// Fetches the schemas of all known node classes.
    async fn fetch(&self) -> Result<SchemaCatalog>;
}

#[async_trait::async_trait]
impl<T> SchemaSource for Arc<T>
where
    T: SchemaSource + ?Sized,
{
    async fn fetch(&self) -> Result<SchemaCatalog> {
        self.as_ref().fetch().await
    }
}

#[async_trait::async_trait]
impl<T> SchemaSource for &T
where
    T: SchemaSource + ?Sized,
{
    async fn fetch(&self) -> Result<SchemaCatalog> {
        (**self).fetch().await
    }
}

/// In-memory registry, typically loaded from a saved payload.
#[derive(Debug, Clone, Default)]
pub struct StaticSchemaSource {
    catalog: Arc<SchemaCatalog>,
}

impl StaticSchemaSource {
    /// Creates a source serving the given catalog.
    pub fn new(catalog: SchemaCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    /// Creates a source from a raw registry payload.
    pub fn from_value(value: Value) -> Result<Self> {
        SchemaCatalog::from_value(value).map(Self::new)
    }

    /// Creates a source from a registry payload saved to disk.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        SchemaCatalog::from_slice(&bytes).map(Self::new)
    }

    /// Returns the served catalog.
    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }
}

impl From<SchemaCatalog> for StaticSchemaSource {
    fn from(catalog: SchemaCatalog) -> Self {
        Self::new(catalog)
    }
}

#[async_trait::async_trait]
impl SchemaSource for StaticSchemaSource {
    async fn fetch(&self) -> Result<SchemaCatalog> {
        Ok(self.catalog.as_ref().clone())
    }
}
