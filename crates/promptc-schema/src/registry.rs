//! Memoizing registry client scoped to one compile call.

use std::time::Instant;

use tokio::sync::OnceCell;

use crate::{ClassSchema, Error, Result, SchemaCatalog, SchemaSource, TRACING_TARGET, TypeDecl};

/// Registry client that fetches the catalog on first use and serves every
/// later lookup from memory.
///
/// A registry is owned by a single compile call; separate calls never share
/// a cache. A failed fetch is returned as-is and is not retried.
pub struct SchemaRegistry<S> {
    source: S,
    catalog: OnceCell<SchemaCatalog>,
}

impl<S> std::fmt::Debug for SchemaRegistry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("loaded", &self.catalog.initialized())
            .finish_non_exhaustive()
    }
}

impl<S: SchemaSource> SchemaRegistry<S> {
    /// Creates a registry over the given source. Nothing is fetched yet.
    pub fn new(source: S) -> Self {
        Self {
            source,
            catalog: OnceCell::new(),
        }
    }

    /// Returns whether the catalog has been fetched.
    pub fn is_loaded(&self) -> bool {
        self.catalog.initialized()
    }

    /// Returns the full catalog, fetching it on first call.
    pub async fn catalog(&self) -> Result<&SchemaCatalog> {
        self.catalog
            .get_or_try_init(|| async {
                let started_at = Instant::now();
                tracing::debug!(target: TRACING_TARGET, "Fetching schema registry");

                let catalog = self.source.fetch().await?;

                tracing::debug!(
                    target: TRACING_TARGET,
                    classes = catalog.len(),
                    elapsed_ms = started_at.elapsed().as_millis(),
                    "Schema registry fetched"
                );
                Ok::<_, Error>(catalog)
            })
            .await
    }

    /// Returns the schema of a class, or `None` if the registry does not know it.
    pub async fn get_schema(&self, class_type: &str) -> Result<Option<&ClassSchema>> {
        Ok(self.catalog().await?.get(class_type))
    }

    /// Lists `(name, type name)` of a class's inputs, required then optional.
    pub async fn list_inputs_ordered(&self, class_type: &str) -> Result<Vec<(&str, &str)>> {
        let inputs = self
            .get_schema(class_type)
            .await?
            .map(|schema| {
                schema
                    .inputs_ordered()
                    .map(|(name, decl)| (name, decl.type_name()))
                    .collect()
            })
            .unwrap_or_default();
        Ok(inputs)
    }

    /// Returns the declared type name of one input.
    pub async fn get_declared_type(&self, class_type: &str, name: &str) -> Result<Option<&str>> {
        Ok(self
            .get_schema(class_type)
            .await?
            .and_then(|schema| schema.declared_type(name)))
    }

    /// Returns the declaration of one input: required, then optional, then hidden.
    pub async fn get_decl(&self, class_type: &str, name: &str) -> Result<Option<&TypeDecl>> {
        Ok(self
            .get_schema(class_type)
            .await?
            .and_then(|schema| schema.decl(name)))
    }
}
