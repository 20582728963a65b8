#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod catalog;
mod decl;
mod error;
mod registry;
mod schema;
mod source;

#[cfg(feature = "reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
pub mod reqwest;

pub use catalog::SchemaCatalog;
pub use decl::TypeDecl;
pub use error::{Error, Result};
pub use registry::SchemaRegistry;
pub use schema::ClassSchema;
pub use source::{SchemaSource, StaticSchemaSource};

/// Tracing target for schema registry operations.
pub const TRACING_TARGET: &str = "promptc_schema";
