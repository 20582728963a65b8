//! Reqwest-based HTTP source for the schema registry.
//!
//! This module provides a reqwest-based implementation of the [`SchemaSource`] trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use promptc_schema::reqwest::{HttpSchemaSource, RegistryConfig};
//! use promptc_schema::SchemaRegistry;
//!
//! let source = HttpSchemaSource::new("http://127.0.0.1:8188", RegistryConfig::default())?;
//! let registry = SchemaRegistry::new(source);
//! let schema = registry.get_schema("KSampler").await?;
//! ```
//!
//! [`SchemaSource`]: crate::SchemaSource

mod client;
mod config;

pub use client::{HttpSchemaSource, REGISTRY_PATH};
pub use config::RegistryConfig;

/// Tracing target for reqwest source operations.
pub const TRACING_TARGET: &str = "promptc_schema::reqwest";
