//! Reqwest-based registry source.

use std::sync::Arc;

use reqwest::Client;
use serde_json::Value;
use url::Url;

use super::{RegistryConfig, TRACING_TARGET};
use crate::{Error, Result, SchemaCatalog, SchemaSource};

/// Path of the registry endpoint relative to the backend base URL.
pub const REGISTRY_PATH: &str = "object_info";

/// Inner state shared between clones.
struct HttpSchemaSourceInner {
    http: Client,
    endpoint: Url,
    config: RegistryConfig,
}

/// Fetches the registry from `GET {base_url}/object_info`.
///
/// Non-success statuses and transport failures are reported as errors and
/// never retried.
#[derive(Clone)]
pub struct HttpSchemaSource {
    inner: Arc<HttpSchemaSourceInner>,
}

impl std::fmt::Debug for HttpSchemaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSchemaSource")
            .field("endpoint", &self.inner.endpoint.as_str())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl HttpSchemaSource {
    /// Creates a source for the backend at `base_url`.
    pub fn new(base_url: &str, config: RegistryConfig) -> Result<Self> {
        let endpoint = registry_endpoint(base_url)?;
        let timeout = config.effective_timeout();

        tracing::debug!(
            target: TRACING_TARGET,
            endpoint = %endpoint,
            timeout_ms = timeout.as_millis(),
            "Creating registry client"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(config.effective_user_agent())
            .build()
            .map_err(|source| Error::Request {
                url: endpoint.to_string(),
                source,
            })?;

        let inner = HttpSchemaSourceInner {
            http,
            endpoint,
            config,
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Returns the registry endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.inner.config
    }
}

#[async_trait::async_trait]
impl SchemaSource for HttpSchemaSource {
    async fn fetch(&self) -> Result<SchemaCatalog> {
        let url = self.inner.endpoint.as_str();
        tracing::debug!(target: TRACING_TARGET, url, "Requesting schema registry");

        let response = self
            .inner
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| Error::Request {
                url: url.to_owned(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                target: TRACING_TARGET,
                url,
                status = status.as_u16(),
                "Schema registry request rejected"
            );
            return Err(Error::Status {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }

        let payload: Value = response.json().await.map_err(|source| Error::Request {
            url: url.to_owned(),
            source,
        })?;

        SchemaCatalog::from_value(payload)
    }
}

/// Joins the registry path onto a base URL, keeping any path prefix.
fn registry_endpoint(base_url: &str) -> Result<Url> {
    let invalid = |message: String| Error::InvalidUrl {
        url: base_url.to_owned(),
        message,
    };

    let mut base = Url::parse(base_url).map_err(|error| invalid(error.to_string()))?;
    if base.cannot_be_a_base() {
        return Err(invalid("not a base url".into()));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(REGISTRY_PATH)
        .map_err(|error| invalid(error.to_string()))
}
