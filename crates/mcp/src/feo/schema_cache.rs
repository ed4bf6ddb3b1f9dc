//! Time-boxed in-memory cache for the Frontend Operator JSON Schema.
//!
//! The schema is fetched on first use and again once the cached copy is an
//! hour old. A failed refresh keeps serving the previous copy; a failure with
//! nothing cached is reported to the caller. The cache lock is held across
//! the fetch so concurrent callers share one refresh.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Published location of the FEO schema.
pub const DEFAULT_SCHEMA_URL: &str =
    "https://raw.githubusercontent.com/RedHatInsights/frontend-operator/main/docs/frontend-resource-schema.json";
/// Environment variable overriding [`DEFAULT_SCHEMA_URL`].
pub const SCHEMA_URL_ENV_VAR: &str = "FEO_SCHEMA_URL";
/// Minutes a fetched schema stays fresh.
pub const CACHE_TTL_MINUTES: i64 = 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaCacheError {
    #[error("failed to fetch FEO schema from {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("FEO schema from {url} is not valid JSON: {message}")]
    Decode { url: String, message: String },
}

/// Where the schema comes from.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// Human-readable location, shown to tool callers.
    fn location(&self) -> &str;

    async fn fetch(&self) -> Result<Value, SchemaCacheError>;
}

/// Fetches the schema over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSchemaSource {
    url: String,
    http: reqwest::Client,
}

impl HttpSchemaSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SchemaSource for HttpSchemaSource {
    fn location(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<Value, SchemaCacheError> {
        let fetch_error = |message: String| SchemaCacheError::Fetch {
            url: self.url.clone(),
            message,
        };

        debug!(url = %self.url, "fetching FEO schema");
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|error| fetch_error(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            )));
        }

        response.json::<Value>().await.map_err(|error| SchemaCacheError::Decode {
            url: self.url.clone(),
            message: error.to_string(),
        })
    }
}

/// A schema snapshot and when it was fetched.
#[derive(Debug, Clone)]
pub struct CachedSchema {
    pub schema: Arc<Value>,
    pub fetched_at: DateTime<Utc>,
}

impl CachedSchema {
    /// Whole minutes since the fetch.
    pub fn age_minutes(&self, now: DateTime<Utc>) -> i64 {
        (now - self.fetched_at).num_minutes().max(0)
    }

    fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now - self.fetched_at >= Duration::minutes(CACHE_TTL_MINUTES)
    }
}

/// Cache shared by every FEO tool handler.
pub struct SchemaCache {
    source: Arc<dyn SchemaSource>,
    entry: Mutex<Option<CachedSchema>>,
}

impl SchemaCache {
    /// Cache backed by an HTTP source at `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_source(Arc::new(HttpSchemaSource::new(url)))
    }

    /// Cache backed by `FEO_SCHEMA_URL`, or the published schema when unset.
    pub fn from_env() -> Self {
        let url = std::env::var(SCHEMA_URL_ENV_VAR)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SCHEMA_URL.to_string());
        Self::new(url)
    }

    pub fn with_source(source: Arc<dyn SchemaSource>) -> Self {
        Self {
            source,
            entry: Mutex::new(None),
        }
    }

    pub fn source_location(&self) -> &str {
        self.source.location()
    }

    /// Return a fresh schema, fetching when empty or stale.
    pub async fn ensure_loaded(&self) -> Result<CachedSchema, SchemaCacheError> {
        self.ensure_loaded_at(Utc::now()).await
    }

    pub(crate) async fn ensure_loaded_at(&self, now: DateTime<Utc>) -> Result<CachedSchema, SchemaCacheError> {
        let mut entry = self.entry.lock().await;
        if let Some(cached) = entry.as_ref()
            && !cached.is_stale(now)
        {
            return Ok(cached.clone());
        }

        match self.source.fetch().await {
            Ok(schema) => {
                let cached = CachedSchema {
                    schema: Arc::new(schema),
                    fetched_at: now,
                };
                *entry = Some(cached.clone());
                info!(source = %self.source.location(), "loaded FEO schema");
                Ok(cached)
            }
            Err(error) => match entry.as_ref() {
                Some(stale) => {
                    warn!(%error, "FEO schema refresh failed, serving cached copy");
                    Ok(stale.clone())
                }
                None => Err(error),
            },
        }
    }

    /// Current snapshot without fetching.
    pub async fn cached(&self) -> Option<CachedSchema> {
        self.entry.lock().await.clone()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Source that replays scripted results and counts fetches.
    pub(crate) struct ScriptedSource {
        results: std::sync::Mutex<VecDeque<Result<Value, SchemaCacheError>>>,
        fetches: AtomicUsize,
    }

    impl ScriptedSource {
        pub(crate) fn new(results: Vec<Result<Value, SchemaCacheError>>) -> Arc<Self> {
            Arc::new(Self {
                results: std::sync::Mutex::new(results.into()),
                fetches: AtomicUsize::new(0),
            })
        }

        pub(crate) fn serving(schema: Value) -> Arc<Self> {
            Self::new(vec![Ok(schema)])
        }

        pub(crate) fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    pub(crate) fn unavailable() -> SchemaCacheError {
        SchemaCacheError::Fetch {
            url: "memory://schema".into(),
            message: "503 Service Unavailable".into(),
        }
    }

    #[async_trait]
    impl SchemaSource for ScriptedSource {
        fn location(&self) -> &str {
            "memory://schema"
        }

        async fn fetch(&self) -> Result<Value, SchemaCacheError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.results
                .lock()
                .expect("results lock")
                .pop_front()
                .unwrap_or_else(|| Err(unavailable()))
        }
    }
}
