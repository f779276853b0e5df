//! In-memory (single node) template source and output sink for local
//! development and tests.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::Error;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use reqwire_store::{DataSource, OutputSink};
use reqwire_template::ReqTemplate;
use tokio::sync::Mutex;

/// In-memory template source.
#[derive(Clone, Debug, Default)]
pub struct MemoryDataSource {
    templates: Arc<Mutex<HashMap<String, ReqTemplate>>>,
}

impl MemoryDataSource {
    /// Creates an empty `MemoryDataSource`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a template under `key`.
    pub async fn insert<K: Into<String>>(&self, key: K, template: ReqTemplate) {
        self.templates.lock().await.insert(key.into(), template);
    }
}

#[async_trait]
impl DataSource for MemoryDataSource {
    type Error = Error;

    async fn load<K: Into<String> + Send>(&self, key: K) -> Result<ReqTemplate, Self::Error> {
        let key = key.into();
        self.templates
            .lock()
            .await
            .get(&key)
            .cloned()
            .ok_or(Error::TemplateNotFound(key))
    }
}

/// In-memory output sink.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    map: Arc<Mutex<HashMap<String, Bytes>>>,
}

impl MemorySink {
    /// Creates an empty `MemorySink`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OutputSink for MemorySink {
    type Error = Error;

    async fn set<K: Into<String> + Send>(
        &self,
        key: K,
        value: Bytes,
    ) -> Result<(), Self::Error> {
        self.map.lock().await.insert(key.into(), value);
        Ok(())
    }

    async fn get<K: Into<String> + Send>(&self, key: K) -> Result<Option<Bytes>, Self::Error> {
        Ok(self.map.lock().await.get(&key.into()).cloned())
    }

    async fn del<K: Into<String> + Send>(&self, key: K) -> Result<(), Self::Error> {
        self.map.lock().await.remove(&key.into());
        Ok(())
    }
}
