//! Persistence-agnostic traits for template sources and output sinks.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::error::Error;
use std::fmt::Debug;

use async_trait::async_trait;
use bytes::Bytes;

use reqwire_template::ReqTemplate;

/// A source of request templates, keyed by an opaque string.
///
/// Implementations own the storage semantics; the returned template already
/// has its placeholders scanned.
#[async_trait]
pub trait DataSource: Clone + Send + Sync + 'static {
    /// The error type returned by the source.
    type Error: Debug + Error + Send + Sync;

    /// Retrieves the template stored under `key`.
    async fn load<K: Into<String> + Send>(&self, key: K) -> Result<ReqTemplate, Self::Error>;
}

/// A key-value sink callers use to stash intermediate results.
#[async_trait]
pub trait OutputSink: Clone + Send + Sync + 'static {
    /// The error type returned by the sink.
    type Error: Debug + Error + Send + Sync;

    /// Stores a value under `key`.
    async fn set<K: Into<String> + Send>(&self, key: K, value: Bytes) -> Result<(), Self::Error>;

    /// Retrieves the value stored under `key`.
    async fn get<K: Into<String> + Send>(&self, key: K) -> Result<Option<Bytes>, Self::Error>;

    /// Deletes the value stored under `key`.
    async fn del<K: Into<String> + Send>(&self, key: K) -> Result<(), Self::Error>;
}
