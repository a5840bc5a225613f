//! Mock datasource for testing
//!
//! Returns a canned document or a canned error without touching the network.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{MetadataSource, VultrMetadata};
use crate::BridgeError;

/// Mock datasource for testing
///
/// # Example
/// ```
/// use vultr_nocloud::datasources::VultrMetadata;
/// use vultr_nocloud::datasources::mock::MockMetadataSource;
///
/// let mock = MockMetadataSource::new().with_metadata(VultrMetadata {
///     hostname: "test-host".to_string(),
///     ..Default::default()
/// });
/// ```
pub struct MockMetadataSource {
    metadata: VultrMetadata,
    error: Option<String>,
    calls: AtomicUsize,
}

impl MockMetadataSource {
    /// Create a mock returning an empty document
    pub fn new() -> Self {
        Self {
            metadata: VultrMetadata::default(),
            error: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Set the document to return
    pub fn with_metadata(mut self, metadata: VultrMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Make fetch fail with an HTTP error carrying `message`
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    /// Number of fetch calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockMetadataSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataSource for MockMetadataSource {
    fn name(&self) -> &'static str {
        "Mock"
    }

    async fn fetch(&self) -> Result<VultrMetadata, BridgeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.error {
            Some(message) => Err(BridgeError::Http(message.clone())),
            None => Ok(self.metadata.clone()),
        }
    }
}
