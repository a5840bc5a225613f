//! Metadata datasources
//!
//! A datasource retrieves the provider's instance metadata document. Only
//! the Vultr metadata service is supported; the mock exists for tests.

pub mod mock;
pub mod vultr;

use async_trait::async_trait;

use crate::BridgeError;
pub use vultr::{VultrInterface, VultrIpv4, VultrMetadata, VultrRegion};

/// Trait for provider metadata datasources
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Name of this datasource (e.g., "Vultr")
    fn name(&self) -> &'static str;

    /// Fetch and decode the provider metadata document
    ///
    /// A single attempt; any failure is final.
    async fn fetch(&self) -> Result<VultrMetadata, BridgeError>;
}
