//! NoCloud seed artifacts
//!
//! The vendor-neutral triple cloud-init reads from a NoCloud seed directory:
//! meta-data, network-config and user-data. [`translate`] derives the first
//! two from a Vultr document and [`seed`] writes all three to disk.

pub mod seed;
pub mod translate;

use serde::{Deserialize, Serialize};

use crate::datasources::VultrMetadata;
use crate::network::NetworkConfig;

pub use seed::{write_metadata, write_network_config, write_seed, write_userdata};
pub use translate::translate;

/// Placeholder for fields Vultr has no equivalent for
pub const UNKNOWN: &str = "unknown";

/// NoCloud instance metadata written to `meta-data`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoCloudMetadata {
    #[serde(rename = "ami-id")]
    pub ami_id: String,
    #[serde(rename = "instance-id")]
    pub instance_id: String,
    pub region: String,
    #[serde(rename = "availability-zone")]
    pub availability_zone: String,
    pub tags: Vec<String>,
    /// Individual keys in source order, never empty strings
    #[serde(rename = "public-keys")]
    pub public_keys: Vec<String>,
    pub hostname: String,
    #[serde(rename = "local-hostname")]
    pub local_hostname: String,
}

/// Raw user-data bytes
///
/// Vultr boot scripts are not carried over yet, so this is always empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserData(Vec<u8>);

impl UserData {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Everything written to a seed directory in one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    pub metadata: NoCloudMetadata,
    pub network_config: NetworkConfig,
    pub userdata: UserData,
}

impl Seed {
    /// Build the seed for a Vultr document
    pub fn from_vultr(doc: &VultrMetadata) -> Self {
        let (metadata, network_config) = translate(doc);
        Self {
            metadata,
            network_config,
            userdata: UserData::default(),
        }
    }
}
