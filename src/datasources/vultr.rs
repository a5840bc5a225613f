//! Vultr datasource
//!
//! Fetches `/v1.json` from the Vultr metadata service at the link-local
//! address. The request is made once, bounded by an overall timeout.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::MetadataSource;
use crate::BridgeError;

/// Full metadata document returned by the Vultr service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VultrMetadata {
    #[serde(deserialize_with = "null_as_default")]
    pub hostname: String,
    #[serde(rename = "instanceid", deserialize_with = "null_as_default")]
    pub instance_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub interfaces: Vec<VultrInterface>,
    /// Newline-delimited SSH public keys
    #[serde(rename = "public-keys", deserialize_with = "null_as_default")]
    pub public_keys: String,
    #[serde(deserialize_with = "null_as_default")]
    pub region: VultrRegion,
}

/// One network interface as listed by Vultr
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VultrInterface {
    #[serde(deserialize_with = "null_as_default")]
    pub mac: String,
    /// "public", "private", or something we do not know about
    #[serde(rename = "network-type", deserialize_with = "null_as_default")]
    pub network_type: String,
    #[serde(rename = "networkid", deserialize_with = "null_as_default")]
    pub network_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ipv4: VultrIpv4,
}

/// IPv4 settings of an interface, kept as the provider's strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VultrIpv4 {
    #[serde(deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub gateway: String,
    #[serde(deserialize_with = "null_as_default")]
    pub netmask: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VultrRegion {
    #[serde(rename = "regioncode", deserialize_with = "null_as_default")]
    pub region_code: String,
}

/// Treat an explicit JSON `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl VultrInterface {
    pub fn is_private(&self) -> bool {
        self.network_type == "private"
    }
}

/// Vultr metadata datasource
pub struct Vultr {
    client: Client,
    url: String,
}

impl Vultr {
    /// Datasource for `url`, bounded by `timeout` per request
    pub fn with_url(url: impl Into<String>, timeout: Duration) -> Result<Self, BridgeError> {
        // reqwest's timeout spans connect through the end of the body
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BridgeError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl MetadataSource for Vultr {
    fn name(&self) -> &'static str {
        "Vultr"
    }

    async fn fetch(&self) -> Result<VultrMetadata, BridgeError> {
        info!("Sending request to {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(BridgeError::MetadataStatus {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Received {} bytes of metadata", body.len());
        Ok(serde_json::from_str(&body)?)
    }
}
