//! Vultr to NoCloud translation
//!
//! Pure mapping with no I/O. Provider values are copied as opaque strings;
//! nothing is parsed or validated here.

use super::{NoCloudMetadata, UNKNOWN};
use crate::datasources::VultrMetadata;
use crate::network::{NETWORK_CONFIG_VERSION, NetworkConfig, PRIVATE_MTU, PhysicalConfig};

/// Translate a Vultr document into NoCloud meta-data and network-config
pub fn translate(doc: &VultrMetadata) -> (NoCloudMetadata, NetworkConfig) {
    (to_metadata(doc), to_network_config(doc))
}

fn to_metadata(doc: &VultrMetadata) -> NoCloudMetadata {
    NoCloudMetadata {
        ami_id: UNKNOWN.to_string(),
        instance_id: doc.instance_id.clone(),
        region: doc.region.region_code.clone(),
        availability_zone: UNKNOWN.to_string(),
        tags: Vec::new(),
        public_keys: split_public_keys(&doc.public_keys),
        hostname: doc.hostname.clone(),
        local_hostname: doc.hostname.clone(),
    }
}

/// Split a newline-delimited key block, dropping empty lines
pub fn split_public_keys(block: &str) -> Vec<String> {
    block
        .split('\n')
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}

/// Static config for private interfaces
///
/// Names come from the position in the full provider list, so dropping a
/// public interface leaves a gap (eth0 public means the first private is eth1).
fn to_network_config(doc: &VultrMetadata) -> NetworkConfig {
    let config = doc
        .interfaces
        .iter()
        .enumerate()
        .filter(|(_, iface)| iface.is_private())
        .map(|(index, iface)| {
            PhysicalConfig::with_static(
                format!("eth{}", index),
                &iface.mac,
                &iface.ipv4.address,
                &iface.ipv4.netmask,
                PRIVATE_MTU,
            )
        })
        .collect();

    NetworkConfig {
        version: NETWORK_CONFIG_VERSION,
        config,
    }
}
