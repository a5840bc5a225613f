//! Network module
//!
//! Holds the NoCloud network-config model written to the seed directory,
//! plus the boot-time helpers that bring the primary interface up far
//! enough to reach the metadata service.

pub mod lease;
pub mod watcher;

use serde::{Deserialize, Serialize};

/// Version tag written at the top of network-config
pub const NETWORK_CONFIG_VERSION: u8 = 2;

/// MTU applied to every private interface
pub const PRIVATE_MTU: u32 = 1450;

/// Network configuration written to `network-config`
///
/// Uses the list-of-physical-interfaces layout under a fixed version tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub version: u8,
    #[serde(default)]
    pub config: Vec<PhysicalConfig>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            version: NETWORK_CONFIG_VERSION,
            config: Vec::new(),
        }
    }
}

/// Physical interface entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalConfig {
    /// Always "physical"
    #[serde(rename = "type")]
    pub interface_type: String,
    /// Interface name (e.g., "eth1")
    pub name: String,
    /// MAC address for matching
    pub mac_address: String,
    /// Subnets (IP configuration)
    #[serde(default)]
    pub subnets: Vec<SubnetConfig>,
    /// MTU
    pub mtu: u32,
}

/// Subnet/IP configuration
///
/// There is deliberately no gateway field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetConfig {
    /// Subnet type, always "static" here
    #[serde(rename = "type")]
    pub subnet_type: String,
    /// IP address
    pub address: String,
    /// Netmask in dotted form
    pub netmask: String,
}

impl PhysicalConfig {
    /// Physical interface with a single static subnet
    pub fn with_static(
        name: impl Into<String>,
        mac_address: impl Into<String>,
        address: impl Into<String>,
        netmask: impl Into<String>,
        mtu: u32,
    ) -> Self {
        Self {
            interface_type: "physical".to_string(),
            name: name.into(),
            mac_address: mac_address.into(),
            subnets: vec![SubnetConfig {
                subnet_type: "static".to_string(),
                address: address.into(),
                netmask: netmask.into(),
            }],
            mtu,
        }
    }
}

impl NetworkConfig {
    /// Render as YAML
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Parse network config from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_yaml() {
        let yaml = NetworkConfig::default().to_yaml().unwrap();
        assert!(yaml.contains("version: 2"));
        assert!(yaml.contains("config: []"));
    }

    #[test]
    fn test_physical_yaml_layout() {
        let config = NetworkConfig {
            version: NETWORK_CONFIG_VERSION,
            config: vec![PhysicalConfig::with_static(
                "eth1",
                "5a:00:00:00:00:02",
                "10.1.0.2",
                "255.255.255.0",
                PRIVATE_MTU,
            )],
        };

        let yaml = config.to_yaml().unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        let iface = &value["config"][0];

        assert_eq!(iface["type"].as_str(), Some("physical"));
        assert_eq!(iface["name"].as_str(), Some("eth1"));
        assert_eq!(iface["mac_address"].as_str(), Some("5a:00:00:00:00:02"));
        assert_eq!(iface["mtu"].as_u64(), Some(1450));
        assert_eq!(iface["subnets"][0]["type"].as_str(), Some("static"));
        assert_eq!(iface["subnets"][0]["address"].as_str(), Some("10.1.0.2"));
        assert_eq!(iface["subnets"][0]["netmask"].as_str(), Some("255.255.255.0"));
        assert!(iface["subnets"][0].get("gateway").is_none());
    }

    #[test]
    fn test_yaml_reparses() {
        let config = NetworkConfig {
            version: NETWORK_CONFIG_VERSION,
            config: vec![PhysicalConfig::with_static(
                "eth0", "aa", "10.0.0.1", "255.0.0.0", 1450,
            )],
        };
        let parsed = NetworkConfig::from_yaml(&config.to_yaml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
