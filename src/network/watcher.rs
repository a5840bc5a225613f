//! Interface watcher
//!
//! Blocks the boot sequence until the primary interface holds a usable IPv4
//! address. There is no attempt cap: if networking never comes up the
//! process is expected to be killed by its supervisor.

use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use std::time::Duration;

use network_interface::{Addr, NetworkInterface, NetworkInterfaceConfig};
use tracing::{debug, info};

use super::lease::LeaseHandle;
use crate::BridgeError;

/// Source of the addresses currently bound to an interface
pub trait AddressSource: Send + Sync {
    /// List the addresses on `interface`, in the order the system reports them
    ///
    /// Fails if the interface does not exist or cannot be queried.
    fn addresses(&self, interface: &str) -> Result<Vec<IpAddr>, BridgeError>;
}

/// Reads interface addresses from the running system
#[derive(Debug, Clone, Default)]
pub struct SystemAddresses;

const SYS_CLASS_NET: &str = "/sys/class/net";

impl AddressSource for SystemAddresses {
    fn addresses(&self, interface: &str) -> Result<Vec<IpAddr>, BridgeError> {
        // an interface without addresses is absent from getifaddrs, so check sysfs
        if !Path::new(SYS_CLASS_NET).join(interface).exists() {
            return Err(BridgeError::interface(interface, "no such network interface"));
        }

        let interfaces = NetworkInterface::show()
            .map_err(|e| BridgeError::interface(interface, e.to_string()))?;

        Ok(interfaces
            .into_iter()
            .filter(|iface| iface.name == interface)
            .flat_map(|iface| iface.addr)
            .map(|addr| match addr {
                Addr::V4(v4) => IpAddr::V4(v4.ip),
                Addr::V6(v6) => IpAddr::V6(v6.ip),
            })
            .collect())
    }
}

/// Pick the first non-loopback IPv4 address, accepting IPv4-mapped IPv6
pub fn select_address(addrs: &[IpAddr]) -> Option<Ipv4Addr> {
    addrs.iter().find_map(|addr| {
        let v4 = match addr {
            IpAddr::V4(v4) => *v4,
            IpAddr::V6(v6) => v6.to_ipv4_mapped()?,
        };
        (!v4.is_loopback()).then_some(v4)
    })
}

/// Polls an interface until it has a usable address
pub struct InterfaceWatcher<S = SystemAddresses> {
    source: S,
    interface: String,
    poll_interval: Duration,
}

impl InterfaceWatcher<SystemAddresses> {
    pub fn new(interface: impl Into<String>, poll_interval: Duration) -> Self {
        Self::with_source(SystemAddresses, interface, poll_interval)
    }
}

impl<S: AddressSource> InterfaceWatcher<S> {
    /// Watch `interface` through a custom address source
    pub fn with_source(source: S, interface: impl Into<String>, poll_interval: Duration) -> Self {
        Self {
            source,
            interface: interface.into(),
            poll_interval,
        }
    }

    /// Wait until the interface reports a non-loopback IPv4 address
    ///
    /// On success the DHCP helper, if any, is told to stop. Lookup errors
    /// are returned immediately and never retried.
    pub async fn await_address(
        &self,
        lease: Option<&LeaseHandle>,
    ) -> Result<Ipv4Addr, BridgeError> {
        info!("Waiting for {} to get an IP address", self.interface);

        loop {
            let addrs = self.source.addresses(&self.interface)?;
            debug!("{} reports {} addresses", self.interface, addrs.len());

            if let Some(ip) = select_address(&addrs) {
                info!("Found IP: {}", ip);
                if let Some(lease) = lease {
                    lease.stop();
                }
                return Ok(ip);
            }

            info!(
                "No IP address found, sleeping for {} seconds before trying again",
                self.poll_interval.as_secs()
            );
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
