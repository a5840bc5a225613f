//! Runtime configuration
//!
//! Only the output directory comes from the command line. Everything else is
//! an environment assumption of a Vultr guest and is fixed by the defaults
//! below; the fields exist so tests can substitute a mock metadata server or
//! a fake DHCP helper.

use std::path::PathBuf;
use std::time::Duration;

use crate::BridgeError;

/// Default NoCloud seed directory scanned by cloud-init
pub const DEFAULT_OUTPUT_DIR: &str = "/var/lib/cloud/seed/nocloud/";

/// Primary interface on Vultr guests
pub const PRIMARY_INTERFACE: &str = "eth0";

/// Vultr metadata service (link-local address)
pub const METADATA_URL: &str = "http://169.254.169.254/v1.json";

/// Overall bound on the metadata request, body read included
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(120);

/// Delay between interface address polls
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// DHCP client used to speed up address assignment
pub const DHCP_CLIENT: &str = "/usr/sbin/dhclient";

/// Settings for one run of the bridge
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Directory that receives meta-data, network-config and user-data
    pub output_dir: PathBuf,
    /// Interface to wait on and hand to the DHCP client
    pub interface: String,
    /// Metadata document URL
    pub metadata_url: String,
    /// Timeout covering connect, request and body read
    pub fetch_timeout: Duration,
    /// Sleep between address polls
    pub poll_interval: Duration,
    /// Helper program that performs one DHCP attempt
    pub dhcp_program: PathBuf,
    /// Arguments for the helper program
    pub dhcp_args: Vec<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_DIR)
    }
}

impl BridgeConfig {
    /// Create a configuration with default settings writing into `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            interface: PRIMARY_INTERFACE.to_string(),
            metadata_url: METADATA_URL.to_string(),
            fetch_timeout: FETCH_TIMEOUT,
            poll_interval: POLL_INTERVAL,
            dhcp_program: PathBuf::from(DHCP_CLIENT),
            // one attempt, verbose, stay in the foreground
            dhcp_args: ["-1", "-v", "-d", PRIMARY_INTERFACE]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Check that the output directory exists and is a directory
    ///
    /// Runs before any network or process activity.
    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(BridgeError::Config(
                "The output directory must be given".to_string(),
            ));
        }

        match std::fs::metadata(&self.output_dir) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(BridgeError::Config(format!(
                "Output directory {} is not a directory",
                self.output_dir.display()
            ))),
            Err(e) => Err(BridgeError::Config(format!(
                "Error checking output directory {}: {}",
                self.output_dir.display(),
                e
            ))),
        }
    }
}
