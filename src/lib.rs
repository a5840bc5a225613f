//! vultr-nocloud library
//!
//! Bridges the Vultr instance metadata service to a cloud-init NoCloud seed
//! directory. Runs once at boot:
//!
//! 1. Start a one-shot DHCP client on the primary interface (best effort)
//! 2. Wait until the interface has a non-loopback IPv4 address
//! 3. Fetch `/v1.json` from the metadata service
//! 4. Translate it into NoCloud meta-data and network-config
//! 5. Write meta-data, network-config and user-data to the seed directory
//!
//! Every failure after step 1 is fatal. Retrying is left to whatever
//! supervises the process.

pub mod config;
pub mod datasources;
pub mod network;
pub mod nocloud;

mod error;

pub use config::BridgeConfig;
pub use error::BridgeError;

use std::path::Path;
use tracing::info;

use datasources::MetadataSource;
use datasources::vultr::Vultr;
use network::lease::LeaseAcquirer;
use network::watcher::InterfaceWatcher;
use nocloud::{Seed, write_seed};

/// Run the full boot sequence
///
/// The DHCP helper is owned by this call and is killed when it returns,
/// whether it succeeds or fails, or when the future is dropped.
pub async fn run(config: &BridgeConfig) -> Result<(), BridgeError> {
    config.validate()?;

    let lease = LeaseAcquirer::new(&config.dhcp_program, config.dhcp_args.clone()).start()?;

    InterfaceWatcher::new(&config.interface, config.poll_interval)
        .await_address(Some(&lease))
        .await?;

    let source = Vultr::with_url(&config.metadata_url, config.fetch_timeout)?;
    run_with(&source, &config.output_dir).await?;

    info!("NoCloud seed written to {}", config.output_dir.display());
    Ok(())
}

/// Fetch, translate and write the seed once the network is usable
///
/// Nothing is written unless the fetch succeeds.
pub async fn run_with(source: &dyn MetadataSource, output_dir: &Path) -> Result<Seed, BridgeError> {
    let doc = source.fetch().await?;
    info!(
        "Retrieved {} metadata for instance {}",
        source.name(),
        doc.instance_id
    );

    let seed = Seed::from_vultr(&doc);
    write_seed(&seed, output_dir).await?;

    Ok(seed)
}
