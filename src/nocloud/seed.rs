//! Seed directory writer
//!
//! meta-data is written as JSON and network-config as YAML, the formats
//! cloud-init expects for each. Files are written in order and the first
//! failure stops the sequence; files already written are left in place.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use super::{NoCloudMetadata, Seed, UserData};
use crate::BridgeError;
use crate::network::NetworkConfig;

pub const META_DATA: &str = "meta-data";
pub const NETWORK_CONFIG: &str = "network-config";
pub const USER_DATA: &str = "user-data";

/// rw-r--r--
const SEED_FILE_MODE: u32 = 0o644;

/// Write meta-data, network-config and user-data in that order
pub async fn write_seed(seed: &Seed, output_dir: &Path) -> Result<(), BridgeError> {
    info!("Writing NoCloud seed to {}", output_dir.display());

    write_metadata(&seed.metadata, output_dir).await?;
    write_network_config(&seed.network_config, output_dir).await?;
    write_userdata(&seed.userdata, output_dir).await?;

    Ok(())
}

pub async fn write_metadata(
    metadata: &NoCloudMetadata,
    output_dir: &Path,
) -> Result<PathBuf, BridgeError> {
    let content = serde_json::to_vec(metadata)?;
    write_file(output_dir.join(META_DATA), &content).await
}

pub async fn write_network_config(
    config: &NetworkConfig,
    output_dir: &Path,
) -> Result<PathBuf, BridgeError> {
    let content = config.to_yaml()?;
    write_file(output_dir.join(NETWORK_CONFIG), content.as_bytes()).await
}

pub async fn write_userdata(
    userdata: &UserData,
    output_dir: &Path,
) -> Result<PathBuf, BridgeError> {
    write_file(output_dir.join(USER_DATA), userdata.as_bytes()).await
}

async fn write_file(path: PathBuf, content: &[u8]) -> Result<PathBuf, BridgeError> {
    debug!("Writing {} bytes to {}", content.len(), path.display());

    fs::write(&path, content)
        .await
        .map_err(|e| BridgeError::write(&path, e))?;

    set_permissions(&path).await?;

    Ok(path)
}

async fn set_permissions(path: &Path) -> Result<(), BridgeError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(path, std::fs::Permissions::from_mode(SEED_FILE_MODE))
            .await
            .map_err(|e| BridgeError::write(path, e))?;
    }

    Ok(())
}
