//! DHCP lease acquisition
//!
//! Runs one dhclient attempt in the background to speed up address
//! assignment on the primary interface. Progress never depends on it: the
//! interface watcher decides when the network is usable and then stops it.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;

use tokio::process::Command;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::BridgeError;

/// Launches the DHCP helper process
#[derive(Debug, Clone)]
pub struct LeaseAcquirer {
    program: PathBuf,
    args: Vec<String>,
}

impl LeaseAcquirer {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Spawn the helper and supervise it on a background task
    ///
    /// A helper that starts and later exits non-zero is fine. Failing to
    /// start it at all (missing binary, permission denied) is fatal.
    pub fn start(&self) -> Result<LeaseHandle, BridgeError> {
        info!("Starting DHCP client: {} {}", self.program.display(), self.args.join(" "));

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                BridgeError::Command(format!(
                    "Error running {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        let stop = Arc::new(Notify::new());
        let signal = Arc::clone(&stop);

        let task = tokio::spawn(async move {
            let stopped = tokio::select! {
                status = child.wait() => {
                    match status {
                        Ok(status) => debug!("DHCP client exited with {}", status),
                        Err(e) => warn!("Error waiting for DHCP client: {}", e),
                    }
                    false
                }
                _ = signal.notified() => true,
            };

            if stopped {
                match child.kill().await {
                    Ok(()) => debug!("DHCP client stopped"),
                    Err(e) => warn!("Failed to stop DHCP client: {}", e),
                }
            }
        });

        Ok(LeaseHandle {
            stop,
            task: Some(task),
        })
    }
}

/// Handle to a running DHCP helper
///
/// Dropping the handle kills the helper if it is still running, so every
/// exit path of the pipeline releases it.
#[derive(Debug)]
pub struct LeaseHandle {
    stop: Arc<Notify>,
    task: Option<JoinHandle<()>>,
}

impl LeaseHandle {
    /// Ask the helper to stop without waiting for it
    pub fn stop(&self) {
        self.stop.notify_one();
    }

    /// Whether the supervising task has finished
    #[cfg(test)]
    pub(crate) fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|task| task.is_finished())
    }

    /// Wait for the supervising task to finish
    #[cfg(test)]
    pub(crate) async fn join(mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("DHCP supervisor task failed: {}", e);
            }
        }
    }
}

impl Drop for LeaseHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            // aborting drops the child, and kill_on_drop delivers SIGKILL
            task.abort();
        }
    }
}
