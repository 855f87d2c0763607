// Launcher notifications
//
// The host launcher owns the UI and the file-permission handling. The package
// only asks it to do things through an EventSink, so launch logic stays
// testable without a running host.

use crate::error::{PackageError, Result};
use camino::Utf8PathBuf;
use std::fs::OpenOptions;

/// Requests sent from the package to the host launcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LauncherEvent {
    /// Short status line shown while the launch is prepared
    StatusUpdate { status: String },

    /// Make sure `path` is accessible before it is touched.
    ///
    /// The host may try to fix permissions; the call fails if access is still
    /// denied afterwards.
    VerifyFileAccess { path: Utf8PathBuf, write: bool },
}

/// Synchronous notification channel to the host.
pub trait EventSink: Send + Sync {
    fn fire(&self, event: LauncherEvent) -> Result<()>;
}

/// [`EventSink`] for running without a host: status goes to the log and file
/// access is checked directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn fire(&self, event: LauncherEvent) -> Result<()> {
        match event {
            LauncherEvent::StatusUpdate { status } => {
                tracing::info!("{}", status);
                Ok(())
            }
            LauncherEvent::VerifyFileAccess { path, write } => {
                let mut options = OpenOptions::new();
                options.read(true);
                if write {
                    // Open for writing without truncating or creating
                    options.write(true);
                }
                match options.open(&path) {
                    Ok(_) => {
                        tracing::debug!("Access to {} verified (write={})", path, write);
                        Ok(())
                    }
                    Err(source) => Err(PackageError::FileAccessDenied { path, source }),
                }
            }
        }
    }
}
