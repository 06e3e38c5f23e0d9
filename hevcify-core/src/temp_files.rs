//! Temporary workspace management.
//!
//! Each batch run gets one scratch directory inside the input directory,
//! backed by a `tempfile::TempDir`, so it is removed when dropped on every
//! exit path, including early returns and panic unwinds. The normal path
//! closes it explicitly so a removal failure can be reported.
//!
//! Once a converted file is stranded in the workspace (its original already
//! deleted) the workspace is kept on disk from that moment on.
//!
//! The path of the live workspace is also registered process-wide, so a
//! signal handler that has to exit without unwinding can still remove it
//! with [`remove_active_workspaces`].

use crate::config::CoreConfig;
use crate::error::CoreResult;
use crate::terminal_output::print_error;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::{Builder as TempFileBuilder, TempDir};

static ACTIVE_WORKSPACES: Mutex<Vec<PathBuf>> = Mutex::new(Vec::new());

fn register(path: &Path) {
    if let Ok(mut active) = ACTIVE_WORKSPACES.lock() {
        active.push(path.to_path_buf());
    }
}

fn unregister(path: &Path) {
    if let Ok(mut active) = ACTIVE_WORKSPACES.lock() {
        active.retain(|p| p != path);
    }
}

/// Serialises tests that create workspaces, since the registry is shared.
#[cfg(test)]
pub(crate) fn registry_test_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// Scratch directory for one batch run.
#[derive(Debug)]
pub struct Workspace {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl Workspace {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the directory will survive this guard.
    #[must_use]
    pub fn is_kept(&self) -> bool {
        self.dir.is_none()
    }

    /// Leaves the directory on disk from now on, whatever happens next.
    pub fn keep(&mut self) {
        if let Some(dir) = self.dir.take() {
            let _ = dir.keep();
            unregister(&self.path);
            log::debug!("Workspace {} will be kept", self.path.display());
        }
    }

    /// Removes the directory, reporting the path if it has to be deleted by
    /// hand. A kept workspace is reported instead of removed.
    pub fn close(mut self) {
        unregister(&self.path);
        let Some(dir) = self.dir.take() else {
            print_error(&format!(
                "Temporary directory {} was kept: it contains converted files that could not be moved into place",
                self.path.display()
            ));
            return;
        };

        match dir.close() {
            Ok(()) => log::debug!("Removed workspace {}", self.path.display()),
            Err(e) => print_error(&format!(
                "Could not remove temporary directory {} ({e}); please delete it manually",
                self.path.display()
            )),
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.dir.is_some() {
            unregister(&self.path);
        }
    }
}

/// Creates the per-run workspace in the input directory. Auto-cleaned when dropped.
pub fn create_workspace(config: &CoreConfig) -> CoreResult<Workspace> {
    let dir = TempFileBuilder::new()
        .prefix(&config.temp_dir_prefix)
        .tempdir_in(&config.input_dir)?;
    let path = dir.path().to_path_buf();
    register(&path);
    log::debug!("Created workspace {}", path.display());
    Ok(Workspace {
        dir: Some(dir),
        path,
    })
}

/// Deletes every live workspace and returns their paths.
///
/// For callers about to terminate the process without unwinding. Kept
/// workspaces are not registered and are never touched.
pub fn remove_active_workspaces() -> Vec<PathBuf> {
    let paths = match ACTIVE_WORKSPACES.lock() {
        Ok(mut active) => std::mem::take(&mut *active),
        Err(_) => return Vec::new(),
    };
    for path in &paths {
        if let Err(e) = std::fs::remove_dir_all(path) {
            log::warn!("Could not remove {}: {e}", path.display());
        }
    }
    paths
}
