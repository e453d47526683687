//! Cooperative cancellation of a running analysis.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::CoreResult;

/// Polled once per frame by the analysis driver.
pub trait CancellationSignal {
    fn is_cancelled(&self) -> bool;
}

/// Never cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl CancellationSignal for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// In-process flag shared between the analysis thread and its controller.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl CancellationSignal for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// File whose presence asks analyses sharing a work directory to stop.
#[derive(Debug, Clone)]
pub struct StopMarker {
    path: PathBuf,
}

impl StopMarker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The `stop` file inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("stop"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn request(&self) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, b"stopped")?;
        Ok(())
    }

    /// Removes a stale marker before a new run starts.
    pub fn clear(&self) -> CoreResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl CancellationSignal for StopMarker {
    fn is_cancelled(&self) -> bool {
        self.path.exists()
    }
}

impl<T: CancellationSignal + ?Sized> CancellationSignal for &T {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_shared_between_clones() {
        let token = CancellationToken::new();
        let observer = token.clone();
        assert!(!observer.is_cancelled());
        token.cancel();
        assert!(observer.is_cancelled());
    }

    #[test]
    fn stop_marker_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let marker = StopMarker::in_dir(dir.path());
        assert!(!marker.is_cancelled());
        marker.request().unwrap();
        assert!(marker.is_cancelled());
        marker.clear().unwrap();
        assert!(!marker.is_cancelled());
        marker.clear().unwrap();
    }
}
