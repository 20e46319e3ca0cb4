//! Raw HTML dumps of every fetched page.
//!
//! Selectors break whenever a site changes its markup, and the saved page is
//! the quickest way to see what the scraper actually received. Nothing reads
//! these files back.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct DebugArtifacts {
    dir: Option<PathBuf>,
}

impl DebugArtifacts {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: Some(dir.into()) }
    }

    /// Artifacts are dropped on the floor.
    pub fn disabled() -> Self {
        Self { dir: None }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Write `body` to `<dir>/<name>.html`. Failures are logged only.
    pub async fn save(&self, name: &str, body: &str) -> Option<PathBuf> {
        let dir = self.dir.as_ref()?;
        if let Err(e) = fs::create_dir_all(dir).await {
            warn!(dir = %dir.display(), error = %e, "Could not create debug directory");
            return None;
        }
        let path = dir.join(format!("{name}.html"));
        match fs::write(&path, body).await {
            Ok(()) => {
                debug!(path = %path.display(), bytes = body.len(), "Saved debug artifact");
                Some(path)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not write debug artifact");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_writes_html_file() {
        let tmp = tempfile::tempdir().unwrap();
        let artifacts = DebugArtifacts::new(tmp.path().join("debug"));
        let path = artifacts.save("yahoo_finance", "<html></html>").await.unwrap();
        assert!(path.ends_with("debug/yahoo_finance.html"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "<html></html>");
    }

    #[tokio::test]
    async fn test_disabled_writes_nothing() {
        let artifacts = DebugArtifacts::disabled();
        assert!(artifacts.dir().is_none());
        assert!(artifacts.save("cnbc_finance", "<html></html>").await.is_none());
    }
}
