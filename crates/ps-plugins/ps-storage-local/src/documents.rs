//! Read-only bundled documents and the seeded overlay used by collections
//! that ship with data but still accept writes.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use ps_core::traits::DocumentStore;
use tracing::{debug, warn};

use crate::media::load_document;

/// JSON documents shipped with the application (`photodetail.json`,
/// `photoreview.json`, `profile.json`). Never written.
#[derive(Debug, Clone)]
pub struct BundledAssets {
    dir: PathBuf,
}

impl BundledAssets {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl DocumentStore for BundledAssets {
    async fn save_text(&self, name: &str, _content: &str) -> bool {
        warn!(name, "bundled assets are read-only");
        false
    }

    async fn load_text(&self, name: &str) -> Option<String> {
        let path = if name.contains(['/', '\\']) {
            Err(anyhow::anyhow!("invalid asset name {name:?}"))
        } else {
            Ok(self.dir.join(name))
        };
        load_document(path).await
    }
}

/// Reads from the writable store, falling back to the bundle until the
/// document has been written once. Writes always go to the writable store.
pub struct SeededDocuments {
    store: Arc<dyn DocumentStore>,
    bundle: Arc<dyn DocumentStore>,
}

impl SeededDocuments {
    pub fn new(store: Arc<dyn DocumentStore>, bundle: Arc<dyn DocumentStore>) -> Self {
        Self { store, bundle }
    }
}

#[async_trait]
impl DocumentStore for SeededDocuments {
    async fn save_text(&self, name: &str, content: &str) -> bool {
        self.store.save_text(name, content).await
    }

    async fn load_text(&self, name: &str) -> Option<String> {
        if let Some(content) = self.store.load_text(name).await {
            return Some(content);
        }
        debug!(name, "no local copy, reading bundled seed");
        self.bundle.load_text(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::LocalFileStore;

    #[tokio::test]
    async fn bundled_assets_are_read_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("profile.json"), "[]").unwrap();
        let assets = BundledAssets::new(dir.path().to_path_buf());

        assert_eq!(assets.load_text("profile.json").await.as_deref(), Some("[]"));
        assert_eq!(assets.load_text("missing.json").await, None);
        assert!(!assets.save_text("profile.json", "[{}]").await);
        assert_eq!(std::fs::read_to_string(dir.path().join("profile.json")).unwrap(), "[]");
    }

    #[tokio::test]
    async fn seeded_documents_prefer_the_local_copy() {
        let assets_dir = tempfile::tempdir().unwrap();
        let data_dir = tempfile::tempdir().unwrap();
        std::fs::write(assets_dir.path().join("photodetail.json"), r#"[{"id":"seed"}]"#).unwrap();

        let seeded = SeededDocuments::new(
            Arc::new(LocalFileStore::new(data_dir.path().to_path_buf())),
            Arc::new(BundledAssets::new(assets_dir.path().to_path_buf())),
        );

        assert_eq!(seeded.load_text("photodetail.json").await.as_deref(), Some(r#"[{"id":"seed"}]"#));

        assert!(seeded.save_text("photodetail.json", "[]").await);
        assert_eq!(seeded.load_text("photodetail.json").await.as_deref(), Some("[]"));
        assert!(data_dir.path().join("photodetail.json").exists());
    }
}
