//! Local filesystem implementation of `MediaStore` and `DocumentStore`.
//!
//! Layout under the app-private root:
//!
//! ```text
//! <root>/
//! ├── photometadata.json, photospot.json, ...   # mutable documents
//! ├── images/<name>
//! └── thumbnails/thumb_<name>
//! ```
//!
//! Directories are created lazily on first write.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ps_core::traits::{DocumentStore, ImageSource, MediaStore};
use tokio::fs;
use tracing::{debug, warn};

use crate::thumbnail::{encode_thumbnail, DEFAULT_THUMBNAIL_QUALITY};

pub const THUMBNAIL_PREFIX: &str = "thumb_";

#[derive(Debug, Clone)]
pub struct LocalFileStore {
    /// Root directory for documents (e.g., "./data")
    root: PathBuf,
    images_dir: PathBuf,
    thumbnails_dir: PathBuf,
    thumbnail_quality: u8,
}

impl LocalFileStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            images_dir: root.join("images"),
            thumbnails_dir: root.join("thumbnails"),
            root,
            thumbnail_quality: DEFAULT_THUMBNAIL_QUALITY,
        }
    }

    pub fn with_dirs(mut self, images_dir: PathBuf, thumbnails_dir: PathBuf) -> Self {
        self.images_dir = images_dir;
        self.thumbnails_dir = thumbnails_dir;
        self
    }

    pub fn with_thumbnail_quality(mut self, quality: u8) -> Self {
        self.thumbnail_quality = quality.clamp(1, 100);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    pub fn thumbnails_dir(&self) -> &Path {
        &self.thumbnails_dir
    }

    fn image_path(&self, name: &str) -> anyhow::Result<PathBuf> {
        Ok(self.images_dir.join(checked_name(name)?))
    }

    fn thumbnail_path(&self, name: &str) -> anyhow::Result<PathBuf> {
        Ok(self
            .thumbnails_dir
            .join(format!("{THUMBNAIL_PREFIX}{}", checked_name(name)?)))
    }

    fn document_path(&self, name: &str) -> anyhow::Result<PathBuf> {
        Ok(self.root.join(checked_name(name)?))
    }

    async fn try_save_image(&self, source: &ImageSource, name: &str) -> anyhow::Result<()> {
        let target = self.image_path(name)?;
        fs::create_dir_all(&self.images_dir).await?;
        let written = match source {
            ImageSource::Path(path) => fs::copy(path, &target).await.map(drop),
            ImageSource::Bytes(bytes) => fs::write(&target, bytes).await,
        };
        if let Err(e) = written {
            // A half-copied file must not pass for a stored image.
            discard(&target).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn try_create_thumbnail(
        &self,
        source: &ImageSource,
        name: &str,
        max_dimension: u32,
    ) -> anyhow::Result<()> {
        let target = self.thumbnail_path(name)?;
        let data = read_source(source).await?;
        let quality = self.thumbnail_quality;

        // Decode and scale before touching the disk so a corrupt source leaves nothing behind.
        let jpeg =
            tokio::task::spawn_blocking(move || encode_thumbnail(&data, max_dimension, quality))
                .await??;

        fs::create_dir_all(&self.thumbnails_dir).await?;
        fs::write(&target, jpeg).await?;
        Ok(())
    }
}

/// Names are plain file names; anything that could escape the directory is refused.
fn checked_name(name: &str) -> anyhow::Result<&str> {
    anyhow::ensure!(
        !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']),
        "invalid file name {name:?}"
    );
    Ok(name)
}

async fn discard(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => debug!(path = %path.display(), "removed partial image"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(error = %e, path = %path.display(), "failed to remove partial image"),
    }
}

async fn read_source(source: &ImageSource) -> anyhow::Result<Vec<u8>> {
    Ok(match source {
        ImageSource::Path(path) => fs::read(path).await?,
        ImageSource::Bytes(bytes) => bytes.to_vec(),
    })
}

async fn existing(path: anyhow::Result<PathBuf>) -> Option<PathBuf> {
    let path = path.ok()?;
    match fs::try_exists(&path).await {
        Ok(true) => Some(path),
        _ => None,
    }
}

#[async_trait]
impl MediaStore for LocalFileStore {
    #[tracing::instrument(level = "debug", skip(self, source))]
    async fn save_image(&self, source: &ImageSource, name: &str) -> bool {
        match self.try_save_image(source, name).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to save image");
                false
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn delete_image(&self, name: &str) -> bool {
        let path = match self.image_path(name) {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "refusing to delete image");
                return false;
            }
        };
        match fs::remove_file(&path).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "failed to delete image");
                false
            }
        }
    }

    async fn image_location(&self, name: &str) -> Option<PathBuf> {
        existing(self.image_path(name)).await
    }

    #[tracing::instrument(level = "debug", skip(self, source))]
    async fn create_thumbnail(&self, source: &ImageSource, name: &str, max_dimension: u32) -> bool {
        match self.try_create_thumbnail(source, name, max_dimension).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to create thumbnail");
                false
            }
        }
    }

    async fn thumbnail_location(&self, name: &str) -> Option<PathBuf> {
        existing(self.thumbnail_path(name)).await
    }
}

#[async_trait]
impl DocumentStore for LocalFileStore {
    #[tracing::instrument(level = "debug", skip(self, content), fields(bytes = content.len()))]
    async fn save_text(&self, name: &str, content: &str) -> bool {
        let result = async {
            let path = self.document_path(name)?;
            fs::create_dir_all(&self.root).await?;
            fs::write(&path, content).await?;
            anyhow::Ok(())
        }
        .await;

        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to save document");
                false
            }
        }
    }

    async fn load_text(&self, name: &str) -> Option<String> {
        load_document(self.document_path(name)).await
    }
}

/// Missing documents are normal on first launch; anything else is worth a warning.
pub(crate) async fn load_document(path: anyhow::Result<PathBuf>) -> Option<String> {
    let path = match path {
        Ok(path) => path,
        Err(e) => {
            warn!(error = %e, "refusing to load document");
            return None;
        }
    };
    match fs::read_to_string(&path).await {
        Ok(content) => Some(content),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "document not found");
            None
        }
        Err(e) => {
            warn!(error = %e, path = %path.display(), "failed to read document");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thumbnail::sample_png;
    use bytes::Bytes;

    fn store() -> (tempfile::TempDir, LocalFileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path().join("data"));
        (dir, store)
    }

    #[tokio::test]
    async fn save_resolve_and_delete_image() {
        let (_dir, store) = store();
        let source = ImageSource::Bytes(Bytes::from_static(b"raw image bytes"));

        assert!(store.image_location("a.jpg").await.is_none());
        assert!(store.save_image(&source, "a.jpg").await);

        let path = store.image_location("a.jpg").await.expect("image should exist");
        assert_eq!(std::fs::read(&path).unwrap(), b"raw image bytes");

        assert!(store.delete_image("a.jpg").await);
        assert!(store.image_location("a.jpg").await.is_none());
        assert!(!store.delete_image("a.jpg").await);
    }

    #[tokio::test]
    async fn save_image_copies_from_a_path() {
        let (dir, store) = store();
        let picked = dir.path().join("picked.png");
        std::fs::write(&picked, sample_png(8, 8)).unwrap();

        assert!(store.save_image(&ImageSource::Path(picked), "b.jpg").await);
        assert!(store.images_dir().join("b.jpg").exists());
    }

    #[tokio::test]
    async fn missing_source_path_fails_quietly() {
        let (dir, store) = store();
        let source = ImageSource::Path(dir.path().join("gone.png"));
        assert!(!store.save_image(&source, "c.jpg").await);
        assert!(store.image_location("c.jpg").await.is_none());
    }

    #[tokio::test]
    async fn failed_save_leaves_no_file_under_the_name() {
        let (dir, store) = store();
        std::fs::create_dir_all(store.images_dir()).unwrap();
        std::fs::write(store.images_dir().join("d.jpg"), b"trunc").unwrap();

        let source = ImageSource::Path(dir.path().join("gone.png"));
        assert!(!store.save_image(&source, "d.jpg").await);
        assert!(!store.images_dir().join("d.jpg").exists());
    }

    #[tokio::test]
    async fn names_cannot_escape_the_store() {
        let (_dir, store) = store();
        let source = ImageSource::Bytes(Bytes::from_static(b"x"));
        assert!(!store.save_image(&source, "../escape.jpg").await);
        assert!(!store.save_text("../escape.json", "[]").await);
        assert!(store.image_location("..").await.is_none());
    }

    #[tokio::test]
    async fn thumbnail_is_prefixed_and_scaled() {
        let (_dir, store) = store();
        let source = ImageSource::Bytes(Bytes::from(sample_png(900, 600)));

        assert!(store.create_thumbnail(&source, "d.jpg", 300).await);
        let path = store.thumbnail_location("d.jpg").await.expect("thumbnail should exist");
        assert!(path.ends_with("thumb_d.jpg"));

        let thumb = image::open(&path).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (300, 200));
    }

    #[tokio::test]
    async fn corrupt_source_leaves_no_thumbnail() {
        let (_dir, store) = store();
        let source = ImageSource::Bytes(Bytes::from_static(b"not an image"));

        assert!(!store.create_thumbnail(&source, "e.jpg", 300).await);
        assert!(store.thumbnail_location("e.jpg").await.is_none());
    }

    #[tokio::test]
    async fn text_documents_round_trip() {
        let (_dir, store) = store();
        assert_eq!(store.load_text("photometadata.json").await, None);
        assert!(store.save_text("photometadata.json", "[]").await);
        assert_eq!(store.load_text("photometadata.json").await.as_deref(), Some("[]"));
    }
}
