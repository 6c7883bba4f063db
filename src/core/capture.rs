use crate::domain::ports::PhotoSource;
use std::path::{Path, PathBuf};

/// Photo source backed by a file the user already picked.
///
/// Capturing copies the picked file into the app data directory under a random
/// `<uuid>.jpg` name; the staged copy is what gets uploaded, and it is removed
/// again by `discard`.
#[derive(Debug, Clone)]
pub struct FilePhotoSource {
    app_data_dir: PathBuf,
    picked: Option<PathBuf>,
}

impl FilePhotoSource {
    pub fn new(app_data_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_data_dir: app_data_dir.into(),
            picked: None,
        }
    }

    pub fn with_photo(mut self, photo: impl Into<PathBuf>) -> Self {
        self.picked = Some(photo.into());
        self
    }
}

impl PhotoSource for FilePhotoSource {
    fn is_capture_supported(&self) -> bool {
        true
    }

    async fn capture(&self) -> std::io::Result<Option<PathBuf>> {
        let Some(picked) = &self.picked else {
            return Ok(None);
        };

        tokio::fs::create_dir_all(&self.app_data_dir).await?;
        let staged = self
            .app_data_dir
            .join(format!("{}.jpg", uuid::Uuid::new_v4()));

        let bytes = tokio::fs::copy(picked, &staged).await?;
        tracing::debug!(
            "Staged {} ({} bytes) as {}",
            picked.display(),
            bytes,
            staged.display()
        );

        Ok(Some(staged))
    }

    async fn discard(&self, photo: &Path) -> std::io::Result<()> {
        // 只刪除自己暫存的檔案，使用者挑選的原檔不動
        if !photo.starts_with(&self.app_data_dir) {
            return Ok(());
        }
        tokio::fs::remove_file(photo).await
    }
}
