use crate::domain::model::FoodRow;
use crate::utils::error::{AnalysisError, FetchError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Source of the rows shown when the table opens.
#[async_trait]
pub trait RowSource: Send + Sync {
    async fn fetch_rows(&self) -> Result<Vec<FoodRow>, FetchError>;
}

/// Turns a photo on disk into a calorie breakdown.
#[async_trait]
pub trait PhotoAnalyzer: Send + Sync {
    async fn analyze(&self, photo: &Path) -> Result<FoodRow, AnalysisError>;
}

pub trait PhotoSource: Send + Sync {
    fn is_capture_supported(&self) -> bool;

    /// `Ok(None)` means the user backed out without picking a photo.
    fn capture(
        &self,
    ) -> impl std::future::Future<Output = std::io::Result<Option<PathBuf>>> + Send;

    /// Called once the captured photo has been uploaded (or the upload failed).
    fn discard(
        &self,
        photo: &Path,
    ) -> impl std::future::Future<Output = std::io::Result<()>> + Send;
}
