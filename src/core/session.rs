use crate::core::table::FoodTable;
use crate::domain::model::FoodRow;
use crate::domain::ports::{PhotoAnalyzer, PhotoSource, RowSource};
use crate::utils::error::{AnalysisError, FetchError};

pub const UNSUPPORTED_DEVICE_MESSAGE: &str = "Your device is not supported";

#[derive(Debug)]
pub enum CaptureOutcome {
    /// The photo source cannot capture at all.
    Unsupported,
    Cancelled,
    Appended(FoodRow),
    Failed(AnalysisError),
}

/// One open table view: rows loaded from the store plus rows added by analysis.
///
/// `capture_and_analyze` borrows the session mutably, so a session never has two
/// uploads in flight.
pub struct TableSession<R: RowSource, A: PhotoAnalyzer> {
    rows: R,
    analyzer: A,
    table: FoodTable,
}

impl<R: RowSource, A: PhotoAnalyzer> TableSession<R, A> {
    pub fn new(rows: R, analyzer: A) -> Self {
        Self {
            rows,
            analyzer,
            table: FoodTable::default(),
        }
    }

    pub fn table(&self) -> &FoodTable {
        &self.table
    }

    pub fn into_table(self) -> FoodTable {
        self.table
    }

    /// Replaces the table with the stored rows. On failure the table is left
    /// empty and the error is returned so callers can tell it apart from an
    /// empty store.
    pub async fn load(&mut self) -> Result<&FoodTable, FetchError> {
        match self.rows.fetch_rows().await {
            Ok(rows) => {
                tracing::info!("Loaded {} food rows", rows.len());
                self.table.replace_rows(rows);
                Ok(&self.table)
            }
            Err(e) => {
                tracing::error!(kind = e.kind(), "Loading food table failed: {}", e);
                self.table.replace_rows(Vec::new());
                Err(e)
            }
        }
    }

    pub async fn capture_and_analyze<P: PhotoSource>(&mut self, source: &P) -> CaptureOutcome {
        if !source.is_capture_supported() {
            tracing::warn!("{}", UNSUPPORTED_DEVICE_MESSAGE);
            return CaptureOutcome::Unsupported;
        }

        let photo = match source.capture().await {
            Ok(Some(photo)) => photo,
            Ok(None) => {
                tracing::debug!("Capture cancelled");
                return CaptureOutcome::Cancelled;
            }
            Err(e) => {
                tracing::error!("Capturing photo failed: {}", e);
                return CaptureOutcome::Failed(AnalysisError::Io(e));
            }
        };

        let analyzed = self.analyzer.analyze(&photo).await;
        if let Err(e) = source.discard(&photo).await {
            tracing::warn!("Removing staged photo {} failed: {}", photo.display(), e);
        }

        match analyzed {
            Ok(row) => {
                tracing::info!("Appending analyzed row for '{}'", row.food_item);
                self.table.push_row(row.clone());
                CaptureOutcome::Appended(row)
            }
            Err(e) => {
                tracing::error!(kind = e.kind(), "Photo analysis failed: {}", e);
                CaptureOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StaticRows(Vec<FoodRow>);

    #[async_trait]
    impl RowSource for StaticRows {
        async fn fetch_rows(&self) -> Result<Vec<FoodRow>, FetchError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenRows;

    #[async_trait]
    impl RowSource for BrokenRows {
        async fn fetch_rows(&self) -> Result<Vec<FoodRow>, FetchError> {
            Err(FetchError::Connection(sqlx::Error::PoolTimedOut))
        }
    }

    #[derive(Clone)]
    struct MockAnalyzer {
        result: Option<FoodRow>,
        calls: Arc<AtomicUsize>,
    }

    impl MockAnalyzer {
        fn returning(row: Option<FoodRow>) -> Self {
            Self {
                result: row,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl PhotoAnalyzer for MockAnalyzer {
        async fn analyze(&self, _photo: &Path) -> Result<FoodRow, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone().ok_or_else(|| AnalysisError::BadResponse {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                body: String::new(),
            })
        }
    }

    struct StubSource {
        supported: bool,
        photo: Option<PathBuf>,
        discarded: std::sync::Mutex<Vec<PathBuf>>,
    }

    impl StubSource {
        fn new(supported: bool, photo: Option<PathBuf>) -> Self {
            Self {
                supported,
                photo,
                discarded: std::sync::Mutex::new(Vec::new()),
            }
        }

        fn discarded(&self) -> Vec<PathBuf> {
            self.discarded.lock().unwrap().clone()
        }
    }

    impl PhotoSource for StubSource {
        fn is_capture_supported(&self) -> bool {
            self.supported
        }

        async fn capture(&self) -> std::io::Result<Option<PathBuf>> {
            Ok(self.photo.clone())
        }

        async fn discard(&self, photo: &Path) -> std::io::Result<()> {
            self.discarded.lock().unwrap().push(photo.to_path_buf());
            Ok(())
        }
    }

    fn stored() -> Vec<FoodRow> {
        vec![
            FoodRow::new("Salad", "120", "0", "120"),
            FoodRow::new("Burger", "40", "450", "490"),
        ]
    }

    fn photo() -> StubSource {
        StubSource::new(true, Some(PathBuf::from("/tmp/photo.jpg")))
    }

    #[tokio::test]
    async fn test_load_renders_stored_rows() {
        let mut session = TableSession::new(StaticRows(stored()), MockAnalyzer::returning(None));

        let table = session.load().await.unwrap();
        assert_eq!(table.rows(), &stored()[..]);
        assert_eq!(table.display_rows().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_load_leaves_empty_table() {
        let mut session = TableSession::new(BrokenRows, MockAnalyzer::returning(None));

        assert!(session.load().await.is_err());
        assert!(session.table().is_empty());
        assert_eq!(session.table().display_rows().len(), 1);
    }

    #[tokio::test]
    async fn test_analysis_appends_row_last() {
        let new_row = FoodRow::new("Pasta", "90", "310", "400");
        let mut session = TableSession::new(
            StaticRows(stored()),
            MockAnalyzer::returning(Some(new_row.clone())),
        );
        session.load().await.unwrap();

        let source = photo();
        let outcome = session.capture_and_analyze(&source).await;

        assert!(matches!(outcome, CaptureOutcome::Appended(ref row) if *row == new_row));
        assert_eq!(source.discarded(), vec![PathBuf::from("/tmp/photo.jpg")]);
        let rows = session.table().rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[..2], &stored()[..]);
        assert_eq!(rows[2], new_row);
    }

    #[tokio::test]
    async fn test_failed_analysis_appends_nothing() {
        let mut session = TableSession::new(StaticRows(stored()), MockAnalyzer::returning(None));
        session.load().await.unwrap();

        let source = photo();
        let outcome = session.capture_and_analyze(&source).await;

        assert!(matches!(
            outcome,
            CaptureOutcome::Failed(AnalysisError::BadResponse { .. })
        ));
        assert_eq!(source.discarded().len(), 1);
        assert_eq!(session.table().len(), 2);
    }

    #[tokio::test]
    async fn test_unsupported_source_skips_analysis() {
        let analyzer = MockAnalyzer::returning(Some(FoodRow::default()));
        let calls = analyzer.calls.clone();
        let mut session = TableSession::new(StaticRows(stored()), analyzer);

        let source = StubSource::new(false, None);
        let outcome = session.capture_and_analyze(&source).await;

        assert!(matches!(outcome, CaptureOutcome::Unsupported));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancelled_capture_skips_analysis() {
        let analyzer = MockAnalyzer::returning(Some(FoodRow::default()));
        let calls = analyzer.calls.clone();
        let mut session = TableSession::new(StaticRows(stored()), analyzer);

        let source = StubSource::new(true, None);
        let outcome = session.capture_and_analyze(&source).await;

        assert!(matches!(outcome, CaptureOutcome::Cancelled));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(session.into_table().is_empty());
    }
}
