pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use config::AppConfig;
pub use self::core::{
    analysis::PhotoAnalysisClient,
    capture::FilePhotoSource,
    row_store::RowStoreGateway,
    session::{CaptureOutcome, TableSession},
    table::{append_row, FoodTable},
};
pub use domain::model::FoodRow;
pub use utils::error::{AnalysisError, AppError, FetchError, Result};
