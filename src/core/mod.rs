pub mod analysis;
pub mod capture;
pub mod row_store;
pub mod session;
pub mod table;

pub use crate::domain::model::{AnalysisResponse, FoodRow};
pub use crate::domain::ports::{PhotoAnalyzer, PhotoSource, RowSource};
pub use crate::utils::error::Result;
