use thiserror::Error;

/// Row Store Gateway 失敗
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Database connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Query failed: {0}")]
    Query(#[source] sqlx::Error),

    #[error("Column {column} could not be read as text: {source}")]
    Decode {
        column: usize,
        #[source]
        source: sqlx::Error,
    },
}

/// Photo Analysis Client 失敗
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Photo file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Analysis request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Analysis service returned {status}: {body}")]
    BadResponse {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Malformed analysis response: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl AnalysisError {
    /// 傳輸層錯誤與資料錯誤的粗分類，用於日誌
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Io(_) => "io",
            AnalysisError::Network(_) => "network",
            AnalysisError::BadResponse { .. } => "bad_response",
            AnalysisError::MalformedJson(_) => "malformed_json",
        }
    }
}

impl FetchError {
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Connection(_) => "connection",
            FetchError::Query(_) => "query",
            FetchError::Decode { .. } => "decode",
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
