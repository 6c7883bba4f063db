use crate::config::DatabaseConfig;
use crate::domain::model::FoodRow;
use crate::domain::ports::RowSource;
use crate::utils::error::{FetchError, Result};
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnection, MySqlRow};
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::{Column, Connection, Row, TypeInfo};
use tracing::instrument;
use url::Url;

/// No bind parameters, so MySQL answers over the text protocol and every
/// column can fall back to a plain string read.
pub const FOOD_ITEMS_QUERY: &str = "SELECT food_item, vegetable, meat, total FROM food_items";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    MySql,
    Sqlite,
}

impl Backend {
    fn from_url(url: &str) -> std::result::Result<Self, FetchError> {
        let scheme = url.split(':').next().unwrap_or_default();
        match scheme {
            "mysql" => Ok(Backend::MySql),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(FetchError::Connection(sqlx::Error::Configuration(
                format!("unsupported database scheme: {}", other).into(),
            ))),
        }
    }
}

/// How a MySQL column is turned into display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MySqlCell {
    Text,
    Signed,
    Unsigned,
    Float,
    /// DECIMAL, dates and anything else read as the raw text MySQL sent.
    Raw,
}

impl MySqlCell {
    pub fn for_type_name(name: &str) -> Self {
        match name {
            "VARCHAR" | "CHAR" | "TEXT" | "TINYTEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM"
            | "SET" => MySqlCell::Text,
            "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "BOOLEAN" => {
                MySqlCell::Signed
            }
            "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
            | "BIGINT UNSIGNED" => MySqlCell::Unsigned,
            "FLOAT" | "DOUBLE" => MySqlCell::Float,
            _ => MySqlCell::Raw,
        }
    }
}

/// Reads the food table. One connection is opened and closed per call.
pub struct RowStoreGateway {
    url: String,
}

impl RowStoreGateway {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn from_config(config: &DatabaseConfig) -> Result<Self> {
        Ok(Self::new(config.connection_url()?))
    }

    /// 連線字串去掉密碼，僅供日誌使用
    pub fn redacted_url(&self) -> String {
        const UNPARSEABLE: &str = "<unparseable database url>";

        let Ok(mut url) = Url::parse(&self.url) else {
            return UNPARSEABLE.to_string();
        };
        // 無 authority 的 URL 沒有可遮蔽的密碼欄位
        if url.cannot_be_a_base() {
            return UNPARSEABLE.to_string();
        }
        if url.password().is_some() && url.set_password(Some("***")).is_err() {
            return UNPARSEABLE.to_string();
        }
        url.to_string()
    }

    #[instrument(skip(self), fields(database = %self.redacted_url()))]
    pub async fn fetch_rows(&self) -> std::result::Result<Vec<FoodRow>, FetchError> {
        let rows = match Backend::from_url(&self.url)? {
            Backend::MySql => fetch_mysql(&self.url)
                .await?
                .iter()
                .map(|row| decode_row(row, mysql_column_text))
                .collect::<std::result::Result<Vec<_>, _>>()?,
            Backend::Sqlite => fetch_sqlite(&self.url)
                .await?
                .iter()
                .map(|row| decode_row(row, sqlite_column_text))
                .collect::<std::result::Result<Vec<_>, _>>()?,
        };

        tracing::debug!("Query returned {} rows", rows.len());
        Ok(rows)
    }

    /// 失敗時記錄錯誤並回傳空列表
    pub async fn fetch_rows_or_empty(&self) -> Vec<FoodRow> {
        match self.fetch_rows().await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(kind = e.kind(), "Fetching food rows failed: {}", e);
                Vec::new()
            }
        }
    }
}

impl std::fmt::Debug for RowStoreGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowStoreGateway")
            .field("url", &self.redacted_url())
            .finish()
    }
}

#[async_trait]
impl RowSource for RowStoreGateway {
    async fn fetch_rows(&self) -> std::result::Result<Vec<FoodRow>, FetchError> {
        RowStoreGateway::fetch_rows(self).await
    }
}

async fn fetch_mysql(url: &str) -> std::result::Result<Vec<MySqlRow>, FetchError> {
    tracing::debug!("Opening MySQL connection");
    let mut conn = MySqlConnection::connect(url)
        .await
        .map_err(FetchError::Connection)?;

    let result = sqlx::query(FOOD_ITEMS_QUERY)
        .fetch_all(&mut conn)
        .await
        .map_err(FetchError::Query);

    if let Err(e) = conn.close().await {
        tracing::warn!("Closing database connection failed: {}", e);
    }
    result
}

async fn fetch_sqlite(url: &str) -> std::result::Result<Vec<SqliteRow>, FetchError> {
    tracing::debug!("Opening SQLite connection");
    let mut conn = SqliteConnection::connect(url)
        .await
        .map_err(FetchError::Connection)?;

    let result = sqlx::query(FOOD_ITEMS_QUERY)
        .fetch_all(&mut conn)
        .await
        .map_err(FetchError::Query);

    if let Err(e) = conn.close().await {
        tracing::warn!("Closing database connection failed: {}", e);
    }
    result
}

fn decode_row<R>(
    row: &R,
    column_text: fn(&R, usize) -> std::result::Result<String, FetchError>,
) -> std::result::Result<FoodRow, FetchError> {
    Ok(FoodRow::from([
        column_text(row, 0)?,
        column_text(row, 1)?,
        column_text(row, 2)?,
        column_text(row, 3)?,
    ]))
}

fn text_of<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn mysql_column_text(row: &MySqlRow, index: usize) -> std::result::Result<String, FetchError> {
    let decode_error = |source| FetchError::Decode {
        column: index,
        source,
    };

    let column = row.try_column(index).map_err(decode_error)?;
    let typed = match MySqlCell::for_type_name(column.type_info().name()) {
        MySqlCell::Text => row.try_get::<Option<String>, _>(index).map(text_of),
        MySqlCell::Signed => row.try_get::<Option<i64>, _>(index).map(text_of),
        MySqlCell::Unsigned => row.try_get::<Option<u64>, _>(index).map(text_of),
        MySqlCell::Float => row.try_get::<Option<f64>, _>(index).map(text_of),
        MySqlCell::Raw => row.try_get_unchecked::<Option<String>, _>(index).map(text_of),
    };

    // 型別判斷失準時改讀原始文字
    typed
        .or_else(|_| row.try_get_unchecked::<Option<String>, _>(index).map(text_of))
        .map_err(decode_error)
}

// SQLite 的型別跟著值走：文字、整數、浮點依序嘗試
fn sqlite_column_text(row: &SqliteRow, index: usize) -> std::result::Result<String, FetchError> {
    if let Ok(value) = row.try_get::<Option<String>, _>(index) {
        return Ok(text_of(value));
    }
    if let Ok(value) = row.try_get::<Option<i64>, _>(index) {
        return Ok(text_of(value));
    }
    row.try_get::<Option<f64>, _>(index)
        .map(text_of)
        .map_err(|source| FetchError::Decode {
            column: index,
            source,
        })
}
