use crate::config::AnalysisConfig;
use crate::domain::model::{AnalysisResponse, FoodRow};
use crate::domain::ports::PhotoAnalyzer;
use crate::utils::error::{AnalysisError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use serde::de::Error as _;
use std::path::Path;
use std::time::Duration;
use tracing::instrument;

const PHOTO_FIELD: &str = "file";
const PHOTO_MIME: &str = "image/jpeg";

/// Uploads a photo as `multipart/form-data` and reads back the calorie breakdown.
#[derive(Debug, Clone)]
pub struct PhotoAnalysisClient {
    client: Client,
    endpoint: String,
}

impl PhotoAnalysisClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// `None` keeps the transport default.
    pub fn with_timeout(
        endpoint: impl Into<String>,
        timeout: Option<Duration>,
    ) -> std::result::Result<Self, AnalysisError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        Ok(Self::with_timeout(config.endpoint.clone(), config.timeout())?)
    }

    #[instrument(skip(self, photo), fields(photo = %photo.display()))]
    pub async fn analyze(&self, photo: &Path) -> std::result::Result<FoodRow, AnalysisError> {
        let file = tokio::fs::File::open(photo).await?;
        let length = file.metadata().await?.len();
        let file_name = photo
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("photo.jpg")
            .to_string();

        let part = Part::stream_with_length(Body::from(file), length)
            .file_name(file_name)
            .mime_str(PHOTO_MIME)?;
        let form = Form::new().part(PHOTO_FIELD, part);

        tracing::debug!("Uploading {} bytes to {}", length, self.endpoint);
        let response = self.client.post(&self.endpoint).multipart(form).send().await?;

        let status = response.status();
        tracing::debug!("Analysis response status: {}", status);

        let body = response.text().await?;
        if !status.is_success() {
            return Err(AnalysisError::BadResponse { status, body });
        }

        parse_analysis_body(&body)
    }

    /// 任何失敗都記錄後回傳 None
    pub async fn analyze_or_none(&self, photo: &Path) -> Option<FoodRow> {
        match self.analyze(photo).await {
            Ok(row) => Some(row),
            Err(e) => {
                tracing::error!(kind = e.kind(), "Photo analysis failed: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl PhotoAnalyzer for PhotoAnalysisClient {
    async fn analyze(&self, photo: &Path) -> std::result::Result<FoodRow, AnalysisError> {
        PhotoAnalysisClient::analyze(self, photo).await
    }
}

/// The body must be a JSON object; absent keys become empty cells.
pub fn parse_analysis_body(body: &str) -> std::result::Result<FoodRow, AnalysisError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(AnalysisError::MalformedJson(serde_json::Error::custom(
            "expected a JSON object",
        )));
    }

    let response: AnalysisResponse = serde_json::from_value(value)?;
    Ok(response.into())
}
