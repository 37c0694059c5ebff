//! HTTP uploader for the image hoster.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::config::HosterConfig;
use crate::ledger::Wallet;
use crate::observability::metrics;
use crate::upload::{image_hash, UploadError, UploadResult, Uploader};

#[derive(Deserialize)]
struct HosterResponse {
    url: Option<String>,
}

/// Uploads files with a signed URL, one request per file.
#[derive(Debug, Clone)]
pub struct HttpUploader {
    base_url: String,
    http: reqwest::Client,
}

impl HttpUploader {
    pub fn new(config: &HosterConfig) -> UploadResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// `{base}/{account}/{signature}`
    pub fn signed_url(&self, account: &str, signature: &str) -> String {
        format!("{}/{}/{}", self.base_url, account, signature)
    }

    async fn send(&self, path: &Path, account: &str, wallet: &Wallet) -> UploadResult<String> {
        let data = tokio::fs::read(path).await.map_err(|source| UploadError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let signature = wallet.sign_digest(&image_hash(&data))?;
        let url = self.signed_url(account, &signature.to_hex());

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        let size = data.len();

        let part = Part::bytes(data)
            .file_name(file_name)
            .mime_str(mime.essence_str())?;
        let form = Form::new().part("file", part);

        tracing::debug!(path = %path.display(), size, mime = %mime, "Uploading file");

        let response = self.http.post(&url).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let parsed: HosterResponse =
            serde_json::from_str(&text).map_err(|_| UploadError::BadResponse(text.clone()))?;
        parsed.url.ok_or(UploadError::BadResponse(text))
    }
}

#[async_trait]
impl Uploader for HttpUploader {
    async fn upload(&self, path: &Path, account: &str, wallet: &Wallet) -> UploadResult<String> {
        let result = self.send(path, account, wallet).await;
        match &result {
            Ok(url) => {
                metrics::record_upload(true);
                tracing::info!(path = %path.display(), url = %url, "File uploaded");
            }
            Err(e) => {
                metrics::record_upload(false);
                tracing::warn!(path = %path.display(), error = %e, "Upload failed");
            }
        }
        result
    }
}
