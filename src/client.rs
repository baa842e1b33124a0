//! 解析サーバーへの送信（reqwest multipart）

use crate::error::Result;
use crate::scanner::{self, ImageInfo};
use async_trait::async_trait;
use braincheck_common::orchestrator::FILE_FIELD;
use braincheck_common::{classify_response, DecodedImage, PredictionResult, UploadBackend, UploadError};
use reqwest::multipart::{Form, Part};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub struct NativeBackend {
    client: reqwest::Client,
    predict_url: String,
    output: PathBuf,
    verbose: bool,
}

impl NativeBackend {
    pub fn new(predict_url: &str, output: &Path, timeout_seconds: u64, verbose: bool) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            predict_url: predict_url.to_string(),
            output: output.to_path_buf(),
            verbose,
        })
    }

    async fn post(&self, file: &ImageInfo) -> std::result::Result<String, UploadError> {
        let bytes = tokio::fs::read(&file.path)
            .await
            .map_err(|e| UploadError::NetworkOrServer(e.to_string()))?;

        let part = Part::bytes(bytes)
            .file_name(file.file_name.clone())
            .mime_str(mime_for(&file.file_name))
            .map_err(|e| UploadError::NetworkOrServer(e.to_string()))?;
        let form = Form::new().part(FILE_FIELD, part);

        let response = self
            .client
            .post(&self.predict_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::NetworkOrServer(e.to_string()))?;

        if self.verbose {
            println!("  HTTP {}", response.status());
        }

        response
            .text()
            .await
            .map_err(|e| UploadError::NetworkOrServer(e.to_string()))
    }
}

#[async_trait(?Send)]
impl UploadBackend for NativeBackend {
    type File = ImageInfo;

    async fn decode(&self, file: &ImageInfo) -> braincheck_common::Result<DecodedImage> {
        let path = file.path.clone();
        let dimensions = tokio::task::spawn_blocking(move || scanner::read_dimensions(&path))
            .await
            .map_err(|e| UploadError::Decode(e.to_string()))??;

        Ok(DecodedImage {
            dimensions,
            preview_src: file.path.display().to_string(),
        })
    }

    async fn predict(&self, file: &ImageInfo) -> braincheck_common::Result<PredictionResult> {
        if self.verbose {
            println!("  POST {}", self.predict_url);
        }
        let body = self.post(file).await?;
        classify_response(&body)
    }

    fn store_result(&self, key: &str, result: &PredictionResult) -> braincheck_common::Result<()> {
        if self.verbose {
            println!("  {} → {}", key, self.output.display());
        }
        let json = serde_json::to_string_pretty(result)
            .map_err(|e| UploadError::Storage(e.to_string()))?;
        std::fs::write(&self.output, json).map_err(|e| UploadError::Storage(e.to_string()))
    }
}

/// 拡張子からContent-Type
fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}
