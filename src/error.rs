use braincheck_common::UploadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrainCheckError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("{0}")]
    Upload(#[from] UploadError),

    #[error("HTTPクライアントエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("検証に失敗した画像があります: {0}枚")]
    ValidationFailed(usize),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl BrainCheckError {
    /// 画面側（`UploadView::show_error`）で表示済みのエラーか
    pub fn is_reported(&self) -> bool {
        matches!(self, BrainCheckError::Upload(_))
    }
}

pub type Result<T> = std::result::Result<T, BrainCheckError>;
