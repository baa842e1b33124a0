//! エラー型定義
//!
//! Display文字列はそのままユーザーに表示されるメッセージ

use thiserror::Error;

/// アップロード処理のエラー型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UploadError {
    #[error("Please select a file to upload")]
    NoFileSelected,

    #[error("Image dimensions must be at least {min}x{min} pixels")]
    DimensionTooSmall { min: u32 },

    #[error("Image dimensions cannot exceed {max}x{max} pixels")]
    DimensionTooLarge { max: u32 },

    #[error("Image aspect ratio should be close to 1:1 (square)")]
    AspectRatioInvalid,

    #[error("Unable to read the selected file as an image: {0}")]
    Decode(String),

    #[error("{0}")]
    NetworkOrServer(String),

    #[error("Unable to store prediction results: {0}")]
    Storage(String),

    #[error("An analysis is already in progress")]
    SubmitInProgress,
}

impl UploadError {
    /// 画像の寸法・縦横比に起因するエラーか
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            UploadError::DimensionTooSmall { .. }
                | UploadError::DimensionTooLarge { .. }
                | UploadError::AspectRatioInvalid
        )
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, UploadError>;
