//! アップロード状態

use crate::error::{Result, UploadError};
use crate::file::{format_dimensions, truncate_file_name, DEFAULT_LABEL_LENGTH};
use crate::types::{DecodedImage, ImageDimensions};

/// 検証済みファイルのプレビュー情報
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub file_name: String,
    /// ラベル用に短縮した名前
    pub display_name: String,
    pub dimensions: ImageDimensions,
    pub src: String,
}

impl Preview {
    pub fn new(file_name: &str, image: DecodedImage) -> Self {
        Self {
            file_name: file_name.to_string(),
            display_name: truncate_file_name(file_name, DEFAULT_LABEL_LENGTH),
            dimensions: image.dimensions,
            src: image.preview_src,
        }
    }

    pub fn dimensions_text(&self) -> String {
        format_dimensions(self.dimensions)
    }
}

/// アップロード状態
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UploadState {
    #[default]
    Idle,
    Previewing(Preview),
    Submitting,
    Error(String),
}

impl UploadState {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadState::Idle => "idle",
            UploadState::Previewing(_) => "previewing",
            UploadState::Submitting => "submitting",
            UploadState::Error(_) => "error",
        }
    }

    /// 送信可能なのはプレビュー中（検証済み）のみ
    pub fn can_submit(&self) -> bool {
        matches!(self, UploadState::Previewing(_))
    }

    pub fn preview(&self) -> Option<&Preview> {
        match self {
            UploadState::Previewing(preview) => Some(preview),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            UploadState::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Previewing → Submitting
    pub fn begin_submit(&mut self) -> Result<()> {
        match self {
            UploadState::Previewing(_) => {
                *self = UploadState::Submitting;
                Ok(())
            }
            UploadState::Submitting => Err(UploadError::SubmitInProgress),
            UploadState::Idle | UploadState::Error(_) => Err(UploadError::NoFileSelected),
        }
    }

    pub fn fail(&mut self, error: &UploadError) {
        *self = UploadState::Error(error.to_string());
    }
}
