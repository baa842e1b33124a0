//! 画像寸法・縦横比の検証
//!
//! モデル入力は224x224のため、小さすぎる画像と極端に細長い画像を
//! 送信前に弾く。

use serde::{Deserialize, Serialize};

use crate::error::{Result, UploadError};

/// 最小辺 (px)
pub const MIN_DIMENSION: u32 = 224;
/// 最大辺 (px)
pub const MAX_DIMENSION: u32 = 4096;
/// 許容する縦横比の上限
pub const MAX_ASPECT_RATIO: f64 = 1.5;

/// 検証に使う制限値
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageLimits {
    pub min_dimension: u32,
    pub max_dimension: u32,
    pub max_aspect_ratio: f64,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            min_dimension: MIN_DIMENSION,
            max_dimension: MAX_DIMENSION,
            max_aspect_ratio: MAX_ASPECT_RATIO,
        }
    }
}

impl ImageLimits {
    /// 寸法チェック → 縦横比チェックの順で検証
    pub fn validate(&self, width: u32, height: u32) -> Result<()> {
        if width < self.min_dimension || height < self.min_dimension {
            return Err(UploadError::DimensionTooSmall { min: self.min_dimension });
        }
        if width > self.max_dimension || height > self.max_dimension {
            return Err(UploadError::DimensionTooLarge { max: self.max_dimension });
        }
        if aspect_ratio(width, height) > self.max_aspect_ratio {
            return Err(UploadError::AspectRatioInvalid);
        }
        Ok(())
    }
}

/// デフォルト制限値で検証
pub fn validate_image(width: u32, height: u32) -> Result<()> {
    ImageLimits::default().validate(width, height)
}

/// 長辺 / 短辺
///
/// 短辺が0の場合は無限大を返す（検証では最小辺チェックが先に弾く）
pub fn aspect_ratio(width: u32, height: u32) -> f64 {
    let long = width.max(height) as f64;
    let short = width.min(height) as f64;
    if short == 0.0 {
        return f64::INFINITY;
    }
    long / short
}

/// 縦横比の評価（サーバー側レポートと同じ区分）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatioStatus {
    Optimal,
    Acceptable,
    #[serde(rename = "Not optimal")]
    NotOptimal,
}

impl AspectRatioStatus {
    pub fn classify(ratio: f64) -> Self {
        if ratio <= MAX_ASPECT_RATIO {
            AspectRatioStatus::Optimal
        } else if ratio <= 2.0 {
            AspectRatioStatus::Acceptable
        } else {
            AspectRatioStatus::NotOptimal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatioStatus::Optimal => "Optimal",
            AspectRatioStatus::Acceptable => "Acceptable",
            AspectRatioStatus::NotOptimal => "Not optimal",
        }
    }
}

impl std::fmt::Display for AspectRatioStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
