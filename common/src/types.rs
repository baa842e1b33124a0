//! アップロード・解析結果の型定義
//!
//! - ImageDimensions / DecodedImage: デコード結果
//! - PredictionResult: サーバー応答（不透明なJSON）
//! - PredictionSummary: 結果表示用の型付きビュー

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::validation::{aspect_ratio, AspectRatioStatus};

/// 画像サイズ (px)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f64 {
        aspect_ratio(self.width, self.height)
    }
}

/// デコード済み画像
///
/// `preview_src` はブラウザではData URL、CLIではファイルパス
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub dimensions: ImageDimensions,
    pub preview_src: String,
}

/// `/predict` の応答
///
/// 中身は解釈せず、そのまま保存・受け渡しする
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionResult(pub serde_json::Value);

impl PredictionResult {
    pub fn to_json(&self) -> String {
        self.0.to_string()
    }

    pub fn summary(&self) -> PredictionSummary {
        serde_json::from_value(self.0.clone()).unwrap_or_default()
    }
}

/// 結果表示用の型付きビュー（欠けたフィールドはデフォルト値）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionSummary {
    /// クラス名 → 確率
    pub predictions: BTreeMap<String, f64>,
    pub predicted_class: String,
    pub confidence: f64,
    pub image_path: String,
    pub original_width: u32,
    pub original_height: u32,
    pub aspect_ratio: f64,
    pub aspect_ratio_status: String,
    pub file_size: String,
    pub file_format: String,
    pub color_mode: String,
}

impl PredictionSummary {
    /// 確率の高い順
    pub fn ranked_predictions(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self
            .predictions
            .iter()
            .map(|(name, p)| (name.as_str(), *p))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    /// サーバーが縦横比の評価を返さなかった場合は寸法から算出
    pub fn aspect_status(&self) -> String {
        if !self.aspect_ratio_status.is_empty() {
            return self.aspect_ratio_status.clone();
        }
        let ratio = aspect_ratio(self.original_width, self.original_height);
        AspectRatioStatus::classify(ratio).to_string()
    }

    pub fn confidence_percent(&self) -> String {
        format!("{:.1}%", self.confidence * 100.0)
    }
}
