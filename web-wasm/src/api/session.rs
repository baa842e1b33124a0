//! 解析結果のsessionStorage受け渡し

use braincheck_common::{PredictionResult, Result, UploadError};
use gloo::storage::{SessionStorage, Storage};

/// 応答JSONをそのまま保存
pub fn save_results(key: &str, result: &PredictionResult) -> Result<()> {
    SessionStorage::set(key, result)
        .map_err(|e| UploadError::Storage(e.to_string()))
}

/// 保存済みの結果を読み込む（未保存・破損時はNone）
pub fn load_results(key: &str) -> Option<PredictionResult> {
    match SessionStorage::get::<PredictionResult>(key) {
        Ok(result) => Some(result),
        Err(e) => {
            gloo::console::log!("results: not available", e.to_string());
            None
        }
    }
}
