//! `/predict` 応答の判定
//!
//! HTTPステータスは見ない。本文のJSONに真値の`error`があれば失敗、
//! それ以外はすべて成功として結果をそのまま渡す。

use serde_json::Value;

use crate::error::{Result, UploadError};
use crate::types::PredictionResult;

/// 応答本文を判定
pub fn classify_response(body: &str) -> Result<PredictionResult> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        UploadError::NetworkOrServer(format!("Invalid response from server: {}", e))
    })?;
    classify_value(value)
}

/// パース済みの応答を判定
pub fn classify_value(value: Value) -> Result<PredictionResult> {
    if let Some(error) = value.get("error").filter(|e| is_truthy(e)) {
        let message = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(UploadError::NetworkOrServer(message));
    }
    Ok(PredictionResult(value))
}

/// JavaScriptの真偽判定と同じ規則
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
