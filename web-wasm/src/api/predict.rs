//! `/predict` へのmultipart送信

use braincheck_common::orchestrator::FILE_FIELD;
use braincheck_common::{classify_response, PredictionResult, Result, UploadError};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData, Request, RequestInit, RequestMode, Response};

use super::js_error_message;

/// ファイルを`file`フィールドに入れてPOSTし、応答本文を判定
pub async fn post_file(endpoint: &str, file: &File) -> Result<PredictionResult> {
    let body = fetch_text(endpoint, file)
        .await
        .map_err(|e| UploadError::NetworkOrServer(js_error_message(&e)))?;
    classify_response(&body)
}

async fn fetch_text(endpoint: &str, file: &File) -> std::result::Result<String, JsValue> {
    let form = FormData::new()?;
    form.append_with_blob_and_filename(FILE_FIELD, file, &file.name())?;

    // Content-Typeはブラウザがboundary付きで設定する
    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::SameOrigin);
    opts.set_body(&form.into());

    let request = Request::new_with_str_and_init(endpoint, &opts)?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window is not available"))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let resp: Response = resp_value.dyn_into()?;

    if !resp.ok() {
        gloo::console::warn!("predict: non-2xx status", resp.status());
    }

    let text = JsFuture::from(resp.text()?).await?;
    text.as_string()
        .ok_or_else(|| JsValue::from_str("Response body is not text"))
}
