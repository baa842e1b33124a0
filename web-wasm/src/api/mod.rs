//! ブラウザ側のデコード・送信・保存

mod decode;
mod predict;
mod session;

use async_trait::async_trait;
use braincheck_common::{
    DecodedImage, PredictionResult, Result, SelectedFile, UploadBackend, UploadError,
};
use wasm_bindgen::JsValue;

pub use session::load_results;

/// `<input type=file>` やドロップで得たファイル
#[derive(Clone)]
pub struct BrowserFile(pub web_sys::File);

impl SelectedFile for BrowserFile {
    fn name(&self) -> String {
        self.0.name()
    }

    fn size(&self) -> u64 {
        self.0.size() as u64
    }
}

/// fetch + sessionStorage によるバックエンド
pub struct BrowserBackend {
    endpoint: String,
}

impl BrowserBackend {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into() }
    }
}

#[async_trait(?Send)]
impl UploadBackend for BrowserBackend {
    type File = BrowserFile;

    async fn decode(&self, file: &BrowserFile) -> Result<DecodedImage> {
        decode::decode_image(&file.0)
            .await
            .map_err(|e| UploadError::Decode(js_error_message(&e)))
    }

    async fn predict(&self, file: &BrowserFile) -> Result<PredictionResult> {
        predict::post_file(&self.endpoint, &file.0).await
    }

    fn store_result(&self, key: &str, result: &PredictionResult) -> Result<()> {
        session::save_results(key, result)
    }
}

/// JsValueからユーザー向けメッセージを取り出す
///
/// `Error`オブジェクトなら`message`、文字列ならそのまま
pub(crate) fn js_error_message(value: &JsValue) -> String {
    use wasm_bindgen::JsCast;

    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}
