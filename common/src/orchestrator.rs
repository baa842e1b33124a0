//! アップロード制御
//!
//! ファイル選択 → デコード → 検証 → プレビュー、および送信時の再検証 →
//! `/predict` 送信 → 結果保存 → 結果画面遷移 までを担う。
//!
//! プラットフォーム依存の処理は2つのトレイトに切り出している:
//! - [`UploadBackend`]: デコード・送信・結果保存
//! - [`UploadView`]: エラー表示・プレビュー・ローディング・遷移
//!
//! 状態は内部可変で保持し、`.await` をまたいで借用しない。
//! ブラウザでは複数のイベントハンドラから同じインスタンスを共有できる。

use std::cell::{Cell, RefCell};

use async_trait::async_trait;

use crate::error::{Result, UploadError};
use crate::state::{Preview, UploadState};
use crate::types::{DecodedImage, PredictionResult};
use crate::validation::ImageLimits;

/// 送信先
pub const PREDICT_ENDPOINT: &str = "/predict";
/// 結果画面
pub const RESULT_PATH: &str = "/result";
/// 結果を保存するセッションストレージのキー
pub const RESULTS_STORAGE_KEY: &str = "predictionResults";
/// multipartのファイルフィールド名
pub const FILE_FIELD: &str = "file";

/// 選択されたファイル
pub trait SelectedFile {
    fn name(&self) -> String;
    fn size(&self) -> u64;
}

/// デコード・送信・保存
#[async_trait(?Send)]
pub trait UploadBackend {
    type File: SelectedFile;

    /// 画像としてデコードし寸法を得る
    async fn decode(&self, file: &Self::File) -> Result<DecodedImage>;

    /// multipartで送信し、応答を判定して返す
    async fn predict(&self, file: &Self::File) -> Result<PredictionResult>;

    /// 結果を次の画面へ受け渡すために保存
    fn store_result(&self, key: &str, result: &PredictionResult) -> Result<()>;
}

/// 画面への反映
pub trait UploadView {
    /// エラー表示（プレビューは隠す）
    fn show_error(&self, message: &str);
    fn hide_error(&self);
    fn show_preview(&self, preview: &Preview);
    /// ローディング表示・送信ボタン無効化
    fn show_loading(&self);
    fn hide_loading(&self);
    /// ドロップゾーンの強調表示
    fn set_highlight(&self, highlighted: bool);
    fn navigate(&self, path: &str);
}

/// アップロード設定（送信先URLはバックエンド側が持つ）
#[derive(Debug, Clone, PartialEq)]
pub struct UploadConfig {
    pub result_path: String,
    pub storage_key: String,
    pub limits: ImageLimits,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            result_path: RESULT_PATH.to_string(),
            storage_key: RESULTS_STORAGE_KEY.to_string(),
            limits: ImageLimits::default(),
        }
    }
}

/// ドラッグイベントの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Enter,
    Over,
    Leave,
    Drop,
}

impl DragPhase {
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        match event_type {
            "dragenter" => Some(DragPhase::Enter),
            "dragover" => Some(DragPhase::Over),
            "dragleave" => Some(DragPhase::Leave),
            "drop" => Some(DragPhase::Drop),
            _ => None,
        }
    }

    pub fn highlights(&self) -> bool {
        matches!(self, DragPhase::Enter | DragPhase::Over)
    }
}

/// アップロード制御本体
pub struct UploadOrchestrator<B: UploadBackend, V: UploadView> {
    backend: B,
    view: V,
    config: UploadConfig,
    state: RefCell<UploadState>,
    /// 選択・送信ごとに進める世代番号。古いデコード結果の破棄に使う
    generation: Cell<u64>,
}

impl<B: UploadBackend, V: UploadView> UploadOrchestrator<B, V> {
    pub fn new(backend: B, view: V, config: UploadConfig) -> Self {
        Self {
            backend,
            view,
            config,
            state: RefCell::new(UploadState::Idle),
            generation: Cell::new(0),
        }
    }

    pub fn state(&self) -> UploadState {
        self.state.borrow().clone()
    }

    pub fn can_submit(&self) -> bool {
        self.state.borrow().can_submit()
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// ファイル選択時
    ///
    /// エラーは表示済みの状態で返す。新しい選択に追い越されたデコード結果は
    /// 何もせず `Ok(())` を返す。
    pub async fn handle_file_upload(&self, file: Option<&B::File>) -> Result<()> {
        let ticket = self.next_generation();

        let Some(file) = non_empty(file) else {
            return Err(self.fail(UploadError::NoFileSelected));
        };

        let decoded = self.backend.decode(file).await;
        if self.is_stale(ticket) {
            return Ok(());
        }

        let preview = self.validate(file, decoded)?;
        self.view.show_preview(&preview);
        self.view.hide_error();
        *self.state.borrow_mut() = UploadState::Previewing(preview);
        Ok(())
    }

    /// フォーム送信時（呼び出し側で既定の送信は抑止済み）
    ///
    /// プレビュー後にファイルが差し替えられている可能性があるため再検証してから送る。
    /// 送信可否は再検証の結果で決まる。Idle・Errorからでも検証を通れば
    /// Previewingに入り直してから送信する（送信失敗後の再送信を許す）。
    pub async fn handle_form_submit(&self, file: Option<&B::File>) -> Result<()> {
        if matches!(*self.state.borrow(), UploadState::Submitting) {
            return Err(UploadError::SubmitInProgress);
        }
        let ticket = self.next_generation();

        let Some(file) = non_empty(file) else {
            return Err(self.fail(UploadError::NoFileSelected));
        };

        let decoded = self.backend.decode(file).await;
        if self.is_stale(ticket) {
            return Ok(());
        }

        let preview = self.validate(file, decoded)?;
        if self.state.borrow().preview() != Some(&preview) {
            self.view.show_preview(&preview);
        }
        self.view.hide_error();
        {
            let mut state = self.state.borrow_mut();
            *state = UploadState::Previewing(preview);
            state.begin_submit()?;
        }

        self.view.show_loading();
        let outcome = match self.backend.predict(file).await {
            Ok(result) => self
                .backend
                .store_result(&self.config.storage_key, &result),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                self.view.navigate(&self.config.result_path);
                Ok(())
            }
            Err(e) => {
                self.view.hide_loading();
                Err(self.fail(e))
            }
        }
    }

    /// dragenter/dragover で強調、dragleave/drop で解除
    pub fn handle_drag(&self, phase: DragPhase) {
        self.view.set_highlight(phase.highlights());
    }

    /// ドロップされた先頭のファイルを選択扱いにする
    pub async fn handle_drop(&self, first_file: Option<&B::File>) -> Result<()> {
        self.handle_drag(DragPhase::Drop);
        self.handle_file_upload(first_file).await
    }

    fn validate(&self, file: &B::File, decoded: Result<DecodedImage>) -> Result<Preview> {
        let image = decoded.map_err(|e| self.fail(e))?;
        let dims = image.dimensions;
        self.config
            .limits
            .validate(dims.width, dims.height)
            .map_err(|e| self.fail(e))?;
        Ok(Preview::new(&file.name(), image))
    }

    fn fail(&self, error: UploadError) -> UploadError {
        self.view.show_error(&error.to_string());
        self.state.borrow_mut().fail(&error);
        error
    }

    fn next_generation(&self) -> u64 {
        let next = self.generation.get() + 1;
        self.generation.set(next);
        next
    }

    fn is_stale(&self, ticket: u64) -> bool {
        self.generation.get() != ticket
    }
}

fn non_empty<F: SelectedFile>(file: Option<&F>) -> Option<&F> {
    file.filter(|f| f.size() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImageDimensions;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use serde_json::json;

    #[derive(Debug, Clone)]
    struct FakeFile {
        name: String,
        size: u64,
        dims: Option<(u32, u32)>,
    }

    impl FakeFile {
        fn image(name: &str, width: u32, height: u32) -> Self {
            Self { name: name.to_string(), size: 1024, dims: Some((width, height)) }
        }
    }

    impl SelectedFile for FakeFile {
        fn name(&self) -> String {
            self.name.clone()
        }

        fn size(&self) -> u64 {
            self.size
        }
    }

    struct FakeBackend {
        response: Result<PredictionResult>,
        predict_calls: Cell<usize>,
        stored: RefCell<Vec<(String, String)>>,
        gate: RefCell<Option<(String, oneshot::Receiver<()>)>>,
    }

    impl FakeBackend {
        fn responding(response: Result<PredictionResult>) -> Self {
            Self {
                response,
                predict_calls: Cell::new(0),
                stored: RefCell::new(Vec::new()),
                gate: RefCell::new(None),
            }
        }
    }

    #[async_trait(?Send)]
    impl UploadBackend for FakeBackend {
        type File = FakeFile;

        async fn decode(&self, file: &FakeFile) -> Result<DecodedImage> {
            let gate = {
                let mut slot = self.gate.borrow_mut();
                match slot.take() {
                    Some((name, rx)) if name == file.name => Some(rx),
                    other => {
                        *slot = other;
                        None
                    }
                }
            };
            if let Some(rx) = gate {
                let _ = rx.await;
            }
            let (width, height) = file
                .dims
                .ok_or_else(|| UploadError::Decode("not an image".to_string()))?;
            Ok(DecodedImage {
                dimensions: ImageDimensions::new(width, height),
                preview_src: format!("data:{}", file.name),
            })
        }

        async fn predict(&self, _file: &FakeFile) -> Result<PredictionResult> {
            self.predict_calls.set(self.predict_calls.get() + 1);
            self.response.clone()
        }

        fn store_result(&self, key: &str, result: &PredictionResult) -> Result<()> {
            self.stored
                .borrow_mut()
                .push((key.to_string(), result.to_json()));
            Ok(())
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum ViewEvent {
        Error(String),
        HideError,
        Preview(String),
        Loading(bool),
        Highlight(bool),
        Navigate(String),
    }

    #[derive(Default)]
    struct RecordingView {
        events: RefCell<Vec<ViewEvent>>,
    }

    impl RecordingView {
        fn events(&self) -> Vec<ViewEvent> {
            self.events.borrow().clone()
        }

        fn push(&self, event: ViewEvent) {
            self.events.borrow_mut().push(event);
        }
    }

    impl UploadView for RecordingView {
        fn show_error(&self, message: &str) {
            self.push(ViewEvent::Error(message.to_string()));
        }

        fn hide_error(&self) {
            self.push(ViewEvent::HideError);
        }

        fn show_preview(&self, preview: &Preview) {
            self.push(ViewEvent::Preview(preview.file_name.clone()));
        }

        fn show_loading(&self) {
            self.push(ViewEvent::Loading(true));
        }

        fn hide_loading(&self) {
            self.push(ViewEvent::Loading(false));
        }

        fn set_highlight(&self, highlighted: bool) {
            self.push(ViewEvent::Highlight(highlighted));
        }

        fn navigate(&self, path: &str) {
            self.push(ViewEvent::Navigate(path.to_string()));
        }
    }

    fn orchestrator(
        response: Result<PredictionResult>,
    ) -> UploadOrchestrator<FakeBackend, RecordingView> {
        UploadOrchestrator::new(
            FakeBackend::responding(response),
            RecordingView::default(),
            UploadConfig::default(),
        )
    }

    fn ok_response() -> Result<PredictionResult> {
        Ok(PredictionResult(json!({"predicted_class": "No Tumor", "confidence": 0.97})))
    }

    #[test]
    fn test_upload_valid_image_previews() {
        let orch = orchestrator(ok_response());
        let file = FakeFile::image("scan.png", 512, 512);

        assert!(block_on(orch.handle_file_upload(Some(&file))).is_ok());
        assert!(orch.can_submit());
        assert_eq!(
            orch.view().events(),
            vec![ViewEvent::Preview("scan.png".into()), ViewEvent::HideError]
        );
        let state = orch.state();
        let preview = state.preview().expect("preview");
        assert_eq!(preview.dimensions_text(), "Dimensions: 512 × 512 pixels");
    }

    #[test]
    fn test_upload_without_file_reports_selection_error() {
        let orch = orchestrator(ok_response());

        let err = block_on(orch.handle_file_upload(None)).unwrap_err();
        assert_eq!(err, UploadError::NoFileSelected);
        assert_eq!(
            orch.view().events(),
            vec![ViewEvent::Error("Please select a file to upload".into())]
        );
        assert!(!orch.can_submit());
    }

    #[test]
    fn test_upload_empty_file_reports_selection_error() {
        let orch = orchestrator(ok_response());
        let file = FakeFile { size: 0, ..FakeFile::image("empty.png", 512, 512) };

        let err = block_on(orch.handle_file_upload(Some(&file))).unwrap_err();
        assert_eq!(err, UploadError::NoFileSelected);
    }

    #[test]
    fn test_upload_invalid_image_is_not_submittable() {
        let orch = orchestrator(ok_response());
        let file = FakeFile::image("wide.png", 1000, 200);

        let err = block_on(orch.handle_file_upload(Some(&file))).unwrap_err();
        assert_eq!(err, UploadError::AspectRatioInvalid);
        assert!(!orch.can_submit());
        assert_eq!(
            orch.state(),
            UploadState::Error("Image aspect ratio should be close to 1:1 (square)".into())
        );
    }

    #[test]
    fn test_upload_undecodable_file() {
        let orch = orchestrator(ok_response());
        let file = FakeFile { dims: None, ..FakeFile::image("notes.png", 0, 0) };

        let err = block_on(orch.handle_file_upload(Some(&file))).unwrap_err();
        assert!(matches!(err, UploadError::Decode(_)));
        assert!(!orch.can_submit());
    }

    #[test]
    fn test_error_cleared_by_next_valid_selection() {
        let orch = orchestrator(ok_response());
        let _ = block_on(orch.handle_file_upload(Some(&FakeFile::image("tiny.png", 100, 100))));
        block_on(orch.handle_file_upload(Some(&FakeFile::image("ok.png", 300, 300)))).unwrap();

        let events = orch.view().events();
        assert!(matches!(events[0], ViewEvent::Error(_)));
        assert_eq!(events.last(), Some(&ViewEvent::HideError));
        assert!(orch.can_submit());
    }

    #[test]
    fn test_submit_without_file_never_calls_network() {
        let orch = orchestrator(ok_response());

        let err = block_on(orch.handle_form_submit(None)).unwrap_err();
        assert_eq!(err, UploadError::NoFileSelected);
        assert_eq!(orch.backend().predict_calls.get(), 0);
        assert_eq!(
            orch.view().events(),
            vec![ViewEvent::Error("Please select a file to upload".into())]
        );
    }

    #[test]
    fn test_submit_success_stores_and_navigates() {
        let orch = orchestrator(ok_response());
        let file = FakeFile::image("scan.png", 512, 512);
        block_on(orch.handle_file_upload(Some(&file))).unwrap();

        block_on(orch.handle_form_submit(Some(&file))).unwrap();

        assert_eq!(orch.backend().predict_calls.get(), 1);
        let stored = orch.backend().stored.borrow().clone();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].0, "predictionResults");
        let value: serde_json::Value = serde_json::from_str(&stored[0].1).unwrap();
        assert_eq!(value["predicted_class"], "No Tumor");

        let events = orch.view().events();
        assert!(events.contains(&ViewEvent::Loading(true)));
        assert_eq!(events.last(), Some(&ViewEvent::Navigate("/result".into())));
        assert_eq!(orch.state(), UploadState::Submitting);
    }

    #[test]
    fn test_submit_server_error_shows_message_without_navigation() {
        let orch = orchestrator(Err(UploadError::NetworkOrServer("x".into())));
        let file = FakeFile::image("scan.png", 512, 512);
        block_on(orch.handle_file_upload(Some(&file))).unwrap();

        let err = block_on(orch.handle_form_submit(Some(&file))).unwrap_err();
        assert_eq!(err.to_string(), "x");

        let events = orch.view().events();
        let tail = &events[events.len() - 3..];
        assert_eq!(
            tail,
            &[
                ViewEvent::Loading(true),
                ViewEvent::Loading(false),
                ViewEvent::Error("x".into()),
            ]
        );
        assert!(!events.iter().any(|e| matches!(e, ViewEvent::Navigate(_))));
        assert!(orch.backend().stored.borrow().is_empty());
        assert_eq!(orch.state(), UploadState::Error("x".into()));
    }

    #[test]
    fn test_resubmit_clears_previous_error_before_loading() {
        let orch = orchestrator(Err(UploadError::NetworkOrServer("x".into())));
        let file = FakeFile::image("scan.png", 512, 512);
        block_on(orch.handle_file_upload(Some(&file))).unwrap();
        let _ = block_on(orch.handle_form_submit(Some(&file)));

        let before = orch.view().events().len();
        let _ = block_on(orch.handle_form_submit(Some(&file)));
        let second: Vec<ViewEvent> = orch.view().events()[before..].to_vec();

        let hide = second.iter().position(|e| *e == ViewEvent::HideError);
        let loading = second.iter().position(|e| *e == ViewEvent::Loading(true));
        assert!(hide.is_some(), "error not cleared: {:?}", second);
        assert!(hide < loading);
    }

    #[test]
    fn test_submit_from_error_state_revalidates_and_sends() {
        let orch = orchestrator(ok_response());
        let _ = block_on(orch.handle_file_upload(Some(&FakeFile::image("tiny.png", 10, 10))));
        assert!(!orch.can_submit());

        // 再検証を通れば送信できる
        let file = FakeFile::image("scan.png", 512, 512);
        block_on(orch.handle_form_submit(Some(&file))).unwrap();
        assert_eq!(orch.backend().predict_calls.get(), 1);
    }

    #[test]
    fn test_submit_revalidates_changed_file() {
        let orch = orchestrator(ok_response());
        block_on(orch.handle_file_upload(Some(&FakeFile::image("scan.png", 512, 512)))).unwrap();

        // プレビュー後に差し替えられた不正なファイル
        let swapped = FakeFile::image("scan.png", 4097, 4000);
        let err = block_on(orch.handle_form_submit(Some(&swapped))).unwrap_err();
        assert_eq!(err, UploadError::DimensionTooLarge { max: 4096 });
        assert_eq!(orch.backend().predict_calls.get(), 0);
        assert!(!orch.view().events().contains(&ViewEvent::Loading(true)));
    }

    #[test]
    fn test_submit_while_submitting_is_rejected() {
        let orch = orchestrator(ok_response());
        *orch.state.borrow_mut() = UploadState::Submitting;

        let file = FakeFile::image("scan.png", 512, 512);
        let err = block_on(orch.handle_form_submit(Some(&file))).unwrap_err();
        assert_eq!(err, UploadError::SubmitInProgress);
        assert_eq!(orch.backend().predict_calls.get(), 0);
    }

    #[test]
    fn test_loading_not_shown_during_local_validation() {
        let orch = orchestrator(ok_response());
        let _ = block_on(orch.handle_form_submit(Some(&FakeFile::image("tiny.png", 10, 10))));
        assert!(!orch
            .view()
            .events()
            .iter()
            .any(|e| matches!(e, ViewEvent::Loading(_))));
    }

    #[test]
    fn test_drag_highlight() {
        let orch = orchestrator(ok_response());
        orch.handle_drag(DragPhase::Enter);
        orch.handle_drag(DragPhase::Over);
        orch.handle_drag(DragPhase::Leave);
        assert_eq!(
            orch.view().events(),
            vec![
                ViewEvent::Highlight(true),
                ViewEvent::Highlight(true),
                ViewEvent::Highlight(false),
            ]
        );
    }

    #[test]
    fn test_drop_routes_first_file() {
        let orch = orchestrator(ok_response());
        let file = FakeFile::image("dropped.png", 400, 400);

        block_on(orch.handle_drop(Some(&file))).unwrap();
        let events = orch.view().events();
        assert_eq!(events[0], ViewEvent::Highlight(false));
        assert_eq!(events[1], ViewEvent::Preview("dropped.png".into()));
        assert!(orch.can_submit());
    }

    #[test]
    fn test_drag_phase_from_event_type() {
        assert_eq!(DragPhase::from_event_type("dragenter"), Some(DragPhase::Enter));
        assert_eq!(DragPhase::from_event_type("drop"), Some(DragPhase::Drop));
        assert_eq!(DragPhase::from_event_type("click"), None);
        assert!(DragPhase::Over.highlights());
        assert!(!DragPhase::Drop.highlights());
    }

    #[test]
    fn test_stale_decode_does_not_replace_newer_preview() {
        let orch = orchestrator(ok_response());
        let (tx, rx) = oneshot::channel();
        *orch.backend().gate.borrow_mut() = Some(("slow.png".to_string(), rx));

        let slow_file = FakeFile::image("slow.png", 512, 512);
        let fast_file = FakeFile::image("fast.png", 300, 300);

        let slow = orch.handle_file_upload(Some(&slow_file));
        let fast = async {
            let result = orch.handle_file_upload(Some(&fast_file)).await;
            let _ = tx.send(());
            result
        };
        let (slow_result, fast_result) = block_on(async { futures::join!(slow, fast) });

        assert!(slow_result.is_ok());
        assert!(fast_result.is_ok());
        let state = orch.state();
        assert_eq!(state.preview().map(|p| p.file_name.as_str()), Some("fast.png"));
        assert!(!orch
            .view()
            .events()
            .contains(&ViewEvent::Preview("slow.png".into())));
    }
}
