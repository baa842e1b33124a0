//! アップロード画面

use std::rc::Rc;

use braincheck_common::orchestrator::PREDICT_ENDPOINT;
use braincheck_common::{UploadConfig, UploadOrchestrator};
use leptos::prelude::*;

use crate::api::BrowserBackend;
use crate::components::{
    header::Header,
    loading_overlay::LoadingOverlay,
    upload_area::UploadArea,
};
use crate::view::FormSignals;

pub type Orchestrator = UploadOrchestrator<BrowserBackend, FormSignals>;

/// イベントハンドラ間で共有する制御オブジェクト（!Sendのためローカル保持）
pub type SharedOrchestrator = StoredValue<Rc<Orchestrator>, LocalStorage>;

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let signals = FormSignals::new();
    let config = UploadConfig::default();
    let backend = BrowserBackend::new(PREDICT_ENDPOINT);
    let orchestrator: SharedOrchestrator =
        StoredValue::new_local(Rc::new(UploadOrchestrator::new(backend, signals, config)));

    view! {
        <div class="container">
            <Header />

            <UploadArea orchestrator=orchestrator signals=signals />

            <Show when=move || signals.loading.get()>
                <LoadingOverlay />
            </Show>
        </div>
    }
}
