//! アップロードフォームコンポーネント
//!
//! ファイル選択・ドラッグ&ドロップ・プレビュー・エラー表示・送信ボタン

use braincheck_common::file::accept_attribute;
use braincheck_common::DragPhase;
use leptos::ev::{DragEvent, Event, SubmitEvent};
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::BrowserFile;
use crate::app::SharedOrchestrator;
use crate::view::FormSignals;

const EMPTY_LABEL: &str = "Choose a file or drag it here";

#[component]
pub fn UploadArea(orchestrator: SharedOrchestrator, signals: FormSignals) -> impl IntoView {
    let file_input: NodeRef<html::Input> = NodeRef::new();

    let selected_file = move || -> Option<BrowserFile> {
        file_input
            .get()
            .and_then(|input| input.files())
            .and_then(|files| files.get(0))
            .map(BrowserFile)
    };

    let on_change = move |_: Event| {
        let orch = orchestrator.get_value();
        let file = selected_file();
        spawn_local(async move {
            let _ = orch.handle_file_upload(file.as_ref()).await;
        });
    };

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let orch = orchestrator.get_value();
        let file = selected_file();
        spawn_local(async move {
            if let Err(e) = orch.handle_form_submit(file.as_ref()).await {
                gloo::console::log!("submit stopped", e.to_string());
            }
        });
    };

    // ブラウザがファイルを開いてしまうのを防ぐ
    let on_drag = move |ev: DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        if let Some(phase) = DragPhase::from_event_type(&ev.type_()) {
            orchestrator.get_value().handle_drag(phase);
        }
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();

        let files = ev.data_transfer().and_then(|dt| dt.files());
        // 送信時に読むのは<input>側なので差し替えておく
        if let (Some(input), Some(files)) = (file_input.get(), files.as_ref()) {
            input.set_files(Some(files));
        }

        let file = files.and_then(|f| f.get(0)).map(BrowserFile);
        let orch = orchestrator.get_value();
        spawn_local(async move {
            let _ = orch.handle_drop(file.as_ref()).await;
        });
    };

    let has_error = move || signals.error.get().is_some();

    view! {
        <form id="upload-form" class="upload-form" on:submit=on_submit>
            <div
                class=move || {
                    let mut classes = vec!["file-upload"];
                    if signals.highlight.get() {
                        classes.push("highlight");
                    }
                    if has_error() {
                        classes.push("error");
                    }
                    classes.join(" ")
                }
                on:dragenter=on_drag
                on:dragover=on_drag
                on:dragleave=on_drag
                on:drop=on_drop
            >
                <input
                    type="file"
                    id="file"
                    name="file"
                    accept=accept_attribute()
                    node_ref=file_input
                    on:change=on_change
                />
                <label
                    for="file"
                    class=move || if has_error() { "file-text error" } else { "file-text" }
                    title=move || signals.preview.get().map(|p| p.file_name).unwrap_or_default()
                >
                    {move || {
                        signals
                            .preview
                            .get()
                            .map(|p| p.display_name)
                            .unwrap_or_else(|| EMPTY_LABEL.to_string())
                    }}
                </label>
                <p class="text-muted">"Supported formats: PNG, JPG, JPEG, BMP (224 to 4096 px, near-square)"</p>
            </div>

            <p class=move || if has_error() { "error-message show" } else { "error-message" }>
                {move || signals.error.get().unwrap_or_default()}
            </p>

            <div
                id="preview-container"
                style:display=move || if signals.preview.get().is_some() { "block" } else { "none" }
            >
                <img
                    id="image-preview"
                    alt="Selected MRI scan"
                    src=move || signals.preview.get().map(|p| p.src).unwrap_or_default()
                />
                <p class="image-dimensions">
                    {move || signals.preview.get().map(|p| p.dimensions_text()).unwrap_or_default()}
                </p>
            </div>

            <button
                type="submit"
                class="analyze-btn btn btn-primary"
                disabled=move || signals.loading.get()
            >
                {move || if signals.loading.get() { "Analyzing..." } else { "Analyze Image" }}
            </button>
        </form>
    }
}
