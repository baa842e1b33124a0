//! BrainCheck Web App (Leptos + WASM)
//!
//! `/result` では解析結果画面、それ以外ではアップロードフォームを表示する。

mod api;
mod app;
mod components;
mod view;

use braincheck_common::orchestrator::RESULT_PATH;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    let path = web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_default();

    if is_result_path(&path) {
        leptos::mount::mount_to_body(components::result_panel::ResultPage);
    } else {
        leptos::mount::mount_to_body(app::App);
    }
}

fn is_result_path(path: &str) -> bool {
    path.trim_end_matches('/') == RESULT_PATH
}
