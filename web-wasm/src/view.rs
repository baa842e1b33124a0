//! シグナル経由の画面反映

use braincheck_common::{Preview, UploadView};
use leptos::prelude::*;

/// アップロードフォームの表示状態
#[derive(Clone, Copy)]
pub struct FormSignals {
    pub error: RwSignal<Option<String>>,
    pub preview: RwSignal<Option<Preview>>,
    pub loading: RwSignal<bool>,
    pub highlight: RwSignal<bool>,
}

impl FormSignals {
    pub fn new() -> Self {
        Self {
            error: RwSignal::new(None),
            preview: RwSignal::new(None),
            loading: RwSignal::new(false),
            highlight: RwSignal::new(false),
        }
    }
}

impl UploadView for FormSignals {
    fn show_error(&self, message: &str) {
        gloo::console::warn!("upload error", message.to_string());
        self.error.set(Some(message.to_string()));
        self.preview.set(None);
    }

    fn hide_error(&self) {
        self.error.set(None);
    }

    fn show_preview(&self, preview: &Preview) {
        gloo::console::log!("upload preview", preview.file_name.clone(), preview.dimensions_text());
        self.preview.set(Some(preview.clone()));
    }

    fn show_loading(&self) {
        self.loading.set(true);
    }

    fn hide_loading(&self) {
        self.loading.set(false);
    }

    fn set_highlight(&self, highlighted: bool) {
        self.highlight.set(highlighted);
    }

    fn navigate(&self, path: &str) {
        gloo::console::log!("navigate", path.to_string());
        if let Some(window) = web_sys::window() {
            if window.location().set_href(path).is_err() {
                gloo::console::warn!("navigate failed", path.to_string());
            }
        }
    }
}
