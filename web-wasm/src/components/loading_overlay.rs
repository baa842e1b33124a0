//! 送信中のローディング表示

use leptos::prelude::*;

#[component]
pub fn LoadingOverlay() -> impl IntoView {
    view! {
        <div id="loading-container" style="display: flex">
            <div class="loading-spinner"></div>
            <p class="loading-text">"Analyzing MRI scan..."</p>
        </div>
    }
}
