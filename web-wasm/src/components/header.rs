//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"BrainCheck - MRI Tumor Classification"</h1>
            <p class="text-muted">"Upload a brain MRI scan to analyze it"</p>
        </header>
    }
}
