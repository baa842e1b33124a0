//! 解析結果画面
//!
//! アップロード画面がsessionStorageに残した応答を表示する。

use braincheck_common::orchestrator::RESULTS_STORAGE_KEY;
use braincheck_common::{format_dimensions, ImageDimensions, PredictionSummary};
use leptos::prelude::*;

use crate::api::load_results;
use crate::components::header::Header;

/// 結果が無い場合の戻り先
const UPLOAD_PATH: &str = "/upload";

#[component]
pub fn ResultPage() -> impl IntoView {
    let Some(result) = load_results(RESULTS_STORAGE_KEY) else {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(UPLOAD_PATH);
        }
        return view! { <p class="text-muted">"Redirecting to upload..."</p> }.into_any();
    };

    let summary = result.summary();
    view! {
        <div class="container">
            <Header />
            <ResultPanel summary=summary />
            <a class="btn btn-secondary" href=UPLOAD_PATH>"Analyze another scan"</a>
        </div>
    }
    .into_any()
}

#[component]
fn ResultPanel(summary: PredictionSummary) -> impl IntoView {
    let rows = summary
        .ranked_predictions()
        .into_iter()
        .map(|(name, probability)| {
            let is_top = name == summary.predicted_class;
            view! {
                <li class=if is_top { "prediction top" } else { "prediction" }>
                    <span class="prediction-name">{name.to_string()}</span>
                    <div class="prediction-bar">
                        <div
                            class="prediction-fill"
                            style=format!("width: {:.1}%", probability * 100.0)
                        />
                    </div>
                    <span class="prediction-value">{format!("{:.1}%", probability * 100.0)}</span>
                </li>
            }
        })
        .collect_view();

    let image = (!summary.image_path.is_empty()).then(|| {
        let src = summary.image_path.clone();
        view! { <img class="result-image" src=src alt="Analyzed MRI scan" /> }
    });

    let dims = ImageDimensions::new(summary.original_width, summary.original_height);
    let ratio = if summary.aspect_ratio > 0.0 {
        summary.aspect_ratio
    } else {
        dims.aspect_ratio()
    };

    view! {
        <section class="result-panel">
            <h2 class="predicted-class">{summary.predicted_class.clone()}</h2>
            <p class="confidence">"Confidence: " {summary.confidence_percent()}</p>

            {image}

            <ul class="predictions">{rows}</ul>

            <dl class="image-details">
                <dt>"Size"</dt>
                <dd>{format_dimensions(dims)}</dd>
                <dt>"Aspect ratio"</dt>
                <dd>{format!("{:.2} ({})", ratio, summary.aspect_status())}</dd>
                <dt>"File"</dt>
                <dd>{format!("{} / {} / {}", summary.file_format, summary.color_mode, summary.file_size)}</dd>
            </dl>
        </section>
    }
}
