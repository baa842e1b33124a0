//! ターミナル出力による画面反映

use braincheck_common::{Preview, UploadView};
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::{Cell, RefCell};
use std::time::Duration;

pub struct ConsoleView {
    verbose: bool,
    spinner: RefCell<Option<ProgressBar>>,
    completed: Cell<bool>,
}

impl ConsoleView {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            spinner: RefCell::new(None),
            completed: Cell::new(false),
        }
    }

    /// 結果の保存まで完了したか
    pub fn completed(&self) -> bool {
        self.completed.get()
    }
}

impl UploadView for ConsoleView {
    fn show_error(&self, message: &str) {
        eprintln!("✖ {}", message);
    }

    fn hide_error(&self) {}

    fn show_preview(&self, preview: &Preview) {
        println!("✔ {} ({})", preview.display_name, preview.dimensions_text());
        if self.verbose {
            println!("  {}", preview.src);
        }
    }

    fn show_loading(&self) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message("Analyzing MRI scan...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        *self.spinner.borrow_mut() = Some(spinner);
    }

    fn hide_loading(&self) {
        if let Some(spinner) = self.spinner.borrow_mut().take() {
            spinner.finish_and_clear();
        }
    }

    fn set_highlight(&self, _highlighted: bool) {}

    fn navigate(&self, path: &str) {
        self.hide_loading();
        self.completed.set(true);
        println!("✔ 結果を保存: {}", path);
    }
}
