use braincheck::{cli, client, config, console_view, error, scanner};
use braincheck_common::{format_file_size, PredictionResult, UploadOrchestrator};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use std::path::Path;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !e.is_reported() {
                eprintln!("✖ {}", e);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load()?;

    match cli.command {
        Commands::Check { path } => {
            println!("🧠 braincheck - 画像検証\n");

            let images = scanner::scan_path(&path)?;
            if images.is_empty() {
                return Err(error::BrainCheckError::NoImagesFound(
                    path.display().to_string(),
                ));
            }
            println!("{}枚の画像を検証中...", images.len());

            let reports = scanner::check_images(&images, &config.limits);
            let mut failed = 0;
            for report in &reports {
                let dims = report
                    .dimensions
                    .map(|d| format!("{}×{}", d.width, d.height))
                    .unwrap_or_else(|| "-".to_string());
                match &report.outcome {
                    Ok(()) => println!("✔ {} ({})", report.file_name, dims),
                    Err(e) => {
                        failed += 1;
                        // 寸法以外（読めない・空）は区別して表示
                        let mark = if e.is_validation() { "✖" } else { "⚠" };
                        println!("{} {} ({}): {}", mark, report.file_name, dims, e);
                    }
                }
            }

            println!();
            if failed > 0 {
                return Err(error::BrainCheckError::ValidationFailed(failed));
            }
            println!("✅ すべての画像が送信可能です");
        }

        Commands::Submit { file, endpoint, output } => {
            println!("🧠 braincheck - MRI解析\n");

            let endpoint = endpoint.unwrap_or_else(|| config.get_endpoint());
            let predict_url = config::predict_url(&endpoint);
            let upload_config = config.upload_config(&output);
            if cli.verbose {
                println!("  サーバー: {}", predict_url);
            }

            let info = scanner::inspect_file(&file)?;
            if cli.verbose {
                println!("  ファイル: {} ({})", info.file_name, format_file_size(info.size));
            }
            let backend = client::NativeBackend::new(
                &predict_url,
                &output,
                config.timeout_seconds,
                cli.verbose,
            )?;
            let view = console_view::ConsoleView::new(cli.verbose);
            let orchestrator = UploadOrchestrator::new(backend, view, upload_config);

            println!("[1/2] 画像を検証中...");
            orchestrator.handle_file_upload(Some(&info)).await?;

            println!("[2/2] 解析サーバーへ送信中...");
            orchestrator.handle_form_submit(Some(&info)).await?;

            if orchestrator.view().completed() {
                print_summary(&output)?;
            }
        }

        Commands::Config { set_endpoint, show } => {
            if let Some(url) = set_endpoint {
                config.set_endpoint(url)?;
                println!("✔ サーバーURLを保存しました");
            }

            if show {
                println!("設定ファイル: {}", Config::config_path()?.display());
                println!("{}", serde_json::to_string_pretty(&config)?);
                println!("有効なサーバーURL: {}", config.get_endpoint());
            }
        }
    }

    Ok(())
}

fn print_summary(output: &Path) -> Result<()> {
    let content = std::fs::read_to_string(output)?;
    let result: PredictionResult = serde_json::from_str(&content)?;
    let summary = result.summary();

    println!();
    println!("判定: {} ({})", summary.predicted_class, summary.confidence_percent());
    for (name, probability) in summary.ranked_predictions() {
        println!("  {:<12} {:>6.1}%", name, probability * 100.0);
    }
    Ok(())
}
