use crate::error::{BrainCheckError, Result};
use braincheck_common::orchestrator::{PREDICT_ENDPOINT, RESULTS_STORAGE_KEY};
use braincheck_common::{ImageLimits, UploadConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// サーバーURLを上書きする環境変数
pub const ENDPOINT_ENV: &str = "BRAINCHECK_ENDPOINT";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: String,
    pub timeout_seconds: u64,
    pub limits: ImageLimits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5000".into(),
            timeout_seconds: 120,
            limits: ImageLimits::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| BrainCheckError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("braincheck").join("config.json"))
    }

    /// サーバーURL（環境変数を優先）
    pub fn get_endpoint(&self) -> String {
        match std::env::var(ENDPOINT_ENV) {
            Ok(url) if !url.trim().is_empty() => url,
            _ => self.endpoint.clone(),
        }
    }

    pub fn set_endpoint(&mut self, url: String) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(BrainCheckError::Config(format!(
                "URLは http:// または https:// で始めてください: {}",
                url
            )));
        }
        self.endpoint = url;
        self.save()
    }

    /// 制御側の設定。CLIでは「結果画面」を出力ファイルに読み替える
    pub fn upload_config(&self, output: &Path) -> UploadConfig {
        UploadConfig {
            result_path: output.display().to_string(),
            storage_key: RESULTS_STORAGE_KEY.to_string(),
            limits: self.limits,
        }
    }
}

/// サーバーURL → `/predict` のURL
pub fn predict_url(endpoint: &str) -> String {
    let base = endpoint.trim_end_matches('/');
    if base.ends_with(PREDICT_ENDPOINT) {
        base.to_string()
    } else {
        format!("{}{}", base, PREDICT_ENDPOINT)
    }
}
