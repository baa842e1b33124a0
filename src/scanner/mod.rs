//! ローカル画像の列挙と寸法読み取り

use crate::error::{BrainCheckError, Result};
use braincheck_common::{is_allowed_extension, ImageDimensions, ImageLimits, SelectedFile, UploadError};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
    pub size: u64,
}

impl SelectedFile for ImageInfo {
    fn name(&self) -> String {
        self.file_name.clone()
    }

    fn size(&self) -> u64 {
        self.size
    }
}

/// 1ファイル分の検証結果
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub file_name: String,
    pub dimensions: Option<ImageDimensions>,
    pub outcome: std::result::Result<(), UploadError>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

pub fn inspect_file(path: &Path) -> Result<ImageInfo> {
    if !path.is_file() {
        return Err(BrainCheckError::FileNotFound(path.display().to_string()));
    }

    let metadata = std::fs::metadata(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(ImageInfo {
        path: path.to_path_buf(),
        file_name,
        size: metadata.len(),
    })
}

/// ファイルならそれ自体、フォルダなら直下の対応画像
pub fn scan_path(path: &Path) -> Result<Vec<ImageInfo>> {
    if path.is_dir() {
        scan_folder(path)
    } else {
        Ok(vec![inspect_file(path)?])
    }
}

pub fn scan_folder(folder: &Path) -> Result<Vec<ImageInfo>> {
    if !folder.exists() {
        return Err(BrainCheckError::FileNotFound(folder.display().to_string()));
    }

    let mut images = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if is_allowed_extension(&file_name) {
            images.push(inspect_file(path)?);
        }
    }

    // ファイル名でソート
    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(images)
}

/// ヘッダーのみ読んで寸法を得る
pub fn read_dimensions(path: &Path) -> std::result::Result<ImageDimensions, UploadError> {
    image::image_dimensions(path)
        .map(|(width, height)| ImageDimensions::new(width, height))
        .map_err(|e| UploadError::Decode(e.to_string()))
}

/// 各画像を並列に検証（結果は入力順）
pub fn check_images(images: &[ImageInfo], limits: &ImageLimits) -> Vec<CheckReport> {
    images
        .par_iter()
        .map(|info| check_image(info, limits))
        .collect()
}

fn check_image(info: &ImageInfo, limits: &ImageLimits) -> CheckReport {
    if info.size == 0 {
        return CheckReport {
            file_name: info.file_name.clone(),
            dimensions: None,
            outcome: Err(UploadError::NoFileSelected),
        };
    }

    match read_dimensions(&info.path) {
        Ok(dims) => CheckReport {
            file_name: info.file_name.clone(),
            dimensions: Some(dims),
            outcome: limits.validate(dims.width, dims.height),
        },
        Err(e) => CheckReport {
            file_name: info.file_name.clone(),
            dimensions: None,
            outcome: Err(e),
        },
    }
}
