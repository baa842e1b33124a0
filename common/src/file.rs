//! ファイル名・表示用ユーティリティ

use crate::types::ImageDimensions;

/// ラベル表示の最大文字数
pub const DEFAULT_LABEL_LENGTH: usize = 30;

/// サーバーが受け付ける拡張子
const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

/// 長いファイル名を「先頭...拡張子」形式に短縮
///
/// 文字数は`char`単位で数える（日本語ファイル名でも境界で切れない）
pub fn truncate_file_name(name: &str, max_len: usize) -> String {
    let len = name.chars().count();
    if len <= max_len {
        return name.to_string();
    }

    let keep = max_len.saturating_sub(3);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            let head: String = stem.chars().take(keep).collect();
            format!("{}...{}", head, ext)
        }
        _ => {
            let head: String = name.chars().take(keep).collect();
            format!("{}...", head)
        }
    }
}

/// 拡張子がアップロード対象か（大文字小文字を区別しない）
pub fn is_allowed_extension(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// `<input accept>` 用の文字列
pub fn accept_attribute() -> String {
    ALLOWED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn format_dimensions(dims: ImageDimensions) -> String {
    format!("Dimensions: {} × {} pixels", dims.width, dims.height)
}

/// バイト数をKB表記に
pub fn format_file_size(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}
