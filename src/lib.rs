//! BrainCheck CLI
//!
//! ブラウザ版と同じアップロード制御をターミナルから使う

pub mod cli;
pub mod client;
pub mod config;
pub mod console_view;
pub mod error;
pub mod scanner;
