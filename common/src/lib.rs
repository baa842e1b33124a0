//! BrainCheck Common Library
//!
//! CLIとWeb(WASM)で共有されるアップロード検証・状態管理

pub mod error;
pub mod file;
pub mod orchestrator;
pub mod response;
pub mod state;
pub mod types;
pub mod validation;

pub use error::{UploadError, Result};
pub use file::{format_dimensions, format_file_size, is_allowed_extension, truncate_file_name};
pub use orchestrator::{DragPhase, SelectedFile, UploadBackend, UploadConfig, UploadOrchestrator, UploadView};
pub use response::classify_response;
pub use state::{Preview, UploadState};
pub use types::{DecodedImage, ImageDimensions, PredictionResult, PredictionSummary};
pub use validation::{aspect_ratio, validate_image, AspectRatioStatus, ImageLimits};
