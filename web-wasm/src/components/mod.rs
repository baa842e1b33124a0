pub mod header;
pub mod loading_overlay;
pub mod result_panel;
pub mod upload_area;
