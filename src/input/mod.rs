//! Input processing module
//! Handles file detection, byte-level text extraction, and file reading

pub mod file_detector;
pub mod manager;
pub mod text_extractor;

pub use file_detector::FileType;
pub use manager::InputManager;
