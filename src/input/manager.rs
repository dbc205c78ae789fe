//! Input manager for reading documents from disk

use crate::error::{RelevanceError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::extract_bytes;
use log::info;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
    max_file_size: Option<u64>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
            max_file_size: None,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = Some(bytes);
        self
    }

    /// Read raw bytes, enforcing existence and the size limit.
    pub async fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        if !path.exists() {
            return Err(RelevanceError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        if let Some(limit) = self.max_file_size {
            let size = fs::metadata(path).await?.len();
            if size > limit {
                return Err(RelevanceError::InvalidInput(format!(
                    "File {} is {} bytes, exceeding the {} byte limit",
                    path.display(),
                    size,
                    limit
                )));
            }
        }

        Ok(fs::read(path).await?)
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        let file_type = self.detect_file_type(path)?;
        if file_type == FileType::Unknown {
            return Err(RelevanceError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                path.display()
            )));
        }

        let bytes = self.read_bytes(path).await?;
        info!("Extracting {:?} text from: {}", file_type, path.display());
        let text = extract_bytes(file_type, &bytes)?;

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                RelevanceError::InvalidInput(format!("File has no extension: {}", path.display()))
            })?;

        Ok(FileType::from_extension(extension))
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_size_limit_enforced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("big.txt");
        std::fs::write(&path, "x".repeat(64)).unwrap();

        let manager = InputManager::new().with_max_file_size(16);
        let result = manager.read_bytes(&path).await;
        assert!(matches!(result, Err(RelevanceError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_missing_extension_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("README");
        std::fs::write(&path, "content").unwrap();

        let mut manager = InputManager::new();
        assert!(manager.extract_text(&path).await.is_err());
    }
}
