//! Embeddings generation using Model2Vec

use crate::config::Config;
use crate::error::{RelevanceError, Result};
use log::{info, warn};
use model2vec_rs::model::StaticModel;
use std::sync::OnceLock;
use std::time::Instant;

/// Sentence-embedding model loaded on first use and shared read-only afterwards.
///
/// Loading happens at most once even when many threads ask for the model at
/// the same time; a failed load is remembered and reported to every caller.
pub struct EmbeddingEngine {
    location: String,
    model: OnceLock<std::result::Result<StaticModel, String>>,
}

impl EmbeddingEngine {
    /// `location` is a local model folder or a Hugging Face repo id.
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            model: OnceLock::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.embedding_model_location())
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.model.get(), Some(Ok(_)))
    }

    fn model(&self) -> Result<&StaticModel> {
        let loaded = self.model.get_or_init(|| {
            let start_time = Instant::now();
            info!("Loading Model2Vec embedding model from: {}", self.location);

            match StaticModel::from_pretrained(&self.location, None, None, None) {
                Ok(model) => {
                    info!("Model loaded successfully in {:.2?}", start_time.elapsed());
                    Ok(model)
                }
                Err(e) => {
                    warn!("Failed to load embedding model {}: {}", self.location, e);
                    Err(e.to_string())
                }
            }
        });

        loaded
            .as_ref()
            .map_err(|e| RelevanceError::Embedding(format!("Failed to load model: {}", e)))
    }

    /// Encode one text. Blank text encodes to an empty vector without touching the model.
    pub fn encode(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.model()?.encode_single(text))
    }

    pub fn encode_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(self.model()?.encode(texts))
    }

    /// Cosine similarity of two texts clamped to [0, 1].
    pub fn similarity(&self, text1: &str, text2: &str) -> Result<f32> {
        if text1.trim().is_empty() || text2.trim().is_empty() {
            return Ok(0.0);
        }

        let embeddings = self.encode_texts(&[text1.to_string(), text2.to_string()])?;
        match embeddings.as_slice() {
            [a, b] if a.is_empty() || b.is_empty() => Err(RelevanceError::Embedding(
                "Model produced an empty embedding".to_string(),
            )),
            [a, b] => Ok(cosine_similarity(a, b)?.clamp(0.0, 1.0)),
            _ => Err(RelevanceError::Embedding(format!(
                "Expected 2 embeddings, got {}",
                embeddings.len()
            ))),
        }
    }
}

/// Calculate cosine similarity between two embeddings
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(RelevanceError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    if a.is_empty() {
        return Ok(0.0);
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot_product / (norm_a * norm_b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b).unwrap() - 1.0).abs() < 1e-6);

        let c = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &c).unwrap().abs() < 1e-6);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d).unwrap() + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_edge_cases() {
        assert_eq!(cosine_similarity(&[], &[]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]).unwrap(), 0.0);
        assert!(matches!(
            cosine_similarity(&[1.0], &[1.0, 2.0]),
            Err(RelevanceError::Embedding(_))
        ));
    }

    #[test]
    fn test_blank_text_never_loads_model() {
        let engine = EmbeddingEngine::new("/nonexistent/model");
        assert_eq!(engine.similarity("", "some text").unwrap(), 0.0);
        assert!(engine.encode("   ").unwrap().is_empty());
        assert!(!engine.is_loaded());
        assert_eq!(engine.location(), "/nonexistent/model");
    }
}
