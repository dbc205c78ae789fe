//! Semantic matching between free-text job and resume content

use crate::config::{Config, EmbeddingBackend, ScoringConfig};
use crate::processing::embeddings::EmbeddingEngine;
use crate::processing::records::{JobRecord, ResumeRecord};
use crate::processing::text_processor::jaccard_similarity;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A strategy for comparing two texts. Implementations never fail and
/// always return a value in [0, 1]; blank input yields 0.
pub trait SimilarityBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn similarity(&self, text1: &str, text2: &str) -> f32;
}

/// Token-set Jaccard similarity.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalSimilarity;

impl SimilarityBackend for LexicalSimilarity {
    fn name(&self) -> &'static str {
        "lexical"
    }

    fn similarity(&self, text1: &str, text2: &str) -> f32 {
        jaccard_similarity(text1, text2).clamp(0.0, 1.0)
    }
}

/// Cosine similarity of sentence embeddings, degrading to lexical
/// similarity whenever the model cannot produce an answer.
pub struct EmbeddingSimilarity {
    engine: EmbeddingEngine,
    fallback: LexicalSimilarity,
    degraded: AtomicBool,
}

impl EmbeddingSimilarity {
    pub fn new(engine: EmbeddingEngine) -> Self {
        Self {
            engine,
            fallback: LexicalSimilarity,
            degraded: AtomicBool::new(false),
        }
    }

    /// True once any comparison has fallen back to lexical similarity.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }
}

impl SimilarityBackend for EmbeddingSimilarity {
    fn name(&self) -> &'static str {
        "model"
    }

    fn similarity(&self, text1: &str, text2: &str) -> f32 {
        if text1.trim().is_empty() || text2.trim().is_empty() {
            return 0.0;
        }

        match self.engine.similarity(text1, text2) {
            Ok(score) => score,
            Err(e) => {
                if !self.degraded.swap(true, Ordering::Relaxed) {
                    warn!("Embedding similarity unavailable, using lexical similarity: {}", e);
                } else {
                    debug!("Embedding similarity failed again: {}", e);
                }
                self.fallback.similarity(text1, text2)
            }
        }
    }
}

/// Build the backend named by the configuration.
pub fn backend_for(config: &Config) -> Arc<dyn SimilarityBackend> {
    match config.scoring.embedding_backend {
        EmbeddingBackend::Model => Arc::new(EmbeddingSimilarity::new(EmbeddingEngine::from_config(config))),
        EmbeddingBackend::Lexical => Arc::new(LexicalSimilarity),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftMatchResult {
    /// Job description against the whole resume, 0-1.
    pub overall_similarity: f32,
    /// Responsibilities against work history, 0-1.
    pub role_alignment: f32,
    /// Technical skills and domain keywords against projects, 0-1.
    pub project_relevance: f32,
    pub backend: String,
    /// Sub-score on the configured soft-match ceiling.
    pub score: f32,
}

pub struct SemanticMatcher {
    config: ScoringConfig,
    backend: Arc<dyn SimilarityBackend>,
}

impl SemanticMatcher {
    pub fn new(config: &ScoringConfig, backend: Arc<dyn SimilarityBackend>) -> Self {
        Self {
            config: config.clone(),
            backend,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn score(&self, job: &JobRecord, resume: &ResumeRecord) -> SoftMatchResult {
        let overall_similarity = self.compare(&job.description, &resume.text);
        let role_alignment = self.compare(&responsibilities_text(job), &experience_text(resume));
        let project_relevance = self.compare(&job_technical_text(job), &projects_text(resume));

        let weights = &self.config.soft_weights;
        let weighted = weights.overall * overall_similarity
            + weights.role_alignment * role_alignment
            + weights.project_relevance * project_relevance;
        let total_weight = weights.total();
        let fraction = if total_weight > 0.0 { weighted / total_weight } else { 0.0 };
        let score = (fraction * self.config.soft_match_ceiling).clamp(0.0, self.config.soft_match_ceiling);

        debug!(
            "Soft match ({}): overall={:.3}, role={:.3}, projects={:.3}, score={:.2}",
            self.backend.name(),
            overall_similarity,
            role_alignment,
            project_relevance,
            score
        );

        SoftMatchResult {
            overall_similarity,
            role_alignment,
            project_relevance,
            backend: self.backend.name().to_string(),
            score,
        }
    }

    fn compare(&self, text1: &str, text2: &str) -> f32 {
        if text1.trim().is_empty() || text2.trim().is_empty() {
            return 0.0;
        }
        let score = self.backend.similarity(text1, text2);
        if score.is_finite() {
            score.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

fn responsibilities_text(job: &JobRecord) -> String {
    job.responsibilities.join(". ")
}

fn experience_text(resume: &ResumeRecord) -> String {
    resume
        .work_experience
        .iter()
        .map(|entry| format!("{} {} {}", entry.role, entry.company, entry.duration))
        .collect::<Vec<_>>()
        .join(". ")
}

fn job_technical_text(job: &JobRecord) -> String {
    job.technical_skills
        .iter()
        .map(|skill| skill.as_str().to_string())
        .chain(job.domain_keywords.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ")
}

fn projects_text(resume: &ResumeRecord) -> String {
    resume
        .projects
        .iter()
        .map(|project| {
            let technologies = project
                .technologies
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            format!("{} {} {}", project.title, project.description, technologies)
        })
        .collect::<Vec<_>>()
        .join(". ")
}
