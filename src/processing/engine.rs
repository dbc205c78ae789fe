//! Hybrid scoring engine combining hard and semantic matching into a verdict

use crate::config::{Config, ScoringConfig};
use crate::error::Result;
use crate::processing::hard_match::{HardMatchResult, HardMatcher};
use crate::processing::records::{JobRecord, ResumeRecord};
use crate::processing::semantic::{backend_for, SemanticMatcher, SimilarityBackend, SoftMatchResult};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Categorical outcome of an evaluation, ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FitVerdict {
    Low,
    Medium,
    High,
}

impl FitVerdict {
    pub fn from_score(score: f32, config: &ScoringConfig) -> Self {
        if score >= config.verdict_high_threshold {
            FitVerdict::High
        } else if score >= config.verdict_medium_threshold {
            FitVerdict::Medium
        } else {
            FitVerdict::Low
        }
    }
}

impl fmt::Display for FitVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitVerdict::High => write!(f, "High"),
            FitVerdict::Medium => write!(f, "Medium"),
            FitVerdict::Low => write!(f, "Low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceResult {
    pub job_id: Option<String>,
    pub resume_id: Option<String>,
    pub role_title: String,
    pub candidate_name: String,
    pub hard: HardMatchResult,
    pub soft: SoftMatchResult,
    /// Weighted combination of both sub-scores, 0-100.
    pub relevance_score: f32,
    pub verdict: FitVerdict,
    pub missing_elements: Vec<String>,
    pub suggestions: Vec<String>,
    pub evaluated_at: DateTime<Utc>,
    pub evaluation_duration_ms: u64,
}

impl RelevanceResult {
    pub fn hard_score(&self) -> f32 {
        self.hard.score
    }

    pub fn soft_score(&self) -> f32 {
        self.soft.score
    }
}

/// Stateless evaluator; construct once and share across evaluations.
pub struct HybridScoringEngine {
    config: ScoringConfig,
    hard_matcher: HardMatcher,
    semantic_matcher: SemanticMatcher,
}

impl HybridScoringEngine {
    pub fn new(config: ScoringConfig, backend: Arc<dyn SimilarityBackend>) -> Result<Self> {
        config.validate()?;
        info!(
            "Scoring engine ready: weights {:.2}/{:.2}, thresholds {}/{}, backend {}",
            config.hard_match_weight,
            config.soft_match_weight,
            config.verdict_high_threshold,
            config.verdict_medium_threshold,
            backend.name()
        );

        Ok(Self {
            hard_matcher: HardMatcher::new(&config),
            semantic_matcher: SemanticMatcher::new(&config, backend),
            config,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.scoring.clone(), backend_for(config))
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn backend_name(&self) -> &'static str {
        self.semantic_matcher.backend_name()
    }

    pub fn verdict_for(&self, score: f32) -> FitVerdict {
        FitVerdict::from_score(score, &self.config)
    }

    pub fn evaluate(&self, job: &JobRecord, resume: &ResumeRecord) -> RelevanceResult {
        let start_time = Instant::now();

        let hard = self.hard_matcher.score(job, resume);
        let soft = self.semantic_matcher.score(job, resume);
        let relevance_score = self.combine(hard.score, soft.score);
        let verdict = self.verdict_for(relevance_score);
        let missing_elements = self.missing_elements(job, resume, &hard);
        let suggestions = self.suggestions(job, resume, &hard, &soft);

        debug!(
            "Evaluated '{}' for '{}': hard={:.2}, soft={:.2}, relevance={:.2}, verdict={}",
            resume.candidate_name, job.role_title, hard.score, soft.score, relevance_score, verdict
        );

        RelevanceResult {
            job_id: job.id.clone(),
            resume_id: resume.id.clone(),
            role_title: job.role_title.clone(),
            candidate_name: resume.candidate_name.clone(),
            hard,
            soft,
            relevance_score,
            verdict,
            missing_elements,
            suggestions,
            evaluated_at: Utc::now(),
            evaluation_duration_ms: start_time.elapsed().as_millis() as u64,
        }
    }

    fn combine(&self, hard_score: f32, soft_score: f32) -> f32 {
        let hard_pct = hard_score / self.config.hard_match_ceiling * 100.0;
        let soft_pct = soft_score / self.config.soft_match_ceiling * 100.0;
        let relevance = self.config.hard_match_weight * hard_pct + self.config.soft_match_weight * soft_pct;
        if relevance.is_finite() {
            relevance.clamp(0.0, 100.0)
        } else {
            0.0
        }
    }

    fn missing_elements(&self, job: &JobRecord, resume: &ResumeRecord, hard: &HardMatchResult) -> Vec<String> {
        let mut missing: Vec<String> = hard
            .missing_must_have
            .iter()
            .map(|skill| format!("Critical skill: {}", skill))
            .collect();

        if hard.missing_good_to_have.len() > hard.matched_good_to_have.len() {
            missing.extend(
                hard.missing_good_to_have
                    .iter()
                    .take(3)
                    .map(|skill| format!("Preferred skill: {}", skill)),
            );
        }

        if !hard.qualification_match {
            missing.push("Relevant technical certifications".to_string());
        }

        if resume.projects.len() < 2 {
            missing.push("More relevant projects demonstrating technical skills".to_string());
        }

        if !hard.experience_match {
            missing.push(format!("Additional experience in {}", job.role_title));
        }

        missing
    }

    fn suggestions(
        &self,
        job: &JobRecord,
        resume: &ResumeRecord,
        hard: &HardMatchResult,
        soft: &SoftMatchResult,
    ) -> Vec<String> {
        let mut suggestions = Vec::new();

        if !hard.missing_must_have.is_empty() {
            let top = join_top(hard.missing_must_have.iter().map(|s| s.as_str()), 3);
            suggestions.push(format!(
                "Priority: Learn {} as these are critical for the {} role",
                top, job.role_title
            ));
        }

        if !hard.matched_must_have.is_empty() && !hard.missing_must_have.is_empty() {
            suggestions.push(format!(
                "You have {} out of {} required skills. Focus on the missing ones.",
                hard.matched_must_have.len(),
                job.must_have_skills.len()
            ));
        }

        if resume.projects.len() < 2 {
            let focus = if job.technical_skills.is_empty() {
                join_top(job.must_have_skills.iter().map(|s| s.as_str()), 3)
            } else {
                join_top(job.technical_skills.iter().map(|s| s.as_str()), 3)
            };
            let focus = if focus.is_empty() { "relevant technologies".to_string() } else { focus };
            suggestions.push(format!(
                "Build 2-3 projects using {} to demonstrate practical skills",
                focus
            ));
        }

        if resume.total_experience_years < 1.0 && !job.role_title.to_lowercase().contains("senior") {
            suggestions.push("Consider internships or freelance projects to gain relevant experience".to_string());
        }

        if !hard.qualification_match {
            if let Some(certification) = job
                .qualifications
                .iter()
                .find(|q| q.to_lowercase().contains("certif"))
            {
                suggestions.push(format!(
                    "Consider getting certified in {} to strengthen your profile",
                    certification
                ));
            }
        }

        if soft.role_alignment < self.config.role_alignment_floor {
            suggestions.push(
                "Highlight your experience with teamwork, communication, and problem-solving skills".to_string(),
            );
        }

        if resume.quality_score < self.config.resume_quality_floor {
            suggestions.push(
                "Improve resume structure with clear sections for skills, experience, projects, and education"
                    .to_string(),
            );
        }

        suggestions.truncate(self.config.max_suggestions);
        suggestions
    }
}

fn join_top<'a>(items: impl Iterator<Item = &'a str>, limit: usize) -> String {
    items.take(limit).collect::<Vec<_>>().join(", ")
}
