//! Report structures for reviewers: job and candidate summaries, detailed analysis, batch ranking

use crate::output::feedback::FeedbackGenerator;
use crate::processing::batch::BatchOutcome;
use crate::processing::engine::{FitVerdict, RelevanceResult};
use crate::processing::hard_match::FuzzyMatch;
use crate::processing::normalizer::SkillToken;
use crate::processing::records::{ContactInfo, JobRecord, ResumeRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Quick overview of a parsed job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub role_title: String,
    pub company: String,
    pub experience_required: String,
    pub must_have_count: usize,
    pub good_to_have_count: usize,
    pub top_technical_skills: Vec<String>,
    pub qualifications: Vec<String>,
    /// 0-10 estimate of how demanding the posting is.
    pub complexity_score: u8,
}

impl JobSummary {
    pub fn from_job(job: &JobRecord) -> Self {
        Self {
            role_title: job.role_title.clone(),
            company: job.company.clone(),
            experience_required: job.experience_required.clone(),
            must_have_count: job.must_have_skills.len(),
            good_to_have_count: job.good_to_have_skills.len(),
            top_technical_skills: job.technical_skills.iter().take(5).map(|s| s.to_string()).collect(),
            qualifications: job.qualifications.clone(),
            complexity_score: complexity_score(job),
        }
    }
}

fn complexity_score(job: &JobRecord) -> u8 {
    let mut score = job.must_have_skills.len().min(5) + job.technical_skills.len().min(3);
    let title = job.role_title.to_lowercase();
    if title.contains("senior") || title.contains("lead") {
        score += 2;
    }
    score.min(10) as u8
}

/// Quick overview of a parsed resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSummary {
    pub name: String,
    pub experience_years: f32,
    pub education: String,
    pub technical_skills_count: usize,
    pub top_technical_skills: Vec<String>,
    pub projects_count: usize,
    pub certifications_count: usize,
    pub quality_score: f32,
    pub contact: ContactInfo,
    pub has_github: bool,
    pub has_linkedin: bool,
}

impl CandidateSummary {
    pub fn from_resume(resume: &ResumeRecord) -> Self {
        Self {
            name: resume.candidate_name.clone(),
            experience_years: resume.total_experience_years,
            education: resume
                .education
                .first()
                .map(|e| e.degree.clone())
                .unwrap_or_else(|| "Not specified".to_string()),
            technical_skills_count: resume.technical_skills.len(),
            top_technical_skills: resume.technical_skills.iter().take(5).map(|s| s.to_string()).collect(),
            projects_count: resume.projects.len(),
            certifications_count: resume.certifications.len(),
            quality_score: resume.quality_score,
            contact: resume.contact.clone(),
            has_github: !resume.github_links.is_empty(),
            has_linkedin: resume.linkedin_profile.is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringBreakdown {
    pub hard_match_score: f32,
    pub soft_match_score: f32,
    pub overall_similarity: f32,
    pub role_alignment: f32,
    pub project_relevance: f32,
    pub relevance_score: f32,
    pub verdict: FitVerdict,
    pub similarity_backend: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetails {
    pub matched_must_have: Vec<String>,
    pub missing_must_have: Vec<String>,
    pub matched_good_to_have: Vec<String>,
    pub missing_good_to_have: Vec<String>,
    pub fuzzy_matches: Vec<FuzzyMatch>,
    pub qualification_match: bool,
    pub experience_match: bool,
}

impl MatchDetails {
    pub fn must_have_summary(&self) -> String {
        format!(
            "{}/{}",
            self.matched_must_have.len(),
            self.matched_must_have.len() + self.missing_must_have.len()
        )
    }
}

/// Everything a placement reviewer needs about one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedReport {
    pub candidate: CandidateSummary,
    pub job: JobSummary,
    pub scoring: ScoringBreakdown,
    pub matches: MatchDetails,
    pub missing_elements: Vec<String>,
    pub suggestions: Vec<String>,
    pub interview_focus: Vec<String>,
    pub feedback: String,
    pub evaluated_at: DateTime<Utc>,
    pub evaluation_duration_ms: u64,
}

impl DetailedReport {
    pub fn build(job: &JobRecord, resume: &ResumeRecord, result: &RelevanceResult) -> Self {
        Self::build_with_feedback(job, resume, result, &FeedbackGenerator::new())
    }

    pub fn build_with_feedback(
        job: &JobRecord,
        resume: &ResumeRecord,
        result: &RelevanceResult,
        feedback: &FeedbackGenerator,
    ) -> Self {
        Self {
            candidate: CandidateSummary::from_resume(resume),
            job: JobSummary::from_job(job),
            scoring: ScoringBreakdown {
                hard_match_score: result.hard.score,
                soft_match_score: result.soft.score,
                overall_similarity: result.soft.overall_similarity,
                role_alignment: result.soft.role_alignment,
                project_relevance: result.soft.project_relevance,
                relevance_score: result.relevance_score,
                verdict: result.verdict,
                similarity_backend: result.soft.backend.clone(),
            },
            matches: MatchDetails {
                matched_must_have: skill_names(&result.hard.matched_must_have),
                missing_must_have: skill_names(&result.hard.missing_must_have),
                matched_good_to_have: skill_names(&result.hard.matched_good_to_have),
                missing_good_to_have: skill_names(&result.hard.missing_good_to_have),
                fuzzy_matches: result.hard.fuzzy_matches.clone(),
                qualification_match: result.hard.qualification_match,
                experience_match: result.hard.experience_match,
            },
            missing_elements: result.missing_elements.clone(),
            suggestions: result.suggestions.clone(),
            interview_focus: interview_focus(resume, result),
            feedback: feedback.generate_for(result),
            evaluated_at: result.evaluated_at,
            evaluation_duration_ms: result.evaluation_duration_ms,
        }
    }
}

fn skill_names(skills: &BTreeSet<SkillToken>) -> Vec<String> {
    skills.iter().map(|s| s.to_string()).collect()
}

/// Up to three topics for an interviewer to probe.
pub fn interview_focus(resume: &ResumeRecord, result: &RelevanceResult) -> Vec<String> {
    let mut focus = Vec::new();

    if !result.hard.matched_must_have.is_empty() {
        let top: Vec<&str> = result.hard.matched_must_have.iter().take(2).map(|s| s.as_str()).collect();
        focus.push(format!("Deep dive into {}", top.join(", ")));
    }

    if let Some(project) = resume.projects.first() {
        focus.push(format!("Technical discussion about {}", project.title));
    }

    if let Some(skill) = result.hard.missing_must_have.iter().next() {
        focus.push(format!("Assess learning ability and interest in {}", skill));
    }

    focus.truncate(3);
    focus
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub rank: usize,
    pub filename: String,
    pub candidate_name: Option<String>,
    pub relevance_score: Option<f32>,
    pub verdict: Option<FitVerdict>,
    pub must_have: Option<String>,
    pub error: Option<String>,
}

/// Ranked results of a bulk evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub role_title: String,
    pub evaluated: usize,
    pub failed: usize,
    pub entries: Vec<RankingEntry>,
    pub generated_at: DateTime<Utc>,
}

impl BatchReport {
    /// Build from outcomes already in ranked order.
    pub fn from_outcomes(role_title: &str, outcomes: &[BatchOutcome]) -> Self {
        let entries: Vec<RankingEntry> = outcomes
            .iter()
            .enumerate()
            .map(|(index, outcome)| match &outcome.result {
                Ok(result) => RankingEntry {
                    rank: index + 1,
                    filename: outcome.filename.clone(),
                    candidate_name: Some(result.candidate_name.clone()),
                    relevance_score: Some(result.relevance_score),
                    verdict: Some(result.verdict),
                    must_have: Some(format!(
                        "{}/{}",
                        result.hard.matched_must_have.len(),
                        result.hard.matched_must_have.len() + result.hard.missing_must_have.len()
                    )),
                    error: None,
                },
                Err(e) => RankingEntry {
                    rank: index + 1,
                    filename: outcome.filename.clone(),
                    candidate_name: None,
                    relevance_score: None,
                    verdict: None,
                    must_have: None,
                    error: Some(e.to_string()),
                },
            })
            .collect();

        let failed = entries.iter().filter(|e| e.error.is_some()).count();
        Self {
            role_title: role_title.to_string(),
            evaluated: entries.len() - failed,
            failed,
            entries,
            generated_at: Utc::now(),
        }
    }

    pub fn count_by_verdict(&self, verdict: FitVerdict) -> usize {
        self.entries.iter().filter(|e| e.verdict == Some(verdict)).count()
    }
}
