//! Hard matching: exact and fuzzy skill comparison plus qualification and experience checks

use crate::config::{FuzzyAlgorithm, ScoringConfig};
use crate::processing::normalizer::SkillToken;
use crate::processing::records::{JobRecord, ResumeRecord};
use crate::processing::skills::SkillDictionary;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use strsim::normalized_levenshtein;

/// A required skill satisfied by a differently spelled candidate skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyMatch {
    pub required: SkillToken,
    pub candidate: SkillToken,
    /// Similarity on a 0-100 scale.
    pub similarity: f32,
    pub algorithm: FuzzyAlgorithm,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillMatch {
    pub matched: BTreeSet<SkillToken>,
    pub missing: BTreeSet<SkillToken>,
    pub fuzzy: Vec<FuzzyMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardMatchResult {
    pub matched_must_have: BTreeSet<SkillToken>,
    pub missing_must_have: BTreeSet<SkillToken>,
    pub matched_good_to_have: BTreeSet<SkillToken>,
    pub missing_good_to_have: BTreeSet<SkillToken>,
    pub fuzzy_matches: Vec<FuzzyMatch>,
    pub qualification_match: bool,
    pub experience_match: bool,
    pub required_years: Option<u32>,
    /// Sub-score on the configured hard-match ceiling.
    pub score: f32,
}

impl HardMatchResult {
    /// Fraction of must-have skills matched; 1.0 when the job lists none.
    pub fn must_have_coverage(&self) -> f32 {
        let total = self.matched_must_have.len() + self.missing_must_have.len();
        if total == 0 {
            1.0
        } else {
            self.matched_must_have.len() as f32 / total as f32
        }
    }
}

pub struct HardMatcher {
    config: ScoringConfig,
    dictionary: &'static SkillDictionary,
    number_regex: Regex,
}

impl HardMatcher {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            config: config.clone(),
            dictionary: SkillDictionary::embedded(),
            number_regex: Regex::new(r"\d+").expect("Invalid number regex"),
        }
    }

    pub fn score(&self, job: &JobRecord, resume: &ResumeRecord) -> HardMatchResult {
        let candidate = resume.all_skills();
        let qualification_match = self.qualification_match(job, resume);
        let (experience_match, required_years) = self.experience_match(job, resume);

        if !job.has_skill_requirements() {
            debug!("Job '{}' lists no skills; hard score is 0", job.role_title);
            return HardMatchResult {
                matched_must_have: BTreeSet::new(),
                missing_must_have: BTreeSet::new(),
                matched_good_to_have: BTreeSet::new(),
                missing_good_to_have: BTreeSet::new(),
                fuzzy_matches: Vec::new(),
                qualification_match,
                experience_match,
                required_years,
                score: 0.0,
            };
        }

        let must_have = self.match_skills(&job.must_have_skills, &candidate);
        let good_to_have = self.match_skills(&job.good_to_have_skills, &candidate);

        let weights = &self.config.hard_weights;
        let fraction = weights.must_have * coverage(&must_have, &job.must_have_skills)
            + weights.good_to_have * coverage(&good_to_have, &job.good_to_have_skills)
            + weights.qualification * flag(qualification_match)
            + weights.experience * flag(experience_match);
        let total_weight = weights.total();
        let fraction = if total_weight > 0.0 { fraction / total_weight } else { 0.0 };
        let score = (fraction * self.config.hard_match_ceiling).clamp(0.0, self.config.hard_match_ceiling);

        debug!(
            "Hard match: {}/{} must-have, {}/{} good-to-have, qualification={}, experience={}, score={:.2}",
            must_have.matched.len(),
            job.must_have_skills.len(),
            good_to_have.matched.len(),
            job.good_to_have_skills.len(),
            qualification_match,
            experience_match,
            score
        );

        let mut fuzzy_matches = must_have.fuzzy;
        fuzzy_matches.extend(good_to_have.fuzzy);

        HardMatchResult {
            matched_must_have: must_have.matched,
            missing_must_have: must_have.missing,
            matched_good_to_have: good_to_have.matched,
            missing_good_to_have: good_to_have.missing,
            fuzzy_matches,
            qualification_match,
            experience_match,
            required_years,
            score,
        }
    }

    /// Classify each required skill as matched (exactly, or by best fuzzy candidate) or missing.
    pub fn match_skills(&self, required: &BTreeSet<SkillToken>, candidate: &BTreeSet<SkillToken>) -> SkillMatch {
        let mut result = SkillMatch::default();

        for skill in required {
            if candidate.contains(skill) {
                result.matched.insert(skill.clone());
                continue;
            }

            let best = candidate
                .iter()
                .map(|other| (other, self.similarity(skill.as_str(), other.as_str())))
                .max_by(|a, b| a.1.total_cmp(&b.1));

            match best {
                Some((other, similarity)) if similarity >= self.config.fuzzy_match_threshold => {
                    debug!("Fuzzy match '{}' ~ '{}' ({:.1})", skill, other, similarity);
                    result.matched.insert(skill.clone());
                    result.fuzzy.push(FuzzyMatch {
                        required: skill.clone(),
                        candidate: other.clone(),
                        similarity,
                        algorithm: self.config.fuzzy_algorithm,
                    });
                }
                _ => {
                    result.missing.insert(skill.clone());
                }
            }
        }

        result
    }

    /// Similarity of two skill strings on a 0-100 scale using the configured algorithm.
    pub fn similarity(&self, a: &str, b: &str) -> f32 {
        match self.config.fuzzy_algorithm {
            FuzzyAlgorithm::TokenSetRatio => token_set_ratio(a, b),
            FuzzyAlgorithm::CharacterJaccard => character_jaccard(a, b),
        }
    }

    fn qualification_match(&self, job: &JobRecord, resume: &ResumeRecord) -> bool {
        if job.qualifications.is_empty() {
            return true;
        }

        let vocabulary = &self.dictionary.education;
        resume.education.iter().any(|education| {
            let text = education.qualification_text();
            vocabulary
                .degree_levels
                .iter()
                .any(|level| text.contains(level.as_str()))
                && vocabulary
                    .technical_fields
                    .iter()
                    .any(|field| text.contains(field.as_str()))
        })
    }

    fn experience_match(&self, job: &JobRecord, resume: &ResumeRecord) -> (bool, Option<u32>) {
        let required = self
            .number_regex
            .find(&job.experience_required)
            .and_then(|m| m.as_str().parse::<u32>().ok());

        let matched = match required {
            None => true,
            Some(years) if years <= 1 => true,
            Some(years) => resume.total_experience_years >= years as f32 * self.config.experience_tolerance,
        };
        (matched, required)
    }
}

fn flag(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}

fn coverage(result: &SkillMatch, required: &BTreeSet<SkillToken>) -> f32 {
    if required.is_empty() {
        1.0
    } else {
        result.matched.len() as f32 / required.len() as f32
    }
}

/// Token-set ratio on a 0-100 scale.
///
/// Word sets are split into their shared part and the two remainders; the
/// result is the best normalized Levenshtein similarity among the shared part,
/// the two "shared + remainder" strings and the plain lower-cased inputs, so
/// both reordered words ("learning machine") and joined words ("springboot")
/// score high. Returns 0 when either input is blank.
pub fn token_set_ratio(a: &str, b: &str) -> f32 {
    let tokens_a: BTreeSet<String> = a.split_whitespace().map(str::to_lowercase).collect();
    let tokens_b: BTreeSet<String> = b.split_whitespace().map(str::to_lowercase).collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }
    let plain = normalized_levenshtein(
        &tokens_a.iter().cloned().collect::<Vec<_>>().join(" "),
        &tokens_b.iter().cloned().collect::<Vec<_>>().join(" "),
    )
    .max(normalized_levenshtein(&a.trim().to_lowercase(), &b.trim().to_lowercase()));

    let join = |tokens: Vec<&String>| tokens.into_iter().map(String::as_str).collect::<Vec<_>>().join(" ");
    let shared = join(tokens_a.intersection(&tokens_b).collect());
    let only_a = join(tokens_a.difference(&tokens_b).collect());
    let only_b = join(tokens_b.difference(&tokens_a).collect());

    let combined_a = format!("{} {}", shared, only_a).trim().to_string();
    let combined_b = format!("{} {}", shared, only_b).trim().to_string();

    let mut best: f64 = normalized_levenshtein(&combined_a, &combined_b).max(plain);
    if !shared.is_empty() {
        best = best
            .max(normalized_levenshtein(&shared, &combined_a))
            .max(normalized_levenshtein(&shared, &combined_b));
    }
    (best * 100.0) as f32
}

/// Jaccard similarity of the character sets of two strings on a 0-100 scale.
pub fn character_jaccard(a: &str, b: &str) -> f32 {
    let chars_a: HashSet<char> = a.to_lowercase().chars().filter(|c| !c.is_whitespace()).collect();
    let chars_b: HashSet<char> = b.to_lowercase().chars().filter(|c| !c.is_whitespace()).collect();
    let union = chars_a.union(&chars_b).count();
    if union == 0 {
        return 0.0;
    }
    chars_a.intersection(&chars_b).count() as f32 / union as f32 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::records::Education;

    fn job(must: &[&str], good: &[&str]) -> JobRecord {
        JobRecord::builder("Backend Engineer")
            .must_have(must.iter().copied())
            .good_to_have(good.iter().copied())
            .build()
            .unwrap()
    }

    fn resume(skills: &[&str]) -> ResumeRecord {
        ResumeRecord::builder("Jane Doe")
            .technical_skills(skills.iter().copied())
            .build()
            .unwrap()
    }

    fn names(set: &BTreeSet<SkillToken>) -> Vec<&str> {
        set.iter().map(|t| t.as_str()).collect()
    }

    #[test]
    fn test_exact_and_missing_skills() {
        let matcher = HardMatcher::new(&ScoringConfig::strict());
        let result = matcher.score(
            &job(&["Python", "Django", "PostgreSQL"], &[]),
            &resume(&["Python", "Flask", "MySQL"]),
        );

        assert_eq!(names(&result.matched_must_have), vec!["python"]);
        assert_eq!(names(&result.missing_must_have), vec!["django", "postgresql"]);
        assert!(result.fuzzy_matches.is_empty());
    }

    #[test]
    fn test_lenient_preset_keeps_unrelated_skills_apart() {
        let matcher = HardMatcher::new(&ScoringConfig::lenient());
        let result = matcher.score(
            &job(&["Python", "Django", "PostgreSQL"], &[]),
            &resume(&["Python", "Flask", "MySQL"]),
        );
        assert_eq!(names(&result.matched_must_have), vec!["python"]);
    }

    #[test]
    fn test_fuzzy_match_tolerates_spelling() {
        let matcher = HardMatcher::new(&ScoringConfig::strict());
        let result = matcher.score(&job(&["Spring Boot"], &[]), &resume(&["springboot"]));

        assert_eq!(names(&result.matched_must_have), vec!["spring boot"]);
        assert_eq!(result.fuzzy_matches.len(), 1);
        assert_eq!(result.fuzzy_matches[0].candidate.as_str(), "springboot");
        assert!(result.fuzzy_matches[0].similarity >= 80.0);
    }

    #[test]
    fn test_matched_and_missing_partition_job_skills() {
        let matcher = HardMatcher::new(&ScoringConfig::strict());
        let job = job(&["Rust", "Kafka", "Redis", "gRPC"], &["Docker", "Terraform"]);
        let result = matcher.score(&job, &resume(&["rust", "redis", "docker", "leadership"]));

        assert!(result.matched_must_have.is_disjoint(&result.missing_must_have));
        let union: BTreeSet<SkillToken> = result
            .matched_must_have
            .union(&result.missing_must_have)
            .cloned()
            .collect();
        assert_eq!(union, job.must_have_skills);
        assert!(result.matched_must_have.is_subset(&job.must_have_skills));
        assert!(!result.matched_must_have.contains(&SkillToken::from("leadership")));
    }

    #[test]
    fn test_empty_good_to_have_is_vacuously_satisfied() {
        let matcher = HardMatcher::new(&ScoringConfig::strict());
        let result = matcher.score(&job(&["Python"], &[]), &resume(&["Python"]));
        assert!((result.score - 100.0).abs() < 1e-4);

        let result = matcher.score(&job(&["Python", "Go"], &[]), &resume(&["Python"]));
        // 0.4 * 0.5 + 0.2 + 0.2 + 0.2
        assert!((result.score - 80.0).abs() < 1e-3);
    }

    #[test]
    fn test_no_job_skills_scores_zero() {
        let matcher = HardMatcher::new(&ScoringConfig::strict());
        let result = matcher.score(&job(&[], &[]), &resume(&["Python"]));

        assert_eq!(result.score, 0.0);
        assert!(result.matched_must_have.is_empty());
        assert!(result.missing_must_have.is_empty());
        assert!(result.matched_good_to_have.is_empty());
    }

    #[test]
    fn test_experience_tolerance() {
        let matcher = HardMatcher::new(&ScoringConfig::strict());
        let mut job = job(&["Python"], &[]);
        job.experience_required = "3-5 years".to_string();

        let mut candidate = resume(&["Python"]);
        candidate.total_experience_years = 2.5;
        assert_eq!(matcher.score(&job, &candidate).required_years, Some(3));
        assert!(matcher.score(&job, &candidate).experience_match);

        candidate.total_experience_years = 2.0;
        assert!(!matcher.score(&job, &candidate).experience_match);

        job.experience_required = "1 year".to_string();
        candidate.total_experience_years = 0.0;
        assert!(matcher.score(&job, &candidate).experience_match);

        job.experience_required = "Not specified".to_string();
        assert!(matcher.score(&job, &candidate).experience_match);
    }

    #[test]
    fn test_qualification_requires_degree_and_technical_field() {
        let matcher = HardMatcher::new(&ScoringConfig::strict());
        let mut job = job(&["Python"], &[]);
        let mut candidate = resume(&["Python"]);

        assert!(matcher.score(&job, &candidate).qualification_match);

        job.qualifications = vec!["B.Tech in Computer Science".to_string()];
        assert!(!matcher.score(&job, &candidate).qualification_match);

        candidate.education = vec![Education {
            degree: "Diploma".to_string(),
            institution: None,
            year: None,
            field: None,
        }];
        assert!(!matcher.score(&job, &candidate).qualification_match);

        candidate.education = vec![Education {
            degree: "B.Tech".to_string(),
            institution: None,
            year: Some("2020".to_string()),
            field: Some("Computer Science".to_string()),
        }];
        assert!(matcher.score(&job, &candidate).qualification_match);
    }

    #[test]
    fn test_token_set_ratio() {
        assert_eq!(token_set_ratio("machine learning", "learning machine"), 100.0);
        assert_eq!(token_set_ratio("", "rust"), 0.0);
        assert!(token_set_ratio("django", "flask") < 50.0);
        assert!(token_set_ratio("postgresql", "mysql") < 80.0);
    }

    #[test]
    fn test_character_jaccard() {
        assert!((character_jaccard("abc", "abd") - 50.0).abs() < 1e-4);
        assert_eq!(character_jaccard("", ""), 0.0);
        assert_eq!(character_jaccard("Rust", "rust"), 100.0);
    }
}
