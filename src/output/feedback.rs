//! Candidate-facing feedback text

use crate::processing::engine::{FitVerdict, RelevanceResult};

/// Template-based feedback. Identical inputs always produce identical text.
#[derive(Debug, Clone, Copy)]
pub struct FeedbackGenerator {
    /// Scores below this get the "build key skills" recommendation.
    develop_below: f32,
    /// Scores below this (and not below `develop_below`) get the "on track" recommendation.
    apply_from: f32,
}

impl Default for FeedbackGenerator {
    fn default() -> Self {
        Self {
            develop_below: 45.0,
            apply_from: 70.0,
        }
    }
}

impl FeedbackGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bands(develop_below: f32, apply_from: f32) -> Self {
        Self {
            develop_below,
            apply_from: apply_from.max(develop_below),
        }
    }

    pub fn generate<S: AsRef<str>>(
        &self,
        relevance: f32,
        matched_skills: &[S],
        missing_skills: &[S],
        verdict: FitVerdict,
    ) -> String {
        let mut parts = Vec::new();

        parts.push(match verdict {
            FitVerdict::High => "🎉 Excellent match! Your profile aligns very well with the job requirements.".to_string(),
            FitVerdict::Medium => "👍 Good match! Your profile has strong potential for this role.".to_string(),
            FitVerdict::Low => "💡 Your profile shows promise, but there are areas for improvement.".to_string(),
        });

        if !matched_skills.is_empty() {
            let mut matched = join(&matched_skills[..matched_skills.len().min(5)]);
            if matched_skills.len() > 5 {
                matched.push_str(&format!(" and {} more", matched_skills.len() - 5));
            }
            parts.push(format!("✅ Strong skills match: {}", matched));
        }

        if !missing_skills.is_empty() {
            parts.push(format!(
                "🎯 Consider developing: {}",
                join(&missing_skills[..missing_skills.len().min(3)])
            ));

            if missing_skills.len() > 3 {
                parts.push(format!(
                    "📚 Additional skills to explore: {}",
                    join(&missing_skills[3..missing_skills.len().min(6)])
                ));
            }
        }

        parts.push(if relevance < self.develop_below {
            "💼 Recommendation: Focus on building the key skills mentioned above and gain relevant project experience."
                .to_string()
        } else if relevance < self.apply_from {
            "🚀 Recommendation: You're on the right track! Consider specializing in a few key areas and showcasing relevant projects."
                .to_string()
        } else {
            "⭐ Recommendation: Great profile! Consider applying and highlighting your strongest skills in your application."
                .to_string()
        });

        parts.join(" ")
    }

    /// Feedback for a finished evaluation, using its must-have skill lists.
    pub fn generate_for(&self, result: &RelevanceResult) -> String {
        let matched: Vec<&str> = result.hard.matched_must_have.iter().map(|s| s.as_str()).collect();
        let missing: Vec<&str> = result.hard.missing_must_have.iter().map(|s| s.as_str()).collect();
        self.generate(result.relevance_score, &matched, &missing, result.verdict)
    }
}

fn join<S: AsRef<str>>(items: &[S]) -> String {
    items.iter().map(|s| s.as_ref()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_verdict_feedback() {
        let feedback = FeedbackGenerator::new().generate(
            82.0,
            &["python", "django"],
            &[],
            FitVerdict::High,
        );
        assert!(feedback.starts_with("🎉 Excellent match!"));
        assert!(feedback.contains("Strong skills match: python, django"));
        assert!(!feedback.contains("Consider developing"));
        assert!(feedback.contains("Great profile!"));
    }

    #[test]
    fn test_skill_lists_are_truncated() {
        let matched = ["a", "b", "c", "d", "e", "f", "g"];
        let missing = ["m1", "m2", "m3", "m4", "m5", "m6", "m7"];
        let feedback = FeedbackGenerator::new().generate(30.0, &matched, &missing, FitVerdict::Low);

        assert!(feedback.contains("Strong skills match: a, b, c, d, e and 2 more"));
        assert!(feedback.contains("Consider developing: m1, m2, m3"));
        assert!(feedback.contains("Additional skills to explore: m4, m5, m6"));
        assert!(!feedback.contains("m7"));
        assert!(feedback.contains("Focus on building the key skills"));
    }

    #[test]
    fn test_score_bands() {
        let generator = FeedbackGenerator::new();
        let empty: [&str; 0] = [];
        assert!(generator.generate(44.9, &empty, &empty, FitVerdict::Low).contains("Focus on building"));
        assert!(generator.generate(45.0, &empty, &empty, FitVerdict::Low).contains("right track"));
        assert!(generator.generate(69.9, &empty, &empty, FitVerdict::Medium).contains("right track"));
        assert!(generator.generate(70.0, &empty, &empty, FitVerdict::Medium).contains("Great profile"));

        let strict = FeedbackGenerator::with_bands(50.0, 75.0);
        assert!(strict.generate(70.0, &empty, &empty, FitVerdict::Medium).contains("right track"));
    }

    #[test]
    fn test_feedback_is_deterministic() {
        let generator = FeedbackGenerator::new();
        let first = generator.generate(55.0, &["rust"], &["go", "java"], FitVerdict::Medium);
        let second = generator.generate(55.0, &["rust"], &["go", "java"], FitVerdict::Medium);
        assert_eq!(first, second);
        assert!(first.starts_with("👍 Good match!"));
    }
}
