//! Configuration management for the relevance engine

use crate::error::{RelevanceError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const WEIGHT_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub parsing: ParsingConfig,
    pub models: ModelConfig,
    pub processing: ProcessingConfig,
    pub output: OutputConfig,
}

/// Options consumed by the scoring core. Plain data, never read from the environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub hard_match_weight: f32,
    pub soft_match_weight: f32,
    /// Similarity (0-100) a candidate skill needs to count as a fuzzy match.
    pub fuzzy_match_threshold: f32,
    pub fuzzy_algorithm: FuzzyAlgorithm,
    pub verdict_high_threshold: f32,
    pub verdict_medium_threshold: f32,
    pub embedding_backend: EmbeddingBackend,
    pub hard_match_ceiling: f32,
    pub soft_match_ceiling: f32,
    pub hard_weights: HardMatchWeights,
    pub soft_weights: SoftMatchWeights,
    pub experience_tolerance: f32,
    pub role_alignment_floor: f32,
    pub resume_quality_floor: f32,
    pub max_suggestions: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HardMatchWeights {
    pub must_have: f32,
    pub good_to_have: f32,
    pub qualification: f32,
    pub experience: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoftMatchWeights {
    pub overall: f32,
    pub role_alignment: f32,
    pub project_relevance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuzzyAlgorithm {
    TokenSetRatio,
    CharacterJaccard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingBackend {
    Model,
    Lexical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPreset {
    Strict,
    Lenient,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsingConfig {
    pub min_resume_chars: usize,
    pub must_have_fallback_limit: usize,
    pub max_projects: usize,
    pub max_project_technologies: usize,
    pub max_responsibilities: usize,
    pub max_domain_keywords: usize,
    pub max_file_size_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    pub embedding_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    pub batch_concurrency: usize,
    pub enable_caching: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for HardMatchWeights {
    fn default() -> Self {
        Self {
            must_have: 0.4,
            good_to_have: 0.2,
            qualification: 0.2,
            experience: 0.2,
        }
    }
}

impl HardMatchWeights {
    pub fn total(&self) -> f32 {
        self.must_have + self.good_to_have + self.qualification + self.experience
    }
}

impl Default for SoftMatchWeights {
    fn default() -> Self {
        Self {
            overall: 0.5,
            role_alignment: 0.3,
            project_relevance: 0.2,
        }
    }
}

impl SoftMatchWeights {
    pub fn total(&self) -> f32 {
        self.overall + self.role_alignment + self.project_relevance
    }
}

impl ScoringConfig {
    /// Tight thresholds and token-set-ratio fuzzy matching.
    pub fn strict() -> Self {
        Self {
            hard_match_weight: 0.6,
            soft_match_weight: 0.4,
            fuzzy_match_threshold: 80.0,
            fuzzy_algorithm: FuzzyAlgorithm::TokenSetRatio,
            verdict_high_threshold: 75.0,
            verdict_medium_threshold: 50.0,
            embedding_backend: EmbeddingBackend::Model,
            hard_match_ceiling: 100.0,
            soft_match_ceiling: 100.0,
            hard_weights: HardMatchWeights::default(),
            soft_weights: SoftMatchWeights::default(),
            experience_tolerance: 0.8,
            role_alignment_floor: 0.3,
            resume_quality_floor: 7.0,
            max_suggestions: 5,
        }
    }

    /// Relaxed verdict thresholds and character-level fuzzy matching.
    pub fn lenient() -> Self {
        Self {
            fuzzy_match_threshold: 50.0,
            fuzzy_algorithm: FuzzyAlgorithm::CharacterJaccard,
            verdict_high_threshold: 70.0,
            verdict_medium_threshold: 45.0,
            ..Self::strict()
        }
    }

    pub fn from_preset(preset: ScoringPreset) -> Self {
        match preset {
            ScoringPreset::Strict => Self::strict(),
            ScoringPreset::Lenient => Self::lenient(),
        }
    }

    pub fn with_backend(mut self, backend: EmbeddingBackend) -> Self {
        self.embedding_backend = backend;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let numbers = [
            ("hard_match_weight", self.hard_match_weight),
            ("soft_match_weight", self.soft_match_weight),
            ("fuzzy_match_threshold", self.fuzzy_match_threshold),
            ("verdict_high_threshold", self.verdict_high_threshold),
            ("verdict_medium_threshold", self.verdict_medium_threshold),
            ("hard_match_ceiling", self.hard_match_ceiling),
            ("soft_match_ceiling", self.soft_match_ceiling),
            ("hard_weights.must_have", self.hard_weights.must_have),
            ("hard_weights.good_to_have", self.hard_weights.good_to_have),
            ("hard_weights.qualification", self.hard_weights.qualification),
            ("hard_weights.experience", self.hard_weights.experience),
            ("soft_weights.overall", self.soft_weights.overall),
            ("soft_weights.role_alignment", self.soft_weights.role_alignment),
            ("soft_weights.project_relevance", self.soft_weights.project_relevance),
            ("experience_tolerance", self.experience_tolerance),
            ("role_alignment_floor", self.role_alignment_floor),
            ("resume_quality_floor", self.resume_quality_floor),
        ];
        if let Some((name, value)) = numbers.iter().find(|(_, value)| !value.is_finite()) {
            return Err(RelevanceError::Configuration(format!(
                "{} must be a finite number, got {}",
                name, value
            )));
        }

        let weight_sum = self.hard_match_weight + self.soft_match_weight;
        if self.hard_match_weight < 0.0
            || self.soft_match_weight < 0.0
            || (weight_sum - 1.0).abs() > WEIGHT_EPSILON
        {
            return Err(RelevanceError::Configuration(format!(
                "hard_match_weight + soft_match_weight must equal 1.0, got {:.4}",
                weight_sum
            )));
        }

        if (self.hard_weights.total() - 1.0).abs() > WEIGHT_EPSILON {
            return Err(RelevanceError::Configuration(format!(
                "hard match sub-weights must sum to 1.0, got {:.4}",
                self.hard_weights.total()
            )));
        }

        if (self.soft_weights.total() - 1.0).abs() > WEIGHT_EPSILON {
            return Err(RelevanceError::Configuration(format!(
                "soft match sub-weights must sum to 1.0, got {:.4}",
                self.soft_weights.total()
            )));
        }

        if !(0.0..=100.0).contains(&self.fuzzy_match_threshold) {
            return Err(RelevanceError::Configuration(format!(
                "fuzzy_match_threshold must be within 0-100, got {}",
                self.fuzzy_match_threshold
            )));
        }

        let high = self.verdict_high_threshold;
        let medium = self.verdict_medium_threshold;
        if !(0.0..=100.0).contains(&high) || !(0.0..=100.0).contains(&medium) || medium > high {
            return Err(RelevanceError::Configuration(format!(
                "verdict thresholds must satisfy 0 <= medium ({}) <= high ({}) <= 100",
                medium, high
            )));
        }

        if self.hard_match_ceiling <= 0.0 || self.soft_match_ceiling <= 0.0 {
            return Err(RelevanceError::Configuration(
                "score ceilings must be positive".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.experience_tolerance) {
            return Err(RelevanceError::Configuration(format!(
                "experience_tolerance must be within 0-1, got {}",
                self.experience_tolerance
            )));
        }

        Ok(())
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::strict()
    }
}

impl fmt::Display for ScoringPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringPreset::Strict => write!(f, "strict"),
            ScoringPreset::Lenient => write!(f, "lenient"),
        }
    }
}

impl FromStr for ScoringPreset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(ScoringPreset::Strict),
            "lenient" => Ok(ScoringPreset::Lenient),
            _ => Err(format!("Invalid preset: {}. Supported: strict, lenient", s)),
        }
    }
}

impl fmt::Display for EmbeddingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbeddingBackend::Model => write!(f, "model"),
            EmbeddingBackend::Lexical => write!(f, "lexical"),
        }
    }
}

impl FromStr for EmbeddingBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "model" | "embedding" => Ok(EmbeddingBackend::Model),
            "lexical" | "jaccard" => Ok(EmbeddingBackend::Lexical),
            _ => Err(format!("Invalid backend: {}. Supported: model, lexical", s)),
        }
    }
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            min_resume_chars: 100,
            must_have_fallback_limit: 10,
            max_projects: 5,
            max_project_technologies: 5,
            max_responsibilities: 8,
            max_domain_keywords: 20,
            max_file_size_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-relevance")
            .join("models");

        Self {
            scoring: ScoringConfig::strict(),
            parsing: ParsingConfig::default(),
            models: ModelConfig {
                models_dir,
                embedding_model: "minishlab/potion-base-8M".to_string(),
            },
            processing: ProcessingConfig {
                batch_concurrency: 4,
                enable_caching: true,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load from an explicit path, writing defaults there if nothing exists yet.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content).map_err(|e| {
                RelevanceError::Configuration(format!("Failed to parse config: {}", e))
            })?;
            config.scoring.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            RelevanceError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-relevance")
            .join("config.toml")
    }

    /// Resolve the embedding model to a local directory when one exists, else the hub id.
    pub fn embedding_model_location(&self) -> String {
        let local_path = self.models.models_dir.join(&self.models.embedding_model);
        if local_path.exists() {
            local_path.to_string_lossy().to_string()
        } else {
            self.models.embedding_model.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(ScoringConfig::strict().validate().is_ok());
        assert!(ScoringConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_preset_thresholds() {
        let strict = ScoringConfig::strict();
        assert_eq!(strict.verdict_high_threshold, 75.0);
        assert_eq!(strict.verdict_medium_threshold, 50.0);
        assert_eq!(strict.fuzzy_match_threshold, 80.0);

        let lenient = ScoringConfig::lenient();
        assert_eq!(lenient.verdict_high_threshold, 70.0);
        assert_eq!(lenient.verdict_medium_threshold, 45.0);
        assert_eq!(lenient.fuzzy_match_threshold, 50.0);
        assert!(matches!(lenient.fuzzy_algorithm, FuzzyAlgorithm::CharacterJaccard));
    }

    #[test]
    fn test_default_is_strict() {
        assert_eq!(ScoringConfig::default(), ScoringConfig::strict());
    }

    #[test]
    fn test_rejects_unbalanced_weights() {
        let config = ScoringConfig {
            hard_match_weight: 0.7,
            soft_match_weight: 0.4,
            ..ScoringConfig::strict()
        };
        assert!(matches!(config.validate(), Err(RelevanceError::Configuration(_))));
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let config = ScoringConfig {
            verdict_high_threshold: 40.0,
            verdict_medium_threshold: 60.0,
            ..ScoringConfig::strict()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_sub_weights() {
        let mut config = ScoringConfig::strict();
        config.hard_weights.must_have = 0.9;
        assert!(config.validate().is_err());

        let mut config = ScoringConfig::strict();
        config.soft_weights.overall = 0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_finite_numbers() {
        let mut config = ScoringConfig::strict();
        config.hard_match_weight = f32::NAN;
        assert!(matches!(config.validate(), Err(RelevanceError::Configuration(_))));

        let mut config = ScoringConfig::strict();
        config.soft_match_ceiling = f32::INFINITY;
        assert!(config.validate().is_err());

        let mut config = ScoringConfig::strict();
        config.role_alignment_floor = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_rejects_nan_weight() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let mut config = Config::default();
        config.scoring.hard_match_weight = f32::NAN;
        config.save_to(&path).unwrap();

        assert!(matches!(Config::load_from(&path), Err(RelevanceError::Configuration(_))));
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!("Strict".parse::<ScoringPreset>().unwrap(), ScoringPreset::Strict);
        assert_eq!("lenient".parse::<ScoringPreset>().unwrap(), ScoringPreset::Lenient);
        assert!("loose".parse::<ScoringPreset>().is_err());
        assert_eq!("lexical".parse::<EmbeddingBackend>().unwrap(), EmbeddingBackend::Lexical);
    }

    #[test]
    fn test_config_toml_roundtrip_keeps_scoring() {
        let config = Config::default();
        let content = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&content).unwrap();
        assert_eq!(parsed.scoring, config.scoring);
        assert_eq!(parsed.parsing.min_resume_chars, 100);
    }
}
