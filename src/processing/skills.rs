//! Skill dictionary loaded from a versioned data asset, with word-bounded multi-pattern search

use crate::error::{RelevanceError, Result};
use crate::processing::normalizer::{SkillNormalizer, SkillToken};
use aho_corasick::{AhoCorasick, MatchKind};
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::OnceLock;

const EMBEDDED_DICTIONARY: &str = include_str!("skills.toml");

#[derive(Debug, Deserialize)]
struct DictionaryData {
    version: u32,
    technical: BTreeMap<String, Vec<String>>,
    soft: SoftData,
    #[serde(default)]
    aliases: HashMap<String, String>,
    #[serde(default)]
    matching: MatchingData,
    education: EducationVocabulary,
    gazetteer: Gazetteer,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct SoftData {
    skills: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MatchingData {
    #[serde(default)]
    prose_excluded: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EducationVocabulary {
    pub degree_levels: Vec<String>,
    pub technical_fields: Vec<String>,
    pub fields: Vec<String>,
    pub institution_markers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Gazetteer {
    pub cities: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Indicators {
    pub project: Vec<String>,
    pub achievement: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillKind {
    Technical,
    Soft,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillHit {
    pub token: SkillToken,
    pub kind: SkillKind,
}

pub struct SkillDictionary {
    version: u32,
    normalizer: SkillNormalizer,
    categories: BTreeMap<String, Vec<SkillToken>>,
    technical: HashSet<SkillToken>,
    soft: HashSet<SkillToken>,
    matcher: AhoCorasick,
    surface_forms: Vec<SkillToken>,
    pub education: EducationVocabulary,
    pub gazetteer: Gazetteer,
    pub indicators: Indicators,
}

impl SkillDictionary {
    /// The dictionary compiled into the binary. Read-only after first use.
    pub fn embedded() -> &'static SkillDictionary {
        static DICTIONARY: OnceLock<SkillDictionary> = OnceLock::new();
        DICTIONARY.get_or_init(|| {
            SkillDictionary::from_toml(EMBEDDED_DICTIONARY)
                .expect("Embedded skill dictionary is invalid")
        })
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let data: DictionaryData = toml::from_str(content).map_err(|e| {
            RelevanceError::Configuration(format!("Failed to parse skill dictionary: {}", e))
        })?;
        Self::from_data(data)
    }

    fn from_data(data: DictionaryData) -> Result<Self> {
        let normalizer = SkillNormalizer::new(data.aliases.clone());

        let mut categories = BTreeMap::new();
        let mut technical = HashSet::new();
        for (category, terms) in data.technical {
            let tokens: Vec<SkillToken> = terms.iter().map(|t| normalizer.normalize(t)).collect();
            technical.extend(tokens.iter().cloned());
            categories.insert(category, tokens);
        }

        let soft: HashSet<SkillToken> = data
            .soft
            .skills
            .iter()
            .map(|t| normalizer.normalize(t))
            .collect();

        let excluded: HashSet<String> = data
            .matching
            .prose_excluded
            .iter()
            .map(|t| t.trim().to_lowercase())
            .collect();

        // Surface patterns are canonical terms plus alias spellings; each maps to its canonical token.
        let mut surface: Vec<(String, SkillToken)> = Vec::new();
        for token in technical.iter().chain(soft.iter()) {
            surface.push((token.as_str().to_string(), token.clone()));
        }
        for (from, _) in data.aliases.iter() {
            surface.push((from.trim().to_lowercase(), normalizer.normalize(from)));
        }
        surface.retain(|(pattern, _)| !pattern.is_empty() && !excluded.contains(pattern));
        surface.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        surface.dedup_by(|a, b| a.0 == b.0);

        let patterns: Vec<&str> = surface.iter().map(|(p, _)| p.as_str()).collect();
        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(&patterns)
            .map_err(|e| {
                RelevanceError::Processing(format!("Failed to build skill matcher: {}", e))
            })?;

        Ok(Self {
            version: data.version,
            normalizer,
            categories,
            technical,
            soft,
            matcher,
            surface_forms: surface.into_iter().map(|(_, token)| token).collect(),
            education: data.education,
            gazetteer: data.gazetteer,
            indicators: data.indicators,
        })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn normalizer(&self) -> &SkillNormalizer {
        &self.normalizer
    }

    pub fn normalize(&self, raw: &str) -> SkillToken {
        self.normalizer.normalize(raw)
    }

    pub fn is_technical(&self, token: &SkillToken) -> bool {
        self.technical.contains(token)
    }

    pub fn is_soft(&self, token: &SkillToken) -> bool {
        self.soft.contains(token)
    }

    pub fn category_of(&self, token: &SkillToken) -> Option<&str> {
        self.categories
            .iter()
            .find(|(_, tokens)| tokens.contains(token))
            .map(|(category, _)| category.as_str())
    }

    pub fn skill_count(&self) -> usize {
        self.technical.len() + self.soft.len()
    }

    /// Every dictionary skill mentioned in `text`, in order of first appearance.
    pub fn find_skills(&self, text: &str) -> Vec<SkillHit> {
        let bytes = text.as_bytes();
        let mut seen = HashSet::new();
        let mut hits = Vec::new();

        for mat in self.matcher.find_iter(text) {
            if !is_word_boundary(bytes, mat.start(), mat.end()) {
                continue;
            }
            let token = &self.surface_forms[mat.pattern().as_usize()];
            if !seen.insert(token.clone()) {
                continue;
            }
            let kind = if self.technical.contains(token) {
                SkillKind::Technical
            } else {
                SkillKind::Soft
            };
            hits.push(SkillHit {
                token: token.clone(),
                kind,
            });
        }

        hits
    }

    pub fn technical_skills_in(&self, text: &str) -> Vec<SkillToken> {
        self.find_skills(text)
            .into_iter()
            .filter(|hit| hit.kind == SkillKind::Technical)
            .map(|hit| hit.token)
            .collect()
    }

    pub fn soft_skills_in(&self, text: &str) -> Vec<SkillToken> {
        self.find_skills(text)
            .into_iter()
            .filter(|hit| hit.kind == SkillKind::Soft)
            .map(|hit| hit.token)
            .collect()
    }

    /// First gazetteer city named in `text`, title-cased.
    pub fn find_city(&self, text: &str) -> Option<String> {
        let lowered = text.to_lowercase();
        let bytes = lowered.as_bytes();
        self.gazetteer
            .cities
            .iter()
            .filter_map(|city| {
                lowered
                    .match_indices(city.as_str())
                    .find(|(start, _)| is_word_boundary(bytes, *start, start + city.len()))
                    .map(|(start, _)| (start, city))
            })
            .min_by_key(|(start, city)| (*start, usize::MAX - city.len()))
            .map(|(_, city)| title_case(city))
    }
}

/// Split a free-form list ("Python, Django and REST APIs; Git") into trimmed items.
pub fn split_list_items(text: &str) -> Vec<String> {
    static SPLIT_RE: OnceLock<Regex> = OnceLock::new();
    let split_re = SPLIT_RE.get_or_init(|| {
        Regex::new(r"(?i)[,;|•·\n\t]|\s+(?:and|or)\s+|\s+[-–]\s+").expect("Invalid list split regex")
    });

    split_re
        .split(text)
        .map(|item| {
            // "Languages: Python" keeps only the value side.
            let value = match item.rsplit_once(':') {
                Some((_, rest)) => rest,
                None => item,
            };
            value
                .trim()
                .trim_start_matches(|c: char| c == '-' || c == '*' || c.is_whitespace())
                .trim()
                .to_string()
        })
        .filter(|item| !item.is_empty())
        .collect()
}

const FILLER_WORDS: &[&str] = &[
    "a", "an", "the", "in", "of", "on", "to", "for", "with", "using", "experience",
    "knowledge", "years", "year", "ability", "understanding", "strong", "proficiency",
    "proficient", "familiarity", "familiar", "working", "good", "excellent", "hands-on",
    "plus", "required", "preferred",
];

/// Whether a list item plausibly names a skill rather than a sentence fragment.
pub fn looks_like_skill(item: &str) -> bool {
    let words: Vec<String> = item.split_whitespace().map(|w| w.to_lowercase()).collect();
    let chars = item.chars().count();
    (1..=3).contains(&words.len())
        && (2..=40).contains(&chars)
        && item.chars().any(|c| c.is_alphabetic())
        && !item.chars().any(|c| c.is_ascii_digit() && words.len() > 1)
        && !words.iter().any(|w| FILLER_WORDS.contains(&w.as_str()))
}

pub(crate) fn is_word_boundary(bytes: &[u8], start: usize, end: usize) -> bool {
    let before_ok = start == 0 || !bytes[start - 1].is_ascii_alphanumeric();
    let after_ok = end >= bytes.len() || !bytes[end].is_ascii_alphanumeric();
    before_ok && after_ok
}

/// Word-bounded containment on already lower-cased text.
pub(crate) fn contains_word(haystack: &str, needle: &str) -> bool {
    let bytes = haystack.as_bytes();
    haystack
        .match_indices(needle)
        .any(|(start, _)| is_word_boundary(bytes, start, start + needle.len()))
}

pub(crate) fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
