//! Skill normalization: lower-casing, trimming and alias resolution

use crate::processing::skills::SkillDictionary;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Alias chains longer than this are treated as cycles and cut short.
const MAX_ALIAS_HOPS: usize = 4;

const LEADING_NOISE: &[char] = &[
    ',', ';', ':', '!', '?', '(', ')', '[', ']', '{', '}', '"', '\'', '•', '*', '-', '·',
];
const TRAILING_NOISE: &[char] = &[
    '.', ',', ';', ':', '!', '?', '(', ')', '[', ']', '{', '}', '"', '\'', '•', '*', '·',
];

/// A normalized skill string. Only constructed through normalization.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SkillToken(String);

impl SkillToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SkillToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SkillToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for SkillToken {
    fn from(raw: String) -> Self {
        normalize(&raw)
    }
}

impl From<&str> for SkillToken {
    fn from(raw: &str) -> Self {
        normalize(raw)
    }
}

impl From<SkillToken> for String {
    fn from(token: SkillToken) -> Self {
        token.0
    }
}

/// Applies the alias table after canonical cleaning.
#[derive(Debug, Clone, Default)]
pub struct SkillNormalizer {
    aliases: HashMap<String, String>,
}

impl SkillNormalizer {
    pub fn new(aliases: HashMap<String, String>) -> Self {
        let aliases = aliases
            .into_iter()
            .map(|(from, to)| (clean(&from), clean(&to)))
            .filter(|(from, to)| !from.is_empty() && !to.is_empty() && from != to)
            .collect();
        Self { aliases }
    }

    pub fn normalize(&self, raw: &str) -> SkillToken {
        let mut current = clean(raw);
        for _ in 0..MAX_ALIAS_HOPS {
            match self.aliases.get(&current) {
                Some(target) if *target != current => current = target.clone(),
                _ => break,
            }
        }
        SkillToken(current)
    }

    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Normalize with the built-in alias table.
pub fn normalize(raw: &str) -> SkillToken {
    SkillDictionary::embedded().normalizer().normalize(raw)
}

fn clean(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_start_matches(|c: char| c.is_whitespace() || LEADING_NOISE.contains(&c))
        .trim_end_matches(|c: char| c.is_whitespace() || TRAILING_NOISE.contains(&c))
        .to_string()
}
