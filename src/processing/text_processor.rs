//! Text cleaning, tokenization and contact-pattern helpers

use regex::Regex;
use std::collections::{HashMap, HashSet};
use unicode_segmentation::UnicodeSegmentation;

pub struct TextProcessor {
    stop_words: HashSet<&'static str>,
    email_regex: Regex,
    phone_regexes: Vec<Regex>,
    cruft_line_regex: Regex,
    heading_prefix_regex: Regex,
    spaces_regex: Regex,
    blank_lines_regex: Regex,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        let email_regex = Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")
            .expect("Invalid email regex");

        // Regional formats first, then the generic grouped form.
        let phone_regexes = vec![
            Regex::new(r"\+91[-\s]?\d{10}\b").expect("Invalid phone regex"),
            Regex::new(r"\+91[-\s]?\d{5}[-\s]\d{5}\b").expect("Invalid phone regex"),
            Regex::new(r"\b\d{10}\b").expect("Invalid phone regex"),
            Regex::new(r"(?:\+?1[-. ]?)?\(?\b[0-9]{3}\)?[-. ][0-9]{3}[-. ][0-9]{4}\b")
                .expect("Invalid phone regex"),
        ];

        let cruft_line_regex = Regex::new(
            r"(?i)^(?:page\s+\d+(?:\s+of\s+\d+)?|\d{1,3}|-\s*\d{1,3}\s*-|resume|curriculum\s+vitae|cv|job\s+description)\s*:?$",
        )
        .expect("Invalid cruft regex");

        let heading_prefix_regex =
            Regex::new(r"(?i)^(?:job\s+description|resume)\s*[:\-]\s*").expect("Invalid heading regex");

        let spaces_regex = Regex::new(r"[ \t\u{00A0}]+").expect("Invalid whitespace regex");
        let blank_lines_regex = Regex::new(r"\n{3,}").expect("Invalid blank line regex");

        Self {
            stop_words: Self::create_stop_words(),
            email_regex,
            phone_regexes,
            cruft_line_regex,
            heading_prefix_regex,
            spaces_regex,
            blank_lines_regex,
        }
    }

    /// Normalize whitespace and strip extraction cruft while keeping line structure.
    pub fn clean_text(&self, text: &str) -> String {
        let normalized = self.normalize_unicode(&text.replace("\r\n", "\n").replace('\r', "\n"));

        let lines: Vec<String> = normalized
            .lines()
            .map(|line| {
                let line = self.spaces_regex.replace_all(line, " ");
                let line: String = line.chars().filter(|c| !c.is_control()).collect();
                let line = line.trim();
                self.heading_prefix_regex.replace(line, "").trim().to_string()
            })
            .filter(|line| !self.cruft_line_regex.is_match(line))
            .collect();

        let joined = lines.join("\n");
        self.blank_lines_regex
            .replace_all(&joined, "\n\n")
            .trim()
            .to_string()
    }

    /// Tokenize text into lower-cased words using Unicode segmentation, dropping stop words.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.unicode_words()
            .map(|word| word.to_lowercase())
            .filter(|word| {
                word.chars().count() > 1
                    && !self.stop_words.contains(word.as_str())
                    && word.chars().any(|c| c.is_alphabetic())
            })
            .collect()
    }

    pub fn split_sentences(&self, text: &str) -> Vec<String> {
        text.unicode_sentences()
            .flat_map(|s| s.split('\n'))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Frequency-ranked keywords; ties keep first-occurrence order.
    pub fn extract_keywords(&self, text: &str, max_keywords: usize) -> Vec<String> {
        let tokens = self.tokenize(text);
        let mut first_seen: HashMap<&str, usize> = HashMap::new();
        let mut word_freq: HashMap<&str, usize> = HashMap::new();

        for (index, token) in tokens.iter().enumerate() {
            if token.chars().count() > 2 {
                first_seen.entry(token.as_str()).or_insert(index);
                *word_freq.entry(token.as_str()).or_insert(0) += 1;
            }
        }

        let mut keywords: Vec<(&str, usize)> = word_freq.into_iter().collect();
        keywords.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| first_seen[a.0].cmp(&first_seen[b.0])));

        keywords
            .into_iter()
            .take(max_keywords)
            .map(|(word, _)| word.to_string())
            .collect()
    }

    pub fn find_email(&self, text: &str) -> Option<String> {
        self.email_regex.find(text).map(|m| m.as_str().to_string())
    }

    pub fn find_phone(&self, text: &str) -> Option<String> {
        self.phone_regexes
            .iter()
            .find_map(|re| re.find(text))
            .map(|m| m.as_str().trim().to_string())
    }

    fn normalize_unicode(&self, text: &str) -> String {
        text.chars()
            .map(|c| match c {
                '\u{2018}' | '\u{2019}' => '\'',
                '\u{201C}' | '\u{201D}' => '"',
                '\u{2013}' | '\u{2014}' => '-',
                '\u{2022}' | '\u{25CF}' | '\u{25AA}' | '\u{25E6}' | '\u{27A2}' => '•',
                '\u{2026}' => '.',
                _ => c,
            })
            .collect()
    }

    fn create_stop_words() -> HashSet<&'static str> {
        [
            "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "have", "in",
            "is", "it", "its", "of", "on", "or", "that", "the", "this", "to", "was", "were",
            "will", "with", "we", "you", "your", "our", "us", "they", "their", "them", "can",
            "should", "would", "could", "must", "may", "also", "any", "all", "not", "but", "if",
            "into", "than", "then", "these", "those", "such", "who", "what", "which", "while",
            "etc", "per", "via", "using", "used", "use", "able", "ability", "strong", "good",
            "excellent", "knowledge", "experience", "experienced", "years", "year", "yrs",
            "work", "working", "job", "role", "candidate", "candidates", "team", "required",
            "requirements", "preferred", "skills", "skill", "responsibilities", "looking",
            "plus", "including", "well", "other", "new", "across", "within", "about", "more",
            "least", "minimum", "based", "understanding", "familiarity", "hands", "apply",
        ]
        .into_iter()
        .collect()
    }
}

/// Lower-cased whitespace tokens with surrounding punctuation removed.
pub fn lexical_tokens(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(|token| {
            token
                .to_lowercase()
                .trim_matches(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
                .to_string()
        })
        .filter(|token| !token.is_empty())
        .collect()
}

/// Jaccard similarity of the lexical token sets. Empty input yields 0.
pub fn jaccard_similarity(text1: &str, text2: &str) -> f32 {
    let set1 = lexical_tokens(text1);
    let set2 = lexical_tokens(text2);

    let union = set1.union(&set2).count();
    if union == 0 {
        return 0.0;
    }
    set1.intersection(&set2).count() as f32 / union as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_strips_cruft_and_keeps_lines() {
        let processor = TextProcessor::new();
        let text = "RESUME\r\nJane   Doe\r\n\r\n\r\n\r\nSkills:\tPython\nPage 1 of 2\n2\nCurriculum Vitae";
        let cleaned = processor.clean_text(text);
        assert_eq!(cleaned, "Jane Doe\n\nSkills: Python");
    }

    #[test]
    fn test_clean_strips_job_description_label() {
        let processor = TextProcessor::new();
        let cleaned = processor.clean_text("Job Description: Backend Engineer\nWe build APIs");
        assert_eq!(cleaned, "Backend Engineer\nWe build APIs");
    }

    #[test]
    fn test_tokenization() {
        let processor = TextProcessor::new();
        let tokens = processor.tokenize("Rust programming language is awesome!");

        assert!(tokens.contains(&"rust".to_string()));
        assert!(tokens.contains(&"programming".to_string()));
        assert!(tokens.contains(&"awesome".to_string()));
        assert!(!tokens.contains(&"is".to_string()));
    }

    #[test]
    fn test_keyword_extraction_is_deterministic() {
        let processor = TextProcessor::new();
        let text = "payments platform payments ledger platform payments reconciliation";
        let keywords = processor.extract_keywords(text, 3);
        assert_eq!(keywords, vec!["payments", "platform", "ledger"]);
    }

    #[test]
    fn test_contact_patterns() {
        let processor = TextProcessor::new();
        let text = "Reach me at jane.doe@mail.com or +91 9876543210";
        assert_eq!(processor.find_email(text).as_deref(), Some("jane.doe@mail.com"));
        assert_eq!(processor.find_phone(text).as_deref(), Some("+91 9876543210"));
        assert_eq!(
            processor.find_phone("Phone: 555-123-4567").as_deref(),
            Some("555-123-4567")
        );
        assert_eq!(processor.find_phone("no digits here"), None);
    }

    #[test]
    fn test_jaccard_similarity() {
        assert_eq!(jaccard_similarity("", "anything"), 0.0);
        assert_eq!(jaccard_similarity("alpha beta", "gamma delta"), 0.0);
        assert_eq!(jaccard_similarity("Alpha, beta.", "beta alpha"), 1.0);
        let partial = jaccard_similarity("rust python go", "rust java");
        assert!((partial - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_lexical_tokens_keep_symbols() {
        let tokens = lexical_tokens("Proficient in C++, C# and node.js.");
        assert!(tokens.contains("c++"));
        assert!(tokens.contains("c#"));
        assert!(tokens.contains("node.js"));
    }
}
