//! Job-description parsing into a [`JobRecord`]

use crate::config::ParsingConfig;
use crate::error::{RelevanceError, Result};
use crate::processing::normalizer::SkillToken;
use crate::processing::records::JobRecord;
use crate::processing::sections::{DocumentSections, SectionKind, SectionScanner};
use crate::processing::skills::{contains_word, looks_like_skill, split_list_items, SkillDictionary};
use crate::processing::text_processor::TextProcessor;
use log::{debug, info};
use regex::Regex;

const DEFAULT_ROLE_TITLE: &str = "Software Engineer";
const NOT_SPECIFIED: &str = "Not specified";

/// Opening verbs of responsibility sentences when no responsibilities section exists.
const DUTY_VERBS: &[&str] = &[
    "build", "design", "develop", "implement", "maintain", "collaborate", "own", "lead",
    "write", "deploy", "optimize", "mentor", "manage", "create", "work", "drive", "ensure",
];

pub struct JobParser {
    dictionary: &'static SkillDictionary,
    processor: TextProcessor,
    scanner: SectionScanner,
    config: ParsingConfig,
    experience_range_regex: Regex,
    experience_min_regex: Regex,
    experience_single_regex: Regex,
    role_label_regex: Regex,
    role_hiring_regex: Regex,
    role_line_regex: Regex,
    company_regex: Regex,
    location_regex: Regex,
    salary_regexes: Vec<Regex>,
    bullet_prefix_regex: Regex,
}

impl Default for JobParser {
    fn default() -> Self {
        Self::new()
    }
}

impl JobParser {
    pub fn new() -> Self {
        Self::with_config(ParsingConfig::default())
    }

    pub fn with_config(config: ParsingConfig) -> Self {
        let role_nouns = r"(?:engineer|developer|analyst|manager|scientist|architect|designer|consultant|intern|administrator|tester)s?";

        Self {
            dictionary: SkillDictionary::embedded(),
            processor: TextProcessor::new(),
            scanner: SectionScanner::new(),
            config,
            experience_range_regex: Regex::new(
                r"(?i)(\d+)\s*\+?\s*(?:-|to)\s*(\d+)\s*\+?\s*(?:years?|yrs?)\b",
            )
            .expect("Invalid experience range regex"),
            experience_min_regex: Regex::new(
                r"(?i)(?:minimum|min\.?|at\s*least)\s*(?:of\s*)?(\d+)\s*\+?\s*(?:years?|yrs?)\b",
            )
            .expect("Invalid experience minimum regex"),
            experience_single_regex: Regex::new(r"(?i)(\d+)\s*\+?\s*(?:years?|yrs?)\b")
                .expect("Invalid experience regex"),
            role_label_regex: Regex::new(r"(?im)^(?:role|position|job\s+title|title)\s*:\s*(.+)$")
                .expect("Invalid role label regex"),
            role_hiring_regex: Regex::new(&format!(
                r"(?i)hiring\s+(?:for\s+)?(?:an?\s+)?((?:[\w+#./-]+\s+){{0,4}}{})\b",
                role_nouns
            ))
            .expect("Invalid hiring regex"),
            role_line_regex: Regex::new(&format!(
                r"(?i)^\s*((?:[\w+#./-]+\s+){{0,4}}{})\b",
                role_nouns
            ))
            .expect("Invalid role line regex"),
            company_regex: Regex::new(r"(?im)^(?:company|organi[sz]ation|employer)(?:\s+name)?\s*:\s*(.+)$")
                .expect("Invalid company regex"),
            location_regex: Regex::new(r"(?im)^(?:job\s+|work\s+)?location\s*:\s*(.+)$")
                .expect("Invalid location regex"),
            salary_regexes: vec![
                Regex::new(r"(?im)^(?:salary|package|compensation|ctc)(?:\s+range)?\s*:\s*(.+)$")
                    .expect("Invalid salary regex"),
                Regex::new(r"\$\s*\d[\d,]*(?:\.\d+)?\s*[kK]?\s*(?:-|to)\s*\$\s*\d[\d,]*(?:\.\d+)?\s*[kK]?")
                    .expect("Invalid salary regex"),
                Regex::new(
                    r"(?i)(?:₹\s*)?\d+(?:\.\d+)?\s*(?:lpa|lakhs?|k)?\s*(?:-|to)\s*(?:₹\s*)?\d+(?:\.\d+)?\s*(?:lpa|lakhs?|k|thousand)\b",
                )
                .expect("Invalid salary regex"),
            ],
            bullet_prefix_regex: Regex::new(r"^(?:[•*\-]+|\d+[.)])\s*").expect("Invalid bullet regex"),
        }
    }

    /// Parse raw job-description text. Explicit `role_title` and `company` win over extracted ones.
    pub fn parse(&self, text: &str, role_title: Option<&str>, company: Option<&str>) -> Result<JobRecord> {
        let cleaned = self.processor.clean_text(text);
        if cleaned.is_empty() {
            return Err(RelevanceError::Extraction(
                "job description contains no text".to_string(),
            ));
        }

        let sections = self.scanner.scan(&cleaned);
        debug!(
            "Job description sections: {:?}",
            sections.kinds().collect::<Vec<_>>()
        );

        let technical_skills = self.dictionary.technical_skills_in(&cleaned);
        let soft_skills = self.dictionary.soft_skills_in(&cleaned);

        let good_to_have = sections
            .get(SectionKind::GoodToHave)
            .map(|span| self.skills_in_list(span))
            .unwrap_or_default();

        let mut must_have = sections
            .get(SectionKind::MustHave)
            .map(|span| self.skills_in_list(span))
            .unwrap_or_default();

        if must_have.is_empty() {
            must_have = technical_skills
                .iter()
                .filter(|skill| !good_to_have.contains(skill))
                .take(self.config.must_have_fallback_limit)
                .cloned()
                .collect();
            info!(
                "No must-have section found; using the first {} technical skills as must-have",
                must_have.len()
            );
        }

        let role_title = role_title
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.extract_role_title(&cleaned));

        let company = company
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .or_else(|| self.capture_line(&self.company_regex, &cleaned))
            .unwrap_or_default();

        let location = self
            .capture_line(&self.location_regex, &cleaned)
            .or_else(|| self.dictionary.find_city(&cleaned));

        let record = JobRecord::builder(role_title)
            .company(company)
            .location(location)
            .must_have(must_have)
            .good_to_have(good_to_have)
            .technical_skills(technical_skills)
            .soft_skills(soft_skills)
            .qualifications(self.extract_qualifications(&cleaned, &sections))
            .experience_required(self.extract_experience_requirement(&cleaned))
            .responsibilities(self.extract_responsibilities(&cleaned, &sections))
            .domain_keywords(
                self.processor
                    .extract_keywords(&cleaned, self.config.max_domain_keywords),
            )
            .salary_range(self.extract_salary_range(&cleaned))
            .description(cleaned)
            .build()?;

        info!(
            "Parsed job '{}': {} must-have, {} good-to-have skills",
            record.role_title,
            record.must_have_skills.len(),
            record.good_to_have_skills.len()
        );
        Ok(record)
    }

    /// Skills named in a free-form list, in order. Dictionary hits win over raw items.
    fn skills_in_list(&self, span: &str) -> Vec<SkillToken> {
        let mut skills: Vec<SkillToken> = Vec::new();

        for item in split_list_items(span) {
            let hits = self.dictionary.find_skills(&item);
            let found: Vec<SkillToken> = if hits.is_empty() {
                if looks_like_skill(&item) {
                    vec![self.dictionary.normalize(&item)]
                } else {
                    Vec::new()
                }
            } else {
                hits.into_iter().map(|hit| hit.token).collect()
            };

            for skill in found {
                if !skill.is_empty() && !skills.contains(&skill) {
                    skills.push(skill);
                }
            }
        }

        skills
    }

    fn extract_experience_requirement(&self, text: &str) -> String {
        if let Some(caps) = self.experience_range_regex.captures(text) {
            return format!("{}-{} years", &caps[1], &caps[2]);
        }
        for regex in [&self.experience_min_regex, &self.experience_single_regex] {
            if let Some(caps) = regex.captures(text) {
                return format!("{} years", &caps[1]);
            }
        }
        NOT_SPECIFIED.to_string()
    }

    fn extract_qualifications(&self, text: &str, sections: &DocumentSections) -> Vec<String> {
        let mut qualifications: Vec<String> = Vec::new();

        if let Some(span) = sections.get(SectionKind::Qualifications) {
            for line in span.split(['\n', '•']) {
                let item = self.strip_bullet(line);
                if !item.is_empty() {
                    qualifications.push(item);
                }
            }
        }

        let degree_levels = &self.dictionary.education.degree_levels;
        for sentence in self.processor.split_sentences(text) {
            let lowered = sentence.to_lowercase();
            let names_degree = degree_levels
                .iter()
                .any(|degree| contains_word(&lowered, degree));
            if names_degree || lowered.contains("certif") {
                let item = self.strip_bullet(&sentence);
                if !item.is_empty() && item.len() <= 200 && !qualifications.contains(&item) {
                    qualifications.push(item);
                }
            }
        }

        qualifications
    }

    fn extract_responsibilities(&self, text: &str, sections: &DocumentSections) -> Vec<String> {
        let limit = self.config.max_responsibilities;

        if let Some(span) = sections.get(SectionKind::Responsibilities) {
            let items: Vec<String> = span
                .split(['\n', '•'])
                .flat_map(|line| self.processor.split_sentences(line))
                .map(|line| self.strip_bullet(&line))
                .filter(|line| line.len() > 3)
                .take(limit)
                .collect();
            if !items.is_empty() {
                return items;
            }
        }

        self.processor
            .split_sentences(text)
            .into_iter()
            .map(|sentence| self.strip_bullet(&sentence))
            .filter(|sentence| {
                let lowered = sentence.to_lowercase();
                let first = lowered.split_whitespace().next().unwrap_or("");
                lowered.starts_with("you will") || lowered.starts_with("you'll") || DUTY_VERBS.contains(&first)
            })
            .take(limit)
            .collect()
    }

    fn extract_role_title(&self, text: &str) -> String {
        if let Some(title) = self.capture_line(&self.role_label_regex, text) {
            return title;
        }
        if let Some(caps) = self.role_hiring_regex.captures(text) {
            return caps[1].trim().to_string();
        }
        let first_line = text.lines().find(|line| !line.trim().is_empty()).unwrap_or("");
        if let Some(caps) = self.role_line_regex.captures(first_line) {
            return caps[1].trim().to_string();
        }
        DEFAULT_ROLE_TITLE.to_string()
    }

    fn extract_salary_range(&self, text: &str) -> Option<String> {
        self.salary_regexes.iter().find_map(|regex| {
            regex.captures(text).map(|caps| {
                caps.get(1)
                    .or_else(|| caps.get(0))
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default()
            })
        })
    }

    fn capture_line(&self, regex: &Regex, text: &str) -> Option<String> {
        regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn strip_bullet(&self, line: &str) -> String {
        self.bullet_prefix_regex.replace(line.trim(), "").trim().to_string()
    }
}
