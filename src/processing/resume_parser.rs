//! Resume parsing into a [`ResumeRecord`]
//!
//! Bytes are decoded by the input extractors, cleaned, split into labeled
//! sections and then mined for entities section by section. Parsing is a pure
//! function of the input bytes and the reference year used to resolve
//! "present" in date ranges.

use crate::config::ParsingConfig;
use crate::error::{RelevanceError, Result};
use crate::input::text_extractor::extract_bytes;
use crate::input::FileType;
use crate::processing::normalizer::SkillToken;
use crate::processing::records::{ContactInfo, Education, Project, ResumeRecord, WorkExperience};
use crate::processing::sections::{DocumentSections, SectionKind, SectionScanner};
use crate::processing::skills::{
    contains_word, looks_like_skill, split_list_items, title_case, SkillDictionary,
};
use crate::processing::text_processor::TextProcessor;
use chrono::Datelike;
use log::{debug, info};
use regex::Regex;
use std::collections::BTreeSet;

const NAME_NOT_FOUND: &str = "Name Not Found";
const MAX_ACHIEVEMENTS: usize = 5;
const MAX_PROJECT_DESCRIPTION_CHARS: usize = 200;
const MAX_TITLE_WORDS: usize = 8;
const FALLBACK_ROLE_YEARS: f32 = 0.5;
const MAX_INFERRED_ROLES: usize = 3;
const STACK_LABELS: &[&str] = &["tech", "stack", "tools", "tools used", "built with", "tech used"];

pub struct ResumeParser {
    dictionary: &'static SkillDictionary,
    processor: TextProcessor,
    scanner: SectionScanner,
    config: ParsingConfig,
    reference_year: i32,
    name_label_regex: Regex,
    entry_paren_regex: Regex,
    entry_line_regex: Regex,
    fallback_role_regex: Regex,
    date_range_regex: Regex,
    years_regex: Regex,
    months_regex: Regex,
    total_experience_regex: Regex,
    degree_regex: Regex,
    degree_end_regex: Regex,
    year_regex: Regex,
    certification_regexes: Vec<Regex>,
    github_regex: Regex,
    linkedin_regex: Regex,
    bullet_prefix_regex: Regex,
}

impl Default for ResumeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ResumeParser {
    pub fn new() -> Self {
        Self::with_config(ParsingConfig::default())
    }

    pub fn with_config(config: ParsingConfig) -> Self {
        Self {
            dictionary: SkillDictionary::embedded(),
            processor: TextProcessor::new(),
            scanner: SectionScanner::new(),
            config,
            reference_year: chrono::Utc::now().year(),
            name_label_regex: Regex::new(r"(?im)^\s*(?:full\s+)?name\s*:\s*([A-Za-z][A-Za-z .'-]{1,60}?)\s*$")
                .expect("Invalid name regex"),
            entry_paren_regex: Regex::new(
                r"(?i)^(?P<role>[^()]+?)\s+(?:at|@)\s+(?P<company>[^()]+?)\s*\((?P<duration>[^)]+)\)",
            )
            .expect("Invalid experience entry regex"),
            entry_line_regex: Regex::new(
                r"(?i)^(?P<role>[^|,()]+?)\s+(?:at|@)\s+(?P<company>[^|,()]+?)(?:\s*[,|]\s*|\s+-\s+)(?P<duration>.*\d{4}.*)$",
            )
            .expect("Invalid experience line regex"),
            fallback_role_regex: Regex::new(
                r"(?i)\b(software\s+engineer|developer|analyst|intern|trainee|consultant)\b[^\n]*?\s(?:at|@)\s+([^\n,.(]+)",
            )
            .expect("Invalid fallback role regex"),
            date_range_regex: Regex::new(
                r"(?i)\b((?:19|20)\d{2})\s*(?:-|to)\s*(?:[a-z]{3,9}\.?\s+)?((?:19|20)\d{2}|present|current|now|ongoing|till\s+date)",
            )
            .expect("Invalid date range regex"),
            years_regex: Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*\+?\s*(?:years?|yrs?)\b")
                .expect("Invalid years regex"),
            months_regex: Regex::new(r"(?i)(\d+)\s*(?:months?|mos?)\b").expect("Invalid months regex"),
            total_experience_regex: Regex::new(
                r"(?i)(\d+(?:\.\d+)?)\s*\+?\s*(?:years?|yrs?)\s*(?:of\s+)?(?:experience|exp)\b",
            )
            .expect("Invalid total experience regex"),
            degree_regex: Regex::new(
                r"(?i)\b(?:b\.\s?tech|btech|m\.\s?tech|mtech|b\.\s?e\.?|m\.\s?e\.?|b\.\s?sc|bsc|m\.\s?sc|msc|bca|mca|mba|ph\.?\s?d|doctorate|diploma|bachelor(?:'s)?|master(?:'s)?)\b",
            )
            .expect("Invalid degree regex"),
            degree_end_regex: Regex::new(r"(?i)\s+(?:from|at)\s+|\s+-\s+|\s*\b(?:19|20)\d{2}\b")
                .expect("Invalid degree end regex"),
            year_regex: Regex::new(r"\b(?:19|20)\d{2}\b").expect("Invalid year regex"),
            certification_regexes: vec![
                Regex::new(r"(?i)\b(?:aws|azure|google|gcp|oracle|microsoft)\s+certified[^\n,.;]*")
                    .expect("Invalid certification regex"),
                Regex::new(r"(?i)\bcertified\s+[^\n,.;]+").expect("Invalid certification regex"),
                Regex::new(r"(?i)\bcertificat(?:e|ion)\s+(?:in|of)\s+[^\n,.;]+")
                    .expect("Invalid certification regex"),
            ],
            github_regex: Regex::new(r"(?i)github\.com/([A-Za-z0-9_-]+)").expect("Invalid GitHub regex"),
            linkedin_regex: Regex::new(r"(?i)linkedin\.com/in/([A-Za-z0-9_-]+)")
                .expect("Invalid LinkedIn regex"),
            bullet_prefix_regex: Regex::new(r"^(?:[•*\-]+|\d+[.)])\s*").expect("Invalid bullet regex"),
        }
    }

    /// Resolve "present" in date ranges against this year instead of the current one.
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = year;
        self
    }

    /// Parse an uploaded resume. Only PDF and DOCX files are accepted.
    pub fn parse(&self, bytes: &[u8], filename: &str) -> Result<ResumeRecord> {
        let file_type = FileType::from_filename(filename);
        if !file_type.is_resume_format() {
            return Err(RelevanceError::UnsupportedFormat(format!(
                "{}: resumes must be PDF or DOCX files",
                filename
            )));
        }

        let raw = extract_bytes(file_type, bytes)?;
        debug!("Extracted {} characters from {}", raw.len(), filename);
        self.parse_text(&raw)
    }

    /// Parse already-extracted resume text.
    pub fn parse_text(&self, raw: &str) -> Result<ResumeRecord> {
        let text = self.processor.clean_text(raw);
        let length = text.chars().count();
        if length < self.config.min_resume_chars {
            return Err(RelevanceError::Extraction(format!(
                "only {} characters of text could be extracted (minimum {}); the file may be scanned or corrupt",
                length, self.config.min_resume_chars
            )));
        }

        let sections = self.scanner.scan(&text);
        debug!("Resume sections: {:?}", sections.kinds().collect::<Vec<_>>());

        let candidate_name = self.extract_name(&text, &sections);
        let contact = self.extract_contact(&text, &sections);
        let (technical, soft, additional) = self.extract_skills(&text, &sections);
        let work_experience = self.extract_work_experience(&text, &sections);
        let total_experience_years = self.total_experience(&text, &work_experience);
        let education = self.extract_education(&text, &sections);
        let projects = self.extract_projects(&text, &sections);
        let certifications = self.extract_certifications(&text, &sections);
        let achievements = self.extract_achievements(&text, &sections);
        let github_links = self.extract_github_links(&text);
        let linkedin_profile = self
            .linkedin_regex
            .captures(&text)
            .map(|caps| format!("https://linkedin.com/in/{}", &caps[1]));

        let mut record = ResumeRecord::builder(candidate_name)
            .contact(contact)
            .technical_skills(technical)
            .soft_skills(soft)
            .additional_skills(additional)
            .work_experience(work_experience)
            .education(education)
            .projects(projects)
            .certifications(certifications)
            .achievements(achievements)
            .github_links(github_links)
            .linkedin_profile(linkedin_profile)
            .total_experience_years(total_experience_years)
            .text(text)
            .build()?;
        record.quality_score = quality_score(&record, length);

        info!(
            "Parsed resume for '{}': {} technical skills, {:.1} years, quality {}/10",
            record.candidate_name,
            record.technical_skills.len(),
            record.total_experience_years,
            record.quality_score
        );
        Ok(record)
    }

    fn extract_name(&self, text: &str, sections: &DocumentSections) -> String {
        if let Some(caps) = self.name_label_regex.captures(text) {
            return caps[1].trim().to_string();
        }

        let head = if sections.preamble().is_empty() {
            text
        } else {
            sections.preamble()
        };

        head.lines()
            .take(5)
            .map(str::trim)
            .find(|line| is_name_line(line))
            .map(|line| {
                if line.chars().any(|c| c.is_lowercase()) {
                    line.to_string()
                } else {
                    title_case(&line.to_lowercase())
                }
            })
            .unwrap_or_else(|| NAME_NOT_FOUND.to_string())
    }

    fn extract_contact(&self, text: &str, sections: &DocumentSections) -> ContactInfo {
        let location = self
            .dictionary
            .find_city(sections.preamble())
            .or_else(|| self.dictionary.find_city(text));

        ContactInfo {
            email: self.processor.find_email(text),
            phone: self.processor.find_phone(text),
            location,
        }
    }

    /// Technical and soft skills anywhere in the text, plus unknown items from the skills section.
    fn extract_skills(
        &self,
        text: &str,
        sections: &DocumentSections,
    ) -> (BTreeSet<SkillToken>, BTreeSet<SkillToken>, BTreeSet<SkillToken>) {
        let mut technical: BTreeSet<SkillToken> =
            self.dictionary.technical_skills_in(text).into_iter().collect();
        let mut soft: BTreeSet<SkillToken> = self.dictionary.soft_skills_in(text).into_iter().collect();
        let mut additional = BTreeSet::new();

        if let Some(span) = sections.get(SectionKind::Skills) {
            for item in split_list_items(span) {
                if !self.dictionary.find_skills(&item).is_empty() || !looks_like_skill(&item) {
                    continue;
                }
                let token = self.dictionary.normalize(&item);
                if self.dictionary.is_technical(&token) {
                    technical.insert(token);
                } else if self.dictionary.is_soft(&token) {
                    soft.insert(token);
                } else if !token.is_empty() {
                    additional.insert(token);
                }
            }
        }

        (technical, soft, additional)
    }

    fn extract_work_experience(&self, text: &str, sections: &DocumentSections) -> Vec<WorkExperience> {
        let source = sections
            .get(SectionKind::Experience)
            .filter(|span| !span.is_empty())
            .unwrap_or(text);

        let mut entries = Vec::new();
        for line in source.lines() {
            let line = self.strip_bullet(line);
            let caps = self
                .entry_paren_regex
                .captures(&line)
                .or_else(|| self.entry_line_regex.captures(&line));
            let Some(caps) = caps else {
                continue;
            };

            let role = caps["role"].trim().to_string();
            if role.split_whitespace().count() > 6 {
                continue;
            }
            let duration = caps["duration"].trim().to_string();
            entries.push(WorkExperience {
                role,
                company: caps["company"].trim().to_string(),
                years: self.duration_years(&duration),
                duration,
            });
        }

        if entries.is_empty() {
            for caps in self.fallback_role_regex.captures_iter(source).take(MAX_INFERRED_ROLES) {
                entries.push(WorkExperience {
                    role: title_case(&caps[1].to_lowercase()),
                    company: caps[2].trim().to_string(),
                    duration: "Not specified".to_string(),
                    years: FALLBACK_ROLE_YEARS,
                });
            }
            if !entries.is_empty() {
                debug!("Experience inferred from {} role mentions", entries.len());
            }
        }

        entries
    }

    /// Years covered by a duration such as "2 years", "6 months" or "2019 - Present".
    fn duration_years(&self, duration: &str) -> f32 {
        if let Some(caps) = self.date_range_regex.captures(duration) {
            let start: i32 = caps[1].parse().unwrap_or(self.reference_year);
            let end: i32 = caps[2].parse().unwrap_or(self.reference_year);
            let span = (end - start).max(0) as f32;
            return if span == 0.0 { FALLBACK_ROLE_YEARS } else { span };
        }

        let years = self
            .years_regex
            .captures(duration)
            .and_then(|caps| caps[1].parse::<f32>().ok())
            .unwrap_or(0.0);
        let months = self
            .months_regex
            .captures(duration)
            .and_then(|caps| caps[1].parse::<f32>().ok())
            .unwrap_or(0.0);
        years + months / 12.0
    }

    fn total_experience(&self, text: &str, entries: &[WorkExperience]) -> f32 {
        let summed: f32 = entries.iter().map(|entry| entry.years).sum();
        let total = if summed > 0.0 {
            summed
        } else {
            self.total_experience_regex
                .captures(text)
                .and_then(|caps| caps[1].parse::<f32>().ok())
                .unwrap_or(0.0)
        };
        (total * 10.0).round() / 10.0
    }

    fn extract_education(&self, text: &str, sections: &DocumentSections) -> Vec<Education> {
        let source = sections
            .get(SectionKind::Education)
            .filter(|span| !span.is_empty())
            .unwrap_or(text);
        let vocabulary = &self.dictionary.education;
        let lines: Vec<&str> = source.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

        let mut entries = Vec::new();
        for (index, line) in lines.iter().enumerate() {
            let Some(degree_match) = self.degree_regex.find(line) else {
                continue;
            };

            let window = match lines.get(index + 1) {
                Some(next) if !self.degree_regex.is_match(next) => format!("{}\n{}", line, next),
                _ => line.to_string(),
            };
            let lowered = window.to_lowercase();

            let field = vocabulary
                .fields
                .iter()
                .filter_map(|field| lowered.find(field.as_str()).map(|pos| (pos, field)))
                .min_by_key(|(pos, field)| (*pos, usize::MAX - field.len()))
                .map(|(_, field)| title_case(field));

            let institution = window
                .split([',', '|', '\n'])
                .map(str::trim)
                .find(|segment| {
                    let segment = segment.to_lowercase();
                    vocabulary
                        .institution_markers
                        .iter()
                        .any(|marker| contains_word(&segment, marker))
                })
                .map(|segment| {
                    // "Diploma from City College" keeps only the institution.
                    let lowered = segment.to_lowercase();
                    let start = [" from ", " at "]
                        .iter()
                        .filter_map(|marker| lowered.rfind(marker).map(|i| i + marker.len()))
                        .max()
                        .unwrap_or(0);
                    segment.get(start..).unwrap_or(segment).trim().to_string()
                });

            entries.push(Education {
                degree: self.degree_text(&line[degree_match.start()..]),
                institution,
                year: self.year_regex.find_iter(&window).last().map(|m| m.as_str().to_string()),
                field,
            });
        }

        entries
    }

    fn degree_text(&self, from_degree: &str) -> String {
        let end = from_degree.find([',', '|', '(']).unwrap_or(from_degree.len());
        let degree = &from_degree[..end];
        let degree = match self.degree_end_regex.find(degree) {
            Some(m) if m.start() > 0 => &degree[..m.start()],
            _ => degree,
        };
        degree.trim().to_string()
    }

    fn extract_projects(&self, text: &str, sections: &DocumentSections) -> Vec<Project> {
        let segments = match sections.get(SectionKind::Projects).filter(|s| !s.is_empty()) {
            Some(span) => self.segment_projects(span),
            None => self.project_sentences(text),
        };

        segments
            .into_iter()
            .filter(|(title, _)| !title.is_empty())
            .take(self.config.max_projects)
            .map(|(title, description)| {
                let technologies = self
                    .dictionary
                    .technical_skills_in(&format!("{} {}", title, description))
                    .into_iter()
                    .take(self.config.max_project_technologies)
                    .collect();
                Project {
                    title,
                    description: description.chars().take(MAX_PROJECT_DESCRIPTION_CHARS).collect(),
                    technologies,
                }
            })
            .collect()
    }

    /// Split a projects section into (title, description) pairs on title lines and "Title - description" separators.
    fn segment_projects(&self, span: &str) -> Vec<(String, String)> {
        let mut projects: Vec<(String, String)> = Vec::new();

        for line in span.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let is_bullet = line.starts_with(['•', '-', '*']);
            let content = self.strip_bullet(line);
            if content.is_empty() {
                continue;
            }

            if !is_bullet {
                if let Some((title, rest)) = split_title(&content) {
                    projects.push((title, rest));
                    continue;
                }
                if content.split_whitespace().count() <= MAX_TITLE_WORDS && !content.ends_with('.') {
                    projects.push((content, String::new()));
                    continue;
                }
            }

            match projects.last_mut() {
                Some((_, description)) => {
                    if !description.is_empty() {
                        description.push(' ');
                    }
                    description.push_str(&content);
                }
                None => projects.push((leading_words(&content, 6), content)),
            }
        }

        projects
    }

    /// Sentences that describe building something with a known technology.
    fn project_sentences(&self, text: &str) -> Vec<(String, String)> {
        let indicators = &self.dictionary.indicators.project;
        self.processor
            .split_sentences(text)
            .into_iter()
            .map(|sentence| self.strip_bullet(&sentence))
            .filter(|sentence| {
                let lowered = sentence.to_lowercase();
                indicators.iter().any(|verb| contains_word(&lowered, verb))
                    && !self.dictionary.technical_skills_in(sentence).is_empty()
            })
            .map(|sentence| (leading_words(&sentence, 6), sentence))
            .collect()
    }

    fn extract_certifications(&self, text: &str, sections: &DocumentSections) -> Vec<String> {
        let mut certifications: Vec<String> = Vec::new();

        if let Some(span) = sections.get(SectionKind::Certifications) {
            for line in span.split(['\n', '•']) {
                let item = self.strip_bullet(line);
                if item.chars().count() > 5 {
                    push_unique(&mut certifications, item);
                }
            }
        }

        for regex in &self.certification_regexes {
            for m in regex.find_iter(text) {
                push_unique(&mut certifications, m.as_str().trim().to_string());
            }
        }

        certifications
    }

    fn extract_achievements(&self, text: &str, sections: &DocumentSections) -> Vec<String> {
        let mut achievements: Vec<String> = Vec::new();

        if let Some(span) = sections.get(SectionKind::Achievements) {
            for line in span.split(['\n', '•']) {
                let item = self.strip_bullet(line);
                if item.chars().count() > 5 {
                    push_unique(&mut achievements, item);
                }
            }
        }

        let indicators = &self.dictionary.indicators.achievement;
        for sentence in self.processor.split_sentences(text) {
            if achievements.len() >= MAX_ACHIEVEMENTS {
                break;
            }
            let lowered = sentence.to_lowercase();
            if indicators.iter().any(|verb| contains_word(&lowered, verb)) {
                push_unique(&mut achievements, self.strip_bullet(&sentence));
            }
        }

        achievements.truncate(MAX_ACHIEVEMENTS);
        achievements
    }

    fn extract_github_links(&self, text: &str) -> Vec<String> {
        let mut links = Vec::new();
        for caps in self.github_regex.captures_iter(text) {
            let link = format!("https://github.com/{}", &caps[1]);
            if !links.contains(&link) {
                links.push(link);
            }
        }
        links
    }

    fn strip_bullet(&self, line: &str) -> String {
        self.bullet_prefix_regex.replace(line.trim(), "").trim().to_string()
    }
}

/// Two to four capitalised alphabetic words.
fn is_name_line(line: &str) -> bool {
    let words: Vec<&str> = line.split_whitespace().collect();
    (2..=4).contains(&words.len())
        && words.iter().all(|word| {
            word.chars().next().map_or(false, char::is_uppercase)
                && word
                    .chars()
                    .all(|c| c.is_alphabetic() || c == '.' || c == '-' || c == '\'')
        })
}

fn split_title(line: &str) -> Option<(String, String)> {
    for separator in [" - ", " | ", ": "] {
        if let Some((title, rest)) = line.split_once(separator) {
            let title = title.trim();
            let rest = rest.trim();
            if !title.is_empty()
                && !rest.is_empty()
                && title.split_whitespace().count() <= MAX_TITLE_WORDS
                && !STACK_LABELS.contains(&title.to_lowercase().as_str())
            {
                return Some((title.to_string(), rest.to_string()));
            }
        }
    }
    None
}

fn leading_words(text: &str, count: usize) -> String {
    text.split_whitespace()
        .take(count)
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(['.', ',', ';', ':'])
        .to_string()
}

/// Append unless an existing entry already contains it (case-insensitive).
fn push_unique(items: &mut Vec<String>, item: String) {
    if item.is_empty() {
        return;
    }
    let lowered = item.to_lowercase();
    if !items.iter().any(|existing| existing.to_lowercase().contains(&lowered)) {
        items.push(item);
    }
}

/// One point per completeness check, out of 10.
fn quality_score(record: &ResumeRecord, length: usize) -> f32 {
    let skill_count = record.technical_skills.len() + record.soft_skills.len() + record.additional_skills.len();
    let checks = [
        length >= 500,
        record.contact.email.is_some() && record.contact.phone.is_some(),
        record.technical_skills.len() >= 5,
        skill_count >= 10,
        !record.work_experience.is_empty(),
        record.work_experience.len() >= 2,
        !record.education.is_empty(),
        !record.projects.is_empty(),
        record.projects.len() >= 2,
        record.has_profile_link(),
    ];
    checks.iter().filter(|passed| **passed).count() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run};
    use std::io::Cursor;

    const SAMPLE_RESUME: &str = "JANE DOE
jane.doe@mail.com | +91 9876543210 | Pune
github.com/janedoe | linkedin.com/in/jane-doe

Summary
Backend developer focused on Python services and data pipelines for retail analytics teams.

Skills
Python, Django, PostgreSQL, Docker, Git, Protobuf, Communication, Leadership

Experience
Software Engineer at Infosys (2 years)
• Built REST APIs in Django serving a million requests a day
Backend Intern at Acme Labs, Jan 2019 - Jun 2019

Education
B.Tech in Computer Science, Pune Institute of Computer Technology, 2016 - 2020

Projects
Inventory Tracker - Built a stock management app with Django and PostgreSQL.
Chat Service
• Implemented a websocket chat backend using Node.js and Redis.

Certifications
AWS Certified Solutions Architect Associate

Achievements
Won first place in the Smart India Hackathon 2019";

    fn parser() -> ResumeParser {
        ResumeParser::new().with_reference_year(2024)
    }

    fn has(set: &BTreeSet<SkillToken>, skill: &str) -> bool {
        set.contains(&SkillToken::from(skill))
    }

    #[test]
    fn test_parse_sample_resume() {
        let resume = parser().parse_text(SAMPLE_RESUME).unwrap();

        assert_eq!(resume.candidate_name, "Jane Doe");
        assert_eq!(resume.contact.email.as_deref(), Some("jane.doe@mail.com"));
        assert_eq!(resume.contact.phone.as_deref(), Some("+91 9876543210"));
        assert_eq!(resume.contact.location.as_deref(), Some("Pune"));
        assert_eq!(resume.github_links, vec!["https://github.com/janedoe"]);
        assert_eq!(
            resume.linkedin_profile.as_deref(),
            Some("https://linkedin.com/in/jane-doe")
        );

        assert!(has(&resume.technical_skills, "python"));
        assert!(has(&resume.technical_skills, "django"));
        assert!(has(&resume.technical_skills, "aws"));
        assert!(has(&resume.soft_skills, "leadership"));
        assert!(has(&resume.additional_skills, "protobuf"));
    }

    #[test]
    fn test_work_experience_entries() {
        let resume = parser().parse_text(SAMPLE_RESUME).unwrap();

        assert_eq!(resume.work_experience.len(), 2);
        let first = &resume.work_experience[0];
        assert_eq!(first.role, "Software Engineer");
        assert_eq!(first.company, "Infosys");
        assert_eq!(first.years, 2.0);
        assert_eq!(resume.work_experience[1].company, "Acme Labs");
        assert_eq!(resume.work_experience[1].years, 0.5);
        assert!((resume.total_experience_years - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_education_entry() {
        let resume = parser().parse_text(SAMPLE_RESUME).unwrap();

        assert_eq!(resume.education.len(), 1);
        let education = &resume.education[0];
        assert_eq!(education.degree, "B.Tech in Computer Science");
        assert_eq!(education.field.as_deref(), Some("Computer Science"));
        assert_eq!(
            education.institution.as_deref(),
            Some("Pune Institute of Computer Technology")
        );
        assert_eq!(education.year.as_deref(), Some("2020"));
    }

    #[test]
    fn test_projects_segmented() {
        let resume = parser().parse_text(SAMPLE_RESUME).unwrap();

        assert_eq!(resume.projects.len(), 2);
        assert_eq!(resume.projects[0].title, "Inventory Tracker");
        assert_eq!(resume.projects[1].title, "Chat Service");
        let technologies: Vec<&str> = resume.projects[1]
            .technologies
            .iter()
            .map(|t| t.as_str())
            .collect();
        assert_eq!(technologies, vec!["node.js", "redis"]);
    }

    #[test]
    fn test_certifications_and_achievements() {
        let resume = parser().parse_text(SAMPLE_RESUME).unwrap();

        assert_eq!(
            resume.certifications,
            vec!["AWS Certified Solutions Architect Associate"]
        );
        assert_eq!(
            resume.achievements[0],
            "Won first place in the Smart India Hackathon 2019"
        );
    }

    #[test]
    fn test_quality_score_counts_presence_checks() {
        let resume = parser().parse_text(SAMPLE_RESUME).unwrap();
        assert!(resume.quality_score >= 9.0);
        assert!(resume.quality_score <= 10.0);

        let without_links = SAMPLE_RESUME.replace("github.com/janedoe | linkedin.com/in/jane-doe\n", "");
        let unlinked = parser().parse_text(&without_links).unwrap();
        assert!(!unlinked.has_profile_link());
        assert_eq!(unlinked.quality_score, resume.quality_score - 1.0);
    }

    #[test]
    fn test_present_resolves_against_reference_year() {
        let text = "Sam Rivera\n\nExperience\nData Analyst at Zeta (2021 - Present)\n\nSkills\nSQL, Tableau, Python and data analysis for finance reporting teams";
        let resume = parser().parse_text(text).unwrap();
        assert_eq!(resume.work_experience[0].years, 3.0);
    }

    #[test]
    fn test_experience_fallbacks() {
        let text = "Priya Shah\nHands-on engineer with 3 years of experience in backend systems, databases and cloud tooling.";
        let resume = parser().parse_text(text).unwrap();
        assert!(resume.work_experience.is_empty());
        assert_eq!(resume.total_experience_years, 3.0);

        let text = "Priya Shah\nWorked as a developer at Zeta Corp on payment APIs, then moved on to platform work with Kafka.";
        let resume = parser().parse_text(text).unwrap();
        assert_eq!(resume.work_experience.len(), 1);
        assert_eq!(resume.work_experience[0].role, "Developer");
        assert_eq!(resume.work_experience[0].years, 0.5);
    }

    #[test]
    fn test_inferred_roles_are_capped() {
        let text = "Priya Shah\n\
                    Worked as a developer at Zeta Corp on payment APIs.\n\
                    Worked as a developer at Orbit Labs on search features.\n\
                    Worked as an analyst at Delta Bank on risk reports.\n\
                    Worked as a consultant at Nimbus Group on cloud migrations.\n\
                    Worked as a developer at Kite Systems on mobile releases.";
        let resume = parser().parse_text(text).unwrap();
        assert_eq!(resume.work_experience.len(), 3);
        assert_eq!(resume.total_experience_years, 1.5);
    }

    #[test]
    fn test_project_sentences_without_section() {
        let text = "Alex Kim\nDeveloped a fraud detection model in Python using scikit-learn. Enjoys hiking and long walks on weekends.";
        let resume = parser().parse_text(text).unwrap();
        assert_eq!(resume.projects.len(), 1);
        assert!(resume.projects[0]
            .technologies
            .contains(&SkillToken::from("python")));
    }

    #[test]
    fn test_missing_name_and_unknown_field() {
        let text = "contact: someone@mail.com\n\nEducation\nDiploma from City College, 2015\n\nSkills\nPhotoshop, Figma and branding for small businesses in the region";
        let resume = parser().parse_text(text).unwrap();
        assert_eq!(resume.candidate_name, "Name Not Found");
        assert_eq!(resume.education[0].degree, "Diploma");
        assert_eq!(resume.education[0].field, None);
        assert_eq!(resume.education[0].institution.as_deref(), Some("City College"));
    }

    #[test]
    fn test_short_text_is_extraction_error() {
        let result = parser().parse_text("Jane Doe, Python developer, Pune India.");
        assert!(matches!(result, Err(RelevanceError::Extraction(_))));
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let result = parser().parse(SAMPLE_RESUME.as_bytes(), "resume.txt");
        assert!(matches!(result, Err(RelevanceError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_parse_docx_bytes() {
        let mut docx = Docx::new();
        for line in SAMPLE_RESUME.lines() {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
        }
        let mut buffer = Cursor::new(Vec::new());
        docx.build().pack(&mut buffer).unwrap();

        let resume = parser().parse(buffer.get_ref(), "jane.DOCX").unwrap();
        assert_eq!(resume.candidate_name, "Jane Doe");
        assert_eq!(resume.work_experience.len(), 2);
    }
}
