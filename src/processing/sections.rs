//! Labeled-section scanning
//!
//! A document is scanned once for section headers ("Skills:", "Must have:",
//! a line reading just "Experience", ...). Each header owns the text up to the
//! next header or the end of the document. Text before the first header is the
//! preamble. Headers are recognised only at the start of a line or directly
//! after a sentence break, and must be followed by a colon or the end of the
//! line, so prose such as "experience with Go" never opens a section.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SectionKind {
    Summary,
    Skills,
    Experience,
    Education,
    Projects,
    Certifications,
    Achievements,
    MustHave,
    GoodToHave,
    Responsibilities,
    Qualifications,
    /// Recognised headers with no extraction role (benefits, hobbies, ...). They close the previous span.
    Other,
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SectionKind::Summary => "Summary",
            SectionKind::Skills => "Skills",
            SectionKind::Experience => "Experience",
            SectionKind::Education => "Education",
            SectionKind::Projects => "Projects",
            SectionKind::Certifications => "Certifications",
            SectionKind::Achievements => "Achievements",
            SectionKind::MustHave => "Must Have",
            SectionKind::GoodToHave => "Good To Have",
            SectionKind::Responsibilities => "Responsibilities",
            SectionKind::Qualifications => "Qualifications",
            SectionKind::Other => "Other",
        };
        f.write_str(name)
    }
}

const HEADERS: &[(&str, SectionKind)] = &[
    ("professional summary", SectionKind::Summary),
    ("summary", SectionKind::Summary),
    ("profile", SectionKind::Summary),
    ("objective", SectionKind::Summary),
    ("career objective", SectionKind::Summary),
    ("about me", SectionKind::Summary),
    ("technical skills", SectionKind::Skills),
    ("key skills", SectionKind::Skills),
    ("core competencies", SectionKind::Skills),
    ("skills", SectionKind::Skills),
    ("technologies", SectionKind::Skills),
    ("tech stack", SectionKind::Skills),
    ("work experience", SectionKind::Experience),
    ("professional experience", SectionKind::Experience),
    ("employment history", SectionKind::Experience),
    ("work history", SectionKind::Experience),
    ("experience", SectionKind::Experience),
    ("internships", SectionKind::Experience),
    ("education", SectionKind::Education),
    ("academic background", SectionKind::Education),
    ("academics", SectionKind::Education),
    ("projects", SectionKind::Projects),
    ("personal projects", SectionKind::Projects),
    ("academic projects", SectionKind::Projects),
    ("certifications", SectionKind::Certifications),
    ("certification", SectionKind::Certifications),
    ("certificates", SectionKind::Certifications),
    ("licenses", SectionKind::Certifications),
    ("achievements", SectionKind::Achievements),
    ("awards", SectionKind::Achievements),
    ("must have", SectionKind::MustHave),
    ("must-have", SectionKind::MustHave),
    ("must have skills", SectionKind::MustHave),
    ("required skills", SectionKind::MustHave),
    ("mandatory skills", SectionKind::MustHave),
    ("requirements", SectionKind::MustHave),
    ("good to have", SectionKind::GoodToHave),
    ("good-to-have", SectionKind::GoodToHave),
    ("nice to have", SectionKind::GoodToHave),
    ("preferred skills", SectionKind::GoodToHave),
    ("preferred", SectionKind::GoodToHave),
    ("desired skills", SectionKind::GoodToHave),
    ("bonus", SectionKind::GoodToHave),
    ("responsibilities", SectionKind::Responsibilities),
    ("key responsibilities", SectionKind::Responsibilities),
    ("roles and responsibilities", SectionKind::Responsibilities),
    ("what you will do", SectionKind::Responsibilities),
    ("what you'll do", SectionKind::Responsibilities),
    ("duties", SectionKind::Responsibilities),
    ("qualifications", SectionKind::Qualifications),
    ("eligibility", SectionKind::Qualifications),
    ("salary", SectionKind::Other),
    ("compensation", SectionKind::Other),
    ("benefits", SectionKind::Other),
    ("perks", SectionKind::Other),
    ("what we offer", SectionKind::Other),
    ("about us", SectionKind::Other),
    ("about the company", SectionKind::Other),
    ("hobbies", SectionKind::Other),
    ("interests", SectionKind::Other),
    ("languages known", SectionKind::Other),
    ("personal details", SectionKind::Other),
    ("declaration", SectionKind::Other),
    ("references", SectionKind::Other),
];

/// Section spans of one document, keyed by kind.
#[derive(Debug, Clone, Default)]
pub struct DocumentSections {
    preamble: String,
    spans: BTreeMap<SectionKind, String>,
}

impl DocumentSections {
    pub fn get(&self, kind: SectionKind) -> Option<&str> {
        self.spans.get(&kind).map(|s| s.as_str())
    }

    pub fn has(&self, kind: SectionKind) -> bool {
        self.spans.contains_key(&kind)
    }

    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    pub fn kinds(&self) -> impl Iterator<Item = SectionKind> + '_ {
        self.spans.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

pub struct SectionScanner {
    header_regex: Regex,
}

impl Default for SectionScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionScanner {
    pub fn new() -> Self {
        let mut phrases: Vec<&str> = HEADERS.iter().map(|(phrase, _)| *phrase).collect();
        // Longest first so "technical skills" wins over "skills".
        phrases.sort_by(|a, b| b.len().cmp(&a.len()));
        let alternation = phrases
            .iter()
            .map(|p| regex::escape(p).replace(' ', r"\s+"))
            .collect::<Vec<_>>()
            .join("|");

        let pattern = format!(
            r"(?im)(?:^|[.;|]\s+)[ \t•*#\-]*(?P<header>{})[ \t]*(?::|$)",
            alternation
        );
        let header_regex = Regex::new(&pattern).expect("Invalid section header regex");

        Self { header_regex }
    }

    pub fn scan(&self, text: &str) -> DocumentSections {
        let mut headers: Vec<(usize, usize, SectionKind)> = Vec::new();

        for caps in self.header_regex.captures_iter(text) {
            let (Some(whole), Some(header)) = (caps.get(0), caps.name("header")) else {
                continue;
            };
            if let Some(kind) = Self::lookup(header.as_str()) {
                headers.push((header.start(), whole.end(), kind));
            }
        }

        let mut sections = DocumentSections::default();
        let first_start = headers.first().map(|(start, _, _)| *start).unwrap_or(text.len());
        sections.preamble = trim_span(&text[..first_start]);

        for (index, (_, content_start, kind)) in headers.iter().enumerate() {
            let content_end = headers
                .get(index + 1)
                .map(|(next_start, _, _)| *next_start)
                .unwrap_or(text.len());
            let span = if *content_start <= content_end {
                trim_span(&text[*content_start..content_end])
            } else {
                String::new()
            };

            let entry = sections.spans.entry(*kind).or_default();
            if !span.is_empty() {
                if !entry.is_empty() {
                    entry.push('\n');
                }
                entry.push_str(&span);
            }
        }

        sections
    }

    fn lookup(header: &str) -> Option<SectionKind> {
        let key = header.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        HEADERS
            .iter()
            .find(|(phrase, _)| *phrase == key)
            .map(|(_, kind)| *kind)
    }
}

fn trim_span(span: &str) -> String {
    span.trim_matches(|c: char| c.is_whitespace() || c == '•' || c == '|')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_headers_split_document() {
        let scanner = SectionScanner::new();
        let text = "Jane Doe\njane@mail.com\n\nSkills\nPython, Rust\n\nExperience\nEngineer at Acme (2 years)\n\nEducation\nB.Tech in Computer Science";
        let sections = scanner.scan(text);

        assert_eq!(sections.preamble(), "Jane Doe\njane@mail.com");
        assert_eq!(sections.get(SectionKind::Skills), Some("Python, Rust"));
        assert_eq!(sections.get(SectionKind::Experience), Some("Engineer at Acme (2 years)"));
        assert_eq!(sections.get(SectionKind::Education), Some("B.Tech in Computer Science"));
        assert_eq!(sections.len(), 3);
    }

    #[test]
    fn test_inline_labels_on_one_line() {
        let scanner = SectionScanner::new();
        let text = "Backend role. Must have: Python, Django. Good to have: React";
        let sections = scanner.scan(text);

        assert_eq!(sections.get(SectionKind::MustHave), Some("Python, Django."));
        assert_eq!(sections.get(SectionKind::GoodToHave), Some("React"));
        assert_eq!(sections.preamble(), "Backend role.");
    }

    #[test]
    fn test_longest_header_wins() {
        let scanner = SectionScanner::new();
        let sections = scanner.scan("TECHNICAL SKILLS:\nGo, Kafka");
        assert_eq!(sections.get(SectionKind::Skills), Some("Go, Kafka"));
    }

    #[test]
    fn test_prose_does_not_open_sections() {
        let scanner = SectionScanner::new();
        let sections = scanner.scan("Experience with Kubernetes is preferred over skills in Docker.");
        assert!(sections.is_empty());
    }

    #[test]
    fn test_repeated_sections_are_concatenated() {
        let scanner = SectionScanner::new();
        let sections = scanner.scan("Skills: Rust\nProjects: Parser\nSkills: Python");
        assert_eq!(sections.get(SectionKind::Skills), Some("Rust\nPython"));
        assert_eq!(sections.get(SectionKind::Projects), Some("Parser"));
    }

    #[test]
    fn test_other_headers_close_spans() {
        let scanner = SectionScanner::new();
        let sections = scanner.scan("Qualifications:\nB.Tech in IT\nSalary: 12-18 LPA\nHobbies\nChess");
        assert_eq!(sections.get(SectionKind::Qualifications), Some("B.Tech in IT"));
        assert_eq!(sections.get(SectionKind::Other), Some("12-18 LPA\nChess"));
    }

    #[test]
    fn test_empty_header_still_registers() {
        let scanner = SectionScanner::new();
        let sections = scanner.scan("Certifications:\nEducation:\nMCA");
        assert!(sections.has(SectionKind::Certifications));
        assert_eq!(sections.get(SectionKind::Certifications), Some(""));
        assert_eq!(sections.get(SectionKind::Education), Some("MCA"));
    }
}
