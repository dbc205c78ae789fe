//! Output formatters: colored console, JSON and Markdown

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::{BatchReport, DetailedReport};
use crate::processing::engine::FitVerdict;
use colored::{Color, Colorize};
use std::path::Path;

/// Renders reports into one output format.
pub trait OutputFormatter {
    fn format_report(&self, report: &DetailedReport) -> Result<String>;
    fn format_batch(&self, report: &BatchReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors and emoji headers
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for API integration and structured data
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for sharing reports
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Dispatches to the formatter for the requested format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn verdict_badge(&self, verdict: FitVerdict) -> String {
        let color = verdict_color(verdict);
        let label = format!("[{}]", verdict.to_string().to_uppercase());
        if self.use_colors {
            label.color(color).bold().to_string()
        } else {
            label
        }
    }

    fn format_list(&self, output: &mut String, title: &str, items: &[String], color: Color) {
        if items.is_empty() {
            return;
        }
        output.push_str(&self.format_header(title, 3));
        for item in items {
            output.push_str(&format!("  • {}\n", self.colorize(item, color)));
        }
    }
}

fn verdict_color(verdict: FitVerdict) -> Color {
    match verdict {
        FitVerdict::High => Color::Green,
        FitVerdict::Medium => Color::Yellow,
        FitVerdict::Low => Color::Red,
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &DetailedReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("📊 RESUME RELEVANCE REPORT", 1));
        output.push_str(&format!(
            "Evaluated: {} | Processing time: {}ms\n",
            report.evaluated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.evaluation_duration_ms
        ));
        output.push_str(&format!(
            "Candidate: {} | Role: {}{}\n",
            self.colorize(&report.candidate.name, Color::Cyan),
            self.colorize(&report.job.role_title, Color::Cyan),
            if report.job.company.is_empty() {
                String::new()
            } else {
                format!(" at {}", report.job.company)
            }
        ));

        output.push_str(&self.format_header("Summary", 2));
        output.push_str(&format!(
            "Relevance Score: {:.1}/100 {}\n",
            report.scoring.relevance_score,
            self.verdict_badge(report.scoring.verdict)
        ));
        output.push_str(&format!("{}\n", report.feedback));

        output.push_str(&self.format_header("Score Breakdown", 3));
        output.push_str(&format!("🔍 Hard match: {:.1}\n", report.scoring.hard_match_score));
        output.push_str(&format!(
            "🎯 Semantic match: {:.1} ({} similarity)\n",
            report.scoring.soft_match_score, report.scoring.similarity_backend
        ));
        if self.detailed {
            output.push_str(&format!(
                "   overall {:.0}% | role alignment {:.0}% | project relevance {:.0}%\n",
                report.scoring.overall_similarity * 100.0,
                report.scoring.role_alignment * 100.0,
                report.scoring.project_relevance * 100.0
            ));
        }

        output.push_str(&self.format_header("Skills", 3));
        output.push_str(&format!(
            "Must-have matched: {}\n",
            report.matches.must_have_summary()
        ));
        if !report.matches.matched_must_have.is_empty() {
            output.push_str(&format!(
                "  ✅ {}\n",
                self.colorize(&report.matches.matched_must_have.join(", "), Color::Green)
            ));
        }
        if !report.matches.missing_must_have.is_empty() {
            output.push_str(&format!(
                "  ❌ {}\n",
                self.colorize(&report.matches.missing_must_have.join(", "), Color::Red)
            ));
        }
        output.push_str(&format!(
            "Qualification: {} | Experience: {}\n",
            if report.matches.qualification_match { "✅" } else { "❌" },
            if report.matches.experience_match { "✅" } else { "❌" }
        ));

        if self.detailed {
            if !report.matches.matched_good_to_have.is_empty() {
                output.push_str(&format!(
                    "Good-to-have matched: {}\n",
                    report.matches.matched_good_to_have.join(", ")
                ));
            }
            for fuzzy in &report.matches.fuzzy_matches {
                output.push_str(&format!(
                    "  ≈ {} ~ {} ({:.0}%)\n",
                    fuzzy.required, fuzzy.candidate, fuzzy.similarity
                ));
            }
        }

        self.format_list(&mut output, "⚠️ Missing Elements", &report.missing_elements, Color::Yellow);

        let suggestions: Vec<String> = if self.detailed {
            report.suggestions.clone()
        } else {
            report.suggestions.iter().take(3).cloned().collect()
        };
        self.format_list(&mut output, "📋 Suggestions", &suggestions, Color::White);

        if self.detailed {
            self.format_list(&mut output, "🎤 Interview Focus", &report.interview_focus, Color::Cyan);
        }

        Ok(output)
    }

    fn format_batch(&self, report: &BatchReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header(&format!("🏆 RANKING: {}", report.role_title), 1));
        output.push_str(&format!(
            "{} evaluated, {} failed | High: {} | Medium: {} | Low: {}\n\n",
            report.evaluated,
            report.failed,
            report.count_by_verdict(FitVerdict::High),
            report.count_by_verdict(FitVerdict::Medium),
            report.count_by_verdict(FitVerdict::Low)
        ));

        for entry in &report.entries {
            match (&entry.relevance_score, &entry.verdict, &entry.error) {
                (Some(score), Some(verdict), _) => {
                    output.push_str(&format!(
                        "{:>3}. {:<30} {:>5.1} {} must-have {} ({})\n",
                        entry.rank,
                        entry.candidate_name.as_deref().unwrap_or("Unknown"),
                        score,
                        self.verdict_badge(*verdict),
                        entry.must_have.as_deref().unwrap_or("-"),
                        entry.filename
                    ));
                }
                (_, _, error) => {
                    output.push_str(&format!(
                        "{:>3}. {} {}\n",
                        entry.rank,
                        entry.filename,
                        self.colorize(
                            &format!("failed: {}", error.as_deref().unwrap_or("unknown error")),
                            Color::Red
                        )
                    ));
                }
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &DetailedReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn format_batch(&self, report: &BatchReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_badge(verdict: FitVerdict) -> &'static str {
        match verdict {
            FitVerdict::High => "🟢 High",
            FitVerdict::Medium => "🟡 Medium",
            FitVerdict::Low => "🔴 Low",
        }
    }

    fn push_list(output: &mut String, title: &str, items: &[String]) {
        if items.is_empty() {
            return;
        }
        output.push_str(&format!("### {}\n\n", title));
        for item in items {
            output.push_str(&format!("- {}\n", item));
        }
        output.push('\n');
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &DetailedReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!(
            "# 📊 Resume Relevance Report: {}\n\n",
            report.candidate.name
        ));

        if self.include_metadata {
            output.push_str(&format!(
                "**Evaluated:** {} | **Processing Time:** {}ms\n\n",
                report.evaluated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.evaluation_duration_ms
            ));
        }

        output.push_str("## Summary\n\n");
        output.push_str(&format!("**Role:** {}", report.job.role_title));
        if !report.job.company.is_empty() {
            output.push_str(&format!(" at {}", report.job.company));
        }
        output.push_str("\n\n");
        output.push_str(&format!(
            "**Relevance Score:** {:.1}/100 {}\n\n",
            report.scoring.relevance_score,
            Self::markdown_badge(report.scoring.verdict)
        ));
        output.push_str(&format!("> {}\n\n", report.feedback));

        output.push_str("### Score Breakdown\n\n");
        output.push_str("| Component | Score |\n");
        output.push_str("|-----------|-------|\n");
        output.push_str(&format!("| 🔍 Hard match | {:.1} |\n", report.scoring.hard_match_score));
        output.push_str(&format!("| 🎯 Semantic match | {:.1} |\n", report.scoring.soft_match_score));
        output.push_str(&format!(
            "| Overall similarity | {:.0}% |\n",
            report.scoring.overall_similarity * 100.0
        ));
        output.push_str(&format!(
            "| Role alignment | {:.0}% |\n",
            report.scoring.role_alignment * 100.0
        ));
        output.push_str(&format!(
            "| Project relevance | {:.0}% |\n\n",
            report.scoring.project_relevance * 100.0
        ));

        output.push_str("### Skills\n\n");
        output.push_str(&format!(
            "- **Must-have matched:** {}\n",
            report.matches.must_have_summary()
        ));
        if !report.matches.matched_must_have.is_empty() {
            output.push_str(&format!(
                "- **Matched:** {}\n",
                report.matches.matched_must_have.join(", ")
            ));
        }
        if !report.matches.missing_must_have.is_empty() {
            output.push_str(&format!(
                "- **Missing:** {}\n",
                report.matches.missing_must_have.join(", ")
            ));
        }
        output.push_str(&format!(
            "- **Qualification match:** {}\n- **Experience match:** {}\n\n",
            if report.matches.qualification_match { "yes" } else { "no" },
            if report.matches.experience_match { "yes" } else { "no" }
        ));

        Self::push_list(&mut output, "⚠️ Missing Elements", &report.missing_elements);
        Self::push_list(&mut output, "📋 Suggestions", &report.suggestions);
        Self::push_list(&mut output, "🎤 Interview Focus", &report.interview_focus);

        Ok(output)
    }

    fn format_batch(&self, report: &BatchReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!("# 🏆 Candidate Ranking: {}\n\n", report.role_title));
        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Evaluated:** {} | **Failed:** {}\n\n",
                report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.evaluated,
                report.failed
            ));
        }

        output.push_str("| Rank | Candidate | Score | Verdict | Must-have | File |\n");
        output.push_str("|------|-----------|-------|---------|-----------|------|\n");
        for entry in &report.entries {
            match (&entry.relevance_score, &entry.verdict) {
                (Some(score), Some(verdict)) => output.push_str(&format!(
                    "| {} | {} | {:.1} | {} | {} | `{}` |\n",
                    entry.rank,
                    entry.candidate_name.as_deref().unwrap_or("Unknown"),
                    score,
                    Self::markdown_badge(*verdict),
                    entry.must_have.as_deref().unwrap_or("-"),
                    entry.filename
                )),
                _ => output.push_str(&format!(
                    "| {} | - | - | ❌ {} | - | `{}` |\n",
                    entry.rank,
                    entry.error.as_deref().unwrap_or("failed"),
                    entry.filename
                )),
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    fn formatter(&self, format: OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        }
    }

    pub fn generate_report(&self, report: &DetailedReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_report(report)
    }

    pub fn generate_batch(&self, report: &BatchReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_batch(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_relevance{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_relevance{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_relevance{}.md", base_name, timestamp_suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;
    use crate::error::RelevanceError;
    use crate::processing::batch::BatchOutcome;
    use crate::processing::engine::HybridScoringEngine;
    use crate::processing::records::{JobRecord, ResumeRecord};
    use crate::processing::semantic::LexicalSimilarity;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn sample_report() -> DetailedReport {
        let job = JobRecord::builder("Data Engineer")
            .company("Acme")
            .must_have(["Python", "Kafka", "SQL"])
            .build()
            .unwrap();
        let resume = ResumeRecord::builder("Jane Doe")
            .technical_skills(["Python", "SQL"])
            .text("python and sql pipelines")
            .build()
            .unwrap();
        let engine = HybridScoringEngine::new(ScoringConfig::strict(), Arc::new(LexicalSimilarity)).unwrap();
        let result = engine.evaluate(&job, &resume);
        DetailedReport::build(&job, &resume, &result)
    }

    #[test]
    fn test_console_without_colors() {
        let output = ConsoleFormatter::new(false, true).format_report(&sample_report()).unwrap();
        assert!(output.contains("RESUME RELEVANCE REPORT"));
        assert!(output.contains("Candidate: Jane Doe | Role: Data Engineer at Acme"));
        assert!(output.contains("Must-have matched: 2/3"));
        assert!(output.contains("❌ kafka"));
        assert!(output.contains("Interview Focus"));
        assert!(!output.contains("\u{1b}["));
    }

    #[test]
    fn test_json_round_trips() {
        let report = sample_report();
        let json = JsonFormatter::new(true).format_report(&report).unwrap();
        let parsed: DetailedReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.candidate.name, "Jane Doe");
        assert_eq!(parsed.matches.missing_must_have, vec!["kafka".to_string()]);
    }

    #[test]
    fn test_markdown_report() {
        let output = MarkdownFormatter::new(false).format_report(&sample_report()).unwrap();
        assert!(output.starts_with("# 📊 Resume Relevance Report: Jane Doe"));
        assert!(output.contains("**Role:** Data Engineer at Acme"));
        assert!(output.contains("- **Missing:** kafka"));
        assert!(!output.contains("**Evaluated:**"));
    }

    #[test]
    fn test_batch_rendering() {
        let job = JobRecord::builder("Data Engineer").must_have(["Python"]).build().unwrap();
        let resume = ResumeRecord::builder("Jane Doe").technical_skills(["Python"]).build().unwrap();
        let engine = HybridScoringEngine::new(ScoringConfig::strict(), Arc::new(LexicalSimilarity)).unwrap();
        let outcomes = vec![
            BatchOutcome {
                filename: "jane.docx".to_string(),
                result: Ok(engine.evaluate(&job, &resume)),
            },
            BatchOutcome {
                filename: "scan.pdf".to_string(),
                result: Err(RelevanceError::Extraction("empty".to_string())),
            },
        ];
        let batch = BatchReport::from_outcomes("Data Engineer", &outcomes);

        let generator = ReportGenerator::with_options(false, false, true, false);
        let console = generator.generate_batch(&batch, OutputFormat::Console).unwrap();
        assert!(console.contains("1 evaluated, 1 failed"));
        assert!(console.contains("Jane Doe"));
        assert!(console.contains("scan.pdf failed"));

        let markdown = generator.generate_batch(&batch, OutputFormat::Markdown).unwrap();
        assert!(markdown.contains("| 1 | Jane Doe |"));
        assert!(markdown.contains("`scan.pdf`"));

        let json = generator.generate_batch(&batch, OutputFormat::Json).unwrap();
        assert!(json.contains("\"failed\": 1"));
    }

    #[test]
    fn test_save_and_suggest_filename() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reports").join("out.md");
        save_report_to_file("# report", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# report");

        assert_eq!(
            suggest_filename(OutputFormat::Json, "resumes/jane.pdf", false),
            "jane_relevance.json"
        );
        assert_eq!(
            suggest_filename(OutputFormat::Markdown, "jane.docx", false),
            "jane_relevance.md"
        );
    }
}
