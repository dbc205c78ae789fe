//! CLI interface for the relevance engine

use crate::config::{EmbeddingBackend, OutputFormat, ScoringPreset};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const RESUME_EXTENSIONS: &[&str] = &["pdf", "docx"];
pub const JOB_EXTENSIONS: &[&str] = &["txt", "md", "pdf", "docx"];

#[derive(Parser)]
#[command(name = "resume-relevance")]
#[command(about = "Score resumes against job descriptions")]
#[command(long_about = "Parse job descriptions and resumes, then score how well each resume fits using hard skill matching and semantic similarity")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate one resume against a job description
    Evaluate {
        /// Path to resume file (PDF, DOCX)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (TXT, MD, PDF, DOCX)
        #[arg(short, long)]
        job: PathBuf,

        /// Role title, overriding the one found in the job description
        #[arg(long)]
        role: Option<String>,

        /// Company name, overriding the one found in the job description
        #[arg(long)]
        company: Option<String>,

        /// Scoring preset: strict, lenient
        #[arg(short, long)]
        preset: Option<String>,

        /// Similarity backend: model, lexical
        #[arg(short, long)]
        backend: Option<String>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Output detailed analysis
        #[arg(short, long)]
        detailed: bool,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Rank many resumes against one job description
    Batch {
        /// Path to job description file (TXT, MD, PDF, DOCX)
        #[arg(short, long)]
        job: PathBuf,

        /// Resume files (PDF, DOCX)
        #[arg(required = true)]
        resumes: Vec<PathBuf>,

        #[arg(long)]
        role: Option<String>,

        #[arg(long)]
        company: Option<String>,

        /// Scoring preset: strict, lenient
        #[arg(short, long)]
        preset: Option<String>,

        /// Similarity backend: model, lexical
        #[arg(short, long)]
        backend: Option<String>,

        /// Maximum evaluations in flight
        #[arg(short = 'n', long)]
        concurrency: Option<usize>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Parse a job description and print the structured record
    ParseJob {
        #[arg(short, long)]
        job: PathBuf,

        #[arg(long)]
        role: Option<String>,

        #[arg(long)]
        company: Option<String>,
    },

    /// Parse a resume and print the structured record
    ParseResume {
        #[arg(short, long)]
        resume: PathBuf,
    },

    /// Show or manage configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// List the scoring presets
    Presets,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}

pub fn parse_preset(preset: &str) -> Result<ScoringPreset, String> {
    ScoringPreset::from_str(preset)
}

pub fn parse_backend(backend: &str) -> Result<EmbeddingBackend, String> {
    EmbeddingBackend::from_str(backend)
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(parse_output_format("md").unwrap(), OutputFormat::Markdown);
        assert!(parse_output_format("html").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("cv.PDF"), RESUME_EXTENSIONS).is_ok());
        assert!(validate_file_extension(Path::new("cv.txt"), RESUME_EXTENSIONS).is_err());
        assert!(validate_file_extension(Path::new("job.md"), JOB_EXTENSIONS).is_ok());
        assert!(validate_file_extension(Path::new("job"), JOB_EXTENSIONS).is_err());
    }

    #[test]
    fn test_cli_parses_batch() {
        let cli = Cli::try_parse_from([
            "resume-relevance",
            "--verbose",
            "batch",
            "--job",
            "job.md",
            "-n",
            "2",
            "a.pdf",
            "b.docx",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Batch { resumes, concurrency, .. } => {
                assert_eq!(resumes.len(), 2);
                assert_eq!(concurrency, Some(2));
            }
            _ => panic!("expected batch command"),
        }
    }

    #[test]
    fn test_presets_and_backends() {
        assert_eq!(parse_preset("Lenient").unwrap(), ScoringPreset::Lenient);
        assert_eq!(parse_backend("lexical").unwrap(), EmbeddingBackend::Lexical);
        assert!(parse_preset("loose").is_err());
    }
}
