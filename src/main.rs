//! resume-relevance: score resumes against job descriptions

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use resume_relevance::cli::{self, Cli, Commands, ConfigAction, JOB_EXTENSIONS, RESUME_EXTENSIONS};
use resume_relevance::config::{Config, OutputFormat, ScoringConfig, ScoringPreset};
use resume_relevance::error::{RelevanceError, Result};
use resume_relevance::input::InputManager;
use resume_relevance::output::formatter::{save_report_to_file, suggest_filename};
use resume_relevance::output::{BatchReport, CandidateSummary, DetailedReport, FeedbackGenerator, JobSummary, ReportGenerator};
use resume_relevance::processing::batch::{evaluate_batch_with_progress, rank_outcomes, BatchOutcome, BatchUpload};
use resume_relevance::processing::{HybridScoringEngine, JobParser, JobRecord, ResumeParser, ResumeRecord};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, mut config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Evaluate {
            resume,
            job,
            role,
            company,
            preset,
            backend,
            output,
            detailed,
            save,
        } => {
            apply_scoring_overrides(&mut config, preset.as_deref(), backend.as_deref())?;
            let format = resolve_format(output.as_deref(), &config)?;
            let detailed = detailed || config.output.detailed;

            println!("🚀 Resume relevance evaluation");
            println!("📄 Resume: {}", resume.display());
            println!("💼 Job Description: {}", job.display());
            println!("⚙️  Similarity backend: {}", config.scoring.embedding_backend);

            let mut input_manager = input_manager(&config);
            let job_record = load_job(&mut input_manager, &job, role.as_deref(), company.as_deref(), &config).await?;
            let resume_record = load_resume(&input_manager, &resume, &ResumeParser::with_config(config.parsing.clone())).await?;

            println!("🔍 Scoring...");
            let engine = HybridScoringEngine::from_config(&config)?;
            let result = engine.evaluate(&job_record, &resume_record);
            let feedback = FeedbackGenerator::with_bands(
                config.scoring.verdict_medium_threshold,
                config.scoring.verdict_high_threshold,
            );
            let report = DetailedReport::build_with_feedback(&job_record, &resume_record, &result, &feedback);

            let use_colors = config.output.color_output && format == OutputFormat::Console;
            let generator = ReportGenerator::with_options(use_colors, detailed, true, true);
            println!("{}", generator.generate_report(&report, format)?);

            if let Some(save_path) = save {
                let plain = ReportGenerator::with_options(false, detailed, true, true);
                let path = resolve_save_path(save_path, format, &resume);
                save_report_to_file(&plain.generate_report(&report, format)?, &path)?;
                println!("💾 Report saved to {}", path.display());
            }
        }

        Commands::Batch {
            job,
            resumes,
            role,
            company,
            preset,
            backend,
            concurrency,
            output,
            save,
        } => {
            apply_scoring_overrides(&mut config, preset.as_deref(), backend.as_deref())?;
            let format = resolve_format(output.as_deref(), &config)?;
            let concurrency = concurrency.unwrap_or(config.processing.batch_concurrency);

            println!("🚀 Batch evaluation of {} resumes", resumes.len());
            println!("💼 Job Description: {}", job.display());

            let mut input_manager = input_manager(&config);
            let job_record = load_job(&mut input_manager, &job, role.as_deref(), company.as_deref(), &config).await?;

            let mut uploads = Vec::new();
            let mut failures = Vec::new();
            for path in &resumes {
                let filename = display_name(path);
                let read = match cli::validate_file_extension(path, RESUME_EXTENSIONS) {
                    Ok(()) => input_manager.read_bytes(path).await,
                    Err(e) => Err(RelevanceError::UnsupportedFormat(e)),
                };
                match read {
                    Ok(bytes) => uploads.push(BatchUpload::new(filename, bytes)),
                    Err(e) => {
                        warn!("Skipping {}: {}", path.display(), e);
                        failures.push(BatchOutcome { filename, result: Err(e) });
                    }
                }
            }

            let engine = Arc::new(HybridScoringEngine::from_config(&config)?);
            let parser = Arc::new(ResumeParser::with_config(config.parsing.clone()));
            let role_title = job_record.role_title.clone();

            let progress = ProgressBar::new(uploads.len() as u64);
            progress.set_style(
                ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
            );

            let mut outcomes = evaluate_batch_with_progress(
                engine,
                parser,
                Arc::new(job_record),
                uploads,
                concurrency,
                |outcome| {
                    progress.set_message(outcome.filename.clone());
                    progress.inc(1);
                },
            )
            .await;
            progress.finish_and_clear();

            outcomes.extend(failures);
            rank_outcomes(&mut outcomes);

            let report = BatchReport::from_outcomes(&role_title, &outcomes);
            let use_colors = config.output.color_output && format == OutputFormat::Console;
            let generator = ReportGenerator::with_options(use_colors, false, true, true);
            println!("{}", generator.generate_batch(&report, format)?);

            if let Some(save_path) = save {
                let plain = ReportGenerator::with_options(false, false, true, true);
                save_report_to_file(&plain.generate_batch(&report, format)?, &save_path)?;
                println!("💾 Ranking saved to {}", save_path.display());
            }
        }

        Commands::ParseJob { job, role, company } => {
            let mut input_manager = input_manager(&config);
            let job_record = load_job(&mut input_manager, &job, role.as_deref(), company.as_deref(), &config).await?;

            println!("{}", serde_json::to_string_pretty(&job_record)?);

            let summary = JobSummary::from_job(&job_record);
            println!("\n💼 {} {}", summary.role_title, if summary.company.is_empty() {
                String::new()
            } else {
                format!("at {}", summary.company)
            });
            println!("  • Experience required: {}", summary.experience_required);
            println!("  • Must-have skills: {}", summary.must_have_count);
            println!("  • Good-to-have skills: {}", summary.good_to_have_count);
            println!("  • Top technical skills: {}", summary.top_technical_skills.join(", "));
            println!("  • Complexity: {}/10", summary.complexity_score);
        }

        Commands::ParseResume { resume } => {
            let input_manager = input_manager(&config);
            let parser = ResumeParser::with_config(config.parsing.clone());
            let resume_record = load_resume(&input_manager, &resume, &parser).await?;

            println!("{}", serde_json::to_string_pretty(&resume_record)?);

            let summary = CandidateSummary::from_resume(&resume_record);
            info!(
                "Parsed resume for {}: {} technical skills, {:.1} years, quality {:.1}/10",
                summary.name, summary.technical_skills_count, summary.experience_years, summary.quality_score
            );
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration ({})\n", config_path.display());
                let content = toml::to_string_pretty(&config).map_err(|e| {
                    RelevanceError::Configuration(format!("Failed to serialize config: {}", e))
                })?;
                println!("{}", content);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save_to(config_path)?;
                println!("✅ Configuration reset successfully!");
            }

            Some(ConfigAction::Presets) => {
                for preset in [ScoringPreset::Strict, ScoringPreset::Lenient] {
                    let scoring = ScoringConfig::from_preset(preset);
                    println!(
                        "📐 {}: weights {:.0}/{:.0}, fuzzy {:?} >= {}, High >= {}, Medium >= {}",
                        preset,
                        scoring.hard_match_weight * 100.0,
                        scoring.soft_match_weight * 100.0,
                        scoring.fuzzy_algorithm,
                        scoring.fuzzy_match_threshold,
                        scoring.verdict_high_threshold,
                        scoring.verdict_medium_threshold
                    );
                }
            }
        },
    }

    Ok(())
}

fn input_manager(config: &Config) -> InputManager {
    InputManager::new()
        .with_cache(config.processing.enable_caching)
        .with_max_file_size(config.parsing.max_file_size_bytes)
}

fn apply_scoring_overrides(config: &mut Config, preset: Option<&str>, backend: Option<&str>) -> Result<()> {
    if let Some(preset) = preset {
        let preset = cli::parse_preset(preset).map_err(RelevanceError::InvalidInput)?;
        let current_backend = config.scoring.embedding_backend;
        config.scoring = ScoringConfig::from_preset(preset).with_backend(current_backend);
    }
    if let Some(backend) = backend {
        let backend = cli::parse_backend(backend).map_err(RelevanceError::InvalidInput)?;
        config.scoring.embedding_backend = backend;
    }
    config.scoring.validate()
}

fn resolve_format(output: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match output {
        Some(format) => cli::parse_output_format(format).map_err(RelevanceError::InvalidInput),
        None => Ok(config.output.format),
    }
}

async fn load_job(
    input_manager: &mut InputManager,
    path: &Path,
    role: Option<&str>,
    company: Option<&str>,
    config: &Config,
) -> Result<JobRecord> {
    cli::validate_file_extension(path, JOB_EXTENSIONS)
        .map_err(|e| RelevanceError::InvalidInput(format!("Job description file: {}", e)))?;

    let text = input_manager.extract_text(path).await?;
    JobParser::with_config(config.parsing.clone()).parse(&text, role, company)
}

async fn load_resume(input_manager: &InputManager, path: &Path, parser: &ResumeParser) -> Result<ResumeRecord> {
    cli::validate_file_extension(path, RESUME_EXTENSIONS)
        .map_err(|e| RelevanceError::UnsupportedFormat(format!("Resume file: {}", e)))?;

    let bytes = input_manager.read_bytes(path).await?;
    parser.parse(&bytes, &display_name(path))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// A directory save target gets a generated filename inside it.
fn resolve_save_path(save_path: PathBuf, format: OutputFormat, resume: &Path) -> PathBuf {
    if save_path.is_dir() {
        save_path.join(suggest_filename(format, &display_name(resume), true))
    } else {
        save_path
    }
}
