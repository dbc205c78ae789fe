//! Bulk evaluation of many resumes against one job

use crate::error::{RelevanceError, Result};
use crate::processing::engine::{HybridScoringEngine, RelevanceResult};
use crate::processing::records::JobRecord;
use crate::processing::resume_parser::ResumeParser;
use log::{debug, info, warn};
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// A resume file waiting to be evaluated.
#[derive(Debug, Clone)]
pub struct BatchUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl BatchUpload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// Result for one upload; a failure never affects its siblings.
#[derive(Debug)]
pub struct BatchOutcome {
    pub filename: String,
    pub result: Result<RelevanceResult>,
}

impl BatchOutcome {
    pub fn score(&self) -> Option<f32> {
        self.result.as_ref().ok().map(|r| r.relevance_score)
    }
}

/// Evaluate every upload against `job` with at most `concurrency` evaluations in flight.
pub async fn evaluate_batch(
    engine: Arc<HybridScoringEngine>,
    parser: Arc<ResumeParser>,
    job: Arc<JobRecord>,
    uploads: Vec<BatchUpload>,
    concurrency: usize,
) -> Vec<BatchOutcome> {
    evaluate_batch_with_progress(engine, parser, job, uploads, concurrency, |_| {}).await
}

/// Like [`evaluate_batch`], calling `on_complete` as each upload finishes.
pub async fn evaluate_batch_with_progress<F>(
    engine: Arc<HybridScoringEngine>,
    parser: Arc<ResumeParser>,
    job: Arc<JobRecord>,
    uploads: Vec<BatchUpload>,
    concurrency: usize,
    mut on_complete: F,
) -> Vec<BatchOutcome>
where
    F: FnMut(&BatchOutcome),
{
    let start_time = Instant::now();
    let total = uploads.len();
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut set = JoinSet::new();

    info!(
        "Evaluating {} resumes against '{}' (concurrency {})",
        total,
        job.role_title,
        concurrency.max(1)
    );

    for upload in uploads {
        let semaphore = semaphore.clone();
        let engine = engine.clone();
        let parser = parser.clone();
        let job = job.clone();

        set.spawn(async move {
            let BatchUpload { filename, bytes } = upload;
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    return BatchOutcome {
                        filename,
                        result: Err(RelevanceError::Processing(format!("Batch cancelled: {}", e))),
                    }
                }
            };

            let name = filename.clone();
            let result = tokio::task::spawn_blocking(move || {
                let resume = parser.parse(&bytes, &name)?;
                Ok(engine.evaluate(&job, &resume))
            })
            .await
            .unwrap_or_else(|e| Err(RelevanceError::Processing(format!("Evaluation task failed: {}", e))));

            BatchOutcome { filename, result }
        });
    }

    let mut outcomes = Vec::with_capacity(total);
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(outcome) => {
                match &outcome.result {
                    Ok(result) => debug!("{}: {:.1}", outcome.filename, result.relevance_score),
                    Err(e) => warn!("{}: {}", outcome.filename, e),
                }
                on_complete(&outcome);
                outcomes.push(outcome);
            }
            Err(e) => warn!("Batch task aborted: {}", e),
        }
    }

    rank_outcomes(&mut outcomes);

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    info!(
        "Batch finished in {:.2?}: {} evaluated, {} failed",
        start_time.elapsed(),
        outcomes.len() - failed,
        failed
    );

    outcomes
}

/// Sort by descending relevance with failures last, ties broken by filename.
pub fn rank_outcomes(outcomes: &mut [BatchOutcome]) {
    outcomes.sort_by(|a, b| match (a.score(), b.score()) {
        (Some(x), Some(y)) => y.total_cmp(&x).then_with(|| a.filename.cmp(&b.filename)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.filename.cmp(&b.filename),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;
    use crate::processing::semantic::LexicalSimilarity;
    use docx_rs::{Docx, Paragraph, Run};

    fn docx_bytes(lines: &[&str]) -> Vec<u8> {
        let mut docx = Docx::new();
        for line in lines {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*line)));
        }
        let mut buffer = std::io::Cursor::new(Vec::new());
        docx.build().pack(&mut buffer).unwrap();
        buffer.into_inner()
    }

    fn resume_lines(name: &str, skills: &str) -> Vec<String> {
        vec![
            name.to_string(),
            "jane@example.com | +1 555 123 4567".to_string(),
            "Skills".to_string(),
            skills.to_string(),
            "Experience".to_string(),
            "Backend Developer at Acme Corp (3 years)".to_string(),
            "Built services and REST APIs used by thousands of customers every day.".to_string(),
        ]
    }

    fn upload(filename: &str, name: &str, skills: &str) -> BatchUpload {
        let lines = resume_lines(name, skills);
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        BatchUpload::new(filename, docx_bytes(&refs))
    }

    fn setup() -> (Arc<HybridScoringEngine>, Arc<ResumeParser>, Arc<JobRecord>) {
        let engine = HybridScoringEngine::new(ScoringConfig::strict(), Arc::new(LexicalSimilarity)).unwrap();
        let job = JobRecord::builder("Backend Developer")
            .must_have(["Python", "Django", "PostgreSQL"])
            .description("Backend developer building REST APIs with Python and Django")
            .build()
            .unwrap();
        (Arc::new(engine), Arc::new(ResumeParser::new()), Arc::new(job))
    }

    #[tokio::test]
    async fn test_batch_ranks_and_isolates_failures() {
        let (engine, parser, job) = setup();
        let uploads = vec![
            upload("weak.docx", "John Smith", "Java, Spring"),
            BatchUpload::new("notes.txt", b"plain text".to_vec()),
            upload("strong.docx", "Jane Doe", "Python, Django, PostgreSQL"),
            BatchUpload::new("broken.pdf", b"not a pdf".to_vec()),
        ];

        let outcomes = evaluate_batch(engine, parser, job, uploads, 2).await;
        assert_eq!(outcomes.len(), 4);

        assert_eq!(outcomes[0].filename, "strong.docx");
        assert_eq!(outcomes[1].filename, "weak.docx");
        assert!(outcomes[0].score().unwrap() > outcomes[1].score().unwrap());

        assert!(outcomes[2].result.is_err());
        assert!(outcomes[3].result.is_err());
        let notes = outcomes.iter().find(|o| o.filename == "notes.txt").unwrap();
        assert!(matches!(notes.result, Err(RelevanceError::UnsupportedFormat(_))));
    }

    #[tokio::test]
    async fn test_progress_callback_sees_every_upload() {
        let (engine, parser, job) = setup();
        let uploads = vec![
            upload("a.docx", "Jane Doe", "Python"),
            upload("b.docx", "John Smith", "Django"),
        ];

        let mut seen = 0;
        let outcomes = evaluate_batch_with_progress(engine, parser, job, uploads, 0, |_| seen += 1).await;
        assert_eq!(seen, 2);
        assert_eq!(outcomes.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let (engine, parser, job) = setup();
        let outcomes = evaluate_batch(engine, parser, job, Vec::new(), 4).await;
        assert!(outcomes.is_empty());
    }
}
