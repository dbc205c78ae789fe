//! Resume relevance library
//!
//! Parses job descriptions and resumes into structured records and scores
//! how well a resume fits a job with hard skill matching and semantic similarity.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{RelevanceError, Result};
pub use processing::{FitVerdict, HybridScoringEngine, JobParser, JobRecord, RelevanceResult, ResumeParser, ResumeRecord};
