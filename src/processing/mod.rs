//! Parsing, matching and scoring

pub mod normalizer;
pub mod skills;
pub mod text_processor;
pub mod sections;
pub mod records;
pub mod jd_parser;
pub mod resume_parser;
pub mod hard_match;
pub mod embeddings;
pub mod semantic;
pub mod engine;
pub mod batch;

pub use engine::{FitVerdict, HybridScoringEngine, RelevanceResult};
pub use jd_parser::JobParser;
pub use records::{JobRecord, ResumeRecord};
pub use resume_parser::ResumeParser;
