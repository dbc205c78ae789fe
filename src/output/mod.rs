//! Feedback text, reports and output formatting

pub mod feedback;
pub mod formatter;
pub mod report;

pub use feedback::FeedbackGenerator;
pub use formatter::ReportGenerator;
pub use report::{BatchReport, CandidateSummary, DetailedReport, JobSummary};
