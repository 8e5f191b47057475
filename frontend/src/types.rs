//! Display types shared by the components.

use docflow_core::WorkflowOutcome;

/// Severity of a status line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Error,
}

impl LogLevel {
    /// Get CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            LogLevel::Info => "log-info",
            LogLevel::Success => "log-success",
            LogLevel::Error => "log-error",
        }
    }
}

/// One line of feedback with the local time it was produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusLine {
    pub level: LogLevel,
    pub message: String,
    /// HH:MM:SS
    pub timestamp: String,
}

impl StatusLine {
    pub fn now(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
        }
    }

    /// Final line of a workflow run.
    pub fn for_outcome(outcome: &WorkflowOutcome) -> Self {
        let level = if outcome.is_success() {
            LogLevel::Success
        } else {
            LogLevel::Error
        };
        Self::now(level, outcome.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docflow_core::{ApiError, JobSummary, RuntimeStatus};

    #[test]
    fn test_outcome_levels() {
        let done = WorkflowOutcome::Finished(JobSummary {
            status: RuntimeStatus::Completed,
            total_tasks: 3,
            failed_tasks: 0,
            last_updated: None,
        });
        let line = StatusLine::for_outcome(&done);
        assert_eq!(line.level, LogLevel::Success);
        assert_eq!(line.message, "Job Completed.");
        assert_eq!(line.timestamp.len(), 8);

        let failed = WorkflowOutcome::StatusFailed(ApiError::Network("offline".into()));
        let line = StatusLine::for_outcome(&failed);
        assert_eq!(line.level, LogLevel::Error);
        assert_eq!(line.message, "Error fetching job status: offline");
    }
}
