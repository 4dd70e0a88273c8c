//! Fatal error type for a judging run.
//!
//! Recoverable submission problems are not errors: they are collected as
//! [`Violation`](crate::validation::Violation)s and end in a zero score.
//! `JudgeError` covers everything that prevents judging altogether.

use std::path::PathBuf;

use thiserror::Error;

/// A condition that aborts a judging run.
#[derive(Debug, Error)]
pub enum JudgeError {
    /// The instance text could not be parsed. One message per problem.
    #[error("malformed input:\n{}", .0.join("\n"))]
    MalformedInput(Vec<String>),

    /// A configuration value is out of its allowed range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configuration document is not valid JSON for [`JudgeConfig`](crate::config::JudgeConfig).
    #[error("failed to parse configuration: {0}")]
    ConfigFormat(#[from] serde_json::Error),

    /// A file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl JudgeError {
    /// Messages suitable for showing to the submitter.
    pub fn messages(&self) -> Vec<String> {
        match self {
            JudgeError::MalformedInput(messages) => messages.clone(),
            other => vec![other.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_input_display_lists_every_message() {
        let err = JudgeError::MalformedInput(vec!["first".into(), "second".into()]);
        assert_eq!(err.to_string(), "malformed input:\nfirst\nsecond");
        assert_eq!(err.messages(), vec!["first", "second"]);
    }

    #[test]
    fn test_other_errors_yield_single_message() {
        let err = JudgeError::InvalidConfig("step must be positive".into());
        assert_eq!(
            err.messages(),
            vec!["invalid configuration: step must be positive"]
        );
    }
}
