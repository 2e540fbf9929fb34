//! Error type shared by configuration loading, validation and the strategies.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while configuring or running a detection.
///
/// An empty result is never an error: a signal with no transitions yields
/// empty `TransitionSet`s.
#[derive(Debug, Error)]
pub enum DetectError {
    /// The signal or a configuration value is outside its valid domain.
    /// Raised before any strategy runs.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A strategy hit a numerical failure. Deterministic, so retrying with the
    /// same input fails the same way.
    #[error("{strategy} computation failed: {reason}")]
    StrategyComputation {
        strategy: &'static str,
        reason: String,
    },

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DetectError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = DetectError::invalid("signal is empty");
        assert_eq!(err.to_string(), "invalid input: signal is empty");
        assert!(err.is_invalid_input());

        let err = DetectError::StrategyComputation {
            strategy: "change_point",
            reason: "non-finite segmentation cost".into(),
        };
        assert_eq!(
            err.to_string(),
            "change_point computation failed: non-finite segmentation cost"
        );
        assert!(!err.is_invalid_input());
    }

    #[test]
    fn toml_errors_convert() {
        let parse: Result<toml::Value, _> = toml::from_str("strategy = ");
        let err: DetectError = parse.unwrap_err().into();
        assert!(matches!(err, DetectError::ConfigParse(_)));
    }
}
