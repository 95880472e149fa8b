//! Domain error types.

use crate::domain::gain::GainError;

/// Top-level error type for finstream.
#[derive(Debug, thiserror::Error)]
pub enum FinstreamError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("market data provider error: {reason}")]
    Provider { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    Gain(#[from] GainError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FinstreamError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        FinstreamError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&FinstreamError> for std::process::ExitCode {
    fn from(err: &FinstreamError) -> Self {
        let code: u8 = match err {
            FinstreamError::Io(_) => 1,
            FinstreamError::ConfigParse { .. }
            | FinstreamError::ConfigMissing { .. }
            | FinstreamError::ConfigInvalid { .. } => 2,
            FinstreamError::Provider { .. } => 3,
            FinstreamError::NoData { .. } => 5,
            FinstreamError::Gain(_) => 6,
        };
        std::process::ExitCode::from(code)
    }
}
