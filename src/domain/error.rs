//! Domain error types.

/// Top-level error type for portopt.
///
/// Every failure in the simulation core is a value returned to the caller;
/// no degenerate result is ever papered over with a substitute number.
#[derive(Debug, thiserror::Error)]
pub enum PortoptError {
    #[error("data read error: {reason}")]
    DataRead { reason: String },

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

    #[error("insufficient data: {usable} usable instruments, need at least {minimum}")]
    InsufficientData { usable: usize, minimum: usize },

    #[error("no overlapping return periods across the requested instruments")]
    NoAlignedReturns,

    #[error("sampler produced an empty candidate population")]
    EmptyPopulation,

    #[error("every sampled candidate had zero volatility; no allocation can be ranked")]
    NoViableCandidate,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&PortoptError> for std::process::ExitCode {
    fn from(err: &PortoptError) -> Self {
        let code: u8 = match err {
            PortoptError::Io(_) => 1,
            PortoptError::ConfigParse { .. }
            | PortoptError::ConfigMissing { .. }
            | PortoptError::ConfigInvalid { .. } => 2,
            PortoptError::DataRead { .. } => 3,
            PortoptError::EmptyPopulation | PortoptError::NoViableCandidate => 4,
            PortoptError::InsufficientData { .. } | PortoptError::NoAlignedReturns => 5,
        };
        std::process::ExitCode::from(code)
    }
}
