//! Domain error types.

/// Top-level error type for panelfetch.
///
/// Cell-level parse failures are not errors: the cleaner treats them as
/// missing data and drops the row. Errors here are the fail-fast cases —
/// upstream failures, bad configuration, and absent schema columns.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("http error fetching {symbol}: {reason}")]
    Http { symbol: String, reason: String },

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

    #[error("required column '{column}' missing from {file}")]
    MissingColumn { column: String, file: String },

    #[error("csv error in {file}: {reason}")]
    Csv { file: String, reason: String },

    #[error("no data returned for {what}")]
    NoData { what: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&PanelError> for std::process::ExitCode {
    fn from(err: &PanelError) -> Self {
        let code: u8 = match err {
            PanelError::Io(_) => 1,
            PanelError::ConfigParse { .. }
            | PanelError::ConfigMissing { .. }
            | PanelError::ConfigInvalid { .. } => 2,
            PanelError::Database { .. } | PanelError::DatabaseQuery { .. } => 3,
            PanelError::Http { .. } => 4,
            PanelError::MissingColumn { .. }
            | PanelError::Csv { .. }
            | PanelError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
