use std::path::PathBuf;

pub type Result<T, E = DictError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("{0}")]
    Precondition(String),

    #[error("index {index} out of range (entries: {len})")]
    Index { index: usize, len: usize },

    #[error("no usable entries: {0}")]
    Parse(String),

    #[error("{target}: line {line} contains {character:?}, which cannot be encoded")]
    UnencodableCharacter {
        target: &'static str,
        character: char,
        line: usize,
    },

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("failed to {op} {}: {source}", .target.display())]
    Io {
        op: &'static str,
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("gateway {op} of {name} failed: {message}")]
    Gateway {
        op: &'static str,
        name: String,
        message: String,
    },
}

impl DictError {
    pub fn io(op: &'static str, target: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DictError::Io {
            op,
            target: target.into(),
            source,
        }
    }

    /// Stable identifier reported to front ends.
    pub fn kind(&self) -> &'static str {
        match self {
            DictError::Validation(_) => "validation",
            DictError::Precondition(_) => "precondition",
            DictError::Index { .. } => "index",
            DictError::Parse(_) => "parse",
            DictError::UnencodableCharacter { .. } => "unencodable_character",
            DictError::AlreadyExists(_) => "already_exists",
            DictError::NotFound(_) => "not_found",
            DictError::Io { .. } => "io",
            DictError::Gateway { .. } => "gateway",
        }
    }
}
