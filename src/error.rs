use std::path::PathBuf;
use thiserror::Error;

type Source = Box<dyn std::error::Error + Send + Sync>;

/// Fatal pipeline errors. Malformed individual cell values never surface
/// here; they degrade to `Value::Missing` or `false` during cleaning.
#[derive(Debug, Error)]
pub enum EtlError {
    /// The input workbook could not be read at all.
    #[error("loading {path:?}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: Source,
    },

    /// A column the stage depends on is absent from the table header.
    #[error("required column `{0}` is missing from the table")]
    Schema(String),

    /// An output artifact could not be written.
    #[error("exporting {path:?}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: Source,
    },
}

impl EtlError {
    pub fn load(path: impl Into<PathBuf>, source: impl Into<Source>) -> Self {
        EtlError::Load {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn export(path: impl Into<PathBuf>, source: impl Into<Source>) -> Self {
        EtlError::Export {
            path: path.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
