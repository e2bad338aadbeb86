use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to open outcome log '{path}': {source}")]
    OpenOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write outcome log: {source}")]
    Write {
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to encode outcome record: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
}
