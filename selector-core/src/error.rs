use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SelectorError {
    #[error("instance id must not be empty")]
    EmptyInstanceId,
    #[error("unknown replace mode: {label}")]
    UnknownReplaceMode { label: String },
    #[error("word list path is empty")]
    MissingWordListPath,
    #[error("failed to read word list at {path}: {source}")]
    WordListRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("word list at {path} is neither UTF-8 nor GBK")]
    WordListDecode { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, SelectorError>;
