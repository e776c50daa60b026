use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "Program arguments must not be empty. Please set csv file path as the first argument."
    )]
    Usage,
    #[error("File '{}' doesn't exist.", .0.display())]
    FileNotFound(PathBuf),
    #[error("Path '{}' doesn't refer to a valid file.", .0.display())]
    InvalidInput(PathBuf),
    #[error("Header contains the column '{0}' more than once")]
    DuplicateHeader(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
