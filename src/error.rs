// Error types for the opusmux library

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while converting raw Opus recordings.
#[derive(Error, Debug)]
pub enum MuxError {
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("no usable audio frames in input")]
    EmptyInput,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("packet of {size} bytes exceeds the single-page payload limit of {max} bytes")]
    PacketTooLarge { size: usize, max: usize },

    #[error("verification failed: {0}")]
    Verification(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MuxError>;
