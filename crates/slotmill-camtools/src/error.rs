//! Error types for the CAM tools crate.
//!
//! Geometry and parameter failures surface as [`DomainError`]; emitting a
//! finished program can additionally fail on I/O.

use slotmill_core::DomainError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while generating or emitting a program.
#[derive(Error, Debug)]
pub enum CamToolError {
    /// The machining parameters do not describe a valid slot.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The output target already holds a file with the requested name.
    #[error("Output file already exists: {}", .0.display())]
    OutputExists(PathBuf),

    /// The output directory does not exist or is not a directory.
    #[error("Output directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    /// The fixed output name is not a single plain file name.
    #[error("Invalid output file name: '{0}' (must not contain a path)")]
    InvalidFileName(String),

    /// The temporary file could not be moved into place.
    #[error("Failed to persist output file: {0}")]
    PersistError(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

/// Result type alias for CAM tool operations.
pub type CamToolResult<T> = Result<T, CamToolError>;
