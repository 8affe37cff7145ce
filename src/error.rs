use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Main library error type.
#[derive(Error, Debug)]
pub enum EmberError {
    /// Error coming from the torch bindings, e.g. image decoding or a shape
    /// mismatch while loading weights.
    #[error(transparent)]
    Tch(#[from] tch::TchError),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The requested architecture is not part of the registry.
    #[error("unknown model architecture: {0}")]
    UnknownArch(String),

    /// The model directory environment variable is not set.
    #[error("{0} is not set, it should point at the pretrained weight directory")]
    ModelDirUnset(&'static str),

    /// No weight archive at the resolved path.
    #[error("no pretrained weights found at {}", .0.display())]
    WeightsNotFound(PathBuf),
}
