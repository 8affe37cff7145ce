//! Image classification models and inference tools built on the tch bindings
//! for libtorch.
//!
//! The crate provides CHW image transform pipelines, a small registry of
//! classification architectures with pretrained weight loading, and helpers to
//! either evaluate a model on an image or trace it into a TorchScript module.

mod error;
pub use error::EmberError;

pub mod infer;
pub mod models;
pub mod transforms;
pub mod weights;

/// Result type using the crate-wide error.
pub type Result<T> = std::result::Result<T, EmberError>;
