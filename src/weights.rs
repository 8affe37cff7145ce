//! Pretrained weight resolution and loading.
//!
//! Weight archives are `.ot` files stored in a directory pointed at by the
//! `EMBER_MODEL_DIR` environment variable. Archives for some architectures can
//! be downloaded from the tch-rs releases, e.g.:
//! https://github.com/LaurentMazare/tch-rs/releases/download/mw/resnet18.ot
//! https://github.com/LaurentMazare/tch-rs/releases/download/mw/resnet34.ot
//! Others can be converted from PyTorch checkpoints with the tch tensor-tools
//! utility. This crate never downloads anything itself.
use std::path::PathBuf;

use tch::nn;
use tracing::info;

use crate::models::Arch;
use crate::{EmberError, Result};

/// Environment variable naming the directory that holds the weight archives.
pub const MODEL_DIR_ENV: &str = "EMBER_MODEL_DIR";

/// The directory holding pretrained weight archives.
pub fn model_dir() -> Result<PathBuf> {
    match std::env::var_os(MODEL_DIR_ENV) {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => Err(EmberError::ModelDirUnset(MODEL_DIR_ENV)),
    }
}

/// Resolves the weight archive for an architecture within the model
/// directory.
pub fn weight_path(arch: Arch) -> Result<PathBuf> {
    let path = model_dir()?.join(arch.weight_file());
    if path.is_file() {
        Ok(path)
    } else {
        Err(EmberError::WeightsNotFound(path))
    }
}

/// Loads the pretrained weights for an architecture into the var-store on
/// which the model was built.
pub fn load_pretrained(vs: &mut nn::VarStore, arch: Arch) -> Result<()> {
    let path = weight_path(arch)?;
    info!(archive = %path.display(), "loading pretrained weights");
    vs.load(path)?;
    Ok(())
}
