//! Classification model architectures and the registry used to select them by
//! name.
use std::str::FromStr;

use tch::nn::{self, ModuleT};

use crate::EmberError;

pub mod blocks;
pub mod resnet;
pub mod resnet_v2;
pub mod select_sls;

/// Number of classes for models pretrained on ImageNet.
pub const CLASS_COUNT: i64 = 1000;

/// The set of architectures that can be built by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    Resnet18,
    Resnet34,
    Resnet50,
    ResnetV2_50,
    SelectSls42,
    SelectSls42b,
}

impl Arch {
    pub const ALL: [Arch; 6] = [
        Arch::Resnet18,
        Arch::Resnet34,
        Arch::Resnet50,
        Arch::ResnetV2_50,
        Arch::SelectSls42,
        Arch::SelectSls42b,
    ];

    /// The registry name for this architecture.
    pub fn name(self) -> &'static str {
        match self {
            Arch::Resnet18 => "resnet_18",
            Arch::Resnet34 => "resnet_34",
            Arch::Resnet50 => "resnet_50",
            Arch::ResnetV2_50 => "resnet_v2_50",
            Arch::SelectSls42 => "select_sls_42",
            Arch::SelectSls42b => "select_sls_42b",
        }
    }

    /// Name of the weight archive for this architecture, as resolved in the
    /// model directory.
    pub fn weight_file(self) -> &'static str {
        match self {
            Arch::Resnet18 => "resnet18.ot",
            Arch::Resnet34 => "resnet34.ot",
            Arch::Resnet50 => "resnet50.ot",
            Arch::ResnetV2_50 => "resnet_v2_50.ot",
            Arch::SelectSls42 => "select_sls_42.ot",
            Arch::SelectSls42b => "select_sls_42b.ot",
        }
    }

    /// Default file name for the traced module written in create mode.
    pub fn artifact_name(self) -> String {
        format!("{}_pretrained.pt", self.name())
    }

    /// Builds the architecture with freshly initialized variables under the
    /// given path.
    pub fn build(self, p: &nn::Path, num_classes: i64) -> Box<dyn ModuleT> {
        match self {
            Arch::Resnet18 => Box::new(resnet::resnet18(p, num_classes)),
            Arch::Resnet34 => Box::new(resnet::resnet34(p, num_classes)),
            Arch::Resnet50 => Box::new(resnet::resnet50(p, num_classes)),
            Arch::ResnetV2_50 => Box::new(resnet_v2::resnet_v2_50(p, num_classes)),
            Arch::SelectSls42 => Box::new(select_sls::select_sls_42(p, num_classes)),
            Arch::SelectSls42b => Box::new(select_sls::select_sls_42b(p, num_classes)),
        }
    }
}

impl FromStr for Arch {
    type Err = EmberError;

    fn from_str(s: &str) -> Result<Arch, EmberError> {
        Arch::ALL
            .into_iter()
            .find(|arch| arch.name() == s)
            .ok_or_else(|| EmberError::UnknownArch(s.to_string()))
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
