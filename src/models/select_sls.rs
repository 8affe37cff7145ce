//! SelectSLS network implementation.
//!
//! See "XNect: Real-time Multi-person 3D Human Pose Estimation with a Single
//! RGB Camera", Mehta et al. 2019, https://arxiv.org/abs/1907.00837
use tch::nn::{self, ModuleT};
use tch::{Kind, Tensor};

use super::blocks::conv_bn_relu;

/// Channel configuration for a single SLS block.
#[derive(Debug, Clone, Copy)]
pub struct SlsBlockCfg {
    /// Input channels.
    pub c_in: i64,
    /// Channels of the cross-block skip tensor, zero for the first block of a
    /// group.
    pub skip: i64,
    /// Channels of the intermediate convolutions.
    pub mid: i64,
    /// Output channels.
    pub c_out: i64,
    /// Stride of the first convolution.
    pub stride: i64,
    /// Whether this block starts a new skip group.
    pub is_first: bool,
}

/// A selective long and short range skip block. The block consumes the output
/// of the previous block together with the skip tensor produced by the first
/// block of its group.
#[derive(Debug)]
struct SlsBlock {
    conv1: nn::SequentialT,
    conv2: nn::SequentialT,
    conv3: nn::SequentialT,
    conv4: nn::SequentialT,
    conv5: nn::SequentialT,
    conv6: nn::SequentialT,
    is_first: bool,
}

impl SlsBlock {
    fn new(p: nn::Path, cfg: &SlsBlockCfg) -> SlsBlock {
        let mid = cfg.mid;
        let skip = if cfg.is_first { 0 } else { cfg.skip };
        SlsBlock {
            conv1: conv_bn_relu(&p / "conv1", cfg.c_in, mid, 3, 1, cfg.stride),
            conv2: conv_bn_relu(&p / "conv2", mid, mid, 1, 0, 1),
            conv3: conv_bn_relu(&p / "conv3", mid, mid / 2, 3, 1, 1),
            conv4: conv_bn_relu(&p / "conv4", mid / 2, mid, 1, 0, 1),
            conv5: conv_bn_relu(&p / "conv5", mid, mid / 2, 3, 1, 1),
            conv6: conv_bn_relu(&p / "conv6", 2 * mid + skip, cfg.c_out, 1, 0, 1),
            is_first: cfg.is_first,
        }
    }

    /// Runs the block, returning its output and the skip tensor to carry to
    /// the next block.
    fn forward_t(&self, xs: &Tensor, skip: Option<&Tensor>, train: bool) -> (Tensor, Tensor) {
        let d1 = xs.apply_t(&self.conv1, train);
        let d2 = d1.apply_t(&self.conv2, train).apply_t(&self.conv3, train);
        let d3 = d2.apply_t(&self.conv4, train).apply_t(&self.conv5, train);
        match (self.is_first, skip) {
            (true, _) => {
                let out = Tensor::cat(&[&d1, &d2, &d3], 1).apply_t(&self.conv6, train);
                let skip = out.shallow_clone();
                (out, skip)
            }
            (false, Some(skip)) => {
                let out = Tensor::cat(&[&d1, &d2, &d3, skip], 1).apply_t(&self.conv6, train);
                (out, skip.shallow_clone())
            }
            (false, None) => unreachable!("non-first SLS block without a skip tensor"),
        }
    }
}

/// The full SelectSLS network: a stem convolution, a chain of SLS blocks, a
/// convolutional head and a linear classifier.
#[derive(Debug)]
pub struct SelectSls {
    stem: nn::SequentialT,
    features: Vec<SlsBlock>,
    head: nn::SequentialT,
    classifier: Option<nn::Linear>,
}

impl ModuleT for SelectSls {
    fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
        let mut out = xs.apply_t(&self.stem, train);
        let mut skip = None;
        for block in self.features.iter() {
            let (block_out, block_skip) = block.forward_t(&out, skip.as_ref(), train);
            out = block_out;
            skip = Some(block_skip);
        }
        let out = out.apply_t(&self.head, train).mean_dim([2, 3].as_slice(), false, Kind::Float);
        match &self.classifier {
            Some(classifier) => out.apply(classifier),
            None => out,
        }
    }
}

/// Block configuration shared by the 42 and 42b variants.
fn config_42() -> Vec<SlsBlockCfg> {
    let cfg = |c_in, skip, mid, c_out, stride, is_first| SlsBlockCfg {
        c_in,
        skip,
        mid,
        c_out,
        stride,
        is_first,
    };
    vec![
        cfg(32, 0, 64, 64, 2, true),
        cfg(64, 64, 64, 128, 1, false),
        cfg(128, 0, 144, 144, 2, true),
        cfg(144, 144, 144, 288, 1, false),
        cfg(288, 0, 304, 304, 2, true),
        cfg(304, 304, 304, 480, 1, false),
    ]
}

fn select_sls(
    p: &nn::Path,
    nclasses: Option<i64>,
    head_inputs: [i64; 4],
    head_outputs: i64,
    config: &[SlsBlockCfg],
) -> SelectSls {
    let features_p = p / "features";
    let features = config
        .iter()
        .enumerate()
        .map(|(index, cfg)| SlsBlock::new(&features_p / index.to_string(), cfg))
        .collect();
    let head_p = p / "head";
    let head = nn::seq_t()
        .add(conv_bn_relu(&head_p / "0", head_inputs[0], head_inputs[1], 3, 1, 2))
        .add(conv_bn_relu(&head_p / "1", head_inputs[1], head_inputs[2], 3, 1, 1))
        .add(conv_bn_relu(&head_p / "2", head_inputs[2], head_inputs[3], 3, 1, 2))
        .add(conv_bn_relu(&head_p / "3", head_inputs[3], head_outputs, 1, 0, 1));
    SelectSls {
        stem: conv_bn_relu(p / "stem", 3, 32, 3, 1, 2),
        features,
        head,
        classifier: nclasses.map(|n| nn::linear(p / "classifier", head_outputs, n, Default::default())),
    }
}

/// Creates a SelectSLS-42 model.
pub fn select_sls_42(p: &nn::Path, num_classes: i64) -> SelectSls {
    select_sls(p, Some(num_classes), [480, 960, 1024, 1024], 1280, &config_42())
}

/// Creates a SelectSLS-42b model.
pub fn select_sls_42b(p: &nn::Path, num_classes: i64) -> SelectSls {
    select_sls(p, Some(num_classes), [480, 960, 1024, 1280], 1024, &config_42())
}
