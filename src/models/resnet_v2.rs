//! ResNet-v2 variant using fixed 7x7 pooling windows instead of the adaptive
//! pooling of the v1 models. The input is expected to be 224x224.
use tch::nn::{self, FuncT};

use super::blocks::{bottleneck_block, conv2d};

fn layer(p: nn::Path, c_in: i64, c_out: i64, stride: i64, cnt: i64) -> nn::SequentialT {
    let mut layer = nn::seq_t().add(bottleneck_block(&p / "0", c_in, c_out, stride, 4));
    for block_index in 1..cnt {
        layer = layer.add(bottleneck_block(&p / &block_index.to_string(), c_out * 4, c_out, 1, 4))
    }
    layer
}

fn resnet_v2(p: &nn::Path, nclasses: Option<i64>, c1: i64, c2: i64, c3: i64, c4: i64) -> FuncT<'static> {
    let conv = conv2d(p / "conv", 3, 64, 7, 3, 2);
    let bn = nn::batch_norm2d(p / "batchnorm", 64, Default::default());
    let layer1 = layer(p / "layer_1", 64, 64, 2, c1);
    let layer2 = layer(p / "layer_2", 4 * 64, 128, 2, c2);
    let layer3 = layer(p / "layer_3", 4 * 128, 256, 2, c3);
    let layer4 = layer(p / "layer_4", 4 * 256, 512, 1, c4);
    let fc = nclasses.map(|n| nn::linear(p / "feature_connector", 4 * 512, n, Default::default()));
    nn::func_t(move |xs, train| {
        xs.apply(&conv)
            .apply_t(&bn, train)
            .relu()
            .max_pool2d([7, 7], [2, 2], [1, 1], [1, 1], false)
            .apply_t(&layer1, train)
            .apply_t(&layer2, train)
            .apply_t(&layer3, train)
            .apply_t(&layer4, train)
            .avg_pool2d([7, 7], [1, 1], [0, 0], false, true, None)
            .flat_view()
            .apply_opt(&fc)
    })
}

/// Creates a ResNet-v2-50 model.
pub fn resnet_v2_50(p: &nn::Path, num_classes: i64) -> FuncT<'static> {
    resnet_v2(p, Some(num_classes), 3, 4, 6, 3)
}
