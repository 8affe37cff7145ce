//! Running models: evaluation with top-k reporting and tracing into
//! TorchScript modules.
use std::path::Path;

use tch::nn::ModuleT;
use tch::{CModule, Kind, Tensor};

use crate::Result;

/// Runs a forward pass with gradient tracking disabled and returns the top
/// `k` `(probability, class-index)` pairs for the first element of the batch,
/// ordered by decreasing probability.
pub fn predict_top_k(net: &dyn ModuleT, input: &Tensor, k: i64) -> Vec<(f64, i64)> {
    let output = tch::no_grad(|| net.forward_t(input, false));
    let probabilities = output.softmax(-1, Kind::Float).get(0);
    let (values, indexes) = probabilities.topk(k, 0, true, true);
    (0..k).map(|i| (values.double_value(&[i]), indexes.int64_value(&[i]))).collect()
}

/// Records the execution of `net` on `input` as a TorchScript graph
/// specialized to that input shape, and saves it to `path`.
pub fn trace_to_file<T: AsRef<Path>>(net: &dyn ModuleT, input: &Tensor, path: T) -> Result<()> {
    let mut closure = |inputs: &[Tensor]| vec![net.forward_t(&inputs[0], false)];
    let module =
        CModule::create_by_tracing("Ember", "forward", &[input.shallow_clone()], &mut closure)?;
    module.save(path)?;
    Ok(())
}
