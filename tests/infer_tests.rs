use ember::infer;
use tch::nn::{self, Module};
use tch::{Device, Tensor};

#[test]
fn top_k_orders_by_decreasing_probability() {
    let net = nn::func_t(|_, _| Tensor::from_slice(&[0.1f32, 4., 2., 3.]).unsqueeze(0));
    let input = Tensor::zeros([1, 4], tch::kind::FLOAT_CPU);
    let top = infer::predict_top_k(&net, &input, 3);
    let classes: Vec<i64> = top.iter().map(|(_, class)| *class).collect();
    assert_eq!(classes, [1, 3, 2]);
    assert!(top.windows(2).all(|w| w[0].0 >= w[1].0));
    let total: f64 = top.iter().map(|(probability, _)| probability).sum();
    assert!(total <= 1. + 1e-6);
}

#[test]
fn prediction_is_deterministic() {
    let vs = nn::VarStore::new(Device::Cpu);
    let net = nn::seq_t()
        .add(nn::linear(&vs.root() / "fc1", 8, 16, Default::default()))
        .add_fn(|xs| xs.relu())
        .add(nn::linear(&vs.root() / "fc2", 16, 4, Default::default()));
    let input = Tensor::rand([1, 8], tch::kind::FLOAT_CPU);
    let first = infer::predict_top_k(&net, &input, 4);
    let second = infer::predict_top_k(&net, &input, 4);
    assert_eq!(first, second);
}

#[test]
fn traced_module_reproduces_the_network() {
    let vs = nn::VarStore::new(Device::Cpu);
    let net = nn::linear(&vs.root() / "fc", 4, 2, Default::default());
    let input = Tensor::rand([1, 4], tch::kind::FLOAT_CPU);

    let path = std::env::temp_dir().join(format!("ember_{}_traced.pt", std::process::id()));
    infer::trace_to_file(&net, &input, &path).unwrap();
    assert!(std::fs::metadata(&path).unwrap().len() > 0);

    let module = tch::CModule::load(&path).unwrap();
    let traced = module.forward_ts(&[input.shallow_clone()]).unwrap();
    let direct = net.forward(&input);
    let max_diff = f64::try_from(&(&traced - &direct).abs().max()).unwrap();
    assert!(max_diff < 1e-6);
    std::fs::remove_file(path).unwrap();
}
