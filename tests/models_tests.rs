use ember::models::{self, resnet, resnet_v2, select_sls, Arch};
use ember::EmberError;
use tch::{nn, Device, Tensor};

fn logits_for(arch: Arch) -> Vec<i64> {
    let vs = nn::VarStore::new(Device::Cpu);
    let net = arch.build(&vs.root(), models::CLASS_COUNT);
    let img = Tensor::zeros([1, 3, 224, 224], tch::kind::FLOAT_CPU);
    let logits = tch::no_grad(|| net.forward_t(&img, false));
    logits.size()
}

#[test]
fn resnets_produce_class_logits() {
    assert_eq!(logits_for(Arch::Resnet18), [1, 1000]);
    assert_eq!(logits_for(Arch::Resnet34), [1, 1000]);
    assert_eq!(logits_for(Arch::Resnet50), [1, 1000]);
}

#[test]
fn resnet_v2_produces_class_logits() {
    assert_eq!(logits_for(Arch::ResnetV2_50), [1, 1000]);
}

#[test]
fn select_sls_produces_class_logits() {
    assert_eq!(logits_for(Arch::SelectSls42), [1, 1000]);
    assert_eq!(logits_for(Arch::SelectSls42b), [1, 1000]);
}

#[test]
fn resnet_without_final_layer_returns_features() {
    let vs = nn::VarStore::new(Device::Cpu);
    let net = resnet::resnet18_no_final_layer(&vs.root());
    let img = Tensor::zeros([1, 3, 224, 224], tch::kind::FLOAT_CPU);
    let features = tch::no_grad(|| img.apply_t(&net, false));
    assert_eq!(features.size(), [1, 512]);
}

#[test]
fn builders_support_custom_class_counts() {
    let vs = nn::VarStore::new(Device::Cpu);
    let net = resnet_v2::resnet_v2_50(&vs.root(), 10);
    let img = Tensor::zeros([2, 3, 224, 224], tch::kind::FLOAT_CPU);
    assert_eq!(tch::no_grad(|| img.apply_t(&net, false)).size(), [2, 10]);

    let vs = nn::VarStore::new(Device::Cpu);
    let net = select_sls::select_sls_42(&vs.root(), 10);
    assert_eq!(tch::no_grad(|| img.apply_t(&net, false)).size(), [2, 10]);
}

#[test]
fn arch_names_round_trip() {
    for arch in Arch::ALL {
        assert_eq!(arch.name().parse::<Arch>().unwrap(), arch);
    }
    assert_eq!("resnet_50".parse::<Arch>().unwrap(), Arch::Resnet50);
    assert_eq!(Arch::Resnet50.artifact_name(), "resnet_50_pretrained.pt");
}

#[test]
fn unknown_arch_is_a_lookup_error() {
    let err = "resnet_52".parse::<Arch>().unwrap_err();
    assert!(matches!(err, EmberError::UnknownArch(name) if name == "resnet_52"));
}
