use std::path::PathBuf;

use ember::transforms::{
    self, CenterCrop, Normalize, ResizeShortestSide, Transform, IMAGENET_MEAN, IMAGENET_STD,
};
use tch::{Kind, Tensor};

// Writes a synthetic image so that the tests do not depend on bundled files.
fn sample_image(width: i64, height: i64, name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("ember_{}_{}", std::process::id(), name));
    let pixels = (Tensor::rand([3, height, width], tch::kind::FLOAT_CPU) * 255.).to_kind(Kind::Uint8);
    tch::vision::image::save(&pixels, &path).unwrap();
    path
}

#[test]
fn naive_resize_shape_and_range() {
    let path = sample_image(517, 606, "naive.png");
    let tensor = transforms::naive_resize224(&path).unwrap();
    assert_eq!(tensor.size(), [1, 3, 224, 224]);
    assert_eq!(tensor.kind(), Kind::Float);
    assert!(f64::try_from(&tensor.min()).unwrap() >= 0.);
    assert!(f64::try_from(&tensor.max()).unwrap() <= 1.);
    std::fs::remove_file(path).unwrap();
}

#[test]
fn imagenet_preprocess_shape_and_determinism() {
    let path = sample_image(640, 480, "imagenet.png");
    let first = transforms::imagenet_preprocess(&path).unwrap();
    let second = transforms::imagenet_preprocess(&path).unwrap();
    assert_eq!(first.size(), [1, 3, 224, 224]);
    assert_eq!(first.kind(), Kind::Float);
    let max_diff = f64::try_from(&(&first - &second).abs().max()).unwrap();
    assert_eq!(max_diff, 0.);
    std::fs::remove_file(path).unwrap();
}

#[test]
fn resize_shortest_side_preserves_aspect_ratio() {
    let landscape = (Tensor::rand([3, 100, 200], tch::kind::FLOAT_CPU) * 255.).to_kind(Kind::Uint8);
    let resized = ResizeShortestSide::new(50).apply(&landscape).unwrap();
    assert_eq!(resized.size(), [3, 50, 100]);

    let portrait = (Tensor::rand([3, 200, 100], tch::kind::FLOAT_CPU) * 255.).to_kind(Kind::Uint8);
    let resized = ResizeShortestSide::new(50).apply(&portrait).unwrap();
    assert_eq!(resized.size(), [3, 100, 50]);
}

#[test]
fn center_crop_takes_the_middle() {
    let xs = Tensor::arange(16, tch::kind::FLOAT_CPU).view([1, 4, 4]);
    let cropped = CenterCrop::new(2, 2).apply(&xs).unwrap();
    assert_eq!(cropped.size(), [1, 2, 2]);
    assert_eq!(Vec::<f32>::try_from(cropped.reshape([4])).unwrap(), [5., 6., 9., 10.]);
}

#[test]
fn normalize_uses_per_channel_constants() {
    let xs = Tensor::ones([3, 2, 2], tch::kind::FLOAT_CPU);
    let normalized = Normalize::imagenet().apply(&xs).unwrap();
    for channel in 0..3 {
        let expected = (1. - IMAGENET_MEAN[channel]) / IMAGENET_STD[channel];
        let value = normalized.double_value(&[channel as i64, 0, 0]);
        assert!((value - expected).abs() < 1e-5);
    }
}
