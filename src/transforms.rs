//! Composable transforms turning image files into model input tensors.
//!
//! Transforms operate on CHW tensors as produced by `tch::vision::image::load`
//! and are applied in the order in which they were added to a [`Pipeline`].
use std::path::Path;

use tch::vision::image;
use tch::{Kind, Tensor};

use crate::Result;

/// Per-channel mean used for ImageNet-style normalization.
pub const IMAGENET_MEAN: [f64; 3] = [0.485, 0.456, 0.406];
/// Per-channel standard deviation used for ImageNet-style normalization.
pub const IMAGENET_STD: [f64; 3] = [0.229, 0.224, 0.225];

/// A single step of an image preprocessing pipeline.
pub trait Transform {
    /// Applies the transform to a CHW tensor, returning the transformed
    /// tensor.
    fn apply(&self, xs: &Tensor) -> Result<Tensor>;
}

/// Resizes an image to an exact width and height.
pub struct Resize {
    width: i64,
    height: i64,
}

impl Resize {
    pub fn new(width: i64, height: i64) -> Resize {
        Resize { width, height }
    }
}

impl Transform for Resize {
    fn apply(&self, xs: &Tensor) -> Result<Tensor> {
        Ok(image::resize(xs, self.width, self.height)?)
    }
}

/// Resizes an image so that its shortest side matches a target size,
/// preserving the aspect ratio.
pub struct ResizeShortestSide {
    size: i64,
}

impl ResizeShortestSide {
    pub fn new(size: i64) -> ResizeShortestSide {
        ResizeShortestSide { size }
    }
}

impl Transform for ResizeShortestSide {
    fn apply(&self, xs: &Tensor) -> Result<Tensor> {
        let (_channels, height, width) = xs.size3()?;
        let (out_w, out_h) = if width <= height {
            (self.size, height * self.size / width)
        } else {
            (width * self.size / height, self.size)
        };
        Ok(image::resize(xs, out_w, out_h)?)
    }
}

/// Crops out the center region of an image.
pub struct CenterCrop {
    width: i64,
    height: i64,
}

impl CenterCrop {
    pub fn new(width: i64, height: i64) -> CenterCrop {
        CenterCrop { width, height }
    }
}

impl Transform for CenterCrop {
    fn apply(&self, xs: &Tensor) -> Result<Tensor> {
        let (_channels, height, width) = xs.size3()?;
        let offset_h = (height - self.height) / 2;
        let offset_w = (width - self.width) / 2;
        Ok(xs.narrow(1, offset_h, self.height).narrow(2, offset_w, self.width))
    }
}

/// Converts 8-bit pixel data to float values in the 0. to 1. range.
pub struct ToFloat;

impl Transform for ToFloat {
    fn apply(&self, xs: &Tensor) -> Result<Tensor> {
        Ok(xs.to_kind(Kind::Float) / 255.)
    }
}

/// Normalizes a float image tensor with a per-channel mean and standard
/// deviation.
pub struct Normalize {
    mean: [f64; 3],
    std: [f64; 3],
}

impl Normalize {
    pub fn new(mean: [f64; 3], std: [f64; 3]) -> Normalize {
        Normalize { mean, std }
    }

    /// The normalization used by models pretrained on ImageNet.
    pub fn imagenet() -> Normalize {
        Normalize::new(IMAGENET_MEAN, IMAGENET_STD)
    }
}

impl Transform for Normalize {
    fn apply(&self, xs: &Tensor) -> Result<Tensor> {
        let mean = Tensor::from_slice(&self.mean).view([3, 1, 1]).to_kind(Kind::Float);
        let std = Tensor::from_slice(&self.std).view([3, 1, 1]).to_kind(Kind::Float);
        Ok((xs - mean) / std)
    }
}

/// An ordered sequence of transforms.
#[derive(Default)]
pub struct Pipeline {
    transforms: Vec<Box<dyn Transform>>,
}

impl Pipeline {
    pub fn new() -> Pipeline {
        Pipeline::default()
    }

    /// Appends a transform, transforms run in insertion order.
    pub fn add<T: Transform + 'static>(mut self, transform: T) -> Pipeline {
        self.transforms.push(Box::new(transform));
        self
    }

    /// Runs the pipeline on a CHW tensor.
    pub fn apply(&self, xs: Tensor) -> Result<Tensor> {
        let mut xs = xs;
        for transform in self.transforms.iter() {
            xs = transform.apply(&xs)?;
        }
        Ok(xs)
    }

    /// Loads an image file and runs the pipeline on it, returning a tensor
    /// with a leading batch dimension of one.
    pub fn run<T: AsRef<Path>>(&self, path: T) -> Result<Tensor> {
        let image = image::load(path)?;
        Ok(self.apply(image)?.unsqueeze(0))
    }
}

/// Loads an image, resizes it to exactly 224x224 and scales the values to the
/// 0. to 1. range. No normalization is applied. Returns a [1, 3, 224, 224]
/// tensor.
pub fn naive_resize224<T: AsRef<Path>>(path: T) -> Result<Tensor> {
    Pipeline::new().add(Resize::new(224, 224)).add(ToFloat).run(path)
}

/// Loads an image and applies the standard ImageNet preprocessing: resize the
/// shortest side to 256, center-crop to 224x224, scale to 0. to 1. and
/// normalize per channel. Returns a [1, 3, 224, 224] tensor.
pub fn imagenet_preprocess<T: AsRef<Path>>(path: T) -> Result<Tensor> {
    Pipeline::new()
        .add(ResizeShortestSide::new(256))
        .add(CenterCrop::new(224, 224))
        .add(ToFloat)
        .add(Normalize::imagenet())
        .run(path)
}
