use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tch::nn;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ember::models::{self, Arch};
use ember::{infer, transforms, weights};

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Run a forward pass and print the top-5 classes.
    Eval,
    /// Trace the model for the input shape and save it as a TorchScript
    /// module.
    Create,
}

#[derive(Parser)]
#[command(name = "ember")]
#[command(about = "Evaluate or trace pretrained image classification models")]
struct Args {
    /// Executor behavior.
    #[arg(long, value_enum)]
    mode: Mode,

    /// Model architecture to build.
    #[arg(long, default_value = "resnet_50")]
    model: String,

    /// Image file to process.
    #[arg(long, default_value = "grace_hopper_517x606.jpg")]
    input: PathBuf,

    /// Output path for the traced module, defaults to <model>_pretrained.pt.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();
    let arch: Arch = args.model.parse()?;

    // Eval uses the full ImageNet preprocessing, tracing uses the naive
    // resize so that the recorded graph sees plain [0, 1] pixel data.
    let tensor = match args.mode {
        Mode::Eval => transforms::imagenet_preprocess(&args.input)?,
        Mode::Create => transforms::naive_resize224(&args.input)?,
    };
    info!(model = %arch, input = %args.input.display(), "input tensor ready");

    let mut vs = nn::VarStore::new(tch::Device::Cpu);
    let net = arch.build(&vs.root(), models::CLASS_COUNT);
    weights::load_pretrained(&mut vs, arch)?;
    vs.freeze();

    match args.mode {
        Mode::Eval => {
            println!("{tensor}");
            for (probability, class) in infer::predict_top_k(net.as_ref(), &tensor, 5) {
                println!("{class:4} {:5.2}%", 100. * probability)
            }
        }
        Mode::Create => {
            let output = args.output.unwrap_or_else(|| PathBuf::from(arch.artifact_name()));
            infer::trace_to_file(net.as_ref(), &tensor, &output)?;
            info!(path = %output.display(), "saved traced module");
        }
    }
    Ok(())
}
