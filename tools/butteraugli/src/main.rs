use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use jpegli_butteraugli::{compare, write_outputs, ColorspaceHint, CompareOptions};

const NOTE: &str = "NOTE: images get converted to linear sRGB before comparison. Images \
without an explicit hint are interpreted as nonlinear sRGB. The hint format is \
RGB_D65_SRG_Rel_Lin for linear sRGB. Intensity target is viewing conditions screen \
nits, defaults to 80.";

#[derive(Parser, Debug)]
#[command(name = "butteraugli_main", version, about, after_help = NOTE)]
struct Args {
    /// Reference image
    reference: PathBuf,

    /// Distorted image
    distorted: PathBuf,

    /// Write a false-color heat map of the distance map
    #[arg(long, value_name = "distmap")]
    distmap: Option<PathBuf>,

    /// Write the raw distance map with a PFM header
    #[arg(long, value_name = "distmap.pfm")]
    rawdistmap: Option<PathBuf>,

    /// Write the distance map as a .pfm file
    #[arg(long = "pfm-distance", alias = "pfm_distance", value_name = "pfm_filename")]
    pfm_distance: Option<PathBuf>,

    /// Viewing conditions screen nits
    #[arg(long = "intensity_target", alias = "intensity-target", default_value_t = 80.0)]
    intensity_target: f32,

    /// Colorspace hint, e.g. RGB_D65_SRG_Rel_Lin
    #[arg(long, value_name = "colorspace_hint")]
    colorspace: Option<String>,

    /// Exponent of the p-norm summary
    #[arg(long, value_name = "pth norm", default_value_t = 3.0)]
    pnorm: f64,
}

fn run(args: Args) -> Result<()> {
    let options = CompareOptions {
        colorspace: args
            .colorspace
            .as_deref()
            .unwrap_or("")
            .parse::<ColorspaceHint>()?,
        intensity_target: args.intensity_target,
        pnorm: args.pnorm,
        distmap: args.distmap,
        raw_distmap: args.rawdistmap,
        pfm_distmap: args.pfm_distance,
    };

    let result = compare(&args.reference, &args.distorted, &options)?;
    println!("{:.10}", result.distance);
    println!("{}-norm: {:.6}", options.pnorm, result.pnorm);

    write_outputs(&result.map, &options)
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
