use std::path::PathBuf;

use anyhow::Context;
use chain::PresetBase;
use clap::Parser;
use operations::{full_deposits_suite, mini_deposits_suite, GeneratorContext};
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Generate deposit operation test vectors")]
struct Args {
    /// Directory the suites are written to.
    #[arg(short, long)]
    output_dir: PathBuf,

    /// Directory holding `minimal.yaml` and `mainnet.yaml` presets.
    /// Built-in presets are used when omitted.
    #[arg(short, long)]
    configs_path: Option<PathBuf>,

    /// Also write per-case `.ssz_snappy` files.
    #[arg(long)]
    ssz: bool,

    /// Number of interop keys to derive.
    #[arg(short, long, default_value_t = 16)]
    key_count: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let configs_path = args.configs_path.as_deref();
    let minimal = GeneratorContext::for_preset(configs_path, PresetBase::Minimal, args.key_count)?;
    let mainnet = GeneratorContext::for_preset(configs_path, PresetBase::Mainnet, args.key_count)?;

    let suites = [
        mini_deposits_suite(&minimal).context("Failed to generate minimal deposit suite")?,
        full_deposits_suite(&mainnet).context("Failed to generate mainnet deposit suite")?,
    ];

    for suite in &suites {
        suite.write_yaml(&args.output_dir)?;
        if args.ssz {
            suite.write_ssz_cases(&args.output_dir)?;
        }
    }

    info!(
        suites = suites.len(),
        output_dir = %args.output_dir.display(),
        "Finished generating deposit test vectors"
    );
    Ok(())
}
