pub mod generator;

use anyhow::Result;
use clap::Parser;
use log::*;
use std::path::PathBuf;
use std::process::ExitCode;

use generator::*;

/// Runs the nanopb protoc wrapper over every .proto file in a directory.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Directory containing the .proto files
    #[arg(long, default_value = "proto")]
    proto_dir: PathBuf,

    /// Path of the generator executable
    #[arg(long, default_value = ".pio/libdeps/esp32dev/Nanopb/generator/protoc.bat")]
    protoc: PathBuf,

    /// Directory the generator writes into (--nanopb_out)
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

fn execute(args: Args) -> Result<RunSummary> {
    let generator = Generator::new(args.proto_dir, args.protoc, args.out_dir);
    generator.run()
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match execute(Args::parse()) {
        Ok(summary) if summary.failed == 0 => ExitCode::SUCCESS,
        Ok(summary) => {
            error!(
                "{} of {} files failed to generate",
                summary.failed, summary.attempted
            );
            ExitCode::from(2)
        }
        Err(e) => {
            println!("{:?}", e);
            ExitCode::FAILURE
        }
    }
}
