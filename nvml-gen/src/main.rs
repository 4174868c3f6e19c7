//! Renders the raw NVML API from the declarations in `nvml/idl`.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding types.idl, entry_points.idl and aliases.idl
    #[arg(short, long)]
    sources: PathBuf,

    /// Write the generated source here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let source = match nvml_gen::generate(&args.sources) {
        Ok(source) => source,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("nvml-gen: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match args.output {
        Some(path) => {
            if let Err(e) = fs::write(&path, source) {
                eprintln!("nvml-gen: could not write {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
            log::info!("wrote {}", path.display());
        }
        None => print!("{}", source),
    }

    ExitCode::SUCCESS
}
