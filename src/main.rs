use clap::Parser;
use log::{error, info};
use std::process::ExitCode;

use logo_dataset::{write_dataset_json, Args, DatasetRegistry, DatasetResult};

fn run(args: &Args) -> DatasetResult<()> {
    let config = args.to_dataset_config()?;
    let registry = DatasetRegistry::with_builtin();
    let mut dataset = registry.build(&config)?;

    info!(
        "Loading {} from {}",
        config.name,
        dataset.get_anno().display()
    );
    dataset.parse_dataset()?;

    match &args.output {
        Some(output_path) => write_dataset_json(output_path, &*dataset)?,
        None => {
            info!("Loaded {} records.", dataset.len());
            info!("Categories: {}", dataset.categories().join(", "));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Failed to load dataset: {}", e);
            ExitCode::FAILURE
        }
    }
}
