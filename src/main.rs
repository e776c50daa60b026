use std::path::PathBuf;

use clap::Parser;

mod config;
mod converter;
mod encoding;
mod error;
mod id;

use config::Config;
use converter::Converter;
use error::{Error, Result};

#[derive(Debug, Parser)]
#[clap(version, about = "Append a generated unique-id column to every record of a CSV file")]
struct Args {
    #[clap(
        index = 1,
        value_name = "CSV_FILE",
        help = "Path to the CSV file to convert, only the first one is used"
    )]
    files: Vec<String>,

    #[clap(flatten)]
    config: Config,
}

/// The path named by the first positional argument, if it is not blank.
fn input_path(args: &[String]) -> Result<PathBuf> {
    match args.first() {
        Some(arg) if !arg.trim().is_empty() => Ok(PathBuf::from(arg)),
        _ => Err(Error::Usage),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let input = match input_path(&args.files) {
        Ok(input) => input,
        Err(err) => {
            // Nothing to convert, which is not a failure
            println!("{}", err);
            return;
        }
    };

    let mut converter = Converter::new(&args.config);
    if let Err(err) = converter.process(&input) {
        log::error!("Failed to convert {}: {}", input.display(), err);
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
