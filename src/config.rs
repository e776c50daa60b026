use std::num::NonZeroUsize;

use clap::Args;
use encoding_rs::{Encoding, UTF_8};

pub const DEFAULT_SUFFIX: &str = "-out";
pub const DEFAULT_CHUNK_SIZE: NonZeroUsize = NonZeroUsize::MIN.saturating_add(999);

/// Settings read once at startup, from the environment or the matching long
/// option.
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Text encoding of both the input and the output file
    #[clap(
        long,
        env = "CSV_ENCODING",
        default_value = "UTF-8",
        value_parser = parse_encoding
    )]
    pub encoding: &'static Encoding,

    /// Appended to the input file's base name to form the output file name
    #[clap(long = "output-file-suffix", env = "OUTPUT_FILE_SUFFIX", default_value = DEFAULT_SUFFIX)]
    pub output_suffix: String,

    /// Number of records written between two flushes of the output file
    #[clap(long, env = "CHUNK_SIZE", default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: NonZeroUsize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            encoding: UTF_8,
            output_suffix: DEFAULT_SUFFIX.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

fn parse_encoding(label: &str) -> Result<&'static Encoding, String> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| format!("unknown text encoding '{label}'"))
}
