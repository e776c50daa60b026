use std::{
    collections::HashMap,
    ffi::{OsStr, OsString},
    fs::File,
    io::{Read, Write},
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use encoding_rs::UTF_8;
use encoding_rs_io::{DecodeReaderBytes, DecodeReaderBytesBuilder};
use log::{debug, info, warn};

use crate::{
    config::Config,
    encoding::EncodeWriter,
    error::{Error, Result},
    id::{IdGenerator, UuidGenerator},
};

pub const UNIQUE_ID_COLUMN: &str = "unique-id";

/// Copies a CSV file next to itself, appending a generated id to every record.
pub struct Converter<'a, G = UuidGenerator> {
    config: &'a Config,
    ids: G,
}

impl<'a> Converter<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self::with_id_generator(config, UuidGenerator)
    }
}

impl<'a, G: IdGenerator> Converter<'a, G> {
    pub fn with_id_generator(config: &'a Config, ids: G) -> Self {
        let output_encoding = config.encoding.output_encoding();
        if output_encoding != config.encoding {
            warn!(
                "{} cannot be written, output will be encoded as {}",
                config.encoding.name(),
                output_encoding.name()
            );
        }
        Self { config, ids }
    }

    /// Convert the CSV file at `path` and return the path of the written file.
    ///
    /// The output is created only once the input has been validated and its
    /// header read. A failure while records are being written leaves the
    /// partially written output in place.
    pub fn process(&mut self, path: &Path) -> Result<PathBuf> {
        let input = std::path::absolute(path)?;
        if !input.exists() {
            return Err(Error::FileNotFound(input));
        }
        if !input.is_file() {
            return Err(Error::InvalidInput(input));
        }
        info!("Processing file {}", input.display());

        let mut reader = self.reader(File::open(&input)?);
        let header = output_header(reader.headers()?)?;

        let output = output_path(&input, &self.config.output_suffix);
        let sink = EncodeWriter::new(File::create(&output)?, self.config.encoding);
        let mut writer = csv_writer(sink);

        // Reader and writer are released on drop, a failed drop-time flush is
        // ignored and never replaces the error returned here.
        let count = self.convert(&mut reader, &header, &mut writer)?;
        writer.into_inner().map_err(|err| err.into_error())?.finish()?;
        info!(
            "File {} has been successfully processed ({} records written to {})",
            input.display(),
            count,
            output.display()
        );
        Ok(output)
    }

    fn reader<R: Read>(&self, input: R) -> csv::Reader<DecodeReaderBytes<R, Vec<u8>>> {
        // UTF-8 is left undecoded so that invalid sequences fail in the csv
        // reader instead of being replaced.
        let encoding = Some(self.config.encoding).filter(|&encoding| encoding != UTF_8);
        let decoded = DecodeReaderBytesBuilder::new()
            .encoding(encoding)
            .utf8_passthru(true)
            .strip_bom(true)
            .build(input);
        ReaderBuilder::new().flexible(true).from_reader(decoded)
    }

    /// Write `header` followed by every remaining record of `reader` with a
    /// fresh id appended, flushing after each full chunk and once at the end.
    fn convert<R: Read, W: Write>(
        &mut self,
        reader: &mut csv::Reader<R>,
        header: &[String],
        writer: &mut csv::Writer<W>,
    ) -> Result<usize> {
        let chunk_size = self.config.chunk_size.get();

        writer.write_record(header)?;

        let mut record = StringRecord::new();
        let mut count = 0;
        while reader.read_record(&mut record)? {
            count += 1;
            let id = self.ids.next_id();
            writer.write_record(record.iter().chain(std::iter::once(id.as_str())))?;

            if count % chunk_size == 0 {
                writer.flush()?;
                debug!("Flushed {} records", count);
            }
        }
        writer.flush()?;
        Ok(count)
    }
}

/// Output dialect: comma separated, minimal quoting, CRLF after every record.
fn csv_writer<W: Write>(sink: W) -> csv::Writer<W> {
    WriterBuilder::new()
        .flexible(true)
        .terminator(Terminator::CRLF)
        .from_writer(sink)
}

/// The input header with [`UNIQUE_ID_COLUMN`] appended.
///
/// Column names are indexed first and then placed back by their index, so
/// duplicate names are caught before anything is written.
fn output_header(headers: &StringRecord) -> Result<Vec<String>> {
    let mut indexes: HashMap<&str, usize> = HashMap::with_capacity(headers.len());
    for (index, name) in headers.iter().enumerate() {
        if indexes.insert(name, index).is_some() {
            return Err(Error::DuplicateHeader(name.to_string()));
        }
    }

    let mut header = vec![String::new(); indexes.len() + 1];
    for (name, index) in indexes {
        header[index] = name.to_string();
    }
    header[headers.len()] = UNIQUE_ID_COLUMN.to_string();
    Ok(header)
}

/// `<dir>/<base><suffix>.<extension>`
///
/// The file name is split at its last dot, so `.data` has an empty base and
/// the extension `data`. An input without an extension still gets the
/// trailing dot.
pub fn output_path(input: &Path, suffix: &str) -> PathBuf {
    let (base, extension) = match input.file_name().and_then(OsStr::to_str) {
        Some(name) => {
            let (base, extension) = name.rsplit_once('.').unwrap_or((name, ""));
            (OsStr::new(base), OsStr::new(extension))
        }
        // Not valid UTF-8, split the way the platform does
        None => (
            input.file_stem().unwrap_or_default(),
            input.extension().unwrap_or_default(),
        ),
    };

    let mut name = OsString::from(base);
    name.push(suffix);
    name.push(".");
    name.push(extension);
    input.with_file_name(name)
}
