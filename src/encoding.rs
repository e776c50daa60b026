use std::io::{self, Write};

use encoding_rs::{CoderResult, Encoder, Encoding};

/// Encodes the UTF-8 written to it into `encoding` before passing it on.
///
/// Quoting happens upstream on UTF-8, so stateful encodings such as
/// ISO-2022-JP never have their escape sequences touched by the csv writer.
/// Characters the encoding cannot represent become numeric character
/// references.
pub struct EncodeWriter<W: Write> {
    inner: W,
    encoder: Encoder,
    // Trailing bytes of a UTF-8 sequence split across two writes
    pending: Vec<u8>,
    encoded: Vec<u8>,
}

impl<W: Write> EncodeWriter<W> {
    pub fn new(inner: W, encoding: &'static Encoding) -> Self {
        Self {
            inner,
            encoder: encoding.new_encoder(),
            pending: Vec::new(),
            encoded: Vec::new(),
        }
    }

    /// Write the encoder's closing bytes and flush.
    ///
    /// Without this a stateful encoding may end in a non-ASCII mode.
    pub fn finish(mut self) -> io::Result<W> {
        if !self.pending.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "output ends with an incomplete UTF-8 sequence",
            ));
        }
        self.encode("", true)?;
        self.inner.flush()?;
        Ok(self.inner)
    }

    fn encode(&mut self, mut src: &str, last: bool) -> io::Result<()> {
        loop {
            let needed = self
                .encoder
                .max_buffer_length_from_utf8_if_no_unmappables(src.len())
                .unwrap_or(src.len())
                .max(16);
            self.encoded.reserve(needed);
            let (result, read, _) = self
                .encoder
                .encode_from_utf8_to_vec(src, &mut self.encoded, last);
            src = &src[read..];
            if let CoderResult::InputEmpty = result {
                break;
            }
        }
        self.inner.write_all(&self.encoded)?;
        self.encoded.clear();
        Ok(())
    }
}

impl<W: Write> Write for EncodeWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        let valid = match std::str::from_utf8(&self.pending) {
            Ok(text) => text.len(),
            Err(err) if err.error_len().is_none() => err.valid_up_to(),
            Err(err) => return Err(io::Error::new(io::ErrorKind::InvalidData, err)),
        };

        let pending = std::mem::take(&mut self.pending);
        let result = std::str::from_utf8(&pending[..valid])
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
            .and_then(|text| self.encode(text, false));
        self.pending = pending[valid..].to_vec();
        result.map(|_| buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
