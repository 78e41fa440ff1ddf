//! Filter and reader for Unix `compress` (`.Z`) files.
//!
//! The format is a three byte header (`1f 9d flags`) followed by LZW codes
//! packed least significant bit first. Codes start at 9 bits and widen up to
//! the maximum width given by the low five bits of the flags; bit 7 of the
//! flags enables block mode, where code 256 clears the table. Every width
//! change or clear is followed by padding up to the end of the current group
//! of eight codes.
//!
//! A 9 bit maximum still widens once, to 10 bit codes, when the table fills:
//! `compress` and `gzip` both behave that way.

use std::io::{self, BufRead, BufReader, Read};

use super::DataFilter;
use crate::error::DataError;
use crate::io::DataSource;

const SUFFIX: &str = ".Z";
const MAGIC: [u8; 2] = [0x1f, 0x9d];
const MAX_BITS_MASK: u8 = 0x1f;
const BLOCK_MODE_MASK: u8 = 0x80;
const INIT_BITS: u32 = 9;
const INIT_MAX_CODE: u32 = (1 << INIT_BITS) - 1;
const MIN_MAX_BITS: u32 = 9;
const MAX_MAX_BITS: u32 = 16;
const CLEAR: u32 = 256;
const FIRST_LITERAL_FREE: u32 = 256;

/// Filter decompressing `.Z` sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnixCompressFilter;

impl DataFilter for UnixCompressFilter {
    fn id(&self) -> &str {
        "unix-compress"
    }

    fn filter(&self, original: &DataSource) -> Result<Option<DataSource>, DataError> {
        let Some(stripped) = original.name().strip_suffix(SUFFIX) else {
            return Ok(None);
        };
        if !original.opener().raw_data_is_binary() {
            return Ok(None);
        }

        let upstream = original.opener().clone();
        let name = original.name().to_string();
        Ok(Some(DataSource::from_stream(stripped, move || {
            match upstream.open_stream_once()? {
                Some(stream) => {
                    let reader = UnixCompressReader::new(name.clone(), stream)
                        .map_err(DataError::into_io)?;
                    Ok(Some(Box::new(reader) as Box<dyn Read + Send>))
                }
                None => Ok(None),
            }
        })))
    }
}

/// Lazy decoder for the Unix `compress` format.
///
/// Codes are decoded one at a time as bytes are requested. Errors surface as
/// `io::Error`s wrapping a [`DataError`] that names the source.
pub struct UnixCompressReader {
    name: String,
    input: BufReader<Box<dyn Read + Send>>,
    bit_buffer: u64,
    bit_count: u32,
    block_mode: bool,
    max_bits: u32,
    n_bits: u32,
    max_code: u32,
    free_entry: u32,
    codes_at_width: u32,
    prefix: Vec<u16>,
    suffix: Vec<u8>,
    previous: Option<u32>,
    first_byte: u8,
    pending: Vec<u8>,
    position: usize,
    exhausted: bool,
}

impl UnixCompressReader {
    /// Read the header of `input` and prepare decoding.
    pub fn new(name: impl Into<String>, input: Box<dyn Read + Send>) -> Result<Self, DataError> {
        let name = name.into();
        let mut input = BufReader::new(input);

        let mut header = [0u8; 3];
        let read = read_up_to(&mut input, &mut header)?;
        if read < 2 || header[..2] != MAGIC {
            return Err(DataError::NotUnixCompressed { name });
        }
        if read < 3 {
            return Err(DataError::UnexpectedEndOfFile { name });
        }

        let max_bits = u32::from(header[2] & MAX_BITS_MASK);
        if !(MIN_MAX_BITS..=MAX_MAX_BITS).contains(&max_bits) {
            return Err(DataError::CorruptedCompress { name });
        }
        let block_mode = header[2] & BLOCK_MODE_MASK != 0;

        let table_size = 1usize << max_bits;
        let mut suffix = vec![0u8; table_size];
        for (i, s) in suffix.iter_mut().take(256).enumerate() {
            *s = i as u8;
        }

        Ok(Self {
            name,
            input,
            bit_buffer: 0,
            bit_count: 0,
            block_mode,
            max_bits,
            n_bits: INIT_BITS,
            max_code: INIT_MAX_CODE,
            free_entry: if block_mode {
                FIRST_LITERAL_FREE + 1
            } else {
                FIRST_LITERAL_FREE
            },
            codes_at_width: 0,
            prefix: vec![0u16; table_size],
            suffix,
            previous: None,
            first_byte: 0,
            pending: Vec::new(),
            position: 0,
            exhausted: false,
        })
    }

    /// Name of the compressed source.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of bytes that can be read without decoding further.
    ///
    /// Decodes the next code when nothing is buffered, so the result is 0
    /// only once the end of the stream has been reached.
    pub fn available(&mut self) -> io::Result<usize> {
        self.fill_pending().map_err(DataError::into_io)?;
        Ok(self.pending.len() - self.position)
    }

    fn max_code_for_width(&self) -> u32 {
        if self.n_bits == self.max_bits {
            1 << self.max_bits
        } else {
            (1 << self.n_bits) - 1
        }
    }

    fn next_byte(&mut self) -> Result<Option<u8>, DataError> {
        let byte = match self.input.fill_buf()? {
            [] => return Ok(None),
            [first, ..] => *first,
        };
        self.input.consume(1);
        Ok(Some(byte))
    }

    /// Read one code, `None` at a clean end of stream.
    fn read_code(&mut self) -> Result<Option<u32>, DataError> {
        while self.bit_count < self.n_bits {
            match self.next_byte()? {
                Some(byte) => {
                    self.bit_buffer |= u64::from(byte) << self.bit_count;
                    self.bit_count += 8;
                }
                None if self.bit_count >= 8 => {
                    return Err(DataError::UnexpectedEndOfFile {
                        name: self.name.clone(),
                    });
                }
                None => return Ok(None),
            }
        }
        let code = (self.bit_buffer & ((1u64 << self.n_bits) - 1)) as u32;
        self.bit_buffer >>= self.n_bits;
        self.bit_count -= self.n_bits;
        self.codes_at_width += 1;
        Ok(Some(code))
    }

    /// Drop the padding that completes the current group of eight codes.
    fn skip_padding(&mut self) -> Result<(), DataError> {
        let remainder = self.codes_at_width % 8;
        let mut to_skip = if remainder == 0 {
            0
        } else {
            (8 - remainder) * self.n_bits
        };
        while to_skip > 0 {
            if self.bit_count == 0 {
                match self.next_byte()? {
                    Some(byte) => {
                        self.bit_buffer = u64::from(byte);
                        self.bit_count = 8;
                    }
                    None => break,
                }
            }
            let n = to_skip.min(self.bit_count);
            self.bit_buffer >>= n;
            self.bit_count -= n;
            to_skip -= n;
        }
        self.codes_at_width = 0;
        Ok(())
    }

    fn corrupted(&self) -> DataError {
        DataError::CorruptedCompress {
            name: self.name.clone(),
        }
    }

    /// Decode codes until some output is pending or the stream ends.
    fn fill_pending(&mut self) -> Result<(), DataError> {
        while self.position >= self.pending.len() && !self.exhausted {
            self.pending.clear();
            self.position = 0;
            self.decode_next()?;
        }
        Ok(())
    }

    fn decode_next(&mut self) -> Result<(), DataError> {
        if self.previous.is_some() && self.free_entry > self.max_code {
            self.skip_padding()?;
            self.n_bits += 1;
            self.max_code = self.max_code_for_width();
        }

        let Some(code) = self.read_code()? else {
            self.exhausted = true;
            return Ok(());
        };

        let Some(previous) = self.previous else {
            if code >= 256 {
                return Err(self.corrupted());
            }
            self.previous = Some(code);
            self.first_byte = code as u8;
            self.pending.push(code as u8);
            return Ok(());
        };

        if code == CLEAR && self.block_mode {
            self.skip_padding()?;
            self.free_entry = FIRST_LITERAL_FREE;
            self.n_bits = INIT_BITS;
            self.max_code = INIT_MAX_CODE;
            return Ok(());
        }

        let incoming = code;
        let mut code = code;
        if code >= self.free_entry {
            if code > self.free_entry || code as usize >= self.suffix.len() {
                return Err(self.corrupted());
            }
            // KwKwK: the entry being defined is the previous sequence plus its first byte
            self.pending.push(self.first_byte);
            code = previous;
        }

        while code >= 256 {
            if self.pending.len() >= self.suffix.len() {
                return Err(self.corrupted());
            }
            let index = code as usize;
            self.pending.push(self.suffix[index]);
            code = u32::from(self.prefix[index]);
        }
        self.first_byte = self.suffix[code as usize];
        self.pending.push(self.first_byte);
        self.pending.reverse();

        if self.free_entry < (1 << self.max_bits) {
            let index = self.free_entry as usize;
            self.prefix[index] = previous as u16;
            self.suffix[index] = self.first_byte;
            self.free_entry += 1;
        }
        self.previous = Some(incoming);
        Ok(())
    }
}

impl Read for UnixCompressReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.fill_pending().map_err(DataError::into_io)?;
        let available = &self.pending[self.position..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.position += n;
        Ok(n)
    }
}

impl std::fmt::Debug for UnixCompressReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnixCompressReader")
            .field("name", &self.name)
            .field("max_bits", &self.max_bits)
            .field("block_mode", &self.block_mode)
            .field("n_bits", &self.n_bits)
            .finish()
    }
}

fn read_up_to(input: &mut impl Read, buf: &mut [u8]) -> Result<usize, DataError> {
    let mut filled = 0;
    while filled < buf.len() {
        match input.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}
