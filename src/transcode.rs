//! UTF-8 to Windows-1252 output transcoding.
//!
//! [`LegacyWriter`] sits between the CSV writer and the real sink. Code points
//! without a Windows-1252 byte, and every byte of a malformed UTF-8 sequence,
//! are replaced by the substitute byte.

use std::io::{self, Write};

use encoding_rs::{Encoder, EncoderResult, WINDOWS_1252};

pub const DEFAULT_SUBSTITUTE: u8 = b'?';

pub struct LegacyWriter<W: Write> {
    inner: W,
    encoder: Encoder,
    substitute: u8,
    // Start of a multi-byte sequence cut off at the end of the last write.
    pending: Vec<u8>,
}

impl<W: Write> LegacyWriter<W> {
    pub fn new(inner: W, substitute: u8) -> Self {
        Self {
            inner,
            encoder: WINDOWS_1252.new_encoder(),
            substitute,
            pending: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn transcode(&mut self, input: &[u8], out: &mut Vec<u8>) -> usize {
        let mut rest = input;
        while !rest.is_empty() {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    self.encode_valid(valid, out);
                    return input.len();
                }
                Err(err) => {
                    let valid_up_to = err.valid_up_to();
                    if valid_up_to > 0 {
                        let (valid, tail) = rest.split_at(valid_up_to);
                        if let Ok(text) = std::str::from_utf8(valid) {
                            self.encode_valid(text, out);
                        }
                        rest = tail;
                        continue;
                    }
                    if err.error_len().is_none() {
                        // truncated sequence at the end of the buffer
                        return input.len() - rest.len();
                    }
                    out.push(self.substitute);
                    rest = &rest[1..];
                }
            }
        }
        input.len()
    }

    fn encode_valid(&mut self, text: &str, out: &mut Vec<u8>) {
        let mut remaining = text;
        let mut chunk = [0u8; 1024];
        loop {
            let (result, read, written) =
                self.encoder
                    .encode_from_utf8_without_replacement(remaining, &mut chunk, false);
            out.extend_from_slice(&chunk[..written]);
            remaining = &remaining[read..];
            match result {
                EncoderResult::InputEmpty => break,
                EncoderResult::OutputFull => {}
                EncoderResult::Unmappable(_) => out.push(self.substitute),
            }
        }
    }
}

impl<W: Write> Write for LegacyWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut input = std::mem::take(&mut self.pending);
        input.extend_from_slice(buf);
        let mut out = Vec::with_capacity(input.len());
        let consumed = self.transcode(&input, &mut out);
        self.pending = input[consumed..].to_vec();
        if !out.is_empty() {
            self.inner.write_all(&out)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let out = vec![self.substitute; self.pending.len()];
            self.pending.clear();
            self.inner.write_all(&out)?;
        }
        self.inner.flush()
    }
}
