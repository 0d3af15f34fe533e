use std::io::{self, Write};

const BELL: u8 = 0x07;

/// Strips BEL bytes from everything written through it. The selection
/// widget rings the bell on keys it does not understand; a real terminal
/// would beep on every one of them.
///
/// On success the reported length is the length of the original buffer,
/// not the filtered one. Callers treat the bell bytes as accepted.
pub struct BellFilter<W: Write> {
    inner: W,
}

impl<W: Write> BellFilter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }
}

impl<W: Write> Write for BellFilter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let filtered: Vec<u8> = buf.iter().copied().filter(|&b| b != BELL).collect();
        self.inner.write_all(&filtered)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
