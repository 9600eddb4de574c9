use std::io::{self, Read};

use crate::log::{ltrace, lwarn};
use crate::predictor::HorizontalPredictor;

const DEFAULT_CAPACITY: usize = 8192;
/// Room for at least one incomplete sample plus new data.
const MIN_CAPACITY: usize = 16;

/// Reverses horizontal differencing on the fly while reading from a
/// decompressing reader.
pub struct PredictorReader<R> {
    inner: R,
    predictor: HorizontalPredictor,
    buffer: Vec<u8>,
    /// The next byte to hand out.
    pos: usize,
    /// The end of the bytes whose differencing has been reversed.
    decoded: usize,
    /// The end of the bytes read from `inner`.
    filled: usize,
    eof: bool,
}

impl<R: Read> PredictorReader<R> {
    /// Create a new reader with a default buffer size.
    pub fn new(inner: R, predictor: HorizontalPredictor) -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, inner, predictor)
    }

    /// Create a new reader with a buffer of (at least) `capacity` bytes.
    pub fn with_capacity(capacity: usize, inner: R, predictor: HorizontalPredictor) -> Self {
        Self {
            inner,
            predictor,
            buffer: vec![0; capacity.max(MIN_CAPACITY)],
            pos: 0,
            decoded: 0,
            filled: 0,
            eof: false,
        }
    }

    /// The predictor used by this reader.
    pub fn predictor(&self) -> &HorizontalPredictor {
        &self.predictor
    }

    /// Return the underlying reader. Buffered bytes are lost.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill(&mut self) -> io::Result<()> {
        // Keep the bytes of an incomplete sample for the next round.
        self.buffer.copy_within(self.decoded..self.filled, 0);
        self.filled -= self.decoded;
        self.decoded = 0;
        self.pos = 0;

        let n = loop {
            match self.inner.read(&mut self.buffer[self.filled..]) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };

        if n == 0 {
            self.eof = true;

            if self.filled > 0 {
                lwarn!(
                    "data ends with an incomplete sample of {} bytes",
                    self.filled
                );
            }

            self.decoded = self.filled;
        } else {
            self.filled += n;
            self.decoded = self.predictor.reverse(&mut self.buffer, 0, self.filled);

            ltrace!(
                "read {} bytes, {} ready, {} held back",
                n,
                self.decoded,
                self.filled - self.decoded
            );
        }

        Ok(())
    }
}

impl<R: Read> Read for PredictorReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.pos == self.decoded && !self.eof {
            self.fill()?;
        }

        let available = &self.buffer[self.pos..self.decoded];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.pos += n;

        Ok(n)
    }
}
