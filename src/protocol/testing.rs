//! In-memory stream that fragments every read and write.
use std::io::{self, Read, Write};

pub(crate) struct FragmentedStream {
    input: Vec<u8>,
    position: usize,
    output: Vec<u8>,
    max_io: usize,
    write_limit: Option<usize>,
    reset_on_eof: bool,
}

impl FragmentedStream {
    /// Serves `input` to readers and accepts writes, at most `max_io` bytes per call.
    pub(crate) fn new(input: Vec<u8>, max_io: usize) -> Self {
        assert!(max_io > 0);
        Self {
            input,
            position: 0,
            output: Vec::new(),
            max_io,
            write_limit: None,
            reset_on_eof: false,
        }
    }

    /// Accept at most `limit` bytes in total; later writes report zero progress.
    pub(crate) fn write_limit(mut self, limit: usize) -> Self {
        self.write_limit = Some(limit);
        self
    }

    /// Fail with `ConnectionReset` instead of returning end-of-stream.
    pub(crate) fn reset_on_eof(mut self) -> Self {
        self.reset_on_eof = true;
        self
    }

    pub(crate) fn written(&self) -> &[u8] {
        &self.output
    }
}

impl Read for FragmentedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.input.len() - self.position;
        if available == 0 && self.reset_on_eof && !buf.is_empty() {
            return Err(io::Error::from(io::ErrorKind::ConnectionReset));
        }

        let n = available.min(buf.len()).min(self.max_io);
        buf[..n].copy_from_slice(&self.input[self.position..self.position + n]);
        self.position += n;
        Ok(n)
    }
}

impl Write for FragmentedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut n = buf.len().min(self.max_io);
        if let Some(limit) = self.write_limit {
            n = n.min(limit - self.output.len());
        }
        self.output.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
