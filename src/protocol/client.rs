use std::{
    fs::File,
    io::{self, Read, Write},
    net::TcpStream,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use log::{debug, info};
use thiserror::Error;

use super::{CHUNK_SIZE, LengthHeader, ProtocolTransport, TransportError};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to read '{}': {source}", path.display())]
    Source {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read payload: {0}")]
    Read(#[source] io::Error),
    #[error("'{}' is {size} bytes; at most {} bytes can be sent", path.display(), u32::MAX)]
    FileTooLarge { path: PathBuf, size: u64 },
    #[error("payload source ended after {sent} of {expected} bytes")]
    SourceTruncated { sent: u64, expected: u32 },
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// A file opened and sized for sending, before any connection exists.
pub struct PayloadFile {
    file: File,
    path: PathBuf,
    length: u32,
}

impl PayloadFile {
    /// Opens `path` and checks that its size fits the length header.
    pub fn open(path: &Path) -> Result<Self, ClientError> {
        let source = |source| ClientError::Source {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(source)?;
        let size = file.metadata().map_err(source)?.len();
        let length = u32::try_from(size).map_err(|_| ClientError::FileTooLarge {
            path: path.to_path_buf(),
            size,
        })?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
            length,
        })
    }

    pub fn len(&self) -> u32 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// Sends one payload per connection and returns the server's printable count.
pub struct Client<T: Read + Write> {
    transport: ProtocolTransport<T>,
    chunk_size: NonZeroUsize,
}

impl Client<TcpStream> {
    pub fn connect(host: &str, port: u16) -> Result<Self, ClientError> {
        let address = format!("{host}:{port}");
        let stream = TcpStream::connect((host, port)).map_err(|source| ClientError::Connect {
            address: address.clone(),
            source,
        })?;

        info!("connected to {address}");
        Ok(Self::new(stream))
    }
}

impl<T: Read + Write> Client<T> {
    pub fn new(stream: T) -> Self {
        Self {
            transport: ProtocolTransport::new(stream),
            chunk_size: CHUNK_SIZE,
        }
    }

    /// Overrides the payload chunk size.
    pub fn with_chunk_size(mut self, chunk_size: NonZeroUsize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sends the contents of an opened file and returns the printable count.
    pub fn count_file(self, payload: PayloadFile) -> Result<u32, ClientError> {
        debug!("sending '{}' ({} bytes)", payload.path.display(), payload.length);
        self.count(payload.length, payload.file)
    }

    /// Sends `length` bytes read from `source` and returns the printable count.
    ///
    /// Exactly `length` bytes are sent; a source that runs dry first is an error.
    pub fn count<R: Read>(mut self, length: u32, source: R) -> Result<u32, ClientError> {
        self.transport.write_header(LengthHeader(length))?;

        let sent = self.send_payload(source.take(u64::from(length)))?;
        if sent < u64::from(length) {
            return Err(ClientError::SourceTruncated {
                sent,
                expected: length,
            });
        }

        let count = self.transport.read_count()?;
        debug!("server counted {} printable bytes", count.get());
        Ok(count.get())
    }

    fn send_payload<R: Read>(&mut self, mut source: R) -> Result<u64, ClientError> {
        let mut buffer = vec![0u8; self.chunk_size.get()];
        let mut sent = 0u64;

        loop {
            let n = match source.read(&mut buffer) {
                Ok(0) => return Ok(sent),
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ClientError::Read(e)),
            };

            self.transport.reliable_send(&buffer[..n])?;
            sent += n as u64;
        }
    }
}
