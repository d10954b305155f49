use std::io::{self, Read, Write};

use bincode::{
    Decode, Encode,
    config::{BigEndian, Configuration, Fixint},
    decode_from_slice, encode_into_slice,
};
use log::trace;
use thiserror::Error;

use super::{LengthHeader, MESSAGE_SIZE, PrintableCount};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to encode message: {0}")]
    Serialize(#[from] bincode::error::EncodeError),
    #[error("failed to decode message: {0}")]
    Deserialize(#[from] bincode::error::DecodeError),
    #[error("connection closed after {transferred} of {expected} bytes")]
    Closed { transferred: usize, expected: usize },
    #[error("no buffer space to receive {expected} payload bytes")]
    EmptyBuffer { expected: usize },
    #[error("Transport IO Error after {transferred} bytes: {source}")]
    Io {
        transferred: usize,
        #[source]
        source: io::Error,
    },
}

impl TransportError {
    /// Bytes moved by the failing call before it gave up.
    pub fn transferred(&self) -> usize {
        match self {
            TransportError::Closed { transferred, .. } | TransportError::Io { transferred, .. } => {
                *transferred
            }
            _ => 0,
        }
    }
}

/// Moves exact byte counts over a stream that may fragment delivery arbitrarily.
pub struct ProtocolTransport<T: Read + Write> {
    stream: T,
    config: Configuration<BigEndian, Fixint>,
}

impl<T: Read + Write> ProtocolTransport<T> {
    pub fn new(stream: T) -> Self {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_fixed_int_encoding();
        Self { stream, config }
    }

    pub fn into_inner(self) -> T {
        self.stream
    }

    /// Writes all of `data`, looping over short writes.
    ///
    /// A write that accepts zero bytes means the peer is gone.
    pub fn reliable_send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let mut sent = 0;
        while sent < data.len() {
            match self.stream.write(&data[sent..]) {
                Ok(0) => {
                    return Err(TransportError::Closed {
                        transferred: sent,
                        expected: data.len(),
                    });
                }
                Ok(n) => {
                    trace!("sent {n} bytes ({}/{})", sent + n, data.len());
                    sent += n;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(TransportError::Io {
                        transferred: sent,
                        source,
                    });
                }
            }
        }
        self.stream.flush().map_err(|source| TransportError::Io {
            transferred: sent,
            source,
        })
    }

    /// Fills `buf` completely, looping over short reads.
    ///
    /// Short reads are expected; only end-of-stream or an I/O error before `buf`
    /// is full is an error. The error records how much of `buf` was filled.
    pub fn reliable_receive(&mut self, buf: &mut [u8]) -> Result<(), TransportError> {
        let mut received = 0;
        while received < buf.len() {
            match self.stream.read(&mut buf[received..]) {
                Ok(0) => {
                    return Err(TransportError::Closed {
                        transferred: received,
                        expected: buf.len(),
                    });
                }
                Ok(n) => {
                    trace!("received {n} bytes ({}/{})", received + n, buf.len());
                    received += n;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(TransportError::Io {
                        transferred: received,
                        source,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn write_header(&mut self, header: LengthHeader) -> Result<(), TransportError> {
        self.write_message(header)
    }

    pub fn read_header(&mut self) -> Result<LengthHeader, TransportError> {
        self.read_message()
    }

    pub fn write_count(&mut self, count: PrintableCount) -> Result<(), TransportError> {
        self.write_message(count)
    }

    pub fn read_count(&mut self) -> Result<PrintableCount, TransportError> {
        self.read_message()
    }

    fn write_message<M: Encode>(&mut self, message: M) -> Result<(), TransportError> {
        let mut buf = [0u8; MESSAGE_SIZE];
        encode_into_slice(message, &mut buf, self.config)?;
        self.reliable_send(&buf)
    }

    fn read_message<M: Decode<()>>(&mut self) -> Result<M, TransportError> {
        let mut buf = [0u8; MESSAGE_SIZE];
        self.reliable_receive(&mut buf)?;
        let (message, _) = decode_from_slice(&buf, self.config)?;
        Ok(message)
    }
}
