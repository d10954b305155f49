use std::{
    io::{self, Read, Write},
    num::NonZeroUsize,
    net::{SocketAddr, TcpListener},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use log::{debug, info, warn};
use thiserror::Error;

use crate::CharHistogram;

use super::{CHUNK_SIZE, PrintableCount, ProtocolTransport, TransportError};

/// How long the accept loop sleeps when no client is waiting.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("Server IO Error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the listener binds to.
    pub address: SocketAddr,
    /// Upper bound on a single payload read.
    pub chunk_size: NonZeroUsize,
    /// Accept loop sleep between shutdown checks.
    pub poll_interval: Duration,
}

impl ServerConfig {
    pub fn new(address: SocketAddr) -> Self {
        Self {
            address,
            chunk_size: CHUNK_SIZE,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Cooperative shutdown flag shared between a signal handler and the accept loop.
#[derive(Debug, Clone, Default)]
pub struct Shutdown(Arc<AtomicBool>);

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Iterative server: one session is handled to completion before the next is accepted.
///
/// The histogram lives as long as the server and is handed back by [`CountingServer::serve`]
/// once shutdown has been requested.
pub struct CountingServer {
    listener: TcpListener,
    config: ServerConfig,
    histogram: CharHistogram,
    shutdown: Shutdown,
}

impl CountingServer {
    pub fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(config.address).map_err(|source| ServerError::Bind {
            address: config.address,
            source,
        })?;
        // Accept must not block forever, or shutdown would never be observed.
        listener.set_nonblocking(true)?;

        Ok(Self {
            listener,
            config,
            histogram: CharHistogram::new(),
            shutdown: Shutdown::new(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Runs the accept loop until shutdown is requested and returns the lifetime histogram.
    ///
    /// Session failures are logged and never end the loop. A peer that stops sending
    /// mid-session stalls the loop, shutdown included, until it disconnects.
    pub fn serve(mut self) -> Result<CharHistogram, ServerError> {
        info!("listening at {}", self.local_addr()?);
        let mut buffer = vec![0u8; self.config.chunk_size.get()];

        while !self.shutdown.is_requested() {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    if let Err(e) = stream.set_nonblocking(false) {
                        warn!("dropping connection from {peer}: {e}");
                        continue;
                    }

                    debug!("accepted connection from {peer}");
                    match handle_session(stream, &mut self.histogram, &mut buffer) {
                        Ok(count) => info!("session with {peer}: {count} printable bytes"),
                        Err(e) => warn!("abandoned session with {peer}: {e}"),
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    thread::sleep(self.config.poll_interval)
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!("broken connection: {e:?}");
                    thread::sleep(self.config.poll_interval);
                }
            }
        }

        info!("shutdown requested; closing listener");
        Ok(self.histogram)
    }
}

/// Runs one session: header, payload, reply.
///
/// Printable bytes are recorded as they arrive, so a session that fails midway still leaves
/// every byte it did receive in `histogram`. `buffer` bounds each read; an empty buffer
/// cannot hold any payload and fails the session once the header announces one.
pub fn handle_session<T: Read + Write>(
    stream: T,
    histogram: &mut CharHistogram,
    buffer: &mut [u8],
) -> Result<u32, TransportError> {
    let mut transport = ProtocolTransport::new(stream);

    let header = transport.read_header()?;
    debug!("expecting {} payload bytes", header.len());

    let mut remaining = header.len() as usize;
    if remaining > 0 && buffer.is_empty() {
        return Err(TransportError::EmptyBuffer {
            expected: remaining,
        });
    }

    let mut printable = 0u32;
    while remaining > 0 {
        let n = remaining.min(buffer.len());
        let chunk = &mut buffer[..n];
        if let Err(e) = transport.reliable_receive(chunk) {
            histogram.record(&chunk[..e.transferred()]);
            return Err(e);
        }

        printable += histogram.record(chunk);
        remaining -= chunk.len();
    }

    transport.write_count(PrintableCount(printable))?;
    Ok(printable)
}
