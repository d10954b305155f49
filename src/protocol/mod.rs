//! Client-server counting protocol.
//!
//! This module defines the wire protocol spoken between a `pcc` client and server, the
//! transport that moves exact byte counts over a TCP stream, and both ends of a session.
//!
//! # Overview
//!
//! A session is a single request/response cycle on one connection. The client announces how
//! many payload bytes it is about to send, streams them, and waits for the server to answer
//! with the number of printable ASCII characters (`32..=126`) it saw in that payload. The
//! server folds every printable byte into a lifetime [`CharHistogram`](crate::CharHistogram).
//!
//! # Binary Format
//!
//! | Direction       | Field            | Encoding           |
//! |-----------------|------------------|--------------------|
//! | client → server | [`LengthHeader`] | `u32`, big-endian  |
//! | client → server | payload          | `length` raw bytes |
//! | server → client | [`PrintableCount`] | `u32`, big-endian |
//!
//! There is no message tag and no versioning; both sides close the connection after the
//! reply.
//!
//! # Framing
//!
//! TCP does not preserve write boundaries. Every read and write goes through
//! [`ProtocolTransport`], which loops until the exact number of bytes has been moved and
//! treats end-of-stream before that point as a failed session.
//!
//! # Key Components
//!
//! - [`ProtocolTransport`]: exact-length send and receive over any `Read + Write` stream.
//! - [`Client`]: sends a payload and returns the server's count.
//! - [`CountingServer`]: iterative accept loop that handles one session at a time.
use std::num::NonZeroUsize;

mod client;
mod request;
mod response;
mod server;
#[cfg(test)]
pub(crate) mod testing;
mod transport;

pub use client::{Client, ClientError, PayloadFile};
pub use request::LengthHeader;
pub use response::PrintableCount;
pub use server::{
    CountingServer, DEFAULT_POLL_INTERVAL, ServerConfig, ServerError, Shutdown, handle_session,
};
pub use transport::{ProtocolTransport, TransportError};

/// Size of every fixed-width protocol message on the wire.
pub const MESSAGE_SIZE: usize = size_of::<u32>();

/// Default payload chunk size used by both ends (1 MiB).
pub const CHUNK_SIZE: NonZeroUsize = NonZeroUsize::new(1024 * 1024).unwrap();
