pub mod histogram;
pub mod protocol;

pub use histogram::CharHistogram;
pub use protocol::{Client, CountingServer, ProtocolTransport};
