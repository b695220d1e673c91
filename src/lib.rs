pub mod client;
pub mod codec;
pub mod connection;
pub mod datatypes;
pub mod frame;

#[cfg(test)]
mod tests;

// Re-export the codec surface for direct access
pub use codec::{CodecError, CodecRegistry, ErrorPolicy, TextCodec};

// Re-export the main client API for easy access
pub use client::{
    Broker, Client, ClientBuilder, Hook, InMemoryBroker, LoggingHook, Message, SessionState,
    ShutdownHandle, SmppConfig, SmppError, SmppResult, SubmitSmMessage,
};

/// Error returned by the low-level frame reader.
///
/// The connection layer keeps a boxed error: a partial frame is an expected
/// runtime condition there, and `frame::Error` only needs a concrete shape
/// once it crosses into the client, which converts it to
/// [`client::SmppError`].
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// A specialized `Result` for the connection layer.
pub type Result<T> = std::result::Result<T, Error>;
