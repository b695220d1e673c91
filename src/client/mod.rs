// ABOUTME: SMPP client module: configuration, capability traits and the transceiver runtime
// ABOUTME: Exports the Client, its builder, the pluggable subsystem traits and their default implementations

//! SMPP transceiver client.
//!
//! The client binds to an SMSC as a transceiver and then runs four
//! cooperating tasks over one TCP connection:
//!
//! * **keep-alive** - periodic enquire_link while bound
//! * **dequeue/send** - pulls messages off the [`Broker`], builds PDUs and
//!   submits them, gated by the throttle controller and the rate limiter
//! * **receive** - parses inbound frames and routes them through the
//!   command handlers
//! * **writer** - the single task that writes to the socket, draining an
//!   internal send channel
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use esme::client::{Client, InMemoryBroker, LoggingHook, SmppConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), esme::client::SmppError> {
//! let config = SmppConfig::new("smsc.example.net", 2775, "smppclient1", "password");
//! let broker = Arc::new(InMemoryBroker::new(1000));
//!
//! let client = Client::connect(config, broker.clone(), LoggingHook).await?;
//! client.bind().await?;
//!
//! client.submit_sm("Hello", "msg-0001", "254700000000", "254711999999").await?;
//!
//! let shutdown = client.shutdown_handle();
//! tokio::spawn(async move {
//!     // ... when the application is done:
//!     shutdown.shutdown();
//! });
//! client.run().await?;
//! # Ok(())
//! # }
//! ```
//!
//! Every subsystem with behavior worth swapping is a capability trait:
//! [`Broker`], [`Hook`], [`SequenceGenerator`], [`Correlator`],
//! [`RateLimiter`] and [`ThrottleHandler`], with defaults wired up by
//! [`ClientBuilder`].

pub mod config;
pub mod correlator;
pub mod error;
pub mod message;
pub mod ratelimit;
pub mod runtime;
pub mod sequence;
pub mod session;
pub mod throttle;
pub mod traits;

pub use config::SmppConfig;
pub use correlator::{Correlator, InMemoryCorrelator};
pub use error::{SmppError, SmppResult};
pub use message::{Message, SubmitSmMessage};
pub use ratelimit::{RateLimiter, TokenBucket};
pub use runtime::{Client, ClientBuilder, ShutdownHandle};
pub use sequence::{MonotonicSequence, SequenceGenerator};
pub use session::SessionState;
pub use throttle::{RollingWindowThrottle, ThrottleHandler};
pub use traits::{Broker, Hook, InMemoryBroker, LoggingHook};
