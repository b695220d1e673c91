// ABOUTME: Capability traits for the client's external collaborators: the outbound broker and the observability hooks
// ABOUTME: Native async-fn-in-trait interfaces plus in-memory/logging defaults for tests and demos

use crate::client::error::SmppError;
use crate::client::message::Message;
use crate::datatypes::{CommandId, CommandStatus};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tracing::info;

/// The outbound queue the dequeue loop feeds from.
///
/// Implementations back this with whatever the deployment uses (memory,
/// Redis, RabbitMQ, ...). The client is the only consumer; ordering across
/// producers is not required. `dequeue` suspends until a message is
/// available and errors surface to the dequeue loop, which backs off and
/// retries.
pub trait Broker: Send + Sync + 'static {
    fn enqueue(&self, message: Message) -> impl Future<Output = Result<(), SmppError>> + Send;

    fn dequeue(&self) -> impl Future<Output = Result<Message, SmppError>> + Send;
}

/// Observability callbacks around the wire.
///
/// `before_send` fires just before a PDU's bytes are handed to the socket;
/// `on_response` fires after each inbound PDU is parsed and routed. Hooks
/// must not block the loop; failures are logged and swallowed, never
/// propagated to the peer.
pub trait Hook: Send + Sync + 'static {
    fn before_send(
        &self,
        command: CommandId,
        log_id: &str,
        hook_metadata: &str,
    ) -> impl Future<Output = Result<(), SmppError>> + Send;

    fn on_response(
        &self,
        command: CommandId,
        log_id: &str,
        hook_metadata: &str,
        status: CommandStatus,
    ) -> impl Future<Output = Result<(), SmppError>> + Send;
}

impl<B: Broker> Broker for Arc<B> {
    async fn enqueue(&self, message: Message) -> Result<(), SmppError> {
        (**self).enqueue(message).await
    }

    async fn dequeue(&self) -> Result<Message, SmppError> {
        (**self).dequeue().await
    }
}

impl<H: Hook> Hook for Arc<H> {
    async fn before_send(
        &self,
        command: CommandId,
        log_id: &str,
        hook_metadata: &str,
    ) -> Result<(), SmppError> {
        (**self).before_send(command, log_id, hook_metadata).await
    }

    async fn on_response(
        &self,
        command: CommandId,
        log_id: &str,
        hook_metadata: &str,
        status: CommandStatus,
    ) -> Result<(), SmppError> {
        (**self)
            .on_response(command, log_id, hook_metadata, status)
            .await
    }
}

/// Bounded in-memory broker for tests and demos.
///
/// Safe for one consumer, per the broker contract. `enqueue` fails once the
/// queue holds `maxsize` messages rather than applying backpressure; a real
/// deployment brings its own broker.
pub struct InMemoryBroker {
    items: Mutex<VecDeque<Message>>,
    available: Notify,
    maxsize: usize,
}

impl InMemoryBroker {
    pub fn new(maxsize: usize) -> InMemoryBroker {
        InMemoryBroker {
            items: Mutex::new(VecDeque::new()),
            available: Notify::new(),
            maxsize,
        }
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Broker for InMemoryBroker {
    async fn enqueue(&self, message: Message) -> Result<(), SmppError> {
        {
            let mut items = self.items.lock().unwrap();
            if items.len() >= self.maxsize {
                return Err(SmppError::Broker(format!(
                    "in-memory broker is full ({} messages)",
                    self.maxsize
                )));
            }
            items.push_back(message);
        }
        self.available.notify_one();
        Ok(())
    }

    async fn dequeue(&self) -> Result<Message, SmppError> {
        loop {
            // register interest before checking, so an enqueue between the
            // check and the await is not lost
            let notified = self.available.notified();
            let popped = self.items.lock().unwrap().pop_front();
            if let Some(message) = popped {
                return Ok(message);
            }
            notified.await;
        }
    }
}

/// Hook that records each event to the structured log and nothing else.
pub struct LoggingHook;

impl Hook for LoggingHook {
    async fn before_send(
        &self,
        command: CommandId,
        log_id: &str,
        hook_metadata: &str,
    ) -> Result<(), SmppError> {
        info!(%command, log_id, hook_metadata, "request");
        Ok(())
    }

    async fn on_response(
        &self,
        command: CommandId,
        log_id: &str,
        hook_metadata: &str,
        status: CommandStatus,
    ) -> Result<(), SmppError> {
        info!(%command, log_id, hook_metadata, %status, "response");
        Ok(())
    }
}
