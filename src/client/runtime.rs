// ABOUTME: The dispatch core: owns the socket halves and runs the four cooperating loops
// ABOUTME: keep-alive, dequeue/send, receive and the writer draining the single send channel

use crate::client::config::{SmppConfig, generate_id};
use crate::client::correlator::{Correlator, InMemoryCorrelator};
use crate::client::error::{SmppError, SmppResult};
use crate::client::message::{Message, SubmitSmMessage};
use crate::client::ratelimit::{self, RateLimiter, TokenBucket};
use crate::client::sequence::{
    MAX_SEQUENCE_NUMBER, MIN_SEQUENCE_NUMBER, MonotonicSequence, SequenceGenerator,
};
use crate::client::session::SessionState;
use crate::client::throttle::{RollingWindowThrottle, ThrottleHandler};
use crate::client::traits::{Broker, Hook};
use crate::codec::CodecRegistry;
use crate::connection::{Connection, FrameReader, FrameWriter};
use crate::datatypes::{
    BindTransceiver, CommandId, CommandStatus, DeliverSmResponse, EnquireLink,
    EnquireLinkResponse, InterfaceVersion, MAX_SHORT_MESSAGE_LENGTH, SubmitSm, ToBytes, Unbind,
    UnbindResponse,
};
use crate::frame::Frame;
use bytes::Bytes;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

/// How long the shutdown sequence waits for the unbind_resp before closing
/// the socket anyway.
const UNBIND_RESP_TIMEOUT: Duration = Duration::from_secs(5);

/// One serialized PDU on its way to the writer loop.
struct Outbound {
    command: CommandId,
    log_id: String,
    bytes: Bytes,
}

/// Requests a graceful shutdown of a running client. Cheap to clone and
/// safe to trigger from any task; the first call wins and the rest are
/// no-ops.
#[derive(Clone)]
pub struct ShutdownHandle {
    shutdown: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }
}

/// An SMPP v3.4 transceiver client.
///
/// Construction connects the TCP transport (session OPEN); [`Client::bind`]
/// issues the bind_transceiver; [`Client::run`] then drives the session:
///
/// ```text
/// keep-alive loop ---\
/// dequeue/send loop ---+--> send channel --> writer loop --> socket
/// receive loop <------------------------------------------- socket
/// ```
///
/// The socket has exactly one reader (the receive loop) and one writer (the
/// writer loop); everything else funnels PDUs through the unbounded send
/// channel, so no lock guards the wire.
pub struct Client<B: Broker, H: Hook> {
    core: Arc<Core<B, H>>,
    connection: Connection,
    outbound_rx: mpsc::UnboundedReceiver<Outbound>,
}

/// Builds a [`Client`], letting integrations swap any of the pluggable
/// subsystems before connecting.
pub struct ClientBuilder<B: Broker, H: Hook> {
    config: SmppConfig,
    broker: B,
    hook: H,
    codecs: CodecRegistry,
    sequence: Option<Box<dyn SequenceGenerator>>,
    correlator: Option<Box<dyn Correlator>>,
    rate_limiter: Option<Box<dyn RateLimiter>>,
    throttle: Option<Box<dyn ThrottleHandler>>,
}

impl<B: Broker, H: Hook> ClientBuilder<B, H> {
    pub fn new(config: SmppConfig, broker: B, hook: H) -> ClientBuilder<B, H> {
        ClientBuilder {
            config,
            broker,
            hook,
            codecs: CodecRegistry::new(),
            sequence: None,
            correlator: None,
            rate_limiter: None,
            throttle: None,
        }
    }

    /// Replace the codec registry (e.g. with custom alphabets registered).
    pub fn codecs(mut self, codecs: CodecRegistry) -> Self {
        self.codecs = codecs;
        self
    }

    pub fn sequence_generator(mut self, sequence: Box<dyn SequenceGenerator>) -> Self {
        self.sequence = Some(sequence);
        self
    }

    pub fn correlator(mut self, correlator: Box<dyn Correlator>) -> Self {
        self.correlator = Some(correlator);
        self
    }

    pub fn rate_limiter(mut self, rate_limiter: Box<dyn RateLimiter>) -> Self {
        self.rate_limiter = Some(rate_limiter);
        self
    }

    pub fn throttle_handler(mut self, throttle: Box<dyn ThrottleHandler>) -> Self {
        self.throttle = Some(throttle);
        self
    }

    /// Validate the configuration and open the TCP connection. The session
    /// is OPEN afterwards; call [`Client::bind`] next.
    pub async fn connect(self) -> SmppResult<Client<B, H>> {
        self.config.validate()?;
        let connection = Connection::connect(
            &self.config.smsc_host,
            self.config.smsc_port,
            self.config.connect_timeout,
        )
        .await?;
        info!(
            client_id = %self.config.client_id,
            smsc_host = %self.config.smsc_host,
            smsc_port = self.config.smsc_port,
            "connected to smsc"
        );

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (state_tx, _) = watch::channel(SessionState::Open);
        let (shutdown_tx, _) = watch::channel(false);

        let sequence = self
            .sequence
            .unwrap_or_else(|| Box::new(MonotonicSequence::new()));
        let correlator = self
            .correlator
            .unwrap_or_else(|| Box::new(InMemoryCorrelator::new(self.config.correlator_ttl)));
        let rate_limiter = self.rate_limiter.unwrap_or_else(|| {
            Box::new(TokenBucket::new(
                self.config.send_rate,
                self.config.max_tokens,
                self.config.delay_for_tokens,
            ))
        });
        let throttle = self.throttle.unwrap_or_else(|| {
            Box::new(RollingWindowThrottle::new(
                self.config.sampling_period,
                self.config.sample_size,
                self.config.deny_request_at,
                self.config.throttle_wait,
            ))
        });

        let core = Arc::new(Core {
            config: self.config,
            codecs: self.codecs,
            broker: self.broker,
            hook: self.hook,
            sequence,
            correlator,
            rate_limiter,
            throttle,
            state: state_tx,
            outbound: outbound_tx,
            shutdown: Arc::new(shutdown_tx),
            fatal: Mutex::new(None),
        });

        Ok(Client {
            core,
            connection,
            outbound_rx,
        })
    }
}

impl<B: Broker, H: Hook> Client<B, H> {
    /// Connect with the default subsystems. See [`ClientBuilder`] to swap
    /// any of them.
    pub async fn connect(config: SmppConfig, broker: B, hook: H) -> SmppResult<Client<B, H>> {
        ClientBuilder::new(config, broker, hook).connect().await
    }

    /// Issue the bind_transceiver. The bind response is processed by the
    /// receive loop once [`Client::run`] is driving the session; watch
    /// [`Client::session_states`] for the OPEN -> BOUND_TRX transition.
    pub async fn bind(&self) -> SmppResult<()> {
        self.core.bind().await
    }

    /// Enqueue a short message onto the broker with the configured PDU
    /// defaults.
    pub async fn submit_sm(
        &self,
        short_message: impl Into<String>,
        log_id: impl Into<String>,
        source_addr: impl Into<String>,
        destination_addr: impl Into<String>,
    ) -> SmppResult<()> {
        let message = Message::SubmitSm(SubmitSmMessage::from_config(
            &self.core.config,
            short_message,
            log_id,
            source_addr,
            destination_addr,
        ));
        self.core.broker.enqueue(message).await
    }

    /// Enqueue an already-built message onto the broker.
    pub async fn enqueue(&self, message: Message) -> SmppResult<()> {
        self.core.broker.enqueue(message).await
    }

    /// Current session state.
    pub fn session_state(&self) -> SessionState {
        self.core.session_state()
    }

    /// A watch on session-state transitions.
    pub fn session_states(&self) -> watch::Receiver<SessionState> {
        self.core.state.subscribe()
    }

    /// Handle for requesting a graceful shutdown while `run` owns the
    /// client.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            shutdown: self.core.shutdown.clone(),
        }
    }

    /// The client configuration.
    pub fn config(&self) -> &SmppConfig {
        &self.core.config
    }

    /// Drive the session until shutdown or a fatal transport error.
    ///
    /// Shutdown proceeds in order: stop accepting dequeues, send unbind,
    /// await the unbind_resp up to a bounded timeout, close the socket.
    /// In-flight correlation entries are left to expire via TTL.
    pub async fn run(self) -> SmppResult<()> {
        let Client {
            core,
            connection,
            outbound_rx,
        } = self;
        let (reader, writer) = connection.into_split();
        let (terminate_tx, terminate_rx) = watch::channel(false);

        let write_task = tokio::spawn(
            core.clone()
                .write_loop(writer, outbound_rx, terminate_rx.clone()),
        );
        let receive_task = tokio::spawn(core.clone().receive_loop(reader, terminate_rx));
        let keepalive_task = tokio::spawn(core.clone().keepalive_loop(core.shutdown.subscribe()));
        let dequeue_task = tokio::spawn(core.clone().dequeue_loop(core.shutdown.subscribe()));

        // Sleep until a shutdown is requested, either by the application or
        // by a loop hitting a fatal error.
        let mut shutdown_rx = core.shutdown.subscribe();
        if !*shutdown_rx.borrow() {
            let _ = shutdown_rx.changed().await;
        }
        info!(client_id = %core.config.client_id, "shutting down");

        // Graceful unbind while the receive and writer loops are still up.
        if core.fatal.lock().unwrap().is_none()
            && core.session_state() == SessionState::BoundTrx
        {
            match core.unbind().await {
                Ok(()) => {
                    let mut states = core.state.subscribe();
                    let unbound = tokio::time::timeout(
                        UNBIND_RESP_TIMEOUT,
                        states.wait_for(|s| *s == SessionState::Closed),
                    )
                    .await;
                    if unbound.is_err() {
                        warn!("no unbind_resp within {UNBIND_RESP_TIMEOUT:?}; closing anyway");
                    }
                }
                Err(e) => warn!(error = %e, "unbind not sent"),
            }
        }

        let _ = terminate_tx.send(true);
        let _ = tokio::join!(write_task, receive_task, keepalive_task, dequeue_task);
        let _ = core.state.send(SessionState::Closed);

        match core.fatal.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// State shared by the four loops.
struct Core<B: Broker, H: Hook> {
    config: SmppConfig,
    codecs: CodecRegistry,
    broker: B,
    hook: H,
    sequence: Box<dyn SequenceGenerator>,
    correlator: Box<dyn Correlator>,
    rate_limiter: Box<dyn RateLimiter>,
    throttle: Box<dyn ThrottleHandler>,
    state: watch::Sender<SessionState>,
    outbound: mpsc::UnboundedSender<Outbound>,
    shutdown: Arc<watch::Sender<bool>>,
    fatal: Mutex<Option<SmppError>>,
}

impl<B: Broker, H: Hook> Core<B, H> {
    fn session_state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Record the first fatal error and trip the shutdown signal.
    fn fail(&self, e: SmppError) {
        let mut fatal = self.fatal.lock().unwrap();
        if fatal.is_none() {
            *fatal = Some(e);
        }
        drop(fatal);
        let _ = self.shutdown.send(true);
    }

    fn issue_sequence(&self) -> SmppResult<u32> {
        let n = self.sequence.next_sequence();
        // a third-party generator must stay inside the SMPP range
        if !(MIN_SEQUENCE_NUMBER..=MAX_SEQUENCE_NUMBER).contains(&n) {
            return Err(SmppError::Config(format!(
                "sequence generator produced {n}, outside [1, {MAX_SEQUENCE_NUMBER}]"
            )));
        }
        Ok(n)
    }

    /// The shared send path: admissibility check, request hook, then hand
    /// the bytes to the writer loop. Nothing reaches the wire from a state
    /// that does not admit it.
    async fn send_pdu(
        &self,
        command: CommandId,
        log_id: &str,
        hook_metadata: &str,
        bytes: Bytes,
    ) -> SmppResult<()> {
        self.session_state().admit(command)?;
        if let Err(e) = self.hook.before_send(command, log_id, hook_metadata).await {
            warn!(%command, log_id, error = %e, "request hook failed");
        }
        // log the command, never the payload: bind PDUs carry the password
        debug!(%command, log_id, octets = bytes.len(), "pdu handed to writer");
        self.outbound
            .send(Outbound {
                command,
                log_id: log_id.to_string(),
                bytes,
            })
            .map_err(|_| SmppError::ConnectionClosed)
    }

    async fn bind(&self) -> SmppResult<()> {
        let sequence_number = self.issue_sequence()?;
        let log_id = generate_id();
        self.correlator.put(sequence_number, &log_id, "");

        let pdu = BindTransceiver {
            command_status: CommandStatus::Ok,
            sequence_number,
            system_id: self.config.system_id.clone(),
            password: (!self.config.password.is_empty()).then(|| self.config.password.clone()),
            system_type: self.config.system_type.clone(),
            interface_version: InterfaceVersion::SmppV34,
            addr_ton: self.config.addr_ton,
            addr_npi: self.config.addr_npi,
            address_range: self.config.address_range.clone(),
        };
        info!(
            log_id,
            system_id = %self.config.system_id,
            password = "<redacted>",
            "binding as transceiver"
        );
        self.send_pdu(CommandId::BindTransceiver, &log_id, "", pdu.to_bytes())
            .await
    }

    async fn unbind(&self) -> SmppResult<()> {
        let sequence_number = self.issue_sequence()?;
        let log_id = generate_id();
        self.correlator.put(sequence_number, &log_id, "");

        let pdu = Unbind {
            command_status: CommandStatus::Ok,
            sequence_number,
        };
        self.send_pdu(CommandId::Unbind, &log_id, "", pdu.to_bytes())
            .await
    }

    /// T1: periodic enquire_link while the session is bound.
    async fn keepalive_loop(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        loop {
            if *shutdown.borrow() {
                return;
            }
            tokio::select! {
                _ = tokio::time::sleep(self.config.enquire_link_interval) => {}
                _ = shutdown.changed() => return,
            }
            if self.session_state() != SessionState::BoundTrx {
                continue;
            }
            if let Err(e) = self.enquire_link().await {
                warn!(error = %e, "keep-alive enquire_link not sent");
            }
        }
    }

    async fn enquire_link(&self) -> SmppResult<()> {
        let sequence_number = self.issue_sequence()?;
        let log_id = generate_id();
        self.correlator.put(sequence_number, &log_id, "");

        let pdu = EnquireLink { sequence_number };
        self.send_pdu(CommandId::EnquireLink, &log_id, "", pdu.to_bytes())
            .await
    }

    /// T2: pull messages from the broker and send them, gated by the
    /// throttle controller and the rate limiter. The gates run before the
    /// dequeue so no message is pulled and then stalled in-task.
    async fn dequeue_loop(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut failures: u32 = 0;
        loop {
            if *shutdown.borrow() {
                return;
            }

            if !self.throttle.allow_request() {
                let wait = self.throttle.delay();
                info!(?wait, "throttle controller denied the next send");
                tokio::select! {
                    _ = tokio::time::sleep(wait) => continue,
                    _ = shutdown.changed() => return,
                }
            }

            tokio::select! {
                _ = ratelimit::acquire(self.rate_limiter.as_ref()) => {}
                _ = shutdown.changed() => return,
            }

            let message = tokio::select! {
                result = self.broker.dequeue() => match result {
                    Ok(message) => {
                        failures = 0;
                        message
                    }
                    Err(e) => {
                        let wait = retry_after(failures);
                        failures += 1;
                        error!(
                            error = %e,
                            wait_secs = wait.as_secs(),
                            failures,
                            "broker dequeue failed; backing off"
                        );
                        tokio::select! {
                            _ = tokio::time::sleep(wait) => continue,
                            _ = shutdown.changed() => return,
                        }
                    }
                },
                _ = shutdown.changed() => return,
            };

            let log_id = message.log_id().to_string();
            let command = message.command_id();
            if let Err(e) = self.dispatch_message(message).await {
                // a message that cannot be built or sent is logged and
                // dropped; the loop keeps serving the queue
                warn!(%command, log_id, error = %e, "message dropped");
            }
        }
    }

    /// Turn one broker message into a PDU and hand it to the send path.
    async fn dispatch_message(&self, message: Message) -> SmppResult<()> {
        match message {
            Message::SubmitSm(m) => {
                let (sequence_number, bytes) = self.build_submit_sm(&m)?;
                self.correlator
                    .put(sequence_number, &m.log_id, &m.hook_metadata);
                self.send_pdu(CommandId::SubmitSm, &m.log_id, &m.hook_metadata, bytes)
                    .await
            }
            Message::EnquireLinkResp {
                log_id,
                sequence_number,
            } => {
                let pdu = EnquireLinkResponse { sequence_number };
                self.send_pdu(CommandId::EnquireLinkResp, &log_id, "", pdu.to_bytes())
                    .await
            }
            Message::DeliverSmResp {
                log_id,
                sequence_number,
                message_id,
            } => {
                let pdu = DeliverSmResponse {
                    command_status: CommandStatus::Ok,
                    sequence_number,
                    message_id,
                };
                self.send_pdu(CommandId::DeliverSmResp, &log_id, "", pdu.to_bytes())
                    .await
            }
            Message::UnbindResp {
                log_id,
                sequence_number,
            } => {
                let pdu = UnbindResponse {
                    command_status: CommandStatus::Ok,
                    sequence_number,
                };
                self.send_pdu(CommandId::UnbindResp, &log_id, "", pdu.to_bytes())
                    .await
            }
        }
    }

    fn build_submit_sm(&self, m: &SubmitSmMessage) -> SmppResult<(u32, Bytes)> {
        let encoded =
            self.codecs
                .encode(&m.encoding, &m.short_message, self.config.codec_errors)?;
        if encoded.len() > MAX_SHORT_MESSAGE_LENGTH {
            return Err(SmppError::MessageTooLong {
                octets: encoded.len(),
            });
        }
        let data_coding = self.codecs.data_coding(&m.encoding)?;
        let sequence_number = self.issue_sequence()?;

        let pdu = SubmitSm {
            command_status: CommandStatus::Ok,
            sequence_number,
            service_type: m.service_type.clone(),
            source_addr_ton: m.source_addr_ton,
            source_addr_npi: m.source_addr_npi,
            source_addr: m.source_addr.clone(),
            dest_addr_ton: m.dest_addr_ton,
            dest_addr_npi: m.dest_addr_npi,
            destination_addr: m.destination_addr.clone(),
            esm_class: m.esm_class,
            protocol_id: m.protocol_id,
            priority_flag: m.priority_flag,
            schedule_delivery_time: m.schedule_delivery_time.clone(),
            validity_period: m.validity_period.clone(),
            registered_delivery: m.registered_delivery,
            replace_if_present_flag: m.replace_if_present_flag,
            data_coding,
            sm_default_msg_id: m.sm_default_msg_id,
            short_message: Bytes::from(encoded),
            tlvs: Vec::new(),
        };
        Ok((sequence_number, pdu.to_bytes()))
    }

    /// T3: read frames and route each one through the command handlers.
    /// Exits on the terminate signal; EOF enters the backoff schedule (a
    /// reconnect layer above may re-initiate connect+bind).
    async fn receive_loop(
        self: Arc<Self>,
        mut reader: FrameReader,
        mut terminate: watch::Receiver<bool>,
    ) {
        let mut failures: u32 = 0;
        loop {
            let read = tokio::select! {
                result = reader.read_frame() => result,
                _ = terminate.changed() => return,
            };
            match read {
                Ok(Some(frame)) => {
                    failures = 0;
                    self.handle_frame(frame).await;
                }
                Ok(None) => {
                    let _ = self.state.send(SessionState::Closed);
                    if *terminate.borrow() || *self.shutdown.borrow() {
                        return;
                    }
                    let wait = retry_after(failures);
                    failures += 1;
                    warn!(
                        wait_secs = wait.as_secs(),
                        failures, "smsc closed the connection; backing off"
                    );
                    tokio::select! {
                        _ = tokio::time::sleep(wait) => {}
                        _ = terminate.changed() => return,
                    }
                }
                Err(e) => {
                    let e: SmppError = e.into();
                    error!(error = %e, "closing session on unreadable inbound data");
                    let _ = self.state.send(SessionState::Closed);
                    self.fail(e);
                    return;
                }
            }
        }
    }

    /// Route one inbound PDU to its per-command handling, then always
    /// invoke the response hook with whatever the correlator resolved.
    async fn handle_frame(&self, frame: Frame) {
        let command = frame.command_id();
        let status = frame.command_status();
        let sequence_number = frame.sequence_number();
        let (log_id, hook_metadata) = self.correlator.get(sequence_number);

        if !status.is_ok() {
            warn!(%command, log_id, %status, "smsc reported an error status");
        } else {
            debug!(%command, log_id, sequence_number, "pdu received");
        }

        // SMSC responses feed the throttle controller's rolling window
        if command.is_response() {
            if status.is_throttled() {
                self.throttle.throttled();
            } else {
                self.throttle.not_throttled();
            }
        }

        match &frame {
            Frame::BindTransceiverResponse(resp) => {
                if status.is_ok() {
                    let _ = self.state.send(SessionState::BoundTrx);
                    info!(smsc_system_id = %resp.system_id, "bound as transceiver");
                } else {
                    error!(
                        error = %SmppError::BindRejected(status),
                        "session remains OPEN"
                    );
                }
            }
            Frame::SubmitSmResponse(resp) => {
                debug!(message_id = %resp.message_id, log_id, "submit_sm acknowledged");
            }
            Frame::DeliverSm(_) => {
                // acknowledge with the same sequence number and an empty
                // message_id, through the internal send channel so queued
                // submissions cannot starve the response
                let resp = Message::DeliverSmResp {
                    log_id: generate_id(),
                    sequence_number,
                    message_id: String::new(),
                };
                if let Err(e) = self.dispatch_message(resp).await {
                    warn!(error = %e, "deliver_sm_resp not sent");
                }
            }
            Frame::EnquireLink(_) => {
                let resp = Message::EnquireLinkResp {
                    log_id: generate_id(),
                    sequence_number,
                };
                if let Err(e) = self.dispatch_message(resp).await {
                    warn!(error = %e, "enquire_link_resp not sent");
                }
            }
            Frame::EnquireLinkResponse(_) => {}
            Frame::Unbind(_) => {
                let resp = Message::UnbindResp {
                    log_id: generate_id(),
                    sequence_number,
                };
                if let Err(e) = self.dispatch_message(resp).await {
                    warn!(error = %e, "unbind_resp not sent");
                }
                let _ = self.state.send(SessionState::Closed);
                info!("smsc unbound the session");
            }
            Frame::UnbindResponse(_) => {
                let _ = self.state.send(SessionState::Closed);
                info!("unbind acknowledged; session closed");
            }
            Frame::GenericNack(_) => {}
            Frame::BindTransceiver(_) | Frame::SubmitSm(_) | Frame::DeliverSmResponse(_) => {
                // an SMSC has no business sending these to an ESME
                warn!(%command, sequence_number, "ignoring unexpected peer pdu");
            }
        }

        if let Err(e) = self
            .hook
            .on_response(command, &log_id, &hook_metadata, status)
            .await
        {
            warn!(%command, log_id, error = %e, "response hook failed");
        }
    }

    /// T4: the only task that touches the socket's write half. Drains the
    /// send channel in submission order; on terminate it flushes what is
    /// already queued and closes the socket.
    async fn write_loop(
        self: Arc<Self>,
        mut writer: FrameWriter,
        mut outbound: mpsc::UnboundedReceiver<Outbound>,
        mut terminate: watch::Receiver<bool>,
    ) {
        loop {
            tokio::select! {
                item = outbound.recv() => match item {
                    Some(item) => {
                        if let Err(e) = writer.write_pdu(&item.bytes).await {
                            error!(
                                command = %item.command,
                                log_id = %item.log_id,
                                error = %e,
                                "socket write failed"
                            );
                            let _ = self.state.send(SessionState::Closed);
                            self.fail(SmppError::Transport(e));
                            return;
                        }
                        debug!(
                            command = %item.command,
                            log_id = %item.log_id,
                            octets = item.bytes.len(),
                            "pdu written"
                        );
                    }
                    None => break,
                },
                _ = terminate.changed() => {
                    // flush anything already queued (the unbind in
                    // particular), then close
                    while let Ok(item) = outbound.try_recv() {
                        if writer.write_pdu(&item.bytes).await.is_err() {
                            break;
                        }
                    }
                    break;
                }
            }
        }
        let _ = writer.shutdown().await;
    }
}

/// Transport/broker backoff schedule: 1, 2, 4, 8, 16, 32 minutes, then 16
/// minutes from there on.
fn retry_after(failures: u32) -> Duration {
    let minutes = if failures >= 6 { 16 } else { 1u64 << failures };
    Duration::from_secs(minutes * 60)
}
