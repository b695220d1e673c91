//! Client-level tests against an in-process SMSC endpoint.

use crate::client::{
    Broker, Client, Hook, InMemoryBroker, Message, SessionState, SmppConfig, SmppError,
    SubmitSmMessage,
};
use crate::datatypes::{
    BindTransceiverResponse, CommandId, CommandStatus, DeliverSm, EnquireLink, SubmitSmResponse,
    ToBytes, UnbindResponse,
};
use crate::frame::Frame;
use bytes::Bytes;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const TICK: Duration = Duration::from_secs(5);

/// Read one whole PDU off the socket and parse it.
async fn read_frame_from(sock: &mut TcpStream) -> Option<Frame> {
    let mut len_buf = [0u8; 4];
    if sock.read_exact(&mut len_buf).await.is_err() {
        return None;
    }
    let command_length = u32::from_be_bytes(len_buf) as usize;
    let mut pdu = len_buf.to_vec();
    pdu.resize(command_length, 0);
    sock.read_exact(&mut pdu[4..]).await.unwrap();

    let mut cursor = Cursor::new(pdu.as_slice());
    Some(Frame::parse(&mut cursor).unwrap())
}

/// Hook that records everything it sees.
#[derive(Default)]
struct RecordingHook {
    requests: Mutex<Vec<(CommandId, String)>>,
    responses: Mutex<Vec<(CommandId, String, String, CommandStatus)>>,
}

impl RecordingHook {
    fn saw_request(&self, command: CommandId) -> bool {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .any(|(c, _)| *c == command)
    }

    fn responses_for(&self, command: CommandId) -> Vec<(String, String, CommandStatus)> {
        self.responses
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, ..)| *c == command)
            .map(|(_, l, m, s)| (l.clone(), m.clone(), *s))
            .collect()
    }
}

impl Hook for RecordingHook {
    async fn before_send(
        &self,
        command: CommandId,
        log_id: &str,
        _hook_metadata: &str,
    ) -> Result<(), SmppError> {
        self.requests
            .lock()
            .unwrap()
            .push((command, log_id.to_string()));
        Ok(())
    }

    async fn on_response(
        &self,
        command: CommandId,
        log_id: &str,
        hook_metadata: &str,
        status: CommandStatus,
    ) -> Result<(), SmppError> {
        self.responses.lock().unwrap().push((
            command,
            log_id.to_string(),
            hook_metadata.to_string(),
            status,
        ));
        Ok(())
    }
}

struct Harness {
    client: Client<Arc<InMemoryBroker>, Arc<RecordingHook>>,
    broker: Arc<InMemoryBroker>,
    hook: Arc<RecordingHook>,
    server: TcpStream,
}

/// Connect a client to a one-shot in-process listener.
async fn harness(configure: impl FnOnce(&mut SmppConfig)) -> Harness {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = SmppConfig::new(addr.ip().to_string(), addr.port(), "smppclient1", "password");
    configure(&mut config);

    let broker = Arc::new(InMemoryBroker::new(100));
    let hook = Arc::new(RecordingHook::default());

    let accept = tokio::spawn(async move { listener.accept().await.unwrap().0 });
    let client = Client::connect(config, broker.clone(), hook.clone())
        .await
        .unwrap();
    let server = accept.await.unwrap();

    Harness {
        client,
        broker,
        hook,
        server,
    }
}

/// Answer the client's unbind so its shutdown sequence completes promptly.
async fn serve_unbind(server: &mut TcpStream) {
    loop {
        match read_frame_from(server).await {
            Some(Frame::Unbind(unbind)) => {
                let resp = UnbindResponse {
                    command_status: CommandStatus::Ok,
                    sequence_number: unbind.sequence_number,
                };
                server.write_all(&resp.to_bytes()).await.unwrap();
                return;
            }
            Some(_) => continue,
            None => return,
        }
    }
}

#[tokio::test]
async fn bind_reaches_bound_trx_and_unbinds_on_shutdown() {
    let Harness {
        client,
        mut server,
        hook,
        ..
    } = harness(|_| {}).await;

    assert_eq!(client.session_state(), SessionState::Open);
    client.bind().await.unwrap();

    let shutdown = client.shutdown_handle();
    let mut states = client.session_states();
    let run = tokio::spawn(client.run());

    let frame = read_frame_from(&mut server).await.unwrap();
    let bind = match frame {
        Frame::BindTransceiver(pdu) => pdu,
        other => panic!("expected bind_transceiver, got {other}"),
    };
    assert_eq!(bind.system_id, "smppclient1");
    assert_eq!(bind.password.as_deref(), Some("password"));
    assert_eq!(bind.interface_version, crate::datatypes::InterfaceVersion::SmppV34);
    let resp = BindTransceiverResponse {
        command_status: CommandStatus::Ok,
        sequence_number: bind.sequence_number,
        system_id: "SMPPSim".to_string(),
        sc_interface_version: None,
    };
    server.write_all(&resp.to_bytes()).await.unwrap();

    tokio::time::timeout(TICK, states.wait_for(|s| *s == SessionState::BoundTrx))
        .await
        .unwrap()
        .unwrap();

    shutdown.shutdown();
    serve_unbind(&mut server).await;

    tokio::time::timeout(TICK, run).await.unwrap().unwrap().unwrap();
    tokio::time::timeout(TICK, states.wait_for(|s| *s == SessionState::Closed))
        .await
        .unwrap()
        .unwrap();

    // bind_transceiver_resp reached the response hook
    let responses = hook.responses_for(CommandId::BindTransceiverResp);
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].2, CommandStatus::Ok);

    // before_send fired for both PDUs we originated
    assert!(hook.saw_request(CommandId::BindTransceiver));
    assert!(hook.saw_request(CommandId::Unbind));
}

#[tokio::test]
async fn bind_rejection_leaves_the_session_open() {
    let Harness {
        client,
        mut server,
        hook,
        ..
    } = harness(|_| {}).await;

    client.bind().await.unwrap();
    let shutdown = client.shutdown_handle();
    let run = tokio::spawn(client.run());

    let bind = match read_frame_from(&mut server).await.unwrap() {
        Frame::BindTransceiver(pdu) => pdu,
        other => panic!("expected bind_transceiver, got {other}"),
    };
    let resp = BindTransceiverResponse {
        command_status: CommandStatus::InvalidPassword,
        sequence_number: bind.sequence_number,
        system_id: String::new(),
        sc_interface_version: None,
    };
    server.write_all(&resp.to_bytes()).await.unwrap();

    // the rejection surfaces through on_response; the session never binds
    tokio::time::timeout(TICK, async {
        loop {
            if !hook.responses_for(CommandId::BindTransceiverResp).is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
    let responses = hook.responses_for(CommandId::BindTransceiverResp);
    assert_eq!(responses[0].2, CommandStatus::InvalidPassword);

    shutdown.shutdown();
    tokio::time::timeout(TICK, run).await.unwrap().unwrap().unwrap();
}

#[tokio::test]
async fn submit_sm_is_encoded_sent_and_correlated() {
    let Harness {
        client,
        broker,
        mut server,
        hook,
    } = harness(|_| {}).await;

    client.bind().await.unwrap();
    let shutdown = client.shutdown_handle();
    let states = client.session_states();

    let message = Message::SubmitSm(
        SubmitSmMessage::from_config(
            client.config(),
            "Hello",
            "log-1",
            "2547000000",
            "254711999999",
        )
        .with_hook_metadata("shard=3"),
    );
    let run = tokio::spawn(client.run());
    let mut states = states;

    // bind handshake
    let bind = match read_frame_from(&mut server).await.unwrap() {
        Frame::BindTransceiver(pdu) => pdu,
        other => panic!("expected bind_transceiver, got {other}"),
    };
    server
        .write_all(
            &BindTransceiverResponse {
                command_status: CommandStatus::Ok,
                sequence_number: bind.sequence_number,
                system_id: "SMPPSim".to_string(),
                sc_interface_version: None,
            }
            .to_bytes(),
        )
        .await
        .unwrap();
    tokio::time::timeout(TICK, states.wait_for(|s| *s == SessionState::BoundTrx))
        .await
        .unwrap()
        .unwrap();

    broker.enqueue(message).await.unwrap();

    let submit = match tokio::time::timeout(TICK, read_frame_from(&mut server))
        .await
        .unwrap()
        .unwrap()
    {
        Frame::SubmitSm(pdu) => pdu,
        other => panic!("expected submit_sm, got {other}"),
    };
    assert_eq!(submit.source_addr, "2547000000");
    assert_eq!(submit.destination_addr, "254711999999");
    assert_eq!(submit.data_coding, 0x00);
    assert_eq!(submit.sm_length(), 5);
    assert_eq!(submit.short_message, Bytes::from_static(b"Hello"));
    assert_eq!(submit.service_type, "CMT");

    server
        .write_all(
            &SubmitSmResponse {
                command_status: CommandStatus::Ok,
                sequence_number: submit.sequence_number,
                message_id: "0".to_string(),
            }
            .to_bytes(),
        )
        .await
        .unwrap();

    // the response resolves through the correlator back to our identifiers
    tokio::time::timeout(TICK, async {
        loop {
            if !hook.responses_for(CommandId::SubmitSmResp).is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
    let responses = hook.responses_for(CommandId::SubmitSmResp);
    assert_eq!(
        responses[0],
        ("log-1".to_string(), "shard=3".to_string(), CommandStatus::Ok)
    );

    shutdown.shutdown();
    serve_unbind(&mut server).await;
    tokio::time::timeout(TICK, run).await.unwrap().unwrap().unwrap();
}

#[tokio::test]
async fn peer_initiated_pdus_are_answered() {
    let Harness {
        client,
        mut server,
        hook,
        ..
    } = harness(|_| {}).await;

    client.bind().await.unwrap();
    let shutdown = client.shutdown_handle();
    let run = tokio::spawn(client.run());

    let bind = match read_frame_from(&mut server).await.unwrap() {
        Frame::BindTransceiver(pdu) => pdu,
        other => panic!("expected bind_transceiver, got {other}"),
    };
    server
        .write_all(
            &BindTransceiverResponse {
                command_status: CommandStatus::Ok,
                sequence_number: bind.sequence_number,
                system_id: "SMPPSim".to_string(),
                sc_interface_version: None,
            }
            .to_bytes(),
        )
        .await
        .unwrap();

    // liveness probe from the SMSC side
    server
        .write_all(&EnquireLink { sequence_number: 77 }.to_bytes())
        .await
        .unwrap();
    match tokio::time::timeout(TICK, read_frame_from(&mut server))
        .await
        .unwrap()
        .unwrap()
    {
        Frame::EnquireLinkResponse(resp) => assert_eq!(resp.sequence_number, 77),
        other => panic!("expected enquire_link_resp, got {other}"),
    }

    // mobile-originated message
    let deliver = DeliverSm {
        command_status: CommandStatus::Ok,
        sequence_number: 501,
        service_type: String::new(),
        source_addr_ton: 0x01,
        source_addr_npi: 0x01,
        source_addr: "254711999999".to_string(),
        dest_addr_ton: 0x01,
        dest_addr_npi: 0x01,
        destination_addr: "2547000000".to_string(),
        esm_class: 0,
        protocol_id: 0,
        priority_flag: 0,
        schedule_delivery_time: String::new(),
        validity_period: String::new(),
        registered_delivery: 0,
        replace_if_present_flag: 0,
        data_coding: 0,
        sm_default_msg_id: 0,
        short_message: Bytes::from_static(b"pong"),
        tlvs: Vec::new(),
    };
    server.write_all(&deliver.to_bytes()).await.unwrap();

    match tokio::time::timeout(TICK, read_frame_from(&mut server))
        .await
        .unwrap()
        .unwrap()
    {
        Frame::DeliverSmResponse(resp) => {
            assert_eq!(resp.sequence_number, 501);
            assert_eq!(resp.message_id, "");
            assert_eq!(resp.command_status, CommandStatus::Ok);
        }
        other => panic!("expected deliver_sm_resp, got {other}"),
    }

    shutdown.shutdown();
    serve_unbind(&mut server).await;
    tokio::time::timeout(TICK, run).await.unwrap().unwrap().unwrap();

    // the deliver_sm itself reached on_response, and both acknowledgements
    // went through the request hook
    assert_eq!(hook.responses_for(CommandId::DeliverSm).len(), 1);
    assert!(hook.saw_request(CommandId::EnquireLinkResp));
    assert!(hook.saw_request(CommandId::DeliverSmResp));
}

#[tokio::test]
async fn smsc_unbind_closes_the_session() {
    let Harness {
        client,
        mut server,
        ..
    } = harness(|_| {}).await;

    client.bind().await.unwrap();
    let shutdown = client.shutdown_handle();
    let mut states = client.session_states();
    let run = tokio::spawn(client.run());

    let bind = match read_frame_from(&mut server).await.unwrap() {
        Frame::BindTransceiver(pdu) => pdu,
        other => panic!("expected bind_transceiver, got {other}"),
    };
    server
        .write_all(
            &BindTransceiverResponse {
                command_status: CommandStatus::Ok,
                sequence_number: bind.sequence_number,
                system_id: "SMPPSim".to_string(),
                sc_interface_version: None,
            }
            .to_bytes(),
        )
        .await
        .unwrap();
    tokio::time::timeout(TICK, states.wait_for(|s| *s == SessionState::BoundTrx))
        .await
        .unwrap()
        .unwrap();

    // the SMSC tears the session down
    server
        .write_all(
            &crate::datatypes::Unbind {
                command_status: CommandStatus::Ok,
                sequence_number: 9,
            }
            .to_bytes(),
        )
        .await
        .unwrap();

    match tokio::time::timeout(TICK, read_frame_from(&mut server))
        .await
        .unwrap()
        .unwrap()
    {
        Frame::UnbindResponse(resp) => assert_eq!(resp.sequence_number, 9),
        other => panic!("expected unbind_resp, got {other}"),
    }

    tokio::time::timeout(TICK, states.wait_for(|s| *s == SessionState::Closed))
        .await
        .unwrap()
        .unwrap();

    // session is CLOSED; nothing further is admissible
    assert!(matches!(
        SessionState::Closed.admit(CommandId::SubmitSm),
        Err(SmppError::IllegalSessionState { .. })
    ));

    shutdown.shutdown();
    tokio::time::timeout(TICK, run).await.unwrap().unwrap().unwrap();
}
