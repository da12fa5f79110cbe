//! QUIC transport for the client.
//!
//! Provides [`QuicChannel`], a [`Channel`] over one QUIC bidirectional stream.
//! The game stream carries length-prefixed frames both ways; a writer task
//! drains outbound requests and a reader task turns inbound bytes into
//! [`Inbound`] items. Protocol logic stays in [`crate::GameSession`].

use std::{
    net::{Ipv4Addr, Ipv6Addr, SocketAddr},
    sync::Arc,
    time::Duration,
};

use bytes::BytesMut;
use quinn::{ClientConfig, Connection, Endpoint, RecvStream, SendStream};
use simonsays_proto::{ALPN_PROTOCOL, Frame, Request, Response};
use tokio::{sync::mpsc, task::AbortHandle};

use crate::{Channel, Inbound, StreamEnd, TransportError};

/// Read buffer size for the game stream.
const READ_CHUNK_SIZE: usize = 4096;

/// Application error code sent when the client stops the connection.
const CLIENT_STOPPED: u32 = 0;

/// Connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// TLS server name presented during the handshake.
    pub server_name: String,
    /// Upper bound on connection establishment.
    pub connect_timeout: Duration,
    /// Connection is dropped after this long without traffic.
    pub idle_timeout: Duration,
    /// Capacity of the inbound queue handed to the caller.
    pub inbound_capacity: usize,
}

impl TransportConfig {
    /// Development defaults for a local server.
    pub fn development() -> Self {
        Self {
            server_name: "localhost".to_owned(),
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(30),
            inbound_capacity: 32,
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::development()
    }
}

enum Outbound {
    Request(Request),
    Finish,
}

/// [`Channel`] over one QUIC bidirectional stream.
pub struct QuicChannel {
    outbound: Option<mpsc::UnboundedSender<Outbound>>,
    stop: StopHandle,
    _endpoint: Endpoint,
}

impl QuicChannel {
    /// Remote address of the game server.
    pub fn remote_address(&self) -> SocketAddr {
        self.stop.connection.remote_address()
    }

    /// Handle that can stop the connection after the channel has been moved
    /// into a session.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Close the connection immediately. Pending writes are dropped.
    pub fn stop(&self) {
        self.stop.stop();
    }
}

/// Stops a [`QuicChannel`]'s connection and I/O tasks.
#[derive(Clone)]
pub struct StopHandle {
    connection: Connection,
    writer: AbortHandle,
    reader: AbortHandle,
}

impl StopHandle {
    /// Close the connection immediately. Pending writes are dropped.
    pub fn stop(&self) {
        self.connection.close(CLIENT_STOPPED.into(), b"client stopped");
        self.writer.abort();
        self.reader.abort();
    }
}

impl Channel for QuicChannel {
    fn is_ready(&self) -> bool {
        self.outbound.as_ref().is_some_and(|tx| !tx.is_closed())
            && self.stop.connection.close_reason().is_none()
    }

    fn send(&mut self, request: Request) -> Result<(), TransportError> {
        let tx = self.outbound.as_ref().ok_or(TransportError::Closed)?;
        tx.send(Outbound::Request(request)).map_err(|_| TransportError::Closed)
    }

    fn finish(&mut self) -> Result<(), TransportError> {
        match self.outbound.take() {
            Some(tx) => tx.send(Outbound::Finish).map_err(|_| TransportError::Closed),
            None => Ok(()),
        }
    }
}

/// Connect to a game server and open the game stream.
///
/// `addr` is `host:port`; host names are resolved. Returns the outbound
/// channel and the inbound queue to hand to [`crate::deliver`].
pub async fn connect(
    addr: &str,
    config: &TransportConfig,
) -> Result<(QuicChannel, mpsc::Receiver<Inbound>), TransportError> {
    let remote = resolve(addr).await?;

    let bind = if remote.is_ipv6() {
        SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
    } else {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
    };
    let mut endpoint = Endpoint::client(bind)
        .map_err(|e| TransportError::Connection(format!("endpoint creation failed: {e}")))?;
    endpoint.set_default_client_config(insecure_client_config(config.idle_timeout)?);

    let connecting = endpoint
        .connect(remote, &config.server_name)
        .map_err(|e| TransportError::Connection(format!("connect failed: {e}")))?;
    let connection = tokio::time::timeout(config.connect_timeout, connecting)
        .await
        .map_err(|_| {
            TransportError::Connection(format!(
                "timed out after {}s connecting to {remote}",
                config.connect_timeout.as_secs()
            ))
        })?
        .map_err(|e| TransportError::Connection(format!("connection failed: {e}")))?;

    let (send, recv) = connection
        .open_bi()
        .await
        .map_err(|e| TransportError::Stream(format!("open stream failed: {e}")))?;

    tracing::info!(%remote, "connected to game server");

    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let (inbound_tx, inbound_rx) = mpsc::channel(config.inbound_capacity.max(1));

    let writer = tokio::spawn(write_requests(send, outbound_rx, inbound_tx.clone()));
    let reader = tokio::spawn(read_responses(recv, inbound_tx));

    let channel = QuicChannel {
        outbound: Some(outbound_tx),
        stop: StopHandle {
            connection,
            writer: writer.abort_handle(),
            reader: reader.abort_handle(),
        },
        _endpoint: endpoint,
    };

    Ok((channel, inbound_rx))
}

async fn resolve(addr: &str) -> Result<SocketAddr, TransportError> {
    tokio::net::lookup_host(addr)
        .await
        .map_err(|e| TransportError::Connection(format!("invalid address {addr}: {e}")))?
        .next()
        .ok_or_else(|| TransportError::Connection(format!("no address found for {addr}")))
}

/// Drain outbound requests onto the send side until finished or dropped.
///
/// A failed write ends the inbound queue, so the session learns about it
/// without waiting for the next send.
async fn write_requests(
    mut send: SendStream,
    mut rx: mpsc::UnboundedReceiver<Outbound>,
    inbound: mpsc::Sender<Inbound>,
) {
    while let Some(item) = rx.recv().await {
        match item {
            Outbound::Request(request) => {
                if let Err(e) = write_request(&mut send, &request).await {
                    tracing::warn!(error = %e, "game stream write failed");
                    if inbound.send(Inbound::Ended(StreamEnd::Failed(e))).await.is_err() {
                        tracing::debug!("inbound queue dropped before write failure");
                    }
                    return;
                }
            },
            Outbound::Finish => break,
        }
    }

    if let Err(e) = send.finish() {
        tracing::debug!(error = %e, "send side already closed");
    }
}

async fn write_request(send: &mut SendStream, request: &Request) -> Result<(), TransportError> {
    let bytes = request
        .to_frame()
        .and_then(|frame| frame.to_bytes())
        .map_err(|e| TransportError::Protocol(format!("encode failed: {e}")))?;

    send.write_all(&bytes).await.map_err(map_write_error)?;

    tracing::trace!(opcode = ?request.opcode(), len = bytes.len(), "sent frame");
    Ok(())
}

/// Decode frames from the receive side and push them in stream order.
///
/// The last item pushed is always [`Inbound::Ended`], unless the caller
/// dropped the queue.
async fn read_responses(mut recv: RecvStream, tx: mpsc::Sender<Inbound>) {
    let end = match pump(&mut recv, &tx).await {
        Ok(end) => end,
        Err(QueueClosed) => return,
    };

    if tx.send(Inbound::Ended(end)).await.is_err() {
        tracing::debug!("inbound queue dropped before stream end");
    }
}

struct QueueClosed;

async fn pump(recv: &mut RecvStream, tx: &mpsc::Sender<Inbound>) -> Result<StreamEnd, QueueClosed> {
    let mut buf = BytesMut::with_capacity(READ_CHUNK_SIZE);
    let mut chunk = [0u8; READ_CHUNK_SIZE];

    loop {
        loop {
            let frame = match Frame::decode(&mut buf) {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(e) => {
                    return Ok(StreamEnd::Failed(TransportError::Protocol(e.to_string())));
                },
            };

            let item = match Response::from_frame(&frame) {
                Ok(response) => Inbound::Message(response),
                Err(e) => Inbound::Malformed(e),
            };
            tx.send(item).await.map_err(|_| QueueClosed)?;
        }

        match recv.read(&mut chunk).await {
            Ok(Some(n)) => buf.extend_from_slice(&chunk[..n]),
            Ok(None) if buf.is_empty() => return Ok(StreamEnd::Completed),
            Ok(None) => {
                return Ok(StreamEnd::Failed(TransportError::Protocol(format!(
                    "stream ended inside a frame ({} bytes pending)",
                    buf.len()
                ))));
            },
            Err(e) => return Ok(StreamEnd::Failed(map_read_error(e))),
        }
    }
}

fn map_read_error(error: quinn::ReadError) -> TransportError {
    match error {
        quinn::ReadError::Reset(code) => {
            TransportError::Server { code: code.into_inner(), reason: "stream reset".to_owned() }
        },
        quinn::ReadError::ConnectionLost(quinn::ConnectionError::ApplicationClosed(close)) => {
            application_closed(&close)
        },
        other => TransportError::Stream(other.to_string()),
    }
}

fn map_write_error(error: quinn::WriteError) -> TransportError {
    match error {
        quinn::WriteError::Stopped(code) => {
            TransportError::Server { code: code.into_inner(), reason: "stream stopped".to_owned() }
        },
        quinn::WriteError::ConnectionLost(quinn::ConnectionError::ApplicationClosed(close)) => {
            application_closed(&close)
        },
        other => TransportError::Stream(format!("write failed: {other}")),
    }
}

fn application_closed(close: &quinn::ApplicationClose) -> TransportError {
    TransportError::Server {
        code: close.error_code.into_inner(),
        reason: String::from_utf8_lossy(&close.reason).into_owned(),
    }
}

/// Create an insecure client config that accepts any certificate.
///
/// WARNING: Development only. Production should verify certificates.
fn insecure_client_config(idle_timeout: Duration) -> Result<ClientConfig, TransportError> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let mut crypto = rustls::ClientConfig::builder_with_provider(provider)
        .with_protocol_versions(&[&rustls::version::TLS13])
        .map_err(|e| TransportError::Connection(format!("tls config failed: {e}")))?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(InsecureCertVerifier))
        .with_no_client_auth();

    crypto.alpn_protocols = vec![ALPN_PROTOCOL.to_vec()];

    let quic_crypto = quinn::crypto::rustls::QuicClientConfig::try_from(crypto)
        .map_err(|e| TransportError::Connection(format!("quic crypto config failed: {e}")))?;
    let mut config = ClientConfig::new(Arc::new(quic_crypto));

    let idle = quinn::IdleTimeout::try_from(idle_timeout)
        .map_err(|e| TransportError::Connection(format!("invalid idle timeout: {e}")))?;
    let mut transport = quinn::TransportConfig::default();
    transport.max_idle_timeout(Some(idle));
    config.transport_config(Arc::new(transport));

    Ok(config)
}

/// Certificate verifier that accepts any certificate (insecure, for
/// development).
#[derive(Debug)]
struct InsecureCertVerifier;

impl rustls::client::danger::ServerCertVerifier for InsecureCertVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls::pki_types::CertificateDer<'_>,
        _intermediates: &[rustls::pki_types::CertificateDer<'_>],
        _server_name: &rustls::pki_types::ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        rustls::crypto::ring::default_provider()
            .signature_verification_algorithms
            .supported_schemes()
    }
}
