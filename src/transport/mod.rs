//! Blocking HTTP/1.1-over-TLS transport.
//!
//! One TCP+TLS connection per fetch: connect, handshake, write the request,
//! read until the peer closes the stream. The stream is owned by the fetch
//! call and dropped on every return path.
//!
//! The whole exchange after connect shares one deadline, so a peer that keeps
//! trickling bytes cannot hold the fetch open past the configured timeout.
//!
//! Uses `rustls` with the `webpki-roots` Mozilla root store.

use std::io::{ErrorKind, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info};
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};

use crate::config::{
    DEFAULT_TIMEOUT_SECS, HTTPS_PORT, MAX_RESPONSE_SIZE, READ_CHUNK_SIZE,
    TCP_CONNECT_TIMEOUT_SECS,
};
use crate::error_handling::FetchError;
use crate::http::{encode_request, RequestTarget};

/// Sends one request and returns the complete raw response.
///
/// Implementations perform no retries and no caching.
pub trait Transport {
    fn fetch(&self, target: &RequestTarget) -> Result<Vec<u8>, FetchError>;
}

/// `Transport` over a fresh TLS connection per request.
#[derive(Clone)]
pub struct TlsTransport {
    tls_config: Arc<ClientConfig>,
    port: u16,
    connect_timeout: Duration,
    io_timeout: Duration,
}

impl TlsTransport {
    /// Creates a transport on port 443 whose exchange (handshake, request and
    /// response) must finish within `timeout_seconds` of connecting.
    pub fn new(timeout_seconds: u64) -> Self {
        let mut root_store = RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let config = ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        Self {
            tls_config: Arc::new(config),
            port: HTTPS_PORT,
            connect_timeout: Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
            io_timeout: Duration::from_secs(timeout_seconds.max(1)),
        }
    }

    /// Overrides the destination port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    fn connect(&self, host: &str) -> Result<TcpStream, FetchError> {
        let addrs: Vec<SocketAddr> = (host, self.port)
            .to_socket_addrs()
            .map_err(|source| FetchError::Dns {
                host: host.to_string(),
                source,
            })?
            .collect();

        let mut last_err = std::io::Error::new(ErrorKind::NotFound, "no addresses resolved");
        for addr in &addrs {
            match TcpStream::connect_timeout(addr, self.connect_timeout) {
                Ok(sock) => {
                    debug!("Connected to {host} via {addr}");
                    return Ok(sock);
                }
                Err(e) => {
                    debug!("Connect to {addr} failed: {e}");
                    last_err = e;
                }
            }
        }

        if is_timeout(&last_err) {
            return Err(FetchError::Timeout {
                host: host.to_string(),
                seconds: self.connect_timeout.as_secs(),
            });
        }
        Err(FetchError::Connect {
            host: host.to_string(),
            port: self.port,
            source: last_err,
        })
    }

    fn io_error(&self, host: &str, source: std::io::Error) -> FetchError {
        if is_timeout(&source) {
            FetchError::Timeout {
                host: host.to_string(),
                seconds: self.io_timeout.as_secs(),
            }
        } else {
            FetchError::Io {
                host: host.to_string(),
                source,
            }
        }
    }
}

impl Default for TlsTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_SECS)
    }
}

impl Transport for TlsTransport {
    fn fetch(&self, target: &RequestTarget) -> Result<Vec<u8>, FetchError> {
        let host = target.host.as_str();
        info!("Fetching https://{target}");

        let server_name =
            ServerName::try_from(host.to_string()).map_err(|e| FetchError::Tls {
                host: host.to_string(),
                message: format!("invalid server name: {e}"),
            })?;

        let sock = DeadlineSocket::new(self.connect(host)?, self.io_timeout);

        let conn = ClientConnection::new(Arc::clone(&self.tls_config), server_name).map_err(
            |e| FetchError::Tls {
                host: host.to_string(),
                message: e.to_string(),
            },
        )?;
        let mut tls_stream = StreamOwned::new(conn, sock);

        // Drive the handshake up front so certificate problems are reported as TLS errors
        while tls_stream.conn.is_handshaking() {
            if let Err(e) = tls_stream.conn.complete_io(&mut tls_stream.sock) {
                return Err(if is_timeout(&e) {
                    self.io_error(host, e)
                } else {
                    FetchError::Tls {
                        host: host.to_string(),
                        message: e.to_string(),
                    }
                });
            }
        }
        if let Some(version) = tls_stream.conn.protocol_version() {
            debug!("TLS established with {host} ({version:?})");
        }

        tls_stream
            .write_all(&encode_request(target))
            .and_then(|_| tls_stream.flush())
            .map_err(|e| self.io_error(host, e))?;

        let response = read_to_close(&mut tls_stream).map_err(|e| match e {
            ReadError::Io(source) => self.io_error(host, source),
            ReadError::TooLarge => FetchError::MalformedResponse(format!(
                "response from {host} exceeds {MAX_RESPONSE_SIZE} bytes"
            )),
        })?;

        debug!("Read {} bytes from {host}", response.len());
        Ok(response)
    }
}

enum ReadError {
    Io(std::io::Error),
    TooLarge,
}

/// A socket whose reads and writes all share a single deadline.
///
/// Each operation gets the time remaining as its socket timeout; once the
/// deadline has passed every operation fails with `TimedOut`.
struct DeadlineSocket {
    sock: TcpStream,
    deadline: Instant,
}

impl DeadlineSocket {
    fn new(sock: TcpStream, budget: Duration) -> Self {
        Self {
            sock,
            deadline: Instant::now() + budget,
        }
    }

    fn remaining(&self) -> std::io::Result<Duration> {
        let remaining = self.deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(std::io::Error::new(
                ErrorKind::TimedOut,
                "deadline for the exchange has passed",
            ));
        }
        Ok(remaining)
    }
}

impl Read for DeadlineSocket {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let remaining = self.remaining()?;
        self.sock.set_read_timeout(Some(remaining))?;
        self.sock.read(buf)
    }
}

impl Write for DeadlineSocket {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let remaining = self.remaining()?;
        self.sock.set_write_timeout(Some(remaining))?;
        self.sock.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.sock.flush()
    }
}

/// Reads until the peer closes the stream.
///
/// A close without TLS `close_notify` surfaces as `UnexpectedEof`; with
/// `Connection: close` that is still the end of the response.
fn read_to_close<R: Read>(stream: &mut R) -> Result<Vec<u8>, ReadError> {
    let mut response = Vec::new();
    let mut buf = [0u8; READ_CHUNK_SIZE];
    loop {
        match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                if response.len() + n > MAX_RESPONSE_SIZE {
                    return Err(ReadError::TooLarge);
                }
                response.extend_from_slice(&buf[..n]);
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(ReadError::Io(e)),
        }
    }
    Ok(response)
}

fn is_timeout(e: &std::io::Error) -> bool {
    matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
}
