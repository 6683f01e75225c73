//! IPC client for relaying navigation to the privileged context
//!
//! Implements the client side of the newline-delimited JSON protocol
//! over Unix sockets (or named pipes on Windows). The privileged side owns
//! the tab and performs the actual history step.

use std::io::{BufRead, BufReader, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[cfg(unix)]
use std::os::unix::net::UnixStream;

#[cfg(windows)]
use std::fs::OpenOptions;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::debug;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{Result, SwipeError};
use crate::types::{
    IpcMessage, IpcMessageType, NavDirection, NavigateRequest, RelayResponse, SWIPE_NAVIGATE,
};

// =============================================================================
// Platform-specific stream types
// =============================================================================

#[cfg(unix)]
type IpcStream = UnixStream;

#[cfg(windows)]
type IpcStream = std::fs::File;

// =============================================================================
// Constants
// =============================================================================

/// Message delimiter for framing (newline-delimited JSON)
const MESSAGE_DELIMITER: u8 = b'\n';

/// IPC client for the navigation relay
#[derive(Debug, Clone)]
pub struct RelayClient {
    socket_path: PathBuf,
    connection_timeout: Duration,
    command_timeout: Duration,
}

impl RelayClient {
    pub fn new(socket_path: impl Into<PathBuf>, config: &Config) -> Self {
        Self {
            socket_path: socket_path.into(),
            connection_timeout: Duration::from_millis(config.connection_timeout_ms),
            command_timeout: Duration::from_millis(config.command_timeout_ms),
        }
    }

    /// Client for the configured relay, if any
    pub fn from_config(config: &Config) -> Option<Self> {
        config
            .relay_socket_path
            .as_ref()
            .map(|path| Self::new(path.clone(), config))
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    pub fn ping(&self) -> Result<bool> {
        let mut stream = connect_to_relay(&self.socket_path, self.connection_timeout)?;

        let message = IpcMessage {
            message_type: IpcMessageType::Ping,
            payload: None,
        };

        let bytes = serialize_message(&message)?;
        send_bytes(&mut stream, &bytes)?;

        let response_bytes = read_message(&mut stream)?;
        let response = deserialize_message(&response_bytes)?;

        Ok(matches!(response.message_type, IpcMessageType::Pong))
    }

    /// Ask the relay to step history and wait for its answer.
    ///
    /// The failure says whether the request reached the relay, which
    /// decides if a fallback navigation is safe.
    pub fn send_navigation(
        &self,
        direction: NavDirection,
    ) -> std::result::Result<RelayResponse, RelayFailure> {
        let (mut stream, request_id) = self
            .deliver_navigation(direction)
            .map_err(RelayFailure::Undelivered)?;
        debug!(%direction, id = %request_id, "navigation relayed");

        await_response(&mut stream, &request_id).map_err(RelayFailure::Unconfirmed)
    }

    /// Everything up to and including the write of the request line
    fn deliver_navigation(&self, direction: NavDirection) -> Result<(IpcStream, String)> {
        let mut stream = connect_to_relay(&self.socket_path, self.connection_timeout)?;

        #[cfg(unix)]
        {
            stream
                .set_read_timeout(Some(self.command_timeout))
                .and_then(|()| stream.set_write_timeout(Some(self.command_timeout)))
                .map_err(|err| SwipeError::ConnectionFailed(format!("socket setup: {}", err)))?;
        }

        let request = NavigateRequest {
            id: Uuid::new_v4().to_string(),
            message_type: SWIPE_NAVIGATE.to_string(),
            direction,
            timestamp: current_timestamp(),
        };
        let request_id = request.id.clone();

        let message = IpcMessage {
            message_type: IpcMessageType::Command,
            payload: Some(serde_json::to_value(request)?),
        };

        let bytes = serialize_message(&message)?;
        send_bytes(&mut stream, &bytes)
            .map_err(|err| SwipeError::ConnectionFailed(format!("write failed: {}", err)))?;
        Ok((stream, request_id))
    }
}

/// A relayed navigation that produced no usable answer
#[derive(Debug)]
pub enum RelayFailure {
    /// The request never reached the relay
    Undelivered(SwipeError),
    /// The request was written; the relay may or may not have acted
    Unconfirmed(SwipeError),
}

impl RelayFailure {
    pub fn is_undelivered(&self) -> bool {
        matches!(self, RelayFailure::Undelivered(_))
    }

    pub fn into_error(self) -> SwipeError {
        match self {
            RelayFailure::Undelivered(err) | RelayFailure::Unconfirmed(err) => err,
        }
    }
}

fn await_response(stream: &mut IpcStream, request_id: &str) -> Result<RelayResponse> {
    let response_bytes = read_message(stream)?;
    let response = deserialize_message(&response_bytes)?;

    if !matches!(response.message_type, IpcMessageType::Response) {
        return Err(SwipeError::ProtocolError(
            "unexpected response type".to_string(),
        ));
    }

    let payload = response
        .payload
        .ok_or_else(|| SwipeError::ProtocolError("missing response payload".to_string()))?;

    let relay_response: RelayResponse = serde_json::from_value(payload)?;
    if relay_response.id != request_id {
        return Err(SwipeError::ProtocolError(format!(
            "response id {} does not match request {}",
            relay_response.id, request_id
        )));
    }
    Ok(relay_response)
}

#[cfg(unix)]
fn connect_to_relay(socket_path: &Path, timeout: Duration) -> Result<IpcStream> {
    if !socket_path.exists() {
        return Err(SwipeError::RelayUnavailable(format!(
            "socket not found at {}",
            socket_path.display()
        )));
    }

    let stream = UnixStream::connect(socket_path)
        .map_err(|err| SwipeError::ConnectionFailed(err.to_string()))?;

    stream
        .set_read_timeout(Some(timeout))
        .and_then(|()| stream.set_write_timeout(Some(timeout)))
        .map_err(|err| SwipeError::ConnectionFailed(format!("socket setup: {}", err)))?;

    Ok(stream)
}

#[cfg(windows)]
fn connect_to_relay(pipe_path: &Path, _timeout: Duration) -> Result<IpcStream> {
    let pipe_path_str = pipe_path.to_string_lossy();

    let pipe_name = if pipe_path_str.starts_with(r"\\.\pipe\") {
        pipe_path_str.to_string()
    } else {
        let name = pipe_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("swipe-nav-relay");
        format!(r"\\.\pipe\{}", name)
    };

    OpenOptions::new()
        .read(true)
        .write(true)
        .open(&pipe_name)
        .map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                SwipeError::RelayUnavailable(format!("pipe not found at {}", pipe_name))
            } else {
                SwipeError::ConnectionFailed(err.to_string())
            }
        })
}

fn serialize_message(message: &IpcMessage) -> Result<Vec<u8>> {
    let mut json = serde_json::to_vec(message)?;
    json.push(MESSAGE_DELIMITER);
    Ok(json)
}

fn deserialize_message(data: &[u8]) -> Result<IpcMessage> {
    let message: IpcMessage = serde_json::from_slice(data)?;
    Ok(message)
}

fn send_bytes<W: Write>(stream: &mut W, data: &[u8]) -> Result<()> {
    stream.write_all(data)?;
    stream.flush()?;
    Ok(())
}

fn read_message<R: Read>(stream: &mut R) -> Result<Vec<u8>> {
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    let bytes = reader
        .read_until(MESSAGE_DELIMITER, &mut buf)
        .map_err(|err| match err.kind() {
            ErrorKind::WouldBlock | ErrorKind::TimedOut => SwipeError::ConnectionTimeout,
            _ => SwipeError::IoError(err),
        })?;

    if bytes == 0 {
        return Err(SwipeError::ProtocolError("empty response".to_string()));
    }

    if buf.last().copied() != Some(MESSAGE_DELIMITER) {
        return Err(SwipeError::ProtocolError(
            "missing message delimiter".to_string(),
        ));
    }

    buf.pop();
    Ok(buf)
}

fn current_timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| OffsetDateTime::UNIX_EPOCH.to_string())
}


#[cfg(all(test, unix))]
pub(crate) mod unix_tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use std::io::{BufRead, BufReader, Write};
    use std::os::unix::net::UnixListener;
    use std::thread;
    use std::time::{SystemTime, UNIX_EPOCH};

    /// Serve one connection, answering a navigation request with `success`
    pub(crate) fn serve_once(
        listener: UnixListener,
        success: bool,
    ) -> thread::JoinHandle<serde_json::Value> {
        thread::spawn(move || {
            let (stream, _addr) = listener.accept().expect("accept connection");
            let mut reader = BufReader::new(stream);
            let mut buf = String::new();
            reader.read_line(&mut buf).expect("read line");

            let incoming: serde_json::Value =
                serde_json::from_str(buf.trim_end()).expect("parse json");
            let id = incoming["payload"]["id"].clone();

            let response = if success {
                json!({"type": "response", "payload": {"id": id, "success": true}})
            } else {
                json!({
                    "type": "response",
                    "payload": {"id": id, "success": false, "error": "no tab"}
                })
            };
            let response_bytes = serde_json::to_vec(&response).expect("serialize response");
            let mut stream = reader.into_inner();
            stream.write_all(&response_bytes).expect("write response");
            stream.write_all(b"\n").expect("write delimiter");
            incoming
        })
    }

    pub(crate) fn unique_socket_path(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        std::env::temp_dir().join(format!("swipe-nav-{}-{}.sock", prefix, nanos))
    }

    pub(crate) fn cleanup_socket(path: &PathBuf) {
        let _ = fs::remove_file(path);
    }

    fn client_for(path: &PathBuf) -> RelayClient {
        let config = Config {
            connection_timeout_ms: 200,
            command_timeout_ms: 200,
            ..Default::default()
        };
        RelayClient::new(path.clone(), &config)
    }

    #[test]
    fn connect_to_relay_returns_error_when_missing() {
        let socket_path = unique_socket_path("missing");
        let result = connect_to_relay(&socket_path, Duration::from_millis(50));

        assert!(matches!(result, Err(SwipeError::RelayUnavailable(_))));
    }

    #[test]
    fn ping_sends_ping_and_expects_pong() {
        let socket_path = unique_socket_path("ping");
        cleanup_socket(&socket_path);

        let listener = UnixListener::bind(&socket_path).expect("bind listener");

        let handle = thread::spawn(move || {
            let (stream, _addr) = listener.accept().expect("accept connection");
            let mut reader = BufReader::new(stream);
            let mut buf = String::new();
            reader.read_line(&mut buf).expect("read line");

            let incoming: serde_json::Value =
                serde_json::from_str(buf.trim_end()).expect("parse json");
            assert_eq!(incoming["type"], "ping");

            let mut stream = reader.into_inner();
            stream
                .write_all(b"{\"type\":\"pong\",\"payload\":null}\n")
                .expect("write response");
        });

        let result = client_for(&socket_path).ping().expect("ping result");
        assert!(result);

        handle.join().expect("listener thread");
        cleanup_socket(&socket_path);
    }

    #[test]
    fn send_navigation_round_trips_response() {
        let socket_path = unique_socket_path("navigate");
        cleanup_socket(&socket_path);

        let listener = UnixListener::bind(&socket_path).expect("bind listener");
        let handle = serve_once(listener, true);

        let response = client_for(&socket_path)
            .send_navigation(NavDirection::Back)
            .expect("send navigation");
        assert!(response.success);

        let incoming = handle.join().expect("listener thread");
        assert_eq!(incoming["type"], "command");
        assert_eq!(incoming["payload"]["type"], "swipe-navigate");
        assert_eq!(incoming["payload"]["direction"], "back");
        cleanup_socket(&socket_path);
    }

    #[test]
    fn send_navigation_reports_declined_request() {
        let socket_path = unique_socket_path("declined");
        cleanup_socket(&socket_path);

        let listener = UnixListener::bind(&socket_path).expect("bind listener");
        let handle = serve_once(listener, false);

        let response = client_for(&socket_path)
            .send_navigation(NavDirection::Forward)
            .expect("send navigation");
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("no tab"));

        handle.join().expect("listener thread");
        cleanup_socket(&socket_path);
    }

    #[test]
    fn silent_relay_is_unconfirmed() {
        let socket_path = unique_socket_path("silent");
        cleanup_socket(&socket_path);

        let listener = UnixListener::bind(&socket_path).expect("bind listener");
        let handle = thread::spawn(move || {
            let (stream, _addr) = listener.accept().expect("accept connection");
            let mut reader = BufReader::new(stream);
            let mut buf = String::new();
            reader.read_line(&mut buf).expect("read line");
            // hang up without answering
        });

        let failure = client_for(&socket_path)
            .send_navigation(NavDirection::Back)
            .expect_err("no reply");
        assert!(matches!(
            failure,
            RelayFailure::Unconfirmed(SwipeError::ProtocolError(_))
        ));

        handle.join().expect("listener thread");
        cleanup_socket(&socket_path);
    }

    #[test]
    fn missing_relay_is_undelivered() {
        let failure = client_for(&unique_socket_path("absent"))
            .send_navigation(NavDirection::Back)
            .expect_err("no relay");
        assert!(failure.is_undelivered());
        assert!(matches!(
            failure.into_error(),
            SwipeError::RelayUnavailable(_)
        ));
    }

    #[test]
    fn socket_setup_failure_is_undelivered() {
        let socket_path = unique_socket_path("setup");
        cleanup_socket(&socket_path);
        let _listener = UnixListener::bind(&socket_path).expect("bind listener");

        // A zero timeout is rejected by the socket before anything is written
        let config = Config {
            command_timeout_ms: 0,
            ..Default::default()
        };
        let failure = RelayClient::new(socket_path.clone(), &config)
            .send_navigation(NavDirection::Forward)
            .expect_err("invalid timeout");
        assert!(matches!(
            failure,
            RelayFailure::Undelivered(SwipeError::ConnectionFailed(_))
        ));

        cleanup_socket(&socket_path);
    }

    #[test]
    fn unanswered_request_times_out_unconfirmed() {
        let socket_path = unique_socket_path("slow");
        cleanup_socket(&socket_path);

        let listener = UnixListener::bind(&socket_path).expect("bind listener");
        let handle = thread::spawn(move || {
            let (stream, _addr) = listener.accept().expect("accept connection");
            let mut reader = BufReader::new(stream);
            let mut buf = String::new();
            reader.read_line(&mut buf).expect("read line");
            // hold the connection open past the client's timeout
            thread::sleep(Duration::from_millis(400));
        });

        let failure = client_for(&socket_path)
            .send_navigation(NavDirection::Back)
            .expect_err("timeout");
        assert!(matches!(
            failure,
            RelayFailure::Unconfirmed(SwipeError::ConnectionTimeout)
        ));

        handle.join().expect("listener thread");
        cleanup_socket(&socket_path);
    }
}
