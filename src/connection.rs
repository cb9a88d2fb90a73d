//! TCP control connection to the peripheral.
//!
//! One connection per device session, opened on stream activation and
//! closed on deactivation. The same socket carries both directions of the
//! protocol: outgoing command frames and the incoming sample stream.
//!
//! Commands sent while the connection is closed are silently skipped; the
//! device resends its stored tuning state when the connection comes up.
//! Receives on a closed connection are stream-fatal instead, because only
//! an active stream ever reads.

use crate::command::ControlCommand;
use crate::error::{Error, Result};
use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Timeout for the initial TCP handshake.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Control/data connection state machine: Closed (no socket) or Open.
#[derive(Debug)]
pub struct ControlConnection {
    addr: String,
    port: u16,
    stream: Option<TcpStream>,
}

impl ControlConnection {
    /// Create a closed connection bound to a target address.
    pub fn new(addr: &str, port: u16) -> Self {
        Self {
            addr: addr.to_string(),
            port,
            stream: None,
        }
    }

    /// Target as a `host:port` string.
    pub fn target(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }

    /// Check whether the socket is open.
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Open the TCP connection. Fails fast on any resolution or connect
    /// error; never retries.
    pub fn open(&mut self) -> Result<()> {
        let target = self.target();
        let sock_addr = target
            .to_socket_addrs()
            .map_err(|e| Error::Connection {
                addr: target.clone(),
                source: e,
            })?
            .next()
            .ok_or_else(|| Error::Connection {
                addr: target.clone(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "no address resolved"),
            })?;
        let stream = TcpStream::connect_timeout(&sock_addr, CONNECT_TIMEOUT).map_err(|e| {
            Error::Connection {
                addr: target.clone(),
                source: e,
            }
        })?;
        stream.set_nodelay(true).map_err(|e| Error::Connection {
            addr: target.clone(),
            source: e,
        })?;
        self.stream = Some(stream);
        tracing::info!("connected to {}", target);
        Ok(())
    }

    /// Send one command frame.
    ///
    /// A closed connection swallows the send. Any write failure or
    /// shortfall on an open connection is a protocol error.
    pub fn send_command(&mut self, command: &ControlCommand) -> Result<()> {
        let stream = match self.stream.as_mut() {
            Some(stream) => stream,
            None => {
                tracing::debug!("tuning command skipped, connection closed");
                return Ok(());
            }
        };
        stream
            .write_all(&command.to_bytes())
            .map_err(|e| Error::Protocol(format!("command send incomplete: {}", e)))
    }

    /// Fill `buf` exactly, or fail.
    ///
    /// `timeout` is armed on the socket for this call; a zero duration
    /// blocks indefinitely. Any shortfall (EOF, reset, transport timeout)
    /// is a protocol error, after which the stream session is unusable.
    pub fn receive_exact(&mut self, buf: &mut [u8], timeout: Duration) -> Result<()> {
        let stream = self.stream.as_mut().ok_or_else(|| {
            Error::Protocol("incomplete frame: connection closed".to_string())
        })?;
        let timeout = if timeout.is_zero() {
            None
        } else {
            Some(timeout)
        };
        stream
            .set_read_timeout(timeout)
            .map_err(|e| Error::Protocol(format!("incomplete frame: {}", e)))?;
        stream
            .read_exact(buf)
            .map_err(|e| Error::Protocol(format!("incomplete frame: {}", e)))
    }

    /// Drop the socket. Idempotent.
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            tracing::info!("connection closed");
        }
    }
}

impl Drop for ControlConnection {
    fn drop(&mut self) {
        self.close();
    }
}
