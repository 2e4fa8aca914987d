//! Single request/response exchange with the clock over a serial line.
//!
//! The device echoes every command line before it answers, so an exchange is:
//! write `payload\n`, read and drop the echo line, read the response line.

use std::io::{self, Read, Write};
use std::thread;
use std::time::{Duration, Instant};

use serialport::SerialPort;
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::command::{LogicalCommand, WireCommand};
use crate::error::{Error, Line, Result};

pub const DEFAULT_TIMEOUT_MS: u64 = 2000;

/* Poll granularity of the port; the exchange deadline is enforced on top of it */
const PORT_READ_TIMEOUT_MS: u64 = 100;
const IDLE_BACKOFF_MS: u64 = 5;
const READ_CHUNK: usize = 64;

/// Where the clock is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialEndpoint {
    pub port: String,
    pub baud_rate: u32,
}

impl SerialEndpoint {
    pub fn new(port: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port: port.into(),
            baud_rate,
        }
    }
}

/// Opens the byte stream for an endpoint. The returned link is closed when dropped.
pub trait Connector {
    type Link: Read + Write;

    fn open(&self, endpoint: &SerialEndpoint) -> Result<Self::Link>;
}

/// Opens real serial ports, 8N1 without flow control.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialConnector;

impl Connector for SerialConnector {
    type Link = Box<dyn SerialPort>;

    fn open(&self, endpoint: &SerialEndpoint) -> Result<Self::Link> {
        serialport::new(&endpoint.port, endpoint.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(Duration::from_millis(PORT_READ_TIMEOUT_MS))
            .open()
            .map_err(|e| Error::Connection {
                port: endpoint.port.clone(),
                reason: e.to_string(),
            })
    }
}

/// Runs exchanges through a connector, with a bound on how long each line may take.
#[derive(Debug, Clone)]
pub struct Session<C = SerialConnector, K = SystemClock> {
    connector: C,
    clock: K,
    timeout: Duration,
}

impl Session {
    pub fn serial() -> Self {
        Session::new(SerialConnector)
    }
}

impl<C: Connector> Session<C> {
    pub fn new(connector: C) -> Self {
        Session {
            connector,
            clock: SystemClock,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl<C: Connector, K: Clock> Session<C, K> {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_clock<K2: Clock>(self, clock: K2) -> Session<C, K2> {
        Session {
            connector: self.connector,
            clock,
            timeout: self.timeout,
        }
    }

    /// Encode `command` and run one exchange with the device at `endpoint`.
    pub fn perform_exchange(
        &self,
        command: &LogicalCommand,
        endpoint: &SerialEndpoint,
    ) -> Result<String> {
        let wire = command.encode(&self.clock);
        self.exchange(&wire, endpoint)
    }

    /// Send an already encoded command and return the decoded response line.
    pub fn exchange(&self, wire: &WireCommand, endpoint: &SerialEndpoint) -> Result<String> {
        let mut link = self.connector.open(endpoint)?;
        debug!(port = %endpoint.port, baud = endpoint.baud_rate, "connection opened");

        let result = self.run(&mut link, wire);

        drop(link);
        debug!(port = %endpoint.port, "connection released");

        if let Err(ref e) = result {
            warn!(port = %endpoint.port, payload = %wire, error = %e, "exchange failed");
        }
        result
    }

    fn run<L: Read + Write>(&self, link: &mut L, wire: &WireCommand) -> Result<String> {
        let mut frame = Vec::with_capacity(wire.as_bytes().len() + 1);
        frame.extend_from_slice(wire.as_bytes());
        frame.push(b'\n');

        link.write_all(&frame).map_err(Error::Transport)?;
        link.flush().map_err(Error::Transport)?;
        debug!(payload = %wire, "command sent");

        let mut lines = LineReader::new(link);

        let echo = lines.read_line(Line::Echo, self.timeout)?;
        debug!(echo = %String::from_utf8_lossy(&echo).trim_end(), "echo discarded");

        let response = lines.read_line(Line::Response, self.timeout)?;
        let response = String::from_utf8(response)?;
        let response = response.trim_end().to_string();
        debug!(%response, "response received");

        Ok(response)
    }
}

/// Splits a byte stream into `\n` terminated lines, keeping bytes read past a line end.
struct LineReader<'a, R> {
    inner: &'a mut R,
    pending: Vec<u8>,
}

impl<'a, R: Read> LineReader<'a, R> {
    fn new(inner: &'a mut R) -> Self {
        LineReader {
            inner,
            pending: Vec::new(),
        }
    }

    /// Next line including its `\n`. Fails once `timeout` elapses without one.
    ///
    /// A timeout too large to add to the current instant waits indefinitely.
    fn read_line(&mut self, line: Line, timeout: Duration) -> Result<Vec<u8>> {
        let deadline = Instant::now().checked_add(timeout);
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            if let Some(end) = self.pending.iter().position(|&b| b == b'\n') {
                return Ok(self.pending.drain(..=end).collect());
            }

            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return Err(Error::Timeout {
                    line,
                    after: timeout,
                });
            }

            match self.inner.read(&mut chunk) {
                Ok(n) if n > 0 => self.pending.extend_from_slice(&chunk[..n]),
                Ok(_) => thread::sleep(Duration::from_millis(IDLE_BACKOFF_MS)),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
                    ) =>
                {
                    thread::sleep(Duration::from_millis(IDLE_BACKOFF_MS))
                }
                Err(e) => {
                    debug!(%line, error = %e, "read failed");
                    return Err(Error::Transport(e));
                }
            }
        }
    }
}
