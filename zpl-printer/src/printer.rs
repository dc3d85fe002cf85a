//! Printer adapters for sending ZPL data
//!
//! Network printers listen for raw jobs on TCP port 9100. They rarely answer
//! and often keep the socket open after taking a job, so completion is a race
//! between a reply, the peer closing, and a short post-write grace timer,
//! all bounded by a hard timeout. Only failing to get the job onto the wire
//! counts as an error.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{Instant, sleep, sleep_until, timeout, timeout_at};
use tracing::{debug, info, instrument, warn};

use crate::error::{PrintError, PrintResult};

/// Raw socket port of ZPL printers
pub const DEFAULT_PORT: u16 = 9100;

/// Wait after the write before assuming the job was taken
pub const DEFAULT_GRACE: Duration = Duration::from_millis(1000);

/// Hard upper bound for one job, connect included
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Host and port of a destination printer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterTarget {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl PrinterTarget {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for PrinterTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Which signal ended a successful job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    /// Printer sent data back
    Reply,
    /// Printer closed (or reset) the connection after the write
    RemoteClosed,
    /// Nothing happened during the grace period
    GraceElapsed,
    /// Hard timeout hit after the connection was up
    HardTimeout,
}

impl Completion {
    /// Whether the printer itself reacted to the job
    pub fn is_confirmed(self) -> bool {
        matches!(self, Completion::Reply | Completion::RemoteClosed)
    }
}

/// Trait for printer adapters
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Send a raw ZPL job to the printer
    async fn print(&self, data: &[u8]) -> PrintResult<Completion>;

    /// Check if the printer is online/reachable
    async fn is_online(&self) -> bool;
}

/// Network printer (TCP port 9100)
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    addr: SocketAddr,
    grace: Duration,
    timeout: Duration,
}

impl NetworkPrinter {
    /// Create a new network printer from an IP address and port
    pub fn new(host: &str, port: u16) -> PrintResult<Self> {
        let ip: IpAddr = host
            .trim()
            .parse()
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", host)))?;

        Ok(Self::with_addr(SocketAddr::new(ip, port)))
    }

    /// Create from a socket address string (e.g., "10.50.8.113:9100")
    pub fn from_addr(addr: &str) -> PrintResult<Self> {
        let addr: SocketAddr = addr
            .parse()
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", addr)))?;

        Ok(Self::with_addr(addr))
    }

    /// Create from a job target
    pub fn from_target(target: &PrinterTarget) -> PrintResult<Self> {
        Self::new(&target.host, target.port)
    }

    fn with_addr(addr: SocketAddr) -> Self {
        Self {
            addr,
            grace: DEFAULT_GRACE,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the post-write grace period
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Set the hard timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the printer address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Wait for the first completion signal after the job was written
    async fn await_completion(&self, stream: &mut TcpStream, deadline: Instant) -> Completion {
        let mut buf = [0u8; 256];

        tokio::select! {
            read = stream.read(&mut buf) => match read {
                Ok(0) => {
                    debug!("Printer closed the connection");
                    Completion::RemoteClosed
                }
                Ok(n) => {
                    debug!(bytes = n, "Printer replied");
                    Completion::Reply
                }
                Err(e) => {
                    warn!(error = %e, "Connection dropped after write, job assumed delivered");
                    Completion::RemoteClosed
                }
            },
            _ = sleep(self.grace) => Completion::GraceElapsed,
            _ = sleep_until(deadline) => Completion::HardTimeout,
        }
    }
}

impl Printer for NetworkPrinter {
    #[instrument(skip(data), fields(addr = %self.addr, data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<Completion> {
        let deadline = Instant::now() + self.timeout;

        info!("Connecting to printer");

        let mut stream = timeout_at(deadline, TcpStream::connect(self.addr))
            .await
            .map_err(|_| PrintError::Timeout(format!("Connection timeout: {}", self.addr)))?
            .map_err(|e| PrintError::Connection(format!("{}: {}", self.addr, e)))?;

        info!("Connected, sending {} bytes", data.len());

        let write = async {
            stream.write_all(data).await?;
            stream.flush().await
        };
        match timeout_at(deadline, write).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(PrintError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Write failed: {}", e),
                )));
            }
            Err(_) => {
                warn!("Write still pending at hard timeout, job assumed delivered");
                return Ok(Completion::HardTimeout);
            }
        }

        let completion = self.await_completion(&mut stream, deadline).await;

        info!(?completion, "Print job sent");
        Ok(completion)
    }

    #[instrument(fields(addr = %self.addr))]
    async fn is_online(&self) -> bool {
        match timeout(self.timeout, TcpStream::connect(self.addr)).await {
            Ok(Ok(_)) => {
                info!("Printer online");
                true
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Printer offline");
                false
            }
            Err(_) => {
                warn!("Printer check timeout");
                false
            }
        }
    }
}
