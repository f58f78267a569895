//! Tokio-backed transport and flush timer.
//!
//! [`spawn`] starts an I/O task that owns the socket. The returned
//! [`TcpTransport`] is the [`Transport`] half handed to
//! [`Connection`](crate::Connection); it forwards connect/disconnect/write
//! directives into the task. Socket lifecycle, inbound lines, and flush
//! ticks come back as [`Input`]s for the application loop to feed into
//! [`Connection::apply`](crate::Connection::apply).
//!
//! The flush interval only ticks while a socket is open, so the outbound
//! queue pacing starts on connect and stops on disconnect.

use std::time::Duration;

use anyhow::Result;
use bytes::{BufMut, BytesMut};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::{Decoder, Encoder, Framed};
use tracing::warn;

use crate::conn::FLUSH_INTERVAL_MS;
use crate::error::ClientError;
use crate::transport::{Input, Transport};

/// Longest inbound line accepted before the connection is considered
/// misbehaving.
pub const MAX_LINE_LEN: usize = 8191;

/// Newline-delimited line codec with a length cap.
///
/// Inbound lines are UTF-8 validated and stripped of `\r\n`/`\n`;
/// outbound lines get a single `\n` appended.
#[derive(Debug, Default)]
pub struct LineCodec;

impl LineCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ClientError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>, ClientError> {
        let Some(pos) = src.iter().position(|&b| b == b'\n') else {
            if src.len() > MAX_LINE_LEN {
                return Err(ClientError::LineTooLong(src.len()));
            }
            return Ok(None);
        };
        if pos > MAX_LINE_LEN {
            return Err(ClientError::LineTooLong(pos));
        }
        let frame = src.split_to(pos + 1);
        let end = if pos > 0 && frame[pos - 1] == b'\r' {
            pos - 1
        } else {
            pos
        };
        let line = std::str::from_utf8(&frame[..end])?;
        Ok(Some(line.to_owned()))
    }
}

impl Encoder<String> for LineCodec {
    type Error = ClientError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> Result<(), ClientError> {
        dst.reserve(line.len() + 1);
        dst.put(line.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}

/// Directives the transport half queues for the I/O task.
#[derive(Debug)]
enum Directive {
    Connect(String, u16),
    Disconnect,
    Write(String),
}

/// The [`Transport`] half of a spawned I/O task.
///
/// Calls never block; they enqueue a directive the task applies in order.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    directives: mpsc::UnboundedSender<Directive>,
}

impl Transport for TcpTransport {
    fn connect(&mut self, host: &str, port: u16) {
        let _ = self
            .directives
            .send(Directive::Connect(host.to_owned(), port));
    }

    fn disconnect(&mut self) {
        let _ = self.directives.send(Directive::Disconnect);
    }

    fn write_line(&mut self, line: &str) {
        let _ = self.directives.send(Directive::Write(line.to_owned()));
    }
}

/// Spawn the I/O task on the current tokio runtime.
///
/// Fails when called outside a runtime; all later failures are reported
/// through the input stream, never panicked or thrown.
pub fn spawn() -> Result<(TcpTransport, mpsc::UnboundedReceiver<Input>), ClientError> {
    let handle = tokio::runtime::Handle::try_current()
        .map_err(|err| ClientError::Runtime(err.to_string()))?;
    let (dir_tx, dir_rx) = mpsc::unbounded_channel();
    let (in_tx, in_rx) = mpsc::unbounded_channel();
    handle.spawn(io_task(dir_rx, in_tx));
    Ok((TcpTransport { directives: dir_tx }, in_rx))
}

type Socket = Framed<TcpStream, LineCodec>;

/// Outcome of one wait, resolved before any state is touched.
enum Step {
    Directive(Option<Directive>),
    Read(Option<Result<String, ClientError>>),
    Tick,
}

async fn io_task(
    mut directives: mpsc::UnboundedReceiver<Directive>,
    inputs: mpsc::UnboundedSender<Input>,
) {
    let mut socket: Option<Socket> = None;
    let mut flush = tokio::time::interval(Duration::from_millis(FLUSH_INTERVAL_MS));
    flush.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        let step = match &mut socket {
            Some(stream) => tokio::select! {
                directive = directives.recv() => Step::Directive(directive),
                line = stream.next() => Step::Read(line),
                _ = flush.tick() => Step::Tick,
            },
            // no socket: nothing to read and nothing to pace
            None => Step::Directive(directives.recv().await),
        };

        match step {
            Step::Directive(None) => break,
            Step::Directive(Some(d)) => apply(d, &mut socket, &inputs).await,
            Step::Read(Some(Ok(line))) => {
                let _ = inputs.send(Input::Line(line));
            }
            Step::Read(Some(Err(err))) => {
                let _ = inputs.send(Input::Error {
                    kind: err.kind(),
                    message: err.to_string(),
                });
                socket = None;
                let _ = inputs.send(Input::Closed);
            }
            Step::Read(None) => {
                socket = None;
                let _ = inputs.send(Input::Closed);
            }
            Step::Tick => {
                let _ = inputs.send(Input::Tick);
            }
        }
    }
}

async fn apply(
    directive: Directive,
    socket: &mut Option<Socket>,
    inputs: &mpsc::UnboundedSender<Input>,
) {
    match directive {
        Directive::Connect(host, port) => {
            match TcpStream::connect((host.as_str(), port)).await {
                Ok(stream) => {
                    if let Err(err) = enable_keepalive(&stream) {
                        warn!("failed to enable TCP keepalive: {}", err);
                    }
                    *socket = Some(Framed::new(stream, LineCodec::new()));
                    let _ = inputs.send(Input::Opened);
                }
                Err(err) => {
                    let _ = inputs.send(Input::Error {
                        kind: err.kind(),
                        message: err.to_string(),
                    });
                }
            }
        }
        Directive::Disconnect => {
            if socket.take().is_some() {
                let _ = inputs.send(Input::Closed);
            }
        }
        Directive::Write(line) => match socket {
            Some(stream) => {
                if let Err(err) = stream.send(line).await {
                    let _ = inputs.send(Input::Error {
                        kind: err.kind(),
                        message: err.to_string(),
                    });
                }
            }
            None => warn!(%line, "write with no open socket"),
        },
    }
}

fn enable_keepalive(stream: &TcpStream) -> Result<()> {
    use socket2::{SockRef, TcpKeepalive};

    let sock = SockRef::from(stream);
    let keepalive = TcpKeepalive::new()
        .with_time(Duration::from_secs(120))
        .with_interval(Duration::from_secs(30));

    sock.set_tcp_keepalive(&keepalive)?;
    Ok(())
}
