//! [`EventSource`] that subscribes to i3 window events.
//!
//! A dedicated connection sends `SUBSCRIBE ["window"]` and then only ever
//! reads: every `window` event frame is decoded into a [`WindowEvent`] and
//! forwarded.  Other event types are skipped.
//!
//! i3 closes the socket when it restarts in place (`i3-msg restart`).  The
//! source then re-subscribes, retrying with a growing delay until the
//! reconnect timeout runs out.

use super::ipc::{socket_path, Connection, I3Error, MessageType, WINDOW_EVENT};
use crate::command::WindowEvent;
use crate::traits::EventSource;
use log::{debug, error, info, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// How long to keep trying to re-subscribe after i3 closed the socket.
pub const DEFAULT_RECONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const RECONNECT_DELAY_MIN: Duration = Duration::from_millis(50);
const RECONNECT_DELAY_MAX: Duration = Duration::from_secs(1);

/// Reply to a `SUBSCRIBE` request.
#[derive(Deserialize)]
struct SubscribeReply {
    success: bool,
}

/// Why forwarding on one connection stopped.
#[derive(Debug, PartialEq, Eq)]
enum StreamEnd {
    SinkClosed,
    Disconnected,
}

/// Window-event subscription on the i3 socket.
#[derive(Debug, Clone)]
pub struct I3EventSource {
    socket: PathBuf,
    /// Look the socket up again before each reconnect attempt.
    follow_env: bool,
    reconnect_timeout: Duration,
}

impl I3EventSource {
    /// Subscribe on the socket at `path`, reconnecting to the same path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            socket: path.as_ref().to_path_buf(),
            follow_env: false,
            reconnect_timeout: DEFAULT_RECONNECT_TIMEOUT,
        }
    }

    /// Subscribe on the socket of the running i3, resolving it again
    /// whenever the connection has to be re-established.
    pub fn from_env() -> Result<Self, I3Error> {
        let mut source = Self::new(socket_path()?);
        source.follow_env = true;
        Ok(source)
    }

    /// Give up re-subscribing after `timeout`.  Zero means a single attempt.
    pub fn with_reconnect_timeout(mut self, timeout: Duration) -> Self {
        self.reconnect_timeout = timeout;
        self
    }

    fn subscribe(&self) -> Result<Connection, I3Error> {
        let mut conn = Connection::connect(&self.socket)?;
        let reply = conn.request(MessageType::Subscribe, br#"["window"]"#)?;
        let reply: SubscribeReply = serde_json::from_slice(&reply)?;
        if !reply.success {
            return Err(I3Error::Protocol("subscription to window events refused".into()));
        }
        info!("subscribed to window events on {}", self.socket.display());
        Ok(conn)
    }

    /// Retry [`subscribe`](Self::subscribe) until it works or the reconnect
    /// timeout has passed; the last error is returned in the latter case.
    fn resubscribe(&mut self) -> Result<Connection, I3Error> {
        let deadline = Instant::now() + self.reconnect_timeout;
        let mut delay = RECONNECT_DELAY_MIN;
        loop {
            if self.follow_env {
                match socket_path() {
                    Ok(path) => self.socket = path,
                    Err(e) => debug!("keeping {}: {}", self.socket.display(), e),
                }
            }
            match self.subscribe() {
                Ok(conn) => return Ok(conn),
                Err(e) if Instant::now() >= deadline => return Err(e),
                Err(e) => {
                    debug!("re-subscribe failed ({}), retrying in {:?}", e, delay);
                    std::thread::sleep(delay);
                    delay = (delay * 2).min(RECONNECT_DELAY_MAX);
                }
            }
        }
    }

    /// Forward window events from `conn` until it closes or `sink` does.
    fn forward(
        &self,
        conn: &mut Connection,
        sink: &mpsc::Sender<WindowEvent>,
    ) -> Result<StreamEnd, I3Error> {
        loop {
            let msg = match conn.next_message() {
                Ok(Some(msg)) => msg,
                Ok(None) => return Ok(StreamEnd::Disconnected),
                Err(I3Error::Io(e)) => {
                    warn!("event socket read error: {}", e);
                    return Ok(StreamEnd::Disconnected);
                }
                Err(e) => return Err(e),
            };
            if !msg.is_event() {
                warn!("unexpected reply of type {} on event connection", msg.msg_type);
                continue;
            }
            if msg.msg_type != WINDOW_EVENT {
                debug!("skipping event of type {:#x}", msg.msg_type);
                continue;
            }
            match serde_json::from_slice::<WindowEvent>(&msg.payload) {
                Ok(event) => {
                    debug!("received window event {}", event.change);
                    if sink.send(event).is_err() {
                        return Ok(StreamEnd::SinkClosed);
                    }
                }
                Err(e) => {
                    error!("bad window event: {}", e);
                }
            }
        }
    }
}

impl EventSource for I3EventSource {
    type Error = I3Error;

    /// Subscribe and start forwarding window events.
    ///
    /// This method **blocks** until the receiving end of `sink` is dropped
    /// (returns `Ok`) or the subscription cannot be (re-)established
    /// (returns the error).  A failure to subscribe the first time is not
    /// retried.  Run it on a dedicated thread.
    fn run(&mut self, sink: mpsc::Sender<WindowEvent>) -> Result<(), Self::Error> {
        let mut conn = self.subscribe()?;
        loop {
            match self.forward(&mut conn, &sink)? {
                StreamEnd::SinkClosed => {
                    info!("sink closed, shutting down");
                    return Ok(());
                }
                StreamEnd::Disconnected => {
                    warn!("i3 event stream ended, re-subscribing");
                    conn = self.resubscribe()?;
                }
            }
        }
    }
}
