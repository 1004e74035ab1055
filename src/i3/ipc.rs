//! The i3 IPC wire protocol.
//!
//! Every message, in both directions, is framed as
//!
//! | bytes | content                                  |
//! |-------|------------------------------------------|
//! | 6     | magic string `i3-ipc`                    |
//! | 4     | payload length (u32, native byte order)  |
//! | 4     | message type (u32, native byte order)    |
//! | n     | payload, JSON except for requests        |
//!
//! Replies carry the type of the request they answer.  Events (only ever
//! seen on a subscribed connection) have the highest bit of the type set.
//!
//! sway speaks the same protocol, so the socket from `$SWAYSOCK` works too.

use std::io::{self, Read, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

/// Magic prefix of every frame.
pub const MAGIC: &[u8; 6] = b"i3-ipc";

/// Magic plus two u32 fields.
pub const HEADER_LEN: usize = MAGIC.len() + 8;

/// Largest payload accepted from the socket.
pub const MAX_PAYLOAD_LEN: u32 = 64 * 1024 * 1024;

/// Bit set on the type of every event frame.
pub const EVENT_BIT: u32 = 1 << 31;

/// Type of a `window` event frame.
pub const WINDOW_EVENT: u32 = EVENT_BIT | 3;

/// Request types this crate sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum MessageType {
    RunCommand = 0,
    GetWorkspaces = 1,
    Subscribe = 2,
    GetTree = 4,
}

impl MessageType {
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// Errors that can occur when talking to i3.
#[derive(Debug, thiserror::Error)]
pub enum I3Error {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("command failed: {0}")]
    Command(String),
    #[error("cannot find i3 socket: {0}")]
    NoSocket(String),
}

/// A decoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub msg_type: u32,
    pub payload: Vec<u8>,
}

impl Message {
    pub fn is_event(&self) -> bool {
        self.msg_type & EVENT_BIT != 0
    }
}

/// Write one frame.
pub fn write_message<W: Write>(w: &mut W, msg_type: u32, payload: &[u8]) -> Result<(), I3Error> {
    let len = u32::try_from(payload.len())
        .map_err(|_| I3Error::Protocol(format!("payload too large: {} bytes", payload.len())))?;
    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
    frame.extend_from_slice(MAGIC);
    frame.extend_from_slice(&len.to_ne_bytes());
    frame.extend_from_slice(&msg_type.to_ne_bytes());
    frame.extend_from_slice(payload);
    w.write_all(&frame)?;
    w.flush()?;
    Ok(())
}

/// Read one frame.
///
/// Returns `Ok(None)` if the stream ends cleanly before a new frame starts.
pub fn read_message<R: Read>(r: &mut R) -> Result<Option<Message>, I3Error> {
    let mut header = [0u8; HEADER_LEN];
    let mut filled = 0;
    while filled < HEADER_LEN {
        match r.read(&mut header[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => {
                return Err(I3Error::Protocol(format!(
                    "stream ended after {} header bytes",
                    filled
                )))
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    if &header[..MAGIC.len()] != MAGIC {
        return Err(I3Error::Protocol(format!(
            "bad magic {:?}",
            String::from_utf8_lossy(&header[..MAGIC.len()])
        )));
    }
    let len = u32::from_ne_bytes([header[6], header[7], header[8], header[9]]);
    let msg_type = u32::from_ne_bytes([header[10], header[11], header[12], header[13]]);

    if len > MAX_PAYLOAD_LEN {
        return Err(I3Error::Protocol(format!(
            "payload of {} bytes exceeds limit of {}",
            len, MAX_PAYLOAD_LEN
        )));
    }

    let mut payload = vec![0u8; len as usize];
    r.read_exact(&mut payload)?;
    Ok(Some(Message { msg_type, payload }))
}

/// Resolve the i3 IPC socket path.
///
/// Checks `$I3SOCK`, then `$SWAYSOCK`, then asks `i3 --get-socketpath`.
pub fn socket_path() -> Result<PathBuf, I3Error> {
    for var in ["I3SOCK", "SWAYSOCK"] {
        if let Ok(path) = std::env::var(var) {
            if !path.is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
    }

    let output = std::process::Command::new("i3")
        .arg("--get-socketpath")
        .output()
        .map_err(|e| I3Error::NoSocket(format!("I3SOCK not set and i3 not runnable: {}", e)))?;
    if !output.status.success() {
        return Err(I3Error::NoSocket(format!(
            "i3 --get-socketpath failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if path.is_empty() {
        return Err(I3Error::NoSocket("i3 --get-socketpath printed nothing".into()));
    }
    Ok(PathBuf::from(path))
}

/// A connection to the i3 IPC socket.
#[derive(Debug)]
pub struct Connection {
    stream: UnixStream,
}

impl Connection {
    pub fn connect(path: &Path) -> Result<Self, I3Error> {
        let stream = UnixStream::connect(path).map_err(|e| {
            I3Error::Io(io::Error::new(
                e.kind(),
                format!("connect to {}: {}", path.display(), e),
            ))
        })?;
        Ok(Self { stream })
    }

    /// Send a request and wait for its reply.
    ///
    /// Must not be used on a connection that has subscribed to events, since
    /// events may arrive before the reply.
    pub fn request(&mut self, msg_type: MessageType, payload: &[u8]) -> Result<Vec<u8>, I3Error> {
        write_message(&mut self.stream, msg_type.code(), payload)?;
        let reply = self.next_message()?.ok_or_else(|| {
            I3Error::Protocol(format!("connection closed awaiting reply to {:?}", msg_type))
        })?;
        if reply.msg_type != msg_type.code() {
            return Err(I3Error::Protocol(format!(
                "expected reply type {}, got {}",
                msg_type.code(),
                reply.msg_type
            )));
        }
        Ok(reply.payload)
    }

    /// Read the next frame, `None` once the socket is closed.
    pub fn next_message(&mut self) -> Result<Option<Message>, I3Error> {
        read_message(&mut self.stream)
    }
}
