//! Best-effort datagram emitter.
//!
//! Owns a bound UDP socket and a reusable 64-byte frame buffer. Sends are
//! fire-and-forget: transport failures bump a counter and are never
//! surfaced to the tick.

use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use pursuit_common::protocol::{StateFrame, FRAME_SIZE};

use crate::error::CoreError;

/// Emitter transmit statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitterStats {
    /// Frames transmitted.
    pub send_count: u64,
    /// Transport errors observed.
    pub error_count: u64,
    /// `error_count / max(1, send_count)`.
    pub error_rate: f64,
}

/// One-shot, non-blocking state frame sender.
#[derive(Debug)]
pub struct StateEmitter {
    socket: UdpSocket,
    dest: SocketAddr,
    buf: [u8; FRAME_SIZE],
    send_count: u64,
    error_count: u64,
}

impl StateEmitter {
    /// Bind an ephemeral local socket and resolve the destination.
    ///
    /// # Errors
    ///
    /// [`CoreError::Bind`] if no local socket can be bound,
    /// [`CoreError::BadDestination`] if `dest` does not resolve. Both are
    /// fatal at startup.
    pub fn new(dest: &str) -> Result<Self, CoreError> {
        let socket = UdpSocket::bind("0.0.0.0:0").map_err(|e| CoreError::Bind {
            port: 0,
            source: e,
        })?;
        socket.set_nonblocking(true).map_err(|e| CoreError::Bind {
            port: 0,
            source: e,
        })?;

        let dest_addr = dest
            .to_socket_addrs()
            .map_err(|e| CoreError::BadDestination {
                dest: dest.to_string(),
                source: e,
            })?
            .next()
            .ok_or_else(|| CoreError::BadDestination {
                dest: dest.to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::AddrNotAvailable,
                    "no address resolved",
                ),
            })?;

        Ok(Self {
            socket,
            dest: dest_addr,
            buf: [0u8; FRAME_SIZE],
            send_count: 0,
            error_count: 0,
        })
    }

    /// Encode into the owned buffer and transmit. Never raises; failures
    /// are counted.
    #[inline]
    pub fn send(&mut self, frame: &StateFrame) {
        frame.encode_into(&mut self.buf);
        match self.socket.send_to(&self.buf, self.dest) {
            Ok(_) => self.send_count += 1,
            Err(_) => self.error_count += 1,
        }
    }

    /// Transmit statistics.
    pub fn stats(&self) -> EmitterStats {
        EmitterStats {
            send_count: self.send_count,
            error_count: self.error_count,
            error_rate: self.error_count as f64 / self.send_count.max(1) as f64,
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
