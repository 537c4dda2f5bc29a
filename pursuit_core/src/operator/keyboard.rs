//! Keyboard bridge operator: key states arrive as UDP datagrams from an
//! external process and are drained non-blockingly at the start of each
//! tick.
//!
//! Wire-in format: datagrams of at least 4 bytes on the keyboard port,
//! bytes [0..3] = (up, down, left, right), nonzero → pressed. Extra bytes
//! are ignored. The last datagram in the socket queue wins.

use std::net::UdpSocket;

use pursuit_common::types::{Force2D, PlantState};

use crate::error::CoreError;

/// Force magnitude per pressed direction [N]. Opposing keys cancel.
pub const KEY_FORCE_N: f64 = 1.0;

/// Decoded key state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl KeyState {
    /// Decode from a datagram payload. Returns `None` for runt datagrams.
    #[inline]
    fn from_datagram(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }
        Some(Self {
            up: data[0] != 0,
            down: data[1] != 0,
            left: data[2] != 0,
            right: data[3] != 0,
        })
    }
}

/// Non-blocking UDP keyboard device.
#[derive(Debug)]
pub struct KeyboardOperator {
    socket: UdpSocket,
    keys: KeyState,
    /// Datagrams applied.
    pub recv_count: u64,
    /// Transport errors other than "no data" (counted, never raised).
    pub error_count: u64,
    recv_buf: [u8; 64],
}

impl KeyboardOperator {
    /// Bind the keyboard port on localhost.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Bind`] if the port cannot be bound; fatal at
    /// startup, per the construction-error contract.
    pub fn bind(port: u16) -> Result<Self, CoreError> {
        let socket = UdpSocket::bind(("127.0.0.1", port))
            .map_err(|e| CoreError::Bind { port, source: e })?;
        socket
            .set_nonblocking(true)
            .map_err(|e| CoreError::Bind { port, source: e })?;
        Ok(Self {
            socket,
            keys: KeyState::default(),
            recv_count: 0,
            error_count: 0,
            recv_buf: [0u8; 64],
        })
    }

    /// Drain all queued datagrams; the most recent valid one becomes the
    /// current key state. Never blocks, never raises.
    pub fn drain(&mut self) {
        loop {
            match self.socket.recv(&mut self.recv_buf) {
                Ok(len) => {
                    if let Some(keys) = KeyState::from_datagram(&self.recv_buf[..len]) {
                        self.keys = keys;
                        self.recv_count += 1;
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => break,
                Err(_) => {
                    self.error_count += 1;
                    break;
                }
            }
        }
    }

    /// Current decoded key state.
    #[inline]
    pub fn keys(&self) -> KeyState {
        self.keys
    }

    /// Map key states to a constant-magnitude force. The plant state is
    /// unused; the human closes the loop through the viewer.
    #[inline]
    pub fn compute_input(&mut self, _state: &PlantState) -> Force2D {
        let k = &self.keys;
        let ux = (k.right as i8 - k.left as i8) as f64 * KEY_FORCE_N;
        let uy = (k.up as i8 - k.down as i8) as f64 * KEY_FORCE_N;
        Force2D { ux, uy }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn bound_pair() -> (KeyboardOperator, UdpSocket, u16) {
        // Bind port 0 for an ephemeral port, then learn it.
        let op = KeyboardOperator::bind(0).unwrap();
        let port = op.socket.local_addr().unwrap().port();
        let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
        (op, sender, port)
    }

    fn settle(op: &mut KeyboardOperator) {
        // Loopback delivery is fast but not instantaneous.
        for _ in 0..50 {
            op.drain();
            if op.recv_count > 0 {
                return;
            }
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
    }

    #[test]
    fn decodes_key_bytes() {
        let (mut op, sender, port) = bound_pair();
        sender
            .send_to(&[1u8, 0, 0, 1], ("127.0.0.1", port))
            .unwrap();
        settle(&mut op);
        assert_eq!(
            op.keys(),
            KeyState {
                up: true,
                down: false,
                left: false,
                right: true,
            }
        );
        let u = op.compute_input(&PlantState::ZERO);
        assert_eq!(u.ux, KEY_FORCE_N);
        assert_eq!(u.uy, KEY_FORCE_N);
    }

    #[test]
    fn nonzero_maps_to_pressed_and_extra_bytes_ignored() {
        let (mut op, sender, port) = bound_pair();
        sender
            .send_to(&[0u8, 255, 7, 0, 0xde, 0xad], ("127.0.0.1", port))
            .unwrap();
        settle(&mut op);
        assert_eq!(
            op.keys(),
            KeyState {
                up: false,
                down: true,
                left: true,
                right: false,
            }
        );
    }

    #[test]
    fn last_datagram_wins() {
        let (mut op, sender, port) = bound_pair();
        sender
            .send_to(&[1u8, 0, 0, 0], ("127.0.0.1", port))
            .unwrap();
        sender
            .send_to(&[0u8, 0, 1, 0], ("127.0.0.1", port))
            .unwrap();
        // Let both land, then drain once.
        std::thread::sleep(std::time::Duration::from_millis(20));
        op.drain();
        assert_eq!(
            op.keys(),
            KeyState {
                left: true,
                ..KeyState::default()
            }
        );
        assert_eq!(op.recv_count, 2);
    }

    #[test]
    fn runt_datagram_ignored() {
        let (mut op, sender, port) = bound_pair();
        sender.send_to(&[1u8, 1], ("127.0.0.1", port)).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        op.drain();
        assert_eq!(op.keys(), KeyState::default());
        assert_eq!(op.recv_count, 0);
    }

    #[test]
    fn opposing_keys_cancel() {
        let mut op = KeyboardOperator::bind(0).unwrap();
        op.keys = KeyState {
            up: true,
            down: true,
            left: true,
            right: true,
        };
        let u = op.compute_input(&PlantState::ZERO);
        assert_eq!(u.ux, 0.0);
        assert_eq!(u.uy, 0.0);
    }

    #[test]
    fn drain_on_empty_socket_is_quiet() {
        let mut op = KeyboardOperator::bind(0).unwrap();
        op.drain();
        assert_eq!(op.recv_count, 0);
        assert_eq!(op.error_count, 0);
    }
}
