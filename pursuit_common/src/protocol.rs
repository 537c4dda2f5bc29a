//! State wire protocol: one fixed-layout 64-byte frame per control tick.
//!
//! Binary format (little-endian, 64 bytes total):
//!
//! | Offset | Size | Field        | Type |
//! |-------:|-----:|--------------|------|
//! |      0 |    8 | timestamp_us | f64  |
//! |      8 |    8 | cursor_x     | f64  |
//! |     16 |    8 | cursor_y     | f64  |
//! |     24 |    8 | cursor_vx    | f64  |
//! |     32 |    8 | cursor_vy    | f64  |
//! |     40 |    8 | target_x     | f64  |
//! |     48 |    8 | target_y     | f64  |
//! |     56 |    4 | task_state   | u32  |
//! |     60 |    4 | trial_number | u32  |
//!
//! The encoder writes into a caller-owned buffer so the steady emit path
//! performs no allocation.

use thiserror::Error;

/// Size of one encoded state frame in bytes.
pub const FRAME_SIZE: usize = 64;

/// Task lifecycle state as carried on the wire.
///
/// Terminal states (`Completed`, `Failed`) are sticky: a task that reached
/// one does not transition again until reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum TaskState {
    /// Constructed, not yet updated.
    #[default]
    Idle = 0,
    /// Actively updating.
    Running = 1,
    /// Suspended, may resume.
    Paused = 2,
    /// Terminal: ended successfully.
    Completed = 3,
    /// Terminal: ended by task-defined failure (a first-class experiment
    /// outcome, not an error).
    Failed = 4,
}

impl TaskState {
    /// Convert from the raw wire discriminant. Returns `None` for
    /// out-of-range values.
    #[inline]
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Idle),
            1 => Some(Self::Running),
            2 => Some(Self::Paused),
            3 => Some(Self::Completed),
            4 => Some(Self::Failed),
            _ => None,
        }
    }

    /// Whether this state is terminal (no further transitions until reset).
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Frame decode error.
#[derive(Debug, Clone, Error)]
pub enum FrameError {
    /// Buffer shorter than [`FRAME_SIZE`].
    #[error("frame too short: {len} bytes, need 64")]
    TooShort { len: usize },

    /// `task_state` field holds an unknown discriminant.
    #[error("unknown task state discriminant {0}")]
    BadTaskState(u32),
}

/// One per-tick state message.
///
/// Value type; `encode_into` / `decode` round-trip bit-exactly in every
/// field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateFrame {
    /// Elapsed time since run start [µs].
    pub timestamp_us: f64,
    /// Cursor position X [m].
    pub cursor_x: f64,
    /// Cursor position Y [m].
    pub cursor_y: f64,
    /// Cursor velocity X [m/s].
    pub cursor_vx: f64,
    /// Cursor velocity Y [m/s].
    pub cursor_vy: f64,
    /// Target position X [m].
    pub target_x: f64,
    /// Target position Y [m].
    pub target_y: f64,
    /// Current task state.
    pub task_state: TaskState,
    /// Current trial number.
    pub trial_number: u32,
}

impl StateFrame {
    /// Encode into a caller-owned 64-byte buffer.
    #[inline]
    pub fn encode_into(&self, buf: &mut [u8; FRAME_SIZE]) {
        buf[0..8].copy_from_slice(&self.timestamp_us.to_le_bytes());
        buf[8..16].copy_from_slice(&self.cursor_x.to_le_bytes());
        buf[16..24].copy_from_slice(&self.cursor_y.to_le_bytes());
        buf[24..32].copy_from_slice(&self.cursor_vx.to_le_bytes());
        buf[32..40].copy_from_slice(&self.cursor_vy.to_le_bytes());
        buf[40..48].copy_from_slice(&self.target_x.to_le_bytes());
        buf[48..56].copy_from_slice(&self.target_y.to_le_bytes());
        buf[56..60].copy_from_slice(&(self.task_state as u32).to_le_bytes());
        buf[60..64].copy_from_slice(&self.trial_number.to_le_bytes());
    }

    /// Decode from a byte slice. Extra trailing bytes are ignored.
    pub fn decode(data: &[u8]) -> Result<Self, FrameError> {
        if data.len() < FRAME_SIZE {
            return Err(FrameError::TooShort { len: data.len() });
        }

        let f64_at = |off: usize| {
            let mut b = [0u8; 8];
            b.copy_from_slice(&data[off..off + 8]);
            f64::from_le_bytes(b)
        };
        let u32_at = |off: usize| {
            let mut b = [0u8; 4];
            b.copy_from_slice(&data[off..off + 4]);
            u32::from_le_bytes(b)
        };

        let raw_state = u32_at(56);
        let task_state =
            TaskState::from_u32(raw_state).ok_or(FrameError::BadTaskState(raw_state))?;

        Ok(Self {
            timestamp_us: f64_at(0),
            cursor_x: f64_at(8),
            cursor_y: f64_at(16),
            cursor_vx: f64_at(24),
            cursor_vy: f64_at(32),
            target_x: f64_at(40),
            target_y: f64_at(48),
            task_state,
            trial_number: u32_at(60),
        })
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
