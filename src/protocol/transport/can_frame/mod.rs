//! In-memory representation of a CAN-FD frame and the DLC rounding
//! rules that map arbitrary payload lengths onto legal frame sizes.

/// Largest payload a single CAN-FD frame (and therefore one datagram)
/// can carry.
pub const MAX_DATAGRAM_PAYLOAD: usize = 64;

/// Filler byte appended when DLC rounding grows a payload.
pub const PAD_BYTE: u8 = 0x50;

#[derive(Clone, Debug)]
/// Raw CAN-FD frame as read from the controller.
pub struct FdFrame {
    /// Raw CAN identifier. Register-protocol frames only use the low
    /// 16 bits; anything above belongs to another protocol.
    pub id: u32,
    /// Payload buffer sized for the largest FD frame.
    pub data: [u8; MAX_DATAGRAM_PAYLOAD],
    /// Number of valid payload bytes (already decoded from the DLC).
    pub len: usize,
}

impl FdFrame {
    /// Create an empty frame, ready to be filled by a driver poll.
    pub const fn new() -> Self {
        Self {
            id: 0,
            data: [0; MAX_DATAGRAM_PAYLOAD],
            len: 0,
        }
    }

    /// Immutable view over the populated bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len]
    }
}

impl Default for FdFrame {
    fn default() -> Self {
        Self::new()
    }
}

/// Round a byte count up to the smallest legal CAN-FD data length.
///
/// The legal set is `{0..=8, 12, 16, 20, 24, 32, 48, 64}`. Values
/// above 64 do not fit in one frame and map to `0` (invalid).
pub fn round_up_dlc(value: usize) -> usize {
    match value {
        0..=8 => value,
        9..=12 => 12,
        13..=16 => 16,
        17..=20 => 20,
        21..=24 => 24,
        25..=32 => 32,
        33..=48 => 48,
        49..=64 => 64,
        _ => 0,
    }
}
