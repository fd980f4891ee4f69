//! Creation and extraction of the 16-bit CAN identifiers used by the
//! register protocol: one byte of source node address, one byte of
//! destination node address.
use embedded_can::{ExtendedId, Id, StandardId};

//==================================================================================DATAGRAM_ID
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Source/destination node-address pair carried by a register-protocol
/// frame. Packed as `(source << 8) | destination`.
pub struct DatagramId {
    /// Node address of the sender.
    pub source: u8,
    /// Node address of the receiver.
    pub destination: u8,
}

impl DatagramId {
    /// Pair a source with a destination address.
    pub const fn new(source: u8, destination: u8) -> Self {
        Self {
            source,
            destination,
        }
    }

    /// Pack the pair into the raw 16-bit identifier.
    pub const fn raw(&self) -> u16 {
        ((self.source as u16) << 8) | (self.destination as u16)
    }

    /// Unpack a raw identifier into its address pair. Only the low
    /// 16 bits participate; callers must have screened foreign ids
    /// with [`is_register_protocol`] first.
    pub const fn from_raw(raw: u16) -> Self {
        Self {
            source: (raw >> 8) as u8,
            destination: (raw & 0xFF) as u8,
        }
    }
}

/// A register-protocol identifier never sets bits above bit 15. Frames
/// that do belong to some other protocol sharing the bus and must be
/// left alone by this layer.
pub const fn is_register_protocol(raw_id: u32) -> bool {
    raw_id & !0xFFFF == 0
}

impl From<DatagramId> for Id {
    /// Widen into the `embedded-can` identifier vocabulary. Ids with a
    /// source above 0x07 no longer fit the 11-bit standard space and
    /// become extended ids.
    fn from(value: DatagramId) -> Self {
        let raw = value.raw() as u32;
        match StandardId::new(raw as u16) {
            Some(standard) => Id::Standard(standard),
            // 16 bits always fit the 29-bit extended space.
            None => Id::Extended(ExtendedId::new(raw).unwrap_or(ExtendedId::ZERO)),
        }
    }
}

/// Flatten an `embedded-can` identifier back into the raw 29-bit value
/// a controller reports.
pub fn raw_can_id(id: &Id) -> u32 {
    match id {
        Id::Standard(standard) => standard.as_raw() as u32,
        Id::Extended(extended) => extended.as_raw(),
    }
}
