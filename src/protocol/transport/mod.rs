//! Datagram transport layer: CAN-FD frame representation, 16-bit
//! register-protocol identifier management, the single-slot datagram
//! server, and hardware abstraction traits.
//!
//! ## Bus timing
//!
//! The register protocol runs over CAN-FD with bitrate switching: the
//! arbitration phase at [`NOMINAL_BITRATE`] and the data phase at
//! [`DATA_BITRATE`]. Configuring the controller accordingly is the
//! responsibility of the [`FdCanDriver`](traits::fdcan_driver::FdCanDriver)
//! implementation; the constants here document the expectation.

pub mod can_frame;
pub mod can_id;
pub mod datagram;
pub mod traits;

/// Arbitration-phase bitrate expected on the bus (bit/s).
pub const NOMINAL_BITRATE: u32 = 1_000_000;

/// Data-phase bitrate expected on the bus (bit/s).
pub const DATA_BITRATE: u32 = 5_000_000;
