//! High-level components of the register protocol: CAN-FD datagram
//! transport, register map and typed codec, power sequencing, and the
//! debug command channel multiplexed over the tunnel stream.
pub mod command;
pub mod power;
pub mod register;
pub mod transport;
