//! Abstraction traits used by the transport layer (CAN-FD controller).
pub mod fdcan_driver;
