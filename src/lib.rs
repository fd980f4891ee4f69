//! `powerdist` library: core logic of a power-distribution controller
//! board in a `no_std` environment. The crate exposes the CAN-FD
//! datagram transport used by the register protocol, the typed
//! scale-aware register codec, the power-sequencing state machine,
//! and the energy/measurement accumulator. Hardware peripherals stay
//! behind small traits so the whole crate also runs on the host.
#![no_std]
//==================================================================================
/// Device aggregate: the shared `Status` record, node configuration,
/// and the cooperative run loop that drives everything once per cycle.
pub mod device;
/// Protocol-level errors (register access codes reported on the wire).
pub mod error;
/// Measurement infrastructure: ADC calibration and energy accumulation.
pub mod infra;
/// Register protocol implementation: CAN-FD datagram transport,
/// register map and codec, power sequencing, and the debug command.
pub mod protocol;
//==================================================================================
