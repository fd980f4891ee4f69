//! Minimal abstraction for a poll-driven CAN-FD controller. Allows the
//! library to plug into various implementations (vendor HAL, SocketCAN,
//! in-memory test double) without owning any peripheral code.
use crate::protocol::transport::can_frame::FdFrame;

/// Live health snapshot of the controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CanStatus {
    /// The controller has entered the bus-off state and stopped
    /// participating in bus traffic.
    pub bus_off: bool,
}

/// Contract to send and receive CAN-FD frames without blocking.
///
/// The register protocol drives this from a cooperative run loop, so
/// every method must return promptly: `poll` reports at most one frame
/// per call and `send` queues the frame with the controller. Bus-level
/// errors are the controller's business; only the bus-off condition is
/// surfaced, so the loop can trigger recovery.
pub trait FdCanDriver {
    /// Queue one frame for transmission. `data` is already rounded to
    /// a legal CAN-FD length by the caller.
    fn send(&mut self, id: u32, data: &[u8]);

    /// Fetch the next received frame into `frame`, if any. Returns
    /// whether a frame was produced.
    fn poll(&mut self, frame: &mut FdFrame) -> bool;

    /// Controller health, sampled by the run loop at its 100 ms tick.
    fn status(&self) -> CanStatus;

    /// Restart the controller after a bus-off condition.
    fn recover_bus_off(&mut self);
}
