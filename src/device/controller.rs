//! Cooperative run loop of the controller board.
//!
//! Single-threaded and poll-driven: each iteration snapshots the
//! digital inputs, drains the interrupt fault mailbox, derives the
//! physical outputs, advances the state machine, and on millisecond /
//! 100-millisecond boundaries runs the timers, the measurement
//! accumulator, and bus-off supervision. The datagram transport is
//! polled exactly once per iteration.
use crate::device::config::{FirmwareInfo, NodeConfig};
use crate::device::status::Status;
use crate::infra::measure::{self, capture_current_offset, PowerMonitorAdc};
use crate::protocol::power::{
    advance, outputs_from_state, tick_hundred_millisecond, tick_millisecond, FaultMailbox,
    Outputs,
};
use crate::protocol::transport::datagram::{DatagramHeader, DatagramTransport};
use crate::protocol::transport::traits::fdcan_driver::FdCanDriver;

/// Digital input levels sampled by the platform layer each iteration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopInputs {
    /// Physical power switch position.
    pub switch_on: bool,
    /// Hot-swap controller fault-indicator level (true = healthy).
    pub fault_indicator: bool,
}

/// Run-loop controller owning the transport, the ADC seam, and the
/// shared [`Status`] record.
///
/// The controller is the single writer of `Status`; the register
/// codec, command handler, and telemetry collaborator borrow it
/// through the accessors below. The one exception is the fault
/// mailbox, posted from interrupt context and drained here.
pub struct Controller<'a, C, F, A>
where
    C: FdCanDriver,
    F: FnMut(DatagramHeader, &[u8]),
    A: PowerMonitorAdc,
{
    transport: DatagramTransport<C, F>,
    adc: A,
    status: Status,
    config: NodeConfig,
    firmware: FirmwareInfo,
    mailbox: &'a FaultMailbox,
    last_time_ms: u32,
}

impl<'a, C, F, A> Controller<'a, C, F, A>
where
    C: FdCanDriver,
    F: FnMut(DatagramHeader, &[u8]),
    A: PowerMonitorAdc,
{
    /// Bring the controller up. Captures the current-sense zero offset
    /// before any output can be energized; nothing else touches the
    /// ADC until the loop runs.
    pub fn new(driver: C, mut adc: A, mailbox: &'a FaultMailbox) -> Self {
        let mut status = Status::new();
        status.current_offset = capture_current_offset(&mut adc);

        Self {
            transport: DatagramTransport::new(driver),
            adc,
            status,
            config: NodeConfig::new(),
            firmware: FirmwareInfo::new(),
            mailbox,
            last_time_ms: 0,
        }
    }

    /// One loop iteration. `now_ms` comes from the platform's
    /// monotonic millisecond timer; boundary work only runs when it
    /// has moved since the previous iteration.
    pub fn run_once(&mut self, inputs: LoopInputs, now_ms: u32) -> Outputs {
        self.status.switch_status = inputs.switch_on as i8;
        self.status.fault_indicator = inputs.fault_indicator as i8;

        // Interrupt-posted faults win over this cycle's own evaluation.
        self.mailbox.drain(&mut self.status);

        let outputs = outputs_from_state(&self.status, now_ms);
        advance(&mut self.status);

        if now_ms != self.last_time_ms {
            self.last_time_ms = now_ms;

            tick_millisecond(&mut self.status);
            measure::update(&mut self.status, self.adc.sample());

            if now_ms % 100 == 0 {
                self.poll_hundred_millisecond();
            }
        }

        self.transport.poll();

        outputs
    }

    fn poll_hundred_millisecond(&mut self) {
        if self.transport.driver().status().bus_off {
            #[cfg(feature = "defmt")]
            defmt::warn!("CAN bus-off detected, recovering");
            self.transport.driver_mut().recover_bus_off();
        }

        tick_hundred_millisecond(&mut self.status);
    }

    /// Shared state record, read by the register codec and telemetry.
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Mutable access for the register engine's write path and the
    /// command dispatcher.
    pub fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }

    /// Datagram transport, armed and driven by the register engine.
    pub fn transport_mut(&mut self) -> &mut DatagramTransport<C, F> {
        &mut self.transport
    }

    /// Persisted node configuration.
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Mutable configuration access for the persistence collaborator.
    pub fn config_mut(&mut self) -> &mut NodeConfig {
        &mut self.config
    }

    /// Build identification for telemetry.
    pub fn firmware(&self) -> &FirmwareInfo {
        &self.firmware
    }
}
