//! Power-sequencing state machine: arbitrates between the physical
//! switch, the hot-swap controller's fault indicator, and the held
//! timers to decide the power-enable and indicator outputs.
//!
//! The machine is evaluated once per loop iteration against the input
//! snapshots already stored in [`Status`]. The fault indicator is also
//! wired to a falling-edge interrupt; that path never touches the
//! state directly but posts into [`FaultMailbox`], which the run loop
//! drains at the top of each cycle so an interrupt-posted fault always
//! wins for that cycle.
use crate::device::status::Status;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

//==================================================================================CONSTANTS
/// Window granted to the hot-swap controller to report healthy after
/// the switch turns on.
pub const PRECHARGE_TIMEOUT_MS: i32 = 100;

/// Hold-up applied to the secondary rail after leaving the energized
/// states, refreshed on every cycle spent outside `PowerOff`.
pub const SHUTDOWN_TIMEOUT_MS: i32 = 5000;

/// Fault code: precharge never completed.
pub const FAULT_PRECHARGE_TIMEOUT: i8 = 1;
/// Fault code: fault indicator dropped while energized (seen by the
/// poll loop).
pub const FAULT_INDICATOR_LOST: i8 = 2;
/// Fault code: fault indicator falling edge (seen by the interrupt).
pub const FAULT_INDICATOR_EDGE: i8 = 3;

//==================================================================================STATE
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Discrete sequencing states. Every state defines a behavior for
/// every input combination; unmatched combinations hold the state.
pub enum PowerState {
    #[default]
    PowerOff = 0,
    Precharging = 1,
    PowerOn = 2,
    Fault = 3,
}

//==================================================================================TRANSITIONS
/// Evaluate the transition table once against the current snapshots.
///
/// The fault code is reset on entry to every non-`Fault` arm before
/// re-evaluation, and the shutdown hold-up is refreshed on every cycle
/// spent outside `PowerOff`.
pub fn advance(status: &mut Status) {
    match status.state {
        PowerState::PowerOff => {
            status.fault_code = 0;
            if status.switch_status == 1 {
                status.precharge_timeout_ms = PRECHARGE_TIMEOUT_MS;
                status.state = PowerState::Precharging;
                #[cfg(feature = "defmt")]
                defmt::info!("switch on: precharging");
            }
        }
        PowerState::Precharging => {
            status.fault_code = 0;
            if status.fault_indicator == 1 {
                status.state = PowerState::PowerOn;
                #[cfg(feature = "defmt")]
                defmt::info!("precharge complete: power on");
            } else if status.switch_status == 0 {
                status.state = PowerState::PowerOff;
            } else if status.precharge_timeout_ms == 0 {
                status.fault_code = FAULT_PRECHARGE_TIMEOUT;
                status.state = PowerState::Fault;
                #[cfg(feature = "defmt")]
                defmt::warn!("precharge timed out");
            }
            status.shutdown_timeout_ms = SHUTDOWN_TIMEOUT_MS;
        }
        PowerState::PowerOn => {
            status.fault_code = 0;
            if status.fault_indicator == 0 {
                status.state = PowerState::Fault;
                status.fault_code = FAULT_INDICATOR_LOST;
                #[cfg(feature = "defmt")]
                defmt::warn!("fault indicator lost while energized");
            } else if status.switch_status == 0 && status.lock_time_100ms == 0 {
                status.state = PowerState::PowerOff;
                #[cfg(feature = "defmt")]
                defmt::info!("switch off: power off");
            }
            status.shutdown_timeout_ms = SHUTDOWN_TIMEOUT_MS;
        }
        PowerState::Fault => {
            if status.switch_status == 0 {
                status.state = PowerState::PowerOff;
            }
            status.shutdown_timeout_ms = SHUTDOWN_TIMEOUT_MS;
        }
    }
}

//==================================================================================TIMERS
/// Millisecond countdowns: precharge window and secondary-rail
/// hold-up. Called once per millisecond boundary.
pub fn tick_millisecond(status: &mut Status) {
    if status.shutdown_timeout_ms != 0 {
        status.shutdown_timeout_ms -= 1;
    }
    if status.precharge_timeout_ms != 0 {
        status.precharge_timeout_ms -= 1;
    }
}

/// 100 ms countdown: the manual output lock. While nonzero it blocks
/// the `PowerOn` to `PowerOff` transition even with the switch off.
pub fn tick_hundred_millisecond(status: &mut Status) {
    if status.lock_time_100ms > 0 {
        status.lock_time_100ms -= 1;
    }
}

//==================================================================================OUTPUTS
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Physical output decisions derived from the current state. Pure data;
/// the platform layer owns the pins.
pub struct Outputs {
    /// Primary power-enable override.
    pub power_override: bool,
    /// Secondary (logic) rail override.
    pub aux_override: bool,
    /// Switch-mounted status LED.
    pub status_led: bool,
    /// Fault LED.
    pub fault_led: bool,
}

/// Derive the outputs for the current state. Pure function of state
/// plus timers and wall time; performs no transitions.
///
/// Blink patterns: the status LED toggles every 20 ms while
/// precharging, and in `Fault` both LEDs blink in antiphase over an
/// eight-cycle window of 200 ms cycles whose number of lit cycles is
/// `fault_code * 2`, making the code readable by eye.
pub fn outputs_from_state(status: &Status, now_ms: u32) -> Outputs {
    match status.state {
        PowerState::PowerOff => Outputs {
            power_override: false,
            aux_override: status.shutdown_timeout_ms > 0,
            status_led: false,
            fault_led: true,
        },
        PowerState::Precharging => Outputs {
            power_override: true,
            aux_override: true,
            status_led: (now_ms / 20) % 2 == 1,
            fault_led: false,
        },
        PowerState::PowerOn => Outputs {
            power_override: true,
            aux_override: true,
            status_led: true,
            fault_led: false,
        },
        PowerState::Fault => {
            let cycle = now_ms / 200;
            let lit = (cycle % 2 == 1) && (cycle % 8) < (status.fault_code as u32 * 2);
            Outputs {
                power_override: false,
                aux_override: true,
                status_led: lit,
                fault_led: !lit,
            }
        }
    }
}

//==================================================================================FAULT_MAILBOX
/// Single-slot mailbox between the fault-indicator edge interrupt and
/// the run loop.
///
/// The handler only posts; the run loop drains at the start of each
/// cycle before evaluating its own transition table, so the two-field
/// state/fault update always happens on the loop side and can never be
/// observed torn.
pub struct FaultMailbox {
    escalation: Signal<CriticalSectionRawMutex, i8>,
}

impl FaultMailbox {
    pub const fn new() -> Self {
        Self {
            escalation: Signal::new(),
        }
    }

    /// Post from the falling-edge interrupt handler. Safe to call from
    /// interrupt context; overwrites any not-yet-drained escalation.
    pub fn escalate(&self) {
        self.escalation.signal(FAULT_INDICATOR_EDGE);
    }

    /// Drain the mailbox into the status record. The escalation only
    /// applies while energizing or energized; in other states a stale
    /// edge is discarded.
    pub fn drain(&self, status: &mut Status) {
        if let Some(fault_code) = self.escalation.try_take() {
            if matches!(
                status.state,
                PowerState::Precharging | PowerState::PowerOn
            ) {
                status.fault_code = fault_code;
                status.state = PowerState::Fault;
                #[cfg(feature = "defmt")]
                defmt::warn!("fault edge escalation: code {}", fault_code);
            }
        }
    }
}

impl Default for FaultMailbox {
    fn default() -> Self {
        Self::new()
    }
}
