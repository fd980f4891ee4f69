//! The live device state record.
//!
//! `Status` is the single source of truth: the register codec and the
//! telemetry collaborator read it, the run loop writes it, and the
//! fault mailbox is the only other writer (drained by the loop itself,
//! see `protocol::power`). Field order is wire-significant for the
//! external telemetry encoder and must not be reordered.
use crate::protocol::power::PowerState;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    /// Discrete sequencing state.
    pub state: PowerState,
    /// Current fault code, 0 when healthy.
    pub fault_code: i8,
    /// Hot-swap fault-indicator level snapshot (1 = healthy).
    pub fault_indicator: i8,
    /// Physical switch position snapshot (0/1).
    pub switch_status: i8,
    /// Remaining manual output lock, 100 ms units.
    pub lock_time_100ms: i16,
    /// Uptime, 100 ms units.
    pub boot_time_100ms: i16,

    /// Calibrated output voltage at the load, volts.
    pub output_voltage_v: f32,
    /// Calibrated output current, amps.
    pub output_current_a: f32,
    /// Calibrated FET temperature, degrees C.
    pub fet_temp_c: f32,
    /// Cumulative delivered energy, microwatt-hours.
    pub energy_uw_hr: i32,

    /// Remaining precharge window, milliseconds.
    pub precharge_timeout_ms: i32,
    /// Remaining secondary-rail hold-up, milliseconds.
    pub shutdown_timeout_ms: i32,

    /// Current-sense ADC code sampled once at boot, before any output
    /// is energized, and subtracted from every later current sample.
    pub current_offset: u16,
}

impl Status {
    /// Zeroed record, as constructed at startup.
    pub const fn new() -> Self {
        Self {
            state: PowerState::PowerOff,
            fault_code: 0,
            fault_indicator: 0,
            switch_status: 0,
            lock_time_100ms: 0,
            boot_time_100ms: 0,
            output_voltage_v: 0.0,
            output_current_a: 0.0,
            fet_temp_c: 0.0,
            energy_uw_hr: 0,
            precharge_timeout_ms: 0,
            shutdown_timeout_ms: 0,
            current_offset: 0,
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::new()
    }
}
