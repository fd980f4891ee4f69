//! Register map and per-register business logic consumed by the
//! external multiplex register-protocol engine. The engine handles
//! frame parsing, addressing, and tunnels; this module only decides
//! what each register index means, which widths/scales apply, and
//! which registers accept writes.
use crate::device::status::Status;
use crate::error::RegisterError;

pub mod value;

use value::{
    int_mapping, read_int_mapping, scale_mapping, Value, WireType, CURRENT_SCALE,
    TEMPERATURE_SCALE, VOLTAGE_SCALE,
};

//==================================================================================REGISTER_MAP
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Addressable logical registers.
pub enum Register {
    /// Discrete sequencing state. Read-only.
    State = 0x000,
    /// Current fault code (0 when healthy). Read-only.
    FaultCode = 0x001,
    /// Physical switch position snapshot. Read-only.
    SwitchStatus = 0x002,
    /// Remaining output lock, in 100 ms units. Read/write.
    LockTime = 0x003,
    /// Uptime in 100 ms units. Read-only.
    BootTime = 0x004,
    /// Calibrated output voltage, volts. Read-only.
    OutputVoltage = 0x010,
    /// Calibrated output current, amps. Read-only.
    OutputCurrent = 0x011,
    /// FET temperature, degrees C. Read-only.
    Temperature = 0x012,
    /// Cumulative delivered energy, microwatt-hours. Read-only.
    Energy = 0x013,
}

impl Register {
    /// Resolve a raw register index from the wire.
    pub const fn from_index(index: u32) -> Option<Self> {
        match index {
            0x000 => Some(Register::State),
            0x001 => Some(Register::FaultCode),
            0x002 => Some(Register::SwitchStatus),
            0x003 => Some(Register::LockTime),
            0x004 => Some(Register::BootTime),
            0x010 => Some(Register::OutputVoltage),
            0x011 => Some(Register::OutputCurrent),
            0x012 => Some(Register::Temperature),
            0x013 => Some(Register::Energy),
            _ => None,
        }
    }
}

//==================================================================================READ
/// Read one register at the requested width.
///
/// Integer-backed fields go through the plain width conversion;
/// calibrated analog fields go through their category's scale table
/// with saturation and the NaN sentinel. Energy has its own divisor
/// set (1e6 / 1e4 / 1 for the integer widths, 1e6 for float) so the
/// narrow widths read out in watt-hour-scale units.
pub fn read(status: &Status, index: u32, wire_type: WireType) -> Result<Value, RegisterError> {
    let register = Register::from_index(index).ok_or(RegisterError::Unknown)?;
    let value = match register {
        Register::State => int_mapping(status.state as i32, wire_type),
        Register::FaultCode => int_mapping(status.fault_code as i32, wire_type),
        Register::SwitchStatus => int_mapping(status.switch_status as i32, wire_type),
        Register::LockTime => int_mapping(status.lock_time_100ms as i8 as i32, wire_type),
        Register::BootTime => int_mapping(0, wire_type),
        Register::OutputVoltage => scale_mapping(status.output_voltage_v, VOLTAGE_SCALE, wire_type),
        Register::OutputCurrent => scale_mapping(status.output_current_a, CURRENT_SCALE, wire_type),
        Register::Temperature => scale_mapping(status.fet_temp_c, TEMPERATURE_SCALE, wire_type),
        Register::Energy => {
            let energy = status.energy_uw_hr;
            match wire_type {
                WireType::Int8 => Value::I8((energy / 1_000_000) as i8),
                WireType::Int16 => Value::I16((energy / 10_000) as i16),
                WireType::Int32 => Value::I32(energy),
                WireType::Float => Value::F32(energy as f32 / 1_000_000.0),
            }
        }
    };
    Ok(value)
}

//==================================================================================WRITE
/// Write one register.
///
/// Only the lock time accepts writes; everything else reports
/// [`RegisterError::NotWritable`], and indices outside the map report
/// [`RegisterError::Unknown`].
pub fn write(status: &mut Status, index: u32, value: Value) -> Result<(), RegisterError> {
    let register = Register::from_index(index).ok_or(RegisterError::Unknown)?;
    match register {
        Register::LockTime => {
            status.lock_time_100ms = read_int_mapping(value) as i16;
            #[cfg(feature = "defmt")]
            defmt::info!("lock time set to {} x 100ms", status.lock_time_100ms);
            Ok(())
        }
        // TODO: allow writing State once remote-commanded shutdown is
        // defined; until then every other register rejects writes.
        Register::State
        | Register::FaultCode
        | Register::SwitchStatus
        | Register::BootTime
        | Register::OutputVoltage
        | Register::OutputCurrent
        | Register::Temperature
        | Register::Energy => Err(RegisterError::NotWritable),
    }
}
