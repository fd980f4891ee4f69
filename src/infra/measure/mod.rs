//! Measurement pipeline: converts raw ADC codes into calibrated
//! voltage, current, and temperature, and integrates instantaneous
//! power into cumulative energy.
//!
//! The ADC peripheral itself is external; this module only owns the
//! linear calibration constants and the accumulation rule. Integration
//! is plain forward Euler against the loop's millisecond tick, with no
//! compensation for loop jitter.
use crate::device::status::Status;

//==================================================================================CALIBRATION
/// ADC full-scale code (12-bit converter).
pub const ADC_FULL_SCALE: f32 = 4096.0;

/// ADC reference voltage, volts.
pub const ADC_REFERENCE_V: f32 = 3.3;

/// Divider ratio between a sensed rail and its ADC input.
pub const VOLTAGE_DIVIDER_RATIO: f32 = 0.0625;

/// Current-sense transfer: shunt 0.5 mV/A through the two amplifier
/// stages (gain 8, then 7).
pub const CURRENT_SENSE_V_PER_A: f32 = 0.0005 * 8.0 * 7.0;

/// FET temperature sensor transfer: intercept (volts at 0 degC) and
/// slope (volts per degC, negative).
pub const TEMP_SENSE_INTERCEPT_V: f32 = 1.8663;
pub const TEMP_SENSE_SLOPE_V_PER_C: f32 = -0.01169;

/// Output voltage below which the rail is considered de-energized and
/// energy accumulation is suppressed, so noise never integrates.
pub const ENERGY_GATE_THRESHOLD_V: f32 = 4.0;

/// Number of samples averaged when capturing the boot current offset.
pub const OFFSET_CAPTURE_SAMPLES: u32 = 64;

//==================================================================================ADC_SEAM
/// One set of raw conversion results, all channels sampled in the same
/// loop iteration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawSamples {
    /// Output voltage at the load, post-regulation.
    pub output_voltage: u16,
    /// Input voltage ahead of the regulation stage.
    pub input_voltage: u16,
    /// Current-sense channel.
    pub current: u16,
    /// FET temperature channel.
    pub temperature: u16,
}

/// Contract for the external ADC driver. Conversions may busy-wait
/// briefly inside the driver; each call returns one completed set.
pub trait PowerMonitorAdc {
    /// Sample every measurement channel once.
    fn sample(&mut self) -> RawSamples;

    /// Sample the current-sense channel alone, used for the boot-time
    /// zero-offset capture.
    fn sample_current_raw(&mut self) -> u16;
}

/// Average the current-sense channel to establish the zero-current
/// code. Must run before any output is energized.
pub fn capture_current_offset<A: PowerMonitorAdc>(adc: &mut A) -> u16 {
    let mut total: u32 = 0;
    for _ in 0..OFFSET_CAPTURE_SAMPLES {
        total += adc.sample_current_raw() as u32;
    }
    (total / OFFSET_CAPTURE_SAMPLES) as u16
}

//==================================================================================CONVERSION
fn adc_volts(raw: u16) -> f32 {
    raw as f32 / ADC_FULL_SCALE * ADC_REFERENCE_V
}

/// Rail voltage from a divided ADC channel.
pub fn rail_voltage(raw: u16) -> f32 {
    adc_volts(raw) / VOLTAGE_DIVIDER_RATIO
}

/// Output current from the sense channel, zeroed against the boot
/// offset. The sense chain inverts, hence the sign flip.
pub fn sense_current(raw: u16, offset: u16) -> f32 {
    -((raw as f32 - offset as f32) / ADC_FULL_SCALE * ADC_REFERENCE_V) / CURRENT_SENSE_V_PER_A
}

/// FET temperature through the linear sensor transfer.
pub fn fet_temperature(raw: u16) -> f32 {
    (adc_volts(raw) - TEMP_SENSE_INTERCEPT_V) / TEMP_SENSE_SLOPE_V_PER_C
}

//==================================================================================ACCUMULATOR
/// Convert one sample set and fold it into the status record. Runs on
/// every millisecond boundary.
///
/// Instantaneous power is input voltage times current; the microwatt-
/// hour counter only advances while the output rail is above
/// [`ENERGY_GATE_THRESHOLD_V`].
pub fn update(status: &mut Status, samples: RawSamples) {
    let output_voltage = rail_voltage(samples.output_voltage);
    let input_voltage = rail_voltage(samples.input_voltage);
    let current = sense_current(samples.current, status.current_offset);
    let temperature = fet_temperature(samples.temperature);

    if output_voltage > ENERGY_GATE_THRESHOLD_V {
        // One millisecond of watts, expressed in microwatt-hours.
        let delta_uw_hr = input_voltage * current * 0.001 / 3600.0 * 1e6;
        status.energy_uw_hr += delta_uw_hr as i32;
    }

    status.output_voltage_v = output_voltage;
    status.output_current_a = current;
    status.fet_temp_c = temperature;
}
