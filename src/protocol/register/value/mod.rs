//! Typed on-wire value representation for the register protocol.
//!
//! Every logical register can be read or written as any of four
//! numeric widths; the remote side picks the width per request. One
//! physical quantity therefore has four wire encodings, governed by a
//! per-category scale table, with saturation instead of wraparound and
//! each integer width's minimum value reserved as a "not a number"
//! sentinel.

//==================================================================================WIRE_TYPE
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Numeric width selector carried in each register request (0-3).
pub enum WireType {
    Int8,
    Int16,
    Int32,
    Float,
}

impl WireType {
    /// Decode the request's type selector.
    pub const fn from_selector(selector: u8) -> Option<Self> {
        match selector {
            0 => Some(WireType::Int8),
            1 => Some(WireType::Int16),
            2 => Some(WireType::Int32),
            3 => Some(WireType::Float),
            _ => None,
        }
    }
}

//==================================================================================VALUE
#[derive(Clone, Copy, Debug, PartialEq)]
/// Closed sum of the four on-wire representations. Conversions in and
/// out are explicit so the saturation and sentinel rules live in one
/// place.
pub enum Value {
    I8(i8),
    I16(i16),
    I32(i32),
    F32(f32),
}

impl Value {
    /// Width this value is encoded at.
    pub const fn wire_type(&self) -> WireType {
        match self {
            Value::I8(_) => WireType::Int8,
            Value::I16(_) => WireType::Int16,
            Value::I32(_) => WireType::Int32,
            Value::F32(_) => WireType::Float,
        }
    }
}

//==================================================================================INT_MAPPING
/// Encode an integer-backed field (state, counters, timers) at the
/// requested width. Plain numeric conversion, no scaling: out-of-range
/// values truncate exactly like the firmware's casts.
pub fn int_mapping(value: i32, wire_type: WireType) -> Value {
    match wire_type {
        WireType::Int8 => Value::I8(value as i8),
        WireType::Int16 => Value::I16(value as i16),
        WireType::Int32 => Value::I32(value),
        WireType::Float => Value::F32(value as f32),
    }
}

/// Inverse of [`int_mapping`] used on the write path: collapse any
/// incoming width to an `i8`, truncating.
pub fn read_int_mapping(value: Value) -> i8 {
    match value {
        Value::I8(v) => v,
        Value::I16(v) => v as i8,
        Value::I32(v) => v as i8,
        Value::F32(v) => v as i8,
    }
}

//==================================================================================SCALE_MAPPING
/// Per-width scale factors for one register category.
#[derive(Clone, Copy, Debug)]
pub struct ScaleTable {
    pub int8_scale: f32,
    pub int16_scale: f32,
    pub int32_scale: f32,
}

/// Scaling for voltage registers.
pub const VOLTAGE_SCALE: ScaleTable = ScaleTable {
    int8_scale: 0.5,
    int16_scale: 0.1,
    int32_scale: 0.001,
};

/// Scaling for temperature registers.
pub const TEMPERATURE_SCALE: ScaleTable = ScaleTable {
    int8_scale: 1.0,
    int16_scale: 0.1,
    int32_scale: 0.001,
};

/// Scaling for current registers. For now, current and temperature
/// have identical scaling.
pub const CURRENT_SCALE: ScaleTable = TEMPERATURE_SCALE;

macro_rules! scale_saturate {
    ($value:expr, $scale:expr, $int:ty, $variant:ident) => {{
        if !$value.is_finite() {
            // The minimum two's-complement value is reserved for NaN.
            Value::$variant(<$int>::MIN)
        } else {
            let scaled = $value / $scale;
            // Saturate to +-max rather than to min, keeping the
            // sentinel pattern free for non-finite readings.
            Value::$variant((scaled as $int).clamp(-<$int>::MAX, <$int>::MAX))
        }
    }};
}

/// Encode a calibrated analog field at the requested width using the
/// category's scale table. The float width passes through unscaled.
pub fn scale_mapping(value: f32, table: ScaleTable, wire_type: WireType) -> Value {
    match wire_type {
        WireType::Int8 => scale_saturate!(value, table.int8_scale, i8, I8),
        WireType::Int16 => scale_saturate!(value, table.int16_scale, i16, I16),
        WireType::Int32 => scale_saturate!(value, table.int32_scale, i32, I32),
        WireType::Float => Value::F32(value),
    }
}

//==================================================================================VALUE_SCALER
/// Inverse of [`scale_mapping`]: reconstruct the physical float from a
/// stored wire value. A width's minimum value decodes as NaN.
#[derive(Clone, Copy, Debug)]
pub struct ValueScaler {
    pub table: ScaleTable,
}

impl ValueScaler {
    pub const fn new(table: ScaleTable) -> Self {
        Self { table }
    }

    /// Decode one wire value back to physical units.
    pub fn scale(&self, value: Value) -> f32 {
        match value {
            Value::I8(v) => {
                if v == i8::MIN {
                    f32::NAN
                } else {
                    v as f32 * self.table.int8_scale
                }
            }
            Value::I16(v) => {
                if v == i16::MIN {
                    f32::NAN
                } else {
                    v as f32 * self.table.int16_scale
                }
            }
            Value::I32(v) => {
                if v == i32::MIN {
                    f32::NAN
                } else {
                    v as f32 * self.table.int32_scale
                }
            }
            Value::F32(v) => v,
        }
    }
}
