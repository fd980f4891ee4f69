//! Infrastructure modules: ADC calibration and energy accumulation.
pub mod measure;
