//! Error definitions shared across library modules.
//! Register access failures carry the numeric codes the multiplex
//! register-protocol engine reports back on the wire.
use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Errors returned to the register-protocol engine for a read or write.
///
/// These are protocol results, not local faults: they are handed back
/// synchronously, never retried, and never logged by this layer.
pub enum RegisterError {
    /// The register index is not part of the register map. Wire code 1.
    #[error("Unknown register")]
    Unknown,
    /// The register exists but rejects writes. Wire code 2.
    #[error("Register is not writable")]
    NotWritable,
}

impl RegisterError {
    /// Numeric code reported on the wire by the register protocol.
    pub fn code(&self) -> u32 {
        match self {
            RegisterError::Unknown => 1,
            RegisterError::NotWritable => 2,
        }
    }
}
