//! Persisted node configuration and firmware identification.
//!
//! Persistence itself is an external collaborator; this core only
//! declares the one field it wants stored and offers defaults for a
//! fresh board.

/// Configuration registered with the external persistent store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NodeConfig {
    /// Register-protocol node address of this board.
    pub id: u8,
}

impl NodeConfig {
    /// Factory default node address.
    pub const DEFAULT_ID: u8 = 32;

    pub const fn new() -> Self {
        Self {
            id: Self::DEFAULT_ID,
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Build identification exposed to the telemetry collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FirmwareInfo {
    /// Crate version baked in at build time.
    pub version: &'static str,
}

impl FirmwareInfo {
    pub const fn new() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

impl Default for FirmwareInfo {
    fn default() -> Self {
        Self::new()
    }
}
