//! Device aggregate: shared status record, persisted node
//! configuration, firmware identification, and the run-loop
//! controller tying the subsystems together.
pub mod config;
pub mod controller;
pub mod status;
