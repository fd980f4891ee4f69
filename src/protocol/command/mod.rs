//! Debug command channel carried over the register protocol's tunnel
//! stream. A single command exists: `lock <N>` holds the output
//! energized for N hundred-millisecond ticks regardless of the switch.
//!
//! The stream plumbing (tunnel setup, line framing) belongs to the
//! external command dispatcher; this module only parses one line and
//! produces the reply text.
use crate::device::status::Status;

/// Reply for an accepted command.
pub const REPLY_OK: &str = "OK\r\n";
/// Reply for a missing or non-numeric lock argument.
pub const REPLY_INVALID_TIME: &str = "ERR invalid time\r\n";
/// Reply for anything that is not a recognized command.
pub const REPLY_UNKNOWN_COMMAND: &str = "ERR unknown command\r\n";

/// Handle one command line and return the reply to send back.
pub fn handle_command(line: &str, status: &mut Status) -> &'static str {
    let mut tokens = line.split(' ').filter(|token| !token.is_empty());

    match tokens.next() {
        Some("lock") => match tokens.next().map(str::parse::<i16>) {
            Some(Ok(time_100ms)) => {
                status.lock_time_100ms = time_100ms;
                #[cfg(feature = "defmt")]
                defmt::info!("lock command: {} x 100ms", time_100ms);
                REPLY_OK
            }
            _ => REPLY_INVALID_TIME,
        },
        _ => REPLY_UNKNOWN_COMMAND,
    }
}
