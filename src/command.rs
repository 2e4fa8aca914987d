//! Logical clock operations and their line-protocol encoding.

use std::fmt::Display;

use tracing::debug;

use crate::clock::Clock;
use crate::datetime::CalendarDateTime;
use crate::error::{Error, Result};

const TIME_FORMAT: &str = "%H:%M:%S";
const DATE_FORMAT: &str = "%d:%m:%Y";

/// One operation understood by the clock firmware.
///
/// The set is the union of every firmware revision; older firmware answering an
/// unknown command is a deployment matter, not something encoded here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalCommand {
    /// Push the host's local time
    SetTime,
    GetTime,
    /// Push the host's local date
    SetDate,
    GetDate,
    EnableDateDiff,
    DisableDateDiff,
    SetDateDiff { target: CalendarDateTime },
    GetDateDiff,
    /// Level is forwarded untouched; the device decides what is in range
    SetBrightness { level: i64 },
    GetBrightness,
    GetTemperature,
    GetVersion,
}

/// A command payload ready to be written, without the trailing newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireCommand(Vec<u8>);

impl WireCommand {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for WireCommand {
    fn from(payload: &str) -> Self {
        WireCommand(payload.as_bytes().to_vec())
    }
}

impl Display for WireCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl LogicalCommand {
    /// Build `SetDateDiff` from a `DD-MM-YYYY[ HH:MM:SS]` literal.
    pub fn set_date_diff(literal: &str) -> Result<LogicalCommand> {
        Ok(LogicalCommand::SetDateDiff {
            target: literal.parse()?,
        })
    }

    /// Build `SetBrightness` from its textual argument.
    pub fn set_brightness(literal: &str) -> Result<LogicalCommand> {
        Ok(LogicalCommand::SetBrightness {
            level: parse_brightness(literal)?,
        })
    }

    /// Encode to the wire payload. `clock` is only consulted by `SetTime` and `SetDate`.
    pub fn encode(&self, clock: &impl Clock) -> WireCommand {
        let payload = match self {
            LogicalCommand::SetTime => format!("ts {}", clock.now().format(TIME_FORMAT)),
            LogicalCommand::GetTime => "tg".to_string(),
            LogicalCommand::SetDate => format!("ds {}", clock.now().format(DATE_FORMAT)),
            LogicalCommand::GetDate => "dg".to_string(),
            LogicalCommand::EnableDateDiff => "dde 1".to_string(),
            LogicalCommand::DisableDateDiff => "dde 0".to_string(),
            LogicalCommand::SetDateDiff { target } => format!("dds {}", target),
            LogicalCommand::GetDateDiff => "ddg".to_string(),
            LogicalCommand::SetBrightness { level } => format!("bs {}", level),
            LogicalCommand::GetBrightness => "bg".to_string(),
            LogicalCommand::GetTemperature => "temp".to_string(),
            LogicalCommand::GetVersion => "ver".to_string(),
        };

        debug!(command = ?self, %payload, "encoded command");
        WireCommand(payload.into_bytes())
    }
}

/// Parse a brightness level. Any integer is accepted, including negative ones.
pub fn parse_brightness(literal: &str) -> Result<i64> {
    literal.trim().parse::<i64>().map_err(|e| {
        Error::InvalidArgument(format!("brightness '{}' is not an integer: {}", literal, e))
    })
}
