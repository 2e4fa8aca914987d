use clap::{Args, Parser, Subcommand};

use simpleclock::{LogicalCommand, SerialEndpoint};

use crate::logging::LogLevel;

pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";
pub const DEFAULT_BAUD: u32 = 9600;

#[derive(Debug, Parser)]
#[clap(author, version, about = "Control SimpleClock via UART", long_about = None)]
pub struct ClockCli {
    /// Serial port the clock is attached to
    #[clap(short, long, env = "SIMPLECLOCK_PORT", default_value = DEFAULT_PORT, global = true)]
    pub port: String,

    /// Baud rate
    #[clap(short, long, env = "SIMPLECLOCK_BAUD", default_value_t = DEFAULT_BAUD, global = true)]
    pub baud: u32,

    /// How long to wait for each line from the clock, in milliseconds
    #[clap(long, default_value_t = simpleclock::DEFAULT_TIMEOUT_MS, global = true)]
    pub timeout_ms: u64,

    /// Minimum log level (stderr)
    #[clap(long, value_enum, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[clap(subcommand)]
    pub command_type: CommandType,
}

#[derive(Debug, Subcommand)]
pub enum CommandType {
    /// Set clock time to the local time
    SetTime,

    /// Get clock time
    GetTime,

    /// Set clock date to the local date
    SetDate,

    /// Get clock date
    GetDate,

    /// Enable the date-diff display
    #[clap(name = "enable-datediff")]
    EnableDateDiff,

    /// Disable the date-diff display
    #[clap(name = "disable-datediff")]
    DisableDateDiff,

    /// Set the date-diff target
    #[clap(name = "set-datediff")]
    SetDateDiff(SetDateDiffCommand),

    /// Get the date-diff target
    #[clap(name = "get-datediff")]
    GetDateDiff,

    /// Set display brightness
    SetBrightness(SetBrightnessCommand),

    /// Get display brightness
    GetBrightness,

    /// Get temperature
    GetTemp,

    /// Get firmware version
    GetVersion,
}

#[derive(Debug, Args)]
pub struct SetDateDiffCommand {
    /// Target as DD-MM-YYYY [HH:MM:SS]
    #[clap(required = true, num_args = 1..=2)]
    pub target: Vec<String>,
}

#[derive(Debug, Args)]
pub struct SetBrightnessCommand {
    /// Brightness level, passed to the clock as is
    #[clap(allow_hyphen_values = true)]
    pub brightness: String,
}

impl ClockCli {
    pub fn endpoint(&self) -> SerialEndpoint {
        SerialEndpoint::new(self.port.clone(), self.baud)
    }
}

impl CommandType {
    /// Validate arguments and turn the subcommand into a protocol operation.
    pub fn to_logical(&self) -> simpleclock::Result<LogicalCommand> {
        let command = match self {
            CommandType::SetTime => LogicalCommand::SetTime,
            CommandType::GetTime => LogicalCommand::GetTime,
            CommandType::SetDate => LogicalCommand::SetDate,
            CommandType::GetDate => LogicalCommand::GetDate,
            CommandType::EnableDateDiff => LogicalCommand::EnableDateDiff,
            CommandType::DisableDateDiff => LogicalCommand::DisableDateDiff,
            CommandType::SetDateDiff(command) => {
                LogicalCommand::set_date_diff(&command.target.join(" "))?
            }
            CommandType::GetDateDiff => LogicalCommand::GetDateDiff,
            CommandType::SetBrightness(command) => {
                LogicalCommand::set_brightness(&command.brightness)?
            }
            CommandType::GetBrightness => LogicalCommand::GetBrightness,
            CommandType::GetTemp => LogicalCommand::GetTemperature,
            CommandType::GetVersion => LogicalCommand::GetVersion,
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ClockCli {
        let mut argv = vec!["simpleclock"];
        argv.extend_from_slice(args);
        ClockCli::try_parse_from(argv).expect("args should parse")
    }

    #[test]
    fn defaults_match_the_usual_adapter() {
        let cli = parse(&["get-temp"]);
        assert_eq!(cli.endpoint(), SerialEndpoint::new(DEFAULT_PORT, DEFAULT_BAUD));
        assert_eq!(cli.timeout_ms, simpleclock::DEFAULT_TIMEOUT_MS);
        assert_eq!(
            cli.command_type.to_logical().unwrap(),
            LogicalCommand::GetTemperature
        );
    }

    #[test]
    fn port_and_baud_override() {
        let cli = parse(&["-p", "/dev/ttyACM1", "-b", "115200", "get-version"]);
        assert_eq!(cli.endpoint(), SerialEndpoint::new("/dev/ttyACM1", 115200));
    }

    #[test]
    fn negative_brightness_reaches_the_encoder() {
        let cli = parse(&["set-brightness", "-5"]);
        assert_eq!(
            cli.command_type.to_logical().unwrap(),
            LogicalCommand::SetBrightness { level: -5 }
        );
    }

    #[test]
    fn non_integer_brightness_is_invalid_argument() {
        let cli = parse(&["set-brightness", "max"]);
        assert!(matches!(
            cli.command_type.to_logical(),
            Err(simpleclock::Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn datediff_target_accepts_one_or_two_tokens() {
        let quoted = parse(&["set-datediff", "25-12-2024 18:30:00"]);
        let split = parse(&["set-datediff", "25-12-2024", "18:30:00"]);
        assert_eq!(
            quoted.command_type.to_logical().unwrap(),
            split.command_type.to_logical().unwrap()
        );
    }

    #[test]
    fn datediff_target_is_required() {
        let err = ClockCli::try_parse_from(["simpleclock", "set-datediff"])
            .expect_err("missing target should fail");
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }
}
