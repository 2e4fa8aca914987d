use simpleclock::Error;

// sysexits.h values, plus the conventional 124 for timeouts.
pub const SUCCESS: i32 = 0;
pub const USAGE: i32 = 64;
pub const DATA_INVALID: i32 = 65;
pub const UNAVAILABLE: i32 = 69;
pub const IO_ERROR: i32 = 74;
pub const TIMEOUT: i32 = 124;

pub fn code_for(err: &Error) -> i32 {
    match err {
        Error::InvalidArgument(_) => USAGE,
        Error::Connection { .. } => UNAVAILABLE,
        Error::Transport(_) => IO_ERROR,
        Error::Timeout { .. } => TIMEOUT,
        Error::Decode(_) => DATA_INVALID,
    }
}
