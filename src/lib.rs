//! Host side of the SimpleClock UART protocol.
//!
//! Build a [`LogicalCommand`], then hand it to a [`Session`] together with the
//! [`SerialEndpoint`] the clock hangs off:
//!
//! ```no_run
//! use simpleclock::{LogicalCommand, SerialEndpoint, Session};
//!
//! let endpoint = SerialEndpoint::new("/dev/ttyUSB0", 9600);
//! let reply = Session::serial().perform_exchange(&LogicalCommand::GetTemperature, &endpoint)?;
//! println!("{}", reply);
//! # Ok::<(), simpleclock::Error>(())
//! ```

pub mod clock;
pub mod command;
pub mod datetime;
mod error;
pub mod session;

pub use clock::{Clock, FixedClock, SystemClock};
pub use command::{parse_brightness, LogicalCommand, WireCommand};
pub use datetime::CalendarDateTime;
pub use error::{Error, Line, Result};
pub use session::{Connector, SerialConnector, SerialEndpoint, Session, DEFAULT_TIMEOUT_MS};
