use std::io;
use std::string::FromUtf8Error;
use std::time::Duration;

use thiserror::Error;

/// Everything that can go wrong between building a command and reading the reply.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("cannot open {port}: {reason}")]
    Connection { port: String, reason: String },

    #[error("serial I/O with device failed: {0}")]
    Transport(#[source] io::Error),

    #[error("no {line} line from device within {}ms", .after.as_millis())]
    Timeout { line: Line, after: Duration },

    #[error("response is not valid UTF-8: {0}")]
    Decode(#[from] FromUtf8Error),
}

/// Which of the two lines of an exchange was being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Echo,
    Response,
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Line::Echo => write!(f, "echo"),
            Line::Response => write!(f, "response"),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
