use std::fmt;
use std::io;

/// Errors surfaced by the emulation core.
#[derive(Debug)]
pub enum Error {
    /// The byte at `pc` does not decode to a supported 8080 instruction.
    UnimplementedOpcode { opcode: u8, pc: u16 },
    /// A trap harness failed to write guest console output.
    Console(io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnimplementedOpcode { opcode, pc } => {
                write!(f, "unimplemented 8080 opcode {opcode:02X} at {pc:04X}")
            }
            Self::Console(err) => write!(f, "console output failed: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Console(err) => Some(err),
            Self::UnimplementedOpcode { .. } => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Console(err)
    }
}
