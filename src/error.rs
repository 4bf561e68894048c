use displaydoc::Display;

pub use anyhow::Result;

/// Offending argument of a constructor or of `start`/`restart`.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    /// output length must be 32, 48 or 64 bytes (found: {0})
    OutputLength(usize),
    /// security level must be 128, 192 or 256 (found: {0})
    Level(usize),
    /// capacity must be 1 or 2 (found: {0})
    Capacity(usize),
    /// announcement length must be a multiple of 4 not exceeding 60 (found: {0})
    AnnouncementLength(usize),
    /// key length must be a multiple of 4 not exceeding 60 (found: {0})
    KeyLength(usize),
    /// key is too short (expected at least: {0}, found: {1})
    KeyTooShort(usize, usize),
}

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    //////////
    // Parameters
    //////////
    /// Invalid parameter: {0}
    InvalidParameter(Parameter),
    /// Size of vec/array does not match (expected: {0}, found: {1})
    LengthMismatch(usize, usize),

    //////////
    // Automaton
    //////////
    /// Automaton has not been started
    NotStarted,
    /// Encryption requires key mode, start the automaton with a key
    KeyModeRequired,
    /// Buffer position exceeds buffer length (pos: {0}, buf_len: {1})
    BufferOverrun(usize, usize),

    //////////
    // Schemes
    //////////
    /// Invalid MAC
    BadMac,
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl From<Parameter> for Error {
    fn from(p: Parameter) -> Self {
        Error::InvalidParameter(p)
    }
}

pub fn try_or(cond: bool, err: impl Into<Error>) -> Result<()> {
    if !cond {
        let err: Error = err.into();
        anyhow::bail!(err);
    }
    Ok(())
}

pub fn err<T>(err: impl Into<Error>) -> Result<T> {
    let err: Error = err.into();
    anyhow::bail!(err)
}
