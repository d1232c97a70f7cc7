use std::{borrow::Cow, fmt};

/// Represents an error while constructing, encoding or decoding a MIDI message.
///
/// Every error carries an [`ErrorKind`](enum.ErrorKind.html) sentinel plus a human readable
/// message. Errors raised while decoding wrap the domain error that caused them (an invalid note,
/// for example), which is reachable through `std::error::Error::source`.
///
/// Callers that need to dispatch on the category of an error should test the sentinel through
/// [`Error::is`](#method.is) instead of matching on the message text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}: {kind}")]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    #[source]
    source: Option<Box<Error>>,
}
impl Error {
    /// Create a new error with the given sentinel and message.
    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Error {
        Error {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// The sentinel of the outermost error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The informative message, without the sentinel text appended.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The underlying cause for this error, if any.
    #[inline]
    pub fn cause(&self) -> Option<&Error> {
        self.source.as_deref()
    }

    /// Returns `true` if this error, or any error in its chain of causes, has the given sentinel.
    ///
    /// A decode failure caused by an out-of-range note reports `true` for both
    /// `ErrorKind::Unmarshalling` and `ErrorKind::InvalidNote`.
    pub fn is(&self, kind: ErrorKind) -> bool {
        let mut maybe_err = Some(self);
        while let Some(err) = maybe_err {
            if err.kind == kind {
                return true;
            }
            maybe_err = err.cause();
        }
        false
    }

    /// Wrap `self` as the cause of a new error.
    #[inline]
    pub(crate) fn chain_ctx(self, kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Error {
        Error {
            kind,
            message: message.into(),
            source: Some(Box::new(self)),
        }
    }
}

/// The category of an error, usable as a sentinel.
///
/// Marshalling and unmarshalling errors are produced by the message codec, while the remaining
/// kinds are produced by the constructors of the bounded value types and by the velocity
/// randomizer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ErrorKind {
    /// A message could not be written out.
    #[error("error marshalling MIDI message")]
    Marshalling,
    /// Raw bytes could not be read as a message.
    #[error("error unmarshalling MIDI message")]
    Unmarshalling,
    /// A channel outside of `0..=15`.
    #[error("invalid MIDI channel")]
    InvalidChannel,
    /// A note number outside of `0..=127`.
    #[error("invalid MIDI note")]
    InvalidNote,
    /// A program number outside of `0..=127`.
    #[error("invalid MIDI program number")]
    InvalidProgram,
    /// A pitch bend outside of `-8192..=8192`.
    #[error("invalid MIDI pitch bend")]
    InvalidPitchBend,
    /// A random velocity was requested from an inverted range.
    #[error("invalid random velocity")]
    RandomVelocity,
}

pub(crate) trait ResultExt<T> {
    /// Wrap the error (if any) into a new error of the given kind.
    fn context<M>(self, kind: ErrorKind, message: M) -> Result<T>
    where
        M: FnOnce() -> String;
}
impl<T> ResultExt<T> for Result<T> {
    #[inline]
    fn context<M>(self, kind: ErrorKind, message: M) -> Result<T>
    where
        M: FnOnce() -> String,
    {
        self.map_err(|err| err.chain_ctx(kind, message()))
    }
}

/// Shorthand for the out-of-range failure of the reject-policy constructors.
pub(crate) fn out_of_range<T: fmt::Display>(
    kind: ErrorKind,
    what: &'static str,
    min: T,
    max: T,
) -> Error {
    Error::new(
        kind,
        format!("valid {} are between {} and {}, inclusive", what, min, max),
    )
}

/// The result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
