//! Bit-level helpers for the status byte shared by all Channel Voice messages.
//!
//! A status byte has its most significant bit set, carries the message type in the remaining three
//! bits of its upper nibble and the channel in its lower nibble.

use crate::{message::MessageKind, prelude::*};

/// A byte whose most significant bit is set marks the start of a message.
pub const STATUS_MSB: u8 = 0b1000_0000;

/// A byte whose most significant bit is clear carries message data.
pub const DATA_MSB: u8 = 0b0;

const CHANNEL_MASK: u8 = 0x0F;

/// Returns whether the most significant bit of the byte is a status bit.
#[inline]
pub fn has_status_msb(byte: u8) -> bool {
    byte & STATUS_MSB == STATUS_MSB
}

/// Returns whether the most significant bit of the byte is a data bit.
#[inline]
pub fn has_data_msb(byte: u8) -> bool {
    !has_status_msb(byte)
}

/// Build a status byte by OR-ing the status nibble with the channel.
#[inline]
pub fn make_status_byte(status: Status, channel: Channel) -> u8 {
    status.as_byte() | channel.as_nibble().as_int()
}

/// Extract the channel from the low nibble of a status byte.
///
/// Failures are reported as unmarshalling errors wrapping the channel error.
pub fn parse_channel_from_status_byte(byte: u8) -> Result<Channel> {
    Channel::from_byte(byte & CHANNEL_MASK).context(ErrorKind::Unmarshalling, || {
        format!("invalid channel from status byte {:#04x}", byte)
    })
}

/// The upper nibble of a status byte, including the status bit.
///
/// For example, `0b1001_0000` is the status of a Note-On message.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(transparent)]
pub struct Status(u8);
impl Status {
    /// Build a status from a 3-bit message type code.
    #[inline]
    pub const fn from_code(code: Nibble) -> Status {
        Status(STATUS_MSB | (code.as_int() << 4))
    }

    /// Take the upper nibble of a byte, forcing the status bit on.
    #[inline]
    pub const fn from_status_byte(byte: u8) -> Status {
        Status(STATUS_MSB | (byte & !CHANNEL_MASK))
    }

    /// The message type code, without the status bit.
    #[inline]
    pub const fn code(self) -> Nibble {
        Nibble::new((self.0 & !STATUS_MSB) >> 4)
    }

    /// The status as a byte with an empty channel nibble.
    #[inline]
    pub const fn as_byte(self) -> u8 {
        self.0
    }

    /// The kind of message this status introduces, if it is one of the supported Channel Voice
    /// messages.
    #[inline]
    pub fn kind(self) -> Option<MessageKind> {
        MessageKind::from_status(self)
    }
}
impl From<Status> for u8 {
    #[inline]
    fn from(status: Status) -> u8 {
        status.0
    }
}
impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#010b}", self.0)
    }
}
