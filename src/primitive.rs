//! Bounded building-block values carried by Channel Voice messages.
//! All primitives are `Copy` and fit in a single byte, except for `PitchBend` which spans two.

use crate::prelude::*;

/// Values that reject out-of-range input.
macro_rules! reject_int {
    {$(#[$attr:meta])* $name:ident : $kind:ident, $what:expr, $min:expr => $max:expr} => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
        #[repr(transparent)]
        pub struct $name(u8);
        impl $name {
            /// The lowest valid value.
            pub const MIN: $name = $name($min);
            /// The highest valid value.
            pub const MAX: $name = $name($max);

            /// Creates a value from an integer, failing if it is out of range.
            #[inline]
            pub fn new(int: i32) -> Result<$name> {
                if int < $min as i32 || int > $max as i32 {
                    bail!(out_of_range(ErrorKind::$kind, $what, $min, $max))
                }
                Ok($name(int as u8))
            }

            /// Creates a value from a raw byte, failing if it is out of range.
            ///
            /// Applies exactly the same bounds as `new`.
            #[inline]
            pub fn from_byte(byte: u8) -> Result<$name> {
                Self::new(i32::from(byte))
            }

            /// Get the inner integer out of the wrapper.
            #[inline]
            pub const fn as_int(self) -> u8 {
                self.0
            }
        }
        impl TryFrom<i32> for $name {
            type Error = Error;
            #[inline]
            fn try_from(int: i32) -> Result<$name> {
                $name::new(int)
            }
        }
        impl TryFrom<u8> for $name {
            type Error = Error;
            #[inline]
            fn try_from(byte: u8) -> Result<$name> {
                $name::from_byte(byte)
            }
        }
        bounded_common!($name);
    };
}

/// Values that saturate out-of-range input at the nearest bound.
macro_rules! clamp_int {
    {$(#[$attr:meta])* $name:ident : $min:expr => $max:expr} => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
        #[repr(transparent)]
        pub struct $name(u8);
        impl $name {
            /// Creates a value from an integer, clamped within the valid range.
            #[inline]
            pub fn new(int: i32) -> $name {
                $name(int.clamp($min as i32, $max as i32) as u8)
            }

            /// Creates a value from a raw byte, clamped within the valid range.
            #[inline]
            pub fn from_byte(byte: u8) -> $name {
                $name(byte.clamp($min, $max))
            }

            /// Get the inner integer out of the wrapper.
            #[inline]
            pub const fn as_int(self) -> u8 {
                self.0
            }
        }
        impl From<i32> for $name {
            #[inline]
            fn from(int: i32) -> $name {
                $name::new(int)
            }
        }
        impl From<u8> for $name {
            #[inline]
            fn from(byte: u8) -> $name {
                $name::from_byte(byte)
            }
        }
        bounded_common!($name);
    };
}

macro_rules! bounded_common {
    ($name:ident) => {
        impl From<$name> for u8 {
            #[inline]
            fn from(val: $name) -> u8 {
                val.0
            }
        }
        impl fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
        impl PartialEq<u8> for $name {
            fn eq(&self, rhs: &u8) -> bool {
                self.0 == *rhs
            }
        }
        impl PartialEq<$name> for u8 {
            fn eq(&self, rhs: &$name) -> bool {
                *self == rhs.0
            }
        }
    };
}

/// Four bits within a byte.
///
/// Never validated: constructing a nibble simply masks off the top four bits.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
#[repr(transparent)]
pub struct Nibble(u8);
impl Nibble {
    const MASK: u8 = 0x0F;

    /// Creates a nibble by masking off the extra bits.
    #[inline]
    pub const fn new(raw: u8) -> Nibble {
        Nibble(raw & Self::MASK)
    }

    /// Get the inner integer out of the wrapper.
    #[inline]
    pub const fn as_int(self) -> u8 {
        self.0
    }
}
impl From<u8> for Nibble {
    /// Lossy conversion, loses the top four bits.
    #[inline]
    fn from(raw: u8) -> Nibble {
        Nibble::new(raw)
    }
}

reject_int! {
    /// The channel a message is addressed to, stored in the low nibble of the status byte.
    ///
    /// Index 0 is what humans call channel 1, and index 15 is channel 16.
    Channel: InvalidChannel, "channels", 0 => 0b1111
}
impl Channel {
    /// The channel as the low nibble of a status byte.
    #[inline]
    pub const fn as_nibble(self) -> Nibble {
        Nibble::new(self.0)
    }
}

reject_int! {
    /// A note number.
    Note: InvalidNote, "note numbers", 0 => 127
}

reject_int! {
    /// The program number of a Program Change message.
    Program: InvalidProgram, "program numbers", 0 => 127
}

clamp_int! {
    /// The strength of a note, between 0 and 127 inclusive.
    Velocity: 0 => 127
}
impl Velocity {
    /// The lowest possible velocity (0% strength).
    pub const ZERO: Velocity = Velocity(0);
    /// 25% strength.
    pub const LOW: Velocity = Velocity(31);
    /// 50% strength.
    pub const MIDDLE: Velocity = Velocity(63);
    /// 75% strength.
    pub const HIGH: Velocity = Velocity(95);
    /// The highest possible velocity (100% strength).
    pub const FULL: Velocity = Velocity(127);
}

clamp_int! {
    /// The pressure applied to a note or a whole channel, between 0 and 127 inclusive.
    Pressure: 0 => 127
}
impl Pressure {
    /// No pressure at all.
    pub const ZERO: Pressure = Pressure(0);
    /// 25% strength.
    pub const LOW: Pressure = Pressure(31);
    /// 50% strength.
    pub const MIDDLE: Pressure = Pressure(63);
    /// 75% strength.
    pub const HIGH: Pressure = Pressure(95);
    /// Full pressure.
    pub const FULL: Pressure = Pressure(127);
}

/// A pitch bend value in the range `PitchBend::MIN ..= PitchBend::MAX`, where `0` means no bend.
///
/// On the wire, the value is split into a least significant byte (the low 8 bits) followed by a
/// most significant byte (the high 8 bits of the two's complement `i16`).
/// For example, `7650` (`0x1DE2`) is sent as `0xE2, 0x1D`.
///
/// Out-of-range values are rejected by both `new` and `from_bytes`. Callers that would rather
/// clamp can use `saturating`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
#[repr(transparent)]
pub struct PitchBend(i16);
impl PitchBend {
    /// Full bend downwards.
    pub const MIN: PitchBend = PitchBend(-8192);
    /// No bend.
    pub const ZERO: PitchBend = PitchBend(0);
    /// Full bend upwards.
    pub const MAX: PitchBend = PitchBend(8192);

    /// Creates a pitch bend from an integer, failing if it is out of range.
    pub fn new(int: i32) -> Result<PitchBend> {
        if int < i32::from(Self::MIN.0) || int > i32::from(Self::MAX.0) {
            bail!(out_of_range(
                ErrorKind::InvalidPitchBend,
                "pitch bend values",
                Self::MIN,
                Self::MAX
            ))
        }
        Ok(PitchBend(int as i16))
    }

    /// Reassembles a pitch bend from its most and least significant bytes, failing if the result
    /// is out of range.
    #[inline]
    pub fn from_bytes(msb: u8, lsb: u8) -> Result<PitchBend> {
        Self::new(i32::from(i16::from_be_bytes([msb, lsb])))
    }

    /// Creates a pitch bend from an integer, clamped within the valid range.
    #[inline]
    pub fn saturating(int: i32) -> PitchBend {
        PitchBend(int.clamp(i32::from(Self::MIN.0), i32::from(Self::MAX.0)) as i16)
    }

    /// The least significant byte, as sent first on the wire.
    #[inline]
    pub const fn lsb(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// The most significant byte, as sent second on the wire.
    #[inline]
    pub const fn msb(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Get the inner integer out of the wrapper.
    #[inline]
    pub const fn as_int(self) -> i16 {
        self.0
    }

    /// The pitch bend as a floating-point value in the range `-1.0 ..= 1.0`.
    #[inline]
    pub fn as_f32(self) -> f32 {
        f32::from(self.0) / f32::from(Self::MAX.0)
    }
}
impl TryFrom<i32> for PitchBend {
    type Error = Error;
    #[inline]
    fn try_from(int: i32) -> Result<PitchBend> {
        PitchBend::new(int)
    }
}
impl From<PitchBend> for i16 {
    #[inline]
    fn from(bend: PitchBend) -> i16 {
        bend.0
    }
}
impl fmt::Display for PitchBend {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
