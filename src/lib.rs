//! # Overview
//!
//! `midi-voice` encodes and decodes MIDI Channel Voice messages: Note-Off, Note-On, Polyphonic
//! Key Pressure, Program Change, Channel Pressure and Pitch Bend.
//!
//! Usage is as simple as:
//!
//! ```rust
//! use midi_voice::{Decode, Encode, Message};
//!
//! let msg = Message::decode(&[0b1001_0001, 0b0100_0000, 0b0010_0000]).unwrap();
//! match msg {
//!     Message::NoteOn(note_on) => {
//!         assert_eq!(note_on.channel.as_int(), 1);
//!         assert_eq!(note_on.note.as_int(), 64);
//!         assert_eq!(note_on.velocity.as_int(), 32);
//!     }
//!     _ => unreachable!(),
//! }
//! assert_eq!(msg.encode(), [0b1001_0001, 0b0100_0000, 0b0010_0000]);
//! ```
//!
//! # Bounded values
//!
//! Every field of a message is a small bounded integer type, and each type decides what happens
//! with out-of-range input:
//!
//! - [`Channel`](struct.Channel.html), [`Note`](struct.Note.html),
//!   [`Program`](struct.Program.html) and [`PitchBend`](struct.PitchBend.html) reject it.
//! - [`Velocity`](struct.Velocity.html) and [`Pressure`](struct.Pressure.html) clamp it to the
//!   nearest bound.
//!
//! ```rust
//! use midi_voice::{ErrorKind, Note, Velocity};
//!
//! assert!(Note::new(128).unwrap_err().is(ErrorKind::InvalidNote));
//! assert_eq!(Velocity::new(128), Velocity::FULL);
//! ```
//!
//! # Running status
//!
//! MIDI allows omitting the status byte of a message when it is identical to the status byte of
//! the previous message. Each message type can be encoded and decoded in this shortened form
//! through the [`EncodeRunningStatus`](trait.EncodeRunningStatus.html) and
//! [`DecodeRunningStatus`](trait.DecodeRunningStatus.html) traits. Since the channel lives in the
//! omitted status byte, running status decoding leaves the channel at its default and the caller
//! must fill it in.
//!
//! Streams of consecutive messages can be handled through the [`stream`](stream/index.html)
//! module, which keeps track of the running status on behalf of the caller:
//!
//! ```rust
//! use midi_voice::{stream, Channel, Message, Note, NoteOn, Velocity};
//!
//! let channel = Channel::new(3).unwrap();
//! let msgs = [60, 64, 67].map(|key| {
//!     Message::NoteOn(NoteOn {
//!         channel,
//!         note: Note::new(key).unwrap(),
//!         velocity: Velocity::MIDDLE,
//!     })
//! });
//!
//! let bytes = stream::encode_all(&msgs);
//! assert_eq!(bytes, [0x93, 60, 63, 64, 63, 67, 63]);
//! assert_eq!(stream::decode_all(&bytes).unwrap(), msgs);
//! ```
//!
//! # About features
//!
//! - The `random` feature
//!
//!   Enables the [`random`](random/index.html) module, which produces random velocities through
//!   an owned generator, plus a thread-safe wrapper around one.
//!   This feature is enabled by default and pulls in the `rand` and `parking_lot` dependencies.

macro_rules! bail {
    ($err:expr) => {{
        return Err($err.into());
    }};
}
macro_rules! ensure {
    ($cond:expr, $err:expr) => {{
        if !$cond {
            bail!($err)
        }
    }};
}

/// All of the errors this crate produces.
mod error;

mod prelude {
    pub(crate) use crate::{
        error::{out_of_range, Error, ErrorKind, Result, ResultExt},
        primitive::{Channel, Nibble, Note, PitchBend, Pressure, Program, Velocity},
        status::{has_status_msb, make_status_byte, parse_channel_from_status_byte, Status},
    };
    pub(crate) use std::{convert::TryFrom, fmt};
}

mod codec;
mod message;
mod primitive;
mod status;

pub mod stream;

#[cfg(feature = "random")]
pub mod random;

pub use crate::{
    codec::{Decode, DecodeRunningStatus, Encode, EncodeRunningStatus},
    error::{Error, ErrorKind, Result},
    message::{
        ChannelPressure, Message, MessageKind, NoteOff, NoteOn, PitchBendChange,
        PolyphonicKeyPressure, ProgramChange, MESSAGE_VERSION,
    },
    primitive::{Channel, Nibble, Note, PitchBend, Pressure, Program, Velocity},
    status::{
        has_data_msb, has_status_msb, make_status_byte, parse_channel_from_status_byte, Status,
        DATA_MSB, STATUS_MSB,
    },
};

#[cfg(test)]
mod test;
