//! Channel Voice messages and their wire format.

use crate::{
    codec::{Decode, DecodeRunningStatus, Encode, EncodeRunningStatus},
    prelude::*,
};
use tracing::trace;

/// The version tag leading the string rendering of every message.
pub const MESSAGE_VERSION: &str = "midiv1";

/// The kind of a Channel Voice message, without any associated data.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum MessageKind {
    /// Stop playing a note.
    NoteOff,
    /// Start playing a note.
    NoteOn,
    /// Change the pressure applied to a single key.
    PolyphonicKeyPressure,
    /// Change the program (also known as instrument) of a channel.
    ProgramChange,
    /// Change the pressure applied to a whole channel.
    ChannelPressure,
    /// Bend the pitch of a whole channel.
    PitchBend,
}
impl MessageKind {
    /// Every supported kind, in status code order.
    pub const ALL: [MessageKind; 6] = [
        MessageKind::NoteOff,
        MessageKind::NoteOn,
        MessageKind::PolyphonicKeyPressure,
        MessageKind::ProgramChange,
        MessageKind::ChannelPressure,
        MessageKind::PitchBend,
    ];

    /// The 3-bit message type code carried in the upper nibble of the status byte.
    #[inline]
    pub const fn code(self) -> Nibble {
        Nibble::new(match self {
            MessageKind::NoteOff => 0b000,
            MessageKind::NoteOn => 0b001,
            MessageKind::PolyphonicKeyPressure => 0b010,
            MessageKind::ProgramChange => 0b100,
            MessageKind::ChannelPressure => 0b101,
            MessageKind::PitchBend => 0b111,
        })
    }

    /// The status nibble of this kind of message, with the status bit set.
    #[inline]
    pub const fn status(self) -> Status {
        Status::from_code(self.code())
    }

    /// The amount of bytes in a complete message of this kind.
    #[inline]
    pub const fn byte_len(self) -> usize {
        match self {
            MessageKind::ProgramChange => 2,
            _ => 3,
        }
    }

    /// The amount of bytes in a running status message of this kind.
    #[inline]
    pub const fn running_status_len(self) -> usize {
        self.byte_len() - 1
    }

    /// The human-readable name of this kind of message.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            MessageKind::NoteOff => "Note-Off",
            MessageKind::NoteOn => "Note-On",
            MessageKind::PolyphonicKeyPressure => "Polyphonic Key Pressure",
            MessageKind::ProgramChange => "Program Change",
            MessageKind::ChannelPressure => "Channel Pressure",
            MessageKind::PitchBend => "Pitch Bend Change",
        }
    }

    /// Look up the kind introduced by a status.
    ///
    /// Returns `None` for the type codes this crate does not handle.
    pub fn from_status(status: Status) -> Option<MessageKind> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.code() == status.code())
    }
}
impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fields that occupy a single data byte.
trait DataByte: Sized {
    const FIELD: &'static str;

    fn read(byte: u8) -> Result<Self>;
    fn write(self) -> u8;
}
macro_rules! data_byte {
    ($ty:ident, $field:expr, |$byte:ident| $read:expr) => {
        impl DataByte for $ty {
            const FIELD: &'static str = $field;

            #[inline]
            fn read($byte: u8) -> Result<$ty> {
                $read
            }
            #[inline]
            fn write(self) -> u8 {
                self.as_int()
            }
        }
    };
}
data_byte!(Note, "note number", |byte| Note::from_byte(byte));
data_byte!(Program, "program number", |byte| Program::from_byte(byte));
data_byte!(Velocity, "velocity", |byte| Ok(Velocity::from_byte(byte)));
data_byte!(Pressure, "pressure", |byte| Ok(Pressure::from_byte(byte)));

/// Fail unless `raw` holds exactly `expected` bytes.
fn check_len(raw: &[u8], expected: usize, what: &str) -> Result<()> {
    ensure!(
        raw.len() == expected,
        Error::new(
            ErrorKind::Unmarshalling,
            format!(
                "{} are made up of {} bytes, received {} byte(s)",
                what,
                expected,
                raw.len()
            ),
        )
    );
    Ok(())
}

/// Validate the status byte at the start of a complete message and extract its channel.
fn read_status(raw: &mut &[u8], what: &str) -> Result<Channel> {
    let (&status, rest) = raw.split_first().ok_or_else(|| {
        Error::new(
            ErrorKind::Unmarshalling,
            format!("{} are missing their status byte", what),
        )
    })?;
    ensure!(
        has_status_msb(status),
        Error::new(
            ErrorKind::Unmarshalling,
            format!("{} must have a status MSB", what),
        )
    );
    let channel = parse_channel_from_status_byte(status)?;
    *raw = rest;
    Ok(channel)
}

/// Read the next single-byte field, advancing the slice.
fn read_field<T: DataByte>(raw: &mut &[u8], what: &str) -> Result<T> {
    let (&byte, rest) = raw.split_first().ok_or_else(|| {
        Error::new(
            ErrorKind::Unmarshalling,
            format!("{} are missing their {} byte", what, T::FIELD),
        )
    })?;
    let val = T::read(byte).context(ErrorKind::Unmarshalling, || {
        format!("invalid {} {:#04x} from {} byte", T::FIELD, byte, T::FIELD)
    })?;
    *raw = rest;
    Ok(val)
}

/// Define a message made of a channel plus single-byte fields, in wire order.
macro_rules! channel_voice {
    {
        $(#[$attr:meta])*
        $name:ident => $kind:ident, $what:literal {
            $( $(#[$fattr:meta])* $field:ident : $ty:ident, )+
        }
    } => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Default)]
        pub struct $name {
            /// The channel this message is addressed to.
            pub channel: Channel,
            $( $(#[$fattr])* pub $field: $ty, )+
        }
        impl $name {
            /// The kind of this message.
            pub const KIND: MessageKind = MessageKind::$kind;
            /// The human-readable name of this message.
            pub const NAME: &'static str = Self::KIND.name();
            /// The amount of bytes in a complete message.
            pub const LEN: usize = Self::KIND.byte_len();
        }
        impl Encode for $name {
            fn encode(&self) -> Vec<u8> {
                let mut bytes = Vec::with_capacity(Self::LEN);
                bytes.push(make_status_byte(Self::KIND.status(), self.channel));
                $( bytes.push(self.$field.write()); )+
                bytes
            }
        }
        impl EncodeRunningStatus for $name {
            fn encode_running_status(&self) -> Vec<u8> {
                let mut bytes = Vec::with_capacity(Self::LEN - 1);
                $( bytes.push(self.$field.write()); )+
                bytes
            }
        }
        impl Decode for $name {
            fn decode(mut raw: &[u8]) -> Result<$name> {
                const WHAT: &str = concat!($what, " messages");
                check_len(raw, Self::LEN, WHAT)?;
                let channel = read_status(&mut raw, WHAT)?;
                $( let $field = read_field(&mut raw, WHAT)?; )+
                Ok($name { channel, $( $field, )+ })
            }
        }
        impl DecodeRunningStatus for $name {
            fn decode_running_status(mut raw: &[u8]) -> Result<$name> {
                const WHAT: &str = concat!($what, " running status messages");
                check_len(raw, Self::LEN - 1, WHAT)?;
                $( let $field = read_field(&mut raw, WHAT)?; )+
                Ok($name { channel: Channel::default(), $( $field, )+ })
            }
        }
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}:{}:{}", MESSAGE_VERSION, Self::NAME, self.channel)?;
                $( write!(f, ":{}", self.$field)?; )+
                Ok(())
            }
        }
        impl From<$name> for Message {
            #[inline]
            fn from(msg: $name) -> Message {
                Message::$kind(msg)
            }
        }
    };
}

channel_voice! {
    /// A Note-Off message: status/channel, note number, velocity.
    ///
    /// `[0b1000_0001, 0b0100_0000, 0b0010_0000]` releases note 64 on channel index 1 with
    /// velocity 32.
    NoteOff => NoteOff, "note-off" {
        /// The note to stop playing.
        note: Note,
        /// How fast the key was released.
        velocity: Velocity,
    }
}

channel_voice! {
    /// A Note-On message: status/channel, note number, velocity.
    ///
    /// `[0b1001_0001, 0b0100_0000, 0b0010_0000]` plays note 64 on channel index 1 with velocity 32.
    NoteOn => NoteOn, "note-on" {
        /// The note to start playing.
        note: Note,
        /// The strength with which to play it.
        velocity: Velocity,
    }
}

channel_voice! {
    /// A Polyphonic Key Pressure message: status/channel, note number, pressure.
    PolyphonicKeyPressure => PolyphonicKeyPressure, "polyphonic key pressure" {
        /// The key whose pressure changed.
        note: Note,
        /// The new pressure.
        pressure: Pressure,
    }
}

channel_voice! {
    /// A Program Change message: status/channel, program number.
    ///
    /// `[0b1100_0001, 0b0110_0010]` selects program 98 on channel index 1.
    ProgramChange => ProgramChange, "program change" {
        /// The new program for the channel.
        program: Program,
    }
}

channel_voice! {
    /// A Channel Pressure message: status/channel, note number, pressure.
    ChannelPressure => ChannelPressure, "channel pressure" {
        /// The note carried alongside the channel pressure.
        note: Note,
        /// The new pressure for the whole channel.
        pressure: Pressure,
    }
}

/// A Pitch Bend Change message: status/channel, pitch bend LSB, pitch bend MSB.
///
/// `[0b1111_0001, 0b1110_0010, 0b0001_1101]` bends channel index 1 by 7650.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Default)]
pub struct PitchBendChange {
    /// The channel this message is addressed to.
    pub channel: Channel,
    /// The new pitch bend.
    pub pitch_bend: PitchBend,
}
impl PitchBendChange {
    /// The kind of this message.
    pub const KIND: MessageKind = MessageKind::PitchBend;
    /// The human-readable name of this message.
    pub const NAME: &'static str = Self::KIND.name();
    /// The amount of bytes in a complete message.
    pub const LEN: usize = Self::KIND.byte_len();

    fn read_bend(raw: &[u8], what: &str) -> Result<PitchBend> {
        match *raw {
            [lsb, msb] => PitchBend::from_bytes(msb, lsb).context(ErrorKind::Unmarshalling, || {
                format!("invalid pitch bend from LSB {:#04x} and MSB {:#04x}", lsb, msb)
            }),
            _ => bail!(Error::new(
                ErrorKind::Unmarshalling,
                format!("{} are missing their pitch bend bytes", what),
            )),
        }
    }
}
impl Encode for PitchBendChange {
    fn encode(&self) -> Vec<u8> {
        vec![
            make_status_byte(Self::KIND.status(), self.channel),
            self.pitch_bend.lsb(),
            self.pitch_bend.msb(),
        ]
    }
}
impl EncodeRunningStatus for PitchBendChange {
    fn encode_running_status(&self) -> Vec<u8> {
        vec![self.pitch_bend.lsb(), self.pitch_bend.msb()]
    }
}
impl Decode for PitchBendChange {
    fn decode(mut raw: &[u8]) -> Result<PitchBendChange> {
        const WHAT: &str = "pitch bend messages";
        check_len(raw, Self::LEN, WHAT)?;
        let channel = read_status(&mut raw, WHAT)?;
        let pitch_bend = Self::read_bend(raw, WHAT)?;
        Ok(PitchBendChange {
            channel,
            pitch_bend,
        })
    }
}
impl DecodeRunningStatus for PitchBendChange {
    fn decode_running_status(raw: &[u8]) -> Result<PitchBendChange> {
        const WHAT: &str = "pitch bend running status messages";
        check_len(raw, Self::LEN - 1, WHAT)?;
        let pitch_bend = Self::read_bend(raw, WHAT)?;
        Ok(PitchBendChange {
            channel: Channel::default(),
            pitch_bend,
        })
    }
}
impl fmt::Display for PitchBendChange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            MESSAGE_VERSION,
            Self::NAME,
            self.channel,
            self.pitch_bend
        )
    }
}
impl From<PitchBendChange> for Message {
    #[inline]
    fn from(msg: PitchBendChange) -> Message {
        Message::PitchBend(msg)
    }
}

/// Any of the supported Channel Voice messages.
///
/// This is a closed set: every operation on it matches exhaustively over the six kinds.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum Message {
    /// Stop playing a note.
    NoteOff(NoteOff),
    /// Start playing a note.
    NoteOn(NoteOn),
    /// Change the pressure applied to a single key.
    PolyphonicKeyPressure(PolyphonicKeyPressure),
    /// Change the program of a channel.
    ProgramChange(ProgramChange),
    /// Change the pressure applied to a whole channel.
    ChannelPressure(ChannelPressure),
    /// Bend the pitch of a whole channel.
    PitchBend(PitchBendChange),
}

/// Run the same expression on the inner message, whatever its kind.
macro_rules! each_kind {
    ($msg:expr, |$inner:ident| $body:expr) => {
        match $msg {
            Message::NoteOff($inner) => $body,
            Message::NoteOn($inner) => $body,
            Message::PolyphonicKeyPressure($inner) => $body,
            Message::ProgramChange($inner) => $body,
            Message::ChannelPressure($inner) => $body,
            Message::PitchBend($inner) => $body,
        }
    };
}

/// Decode the given bytes as the message type matching `kind`.
macro_rules! decode_as {
    ($kind:expr, $method:ident($raw:expr)) => {
        match $kind {
            MessageKind::NoteOff => Message::NoteOff(NoteOff::$method($raw)?),
            MessageKind::NoteOn => Message::NoteOn(NoteOn::$method($raw)?),
            MessageKind::PolyphonicKeyPressure => {
                Message::PolyphonicKeyPressure(PolyphonicKeyPressure::$method($raw)?)
            }
            MessageKind::ProgramChange => Message::ProgramChange(ProgramChange::$method($raw)?),
            MessageKind::ChannelPressure => {
                Message::ChannelPressure(ChannelPressure::$method($raw)?)
            }
            MessageKind::PitchBend => Message::PitchBend(PitchBendChange::$method($raw)?),
        }
    };
}

impl Message {
    /// The kind of this message.
    #[inline]
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::NoteOff(_) => MessageKind::NoteOff,
            Message::NoteOn(_) => MessageKind::NoteOn,
            Message::PolyphonicKeyPressure(_) => MessageKind::PolyphonicKeyPressure,
            Message::ProgramChange(_) => MessageKind::ProgramChange,
            Message::ChannelPressure(_) => MessageKind::ChannelPressure,
            Message::PitchBend(_) => MessageKind::PitchBend,
        }
    }

    /// The human-readable name of this message.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// The channel this message is addressed to.
    #[inline]
    pub fn channel(&self) -> Channel {
        each_kind!(self, |msg| msg.channel)
    }

    /// The same message, addressed to another channel.
    #[inline]
    pub fn with_channel(mut self, channel: Channel) -> Message {
        each_kind!(&mut self, |msg| msg.channel = channel);
        self
    }

    /// The full status byte of this message, channel included.
    #[inline]
    pub fn status_byte(&self) -> u8 {
        make_status_byte(self.kind().status(), self.channel())
    }

    /// Decode the data bytes of a running status message of the given kind.
    ///
    /// The channel is left at `Channel::default()`, see
    /// [`DecodeRunningStatus`](trait.DecodeRunningStatus.html).
    pub fn decode_running_status(kind: MessageKind, raw: &[u8]) -> Result<Message> {
        Ok(decode_as!(kind, decode_running_status(raw)))
    }
}
impl Encode for Message {
    fn encode(&self) -> Vec<u8> {
        each_kind!(self, |msg| msg.encode())
    }
}
impl EncodeRunningStatus for Message {
    fn encode_running_status(&self) -> Vec<u8> {
        each_kind!(self, |msg| msg.encode_running_status())
    }
}
impl Decode for Message {
    /// Decode a complete message, picking its kind from the status byte.
    ///
    /// Status bytes with a type code not handled by this crate are rejected.
    fn decode(raw: &[u8]) -> Result<Message> {
        let &status = raw.first().ok_or_else(|| {
            Error::new(
                ErrorKind::Unmarshalling,
                "messages are made up of at least 2 bytes, received 0 byte(s)",
            )
        })?;
        ensure!(
            has_status_msb(status),
            Error::new(ErrorKind::Unmarshalling, "messages must have a status MSB")
        );
        let kind = match Status::from_status_byte(status).kind() {
            Some(kind) => kind,
            None => {
                trace!(status, "unsupported status byte");
                bail!(Error::new(
                    ErrorKind::Unmarshalling,
                    format!("unsupported message type in status byte {:#04x}", status),
                ))
            }
        };
        Ok(decode_as!(kind, decode(raw)))
    }
}
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        each_kind!(self, |msg| fmt::Display::fmt(msg, f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(n: i32) -> Note {
        Note::new(n).unwrap()
    }

    fn chan(n: i32) -> Channel {
        Channel::new(n).unwrap()
    }

    #[test]
    fn status_codes() {
        let statuses: Vec<u8> = MessageKind::ALL
            .iter()
            .map(|kind| kind.status().as_byte())
            .collect();
        assert_eq!(statuses, [0x80, 0x90, 0xA0, 0xC0, 0xD0, 0xF0]);
        for kind in MessageKind::ALL {
            assert_eq!(MessageKind::from_status(kind.status()), Some(kind));
        }
        assert_eq!(MessageKind::from_status(Status::from_status_byte(0xB0)), None);
        assert_eq!(MessageKind::from_status(Status::from_status_byte(0xE5)), None);
    }

    #[test]
    fn names() {
        assert_eq!(NoteOff::NAME, "Note-Off");
        assert_eq!(NoteOn::NAME, "Note-On");
        assert_eq!(PolyphonicKeyPressure::NAME, "Polyphonic Key Pressure");
        assert_eq!(ProgramChange::NAME, "Program Change");
        assert_eq!(ChannelPressure::NAME, "Channel Pressure");
        assert_eq!(PitchBendChange::NAME, "Pitch Bend Change");
    }

    #[test]
    fn display() {
        let msg = NoteOff {
            channel: chan(1),
            note: note(64),
            velocity: Velocity::new(32),
        };
        assert_eq!(msg.to_string(), "midiv1:Note-Off:1:64:32");
        let msg = ProgramChange {
            channel: chan(1),
            program: Program::new(64).unwrap(),
        };
        assert_eq!(msg.to_string(), "midiv1:Program Change:1:64");
        let msg = Message::from(PitchBendChange {
            channel: chan(2),
            pitch_bend: PitchBend::new(-100).unwrap(),
        });
        assert_eq!(msg.to_string(), "midiv1:Pitch Bend Change:2:-100");
    }

    #[test]
    fn note_on_vector() {
        let raw = [0b1001_0001, 0b0100_0000, 0b0010_0000];
        let msg = NoteOn::decode(&raw).unwrap();
        assert_eq!(
            msg,
            NoteOn {
                channel: chan(1),
                note: note(64),
                velocity: Velocity::new(32),
            }
        );
        assert_eq!(msg.encode(), raw);
        assert_eq!(msg.encode_running_status(), raw[1..]);
    }

    #[test]
    fn note_on_without_status_msb() {
        let err = NoteOn::decode(&[0b0001_0001, 0b0100_0000, 0b0010_0000]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unmarshalling);
        assert_eq!(
            err.to_string(),
            "note-on messages must have a status MSB: error unmarshalling MIDI message"
        );
    }

    #[test]
    fn wrong_length_names_counts() {
        let err = ProgramChange::decode(&[0xC1]).unwrap_err();
        assert_eq!(
            err.message(),
            "program change messages are made up of 2 bytes, received 1 byte(s)"
        );
        let err = NoteOff::decode_running_status(&[0x40, 0x20, 0x10]).unwrap_err();
        assert_eq!(
            err.message(),
            "note-off running status messages are made up of 2 bytes, received 3 byte(s)"
        );
    }

    #[test]
    fn invalid_fields_are_wrapped() {
        let err = NoteOn::decode(&[0x91, 0x80, 0x20]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unmarshalling);
        assert!(err.is(ErrorKind::InvalidNote));

        let err = ProgramChange::decode_running_status(&[0xFF]).unwrap_err();
        assert!(err.is(ErrorKind::Unmarshalling));
        assert!(err.is(ErrorKind::InvalidProgram));

        let err = PitchBendChange::decode(&[0xF1, 0xFF, 0x7F]).unwrap_err();
        assert!(err.is(ErrorKind::Unmarshalling));
        assert!(err.is(ErrorKind::InvalidPitchBend));
    }

    #[test]
    fn clamped_fields_decode() {
        let msg = ChannelPressure::decode(&[0xD3, 0x40, 0xFF]).unwrap();
        assert_eq!(msg.pressure, Pressure::FULL);
        let msg = NoteOff::decode_running_status(&[0x40, 0x90]).unwrap();
        assert_eq!(msg.velocity, Velocity::FULL);
    }

    #[test]
    fn decoders_ignore_the_type_nibble() {
        // The kind is chosen by the caller, only the status bit is checked.
        let msg = PitchBendChange::decode(&[0b1101_0001, 0b1110_0010, 0b0001_1101]).unwrap();
        assert_eq!(msg.channel, chan(1));
        assert_eq!(msg.pitch_bend.as_int(), 7650);
    }

    #[test]
    fn running_status_channel_defaults() {
        let msg = PolyphonicKeyPressure::decode_running_status(&[0x40, 0x20]).unwrap();
        assert_eq!(msg.channel, Channel::default());
        assert_eq!(msg.channel, Channel::MIN);
    }

    #[test]
    fn message_dispatch() {
        let msg = Message::decode(&[0xC5, 0x62]).unwrap();
        assert_eq!(msg.kind(), MessageKind::ProgramChange);
        assert_eq!(msg.channel(), chan(5));
        assert_eq!(msg.status_byte(), 0xC5);

        let err = Message::decode(&[0xB0, 0x07, 0x7F]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unmarshalling);
        let err = Message::decode(&[0xE0, 0x00, 0x40]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unmarshalling);
        let err = Message::decode(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unmarshalling);
        let err = Message::decode(&[0x40, 0x40]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unmarshalling);
    }

    #[test]
    fn message_with_channel() {
        let msg = Message::decode_running_status(MessageKind::NoteOn, &[60, 100]).unwrap();
        assert_eq!(msg.channel(), Channel::MIN);
        let msg = msg.with_channel(chan(9));
        assert_eq!(msg.channel(), chan(9));
        assert_eq!(msg.encode(), [0x99, 60, 100]);
    }

    #[test]
    fn encode_into_short_buffer() {
        let msg = NoteOn {
            channel: chan(0),
            note: note(60),
            velocity: Velocity::MIDDLE,
        };
        let mut buf = [0; 2];
        let err = msg.encode_into(&mut buf).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Marshalling);
        assert_eq!(buf, [0, 0]);
        assert_eq!(msg.encode_running_status_into(&mut buf).unwrap(), 2);
        assert_eq!(buf, [60, 63]);

        let mut buf = [0xAA; 4];
        assert_eq!(msg.encode_into(&mut buf).unwrap(), 3);
        assert_eq!(buf, [0x90, 60, 63, 0xAA]);
    }
}
