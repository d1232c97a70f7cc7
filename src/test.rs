use crate::{
    stream, Channel, ChannelPressure, Decode, DecodeRunningStatus, Encode, EncodeRunningStatus,
    ErrorKind, Message, MessageKind, Note, NoteOff, NoteOn, PitchBend, PitchBendChange,
    PolyphonicKeyPressure, Pressure, Program, ProgramChange, Velocity,
};

fn chan(n: i32) -> Channel {
    Channel::new(n).unwrap()
}

fn note(n: i32) -> Note {
    Note::new(n).unwrap()
}

/// Check that the raw bytes decode to the message, and that the message encodes back to them, in
/// both the full and the running status forms.
fn test_equiv(list: &[(&[u8], Message)]) {
    for (raw, msg) in list {
        assert_eq!(Message::decode(raw).as_ref(), Ok(msg), "decoding {:02x?}", raw);
        assert_eq!(msg.encode(), *raw, "encoding {}", msg);
        let mut buf = [0; 3];
        assert_eq!(msg.encode_into(&mut buf), Ok(raw.len()));
        assert_eq!(&buf[..raw.len()], *raw);

        let data = msg.encode_running_status();
        assert_eq!(data, raw[1..]);
        let decoded = Message::decode_running_status(msg.kind(), &data).unwrap();
        assert_eq!(decoded.with_channel(msg.channel()), *msg);
        assert_eq!(decoded.channel(), Channel::default());
    }
}

#[test]
fn note_messages() {
    test_equiv(&[
        (
            &[0x80, 0, 63],
            NoteOff {
                channel: chan(0),
                note: note(0),
                velocity: Velocity::MIDDLE,
            }
            .into(),
        ),
        (
            &[0x87, 121, 127],
            NoteOff {
                channel: chan(7),
                note: note(121),
                velocity: Velocity::FULL,
            }
            .into(),
        ),
        (
            &[0x91, 64, 32],
            NoteOn {
                channel: chan(1),
                note: note(64),
                velocity: Velocity::new(32),
            }
            .into(),
        ),
        (
            &[0x9F, 127, 0],
            NoteOn {
                channel: Channel::MAX,
                note: Note::MAX,
                velocity: Velocity::ZERO,
            }
            .into(),
        ),
    ]);
}

#[test]
fn pressure_messages() {
    test_equiv(&[
        (
            &[0xA0, 0, 63],
            PolyphonicKeyPressure {
                channel: chan(0),
                note: note(0),
                pressure: Pressure::MIDDLE,
            }
            .into(),
        ),
        (
            &[0xAA, 127, 0],
            PolyphonicKeyPressure {
                channel: chan(10),
                note: Note::MAX,
                pressure: Pressure::ZERO,
            }
            .into(),
        ),
        (
            &[0xD1, 64, 32],
            ChannelPressure {
                channel: chan(1),
                note: note(64),
                pressure: Pressure::new(32),
            }
            .into(),
        ),
        (
            &[0xDE, 12, 127],
            ChannelPressure {
                channel: chan(14),
                note: note(12),
                pressure: Pressure::FULL,
            }
            .into(),
        ),
    ]);
}

#[test]
fn program_messages() {
    test_equiv(&[
        (
            &[0xC1, 64],
            ProgramChange {
                channel: chan(1),
                program: Program::new(64).unwrap(),
            }
            .into(),
        ),
        (
            &[0xC9, 0],
            ProgramChange {
                channel: chan(9),
                program: Program::MIN,
            }
            .into(),
        ),
        (
            &[0xCF, 127],
            ProgramChange {
                channel: Channel::MAX,
                program: Program::MAX,
            }
            .into(),
        ),
    ]);
}

#[test]
fn pitch_bend_messages() {
    let bend = |channel, value| -> Message {
        PitchBendChange {
            channel: chan(channel),
            pitch_bend: PitchBend::new(value).unwrap(),
        }
        .into()
    };
    test_equiv(&[
        (&[0xF1, 0xE2, 0x1D], bend(1, 7650)),
        (&[0xF0, 0x00, 0x00], bend(0, 0)),
        (&[0xF5, 0x00, 0x20], bend(5, 8192)),
        (&[0xF5, 0x00, 0xE0], bend(5, -8192)),
        (&[0xFF, 0x18, 0xFC], bend(15, -1000)),
    ]);
}

#[test]
fn wrong_lengths() {
    for kind in MessageKind::ALL {
        let full = kind.byte_len();
        let status = kind.status().as_byte() | 0x01;
        for len in [full - 1, full + 1] {
            let mut raw = vec![0x10u8; len];
            raw[0] = status;
            let err = Message::decode(&raw).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Unmarshalling, "{} with {} bytes", kind, len);
        }
        let running = kind.running_status_len();
        for len in [running - 1, running + 1] {
            let err = Message::decode_running_status(kind, &vec![0x10u8; len]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Unmarshalling, "{} with {} bytes", kind, len);
        }
    }
}

#[test]
fn per_variant_decoders() {
    assert!(NoteOff::decode(&[0x80, 1]).is_err());
    assert!(NoteOn::decode_running_status(&[1]).is_err());
    assert!(PolyphonicKeyPressure::decode(&[0x20, 1, 2]).is_err());
    assert!(ChannelPressure::decode_running_status(&[1, 2, 3]).is_err());
    assert!(ProgramChange::decode(&[0xC0, 1, 2]).is_err());
    assert!(PitchBendChange::decode_running_status(&[0x00]).is_err());

    let msg = PitchBendChange::decode(&[0b1101_0001, 0b1110_0010, 0b0001_1101]).unwrap();
    assert_eq!(msg.channel, chan(1));
    assert_eq!(msg.pitch_bend, PitchBend::new(7650).unwrap());
    assert_eq!(msg.encode_running_status(), [0xE2, 0x1D]);
}

#[test]
fn field_errors_keep_their_cause() {
    let err = Message::decode(&[0x95, 0xC0, 0x10]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unmarshalling);
    assert!(err.is(ErrorKind::InvalidNote));
    assert!(!err.is(ErrorKind::InvalidChannel));

    let err = Message::decode_running_status(MessageKind::ProgramChange, &[0x80]).unwrap_err();
    assert!(err.is(ErrorKind::InvalidProgram));
}

#[test]
fn display_strings() {
    let cases: &[(&[u8], &str)] = &[
        (&[0x81, 64, 32], "midiv1:Note-Off:1:64:32"),
        (&[0x91, 64, 32], "midiv1:Note-On:1:64:32"),
        (&[0xA1, 64, 32], "midiv1:Polyphonic Key Pressure:1:64:32"),
        (&[0xC1, 64], "midiv1:Program Change:1:64"),
        (&[0xD1, 64, 32], "midiv1:Channel Pressure:1:64:32"),
        (&[0xF1, 0xE2, 0x1D], "midiv1:Pitch Bend Change:1:7650"),
    ];
    for (raw, text) in cases {
        assert_eq!(Message::decode(raw).unwrap().to_string(), *text);
    }
}

#[test]
fn stream_matches_single_messages() {
    let msgs: Vec<Message> = (0..16)
        .map(|i| {
            NoteOn {
                channel: chan(i / 4),
                note: note(60 + i),
                velocity: Velocity::new(i * 8),
            }
            .into()
        })
        .collect();
    let bytes = stream::encode_all(&msgs);
    // One status byte per channel change, two data bytes per message.
    assert_eq!(bytes.len(), 4 + 16 * 2);
    assert_eq!(stream::decode_all(&bytes).unwrap(), msgs);

    let concatenated: Vec<u8> = msgs.iter().flat_map(|msg| msg.encode()).collect();
    assert_eq!(stream::decode_all(&concatenated).unwrap(), msgs);
}
