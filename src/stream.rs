//! Reading and writing undelimited streams of messages that share status bytes.
//!
//! On a MIDI cable, a status byte may be left out when it is identical to the status byte of the
//! previous message (this is called "running status"). A stream is therefore only decodable from
//! its start, since the meaning of data bytes depends on the last status byte seen.
//!
//! [`StreamEncoder`](struct.StreamEncoder.html) and [`StreamDecoder`](struct.StreamDecoder.html)
//! keep track of the running status on behalf of the caller. For one-shot use,
//! [`encode_all`](fn.encode_all.html) and [`decode_all`](fn.decode_all.html) wrap them.
//!
//! Pitch Bend messages whose least significant byte has its top bit set could not be told apart
//! from a new status byte if they were sent with running status, so the encoder always repeats the
//! status byte for them. For every other kind, a byte with its top bit set in the middle of a
//! message is an error rather than a data byte.

use crate::{
    codec::EncodeRunningStatus,
    message::{Message, MessageKind},
    prelude::*,
};
use tracing::trace;

/// Writes messages, omitting status bytes when the running status allows it.
#[derive(Clone, Debug, Default)]
pub struct StreamEncoder {
    running_status: Option<u8>,
}
impl StreamEncoder {
    /// Create an encoder with no running status.
    #[inline]
    pub fn new() -> StreamEncoder {
        StreamEncoder::default()
    }

    /// The status byte that the next message may omit, if any.
    #[inline]
    pub fn running_status(&self) -> Option<u8> {
        self.running_status
    }

    /// Forget the running status, so that the next message is written out in full.
    #[inline]
    pub fn reset(&mut self) {
        self.running_status = None;
    }

    /// Append a message to `out`, skipping its status byte if it matches the running status.
    pub fn encode(&mut self, msg: &Message, out: &mut Vec<u8>) {
        let status = msg.status_byte();
        let data = msg.encode_running_status();
        let ambiguous = data.first().map_or(false, |&byte| has_status_msb(byte));
        if self.running_status != Some(status) || ambiguous {
            out.push(status);
        }
        self.running_status = Some(status);
        out.extend_from_slice(&data);
    }
}

/// Reads messages one at a time from a running status stream.
#[derive(Clone, Debug, Default)]
pub struct StreamDecoder {
    running_status: Option<u8>,
}
impl StreamDecoder {
    /// Create a decoder with no running status.
    #[inline]
    pub fn new() -> StreamDecoder {
        StreamDecoder::default()
    }

    /// The last status byte seen, which applies to data bytes at a message boundary.
    #[inline]
    pub fn running_status(&self) -> Option<u8> {
        self.running_status
    }

    /// Forget the running status.
    #[inline]
    pub fn reset(&mut self) {
        self.running_status = None;
    }

    /// Decode the message at the start of `raw` and advance `raw` past it.
    ///
    /// Returns `Ok(None)` once `raw` is empty. On failure `raw` is left untouched and the running
    /// status is unchanged.
    pub fn decode_next(&mut self, raw: &mut &[u8]) -> Result<Option<Message>> {
        let first = match raw.first() {
            Some(&byte) => byte,
            None => return Ok(None),
        };
        let (status, data) = if has_status_msb(first) {
            (first, &raw[1..])
        } else {
            match self.running_status {
                Some(status) => (status, *raw),
                None => {
                    trace!(byte = first, "data byte without running status");
                    bail!(Error::new(
                        ErrorKind::Unmarshalling,
                        format!("data byte {:#04x} received before any status byte", first),
                    ))
                }
            }
        };
        let kind = match Status::from_status_byte(status).kind() {
            Some(kind) => kind,
            None => {
                trace!(status, "unsupported status byte in stream");
                bail!(Error::new(
                    ErrorKind::Unmarshalling,
                    format!("unsupported message type in status byte {:#04x}", status),
                ))
            }
        };
        let len = kind.running_status_len();
        if data.len() < len {
            trace!(status, available = data.len(), "truncated message at end of stream");
            bail!(Error::new(
                ErrorKind::Unmarshalling,
                format!(
                    "{} message is truncated: needs {} data byte(s), received {}",
                    kind,
                    len,
                    data.len()
                ),
            ))
        }
        let (data, rest) = data.split_at(len);
        // Pitch bend bytes span the full byte range.
        if kind != MessageKind::PitchBend {
            if let Some(&byte) = data.iter().find(|&&byte| has_status_msb(byte)) {
                trace!(status, byte, "status byte inside message data");
                bail!(Error::new(
                    ErrorKind::Unmarshalling,
                    format!("status byte {:#04x} interrupts {} message", byte, kind),
                ))
            }
        }
        let channel = parse_channel_from_status_byte(status)?;
        let msg = Message::decode_running_status(kind, data)
            .map_err(|err| {
                trace!(%err, "invalid message in stream");
                err
            })?
            .with_channel(channel);
        self.running_status = Some(status);
        *raw = rest;
        Ok(Some(msg))
    }
}

/// Encode a sequence of messages as a single running status stream.
pub fn encode_all(msgs: &[Message]) -> Vec<u8> {
    let mut encoder = StreamEncoder::new();
    let mut out = Vec::with_capacity(msgs.len() * 3);
    for msg in msgs {
        encoder.encode(msg, &mut out);
    }
    out
}

/// Decode a whole running status stream.
///
/// Fails if the stream starts with a data byte, contains an unsupported status or ends in the
/// middle of a message.
pub fn decode_all(mut raw: &[u8]) -> Result<Vec<Message>> {
    let mut decoder = StreamDecoder::new();
    let mut msgs = Vec::new();
    while let Some(msg) = decoder.decode_next(&mut raw)? {
        msgs.push(msg);
    }
    Ok(msgs)
}
