//! The capabilities shared by every message type.

use crate::prelude::*;

/// Types that can be written out as a complete message, status byte included.
pub trait Encode {
    /// Encodes `self` as raw MIDI bytes.
    ///
    /// The first byte is always a status byte, and the length is fixed by the message type.
    fn encode(&self) -> Vec<u8>;

    /// Encodes `self` into the start of `buf`, returning the amount of bytes written.
    ///
    /// Fails with `ErrorKind::Marshalling` if `buf` is too short to hold the message, in which
    /// case `buf` is left untouched.
    fn encode_into(&self, buf: &mut [u8]) -> Result<usize> {
        let bytes = self.encode();
        write_into(&bytes, buf)
    }
}

/// Types that can be read from a complete message, status byte included.
pub trait Decode: Sized {
    /// Decodes exactly one message from `raw`.
    ///
    /// `raw` must hold exactly the bytes of the message, no more and no less.
    fn decode(raw: &[u8]) -> Result<Self>;
}

/// Types that can be written out without their status byte, relying on running status.
pub trait EncodeRunningStatus {
    /// Encodes the data bytes of `self`, omitting the status byte.
    ///
    /// The output is always one byte shorter than the output of `Encode::encode`.
    fn encode_running_status(&self) -> Vec<u8>;

    /// Encodes the data bytes of `self` into the start of `buf`, returning the amount of bytes
    /// written.
    fn encode_running_status_into(&self, buf: &mut [u8]) -> Result<usize> {
        let bytes = self.encode_running_status();
        write_into(&bytes, buf)
    }
}

/// Types that can be read from the data bytes of a message whose status byte was omitted.
pub trait DecodeRunningStatus: Sized {
    /// Decodes the data bytes in `raw`.
    ///
    /// The channel is not present in the data bytes, so it is left at `Channel::default()`.
    /// It is up to the caller to fill it in from the running status.
    fn decode_running_status(raw: &[u8]) -> Result<Self>;
}

fn write_into(bytes: &[u8], buf: &mut [u8]) -> Result<usize> {
    ensure!(
        buf.len() >= bytes.len(),
        Error::new(
            ErrorKind::Marshalling,
            format!(
                "message needs {} byte(s), buffer holds {} byte(s)",
                bytes.len(),
                buf.len()
            ),
        )
    );
    buf[..bytes.len()].copy_from_slice(bytes);
    Ok(bytes.len())
}
