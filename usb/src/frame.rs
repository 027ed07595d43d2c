//! Fixed-size protocol frames.
//!
//! Every transfer on the command endpoint is exactly 64 or 72 bytes long: the
//! meaningful bytes sit at the front and the remainder is zero-filled. The
//! device rejects (or worse, silently misparses) short frames, so the only
//! way to build one is through the padding constructors here.

use crate::error::CommandError;

/// Length of a standard command frame.
pub const COMMAND_FRAME_LEN: usize = 64;

/// Length of an extended frame, used by colour programming and the
/// header/footer brackets.
pub const EXTENDED_FRAME_LEN: usize = 72;

/// Leading bytes of the frame opening a transaction.
const HEADER_PREFIX: [u8; 6] = [0x07, 0x02, 0x00, 0x01, 0x04, 0x60];

/// Leading bytes of the frame closing a transaction.
const FOOTER_PREFIX: [u8; 4] = [0x04, 0x02, 0x00, 0x02];

/// A fixed-length frame sent over the command endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Vec<u8>,
}

impl Frame {
    /// Build a frame of `len` bytes with `prefix` copied to the front and the
    /// rest zero-filled.
    pub fn new(len: usize, prefix: &[u8]) -> Result<Self, CommandError> {
        if prefix.len() > len {
            return Err(CommandError::FrameOverflow { prefix_len: prefix.len(), frame_len: len });
        }

        Ok(Self::padded(len, prefix))
    }

    /// Build a 64-byte command frame.
    pub fn command(prefix: &[u8]) -> Result<Self, CommandError> {
        Self::new(COMMAND_FRAME_LEN, prefix)
    }

    /// Build a 72-byte extended frame.
    pub fn extended(prefix: &[u8]) -> Result<Self, CommandError> {
        Self::new(EXTENDED_FRAME_LEN, prefix)
    }

    /// The constant frame opening a header/footer bracketed transaction.
    pub fn header() -> Self {
        Self::padded(EXTENDED_FRAME_LEN, &HEADER_PREFIX)
    }

    /// The constant frame closing a header/footer bracketed transaction.
    pub fn footer() -> Self {
        Self::padded(EXTENDED_FRAME_LEN, &FOOTER_PREFIX)
    }

    fn padded(len: usize, prefix: &[u8]) -> Self {
        let mut bytes = vec![0; len];
        bytes[..prefix.len()].copy_from_slice(prefix);

        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
