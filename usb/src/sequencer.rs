//! Transaction sequencing.
//!
//! The device accepts a command only as a strictly alternating sequence of
//! writes and reads: header, then each command frame followed by exactly one
//! read of its declared response size, then footer. Issuing a write while a
//! response is outstanding silently desynchronizes the device, so the
//! sequencer never overlaps transfers and aborts the whole transaction on the
//! first failure.

use log::{debug, warn};

use crate::commands::Segment;
use crate::error::CommandError;
use crate::frame::{Frame, COMMAND_FRAME_LEN};

/// Transport seam between the protocol state machine and the USB stack.
pub trait FrameTransport {
    /// Submit a frame to the command endpoint, returning the bytes accepted.
    fn write(&mut self, frame: &Frame) -> Result<usize, CommandError>;

    /// Read up to `len` bytes from the interrupt endpoint.
    fn read(&mut self, len: usize) -> Result<Vec<u8>, CommandError>;
}

/// How acknowledgment payloads are treated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum AckMode {
    /// Discard acknowledgments without inspection, as the stock software
    /// does. This is the default; real hardware has been seen answering with
    /// junk that it nevertheless acted on.
    #[default]
    Ignore,
    /// Require the acknowledgment to echo the leading byte of the frame it
    /// answers, failing with [`CommandError::UnexpectedAck`] otherwise.
    Validate,
}

/// Run the encoded segments over the transport, bracketing where required.
///
/// Any transport failure aborts immediately; the device state machine has
/// advanced past the header by then, so the caller must restart the whole
/// transaction rather than resend the failed frame.
pub fn run<T: FrameTransport>(
    transport: &mut T,
    segments: &[Segment],
    ack_mode: AckMode,
) -> Result<(), CommandError> {
    for segment in segments {
        if segment.bracketed {
            exchange(transport, &Frame::header(), Some(COMMAND_FRAME_LEN), ack_mode)?;
        }

        for step in &segment.steps {
            exchange(transport, &step.frame, step.response_len, ack_mode)?;
        }

        if segment.bracketed {
            exchange(transport, &Frame::footer(), Some(COMMAND_FRAME_LEN), ack_mode)?;
        }
    }

    Ok(())
}

/// One write and, when declared, the single read paired with it.
fn exchange<T: FrameTransport>(
    transport: &mut T,
    frame: &Frame,
    response_len: Option<usize>,
    ack_mode: AckMode,
) -> Result<(), CommandError> {
    let written = transport.write(frame)?;
    if written != frame.len() {
        warn!("Short write: {written} of {} bytes accepted", frame.len());
    }

    let Some(len) = response_len else {
        return Ok(());
    };

    let ack = transport.read(len)?;
    debug!("Ack ({} bytes): {:02x?}", ack.len(), ack);

    if ack_mode == AckMode::Validate {
        let expected = frame.as_bytes()[0];
        if ack.first() != Some(&expected) {
            return Err(CommandError::UnexpectedAck { expected, received: ack });
        }
    }

    Ok(())
}
