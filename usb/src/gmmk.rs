//! Driver facade.

use std::time::Duration;

use log::debug;

use crate::commands::{Command, Rgb};
use crate::device::{DeviceVariant, UsbTransport};
use crate::error::{CommandError, ConnectError};
use crate::sequencer::{self, AckMode, FrameTransport};

/// A GMMK keyboard driven through a [`FrameTransport`].
///
/// Generic over the transport so the protocol can run against a mock; the
/// [`UsbTransport`] constructor is what production callers use.
pub struct Gmmk<T> {
    transport: T,
    ack_mode: AckMode,
}

impl Gmmk<UsbTransport> {
    /// Open the physical keyboard and claim its interface.
    pub fn open(variant: DeviceVariant, timeout: Duration) -> Result<Self, ConnectError> {
        Ok(Self::new(UsbTransport::open(variant, timeout)?))
    }

    /// Release the USB interface, reattaching the kernel driver if needed.
    pub fn release(&mut self) -> Result<(), ConnectError> {
        self.transport.release()
    }
}

impl<T: FrameTransport> Gmmk<T> {
    pub fn new(transport: T) -> Self {
        Self { transport, ack_mode: AckMode::default() }
    }

    /// Choose how device acknowledgments are treated.
    pub fn set_ack_mode(&mut self, ack_mode: AckMode) {
        self.ack_mode = ack_mode;
    }

    /// Set the backlight brightness. Values beyond the device's range wrap
    /// modulo 256 on the wire.
    pub fn set_brightness(&mut self, level: u8) -> Result<(), CommandError> {
        self.run(Command::Brightness(level))
    }

    /// Set a static backlight colour.
    pub fn set_color(&mut self, color: Rgb) -> Result<(), CommandError> {
        self.run(Command::Color(color))
    }

    /// Set the LED animation mode.
    pub fn set_led_mode(&mut self, mode: u8) -> Result<(), CommandError> {
        self.run(Command::LedMode(mode))
    }

    /// Activate and program the numbered lighting/macro profile slot.
    pub fn set_profile(&mut self, index: u8) -> Result<(), CommandError> {
        self.run(Command::Profile(index))
    }

    fn run(&mut self, command: Command) -> Result<(), CommandError> {
        debug!("Executing {command:?}");
        let segments = command.encode()?;
        sequencer::run(&mut self.transport, &segments, self.ack_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::testing::MockTransport;

    fn keyboard() -> Gmmk<MockTransport> {
        Gmmk::new(MockTransport::default())
    }

    #[test]
    fn led_mode_is_three_write_read_pairs() {
        let mut keyboard = keyboard();
        keyboard.set_led_mode(2).unwrap();

        let transport = &keyboard.transport;
        assert_eq!(transport.writes().len(), 3);
        assert_eq!(transport.reads(), 3);

        let writes = transport.writes();
        assert_eq!(&writes[0][..6], &[0x07, 0x02, 0x00, 0x01, 0x04, 0x60]);
        assert_eq!(&writes[1][..9], &[0x04, 0x0a, 0x00, 0x06, 0x01, 0x04, 0x00, 0x00, 0x02]);
        assert_eq!(&writes[2][..4], &[0x04, 0x02, 0x00, 0x02]);
    }

    #[test]
    fn color_is_a_single_write_without_read() {
        let mut keyboard = keyboard();
        keyboard.set_color(Rgb::new(0, 255, 0)).unwrap();

        let transport = &keyboard.transport;
        let writes = transport.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(transport.reads(), 0);

        let mut expected = vec![0x07, 0x18, 0, 0, 0, 0, 0, 0, 0, 0, 255, 0];
        expected.resize(72, 0);
        assert_eq!(writes[0], &expected);
    }

    #[test]
    fn brightness_transaction_shape() {
        let mut keyboard = keyboard();
        keyboard.set_brightness(3).unwrap();

        let writes = keyboard.transport.writes();
        assert_eq!(writes.len(), 3);
        assert_eq!(&writes[1][..9], &[0x04, 0x0b, 0x00, 0x06, 0x01, 0x01, 0x00, 0x00, 0x03]);
    }

    #[test]
    fn profile_transaction_write_count() {
        let mut keyboard = keyboard();
        keyboard.set_profile(0).unwrap();

        // probe + (header + 3 + footer) + (header + 8 + footer) + probe + remap
        let transport = &keyboard.transport;
        assert_eq!(transport.writes().len(), 18);
        assert_eq!(transport.reads(), 18);
    }
}
