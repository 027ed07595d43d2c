//! Command encoding.
//!
//! Each high-level intent encodes to an ordered list of transaction segments.
//! A segment groups the writes (and the acknowledgment read expected after
//! each one) that belong inside a single header/footer bracket; whether the
//! bracket and the reads apply at all is carried as data, because the
//! captured protocol is not uniform about it (colour programming in
//! particular sends a single bare frame).

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::CommandError;
use crate::frame::{Frame, COMMAND_FRAME_LEN};
use crate::tables;

/// RGB colour triplet.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

#[derive(thiserror::Error, Debug)]
#[error("colour '{0}' does not match format RRGGBB")]
pub struct ParseColorError(String);

impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix('#')).unwrap_or(s);

        // from_str_radix tolerates a leading sign, which is not a colour.
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseColorError(s.into()));
        }

        let value =
            u32::from_str_radix(digits, 16).map_err(|_| ParseColorError(s.into()))?;

        Ok(Self {
            red: (value >> 16) as u8,
            green: (value >> 8) as u8,
            blue: value as u8,
        })
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// One write and the acknowledgment read that must complete before the next
/// write may be issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub frame: Frame,
    pub response_len: Option<usize>,
}

impl Step {
    fn acked(frame: Frame) -> Self {
        Self { frame, response_len: Some(COMMAND_FRAME_LEN) }
    }

    fn unacked(frame: Frame) -> Self {
        Self { frame, response_len: None }
    }
}

/// A run of steps, optionally bracketed by the header/footer frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub bracketed: bool,
    pub steps: Vec<Step>,
}

impl Segment {
    fn bracketed(steps: Vec<Step>) -> Self {
        Self { bracketed: true, steps }
    }

    fn bare(steps: Vec<Step>) -> Self {
        Self { bracketed: false, steps }
    }
}

/// A high-level device intent.
///
/// Numeric parameters are passed through with wrapping u8 arithmetic, exactly
/// as the device expects; range checking is the caller's concern.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Backlight brightness level.
    Brightness(u8),
    /// Static backlight colour.
    Color(Rgb),
    /// LED animation mode.
    LedMode(u8),
    /// Activate and program a lighting/macro profile slot.
    Profile(u8),
}

impl Command {
    /// Encode the command into ordered transaction segments.
    pub fn encode(&self) -> Result<Vec<Segment>, CommandError> {
        match *self {
            Command::Brightness(level) => {
                let frame = Frame::command(&[
                    0x04,
                    0x08u8.wrapping_add(level),
                    0x00,
                    0x06,
                    0x01,
                    0x01,
                    0x00,
                    0x00,
                    level,
                ])?;
                Ok(vec![Segment::bracketed(vec![Step::acked(frame)])])
            },
            Command::LedMode(mode) => {
                let frame = Frame::command(&[
                    0x04,
                    0x08u8.wrapping_add(mode),
                    0x00,
                    0x06,
                    0x01,
                    0x04,
                    0x00,
                    0x00,
                    mode,
                ])?;
                Ok(vec![Segment::bracketed(vec![Step::acked(frame)])])
            },
            Command::Color(color) => {
                // The captured colour flow sends a single frame with no
                // bracket and no acknowledgment read.
                let frame = Frame::extended(&[
                    0x07,
                    0x18,
                    0x00,
                    0x00,
                    0x00,
                    0x00,
                    0x00,
                    0x00,
                    0x00,
                    color.red,
                    color.green,
                    color.blue,
                ])?;
                Ok(vec![Segment::bare(vec![Step::unacked(frame)])])
            },
            Command::Profile(index) => encode_profile(index),
        }
    }
}

/// Profile programming: probe, two bracketed blocks, then the key-remap
/// finale, with the doubled index folded into the sequence bytes.
fn encode_profile(index: u8) -> Result<Vec<Segment>, CommandError> {
    let p2 = index.wrapping_mul(2);

    let probe = Frame::command(&tables::PROFILE_PROBE)?;

    let setup = Segment::bracketed(vec![
        Step::acked(Frame::command(&tables::PROFILE_ANIMATION_SETUP)?),
        Step::acked(Frame::command(&[0x04, 0x67, 0x00, 0x05, 0x38, 0x2a])?),
        Step::acked(Frame::command(&[0x04, 0x91, 0x00, 0x05, 0x38, 0x54])?),
    ]);

    let mut primary = tables::PROFILE_ZONE_PRIMARY;
    primary[tables::SEQ_OFFSET] = primary[tables::SEQ_OFFSET].wrapping_add(p2);
    primary[tables::ZONE_PROFILE_OFFSET] = p2;

    let mut secondary = tables::PROFILE_ZONE_SECONDARY;
    secondary[tables::SEQ_OFFSET] = secondary[tables::SEQ_OFFSET].wrapping_add(p2);
    secondary[tables::ZONE_PROFILE_OFFSET] = p2;

    let mut tertiary = tables::PROFILE_ZONE_TERTIARY;
    tertiary[tables::SEQ_OFFSET] = tertiary[tables::SEQ_OFFSET].wrapping_add(p2);
    tertiary[tables::ZONE_PROFILE_OFFSET] = p2;

    let zones = Segment::bracketed(vec![
        Step::acked(Frame::command(&[
            0x04,
            0x47u8.wrapping_add(p2),
            0x00,
            0x11,
            0x36,
            0x00,
            p2,
        ])?),
        Step::acked(Frame::command(&primary)?),
        Step::acked(Frame::command(&secondary)?),
        Step::acked(Frame::command(&tertiary)?),
        Step::acked(Frame::command(&[
            0x04,
            0x1fu8.wrapping_add(p2),
            0x01,
            0x11,
            0x36,
            0xd8,
            p2,
        ])?),
        Step::acked(Frame::command(&[
            0x04,
            0x56u8.wrapping_add(p2),
            0x00,
            0x11,
            0x36,
            0x0e,
            p2.wrapping_add(1),
        ])?),
        Step::acked(Frame::command(&[
            0x04,
            0x90u8.wrapping_add(p2),
            0x00,
            0x11,
            0x36,
            0x44,
            p2.wrapping_add(1),
        ])?),
        Step::acked(Frame::command(&[
            0x04,
            0xc6u8.wrapping_add(p2),
            0x00,
            0x11,
            0x36,
            0x7a,
            p2.wrapping_add(1),
        ])?),
    ]);

    let mut remap = tables::KEY_REMAP;
    remap[tables::SEQ_OFFSET] = remap[tables::SEQ_OFFSET].wrapping_add(index);
    remap[tables::REMAP_PROFILE_OFFSET] = index;

    Ok(vec![
        Segment::bare(vec![Step::acked(probe.clone())]),
        setup,
        zones,
        Segment::bare(vec![Step::acked(probe), Step::acked(Frame::command(&remap)?)]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_frame(command: Command) -> Frame {
        let segments = command.encode().unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].steps.len(), 1);
        segments[0].steps[0].frame.clone()
    }

    #[test]
    fn brightness_layout() {
        for level in [0u8, 1, 3, 0x80, 0xff] {
            let frame = single_frame(Command::Brightness(level));
            assert_eq!(frame.len(), 64);
            assert_eq!(frame.as_bytes()[1], 0x08u8.wrapping_add(level));
            assert_eq!(frame.as_bytes()[8], level);
            assert_eq!(&frame.as_bytes()[2..8], &[0x00, 0x06, 0x01, 0x01, 0x00, 0x00]);
        }
    }

    #[test]
    fn brightness_is_bracketed_and_acked() {
        let segments = Command::Brightness(1).encode().unwrap();
        assert!(segments[0].bracketed);
        assert_eq!(segments[0].steps[0].response_len, Some(64));
    }

    #[test]
    fn led_mode_layout() {
        let frame = single_frame(Command::LedMode(2));
        let mut expected = vec![0x04, 0x0a, 0x00, 0x06, 0x01, 0x04, 0x00, 0x00, 0x02];
        expected.resize(64, 0);
        assert_eq!(frame.as_bytes(), &expected[..]);
    }

    #[test]
    fn color_is_one_bare_unacked_extended_frame() {
        let segments = Command::Color(Rgb::new(0, 255, 0)).encode().unwrap();
        assert_eq!(segments.len(), 1);
        assert!(!segments[0].bracketed);

        let step = &segments[0].steps[0];
        assert_eq!(step.response_len, None);

        let mut expected = vec![0x07, 0x18, 0, 0, 0, 0, 0, 0, 0, 0, 255, 0];
        expected.resize(72, 0);
        assert_eq!(step.frame.as_bytes(), &expected[..]);
    }

    #[test]
    fn profile_segment_structure() {
        let segments = Command::Profile(0).encode().unwrap();
        assert_eq!(segments.len(), 4);

        assert!(!segments[0].bracketed);
        assert_eq!(segments[0].steps.len(), 1);
        assert!(segments[1].bracketed);
        assert_eq!(segments[1].steps.len(), 3);
        assert!(segments[2].bracketed);
        assert_eq!(segments[2].steps.len(), 8);
        assert!(!segments[3].bracketed);
        assert_eq!(segments[3].steps.len(), 2);

        // Every profile write expects a 64-byte acknowledgment.
        for segment in &segments {
            for step in &segment.steps {
                assert_eq!(step.response_len, Some(64));
            }
        }
    }

    #[test]
    fn profile_probe_frames() {
        let segments = Command::Profile(3).encode().unwrap();
        let expected = Frame::command(&[0x04, 0x2f, 0x00, 0x03, 0x2c]).unwrap();
        assert_eq!(segments[0].steps[0].frame, expected);
        assert_eq!(segments[3].steps[0].frame, expected);
    }

    #[test]
    fn profile_sequence_bytes_shift_by_doubled_index() {
        let bases = [0x47u8, 0x73, 0xb0, 0xe7, 0x1f, 0x56, 0x90, 0xc6];

        for index in [0u8, 1, 2, 0x7f, 0xff] {
            let p2 = index.wrapping_mul(2);
            let segments = Command::Profile(index).encode().unwrap();

            for (step, base) in segments[2].steps.iter().zip(bases) {
                assert_eq!(
                    step.frame.as_bytes()[1],
                    base.wrapping_add(p2),
                    "base {base:#04x}, index {index}"
                );
            }
        }
    }

    #[test]
    fn profile_zone_frames_carry_doubled_index() {
        let segments = Command::Profile(2).encode().unwrap();
        for step in &segments[2].steps[..5] {
            assert_eq!(step.frame.as_bytes()[6], 4);
        }
        // The last three zone frames carry the doubled index plus one.
        for step in &segments[2].steps[5..] {
            assert_eq!(step.frame.as_bytes()[6], 5);
        }
    }

    #[test]
    fn profile_remap_frame_embeds_index() {
        for index in [0u8, 5, 0xff] {
            let segments = Command::Profile(index).encode().unwrap();
            let remap = &segments[3].steps[1].frame;
            assert_eq!(remap.as_bytes()[1], 0xe2u8.wrapping_add(index));
            assert_eq!(remap.as_bytes()[18], index);
            // Remap preamble marker survives the patching.
            assert_eq!(&remap.as_bytes()[8..10], &[0x55, 0xaa]);
        }
    }

    #[test]
    fn rgb_parses_hex_forms() {
        assert_eq!("00ff00".parse::<Rgb>().unwrap(), Rgb::new(0, 255, 0));
        assert_eq!("0xff8000".parse::<Rgb>().unwrap(), Rgb::new(255, 128, 0));
        assert_eq!("#102030".parse::<Rgb>().unwrap(), Rgb::new(0x10, 0x20, 0x30));
        assert!("ff00".parse::<Rgb>().is_err());
        assert!("zzzzzz".parse::<Rgb>().is_err());
        assert!("+ff000".parse::<Rgb>().is_err());
        assert!("-ff000".parse::<Rgb>().is_err());
    }
}
