//! Fixed protocol byte tables.
//!
//! These are the constant payloads captured from the vendor software, kept as
//! named data so the encoder stays free of inline magic. Variable fields are
//! patched in by the encoder at the offsets documented below:
//!
//! * byte 1 — per-frame sequence byte; for profile programming the captured
//!   base value is offset by `profile * 2` (wrapping u8).
//! * byte 6 — `profile * 2` in the zone colour frames.
//! * byte 18 of [`KEY_REMAP`] — the raw profile index.

/// Status probe sent outside the header/footer bracket before and after
/// profile programming.
pub const PROFILE_PROBE: [u8; 5] = [0x04, 0x2f, 0x00, 0x03, 0x2c];

/// Animation setup block opening profile programming.
///
/// Bytes 8..=27 describe the animation program (speed `0x14`, mode `0x03`,
/// a full-brightness `0xff, 0xff` colour pair); bytes 50..=54 carry the
/// trailing effect descriptor. The rest is reserved and zero in every
/// capture.
pub const PROFILE_ANIMATION_SETUP: [u8; 64] = [
    0x04, 0x3d, 0x00, 0x05, 0x38, 0x00, 0x00, 0x00, 0x14, 0x03, 0x02, 0x00,
    0x01, 0xff, 0xff, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x06, 0x03, 0x02, 0x00, 0xff, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
];

/// Primary per-zone colour table (sequence base `0x73`).
///
/// Bytes 11..=25 are five `0xff, 0xff, 0x00` triplets, one per LED zone.
pub const PROFILE_ZONE_PRIMARY: [u8; 64] = [
    0x04, 0x73, 0x0a, 0x11, 0x36, 0x36, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff,
    0xff, 0x00, 0xff, 0xff, 0x00, 0xff, 0xff, 0x00, 0xff, 0xff, 0x00, 0xff,
    0xff, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
];

/// Secondary per-zone colour table (sequence base `0xb0`), single-channel
/// accents at bytes 11, 18 and 59.
pub const PROFILE_ZONE_SECONDARY: [u8; 64] = [
    0x04, 0xb0, 0x03, 0x11, 0x36, 0x6c, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff,
    0x00, 0x00, 0x00, 0x00,
];

/// Tertiary zone colour prefix (sequence base `0xe7`), two accent channels.
pub const PROFILE_ZONE_TERTIARY: [u8; 12] =
    [0x04, 0xe7, 0x02, 0x11, 0x36, 0xa2, 0x00, 0x00, 0xff, 0x00, 0x00, 0xff];

/// Key-remap table written by the final profile step (sequence base `0xe2`).
///
/// Bytes 8..=17 are the fixed remap preamble (`0x55, 0xaa` marker plus
/// firmware constants), byte 18 is the profile index and bytes 24..=42 the
/// scan-code order table.
pub const KEY_REMAP: [u8; 64] = [
    0x04, 0xe2, 0x03, 0x04, 0x2c, 0x00, 0x00, 0x00, 0x55, 0xaa, 0xff, 0x02,
    0x45, 0x0c, 0x2f, 0x65, 0x05, 0x01, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00,
    0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x08, 0x07, 0x09, 0x0b, 0x0a, 0x0c,
    0x0d, 0x0e, 0x0f, 0x10, 0x11, 0x12, 0x14, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
];

/// Offset of the per-frame sequence byte.
pub const SEQ_OFFSET: usize = 1;

/// Offset of the doubled profile index in the zone colour frames.
pub const ZONE_PROFILE_OFFSET: usize = 6;

/// Offset of the raw profile index inside [`KEY_REMAP`].
pub const REMAP_PROFILE_OFFSET: usize = 18;
