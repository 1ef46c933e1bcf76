//! Channel ids, colors and scalar conversions.
//!
//! A packed pixel is a `u32` holding four 8-bit channels, from most to
//! least significant: alpha, red, green, blue.
//!
//! ```text
//!  31      24 23      16 15       8 7        0
//! +----------+----------+----------+----------+
//! |  alpha   |   red    |  green   |   blue   |
//! +----------+----------+----------+----------+
//! ```
//!
//! The channel id doubles as the byte index: channel `c` lives at bit
//! offset `c * 8`.

use crate::{Error, Result};
use std::fmt;

/// ITU-R BT.601 luma weight for red.
pub const BT601_LUMA_R: f64 = 0.299;
/// ITU-R BT.601 luma weight for green.
pub const BT601_LUMA_G: f64 = 0.587;
/// ITU-R BT.601 luma weight for blue.
pub const BT601_LUMA_B: f64 = 0.114;

/// Packed value of an opaque white pixel.
pub const OPAQUE_WHITE: u32 = 0xFFFF_FFFF;

/// One component of a packed pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Channel {
    /// Blue, bits 0..8.
    Blue = 0,
    /// Green, bits 8..16.
    Green = 1,
    /// Red, bits 16..24.
    Red = 2,
    /// Alpha, bits 24..32.
    Alpha = 3,
}

impl Channel {
    /// The three color channels in id order.
    pub const COLOR: [Channel; 3] = [Channel::Blue, Channel::Green, Channel::Red];

    /// All four channels in id order.
    pub const ALL: [Channel; 4] = [
        Channel::Blue,
        Channel::Green,
        Channel::Red,
        Channel::Alpha,
    ];

    /// Returns the raw channel id (0..=3).
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Returns the bit offset of this channel inside a packed pixel.
    #[inline]
    pub const fn shift(self) -> u32 {
        self as u32 * 8
    }

    /// Returns the bit mask selecting this channel inside a packed pixel.
    #[inline]
    pub const fn mask(self) -> u32 {
        0xFF << self.shift()
    }

    /// Returns `true` for red, green and blue.
    #[inline]
    pub const fn is_color(self) -> bool {
        !matches!(self, Channel::Alpha)
    }

    /// Extracts this channel from a packed pixel.
    #[inline]
    pub const fn extract(self, packed: u32) -> u8 {
        ((packed >> self.shift()) & 0xFF) as u8
    }

    /// Returns `packed` with this channel replaced by `value`.
    #[inline]
    pub const fn inject(self, packed: u32, value: u8) -> u32 {
        (packed & !self.mask()) | ((value as u32) << self.shift())
    }
}

impl TryFrom<u8> for Channel {
    type Error = Error;

    fn try_from(id: u8) -> Result<Self> {
        match id {
            0 => Ok(Channel::Blue),
            1 => Ok(Channel::Green),
            2 => Ok(Channel::Red),
            3 => Ok(Channel::Alpha),
            _ => Err(Error::invalid_channel(id, "channel id")),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Blue => "blue",
            Channel::Green => "green",
            Channel::Red => "red",
            Channel::Alpha => "alpha",
        };
        f.write_str(name)
    }
}

/// An 8-bit RGBA color.
///
/// # Example
///
/// ```rust
/// use pixtools_core::Rgba;
///
/// let c = Rgba::new(0x12, 0x34, 0x56, 0x78);
/// assert_eq!(c.to_packed(), 0x7812_3456);
/// assert_eq!(Rgba::from_packed(0x7812_3456), c);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
    /// Red component
    pub r: u8,
    /// Green component
    pub g: u8,
    /// Blue component
    pub b: u8,
    /// Alpha component (255 = opaque)
    pub a: u8,
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    /// Opaque black.
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);

    /// Creates a color from its four components.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Packs the color as `alpha << 24 | red << 16 | green << 8 | blue`.
    #[inline]
    pub const fn to_packed(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Unpacks a packed pixel.
    #[inline]
    pub const fn from_packed(packed: u32) -> Self {
        Self {
            r: Channel::Red.extract(packed),
            g: Channel::Green.extract(packed),
            b: Channel::Blue.extract(packed),
            a: Channel::Alpha.extract(packed),
        }
    }
}

impl From<u32> for Rgba {
    fn from(packed: u32) -> Self {
        Rgba::from_packed(packed)
    }
}

impl From<Rgba> for u32 {
    fn from(c: Rgba) -> Self {
        c.to_packed()
    }
}

/// Maps an 8-bit channel value to `[0.0, 1.0]`.
#[inline]
pub fn channel_to_unit(value: u8) -> f32 {
    value as f32 / 255.0
}

/// Maps an 8-bit channel value to `[0.0, 1.0]` in double precision.
#[inline]
pub fn channel_to_unit_f64(value: u8) -> f64 {
    value as f64 / 255.0
}

/// Maps a unit value back to 8 bits.
///
/// The value is scaled by 255, rounded to nearest and clamped to
/// `[0, 255]`, so overshooting filter output can never spill into a
/// neighbouring channel. NaN maps to 0.
///
/// ```rust
/// use pixtools_core::unit_to_channel;
///
/// assert_eq!(unit_to_channel(1.0), 255);
/// assert_eq!(unit_to_channel(1.7), 255);
/// assert_eq!(unit_to_channel(-0.3), 0);
/// assert_eq!(unit_to_channel(0.5), 128);
/// ```
#[inline]
pub fn unit_to_channel(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Returns the BT.601 luma of a unit RGB triple.
#[inline]
pub fn luma(r: f64, g: f64, b: f64) -> f64 {
    BT601_LUMA_R * r + BT601_LUMA_G * g + BT601_LUMA_B * b
}

/// Single-precision [`luma`], used on the packed-image path.
#[inline]
pub fn luma_f32(r: f32, g: f32, b: f32) -> f32 {
    0.299 * r + 0.587 * g + 0.114 * b
}
