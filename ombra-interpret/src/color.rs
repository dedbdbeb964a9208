//! Color spaces for shading color values.

use crate::util::OptionLog;
use log::warn;
use ombra_syntax::object::dict::keys::{ALTERNATE, N};
use ombra_syntax::object::{Name, Object};
use ombra_syntax::xref::XRef;

/// A color space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Single-component gray.
    DeviceGray,
    /// Three-component RGB.
    DeviceRgb,
    /// Four-component CMYK.
    DeviceCmyk,
}

impl ColorSpace {
    /// Parse a color space, falling back to gray for unsupported spaces.
    pub fn parse(obj: &Object, xref: &XRef) -> ColorSpace {
        Self::parse_inner(obj, xref)
            .warn_none("unsupported color space, falling back to gray")
            .unwrap_or(ColorSpace::DeviceGray)
    }

    fn parse_inner(obj: &Object, xref: &XRef) -> Option<ColorSpace> {
        match xref.resolve(obj) {
            Object::Name(name) => Self::from_name(name),
            Object::Array(items) => {
                let name = xref.resolve(items.first()?).cast::<Name>()?;

                match name.as_bytes() {
                    b"ICCBased" => {
                        let stream = xref.resolve(items.get(1)?).as_stream()?;
                        let dict = stream.dict();

                        if let Some(alternate) = dict.get_raw(ALTERNATE) {
                            return Self::parse_inner(alternate, xref);
                        }

                        match dict.get::<u8>(N, xref) {
                            Some(1) => Some(ColorSpace::DeviceGray),
                            Some(3) => Some(ColorSpace::DeviceRgb),
                            Some(4) => Some(ColorSpace::DeviceCmyk),
                            _ => None,
                        }
                    }
                    b"CalGray" => Some(ColorSpace::DeviceGray),
                    b"CalRGB" => Some(ColorSpace::DeviceRgb),
                    b"CalCMYK" => Some(ColorSpace::DeviceCmyk),
                    _ => {
                        warn!("unsupported color space: {name}");

                        None
                    }
                }
            }
            _ => None,
        }
    }

    fn from_name(name: &Name) -> Option<ColorSpace> {
        match name.as_bytes() {
            b"DeviceGray" | b"G" | b"CalGray" => Some(ColorSpace::DeviceGray),
            b"DeviceRGB" | b"RGB" | b"CalRGB" => Some(ColorSpace::DeviceRgb),
            b"DeviceCMYK" | b"CMYK" => Some(ColorSpace::DeviceCmyk),
            _ => None,
        }
    }

    /// The number of components of a color value in this space.
    pub fn num_comps(&self) -> usize {
        match self {
            ColorSpace::DeviceGray => 1,
            ColorSpace::DeviceRgb => 3,
            ColorSpace::DeviceCmyk => 4,
        }
    }

    /// Convert a color value to 8-bit sRGB.
    ///
    /// Missing components read as zero. Channels are clamped to `[0, 1]`
    /// and rounded half-to-even, matching the clamped-array semantics of
    /// common rasterizers.
    pub fn to_rgb8(&self, comps: &[f32]) -> [u8; 3] {
        let at = |i: usize| comps.get(i).copied().unwrap_or(0.0);

        match self {
            ColorSpace::DeviceGray => {
                let g = byte(at(0));

                [g, g, g]
            }
            ColorSpace::DeviceRgb => [byte(at(0)), byte(at(1)), byte(at(2))],
            ColorSpace::DeviceCmyk => {
                let (c, m, y, k) = (at(0), at(1), at(2), at(3));

                [
                    byte((1.0 - c) * (1.0 - k)),
                    byte((1.0 - m) * (1.0 - k)),
                    byte((1.0 - y) * (1.0 - k)),
                ]
            }
        }
    }
}

fn byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round_ties_even() as u8
}
