//! Axial and radial gradients, sampled into color stops.

use super::{ShadingFunction, shading_bbox, shading_color_space};
use crate::ir::{ColorStop, GradientKind, PatternIr};
use crate::util::make_hex_color;
use log::{info, warn};
use ombra_syntax::object::Dict;
use ombra_syntax::object::dict::keys::{BACKGROUND, COORDS, DOMAIN, EXTEND, FUNCTION};
use ombra_syntax::xref::XRef;
use ombra_syntax::{Error, Result};

/// Number of equidistant function samples per gradient.
const SAMPLE_COUNT: usize = 10;

/// Offset nudge keeping synthetic background stops strictly ordered.
const SMALL_NUMBER: f32 = 1e-6;

pub(crate) struct RadialAxial {
    kind: GradientKind,
    bbox: Option<[f32; 4]>,
    coords: [f32; 6],
    stops: Vec<ColorStop>,
    matrix: Option<[f32; 6]>,
}

impl RadialAxial {
    pub(crate) fn parse(
        dict: &Dict,
        shading_type: u8,
        matrix: Option<[f32; 6]>,
        xref: &XRef,
    ) -> Result<Self> {
        let kind = if shading_type == 2 {
            GradientKind::Axial
        } else {
            GradientKind::Radial
        };
        let bbox = shading_bbox(dict, xref);
        let color_space = shading_color_space(dict, xref)?;

        let coords = if kind == GradientKind::Axial {
            let read = dict
                .get::<[f32; 4]>(COORDS, xref)
                .ok_or_else(|| Error::Format("invalid axial gradient coordinates".into()))?;

            [read[0], read[1], read[2], read[3], 0.0, 0.0]
        } else {
            dict.get::<[f32; 6]>(COORDS, xref)
                .ok_or_else(|| Error::Format("invalid radial gradient coordinates".into()))?
        };

        let [t0, t1] = dict.get::<[f32; 2]>(DOMAIN, xref).unwrap_or([0.0, 1.0]);
        let [extend_start, extend_end] =
            dict.get::<[bool; 2]>(EXTEND, xref).unwrap_or([false, false]);

        // The decoder renders best-effort when neither circle contains the
        // other, so only diagnose.
        if kind == GradientKind::Radial && (!extend_start || !extend_end) {
            let [x1, y1, r1, x2, y2, r2] = coords;
            let distance = (x1 - x2).hypot(y1 - y2);

            if r1 <= r2 + distance && r2 <= r1 + distance {
                warn!("Unsupported radial gradient.");
            }
        }

        let function = dict
            .get_raw(FUNCTION)
            .and_then(|obj| ShadingFunction::new(obj, xref))
            .ok_or_else(|| Error::Format("invalid gradient function".into()))?;

        let mut stops = Vec::new();
        let step = (t1 - t0) / SAMPLE_COUNT as f32;

        if t0 >= t1 || step <= 0.0 {
            info!("Bad shading domain.");
        } else {
            for i in 0..=SAMPLE_COUNT {
                let t = t0 + i as f32 * step;
                let values = function.eval(t).ok_or_else(|| {
                    Error::Format("gradient function evaluation failed".into())
                })?;

                stops.push(ColorStop {
                    offset: i as f32 / SAMPLE_COUNT as f32,
                    color: make_hex_color(color_space.to_rgb8(&values)),
                });
            }

            let mut background = String::from("transparent");
            if let Some(comps) = dict.get::<Vec<f32>>(BACKGROUND, xref) {
                background = make_hex_color(color_space.to_rgb8(&comps));
            }

            if !extend_start {
                stops.insert(
                    0,
                    ColorStop {
                        offset: 0.0,
                        color: background.clone(),
                    },
                );
                stops[1].offset += SMALL_NUMBER;
            }

            if !extend_end {
                if let Some(last) = stops.last_mut() {
                    last.offset -= SMALL_NUMBER;
                }
                stops.push(ColorStop {
                    offset: 1.0,
                    color: background,
                });
            }
        }

        Ok(Self {
            kind,
            bbox,
            coords,
            stops,
            matrix,
        })
    }

    pub(crate) fn into_ir(self) -> PatternIr {
        let c = self.coords;
        let (p0, p1, r0, r1) = match self.kind {
            GradientKind::Axial => ([c[0], c[1]], [c[2], c[3]], None, None),
            GradientKind::Radial => ([c[0], c[1]], [c[3], c[4]], Some(c[2]), Some(c[5])),
        };

        PatternIr::RadialAxial {
            kind: self.kind,
            bbox: self.bbox,
            stops: self.stops,
            p0,
            p1,
            r0,
            r1,
            matrix: self.matrix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ombra_syntax::object::Object;

    fn parse_ir(data: &[u8]) -> PatternIr {
        let obj = Object::from_bytes(data).unwrap();
        let dict = obj.as_dict().unwrap();
        let shading_type = dict.get::<u8>(b"ShadingType", &XRef::empty()).unwrap();

        RadialAxial::parse(dict, shading_type, None, &XRef::empty())
            .unwrap()
            .into_ir()
    }

    #[test]
    fn gray_ramp_stops() {
        let ir = parse_ir(
            b"<< /ShadingType 2
                 /ColorSpace /DeviceGray
                 /Coords [0 0 1 0]
                 /Function << /FunctionType 2 /Domain [0 1] /C0 [0] /C1 [1] /N 1 >> >>",
        );

        let PatternIr::RadialAxial {
            kind, stops, p0, p1, r0, ..
        } = ir
        else {
            panic!("expected a gradient");
        };

        assert_eq!(kind, GradientKind::Axial);
        assert_eq!(p0, [0.0, 0.0]);
        assert_eq!(p1, [1.0, 0.0]);
        assert_eq!(r0, None);

        // 11 samples plus one synthetic background stop on each side.
        assert_eq!(stops.len(), 13);

        assert_eq!(stops[0].offset, 0.0);
        assert_eq!(stops[0].color, "transparent");
        assert_eq!(stops[1].offset, SMALL_NUMBER);
        assert_eq!(stops[1].color, "#000000");
        assert_eq!(stops[2].color, "#1a1a1a");
        assert_eq!(stops[10].color, "#e6e6e6");
        assert_eq!(stops[11].offset, 1.0 - SMALL_NUMBER);
        assert_eq!(stops[11].color, "#ffffff");
        assert_eq!(stops[12].offset, 1.0);
        assert_eq!(stops[12].color, "transparent");

        // Offsets never decrease.
        for pair in stops.windows(2) {
            assert!(pair[0].offset <= pair[1].offset);
        }
    }

    #[test]
    fn extends_suppress_synthetic_stops() {
        let ir = parse_ir(
            b"<< /ShadingType 2
                 /ColorSpace /DeviceGray
                 /Coords [0 0 1 0]
                 /Extend [true true]
                 /Function << /FunctionType 2 /Domain [0 1] /C0 [0] /C1 [1] /N 1 >> >>",
        );

        let PatternIr::RadialAxial { stops, .. } = ir else {
            panic!("expected a gradient");
        };

        assert_eq!(stops.len(), 11);
        assert_eq!(stops[0].offset, 0.0);
        assert_eq!(stops[10].offset, 1.0);
    }

    #[test]
    fn background_feeds_synthetic_stops() {
        let ir = parse_ir(
            b"<< /ShadingType 2
                 /ColorSpace /DeviceRGB
                 /Coords [0 0 1 0]
                 /Background [1 0 0]
                 /Function << /FunctionType 2 /Domain [0 1]
                              /C0 [0 0 0] /C1 [1 1 1] /N 1 >> >>",
        );

        let PatternIr::RadialAxial { stops, .. } = ir else {
            panic!("expected a gradient");
        };

        assert_eq!(stops[0].color, "#ff0000");
        assert_eq!(stops[stops.len() - 1].color, "#ff0000");
    }

    #[test]
    fn bad_domain_yields_empty_stops() {
        let ir = parse_ir(
            b"<< /ShadingType 2
                 /ColorSpace /DeviceGray
                 /Coords [0 0 1 0]
                 /Domain [1 0]
                 /Function << /FunctionType 2 /Domain [0 1] /C0 [0] /C1 [1] /N 1 >> >>",
        );

        let PatternIr::RadialAxial { stops, .. } = ir else {
            panic!("expected a gradient");
        };
        assert!(stops.is_empty());
    }

    #[test]
    fn degenerate_radial_still_produces_stops() {
        // Neither circle contains the other; a warning is logged and the
        // gradient is still emitted.
        let ir = parse_ir(
            b"<< /ShadingType 3
                 /ColorSpace /DeviceGray
                 /Coords [0 0 10 20 0 5]
                 /Function << /FunctionType 2 /Domain [0 1] /C0 [0] /C1 [1] /N 1 >> >>",
        );

        let PatternIr::RadialAxial {
            kind, stops, r0, r1, p1, ..
        } = ir
        else {
            panic!("expected a gradient");
        };

        assert_eq!(kind, GradientKind::Radial);
        assert_eq!(stops.len(), 13);
        assert_eq!(r0, Some(10.0));
        assert_eq!(r1, Some(5.0));
        assert_eq!(p1, [20.0, 0.0]);
    }
}
