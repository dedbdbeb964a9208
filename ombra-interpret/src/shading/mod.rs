//! Shading dictionaries and their dispatch to the decoders.

pub(crate) mod gradient;
pub(crate) mod mesh;
pub(crate) mod tessellate;

use crate::color::ColorSpace;
use crate::ir::PatternIr;
use crate::util::normalize_rect;
use crate::{Event, EventSink, Feature};
use log::warn;
use ombra_syntax::function::{Function, Values};
use ombra_syntax::object::dict::keys::{BBOX, COLORSPACE, CS, SHADING_TYPE};
use ombra_syntax::object::{Dict, Object, dict_or_stream};
use ombra_syntax::xref::XRef;
use ombra_syntax::{Error, Result};
use smallvec::{SmallVec, smallvec};

/// The color function of a shading: either one function producing all
/// components, or one single-output function per component.
#[derive(Debug, Clone)]
pub struct ShadingFunction(SmallVec<[Function; 1]>);

impl ShadingFunction {
    /// Create the evaluator from a shading dictionary's function entry.
    pub fn new(obj: &Object, xref: &XRef) -> Option<ShadingFunction> {
        match xref.resolve(obj) {
            Object::Array(items) => {
                let functions = items
                    .iter()
                    .map(|o| Function::new(o, xref))
                    .collect::<Option<SmallVec<_>>>()?;

                if functions.is_empty() {
                    return None;
                }

                Some(ShadingFunction(functions))
            }
            obj => Some(ShadingFunction(smallvec![Function::new(obj, xref)?])),
        }
    }

    /// Evaluate at `t`, concatenating the outputs of all functions.
    pub fn eval(&self, t: f32) -> Option<Values> {
        let mut out = Values::new();
        for function in &self.0 {
            out.extend(function.eval(t)?);
        }

        Some(out)
    }
}

/// Read the normalized bounding box of a shading, if it declares one.
fn shading_bbox(dict: &Dict, xref: &XRef) -> Option<[f32; 4]> {
    dict.get::<[f32; 4]>(BBOX, xref).map(normalize_rect)
}

/// Parse the color space entry; `/CS` is accepted as an abbreviation.
fn shading_color_space(dict: &Dict, xref: &XRef) -> Result<ColorSpace> {
    let obj = dict
        .get_raw(CS)
        .or_else(|| dict.get_raw(COLORSPACE))
        .ok_or_else(|| Error::Format("shading is missing a color space".into()))?;

    Ok(ColorSpace::parse(obj, xref))
}

/// Decode a shading object into its IR.
///
/// Malformed shadings degrade to [`PatternIr::Dummy`]: the failure is
/// reported through `sink` and logged, and the caller can carry on.
/// [`Error::MissingData`] propagates unchanged so the caller can retry the
/// parse once more bytes are available, as do internal invariant failures.
pub fn parse_shading(
    shading: &Object,
    matrix: Option<[f32; 6]>,
    xref: &XRef,
    sink: &mut dyn EventSink,
) -> Result<PatternIr> {
    match parse_shading_inner(shading, matrix, xref) {
        Ok(ir) => Ok(ir),
        Err(e @ (Error::MissingData | Error::Internal(_))) => Err(e),
        Err(e) => {
            sink.send(Event::UnsupportedFeature(Feature::ShadingPattern));
            warn!("failed to decode shading: {e}");

            Ok(PatternIr::Dummy)
        }
    }
}

fn parse_shading_inner(
    shading: &Object,
    matrix: Option<[f32; 6]>,
    xref: &XRef,
) -> Result<PatternIr> {
    let shading = xref.resolve(shading);
    let (dict, stream) = dict_or_stream(shading)
        .ok_or_else(|| Error::Format("shading is neither a dictionary nor a stream".into()))?;

    let shading_type = dict
        .get::<u8>(SHADING_TYPE, xref)
        .ok_or_else(|| Error::Format("shading has no ShadingType".into()))?;

    match shading_type {
        2 | 3 => gradient::RadialAxial::parse(dict, shading_type, matrix, xref)
            .map(gradient::RadialAxial::into_ir),
        4..=7 => {
            let stream = stream
                .ok_or_else(|| Error::Format("mesh shading data is not a stream".into()))?;

            mesh::Mesh::parse(stream, shading_type, matrix, xref)?.into_ir()
        }
        t => Err(Error::Format(format!("unsupported shading type {t}"))),
    }
}
