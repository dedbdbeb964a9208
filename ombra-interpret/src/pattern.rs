//! Patterns: the shading envelope and the tiling envelope.

use crate::EventSink;
use crate::ir::PatternIr;
use crate::shading::parse_shading;
use crate::util::normalize_rect;
use kurbo::Affine;
use ombra_syntax::object::dict::keys::{
    BBOX, MATRIX, PAINT_TYPE, PATTERN_TYPE, SHADING, TILING_TYPE, X_STEP, Y_STEP,
};
use ombra_syntax::object::{Dict, Object, Stream, dict_or_stream};
use ombra_syntax::xref::XRef;
use ombra_syntax::{Error, Result};

/// A pattern object.
#[derive(Debug)]
pub enum Pattern {
    /// A pattern filling its region with a shading.
    Shading(ShadingPattern),
    /// A pattern tiling its region with a small content cell.
    Tiling(TilingPattern),
}

impl Pattern {
    /// Parse a pattern object, dispatching on `/PatternType`.
    ///
    /// Tiling validation failures propagate as format errors; shading
    /// problems are deferred to [`Pattern::into_ir`], where they degrade
    /// to a placeholder.
    pub fn parse(obj: &Object, xref: &XRef) -> Result<Pattern> {
        let obj = xref.resolve(obj);
        let (dict, stream) = dict_or_stream(obj)
            .ok_or_else(|| Error::Format("pattern is neither a dictionary nor a stream".into()))?;

        match dict.get::<u8>(PATTERN_TYPE, xref) {
            Some(2) => Ok(Pattern::Shading(ShadingPattern::parse(dict, xref)?)),
            Some(1) => {
                let stream = stream
                    .ok_or_else(|| Error::Format("tiling pattern is not a stream".into()))?;

                Ok(Pattern::Tiling(TilingPattern::parse(stream, xref)?))
            }
            t => Err(Error::Format(format!("invalid pattern type {t:?}"))),
        }
    }

    /// Decode the pattern into its IR.
    pub fn into_ir(self, xref: &XRef, sink: &mut dyn EventSink) -> Result<PatternIr> {
        match self {
            Pattern::Shading(pattern) => {
                parse_shading(&pattern.shading, pattern.matrix, xref, sink)
            }
            Pattern::Tiling(pattern) => Ok(pattern.into_ir(None)),
        }
    }
}

/// A pattern filling a region with a shading.
#[derive(Debug)]
pub struct ShadingPattern {
    shading: Object,
    matrix: Option<[f32; 6]>,
}

impl ShadingPattern {
    fn parse(dict: &Dict, xref: &XRef) -> Result<Self> {
        let shading = dict
            .get_raw(SHADING)
            .cloned()
            .ok_or_else(|| Error::Format("shading pattern without /Shading".into()))?;
        let matrix = dict.get::<[f32; 6]>(MATRIX, xref);

        Ok(Self { shading, matrix })
    }

    /// Combine the pattern matrix with an outer transform.
    pub fn pre_concat_transform(&mut self, transform: Affine) {
        self.matrix = Some(concat(transform, self.matrix));
    }
}

/// A pattern tiling a region with a small content cell.
#[derive(Debug)]
pub struct TilingPattern {
    bbox: [f32; 4],
    x_step: f32,
    y_step: f32,
    paint_type: u8,
    tiling_type: u8,
    matrix: Option<[f32; 6]>,
    content: Vec<u8>,
}

impl TilingPattern {
    fn parse(stream: &Stream, xref: &XRef) -> Result<Self> {
        let dict = stream.dict();

        let bbox = dict
            .get::<[f32; 4]>(BBOX, xref)
            .map(normalize_rect)
            .ok_or_else(|| Error::Format("invalid tiling pattern /BBox".into()))?;
        if bbox[2] - bbox[0] == 0.0 || bbox[3] - bbox[1] == 0.0 {
            return Err(Error::Format(
                "tiling pattern with an empty bounding box".into(),
            ));
        }

        let x_step = dict
            .get::<f32>(X_STEP, xref)
            .ok_or_else(|| Error::Format("tiling pattern without /XStep".into()))?;
        let y_step = dict
            .get::<f32>(Y_STEP, xref)
            .ok_or_else(|| Error::Format("tiling pattern without /YStep".into()))?;
        if x_step == 0.0 || y_step == 0.0 || !x_step.is_finite() || !y_step.is_finite() {
            return Err(Error::Format("tiling pattern with a zero step".into()));
        }

        let paint_type = dict.get::<u8>(PAINT_TYPE, xref).unwrap_or(1);
        let tiling_type = dict.get::<u8>(TILING_TYPE, xref).unwrap_or(1);
        let matrix = dict.get::<[f32; 6]>(MATRIX, xref);

        Ok(Self {
            bbox,
            x_step,
            y_step,
            paint_type,
            tiling_type,
            matrix,
            content: stream.data().to_vec(),
        })
    }

    /// Combine the pattern matrix with an outer transform.
    pub fn pre_concat_transform(&mut self, transform: Affine) {
        self.matrix = Some(concat(transform, self.matrix));
    }

    /// The tiling IR; `color` is the current fill color for uncolored
    /// patterns.
    pub fn into_ir(self, color: Option<[u8; 3]>) -> PatternIr {
        PatternIr::Tiling {
            color,
            content: self.content,
            matrix: self.matrix,
            bbox: self.bbox,
            x_step: self.x_step,
            y_step: self.y_step,
            paint_type: self.paint_type,
            tiling_type: self.tiling_type,
        }
    }
}

fn concat(transform: Affine, matrix: Option<[f32; 6]>) -> [f32; 6] {
    let own = matrix
        .map(|m| Affine::new(m.map(f64::from)))
        .unwrap_or_default();

    (transform * own).as_coeffs().map(|c| c as f32)
}
