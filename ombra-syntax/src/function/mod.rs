//! Evaluation of numeric domain-to-range functions.
//!
//! The shading decoders treat functions as black-box evaluators mapping a
//! single parametric input to a tuple of color components.

mod type0;
mod type2;
mod type3;

use crate::object::dict::keys::{DOMAIN, FUNCTION_TYPE, RANGE};
use crate::object::{Dict, Object, dict_or_stream};
use crate::xref::XRef;
use log::warn;
use smallvec::SmallVec;

/// The values produced by a function evaluation.
pub type Values = SmallVec<[f32; 4]>;

pub(crate) type TupleVec = SmallVec<[(f32, f32); 4]>;

/// Linearly map `x` from `[x_min, x_max]` to `[y_min, y_max]`.
pub fn interpolate(x: f32, x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> f32 {
    y_min + (x - x_min) * ((y_max - y_min) / (x_max - x_min))
}

pub(crate) fn tuples(values: Vec<f32>) -> TupleVec {
    values.chunks_exact(2).map(|c| (c[0], c[1])).collect()
}

/// Clamps inputs and outputs to the declared domain and range.
#[derive(Debug, Clone)]
pub(crate) struct Clamper {
    pub(crate) domain: TupleVec,
    pub(crate) range: Option<TupleVec>,
}

impl Clamper {
    pub(crate) fn new(dict: &Dict, xref: &XRef) -> Option<Self> {
        let domain = tuples(dict.get::<Vec<f32>>(DOMAIN, xref)?);
        let range = dict.get::<Vec<f32>>(RANGE, xref).map(tuples);

        Some(Self { domain, range })
    }

    pub(crate) fn clamp_input(&self, input: &mut [f32]) {
        for (val, (min, max)) in input.iter_mut().zip(self.domain.iter()) {
            *val = val.clamp(*min, *max);
        }
    }

    pub(crate) fn clamp_output(&self, output: &mut [f32]) {
        if let Some(range) = &self.range {
            for (val, (min, max)) in output.iter_mut().zip(range.iter()) {
                *val = val.clamp(*min, *max);
            }
        }
    }
}

/// A function object.
#[derive(Debug, Clone)]
pub enum Function {
    /// A type 0 (sampled) function.
    Sampled(type0::Type0),
    /// A type 2 (exponential interpolation) function.
    Exponential(type2::Type2),
    /// A type 3 (stitching) function.
    Stitching(type3::Type3),
}

impl Function {
    /// Create a new function from the given object.
    pub fn new(obj: &Object, xref: &XRef) -> Option<Function> {
        let obj = xref.resolve(obj);
        let (dict, stream) = dict_or_stream(obj)?;

        match dict.get::<u8>(FUNCTION_TYPE, xref)? {
            0 => Some(Function::Sampled(type0::Type0::new(stream?, xref)?)),
            2 => Some(Function::Exponential(type2::Type2::new(dict, xref)?)),
            3 => Some(Function::Stitching(type3::Type3::new(dict, xref)?)),
            t => {
                warn!("unsupported function type {t}");

                None
            }
        }
    }

    /// Evaluate the function for a single input value.
    pub fn eval(&self, input: f32) -> Option<Values> {
        match self {
            Function::Sampled(f) => f.eval(input),
            Function::Exponential(f) => Some(f.eval(input)),
            Function::Stitching(f) => f.eval(input),
        }
    }
}
