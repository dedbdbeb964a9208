use crate::function::{Clamper, Values};
use crate::object::Dict;
use crate::object::dict::keys::{C0, C1, N};
use crate::xref::XRef;
use smallvec::{SmallVec, smallvec};

/// A type 2 function (exponential interpolation function).
#[derive(Debug, Clone)]
pub struct Type2 {
    c0: Values,
    c1: Values,
    clamper: Clamper,
    n: f32,
}

impl Type2 {
    /// Create a new type 2 function.
    pub(crate) fn new(dict: &Dict, xref: &XRef) -> Option<Self> {
        let c0 = dict
            .get::<Vec<f32>>(C0, xref)
            .map(Values::from_vec)
            .unwrap_or(smallvec![0.0]);
        let c1 = dict
            .get::<Vec<f32>>(C1, xref)
            .map(Values::from_vec)
            .unwrap_or(smallvec![1.0]);
        let clamper = Clamper::new(dict, xref)?;
        let n = dict.get::<f32>(N, xref)?;

        Some(Self { c0, c1, clamper, n })
    }

    /// Evaluate the function with the given input.
    pub(crate) fn eval(&self, input: f32) -> Values {
        let mut input = [input];
        self.clamper.clamp_input(&mut input);

        let mut out = self
            .c0
            .iter()
            .zip(self.c1.iter())
            .map(|(c0, c1)| *c0 + input[0].powf(self.n) * (*c1 - *c0))
            .collect::<SmallVec<_>>();

        self.clamper.clamp_output(&mut out);

        out
    }
}
