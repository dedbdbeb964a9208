use crate::function::{Clamper, Function, TupleVec, Values, interpolate, tuples};
use crate::object::Dict;
use crate::object::dict::keys::{BOUNDS, ENCODE, FUNCTIONS};
use crate::xref::XRef;

/// A type 3 function (stitching function).
#[derive(Debug, Clone)]
pub struct Type3 {
    functions: Vec<Function>,
    bounds: Vec<f32>,
    encode: TupleVec,
    clamper: Clamper,
}

impl Type3 {
    /// Create a new type 3 function.
    pub(crate) fn new(dict: &Dict, xref: &XRef) -> Option<Self> {
        let clamper = Clamper::new(dict, xref)?;

        let functions = dict
            .get_array(FUNCTIONS, xref)?
            .iter()
            .map(|o| Function::new(o, xref))
            .collect::<Option<Vec<_>>>()?;

        let domain = *clamper.domain.first()?;
        let mut bounds = vec![domain.0 - 0.0001];
        if let Some(declared) = dict.get::<Vec<f32>>(BOUNDS, xref) {
            bounds.extend(declared);
        }
        // A small delta so that the interval is considered closed on the right.
        bounds.push(domain.1 + 0.0001);

        let encode = tuples(dict.get::<Vec<f32>>(ENCODE, xref)?);

        Some(Self {
            functions,
            clamper,
            bounds,
            encode,
        })
    }

    /// Evaluate the function with the given input.
    pub(crate) fn eval(&self, input: f32) -> Option<Values> {
        let mut input = [input];
        self.clamper.clamp_input(&mut input);

        let index = find_interval(&self.bounds, input[0])?;

        let bound_hi = *self.bounds.get(index + 1)?;
        let bound_lo = *self.bounds.get(index)?;

        let encoding = self.encode.get(index)?;
        let function = self.functions.get(index)?;
        let encoded = interpolate(input[0], bound_lo, bound_hi, encoding.0, encoding.1);

        let mut evaluated = function.eval(encoded)?;

        self.clamper.clamp_output(&mut evaluated);

        Some(evaluated)
    }
}

fn find_interval(bounds: &[f32], x: f32) -> Option<usize> {
    if x < *bounds.first()? || x >= *bounds.last()? {
        return None;
    }

    match bounds.binary_search_by(|val| {
        if *val <= x {
            std::cmp::Ordering::Less
        } else {
            std::cmp::Ordering::Greater
        }
    }) {
        Ok(i) => Some(i - 1),
        Err(i) => Some(i - 1),
    }
}

#[cfg(test)]
mod tests {
    use crate::function::Function;
    use crate::object::Object;
    use crate::xref::XRef;

    #[test]
    fn simple() {
        let data = b"<<
  /FunctionType 3
  /Domain [-7 7]
  /Functions [
    << /FunctionType 2
       /Domain [0 1]
       /C0 [0.5 0.5 0.5]
       /C1 [0.5 0.5 0.5]
       /N 1
    >>
    << /FunctionType 2
       /Domain [0 1]
       /C0 [0.7 0.7 0.7]
       /C1 [0.7 0.7 0.7]
       /N 1
    >>
  ]
  /Bounds [0]
  /Encode [0 1 0 1]
>>";

        let obj = Object::from_bytes(data).unwrap();
        let function = Function::new(&obj, &XRef::empty()).unwrap();

        assert_eq!(
            function.eval(-7.0).unwrap().as_slice(),
            &[0.5, 0.5, 0.5]
        );
        assert_eq!(
            function.eval(-0.5).unwrap().as_slice(),
            &[0.5, 0.5, 0.5]
        );
        assert_eq!(function.eval(0.0).unwrap().as_slice(), &[0.7, 0.7, 0.7]);
        assert_eq!(function.eval(7.0).unwrap().as_slice(), &[0.7, 0.7, 0.7]);
    }
}
