use crate::bit::{BitReader, BitSize};
use crate::data::SliceSource;
use crate::function::{Clamper, TupleVec, Values, interpolate, tuples};
use crate::object::Stream;
use crate::object::dict::keys::{BITS_PER_SAMPLE, DECODE, ENCODE, SIZE};
use crate::xref::XRef;
use log::warn;
use smallvec::smallvec;

/// A type 0 (sampled) function, restricted to a single input dimension,
/// which is the only shape the shading decoders produce.
#[derive(Debug, Clone)]
pub struct Type0 {
    samples: Vec<u32>,
    size: u32,
    n_out: usize,
    bits_per_sample: u8,
    clamper: Clamper,
    encode: (f32, f32),
    decode: TupleVec,
}

impl Type0 {
    /// Create a new type 0 function from its stream.
    pub(crate) fn new(stream: &Stream, xref: &XRef) -> Option<Self> {
        let dict = stream.dict();
        let clamper = Clamper::new(dict, xref)?;
        let range = clamper.range.clone()?;

        let bits_per_sample = dict.get::<u8>(BITS_PER_SAMPLE, xref)?;
        if !matches!(bits_per_sample, 1 | 2 | 4 | 8 | 12 | 16 | 24 | 32) {
            warn!("unsupported bits per sample: {bits_per_sample}");

            return None;
        }

        let sizes = dict.get::<Vec<u32>>(SIZE, xref)?;
        if sizes.len() != 1 {
            warn!("sampled functions with more than one input are not supported");

            return None;
        }
        let size = sizes[0];
        if size == 0 {
            return None;
        }

        let encode = dict
            .get::<Vec<f32>>(ENCODE, xref)
            .and_then(|v| tuples(v).first().copied())
            .unwrap_or((0.0, size as f32 - 1.0));
        let decode = dict
            .get::<Vec<f32>>(DECODE, xref)
            .map(tuples)
            .unwrap_or_else(|| range.clone());

        let n_out = range.len();
        let bit_size = BitSize::from_u8(bits_per_sample)?;
        let mut reader = BitReader::new(SliceSource::new(stream.data()));
        let mut samples = Vec::with_capacity(size as usize * n_out);
        for _ in 0..size as usize * n_out {
            samples.push(reader.read(bit_size).ok()?);
        }

        Some(Self {
            samples,
            size,
            n_out,
            bits_per_sample,
            clamper,
            encode,
            decode,
        })
    }

    /// Evaluate the function with the given input.
    pub(crate) fn eval(&self, input: f32) -> Option<Values> {
        let mut input = [input];
        self.clamper.clamp_input(&mut input);

        let domain = self.clamper.domain.first().copied()?;
        let encoded = interpolate(input[0], domain.0, domain.1, self.encode.0, self.encode.1)
            .clamp(0.0, self.size as f32 - 1.0);

        let lo = encoded.floor() as usize;
        let hi = (lo + 1).min(self.size as usize - 1);
        let frac = encoded - lo as f32;
        let sample_max = (2u64.pow(self.bits_per_sample as u32) - 1) as f32;

        let mut out: Values = smallvec![];
        for i in 0..self.n_out {
            let s0 = *self.samples.get(lo * self.n_out + i)? as f32;
            let s1 = *self.samples.get(hi * self.n_out + i)? as f32;
            let sample = s0 + (s1 - s0) * frac;

            let (d0, d1) = *self.decode.get(i)?;
            out.push(interpolate(sample, 0.0, sample_max, d0, d1));
        }

        self.clamper.clamp_output(&mut out);

        Some(out)
    }
}
