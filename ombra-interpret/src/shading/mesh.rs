//! Mesh shadings: free-form and lattice triangle meshes, Coons and
//! tensor-product patch meshes.

use super::{ShadingFunction, shading_bbox, shading_color_space, tessellate};
use crate::color::ColorSpace;
use crate::ir::{Figure, PatternIr};
use log::warn;
use ombra_syntax::bit::{BitReader, BitSize};
use ombra_syntax::object::dict::keys::{
    BACKGROUND, BITS_PER_COMPONENT, BITS_PER_COORDINATE, BITS_PER_FLAG, DECODE, FUNCTION,
    VERTICES_PER_ROW,
};
use ombra_syntax::object::stream::StreamSource;
use ombra_syntax::object::{Dict, Stream};
use ombra_syntax::xref::XRef;
use ombra_syntax::{Error, Result};
use smallvec::SmallVec;

/// Scale factor mapping a raw field of `bits` bits into `[0, 1]`.
fn field_scale(bits: u32) -> f64 {
    if bits < 32 {
        1.0 / ((1u64 << bits) - 1) as f64
    } else {
        2.0f64.powi(-32)
    }
}

/// Everything needed to turn raw bit fields into coordinates and colors.
struct DecodeContext {
    bits_per_coordinate: BitSize,
    bits_per_component: BitSize,
    bits_per_flag: Option<BitSize>,
    decode: Vec<f32>,
    color_fn: Option<ShadingFunction>,
    color_space: ColorSpace,
    num_comps: usize,
}

/// Reads vertex records from the packed mesh bitstream.
struct MeshReader<'a> {
    reader: BitReader<StreamSource<'a>>,
    ctx: DecodeContext,
}

impl<'a> MeshReader<'a> {
    fn new(stream: &'a Stream, ctx: DecodeContext) -> Self {
        Self {
            reader: BitReader::new(stream.source()),
            ctx,
        }
    }

    fn has_data(&mut self) -> Result<bool> {
        self.reader.has_data()
    }

    fn align(&mut self) {
        self.reader.align();
    }

    fn read_flag(&mut self) -> Result<u32> {
        let bits = self
            .ctx
            .bits_per_flag
            .ok_or(Error::Internal("flag read on an unflagged mesh type"))?;

        self.reader.read(bits)
    }

    /// Read one x/y pair and apply the coordinate decode ranges.
    fn read_coordinate(&mut self) -> Result<[f32; 2]> {
        let bits = self.ctx.bits_per_coordinate;
        let xi = self.reader.read(bits)? as f64;
        let yi = self.reader.read(bits)? as f64;

        let scale = field_scale(bits.bits());
        let d = &self.ctx.decode;

        Ok([
            (xi * scale * (d[1] - d[0]) as f64 + d[0] as f64) as f32,
            (yi * scale * (d[3] - d[2]) as f64 + d[2] as f64) as f32,
        ])
    }

    /// Read one color record and convert it to 8-bit sRGB.
    fn read_components(&mut self) -> Result<[u8; 3]> {
        let bits = self.ctx.bits_per_component;
        let scale = field_scale(bits.bits());
        let d = &self.ctx.decode;

        let mut comps: SmallVec<[f32; 4]> = SmallVec::new();
        for i in 0..self.ctx.num_comps {
            let ci = self.reader.read(bits)? as f64;
            let j = 4 + 2 * i;
            comps.push((ci * scale * (d[j + 1] - d[j]) as f64 + d[j] as f64) as f32);
        }

        let color = match &self.ctx.color_fn {
            Some(function) => function
                .eval(comps[0])
                .ok_or_else(|| Error::Format("mesh color function evaluation failed".into()))?,
            None => comps,
        };

        Ok(self.ctx.color_space.to_rgb8(&color))
    }
}

/// A figure while its vertex indices are still element indices; packing
/// turns them into byte offsets.
pub(crate) enum MeshFigure {
    Triangles {
        coords: Vec<i32>,
        colors: Vec<i32>,
    },
    Lattice {
        coords: Vec<i32>,
        colors: Vec<i32>,
        vertices_per_row: u32,
    },
    /// A bicubic patch; replaced by a lattice before packing.
    Patch {
        coords: [i32; 16],
        colors: [i32; 4],
    },
}

#[derive(Clone, Copy, PartialEq)]
enum PatchKind {
    Coons,
    Tensor,
}

/// A decoded mesh before packing.
pub(crate) struct Mesh {
    pub(crate) shading_type: u8,
    pub(crate) coords: Vec<[f32; 2]>,
    pub(crate) colors: Vec<[u8; 3]>,
    pub(crate) figures: Vec<MeshFigure>,
    pub(crate) bounds: [f32; 4],
    matrix: Option<[f32; 6]>,
    bbox: Option<[f32; 4]>,
    background: Option<[u8; 3]>,
}

impl Mesh {
    pub(crate) fn parse(
        stream: &Stream,
        shading_type: u8,
        matrix: Option<[f32; 6]>,
        xref: &XRef,
    ) -> Result<Mesh> {
        let dict = stream.dict();
        let bbox = shading_bbox(dict, xref);
        let color_space = shading_color_space(dict, xref)?;
        let background = dict
            .get::<Vec<f32>>(BACKGROUND, xref)
            .map(|comps| color_space.to_rgb8(&comps));

        let color_fn = match dict.get_raw(FUNCTION) {
            Some(obj) => Some(
                ShadingFunction::new(obj, xref)
                    .ok_or_else(|| Error::Format("invalid mesh color function".into()))?,
            ),
            None => None,
        };

        let bits_per_coordinate = bit_size(dict, BITS_PER_COORDINATE, xref)?;
        let bits_per_component = bit_size(dict, BITS_PER_COMPONENT, xref)?;
        let bits_per_flag = if matches!(shading_type, 4 | 6 | 7) {
            let bits = bit_size(dict, BITS_PER_FLAG, xref)?;
            if !matches!(bits.bits(), 2 | 4 | 8) {
                warn!("unexpected BitsPerFlag width {}", bits.bits());
            }

            Some(bits)
        } else {
            None
        };

        let num_comps = if color_fn.is_some() {
            1
        } else {
            color_space.num_comps()
        };
        let decode = dict
            .get::<Vec<f32>>(DECODE, xref)
            .ok_or_else(|| Error::Format("mesh shading without a Decode array".into()))?;
        if decode.len() < 4 + 2 * num_comps {
            return Err(Error::Format(format!(
                "Decode array too short: {} entries for {num_comps} components",
                decode.len()
            )));
        }

        let ctx = DecodeContext {
            bits_per_coordinate,
            bits_per_component,
            bits_per_flag,
            decode,
            color_fn,
            color_space,
            num_comps,
        };
        let mut reader = MeshReader::new(stream, ctx);

        let mut mesh = Mesh {
            shading_type,
            coords: Vec::new(),
            colors: Vec::new(),
            figures: Vec::new(),
            bounds: [0.0; 4],
            matrix,
            bbox,
            background,
        };

        match shading_type {
            4 => mesh.decode_triangles(&mut reader)?,
            5 => {
                let vertices_per_row = dict.get::<i32>(VERTICES_PER_ROW, xref).unwrap_or(0);
                if vertices_per_row < 2 {
                    return Err(Error::Format("invalid VerticesPerRow".into()));
                }

                mesh.decode_lattice(&mut reader, vertices_per_row as u32)?;
            }
            6 => mesh.decode_patches(&mut reader, PatchKind::Coons)?,
            7 => mesh.decode_patches(&mut reader, PatchKind::Tensor)?,
            _ => return Err(Error::Internal("mesh decoder applied to a non-mesh type")),
        }

        if matches!(shading_type, 6 | 7) {
            // The patch split density depends on the bounds of the raw
            // control points.
            mesh.update_bounds()?;
            tessellate::split_patches(&mut mesh)?;
        }

        mesh.update_bounds()?;

        Ok(mesh)
    }

    /// Type 4: flagged vertices forming triangle strips and fans.
    fn decode_triangles(&mut self, reader: &mut MeshReader) -> Result<()> {
        let mut ps: Vec<i32> = Vec::new();
        let mut vertices_left = 0u32;

        while reader.has_data()? {
            let flag = reader.read_flag()?;
            let coord = reader.read_coordinate()?;
            let color = reader.read_components()?;

            // Flags are only meaningful on the first vertex of a triangle.
            if vertices_left == 0 {
                match flag {
                    0 => vertices_left = 3,
                    1 | 2 => {
                        let len = ps.len();
                        if len < 3 {
                            return Err(Error::Format(
                                "shared-vertex flag with no preceding triangle".into(),
                            ));
                        }

                        if flag == 1 {
                            ps.push(ps[len - 2]);
                        } else {
                            ps.push(ps[len - 3]);
                        }
                        ps.push(ps[len - 1]);
                        vertices_left = 1;
                    }
                    f => {
                        return Err(Error::Format(format!("unknown free-form mesh flag {f}")));
                    }
                }
            }

            ps.push(self.coords.len() as i32);
            self.coords.push(coord);
            self.colors.push(color);
            vertices_left -= 1;
            reader.align();
        }

        self.figures.push(MeshFigure::Triangles {
            coords: ps.clone(),
            colors: ps,
        });

        Ok(())
    }

    /// Type 5: unflagged vertices in rows of a declared width.
    fn decode_lattice(&mut self, reader: &mut MeshReader, vertices_per_row: u32) -> Result<()> {
        let mut ps: Vec<i32> = Vec::new();

        while reader.has_data()? {
            let coord = reader.read_coordinate()?;
            let color = reader.read_components()?;

            ps.push(self.coords.len() as i32);
            self.coords.push(coord);
            self.colors.push(color);
        }

        self.figures.push(MeshFigure::Lattice {
            coords: ps.clone(),
            colors: ps,
            vertices_per_row,
        });

        Ok(())
    }

    /// Types 6 and 7: bicubic patches with shared-edge flags.
    ///
    /// Control points live on a 4x4 grid indexed `ps[4 * row + col]` with
    /// row 0 at the bottom. The stream supplies the boundary counterclockwise
    /// from the bottom-left corner; colors follow the same rotation.
    fn decode_patches(&mut self, reader: &mut MeshReader, kind: PatchKind) -> Result<()> {
        let mut ps = [0i32; 16];
        let mut cs = [0i32; 4];
        let mut first = true;

        while reader.has_data()? {
            let flag = reader.read_flag()?;
            if flag > 3 {
                return Err(Error::Format(format!("unknown patch mesh flag {flag}")));
            }
            if first && flag != 0 {
                return Err(Error::Format(
                    "patch mesh starts with a shared-edge flag".into(),
                ));
            }

            let full = flag == 0;
            let coord_count = match (kind, full) {
                (PatchKind::Coons, true) => 12,
                (PatchKind::Coons, false) => 8,
                (PatchKind::Tensor, true) => 16,
                (PatchKind::Tensor, false) => 12,
            };

            let pi = self.coords.len() as i32;
            for _ in 0..coord_count {
                let coord = reader.read_coordinate()?;
                self.coords.push(coord);
            }

            let ci = self.colors.len() as i32;
            for _ in 0..if full { 4 } else { 2 } {
                let color = reader.read_components()?;
                self.colors.push(color);
            }

            match flag {
                0 => {
                    ps[12] = pi + 3;
                    ps[13] = pi + 4;
                    ps[14] = pi + 5;
                    ps[15] = pi + 6;
                    ps[8] = pi + 2;
                    ps[11] = pi + 7;
                    ps[4] = pi + 1;
                    ps[7] = pi + 8;
                    ps[0] = pi;
                    ps[1] = pi + 11;
                    ps[2] = pi + 10;
                    ps[3] = pi + 9;

                    cs[2] = ci + 1;
                    cs[3] = ci + 2;
                    cs[0] = ci;
                    cs[1] = ci + 3;
                }
                1 => {
                    // Attach to the previous patch's top edge.
                    let (t1, t2, t3, t4) = (ps[12], ps[13], ps[14], ps[15]);
                    ps[12] = t4;
                    ps[13] = pi;
                    ps[14] = pi + 1;
                    ps[15] = pi + 2;
                    ps[8] = t3;
                    ps[11] = pi + 3;
                    ps[4] = t2;
                    ps[7] = pi + 4;
                    ps[0] = t1;
                    ps[1] = pi + 7;
                    ps[2] = pi + 6;
                    ps[3] = pi + 5;

                    let (c2, c3) = (cs[2], cs[3]);
                    cs[2] = c3;
                    cs[3] = ci;
                    cs[0] = c2;
                    cs[1] = ci + 1;
                }
                2 => {
                    // Attach to the previous patch's right edge.
                    let (t1, t2) = (ps[15], ps[11]);
                    ps[12] = ps[3];
                    ps[13] = pi;
                    ps[14] = pi + 1;
                    ps[15] = pi + 2;
                    ps[8] = ps[7];
                    ps[11] = pi + 3;
                    ps[4] = t2;
                    ps[7] = pi + 4;
                    ps[0] = t1;
                    ps[1] = pi + 7;
                    ps[2] = pi + 6;
                    ps[3] = pi + 5;

                    let c3 = cs[3];
                    cs[2] = cs[1];
                    cs[3] = ci;
                    cs[0] = c3;
                    cs[1] = ci + 1;
                }
                3 => {
                    // Attach to the previous patch's bottom edge.
                    let (t1, t2, t3, t4) = (ps[0], ps[1], ps[2], ps[3]);
                    ps[12] = t1;
                    ps[13] = pi;
                    ps[14] = pi + 1;
                    ps[15] = pi + 2;
                    ps[8] = t2;
                    ps[11] = pi + 3;
                    ps[4] = t3;
                    ps[7] = pi + 4;
                    ps[0] = t4;
                    ps[1] = pi + 7;
                    ps[2] = pi + 6;
                    ps[3] = pi + 5;

                    let (c0, c1) = (cs[0], cs[1]);
                    cs[2] = c0;
                    cs[3] = ci;
                    cs[0] = c1;
                    cs[1] = ci + 1;
                }
                _ => unreachable!(),
            }

            match kind {
                PatchKind::Tensor => {
                    // The four interior points come from the stream, in the
                    // same rotational order as the boundary.
                    let base = if full { pi + 12 } else { pi + 8 };
                    ps[5] = base;
                    ps[9] = base + 1;
                    ps[10] = base + 2;
                    ps[6] = base + 3;
                }
                PatchKind::Coons => self.push_interior_points(&mut ps),
            }

            self.figures.push(MeshFigure::Patch {
                coords: ps,
                colors: cs,
            });
            first = false;
        }

        Ok(())
    }

    /// Synthesize the four interior control points of a Coons patch from
    /// its boundary. The division by 9 happens after the full sum so that
    /// results agree bit-for-bit across implementations.
    fn push_interior_points(&mut self, ps: &mut [i32; 16]) {
        let (p5, p6, p9, p10) = {
            let at = |i: usize| self.coords[ps[i] as usize];
            let blend = |corner_a: [f32; 2],
                         corner_b: [f32; 2],
                         edge_1: [f32; 2],
                         edge_2: [f32; 2],
                         diag_a: [f32; 2],
                         diag_b: [f32; 2],
                         adj_1: [f32; 2],
                         adj_2: [f32; 2]| {
                let axis = |k: usize| {
                    (-4.0 * corner_a[k] - corner_b[k] + 6.0 * (edge_1[k] + edge_2[k])
                        - 2.0 * (diag_a[k] + diag_b[k])
                        + 3.0 * (adj_1[k] + adj_2[k]))
                        / 9.0
                };

                [axis(0), axis(1)]
            };

            (
                blend(at(0), at(15), at(4), at(1), at(12), at(3), at(13), at(7)),
                blend(at(3), at(12), at(2), at(7), at(0), at(15), at(14), at(4)),
                blend(at(12), at(3), at(8), at(13), at(0), at(15), at(11), at(1)),
                blend(at(15), at(0), at(14), at(11), at(12), at(3), at(2), at(8)),
            )
        };

        for (slot, point) in [(5, p5), (6, p6), (9, p9), (10, p10)] {
            ps[slot] = self.coords.len() as i32;
            self.coords.push(point);
        }
    }

    fn update_bounds(&mut self) -> Result<()> {
        let first = self
            .coords
            .first()
            .ok_or_else(|| Error::Format("mesh contains no vertices".into()))?;

        let (mut min_x, mut min_y) = (first[0], first[1]);
        let (mut max_x, mut max_y) = (first[0], first[1]);

        for [x, y] in &self.coords[1..] {
            min_x = min_x.min(*x);
            min_y = min_y.min(*y);
            max_x = max_x.max(*x);
            max_y = max_y.max(*y);
        }

        self.bounds = [min_x, min_y, max_x, max_y];

        Ok(())
    }

    /// Flatten the vertex lists into contiguous buffers and rewrite every
    /// figure index to a byte offset.
    pub(crate) fn into_ir(self) -> Result<PatternIr> {
        let mut coords = Vec::with_capacity(self.coords.len() * 2);
        for [x, y] in &self.coords {
            coords.push(*x);
            coords.push(*y);
        }

        let mut colors = Vec::with_capacity(self.colors.len() * 3);
        for rgb in &self.colors {
            colors.extend_from_slice(rgb);
        }

        let mut figures = Vec::with_capacity(self.figures.len());
        for figure in self.figures {
            figures.push(match figure {
                MeshFigure::Triangles { coords, colors } => Figure::Triangles {
                    coords: coords.into_iter().map(|i| i * 2).collect(),
                    colors: colors.into_iter().map(|i| i * 3).collect(),
                },
                MeshFigure::Lattice {
                    coords,
                    colors,
                    vertices_per_row,
                } => Figure::Lattice {
                    coords: coords.into_iter().map(|i| i * 2).collect(),
                    colors: colors.into_iter().map(|i| i * 3).collect(),
                    vertices_per_row,
                },
                MeshFigure::Patch { .. } => {
                    return Err(Error::Internal("unsplit patch figure at pack time"));
                }
            });
        }

        Ok(PatternIr::Mesh {
            shading_type: self.shading_type,
            coords,
            colors,
            figures,
            bounds: self.bounds,
            matrix: self.matrix,
            bbox: self.bbox,
            background: self.background,
        })
    }
}

fn bit_size(dict: &Dict, key: &[u8], xref: &XRef) -> Result<BitSize> {
    let raw = dict.get::<u8>(key, xref).ok_or_else(|| {
        Error::Format(format!(
            "missing or invalid {} entry",
            String::from_utf8_lossy(key)
        ))
    })?;

    BitSize::from_u8(raw)
        .ok_or_else(|| Error::Format(format!("invalid bit width {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ombra_syntax::bit::BitWriter;
    use ombra_syntax::object::Stream;

    fn bs8() -> BitSize {
        BitSize::from_u8(8).unwrap()
    }

    fn rgb_mesh_dict(shading_type: u8, extra: &str) -> Dict {
        let data = format!(
            "<< /ShadingType {shading_type}
                /ColorSpace /DeviceRGB
                /BitsPerCoordinate 8 /BitsPerComponent 8 /BitsPerFlag 8
                /Decode [0 1 0 1 0 1 0 1 0 1] {extra} >>"
        );

        Dict::from_bytes(data.as_bytes()).unwrap()
    }

    /// flag + x/y + rgb, each 8 bits wide.
    fn write_vertex(w: &mut BitWriter, flag: u32, x: u32, y: u32, rgb: [u32; 3]) {
        w.write(flag, bs8());
        w.write(x, bs8());
        w.write(y, bs8());
        for c in rgb {
            w.write(c, bs8());
        }
    }

    fn parse_type4(data: Vec<u8>) -> Result<PatternIr> {
        let stream = Stream::new(rgb_mesh_dict(4, ""), data);
        Mesh::parse(&stream, 4, None, &XRef::empty())?.into_ir()
    }

    #[test]
    fn free_form_shared_edge() {
        let mut w = BitWriter::new();
        write_vertex(&mut w, 0, 0, 0, [255, 0, 0]);
        write_vertex(&mut w, 0, 255, 0, [0, 255, 0]);
        write_vertex(&mut w, 0, 0, 255, [0, 0, 255]);
        write_vertex(&mut w, 1, 255, 255, [255, 255, 255]);

        let PatternIr::Mesh {
            coords,
            colors,
            figures,
            bounds,
            ..
        } = parse_type4(w.finish()).unwrap()
        else {
            panic!("expected a mesh");
        };

        // Four vertices, two triangles sharing an edge.
        assert_eq!(coords.len(), 8);
        assert_eq!(colors.len(), 12);
        assert_eq!(bounds, [0.0, 0.0, 1.0, 1.0]);

        let [Figure::Triangles {
            coords: tri_coords,
            colors: tri_colors,
        }] = figures.as_slice()
        else {
            panic!("expected one triangles figure");
        };

        assert_eq!(tri_coords.len() % 3, 0);
        // Vertex indices 0 1 2, then 1 2 3, as byte offsets.
        assert_eq!(tri_coords.as_slice(), &[0, 2, 4, 2, 4, 6]);
        assert_eq!(tri_colors.as_slice(), &[0, 3, 6, 3, 6, 9]);

        for offset in tri_coords {
            assert!(*offset >= 0 && (*offset as usize) < coords.len());
            assert_eq!(offset % 2, 0);
        }
        for offset in tri_colors {
            assert!(*offset >= 0 && (*offset as usize) < colors.len());
            assert_eq!(offset % 3, 0);
        }
    }

    #[test]
    fn free_form_fan_flag() {
        let mut w = BitWriter::new();
        write_vertex(&mut w, 0, 0, 0, [0, 0, 0]);
        write_vertex(&mut w, 0, 255, 0, [0, 0, 0]);
        write_vertex(&mut w, 0, 0, 255, [0, 0, 0]);
        write_vertex(&mut w, 2, 255, 255, [0, 0, 0]);

        let PatternIr::Mesh { figures, .. } = parse_type4(w.finish()).unwrap() else {
            panic!("expected a mesh");
        };

        let [Figure::Triangles { coords, .. }] = figures.as_slice() else {
            panic!("expected one triangles figure");
        };

        // Flag 2 reuses the first and last vertex of the previous triangle.
        assert_eq!(coords.as_slice(), &[0, 2, 4, 0, 4, 6]);
    }

    #[test]
    fn free_form_unknown_flag() {
        let mut w = BitWriter::new();
        write_vertex(&mut w, 7, 0, 0, [0, 0, 0]);

        assert!(matches!(
            parse_type4(w.finish()),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn free_form_monotone_indices() {
        let mut w = BitWriter::new();
        for i in 0..6 {
            write_vertex(&mut w, 0, i * 10, i * 20, [i * 30, 0, 0]);
        }

        let PatternIr::Mesh { figures, .. } = parse_type4(w.finish()).unwrap() else {
            panic!("expected a mesh");
        };
        let [Figure::Triangles { coords, .. }] = figures.as_slice() else {
            panic!("expected one triangles figure");
        };

        // Two fresh triangles: emitted offsets strictly increase.
        for pair in coords.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn lattice_shape() {
        let dict = rgb_mesh_dict(5, "/VerticesPerRow 3");

        let mut w = BitWriter::new();
        for i in 0..6u32 {
            w.write(i * 40, bs8());
            w.write(i * 30, bs8());
            for c in [i * 42, 0, 255 - i * 42] {
                w.write(c, bs8());
            }
        }

        let stream = Stream::new(dict, w.finish());
        let ir = Mesh::parse(&stream, 5, None, &XRef::empty())
            .unwrap()
            .into_ir()
            .unwrap();

        let PatternIr::Mesh {
            figures, coords, ..
        } = ir
        else {
            panic!("expected a mesh");
        };

        assert_eq!(coords.len(), 12);

        let [Figure::Lattice {
            coords: lat_coords,
            vertices_per_row,
            ..
        }] = figures.as_slice()
        else {
            panic!("expected one lattice figure");
        };

        assert_eq!(*vertices_per_row, 3);
        // rows * vertices_per_row == indices
        assert_eq!(lat_coords.len() % *vertices_per_row as usize, 0);
        assert_eq!(lat_coords.len() / *vertices_per_row as usize, 2);
    }

    #[test]
    fn lattice_rejects_narrow_rows() {
        let dict = rgb_mesh_dict(5, "/VerticesPerRow 1");
        let stream = Stream::new(dict, vec![0; 10]);

        assert!(matches!(
            Mesh::parse(&stream, 5, None, &XRef::empty()),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn empty_mesh_is_a_format_error() {
        let stream = Stream::new(rgb_mesh_dict(4, ""), Vec::new());

        assert!(matches!(
            Mesh::parse(&stream, 4, None, &XRef::empty()),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn parametric_vertex_colors() {
        // One parametric value per vertex, expanded by a gray ramp.
        let data = b"<< /ShadingType 4
              /ColorSpace /DeviceGray
              /BitsPerCoordinate 8 /BitsPerComponent 8 /BitsPerFlag 8
              /Decode [0 1 0 1 0 1]
              /Function << /FunctionType 2 /Domain [0 1] /C0 [0] /C1 [1] /N 1 >> >>";
        let dict = Dict::from_bytes(data).unwrap();

        let mut w = BitWriter::new();
        for (i, t) in [0u32, 128, 255].iter().enumerate() {
            w.write(0, bs8());
            w.write(i as u32 * 100, bs8());
            w.write(0, bs8());
            w.write(*t, bs8());
        }

        let stream = Stream::new(dict, w.finish());
        let ir = Mesh::parse(&stream, 4, None, &XRef::empty())
            .unwrap()
            .into_ir()
            .unwrap();

        let PatternIr::Mesh { colors, .. } = ir else {
            panic!("expected a mesh");
        };

        assert_eq!(colors.as_slice(), &[0, 0, 0, 128, 128, 128, 255, 255, 255]);
    }

    #[test]
    fn background_is_converted() {
        let dict = rgb_mesh_dict(4, "/Background [1 0 0]");

        let mut w = BitWriter::new();
        for _ in 0..3 {
            write_vertex(&mut w, 0, 0, 0, [0, 0, 0]);
        }

        let stream = Stream::new(dict, w.finish());
        let ir = Mesh::parse(&stream, 4, None, &XRef::empty())
            .unwrap()
            .into_ir()
            .unwrap();

        let PatternIr::Mesh { background, .. } = ir else {
            panic!("expected a mesh");
        };
        assert_eq!(background, Some([255, 0, 0]));
    }

    #[test]
    fn coordinate_decode_ranges_apply() {
        let data = b"<< /ShadingType 5
              /ColorSpace /DeviceGray
              /BitsPerCoordinate 8 /BitsPerComponent 8
              /VerticesPerRow 2
              /Decode [-10 10 0 100 0 1] >>";
        let dict = Dict::from_bytes(data).unwrap();

        let mut w = BitWriter::new();
        for (x, y) in [(0u32, 0u32), (255, 255), (0, 255), (255, 0)] {
            w.write(x, bs8());
            w.write(y, bs8());
            w.write(0, bs8());
        }

        let stream = Stream::new(dict, w.finish());
        let ir = Mesh::parse(&stream, 5, None, &XRef::empty())
            .unwrap()
            .into_ir()
            .unwrap();

        let PatternIr::Mesh { coords, bounds, .. } = ir else {
            panic!("expected a mesh");
        };

        assert_eq!(&coords[..4], &[-10.0, 0.0, 10.0, 100.0]);
        assert_eq!(bounds, [-10.0, 0.0, 10.0, 100.0]);
    }
}
