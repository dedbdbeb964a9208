//! The flat intermediate representation handed to the rasterizer.
//!
//! Everything in here is plain owned data; no handle points back into the
//! decoder.

/// Whether a gradient runs along a line or between two circles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientKind {
    /// A gradient along the line from `p0` to `p1`.
    Axial,
    /// A gradient between the circles `(p0, r0)` and `(p1, r1)`.
    Radial,
}

/// A single gradient color stop.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorStop {
    /// Position of the stop in `[0, 1]`.
    pub offset: f32,
    /// CSS color: `#rrggbb`, or `transparent` for synthetic stops.
    pub color: String,
}

/// A figure of a mesh shading.
///
/// Indices are byte offsets into the owning mesh's packed buffers: stride 2
/// into the coordinates, stride 3 into the colors.
#[derive(Debug, Clone, PartialEq)]
pub enum Figure {
    /// Independent triangles; every three indices form one triangle.
    Triangles {
        /// Per-vertex coordinate offsets.
        coords: Vec<i32>,
        /// Per-vertex color offsets.
        colors: Vec<i32>,
    },
    /// A row-major lattice of `2 * (rows - 1) * (vertices_per_row - 1)`
    /// triangles.
    Lattice {
        /// Per-vertex coordinate offsets.
        coords: Vec<i32>,
        /// Per-vertex color offsets.
        colors: Vec<i32>,
        /// Number of vertices per lattice row.
        vertices_per_row: u32,
    },
}

/// The decode result for one pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternIr {
    /// An axial or radial gradient.
    RadialAxial {
        /// Gradient geometry selector.
        kind: GradientKind,
        /// Normalized bounding box, if declared.
        bbox: Option<[f32; 4]>,
        /// Sampled color stops, non-decreasing in offset.
        stops: Vec<ColorStop>,
        /// Start point.
        p0: [f32; 2],
        /// End point.
        p1: [f32; 2],
        /// Start radius (radial only).
        r0: Option<f32>,
        /// End radius (radial only).
        r1: Option<f32>,
        /// Pattern-to-user-space transform.
        matrix: Option<[f32; 6]>,
    },
    /// A triangle or patch mesh.
    Mesh {
        /// The original shading type (4 through 7).
        shading_type: u8,
        /// Packed vertex coordinates, `2 * V` floats.
        coords: Vec<f32>,
        /// Packed vertex colors, `3 * V` bytes.
        colors: Vec<u8>,
        /// The mesh figures, in stream order.
        figures: Vec<Figure>,
        /// Axis-aligned bounds over all vertices.
        bounds: [f32; 4],
        /// Pattern-to-user-space transform.
        matrix: Option<[f32; 6]>,
        /// Normalized bounding box, if declared.
        bbox: Option<[f32; 4]>,
        /// Background color for the area outside the mesh.
        background: Option<[u8; 3]>,
    },
    /// The envelope of a tiling pattern; its content stream is replayed by
    /// the consumer.
    Tiling {
        /// Fill color for uncolored (stencil) patterns.
        color: Option<[u8; 3]>,
        /// The raw content stream of one tile.
        content: Vec<u8>,
        /// Pattern-to-user-space transform.
        matrix: Option<[f32; 6]>,
        /// The tile cell, normalized.
        bbox: [f32; 4],
        /// Horizontal tile spacing.
        x_step: f32,
        /// Vertical tile spacing.
        y_step: f32,
        /// 1 for colored, 2 for uncolored patterns.
        paint_type: u8,
        /// Spacing fidelity declared by the document.
        tiling_type: u8,
    },
    /// A placeholder for a shading that could not be decoded.
    Dummy,
}
