//! Splitting bicubic patches into triangle lattices.

use super::mesh::{Mesh, MeshFigure};
use ombra_syntax::{Error, Result};
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use std::sync::{Arc, RwLock};

/// Triangle count per axis across the whole mesh extent.
const TRIANGLE_DENSITY: f32 = 20.0;

const MIN_SPLIT: i64 = 3;
const MAX_SPLIT: i64 = 20;

/// Rows of cubic Bernstein weights, one row per lattice step.
type Basis = Arc<Vec<[f32; 4]>>;

static BASIS_CACHE: Lazy<RwLock<FxHashMap<u32, Basis>>> =
    Lazy::new(|| RwLock::new(FxHashMap::default()));

/// The Bernstein basis table for `count` steps, built once per process and
/// immutable afterwards.
fn basis(count: u32) -> Basis {
    if let Some(table) = BASIS_CACHE.read().unwrap().get(&count) {
        return table.clone();
    }

    let mut table = Vec::with_capacity(count as usize + 1);
    for i in 0..=count {
        let t = i as f32 / count as f32;
        let t_ = 1.0 - t;
        table.push([
            t_ * t_ * t_,
            3.0 * t * t_ * t_,
            3.0 * t * t * t_,
            t * t * t,
        ]);
    }

    BASIS_CACHE
        .write()
        .unwrap()
        .entry(count)
        .or_insert_with(|| Arc::new(table))
        .clone()
}

/// Per-patch split count: the patch's share of the mesh extent times the
/// overall density, clamped so that neighbouring patches stay visually
/// contiguous.
fn split_count(extent: f32, mesh_extent: f32) -> u32 {
    let ratio = if mesh_extent > 0.0 {
        (extent * TRIANGLE_DENSITY / mesh_extent).ceil() as i64
    } else {
        0
    };

    ratio.clamp(MIN_SPLIT, MAX_SPLIT) as u32
}

/// Replace every patch figure of the mesh by an interpolated lattice.
pub(crate) fn split_patches(mesh: &mut Mesh) -> Result<()> {
    for index in 0..mesh.figures.len() {
        split_patch(mesh, index)?;
    }

    Ok(())
}

fn split_patch(mesh: &mut Mesh, index: usize) -> Result<()> {
    let (pi, ci) = match &mesh.figures[index] {
        MeshFigure::Patch { coords, colors } => (*coords, *colors),
        _ => return Err(Error::Internal("patch tessellation on a non-patch figure")),
    };

    // Density follows the extent of the four corner control points.
    let corners = [
        mesh.coords[pi[0] as usize],
        mesh.coords[pi[3] as usize],
        mesh.coords[pi[12] as usize],
        mesh.coords[pi[15] as usize],
    ];
    let min_x = corners.iter().map(|c| c[0]).fold(f32::INFINITY, f32::min);
    let max_x = corners
        .iter()
        .map(|c| c[0])
        .fold(f32::NEG_INFINITY, f32::max);
    let min_y = corners.iter().map(|c| c[1]).fold(f32::INFINITY, f32::min);
    let max_y = corners
        .iter()
        .map(|c| c[1])
        .fold(f32::NEG_INFINITY, f32::max);

    let split_x = split_count(max_x - min_x, mesh.bounds[2] - mesh.bounds[0]);
    let split_y = split_count(max_y - min_y, mesh.bounds[3] - mesh.bounds[1]);

    let vertices_per_row = split_x + 1;
    let node_count = ((split_y + 1) * vertices_per_row) as usize;
    let mut fig_coords = vec![0i32; node_count];
    let mut fig_colors = vec![0i32; node_count];

    let c0 = mesh.colors[ci[0] as usize];
    let c1 = mesh.colors[ci[1] as usize];
    let c2 = mesh.colors[ci[2] as usize];
    let c3 = mesh.colors[ci[3] as usize];

    let b_row = basis(split_y);
    let b_col = basis(split_x);

    let mut k = 0;
    for row in 0..=split_y {
        // Color endpoints of this row on the left and right patch edges.
        let left = lerp_color(c0, c2, row, split_y);
        let right = lerp_color(c1, c3, row, split_y);

        for col in 0..=split_x {
            if (row == 0 || row == split_y) && (col == 0 || col == split_x) {
                // Corner nodes keep the original vertices.
                k += 1;
                continue;
            }

            let mut x = 0.0f32;
            let mut y = 0.0f32;
            let mut q = 0;
            for i in 0..4 {
                for j in 0..4 {
                    let m = b_row[row as usize][i] * b_col[col as usize][j];
                    let p = mesh.coords[pi[q] as usize];
                    x += p[0] * m;
                    y += p[1] * m;
                    q += 1;
                }
            }

            fig_coords[k] = mesh.coords.len() as i32;
            mesh.coords.push([x, y]);
            fig_colors[k] = mesh.colors.len() as i32;
            mesh.colors.push(lerp_color(left, right, col, split_x));
            k += 1;
        }
    }

    fig_coords[0] = pi[0];
    fig_coords[split_x as usize] = pi[3];
    fig_coords[(vertices_per_row * split_y) as usize] = pi[12];
    fig_coords[(vertices_per_row * split_y + split_x) as usize] = pi[15];
    fig_colors[0] = ci[0];
    fig_colors[split_x as usize] = ci[1];
    fig_colors[(vertices_per_row * split_y) as usize] = ci[2];
    fig_colors[(vertices_per_row * split_y + split_x) as usize] = ci[3];

    mesh.figures[index] = MeshFigure::Lattice {
        coords: fig_coords,
        colors: fig_colors,
        vertices_per_row,
    };

    Ok(())
}

/// Linear interpolation of an 8-bit color, truncating each channel toward
/// zero.
fn lerp_color(a: [u8; 3], b: [u8; 3], num: u32, den: u32) -> [u8; 3] {
    let channel = |a: u8, b: u8| ((a as u32 * (den - num) + b as u32 * num) / den) as u8;

    [
        channel(a[0], b[0]),
        channel(a[1], b[1]),
        channel(a[2], b[2]),
    ]
}
