//! Tolerance-based vertex welding.
//!
//! Every corner is matched against the unique vertices accepted so far and joins the
//! lowest-indexed one whose position lies within the tolerance; otherwise it becomes a new
//! unique vertex. Only positions are compared, a unique vertex keeps its first normal.
//!
//! [`weld`] finds candidates through a hash grid, [`weld_linear`] scans every unique vertex.
//! Both produce identical output.

use rustc_hash::FxHashMap;

use super::vertex::Vertex;
use crate::math::*;

/// Deduplicated vertices and one index per input corner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Welded {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

fn within(a: Vec3, b: Vec3, tolerance: f32) -> bool {
    if tolerance > 0.0 { (a - b).length_squared() <= tolerance * tolerance } else { a == b }
}

/// Welds `corners` in O(unique × total) by comparing against every accepted vertex.
pub fn weld_linear(corners: &[Vertex], tolerance: f32) -> Welded {
    let mut welded = Welded { vertices: Vec::new(), indices: Vec::with_capacity(corners.len()) };
    for corner in corners {
        let found = welded.vertices.iter().position(|v| within(v.position, corner.position, tolerance));
        let index = match found {
            Some(index) => index,
            None => {
                welded.vertices.push(*corner);
                welded.vertices.len() - 1
            }
        };
        welded.indices.push(index as u32);
    }
    welded
}

/// Welds `corners`, looking candidates up in a grid of `2 * tolerance` cells.
///
/// A zero tolerance merges bit-identical positions only (`-0.0` equals `0.0`).
pub fn weld(corners: &[Vertex], tolerance: f32) -> Welded {
    if tolerance > 0.0 { weld_grid(corners, tolerance) } else { weld_exact(corners) }
}

fn weld_exact(corners: &[Vertex]) -> Welded {
    let mut welded = Welded { vertices: Vec::new(), indices: Vec::with_capacity(corners.len()) };
    let mut seen: FxHashMap<[u32; 3], u32> = FxHashMap::default();
    for corner in corners {
        // + 0.0 folds -0.0 into 0.0
        let p = corner.position + Vec3::ZERO;
        let key = [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()];
        let index = *seen.entry(key).or_insert_with(|| {
            welded.vertices.push(*corner);
            (welded.vertices.len() - 1) as u32
        });
        welded.indices.push(index);
    }
    welded
}

fn weld_grid(corners: &[Vertex], tolerance: f32) -> Welded {
    // Matches differ by at most half a cell per axis, so they always sit in adjacent cells.
    let inv_cell = 1.0 / (2.0 * f64::from(tolerance));
    let cell_of = |p: Vec3| -> [i64; 3] {
        [
            (f64::from(p.x) * inv_cell).floor() as i64,
            (f64::from(p.y) * inv_cell).floor() as i64,
            (f64::from(p.z) * inv_cell).floor() as i64,
        ]
    };

    let mut welded = Welded { vertices: Vec::new(), indices: Vec::with_capacity(corners.len()) };
    let mut grid: FxHashMap<[i64; 3], Vec<u32>> = FxHashMap::default();

    for corner in corners {
        let cell = cell_of(corner.position);
        let mut best: Option<u32> = None;
        for dx in -1..=1i64 {
            for dy in -1..=1i64 {
                for dz in -1..=1i64 {
                    let neighbour = [cell[0].saturating_add(dx), cell[1].saturating_add(dy), cell[2].saturating_add(dz)];
                    let Some(bucket) = grid.get(&neighbour) else { continue };
                    // buckets are filled in index order, so the first hit is the bucket's lowest
                    let hit = bucket
                        .iter()
                        .copied()
                        .find(|&i| within(welded.vertices[i as usize].position, corner.position, tolerance));
                    if let Some(i) = hit {
                        best = Some(best.map_or(i, |b| b.min(i)));
                    }
                }
            }
        }

        let index = match best {
            Some(index) => index,
            None => {
                let index = welded.vertices.len() as u32;
                welded.vertices.push(*corner);
                grid.entry(cell).or_default().push(index);
                index
            }
        };
        welded.indices.push(index);
    }
    welded
}
