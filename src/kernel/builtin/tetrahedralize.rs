use tracing::{info, warn};

use crate::error::{KernelError, Result};
use crate::grid::{Dimension, Element, Grid, VertexId, VolumeKind};
use crate::kernel::TetrahedralizeReport;
use crate::math::{Point3, TOLERANCE};

/// Relabellings of a prism that keep "vertex i + 3 above vertex i", indexed by
/// which local vertex becomes vertex 0.
const ROTATIONS: [[usize; 6]; 6] = [
    [0, 1, 2, 3, 4, 5],
    [1, 2, 0, 4, 5, 3],
    [2, 0, 1, 5, 3, 4],
    [3, 5, 4, 0, 2, 1],
    [4, 3, 5, 1, 0, 2],
    [5, 4, 3, 2, 1, 0],
];

/// Replaces every prism by three tetrahedra and every quad by two triangles.
///
/// Each quad is cut along the diagonal through its smallest vertex id, from
/// both sides, so neighbouring prisms stay conforming.
pub(super) fn tetrahedralize(
    grid: &mut Grid,
    quality: f64,
    preserve_boundary_subsets: bool,
) -> Result<TetrahedralizeReport> {
    let volumes: Vec<_> = grid
        .volumes()
        .map(|(id, volume)| (id, volume.kind, volume.vertices.clone()))
        .collect();
    let quads: Vec<_> = grid
        .faces()
        .filter(|(_, face)| face.vertices.len() == 4)
        .map(|(id, face)| (id, face.vertices.clone(), face.subset))
        .collect();

    let mut tetrahedra = Vec::with_capacity(3 * volumes.len());
    for (id, kind, vertices) in volumes {
        match kind {
            VolumeKind::Tetrahedron => tetrahedra.push([vertices[0], vertices[1], vertices[2], vertices[3]]),
            VolumeKind::Prism => tetrahedra.extend(split_prism(&vertices)),
        }
        grid.remove_volume(id);
    }

    let mut worst = 0.0_f64;
    let mut above_quality_target = 0;
    for tet in &tetrahedra {
        let oriented = orient(grid, *tet)?;
        let ratio = radius_edge_ratio(&grid.points(&oriented)?);
        worst = worst.max(ratio);
        if ratio > quality {
            above_quality_target += 1;
        }
        grid.add_volume(VolumeKind::Tetrahedron, oriented.to_vec(), None)?;
    }

    for (quad, vertices, subset) in quads {
        let k = (0..4).min_by_key(|&i| vertices[i]).unwrap_or(0);
        let [p, q, r, s] = [0, 1, 2, 3].map(|i| vertices[(k + i) % 4]);
        if preserve_boundary_subsets {
            for half in [[p, q, r], [p, r, s]] {
                let face = grid
                    .find_face(&half)
                    .ok_or_else(|| KernelError::Tetrahedralization("quad half is missing".into()))?;
                grid.set_subset(Element::Face(face), subset)?;
            }
            let diagonal = grid
                .find_edge(p, r)
                .ok_or_else(|| KernelError::Tetrahedralization("quad diagonal is missing".into()))?;
            grid.set_subset(Element::Edge(diagonal), subset)?;
        }
        grid.remove_face(quad);
    }

    grid.reset_subsets(Dimension::Volume);
    if !preserve_boundary_subsets {
        for dimension in [Dimension::Vertex, Dimension::Edge, Dimension::Face] {
            grid.reset_subsets(dimension);
        }
    }

    let report = TetrahedralizeReport {
        tetrahedra: tetrahedra.len(),
        above_quality_target,
        worst_radius_edge_ratio: worst,
    };
    if above_quality_target > 0 {
        warn!(
            count = above_quality_target,
            worst, quality, "tetrahedra above the radius-edge quality target"
        );
    }
    info!(tetrahedra = report.tetrahedra, worst, "tetrahedralized volume mesh");
    Ok(report)
}

/// Splits a prism with the smallest vertex id as apex of all three tetrahedra.
fn split_prism(vertices: &[VertexId]) -> [[VertexId; 4]; 3] {
    let apex = (0..6).min_by_key(|&i| vertices[i]).unwrap_or(0);
    let w = ROTATIONS[apex].map(|i| vertices[i]);
    if w[1].min(w[5]) < w[2].min(w[4]) {
        [
            [w[0], w[1], w[2], w[5]],
            [w[0], w[1], w[5], w[4]],
            [w[0], w[4], w[5], w[3]],
        ]
    } else {
        [
            [w[0], w[1], w[2], w[4]],
            [w[0], w[4], w[2], w[5]],
            [w[0], w[4], w[5], w[3]],
        ]
    }
}

/// Reorders `tet` to positive orientation.
fn orient(grid: &Grid, tet: [VertexId; 4]) -> Result<[VertexId; 4]> {
    let [a, b, c, d] = tet;
    let volume = signed_volume(&grid.points(&tet)?);
    if volume.abs() < TOLERANCE {
        return Err(KernelError::Tetrahedralization(format!("degenerate tetrahedron (volume {volume:e})")).into());
    }
    Ok(if volume > 0.0 { tet } else { [a, b, d, c] })
}

fn signed_volume(p: &[Point3]) -> f64 {
    (p[1] - p[0]).dot(&(p[2] - p[0]).cross(&(p[3] - p[0]))) / 6.0
}

/// Circumradius over shortest edge; `sqrt(6) / 4` for a regular tetrahedron.
fn radius_edge_ratio(p: &[Point3]) -> f64 {
    let u = p[1] - p[0];
    let v = p[2] - p[0];
    let w = p[3] - p[0];
    let denominator = 2.0 * u.dot(&v.cross(&w));
    if denominator.abs() < f64::EPSILON {
        return f64::INFINITY;
    }
    let center = (u.norm_squared() * v.cross(&w) + v.norm_squared() * w.cross(&u) + w.norm_squared() * u.cross(&v))
        / denominator;
    let shortest = VolumeKind::Tetrahedron
        .local_edges()
        .iter()
        .map(|[i, j]| (p[*i] - p[*j]).norm())
        .fold(f64::INFINITY, f64::min);
    center.norm() / shortest
}
