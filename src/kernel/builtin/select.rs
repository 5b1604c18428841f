use std::collections::{BTreeSet, VecDeque};

use nalgebra::Matrix3;

use crate::error::{KernelError, Result};
use crate::grid::{Adjacency, Dimension, Grid, Selection, VolumeId, VolumeKind};
use crate::kernel::FloodBarrier;
use crate::math::{CylinderRegion, Point3};

/// Slack on barycentric coordinates when locating a seed.
const CONTAINMENT_EPS: f64 = 1e-9;

// Any split of a prism covers it; this one is only used for point location.
const PRISM_SPLIT: [[usize; 4]; 3] = [[0, 1, 2, 5], [0, 1, 5, 4], [0, 4, 5, 3]];

/// Elements of `dimension` whose centroid lies in `region`.
pub(super) fn in_cylinder(grid: &Grid, dimension: Dimension, region: &CylinderRegion) -> Result<Selection> {
    let mut selection = Selection::new();
    for element in grid.elements(dimension) {
        if region.contains(&grid.centroid(element)?) {
            selection.insert(element);
        }
    }
    Ok(selection)
}

/// Breadth-first walk over face neighbours, starting at the volume holding
/// `seed`. Returns volumes only.
pub(super) fn flood_fill(grid: &Grid, seed: &Point3, stop: &FloodBarrier<'_>) -> Result<Selection> {
    let start = locate(grid, seed)?.ok_or(KernelError::SeedOutsideMesh {
        x: seed.x,
        y: seed.y,
        z: seed.z,
    })?;
    let adjacency = Adjacency::build(grid)?;

    let mut visited = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(volume) = queue.pop_front() {
        for &face in adjacency.volume_faces(volume) {
            let Some(next) = adjacency.neighbor_across(volume, face) else {
                continue;
            };
            if visited.contains(&next) || stop(grid, face, next) {
                continue;
            }
            visited.insert(next);
            queue.push_back(next);
        }
    }

    Ok(Selection {
        volumes: visited,
        ..Selection::default()
    })
}

/// First volume, in arena order, containing `point`.
fn locate(grid: &Grid, point: &Point3) -> Result<Option<VolumeId>> {
    for (id, volume) in grid.volumes() {
        let corners = grid.points(&volume.vertices)?;
        let inside = match volume.kind {
            VolumeKind::Tetrahedron => in_tetrahedron(point, [corners[0], corners[1], corners[2], corners[3]]),
            VolumeKind::Prism => PRISM_SPLIT
                .iter()
                .any(|t| in_tetrahedron(point, t.map(|i| corners[i]))),
        };
        if inside {
            return Ok(Some(id));
        }
    }
    Ok(None)
}

fn in_tetrahedron(point: &Point3, [a, b, c, d]: [Point3; 4]) -> bool {
    let basis = Matrix3::from_columns(&[b - a, c - a, d - a]);
    let Some(inverse) = basis.try_inverse() else {
        return false;
    };
    let l = inverse * (point - a);
    l.x >= -CONTAINMENT_EPS
        && l.y >= -CONTAINMENT_EPS
        && l.z >= -CONTAINMENT_EPS
        && l.x + l.y + l.z <= 1.0 + CONTAINMENT_EPS
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::grid::{Element, FaceId, VolumeId};
    use crate::math::AxisSegment;

    /// Column of `n` unit prisms stacked along z.
    fn column(n: usize) -> (Grid, Vec<VolumeId>) {
        let mut grid = Grid::new();
        let mut ring: Vec<_> = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]
            .into_iter()
            .map(|(x, y)| grid.add_vertex(Point3::new(x, y, 0.0), None))
            .collect();
        let mut volumes = Vec::new();
        for level in 1..=n {
            #[allow(clippy::cast_precision_loss)]
            let z = level as f64;
            let top: Vec<_> = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]
                .into_iter()
                .map(|(x, y)| grid.add_vertex(Point3::new(x, y, z), None))
                .collect();
            let mut prism = ring.clone();
            prism.extend_from_slice(&top);
            volumes.push(grid.add_volume(VolumeKind::Prism, prism, None).unwrap());
            ring = top;
        }
        (grid, volumes)
    }

    #[test]
    fn locates_seed_in_prism() {
        let (grid, volumes) = column(3);
        let found = locate(&grid, &Point3::new(0.2, 0.2, 1.5)).unwrap();
        assert_eq!(found, Some(volumes[1]));
        assert_eq!(locate(&grid, &Point3::new(2.0, 2.0, 1.5)).unwrap(), None);
    }

    #[test]
    fn flood_fill_reaches_whole_column() {
        let (grid, _) = column(4);
        let never = |_: &Grid, _: FaceId, _: VolumeId| false;
        let filled = flood_fill(&grid, &Point3::new(0.2, 0.2, 0.5), &never).unwrap();
        assert_eq!(filled.volumes.len(), 4);
        assert!(filled.faces.is_empty());
    }

    #[test]
    fn flood_fill_stops_at_barrier() {
        let (grid, volumes) = column(4);
        let blocked = volumes[2];
        let stop = move |_: &Grid, _: FaceId, next: VolumeId| next == blocked;
        let filled = flood_fill(&grid, &Point3::new(0.2, 0.2, 0.5), &stop).unwrap();
        assert_eq!(filled.volumes.len(), 2);
    }

    #[test]
    fn seed_outside_fails() {
        let (grid, _) = column(1);
        let never = |_: &Grid, _: FaceId, _: VolumeId| false;
        let result = flood_fill(&grid, &Point3::new(0.2, 0.2, 5.0), &never);
        assert!(result.is_err());
    }

    #[test]
    fn cylinder_selects_by_centroid() {
        let (grid, volumes) = column(3);
        let axis = AxisSegment::new(Point3::new(0.0, 0.0, 0.0), 1.0, 2.0);
        let region = CylinderRegion::new(axis, 1.0);
        let selected = in_cylinder(&grid, Dimension::Volume, &region).unwrap();
        assert_eq!(selected.volumes.len(), 1);
        assert!(selected.iter().all(|e| e == Element::Volume(volumes[1])));
    }
}
