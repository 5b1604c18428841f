//! Final subset names, order and display colors.

mod palette;

use std::fmt;

use tracing::{debug, warn};

use crate::grid::{Dimension, Grid, SubsetIndex};
use crate::plan::{SubsetNumbering, SubsetRole};

pub use palette::{palette_color, Rgba};

/// One subset of the finished mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct SubsetInfo {
    pub name: String,
    pub role: SubsetRole,
    pub color: Rgba,
}

/// Element counts of one subset, lowest dimension first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetSummary {
    pub index: SubsetIndex,
    pub name: String,
    pub counts: [usize; 4],
}

impl SubsetSummary {
    #[must_use]
    pub fn count(&self, dimension: Dimension) -> usize {
        self.counts[dimension_slot(dimension)]
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl fmt::Display for SubsetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [v, e, fa, vo] = self.counts;
        write!(
            f,
            "{:>3} {:<32} vertices {v:>7} edges {e:>7} faces {fa:>7} volumes {vo:>7}",
            self.index, self.name
        )
    }
}

/// Name and color of every subset index, seeded from the plan's numbering.
#[derive(Debug, Clone, PartialEq)]
pub struct SubsetCatalog {
    subsets: Vec<SubsetInfo>,
    depot_renamed: bool,
}

impl SubsetCatalog {
    #[must_use]
    pub fn from_numbering(numbering: &SubsetNumbering) -> Self {
        let subsets = numbering
            .entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| SubsetInfo {
                name: entry.name.clone(),
                role: entry.role,
                color: palette_color(index),
            })
            .collect();
        Self {
            subsets,
            depot_renamed: false,
        }
    }

    #[must_use]
    pub fn subsets(&self) -> &[SubsetInfo] {
        &self.subsets
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subsets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subsets.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: SubsetIndex) -> Option<&SubsetInfo> {
        self.subsets.get(index)
    }

    #[must_use]
    pub fn name(&self, index: SubsetIndex) -> Option<&str> {
        self.get(index).map(|info| info.name.as_str())
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<SubsetIndex> {
        self.subsets.iter().position(|info| info.name == name)
    }

    /// Renames the depot subsets to "`<name>` Boundary" and "`<name>` Inner".
    ///
    /// Happens at most once, and only when the mesh has both a populated shell
    /// and a populated inner subset. Returns whether the names changed.
    pub fn rename_depot(&mut self, grid: &Grid) -> bool {
        if self.depot_renamed {
            return false;
        }
        let position = |role: SubsetRole| self.subsets.iter().position(|info| info.role == role);
        let (Some(shell), Some(inner)) = (position(SubsetRole::InjectionShell), position(SubsetRole::InjectionInner))
        else {
            return false;
        };
        let counts = element_counts(grid, self.subsets.len());
        let populated = |index: usize| counts[index].iter().sum::<usize>() > 0;
        if !populated(shell) || !populated(inner) {
            return false;
        }

        let base = self.subsets[shell].name.clone();
        self.subsets[shell].name = format!("{base} Boundary");
        self.subsets[inner].name = format!("{base} Inner");
        self.depot_renamed = true;
        debug!(shell = %self.subsets[shell].name, inner = %self.subsets[inner].name, "renamed depot subsets");
        true
    }

    /// Drops subsets without elements and renumbers the rest contiguously,
    /// keeping their order. Colors follow the new positions. Returns the
    /// number of subsets dropped; a second call finds nothing to do.
    pub fn cleanup(&mut self, grid: &mut Grid) -> usize {
        let counts = element_counts(grid, self.subsets.len());
        let mut remap = vec![None; self.subsets.len()];
        let mut kept = Vec::with_capacity(self.subsets.len());
        for (old, info) in self.subsets.drain(..).enumerate() {
            if counts[old].iter().sum::<usize>() == 0 {
                warn!(subset = %info.name, "dropping empty subset");
                continue;
            }
            remap[old] = Some(kept.len());
            kept.push(info);
        }
        let dropped = remap.len() - kept.len();

        for (index, info) in kept.iter_mut().enumerate() {
            info.color = palette_color(index);
        }
        self.subsets = kept;
        if dropped > 0 {
            grid.remap_subsets(|old| remap.get(old).copied().flatten());
        }
        dropped
    }

    /// Element counts per subset.
    #[must_use]
    pub fn summary(&self, grid: &Grid) -> Vec<SubsetSummary> {
        let counts = element_counts(grid, self.subsets.len());
        self.subsets
            .iter()
            .zip(counts)
            .enumerate()
            .map(|(index, (info, counts))| SubsetSummary {
                index,
                name: info.name.clone(),
                counts,
            })
            .collect()
    }
}

fn dimension_slot(dimension: Dimension) -> usize {
    match dimension {
        Dimension::Vertex => 0,
        Dimension::Edge => 1,
        Dimension::Face => 2,
        Dimension::Volume => 3,
    }
}

/// Per-subset element counts; indices past `len` are ignored.
fn element_counts(grid: &Grid, len: usize) -> Vec<[usize; 4]> {
    let mut counts = vec![[0; 4]; len];
    let mut tally = |subset: Option<SubsetIndex>, dimension| {
        if let Some(slot) = subset.and_then(|s| counts.get_mut(s)) {
            slot[dimension_slot(dimension)] += 1;
        }
    };
    grid.vertices().for_each(|(_, v)| tally(v.subset, Dimension::Vertex));
    grid.edges().for_each(|(_, e)| tally(e.subset, Dimension::Edge));
    grid.faces().for_each(|(_, f)| tally(f.subset, Dimension::Face));
    grid.volumes().for_each(|(_, v)| tally(v.subset, Dimension::Volume));
    counts
}
