use std::fmt;

use crate::grid::SubsetIndex;

/// What a subset stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubsetRole {
    /// Material of one layer.
    Layer,
    /// The depot; once an inner region exists, only its shell.
    InjectionShell,
    /// The depot interior, present only with an inner boundary.
    InjectionInner,
    /// Outer boundary of the whole mesh.
    Surface,
}

impl fmt::Display for SubsetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Layer => "layer",
            Self::InjectionShell => "injection shell",
            Self::InjectionInner => "injection inner",
            Self::Surface => "surface",
        };
        f.write_str(name)
    }
}

/// One subset slot in the numbering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetEntry {
    pub name: String,
    pub role: SubsetRole,
    /// Stack position of the layer the subset belongs to.
    pub layer: Option<usize>,
}

/// Name and role of every subset index, in index order.
///
/// Built once per run; classification and the catalog read it and never
/// number subsets on their own.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubsetNumbering {
    entries: Vec<SubsetEntry>,
}

impl SubsetNumbering {
    pub(super) fn push(&mut self, name: impl Into<String>, role: SubsetRole, layer: Option<usize>) -> SubsetIndex {
        self.entries.push(SubsetEntry {
            name: name.into(),
            role,
            layer,
        });
        self.entries.len() - 1
    }

    #[must_use]
    pub fn entries(&self) -> &[SubsetEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: SubsetIndex) -> Option<&SubsetEntry> {
        self.entries.get(index)
    }

    /// First index bound to `name`.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<SubsetIndex> {
        self.entries.iter().position(|entry| entry.name == name)
    }

    /// First index with `role`.
    #[must_use]
    pub fn index_of_role(&self, role: SubsetRole) -> Option<SubsetIndex> {
        self.entries.iter().position(|entry| entry.role == role)
    }

    /// The reserved outer-surface index, always the last one.
    #[must_use]
    pub fn surface(&self) -> Option<SubsetIndex> {
        self.entries
            .last()
            .filter(|entry| entry.role == SubsetRole::Surface)
            .map(|_| self.entries.len() - 1)
    }
}
