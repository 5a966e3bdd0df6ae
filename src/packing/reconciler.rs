//! Merging per-space candidates into one size-class table.
//!
//! Each space size in a family is selected independently and the retained
//! slot sizes are unioned. A class that is the best fit for a 64-byte line
//! stays a useful bucket even where a 4 KiB page would not single it out.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::error::{ConfigurationError, Result};
use super::selector::{select_up_to, CandidateTable};
use super::space::{validate_space, SpaceFamily};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Inputs to a reconciliation.
///
/// Explicit `space_sizes` take precedence over `family`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcileConfig {
    /// A named family to use when `space_sizes` is empty.
    pub family: Option<SpaceFamily>,
    /// Space sizes in bytes.
    pub space_sizes: Vec<usize>,
    /// Largest slot size swept for any space.
    pub max_slot_size: Option<usize>,
}

impl ReconcileConfig {
    /// A configuration over explicit space sizes.
    pub fn new(space_sizes: impl Into<Vec<usize>>) -> Self {
        Self {
            family: None,
            space_sizes: space_sizes.into(),
            max_slot_size: None,
        }
    }

    /// A configuration over a named family.
    pub fn for_family(family: SpaceFamily) -> Self {
        Self {
            family: Some(family),
            space_sizes: Vec::new(),
            max_slot_size: None,
        }
    }

    /// Caps the slot sizes swept for every space.
    #[must_use]
    pub fn with_max_slot_size(mut self, max_slot_size: usize) -> Self {
        self.max_slot_size = Some(max_slot_size);
        self
    }

    /// The space sizes this configuration resolves to.
    pub fn spaces(&self) -> Vec<usize> {
        if self.space_sizes.is_empty() {
            self.family.map(SpaceFamily::spaces).unwrap_or_default()
        } else {
            self.space_sizes.clone()
        }
    }

    /// Checks the configuration without doing any selection work.
    ///
    /// # Errors
    /// The first [`ConfigurationError`] found.
    pub fn validate(&self) -> core::result::Result<(), ConfigurationError> {
        let spaces = self.spaces();
        if spaces.is_empty() {
            return Err(ConfigurationError::EmptyFamily);
        }
        for &space_size in &spaces {
            validate_space(space_size)?;
        }
        if self.max_slot_size == Some(0) {
            return Err(ConfigurationError::ZeroSlotCap);
        }
        Ok(())
    }

    /// Reconciles the configured family into a size-class table.
    ///
    /// # Errors
    /// A [`ConfigurationError`] if the configuration is invalid.
    pub fn reconcile(&self) -> Result<SizeClassTable> {
        self.reconcile_with_candidates().map(|(table, _)| table)
    }

    /// Like [`reconcile`](Self::reconcile), also returning the per-space
    /// candidate tables in family order.
    ///
    /// # Errors
    /// A [`ConfigurationError`] if the configuration is invalid.
    pub fn reconcile_with_candidates(&self) -> Result<(SizeClassTable, Vec<CandidateTable>)> {
        self.validate()?;
        let spaces = self.spaces();
        let cap = self.max_slot_size;
        let select_one = |&space_size: &usize| select_up_to(space_size, cap.unwrap_or(space_size));

        #[cfg(feature = "parallel")]
        let candidates: Vec<CandidateTable> = spaces.par_iter().map(select_one).collect::<Result<_>>()?;
        #[cfg(not(feature = "parallel"))]
        let candidates: Vec<CandidateTable> = spaces.iter().map(select_one).collect::<Result<_>>()?;

        let classes: BTreeSet<usize> = candidates
            .iter()
            .flat_map(CandidateTable::slot_sizes)
            .collect();
        let table = SizeClassTable {
            classes: classes.into_iter().collect(),
        };

        #[cfg(feature = "tracing")]
        tracing::info!(
            spaces = spaces.len(),
            classes = table.len(),
            largest = table.as_slice().last().copied().unwrap_or(0),
            "reconciled size classes"
        );

        Ok((table, candidates))
    }
}

/// Reconciles `space_sizes` into a size-class table, sweeping every slot
/// size up to each space size.
///
/// # Errors
/// A [`ConfigurationError`] if `space_sizes` is empty or holds an unusable size.
///
/// # Example
/// ```
/// use slabfit::reconcile;
///
/// let table = reconcile(&[64]).unwrap();
/// assert_eq!(table.as_slice(), &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 12, 16, 21, 32, 64]);
/// ```
pub fn reconcile(space_sizes: &[usize]) -> Result<SizeClassTable> {
    ReconcileConfig::new(space_sizes).reconcile()
}

/// A strictly increasing list of slot sizes for an allocator to serve.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SizeClassTable {
    classes: Vec<usize>,
}

impl SizeClassTable {
    /// The classes in ascending order.
    pub fn as_slice(&self) -> &[usize] {
        &self.classes
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the table has no classes.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterates the classes in ascending order.
    pub fn iter(&self) -> core::slice::Iter<'_, usize> {
        self.classes.iter()
    }

    /// The smallest class that can hold `request` bytes.
    ///
    /// Returns `None` when `request` is larger than every class.
    pub fn class_for(&self, request: usize) -> Option<usize> {
        let idx = self.classes.partition_point(|&class| class < request);
        self.classes.get(idx).copied()
    }

    /// Position of `size` in the table, if it is a class.
    pub fn index_of(&self, size: usize) -> Option<usize> {
        self.classes.binary_search(&size).ok()
    }

    /// The classes no larger than `max`.
    #[must_use]
    pub fn restricted_to(&self, max: usize) -> SizeClassTable {
        let end = self.classes.partition_point(|&class| class <= max);
        SizeClassTable {
            classes: self.classes[..end].to_vec(),
        }
    }

    /// Whether every class of `other` is also a class here.
    pub fn is_superset_of(&self, other: &SizeClassTable) -> bool {
        other.iter().all(|&class| self.index_of(class).is_some())
    }

    /// Classes present here but not in `other`, ascending.
    pub fn difference(&self, other: &SizeClassTable) -> Vec<usize> {
        self.iter()
            .copied()
            .filter(|&class| other.index_of(class).is_none())
            .collect()
    }

    /// Renders the table as a Rust constant array.
    pub fn to_rust_const(&self, name: &str) -> String {
        let mut out = format!("pub const {name}: [usize; {}] = [\n", self.classes.len());
        for class in &self.classes {
            out.push_str("    ");
            out.push_str(&class.to_string());
            out.push_str(",\n");
        }
        out.push_str("];\n");
        out
    }
}

impl core::fmt::Display for SizeClassTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, class) in self.classes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{class}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a SizeClassTable {
    type Item = &'a usize;
    type IntoIter = core::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<SizeClassTable> for Vec<usize> {
    fn from(table: SizeClassTable) -> Self {
        table.classes
    }
}
