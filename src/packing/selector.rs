//! Per-space size-class selection.
//!
//! For one space size, every slot size is scored by its worst-case packing
//! count. Many slot sizes share a count; of those only the largest is worth
//! offering, since callers get more bytes for the same packing guarantee.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::{ConfigurationError, Result};
use super::simulator::worst_case;
use super::space::validate_space;

/// The best slot size for each achievable worst-case packing count in one
/// space size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTable {
    space_size: usize,
    /// worst-case count -> largest slot size achieving it
    entries: BTreeMap<usize, usize>,
}

impl CandidateTable {
    fn new(space_size: usize) -> Self {
        Self {
            space_size,
            entries: BTreeMap::new(),
        }
    }

    /// Records `slot_size` as achieving `worst_case`, keeping the larger slot
    /// on a tie.
    fn offer(&mut self, worst_case: usize, slot_size: usize) {
        let slot = self.entries.entry(worst_case).or_insert(slot_size);
        *slot = (*slot).max(slot_size);
    }

    /// The space size this table was computed for.
    pub const fn space_size(&self) -> usize {
        self.space_size
    }

    /// The retained slot size for a worst-case count, if that count is achievable.
    pub fn get(&self, worst_case: usize) -> Option<usize> {
        self.entries.get(&worst_case).copied()
    }

    /// Number of retained candidates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no candidate was retained.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(slot_size, worst_case)` pairs in ascending slot-size order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (usize, usize)> + '_ {
        // Larger slots pack fewer per instance, so descending count order is
        // ascending slot order.
        self.entries
            .iter()
            .rev()
            .map(|(&worst_case, &slot_size)| (slot_size, worst_case))
    }

    /// Retained slot sizes in ascending order.
    pub fn slot_sizes(&self) -> Vec<usize> {
        self.iter().map(|(slot_size, _)| slot_size).collect()
    }

    /// Whether `slot_size` was retained.
    pub fn contains_slot(&self, slot_size: usize) -> bool {
        self.entries.values().any(|&slot| slot == slot_size)
    }
}

/// Selects candidates among every slot size from 1 to `space_size`.
///
/// # Errors
/// A [`ConfigurationError`] if `space_size` is zero or too large.
///
/// # Example
/// ```
/// use slabfit::select;
///
/// let table = select(64).unwrap();
/// assert_eq!(table.get(3), Some(21));
/// assert_eq!(table.get(1), Some(64));
/// ```
pub fn select(space_size: usize) -> Result<CandidateTable> {
    select_up_to(space_size, space_size)
}

/// Selects candidates among slot sizes from 1 to `max_slot_size`, clamped to
/// `space_size`.
///
/// # Errors
/// A [`ConfigurationError`] if `space_size` is zero or too large, or if
/// `max_slot_size` is zero.
pub fn select_up_to(space_size: usize, max_slot_size: usize) -> Result<CandidateTable> {
    validate_space(space_size)?;
    if max_slot_size == 0 {
        return Err(ConfigurationError::ZeroSlotCap.into());
    }
    let max_slot_size = max_slot_size.min(space_size);

    let mut table = CandidateTable::new(space_size);

    // Slot sizes are visited in strides that share the same packing floor
    // (space_size / slot). Within a stride the worst case cannot rise with
    // the slot size, so the stride's largest slot is the only one that can
    // be retained and is the only one simulated.
    let mut slot_size = 1;
    while slot_size <= max_slot_size {
        let floor = space_size / slot_size;
        let stride_end = (space_size / floor).min(max_slot_size);
        table.offer(worst_case(stride_end, space_size)?, stride_end);
        slot_size = stride_end + 1;
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        space_size,
        max_slot_size,
        candidates = table.len(),
        "selected size-class candidates"
    );

    Ok(table)
}
