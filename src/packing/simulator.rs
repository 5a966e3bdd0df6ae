//! Packing simulation for one slot size in one space size.
//!
//! Slots of a single size are laid end to end from offset zero across an
//! unbounded run of equally sized space instances (cache lines, pages). A
//! slot belongs to the instance its first byte lands in; when it runs past
//! the far boundary the overhang is carried into the next instance, which
//! then begins its own first slot at that carry offset. The carry offset is
//! always smaller than the slot size, so it can only take finitely many
//! values and the layout is periodic. The simulation walks one full period
//! and reports the fewest slots any instance received.

use super::error::{Result, SizeClassError};
use super::space::MAX_SPACE_SIZE;

/// What one space instance received during the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceRecord {
    /// Offset of the first slot that begins in this instance.
    ///
    /// Zero for a clean start, otherwise the bytes occupied by the split
    /// slot carried over from the previous instance.
    pub first_offset: usize,
    /// Number of slots beginning in this instance.
    pub packed: usize,
    /// Whether the last of those slots runs past the far boundary.
    pub straddles: bool,
}

impl InstanceRecord {
    /// Slots lying entirely inside this instance.
    pub fn contained(&self) -> usize {
        self.packed - usize::from(self.straddles)
    }
}

/// The outcome of simulating one full cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packing {
    slot_size: usize,
    space_size: usize,
    instances: Vec<InstanceRecord>,
    worst_case: usize,
}

impl Packing {
    /// The simulated slot size.
    pub const fn slot_size(&self) -> usize {
        self.slot_size
    }

    /// The simulated space size.
    pub const fn space_size(&self) -> usize {
        self.space_size
    }

    /// Every instance visited in one cycle, in placement order.
    pub fn instances(&self) -> &[InstanceRecord] {
        &self.instances
    }

    /// Packing count of each instance in the cycle.
    pub fn counts(&self) -> impl Iterator<Item = usize> + '_ {
        self.instances.iter().map(|record| record.packed)
    }

    /// The fewest slots any instance of the cycle received.
    pub const fn worst_case(&self) -> usize {
        self.worst_case
    }

    /// The most slots any instance of the cycle received.
    pub fn best_case(&self) -> usize {
        self.counts().max().unwrap_or(0)
    }

    /// Number of instances before the layout repeats.
    pub fn cycle_len(&self) -> usize {
        self.instances.len()
    }

    /// Number of slots placed during one cycle.
    pub fn slots_per_cycle(&self) -> usize {
        self.counts().sum()
    }

    /// The fewest slots lying entirely inside any one instance.
    pub fn worst_contained(&self) -> usize {
        self.instances
            .iter()
            .map(InstanceRecord::contained)
            .min()
            .unwrap_or(0)
    }
}

/// Walks space instances one at a time until a carry offset repeats.
struct InstanceWalk {
    slot_size: usize,
    space_size: usize,
    offset: usize,
    started: bool,
}

impl InstanceWalk {
    fn new(slot_size: usize, space_size: usize) -> Self {
        Self {
            slot_size,
            space_size,
            offset: 0,
            started: false,
        }
    }
}

impl Iterator for InstanceWalk {
    type Item = InstanceRecord;

    fn next(&mut self) -> Option<InstanceRecord> {
        // Each step subtracts space_size mod slot_size from the carry, a
        // rotation of [0, slot_size): the first offset to repeat is the start.
        if self.started && self.offset == 0 {
            return None;
        }
        self.started = true;

        // Slots inside one instance are contiguous: every slot starting in
        // [offset, space_size) belongs here.
        let first_offset = self.offset;
        let packed = (self.space_size - first_offset).div_ceil(self.slot_size);
        let end = first_offset + packed * self.slot_size;

        let record = InstanceRecord {
            first_offset,
            packed,
            straddles: end > self.space_size,
        };

        self.offset = end - self.space_size;
        Some(record)
    }
}

fn check_sizes(slot_size: usize, space_size: usize) -> Result<()> {
    if slot_size == 0 || slot_size > space_size || space_size > MAX_SPACE_SIZE {
        return Err(SizeClassError::InvalidSize {
            slot_size,
            space_size,
        });
    }
    Ok(())
}

/// Simulates one full cycle of `slot_size`-byte slots packed into
/// `space_size`-byte instances.
///
/// The cycle visits `slot_size / gcd(slot_size, space_size)` instances, so
/// this is intended for cache-line and page-sized inputs. Use
/// [`worst_case`] when only the packing floor is needed.
///
/// # Errors
/// [`SizeClassError::InvalidSize`] unless `1 <= slot_size <= space_size`
/// and `space_size <= MAX_SPACE_SIZE`.
///
/// # Example
/// ```
/// use slabfit::simulate;
///
/// let packing = simulate(21, 64).unwrap();
/// assert_eq!(packing.worst_case(), 3);
/// assert_eq!(packing.cycle_len(), 21);
/// ```
pub fn simulate(slot_size: usize, space_size: usize) -> Result<Packing> {
    check_sizes(slot_size, space_size)?;

    let instances: Vec<InstanceRecord> = InstanceWalk::new(slot_size, space_size).collect();
    let worst_case = instances
        .iter()
        .map(|record| record.packed)
        .min()
        .unwrap_or(0);

    #[cfg(feature = "tracing")]
    tracing::trace!(
        slot_size,
        space_size,
        cycle_len = instances.len(),
        worst_case,
        "simulated packing cycle"
    );

    Ok(Packing {
        slot_size,
        space_size,
        instances,
        worst_case,
    })
}

/// The worst-case packing count of `slot_size` in `space_size`, without
/// recording the cycle.
///
/// Returns the same value as `simulate(slot_size, space_size)?.worst_case()`.
///
/// # Errors
/// [`SizeClassError::InvalidSize`] unless `1 <= slot_size <= space_size`
/// and `space_size <= MAX_SPACE_SIZE`.
pub fn worst_case(slot_size: usize, space_size: usize) -> Result<usize> {
    check_sizes(slot_size, space_size)?;

    // Any run of space_size bytes holds at least this many slot starts, so
    // the walk can stop once an instance reaches it.
    let floor = space_size / slot_size;
    let mut worst = usize::MAX;
    for record in InstanceWalk::new(slot_size, space_size) {
        worst = worst.min(record.packed);
        if worst == floor {
            break;
        }
    }
    Ok(worst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packing::space::HUGE_PAGE_2M;

    #[test]
    fn test_exact_divisor_single_instance() {
        let packing = simulate(16, 64).unwrap();
        assert_eq!(packing.cycle_len(), 1);
        assert_eq!(packing.instances()[0].first_offset, 0);
        assert_eq!(packing.instances()[0].packed, 4);
        assert!(!packing.instances()[0].straddles);
        assert_eq!(packing.worst_case(), 4);
    }

    #[test]
    fn test_carry_offsets() {
        // 48-byte slots in 64-byte lines: 0,48 | 32 | 16 | back to 0.
        let packing = simulate(48, 64).unwrap();
        let offsets: Vec<usize> = packing.instances().iter().map(|r| r.first_offset).collect();
        assert_eq!(offsets, vec![0, 32, 16]);
        assert_eq!(packing.counts().collect::<Vec<_>>(), vec![2, 1, 1]);
        assert_eq!(packing.worst_case(), 1);
        assert_eq!(packing.best_case(), 2);
        assert!(!packing.instances()[2].straddles);
    }

    #[test]
    fn test_split_slot_not_contained() {
        let packing = simulate(63, 64).unwrap();
        assert_eq!(packing.worst_case(), 1);
        assert_eq!(packing.worst_contained(), 0);
        assert_eq!(packing.instances()[1].first_offset, 62);
        assert_eq!(packing.instances()[1].contained(), 0);
    }

    #[test]
    fn test_huge_page_full_cycle() {
        // Carry drops by one byte per page, so every offset below the slot
        // size is visited once before the cycle closes.
        let slot = HUGE_PAGE_2M - 1;
        let packing = simulate(slot, HUGE_PAGE_2M).unwrap();
        assert_eq!(packing.cycle_len(), slot);
        assert_eq!(packing.slots_per_cycle(), HUGE_PAGE_2M);
        assert_eq!(packing.worst_case(), 1);
        assert_eq!(packing.best_case(), 2);
        assert_eq!(worst_case(slot, HUGE_PAGE_2M).unwrap(), 1);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert_eq!(
            simulate(0, 64),
            Err(SizeClassError::InvalidSize { slot_size: 0, space_size: 64 })
        );
        assert_eq!(
            worst_case(65, 64),
            Err(SizeClassError::InvalidSize { slot_size: 65, space_size: 64 })
        );
    }
}
