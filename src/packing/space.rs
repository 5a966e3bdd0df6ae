//! Space sizes: the fixed-size containers slots are packed into.
//!
//! Two kinds of space matter to a slab allocator. Cache lines (and the
//! double lines pulled in by adjacent-line prefetchers) decide how many
//! small objects share a line, and virtual-memory pages decide how many
//! objects a single TLB entry covers. Data-cache capacities are included
//! as an optional third family for comparison.

use serde::{Deserialize, Serialize};

use super::error::ConfigurationError;

/// L1/L2 cache line on every mainstream 64-bit CPU.
pub const CACHE_LINE: usize = 64;
/// Cache line on some Apple cores, or a 64-byte line plus its prefetched neighbour.
pub const DOUBLE_CACHE_LINE: usize = 128;
/// A 128-byte line plus one adjacent-line prefetch.
pub const PREFETCH_PAIR: usize = 256;

/// Base page on Linux, Windows and macOS on x86-64.
pub const PAGE_4K: usize = 4 * 1024;
/// Base page on 64-bit ARM (Apple silicon, some Linux configurations).
pub const PAGE_16K: usize = 16 * 1024;
/// Linux huge page.
pub const HUGE_PAGE_2M: usize = 2 * 1024 * 1024;
/// Linux gigantic page.
pub const GIGANTIC_PAGE_1G: usize = 1024 * 1024 * 1024;

/// Largest space size accepted. Offsets never exceed twice the space size.
pub const MAX_SPACE_SIZE: usize = usize::MAX / 2;

/// Cache-line granularities, smallest first.
pub const CACHE_LINE_SPACES: [usize; 3] = [CACHE_LINE, DOUBLE_CACHE_LINE, PREFETCH_PAIR];

/// Page granularities, smallest first.
pub const PAGE_SPACES: [usize; 4] = [PAGE_4K, PAGE_16K, HUGE_PAGE_2M, GIGANTIC_PAGE_1G];

/// Typical data-cache capacities.
pub const DATA_CACHE_SPACES: [usize; 7] = [
    32 * 1024,
    64 * 1024,
    128 * 1024,
    4 * 1024 * 1024,
    8 * 1024 * 1024,
    12 * 1024 * 1024,
    16 * 1024 * 1024,
];

/// A named family of space sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpaceFamily {
    /// Cache lines and prefetch units only.
    CacheLines,
    /// Virtual-memory pages only.
    Pages,
    /// Cache lines followed by pages.
    #[default]
    CacheLinesAndPages,
    /// Cache lines, pages and data-cache capacities.
    WithDataCaches,
}

impl SpaceFamily {
    /// Every named family.
    pub const ALL: [SpaceFamily; 4] = [
        SpaceFamily::CacheLines,
        SpaceFamily::Pages,
        SpaceFamily::CacheLinesAndPages,
        SpaceFamily::WithDataCaches,
    ];

    /// The space sizes of this family in ascending order.
    pub fn spaces(self) -> Vec<usize> {
        let mut spaces = Vec::new();
        match self {
            SpaceFamily::CacheLines => spaces.extend(CACHE_LINE_SPACES),
            SpaceFamily::Pages => spaces.extend(PAGE_SPACES),
            SpaceFamily::CacheLinesAndPages => {
                spaces.extend(CACHE_LINE_SPACES);
                spaces.extend(PAGE_SPACES);
            }
            SpaceFamily::WithDataCaches => {
                spaces.extend(CACHE_LINE_SPACES);
                spaces.extend(PAGE_SPACES);
                spaces.extend(DATA_CACHE_SPACES);
                spaces.sort_unstable();
            }
        }
        spaces
    }

    /// The kebab-case name used in configuration files and on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            SpaceFamily::CacheLines => "cache-lines",
            SpaceFamily::Pages => "pages",
            SpaceFamily::CacheLinesAndPages => "cache-lines-and-pages",
            SpaceFamily::WithDataCaches => "with-data-caches",
        }
    }
}

impl core::fmt::Display for SpaceFamily {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Checks that a single space size is usable.
///
/// # Errors
/// `ZeroSpace` for zero, `SpaceTooLarge` above [`MAX_SPACE_SIZE`].
pub const fn validate_space(space_size: usize) -> Result<(), ConfigurationError> {
    if space_size == 0 {
        return Err(ConfigurationError::ZeroSpace);
    }
    if space_size > MAX_SPACE_SIZE {
        return Err(ConfigurationError::SpaceTooLarge(space_size));
    }
    Ok(())
}

/// Renders a byte count with binary units (`64 B`, `4.0 KiB`) for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteSize(pub usize);

impl core::fmt::Display for ByteSize {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let bytes = u64::try_from(self.0).unwrap_or(u64::MAX);
        f.write_str(&bytesize::ByteSize::b(bytes).to_string_as(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_families_are_ascending() {
        for family in SpaceFamily::ALL {
            let spaces = family.spaces();
            assert!(!spaces.is_empty());
            assert!(spaces.windows(2).all(|w| w[0] < w[1]), "{family}: {spaces:?}");
        }
    }

    #[test]
    fn test_byte_size_display() {
        assert_eq!(ByteSize(64).to_string(), "64 B");
        assert_eq!(ByteSize(1023).to_string(), "1023 B");
        assert_eq!(ByteSize(PAGE_4K).to_string(), "4.0 KiB");
        assert_eq!(ByteSize(1536).to_string(), "1.5 KiB");
        assert_eq!(ByteSize(HUGE_PAGE_2M).to_string(), "2.0 MiB");
        assert_eq!(ByteSize(GIGANTIC_PAGE_1G).to_string(), "1.0 GiB");
    }

    #[test]
    fn test_validate_space() {
        assert_eq!(validate_space(64), Ok(()));
        assert_eq!(validate_space(0), Err(ConfigurationError::ZeroSpace));
        assert_eq!(
            validate_space(usize::MAX),
            Err(ConfigurationError::SpaceTooLarge(usize::MAX))
        );
    }
}
