//! Error types for size-class generation.

/// Why a space-size family was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationError {
    /// No space sizes were supplied.
    EmptyFamily,
    /// A space size of zero bytes.
    ZeroSpace,
    /// A space size too large for offset arithmetic to stay in range.
    SpaceTooLarge(usize),
    /// A slot-size cap of zero bytes.
    ZeroSlotCap,
}

impl core::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::EmptyFamily => f.write_str("space-size family is empty"),
            Self::ZeroSpace => f.write_str("space size must be at least one byte"),
            Self::SpaceTooLarge(size) => write!(f, "space size {size} exceeds the supported maximum"),
            Self::ZeroSlotCap => f.write_str("maximum slot size must be at least one byte"),
        }
    }
}

/// The error type for size-class generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClassError {
    /// A slot size outside `1..=space_size` was handed to the simulator.
    InvalidSize {
        /// The rejected slot size.
        slot_size: usize,
        /// The space it was measured against.
        space_size: usize,
    },
    /// The reconciler was given an unusable space-size family.
    Configuration(ConfigurationError),
}

impl core::fmt::Display for SizeClassError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidSize { slot_size, space_size } => write!(
                f,
                "slot size {slot_size} is outside 1..={space_size} for a {space_size}-byte space"
            ),
            Self::Configuration(kind) => write!(f, "invalid configuration: {kind}"),
        }
    }
}

impl std::error::Error for ConfigurationError {}

impl std::error::Error for SizeClassError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Configuration(kind) => Some(kind),
            Self::InvalidSize { .. } => None,
        }
    }
}

impl From<ConfigurationError> for SizeClassError {
    fn from(kind: ConfigurationError) -> Self {
        SizeClassError::Configuration(kind)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, SizeClassError>;
