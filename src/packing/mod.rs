//! Size-class generation by worst-case packing.
//!
//! Three stages, each feeding the next:
//!
//! 1. [`simulator`] lays same-size slots across repeated space instances and
//!    measures the worst-case packing count over one full cycle.
//! 2. [`selector`] sweeps slot sizes for one space size and keeps the largest
//!    slot for each achievable worst case.
//! 3. [`reconciler`] runs the selector for every space size in a family and
//!    unions the results into the final [`SizeClassTable`].
//!
//! Everything here is pure integer arithmetic with no shared state.

pub mod error;
pub mod reconciler;
pub mod selector;
pub mod simulator;
pub mod space;


pub use error::{ConfigurationError, Result, SizeClassError};
pub use reconciler::{reconcile, ReconcileConfig, SizeClassTable};
pub use selector::{select, select_up_to, CandidateTable};
pub use simulator::{simulate, worst_case, InstanceRecord, Packing};
pub use space::{ByteSize, SpaceFamily};
