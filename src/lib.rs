//! # `slabfit` - Size Classes by Worst-Case Packing
//!
//! Computes the size classes a slab allocator should serve so that objects of
//! each class pack as densely as possible into the fixed-size spaces the
//! hardware cares about: cache lines, prefetch pairs and virtual-memory pages.
//!
//! ## Why worst case
//!
//! Same-size slots laid end to end do not line up with space boundaries
//! unless the slot size divides the space size. Some instances then receive
//! one slot fewer than others. An allocator promises a floor, not an average,
//! so each slot size is scored by the fewest slots any instance receives over
//! one full period of the layout.
//!
//! ## Pipeline
//!
//! 1. **Simulate** ([`simulate`], [`worst_case`]): one slot size in one space size.
//! 2. **Select** ([`select`]): for one space size, keep the largest slot size for
//!    each achievable worst case.
//! 3. **Reconcile** ([`reconcile`], [`ReconcileConfig`]): union the selections of
//!    a whole family of space sizes into one strictly increasing
//!    [`SizeClassTable`].
//!
//! The computation is pure and deterministic, meant to run at build time.
//!
//! ## Example
//!
//! ```rust
//! use slabfit::{reconcile, ReconcileConfig, SpaceFamily};
//!
//! let line = reconcile(&[64]).unwrap();
//! assert_eq!(line.class_for(20), Some(21));
//!
//! let table = ReconcileConfig::for_family(SpaceFamily::CacheLines)
//!     .reconcile()
//!     .unwrap();
//! assert!(table.is_superset_of(&line));
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod packing;

pub use packing::{
    reconcile,
    select,
    select_up_to,
    simulate,
    worst_case,
    ByteSize,
    CandidateTable,
    ConfigurationError,
    InstanceRecord,
    Packing,
    ReconcileConfig,
    SizeClassError,
    SizeClassTable,
    SpaceFamily,
};
pub use packing::space;
