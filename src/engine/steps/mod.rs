//! Step implementations
//!
//! Each submodule contains one pipeline step. Steps are constructed with
//! their collaborators up front and registered on a runner in capture order.

pub mod generalize_compute;

pub use generalize_compute::GeneralizeComputeStep;
