//! Solution storage for the DG discretization.

mod buffers;
mod solution;

pub use buffers::DoubleBuffer;
pub use solution::Solution;
