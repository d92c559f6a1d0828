//! Utility functions shared by the write pipeline.
//!
//! This module provides:
//! - Order-preserving batch splitting
//! - Journey indexing helpers

mod chunks;

pub use chunks::{slice_to_map, split_to_chunks};

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
