//! Internal modules ported from external libraries.
//!
//! These modules contain code adapted from:
//! - numpy: unique, nan-aware reductions, cumulative max
//! - itertools: combinations and permutations of node indices

pub mod itertools;
pub mod numpy;
