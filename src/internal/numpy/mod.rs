//! NumPy-compatible array helpers.

mod array;

pub use array::{argmin_abs_diff, flatten_column, nanmax, nanmean, prefix_max, sorted_unique};
