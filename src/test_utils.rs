// SPDX-License-Identifier: MPL-2.0
//! Test utilities for float comparisons.
//!
//! Positions, percentages and volumes are floats; `assert_eq!` is only safe
//! on values that were never computed.

pub use approx::assert_abs_diff_eq;
