// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Transport Numeric Trait
//!
//! Unified numeric bound for quantities and unit costs. Production, demand,
//! allocations and costs all share one integer type so that cost arithmetic
//! (`cost * allocation`, signed cycle sums) needs no conversions.
//!
//! Every signed primitive integer (`i8` through `i128`, `isize`) qualifies.

use num_traits::{PrimInt, Signed};
use std::hash::Hash;

/// A trait alias for the signed integer types usable as quantities and costs.
pub trait TransportNumeric:
    PrimInt + Signed + std::fmt::Debug + std::fmt::Display + Hash + Send + Sync
{
}

impl<T> TransportNumeric for T where
    T: PrimInt + Signed + std::fmt::Debug + std::fmt::Display + Hash + Send + Sync
{
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total<T: TransportNumeric>(values: &[T]) -> T {
        values.iter().fold(T::zero(), |acc, &v| acc + v)
    }

    #[test]
    fn test_signed_primitives_qualify() {
        assert_eq!(total(&[1_i32, 2, 3]), 6);
        assert_eq!(total(&[10_i64, -4]), 6);
        assert_eq!(total::<i16>(&[]), 0);
    }
}
