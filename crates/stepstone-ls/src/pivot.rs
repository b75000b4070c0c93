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

//! Cycle evaluation and the stepping-stone pivot.
//!
//! The marginal cost of a cycle is the signed sum of its unit costs. A negative
//! marginal cost means that shifting goods around the cycle lowers the total
//! cost, and the largest admissible shift is the smallest allocation among the
//! decreasing steps. Applying it empties at least one of those cells (the
//! leaving cell) and fills the entering cell.

use crate::cycle::Cycle;
use stepstone_model::{matrix::TransportMatrix, num::TransportNumeric};

/// An applied improving pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pivot<T> {
    /// Cost change per unit shifted; always negative.
    pub marginal_cost: T,

    /// Quantity shifted around the cycle.
    pub leaving: T,

    /// Change of the total cost, `marginal_cost * leaving`.
    pub cost_delta: T,
}

impl<T> std::fmt::Display for Pivot<T>
where
    T: TransportNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Pivot(marginal_cost: {}, leaving: {}, cost_delta: {})",
            self.marginal_cost, self.leaving, self.cost_delta
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PivotOutcome<T> {
    /// The cycle does not lower the cost; the matrix was left untouched.
    NotImproving { marginal_cost: T },

    /// The cycle lowered the cost and was applied.
    Improved(Pivot<T>),
}

impl<T> PivotOutcome<T> {
    #[inline]
    pub fn is_improved(&self) -> bool {
        matches!(self, PivotOutcome::Improved(_))
    }
}

/// Evaluates cycles and shifts allocation around improving ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PivotEngine;

impl PivotEngine {
    #[inline]
    pub fn new() -> Self {
        Self
    }

    /// Computes what applying `cycle` would do, without touching the matrix.
    pub fn evaluate<T>(&self, matrix: &TransportMatrix<T>, cycle: &Cycle) -> PivotOutcome<T>
    where
        T: TransportNumeric,
    {
        let marginal_cost = cycle.marginal_cost(matrix);
        if marginal_cost >= T::zero() {
            return PivotOutcome::NotImproving { marginal_cost };
        }

        let leaving = cycle.leaving_quantity(matrix);
        PivotOutcome::Improved(Pivot {
            marginal_cost,
            leaving,
            cost_delta: marginal_cost * leaving,
        })
    }

    /// Evaluates `cycle` and, if it is improving, shifts the leaving quantity
    /// around it.
    pub fn apply<T>(&self, matrix: &mut TransportMatrix<T>, cycle: &Cycle) -> PivotOutcome<T>
    where
        T: TransportNumeric,
    {
        let outcome = self.evaluate(matrix, cycle);
        if let PivotOutcome::Improved(pivot) = outcome {
            for step in cycle.steps() {
                let current = matrix.allocation(step.supply, step.demand);
                matrix.set_allocation(
                    step.supply,
                    step.demand,
                    current + step.sign.apply(pivot.leaving),
                );
            }
        }
        outcome
    }
}
