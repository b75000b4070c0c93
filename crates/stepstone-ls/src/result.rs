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

//! Optimizer outcome and termination reporting.
//!
//! A `OptimizerOutcome` bundles the final plan snapshot, the run statistics and
//! the reason the sweep loop stopped. `TerminationReason::LocalOptimum` means a
//! full sweep found no improving cycle; `TerminationReason::Aborted` means a
//! monitor (sweep or time limit) stopped the run first, so the plan is feasible
//! but did not converge.

use crate::stats::OptimizerStatistics;
use stepstone_model::plan::ShipmentPlan;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TerminationReason {
    /// A complete sweep applied no improving pivot.
    LocalOptimum,

    /// A monitor stopped the run before convergence.
    /// The string describes the limit that was hit.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::LocalOptimum => write!(f, "Local Optimum Reached"),
            TerminationReason::Aborted(msg) => write!(f, "Aborted: {}", msg),
        }
    }
}

/// Result of the optimizer after termination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizerOutcome<T> {
    termination_reason: TerminationReason,
    plan: ShipmentPlan<T>,
    statistics: OptimizerStatistics,
    degenerate: bool,
}

impl<T> OptimizerOutcome<T> {
    /// Creates a new converged outcome.
    #[inline]
    pub fn local_optimum(plan: ShipmentPlan<T>, statistics: OptimizerStatistics, degenerate: bool) -> Self {
        Self {
            termination_reason: TerminationReason::LocalOptimum,
            plan,
            statistics,
            degenerate,
        }
    }

    /// Creates a new aborted outcome.
    #[inline]
    pub fn aborted<R>(
        plan: ShipmentPlan<T>,
        reason: R,
        statistics: OptimizerStatistics,
        degenerate: bool,
    ) -> Self
    where
        R: Into<String>,
    {
        Self {
            termination_reason: TerminationReason::Aborted(reason.into()),
            plan,
            statistics,
            degenerate,
        }
    }

    /// Returns the termination reason.
    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    /// Returns `true` if the run stopped at a local optimum.
    #[inline]
    pub fn converged(&self) -> bool {
        self.termination_reason == TerminationReason::LocalOptimum
    }

    /// Returns `true` if the final plan has fewer than `rows + cols - 1` basic cells.
    ///
    /// Empty cells of a degenerate plan may have no closed cycle, so the plan is
    /// only locally optimal with respect to the cycles that do exist.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// Returns the final plan.
    #[inline]
    pub fn plan(&self) -> &ShipmentPlan<T> {
        &self.plan
    }

    /// Consumes the outcome and returns the final plan.
    #[inline]
    pub fn into_plan(self) -> ShipmentPlan<T> {
        self.plan
    }

    /// Returns the statistics.
    #[inline]
    pub fn statistics(&self) -> &OptimizerStatistics {
        &self.statistics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepstone_model::matrix::TransportMatrixBuilder;

    fn plan() -> ShipmentPlan<i64> {
        let mut builder = TransportMatrixBuilder::new();
        builder.add_supply_node("F1", 1).add_demand_node("W1", 1);
        builder.set_costs_row_major([3]);
        builder.build().unwrap().snapshot()
    }

    #[test]
    fn test_local_optimum_is_converged() {
        let outcome = OptimizerOutcome::local_optimum(plan(), OptimizerStatistics::default(), false);
        assert!(outcome.converged());
        assert!(!outcome.is_degenerate());
        assert_eq!(outcome.termination_reason().to_string(), "Local Optimum Reached");
    }

    #[test]
    fn test_aborted_is_not_converged() {
        let outcome = OptimizerOutcome::aborted(plan(), "sweep limit", OptimizerStatistics::default(), true);
        assert!(!outcome.converged());
        assert!(outcome.is_degenerate());
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::Aborted("sweep limit".to_string())
        );
        assert_eq!(outcome.termination_reason().to_string(), "Aborted: sweep limit");
        assert_eq!(outcome.into_plan().total_cost(), 0);
    }
}
