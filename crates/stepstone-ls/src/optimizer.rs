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

//! Stepping-stone improvement driver.
//!
//! The optimizer works in sweeps. A sweep collects every empty cell of the
//! current plan in declared order (rows outer, columns inner) and, for each one
//! that is still empty when its turn comes, searches a cycle and pivots on it if
//! the cycle lowers the cost. Cells filled by an earlier pivot of the same sweep
//! are skipped. The run ends with a local optimum as soon as a whole sweep
//! applies no pivot; monitors may stop it earlier, which is reported as an
//! aborted (non-converged) outcome.
//!
//! Every improving pivot lowers the integer total cost by at least one, so on a
//! balanced instance the number of sweeps is finite even without limits.

use crate::{
    cycle::CycleSearch,
    monitor::optimizer_monitor::{OptimizerMonitor, SearchCommand},
    pivot::{PivotEngine, PivotOutcome},
    result::{OptimizerOutcome, TerminationReason},
    stats::OptimizerStatistics,
};
use std::time::Instant;
use stepstone_model::{
    index::{DemandIndex, SupplyIndex},
    matrix::TransportMatrix,
    num::TransportNumeric,
};

/// Stepping-stone local search over a `TransportMatrix`.
///
/// The cycle search buffers and the candidate list are kept between runs.
#[derive(Debug, Clone, Default)]
pub struct SteppingStoneOptimizer {
    search: CycleSearch,
    pivot: PivotEngine,
    candidates: Vec<(SupplyIndex, DemandIndex)>,
}

impl SteppingStoneOptimizer {
    #[inline]
    pub fn new() -> Self {
        Self {
            search: CycleSearch::new(),
            pivot: PivotEngine::new(),
            candidates: Vec::new(),
        }
    }

    /// Creates an optimizer with buffers sized for the given dimensions.
    #[inline]
    pub fn preallocated(num_supply_nodes: usize, num_demand_nodes: usize) -> Self {
        Self {
            search: CycleSearch::preallocated(num_supply_nodes, num_demand_nodes),
            pivot: PivotEngine::new(),
            candidates: Vec::with_capacity(num_supply_nodes * num_demand_nodes),
        }
    }

    /// Improves the feasible plan held by `matrix` in place.
    ///
    /// The matrix must already hold a feasible plan, usually produced by an
    /// `InitialSolutionBuilder`. The returned outcome carries a snapshot of the
    /// final plan, which is also left in `matrix`.
    pub fn run<T, M>(&mut self, matrix: &mut TransportMatrix<T>, monitor: &mut M) -> OptimizerOutcome<T>
    where
        T: TransportNumeric,
        M: OptimizerMonitor<T> + ?Sized,
    {
        debug_assert!(
            matrix.is_feasible(),
            "called `SteppingStoneOptimizer::run` with an infeasible plan of total cost {}",
            matrix.total_cost()
        );

        let start_time = Instant::now();
        let mut stats = OptimizerStatistics::default();

        monitor.on_start(matrix);

        let termination_reason = loop {
            if let SearchCommand::Terminate(reason) = monitor.search_command(&stats) {
                break TerminationReason::Aborted(reason);
            }

            stats.on_sweep();
            monitor.on_sweep_start(matrix, &stats);

            self.collect_candidates(matrix);

            let mut improved = false;
            for &(supply, demand) in &self.candidates {
                if matrix.is_basic(supply, demand) {
                    continue;
                }

                stats.on_candidate();
                let Some(cycle) = self.search.find(matrix, supply, demand) else {
                    stats.on_dead_end();
                    continue;
                };
                stats.on_cycle_found();

                if let PivotOutcome::Improved(pivot) = self.pivot.apply(matrix, &cycle) {
                    improved = true;
                    stats.on_pivot();

                    debug_assert!(
                        pivot.cost_delta < T::zero(),
                        "called `PivotEngine::apply` on {} with non-negative cost change {}",
                        cycle,
                        pivot.cost_delta
                    );

                    monitor.on_pivot(matrix, &cycle, &pivot, &stats);
                }
            }

            monitor.on_sweep_end(matrix, improved, &stats);

            if !improved {
                break TerminationReason::LocalOptimum;
            }
        };

        stats.set_total_time(start_time.elapsed());
        monitor.on_end(matrix, &stats);

        let degenerate = matrix.is_degenerate();
        if degenerate {
            tracing::debug!(
                basic_cells = matrix.num_basic_cells(),
                dead_ends = stats.dead_ends,
                "final plan is degenerate"
            );
        }

        let plan = matrix.snapshot();
        match termination_reason {
            TerminationReason::LocalOptimum => OptimizerOutcome::local_optimum(plan, stats, degenerate),
            TerminationReason::Aborted(reason) => {
                OptimizerOutcome::aborted(plan, reason, stats, degenerate)
            }
        }
    }

    fn collect_candidates<T>(&mut self, matrix: &TransportMatrix<T>)
    where
        T: TransportNumeric,
    {
        self.candidates.clear();
        for supply in matrix.supply_indices() {
            for demand in matrix.demand_indices() {
                if !matrix.is_basic(supply, demand) {
                    self.candidates.push((supply, demand));
                }
            }
        }
    }
}
