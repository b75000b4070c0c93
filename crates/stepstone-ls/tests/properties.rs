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

use proptest::prelude::*;
use stepstone_ls::{
    cycle::Cycle,
    initial::{InitialSolutionBuilder, MinimumCostCellBuilder},
    monitor::{no_op::NoOpMonitor, optimizer_monitor::OptimizerMonitor},
    optimizer::SteppingStoneOptimizer,
    pivot::Pivot,
    stats::OptimizerStatistics,
};
use stepstone_model::matrix::{TransportMatrix, TransportMatrixBuilder};

/// Records the total cost after the start and after every pivot.
#[derive(Debug, Default)]
struct CostTrace {
    costs: Vec<i64>,
    deltas: Vec<i64>,
    feasible_after_each_pivot: bool,
}

impl OptimizerMonitor<i64> for CostTrace {
    fn name(&self) -> &str {
        "CostTrace"
    }

    fn on_start(&mut self, matrix: &TransportMatrix<i64>) {
        self.costs.push(matrix.total_cost());
        self.feasible_after_each_pivot = true;
    }

    fn on_sweep_start(&mut self, _matrix: &TransportMatrix<i64>, _statistics: &OptimizerStatistics) {}

    fn on_pivot(
        &mut self,
        matrix: &TransportMatrix<i64>,
        _cycle: &Cycle,
        pivot: &Pivot<i64>,
        _statistics: &OptimizerStatistics,
    ) {
        self.costs.push(matrix.total_cost());
        self.deltas.push(pivot.cost_delta);
        self.feasible_after_each_pivot &= matrix.is_feasible();
    }

    fn on_sweep_end(
        &mut self,
        _matrix: &TransportMatrix<i64>,
        _improved: bool,
        _statistics: &OptimizerStatistics,
    ) {
    }

    fn on_end(&mut self, _matrix: &TransportMatrix<i64>, _statistics: &OptimizerStatistics) {}
}

/// A balanced instance: row and column totals of a random shipment table plus
/// distinct positive unit costs.
#[derive(Debug, Clone)]
struct Instance {
    production: Vec<i64>,
    demand: Vec<i64>,
    costs: Vec<i64>,
}

fn arb_instance() -> impl Strategy<Value = Instance> {
    arb_sized_instance(4, 12)
}

fn arb_sized_instance(max_dim: usize, max_quantity: i64) -> impl Strategy<Value = Instance> {
    (1usize..=max_dim, 1usize..=max_dim).prop_flat_map(move |(rows, cols)| {
        let n = rows * cols;
        (
            prop::collection::vec(0i64..max_quantity, n),
            Just((1..=n as i64).collect::<Vec<_>>()).prop_shuffle(),
        )
            .prop_map(move |(table, costs)| {
                let production = (0..rows)
                    .map(|r| table[r * cols..(r + 1) * cols].iter().sum())
                    .collect();
                let demand = (0..cols)
                    .map(|c| (0..rows).map(|r| table[r * cols + c]).sum())
                    .collect();
                Instance {
                    production,
                    demand,
                    costs,
                }
            })
    })
}

fn build(instance: &Instance) -> TransportMatrix<i64> {
    let mut builder = TransportMatrixBuilder::new();
    for (i, &p) in instance.production.iter().enumerate() {
        builder.add_supply_node(format!("F{}", i + 1), p);
    }
    for (i, &d) in instance.demand.iter().enumerate() {
        builder.add_demand_node(format!("W{}", i + 1), d);
    }
    builder.set_costs_row_major(instance.costs.iter().copied());
    builder.build().unwrap()
}

/// Cheapest integer plan by exhaustive enumeration, for tiny instances only.
fn brute_force_optimum(instance: &Instance) -> i64 {
    fn search(
        instance: &Instance,
        cell: usize,
        row_left: i64,
        demand_left: &mut [i64],
        cost: i64,
        best: &mut i64,
    ) {
        let cols = instance.demand.len();
        let rows = instance.production.len();
        let (row, col) = (cell / cols, cell % cols);
        if row == rows {
            if demand_left.iter().all(|&d| d == 0) {
                *best = (*best).min(cost);
            }
            return;
        }

        let unit_cost = instance.costs[cell];
        let (low, high) = if col == cols - 1 {
            (row_left, row_left)
        } else {
            (0, row_left.min(demand_left[col]))
        };
        for quantity in low..=high {
            if quantity > demand_left[col] {
                break;
            }
            demand_left[col] -= quantity;
            let next_row_left = if col == cols - 1 {
                instance.production.get(row + 1).copied().unwrap_or(0)
            } else {
                row_left - quantity
            };
            search(
                instance,
                cell + 1,
                next_row_left,
                demand_left,
                cost + quantity * unit_cost,
                best,
            );
            demand_left[col] += quantity;
        }
    }

    let mut best = i64::MAX;
    let mut demand_left = instance.demand.clone();
    search(instance, 0, instance.production[0], &mut demand_left, 0, &mut best);
    best
}

proptest! {
    #[test]
    fn initial_plan_is_feasible(instance in arb_instance()) {
        let mut matrix = build(&instance);
        MinimumCostCellBuilder::new().build(&mut matrix).unwrap();

        prop_assert!(matrix.is_feasible());
        prop_assert!(
            matrix.num_basic_cells() < matrix.num_supply_nodes() + matrix.num_demand_nodes()
        );
    }

    #[test]
    fn pivots_keep_plan_feasible_and_lower_cost(instance in arb_instance()) {
        let mut matrix = build(&instance);
        MinimumCostCellBuilder::new().build(&mut matrix).unwrap();
        let initial_cost = matrix.total_cost();

        let mut trace = CostTrace::default();
        let outcome = SteppingStoneOptimizer::new().run(&mut matrix, &mut trace);

        prop_assert!(outcome.converged());
        prop_assert!(trace.feasible_after_each_pivot);
        prop_assert!(matrix.is_feasible());
        prop_assert!(trace.deltas.iter().all(|&d| d < 0));
        prop_assert!(trace.costs.windows(2).all(|w| w[1] < w[0]));
        prop_assert_eq!(trace.costs.len() as u64, outcome.statistics().pivots + 1);
        prop_assert!(outcome.plan().total_cost() <= initial_cost);
        prop_assert_eq!(
            initial_cost + trace.deltas.iter().sum::<i64>(),
            outcome.plan().total_cost()
        );
    }

    #[test]
    fn optimizing_twice_changes_nothing(instance in arb_instance()) {
        let mut matrix = build(&instance);
        MinimumCostCellBuilder::new().build(&mut matrix).unwrap();

        let mut optimizer = SteppingStoneOptimizer::new();
        let first = optimizer.run(&mut matrix, &mut NoOpMonitor::new());
        let second = optimizer.run(&mut matrix, &mut NoOpMonitor::new());

        prop_assert_eq!(first.plan(), second.plan());
        prop_assert_eq!(second.statistics().pivots, 0);
        prop_assert_eq!(second.statistics().sweeps, 1);
    }

    #[test]
    fn zero_capacity_nodes_never_ship(instance in arb_instance()) {
        let mut matrix = build(&instance);
        MinimumCostCellBuilder::new().build(&mut matrix).unwrap();
        SteppingStoneOptimizer::new().run(&mut matrix, &mut NoOpMonitor::new());

        for s in matrix.supply_indices() {
            for d in matrix.demand_indices() {
                if matrix.supply_node(s).production() == 0 || matrix.demand_node(d).demand() == 0 {
                    prop_assert_eq!(matrix.allocation(s, d), 0);
                }
            }
        }
    }

    #[test]
    fn non_degenerate_local_optimum_is_global(instance in arb_sized_instance(3, 6)) {
        let mut matrix = build(&instance);
        MinimumCostCellBuilder::new().build(&mut matrix).unwrap();
        let outcome = SteppingStoneOptimizer::new().run(&mut matrix, &mut NoOpMonitor::new());

        if !outcome.is_degenerate() {
            prop_assert_eq!(outcome.plan().total_cost(), brute_force_optimum(&instance));
        }
    }
}
