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

//! Construction of an initial feasible shipment plan.
//!
//! The stepping-stone search can only improve an existing plan, so every solve
//! starts by filling an empty matrix with a feasible one. The
//! `MinimumCostCellBuilder` repeatedly picks the cheapest pair whose supply and
//! demand both still have remaining capacity and ships as much as possible on
//! it. Rows are scanned outer, columns inner, and only a strictly smaller cost
//! replaces the current candidate, so the first cheapest pair in declared order
//! wins ties and the result is deterministic.
//!
//! On a balanced instance each allocation exhausts either a row or a column, so
//! the builder finishes after at most `rows + cols - 1` allocations. If demand is
//! left without any supply to cover it, the builder reports
//! `ConstructionError::Stalled` instead of spinning.

use stepstone_model::{
    index::{DemandIndex, SupplyIndex},
    matrix::TransportMatrix,
    num::TransportNumeric,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstructionError {
    #[error("the matrix already holds {basic_cells} allocated cells")]
    NotEmpty { basic_cells: usize },

    #[error("no supply left to cover the remaining demand of {unmet_demand}")]
    Stalled { unmet_demand: String },
}

/// Fills an empty matrix with an initial feasible plan.
pub trait InitialSolutionBuilder<T>
where
    T: TransportNumeric,
{
    /// Returns the name of the builder.
    fn name(&self) -> &str;

    /// Writes an initial plan into `matrix`.
    ///
    /// The matrix must not hold any allocation yet. On error the matrix may
    /// hold a partial plan.
    fn build(&mut self, matrix: &mut TransportMatrix<T>) -> Result<(), ConstructionError>;
}

impl<T> std::fmt::Debug for dyn InitialSolutionBuilder<T>
where
    T: TransportNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InitialSolutionBuilder({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn InitialSolutionBuilder<T>
where
    T: TransportNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InitialSolutionBuilder({})", self.name())
    }
}

/// Greedy minimum-cost-cell construction.
///
/// The remaining-capacity buffers are kept between calls.
#[derive(Debug, Clone, Default)]
pub struct MinimumCostCellBuilder<T> {
    remaining_supply: Vec<T>,
    remaining_demand: Vec<T>,
}

impl<T> MinimumCostCellBuilder<T>
where
    T: TransportNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            remaining_supply: Vec::new(),
            remaining_demand: Vec::new(),
        }
    }

    #[inline]
    pub fn preallocated(num_supply_nodes: usize, num_demand_nodes: usize) -> Self {
        Self {
            remaining_supply: Vec::with_capacity(num_supply_nodes),
            remaining_demand: Vec::with_capacity(num_demand_nodes),
        }
    }

    /// Returns the cheapest pair with remaining supply and remaining demand.
    fn cheapest_open_cell(&self, matrix: &TransportMatrix<T>) -> Option<(SupplyIndex, DemandIndex)> {
        let mut best: Option<(T, SupplyIndex, DemandIndex)> = None;
        for (s, &supply_left) in self.remaining_supply.iter().enumerate() {
            if supply_left <= T::zero() {
                continue;
            }
            let supply = SupplyIndex::new(s);
            for (d, &demand_left) in self.remaining_demand.iter().enumerate() {
                if demand_left <= T::zero() {
                    continue;
                }
                let demand = DemandIndex::new(d);
                let cost = matrix.cost(supply, demand);
                if best.is_none_or(|(best_cost, _, _)| cost < best_cost) {
                    best = Some((cost, supply, demand));
                }
            }
        }
        best.map(|(_, supply, demand)| (supply, demand))
    }

    /// Allocates along the cheapest open cells until the remaining demand is met.
    ///
    /// Expects the remaining-capacity buffers to be loaded for `matrix`.
    fn fill(&mut self, matrix: &mut TransportMatrix<T>) -> Result<(), ConstructionError> {
        while self.remaining_demand.iter().any(|&d| d > T::zero()) {
            let Some((supply, demand)) = self.cheapest_open_cell(matrix) else {
                return Err(ConstructionError::Stalled {
                    unmet_demand: self.unmet_demand().to_string(),
                });
            };

            let quantity = self.remaining_supply[supply.get()].min(self.remaining_demand[demand.get()]);
            let current = matrix.allocation(supply, demand);
            matrix.set_allocation(supply, demand, current + quantity);
            self.remaining_supply[supply.get()] = self.remaining_supply[supply.get()] - quantity;
            self.remaining_demand[demand.get()] = self.remaining_demand[demand.get()] - quantity;

            tracing::trace!(
                supply = supply.get(),
                demand = demand.get(),
                quantity = %quantity,
                "minimum-cost cell allocated"
            );
        }

        Ok(())
    }

    fn unmet_demand(&self) -> T {
        self.remaining_demand
            .iter()
            .filter(|&&d| d > T::zero())
            .fold(T::zero(), |acc, &d| acc + d)
    }
}

impl<T> InitialSolutionBuilder<T> for MinimumCostCellBuilder<T>
where
    T: TransportNumeric,
{
    fn name(&self) -> &str {
        "MinimumCostCellBuilder"
    }

    fn build(&mut self, matrix: &mut TransportMatrix<T>) -> Result<(), ConstructionError> {
        let basic_cells = matrix.num_basic_cells();
        if basic_cells > 0 {
            return Err(ConstructionError::NotEmpty { basic_cells });
        }

        self.remaining_supply.clear();
        self.remaining_supply
            .extend(matrix.supply_nodes().iter().map(|n| n.production()));
        self.remaining_demand.clear();
        self.remaining_demand
            .extend(matrix.demand_nodes().iter().map(|n| n.demand()));

        self.fill(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepstone_model::matrix::TransportMatrixBuilder;

    fn si(i: usize) -> SupplyIndex {
        SupplyIndex::new(i)
    }

    fn di(i: usize) -> DemandIndex {
        DemandIndex::new(i)
    }

    fn build_matrix(production: &[i64], demand: &[i64], costs: &[i64]) -> TransportMatrix<i64> {
        let mut builder = TransportMatrixBuilder::new();
        for (i, &p) in production.iter().enumerate() {
            builder.add_supply_node(format!("F{}", i + 1), p);
        }
        for (i, &d) in demand.iter().enumerate() {
            builder.add_demand_node(format!("W{}", i + 1), d);
        }
        builder.set_costs_row_major(costs.iter().copied());
        builder.build().unwrap()
    }

    fn allocations(m: &TransportMatrix<i64>) -> Vec<Vec<i64>> {
        m.supply_indices()
            .map(|s| m.demand_indices().map(|d| m.allocation(s, d)).collect())
            .collect()
    }

    #[test]
    fn test_single_cell() {
        let mut m = build_matrix(&[10], &[10], &[5]);
        MinimumCostCellBuilder::new().build(&mut m).unwrap();
        assert_eq!(m.allocation(si(0), di(0)), 10);
        assert_eq!(m.total_cost(), 50);
    }

    #[test]
    fn test_two_by_two() {
        let mut m = build_matrix(&[20, 30], &[25, 25], &[8, 6, 9, 7]);
        MinimumCostCellBuilder::new().build(&mut m).unwrap();
        assert_eq!(allocations(&m), vec![vec![0, 20], vec![25, 5]]);
        assert_eq!(m.total_cost(), 380);
        assert!(m.is_feasible());
    }

    #[test]
    fn test_two_by_three() {
        let mut m = build_matrix(&[50, 60], &[30, 40, 40], &[4, 6, 8, 5, 4, 3]);
        MinimumCostCellBuilder::new().build(&mut m).unwrap();
        assert_eq!(allocations(&m), vec![vec![30, 20, 0], vec![0, 20, 40]]);
        assert_eq!(m.total_cost(), 440);
        assert!(m.is_feasible());
        assert!(!m.is_degenerate());
    }

    #[test]
    fn test_ties_go_to_first_cell_in_declared_order() {
        let mut m = build_matrix(&[5, 5], &[5, 5], &[1, 1, 1, 1]);
        MinimumCostCellBuilder::new().build(&mut m).unwrap();
        assert_eq!(allocations(&m), vec![vec![5, 0], vec![0, 5]]);
    }

    #[test]
    fn test_zero_capacity_nodes_get_nothing() {
        let mut m = build_matrix(&[0, 10], &[10, 0], &[1, 1, 7, 1]);
        MinimumCostCellBuilder::new().build(&mut m).unwrap();
        assert_eq!(allocations(&m), vec![vec![0, 0], vec![10, 0]]);
        assert_eq!(m.total_cost(), 70);
        assert!(m.is_feasible());
    }

    #[test]
    fn test_rejects_non_empty_matrix() {
        let mut m = build_matrix(&[10], &[10], &[5]);
        m.set_allocation(si(0), di(0), 3);
        let err = MinimumCostCellBuilder::new().build(&mut m).unwrap_err();
        assert_eq!(err, ConstructionError::NotEmpty { basic_cells: 1 });
    }

    #[test]
    fn test_reports_stall_when_supply_runs_out() {
        // The matrix builder only yields balanced matrices, so short supply is
        // seeded straight into the capacity buffers.
        let mut m = build_matrix(&[10, 10], &[10, 10], &[2, 1, 3, 4]);
        let mut builder = MinimumCostCellBuilder::new();
        builder.remaining_supply = vec![5, 0];
        builder.remaining_demand = vec![10, 10];

        let err = builder.fill(&mut m).unwrap_err();
        assert_eq!(
            err,
            ConstructionError::Stalled {
                unmet_demand: "15".to_owned()
            }
        );
        assert_eq!(allocations(&m), vec![vec![0, 5], vec![0, 0]]);
        assert_eq!(err.to_string(), "no supply left to cover the remaining demand of 15");
    }

    #[test]
    fn test_builder_is_reusable() {
        let mut builder = MinimumCostCellBuilder::preallocated(2, 2);
        let mut first = build_matrix(&[20, 30], &[25, 25], &[8, 6, 9, 7]);
        let mut second = build_matrix(&[20, 30], &[25, 25], &[8, 6, 9, 7]);
        builder.build(&mut first).unwrap();
        builder.build(&mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_dyn_display() {
        let builder: Box<dyn InitialSolutionBuilder<i64>> = Box::new(MinimumCostCellBuilder::new());
        assert_eq!(builder.to_string(), "InitialSolutionBuilder(MinimumCostCellBuilder)");
    }
}
