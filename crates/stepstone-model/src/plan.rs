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

//! Immutable snapshots of a shipment plan.
//!
//! A `ShipmentPlan` copies everything a report needs out of a `TransportMatrix`
//! (node names, capacities, unit costs, allocations and the total cost) so that
//! the initial and the final plan of a run can be kept side by side while the
//! matrix itself keeps changing. Rendering is a pure `Display` implementation.

use crate::{
    index::{DemandIndex, SupplyIndex},
    matrix::TransportMatrix,
    num::TransportNumeric,
};

/// A frozen copy of a transportation plan.
///
/// This struct uses a Structure of Arrays (SoA) layout. `costs` and `allocations`
/// are row-major with `num_demand_nodes()` entries per row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShipmentPlan<T> {
    supply_names: Vec<String>,
    production: Vec<T>,
    demand_names: Vec<String>,
    demand: Vec<T>,
    costs: Vec<T>,
    allocations: Vec<T>,
    total_cost: T,
}

impl<T> ShipmentPlan<T>
where
    T: TransportNumeric,
{
    /// Captures the current state of `matrix`.
    pub fn from_matrix(matrix: &TransportMatrix<T>) -> Self {
        let cells = matrix.cells();
        Self {
            supply_names: matrix
                .supply_nodes()
                .iter()
                .map(|n| n.name().to_owned())
                .collect(),
            production: matrix.supply_nodes().iter().map(|n| n.production()).collect(),
            demand_names: matrix
                .demand_nodes()
                .iter()
                .map(|n| n.name().to_owned())
                .collect(),
            demand: matrix.demand_nodes().iter().map(|n| n.demand()).collect(),
            costs: cells.iter().map(|c| c.unit_cost()).collect(),
            allocations: cells.iter().map(|c| c.allocation()).collect(),
            total_cost: matrix.total_cost(),
        }
    }

    /// Returns the number of supply nodes (rows).
    #[inline]
    pub fn num_supply_nodes(&self) -> usize {
        self.supply_names.len()
    }

    /// Returns the number of demand nodes (columns).
    #[inline]
    pub fn num_demand_nodes(&self) -> usize {
        self.demand_names.len()
    }

    /// Returns the total shipping cost of the plan.
    #[inline]
    pub fn total_cost(&self) -> T {
        self.total_cost
    }

    /// Returns the supply node names in row order.
    #[inline]
    pub fn supply_names(&self) -> &[String] {
        &self.supply_names
    }

    /// Returns the demand node names in column order.
    #[inline]
    pub fn demand_names(&self) -> &[String] {
        &self.demand_names
    }

    /// Returns the production of every supply node.
    #[inline]
    pub fn production(&self) -> &[T] {
        &self.production
    }

    /// Returns the demand of every demand node.
    #[inline]
    pub fn demand(&self) -> &[T] {
        &self.demand
    }

    /// Returns all allocations in row-major order.
    #[inline]
    pub fn allocations(&self) -> &[T] {
        &self.allocations
    }

    /// Returns all unit costs in row-major order.
    #[inline]
    pub fn costs(&self) -> &[T] {
        &self.costs
    }

    #[inline(always)]
    fn flat(&self, supply: SupplyIndex, demand: DemandIndex) -> usize {
        debug_assert!(
            supply.get() < self.num_supply_nodes() && demand.get() < self.num_demand_nodes(),
            "called `ShipmentPlan::flat` with index out of bounds: the size is {}x{} but the index is ({}, {})",
            self.num_supply_nodes(),
            self.num_demand_nodes(),
            supply.get(),
            demand.get()
        );
        supply.get() * self.num_demand_nodes() + demand.get()
    }

    /// Returns the allocation of the pair `(supply, demand)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn allocation(&self, supply: SupplyIndex, demand: DemandIndex) -> T {
        self.allocations[self.flat(supply, demand)]
    }

    /// Returns the unit cost of the pair `(supply, demand)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn cost(&self, supply: SupplyIndex, demand: DemandIndex) -> T {
        self.costs[self.flat(supply, demand)]
    }

    /// Returns the allocations of one supply node.
    #[inline]
    pub fn row(&self, supply: SupplyIndex) -> &[T] {
        let start = supply.get() * self.num_demand_nodes();
        &self.allocations[start..start + self.num_demand_nodes()]
    }
}

impl<T> std::fmt::Display for ShipmentPlan<T>
where
    T: TransportNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>10}", "")?;
        for name in &self.demand_names {
            write!(f, "{:>15} ", name)?;
        }
        writeln!(f, "{:>10}", "supply")?;

        for (row, name) in self.supply_names.iter().enumerate() {
            write!(f, "{:>10}", name)?;
            let start = row * self.num_demand_nodes();
            for col in 0..self.num_demand_nodes() {
                let cell = format!("({}){}", self.allocations[start + col], self.costs[start + col]);
                write!(f, "{:>15} ", cell)?;
            }
            writeln!(f, "{:>10}", self.production[row])?;
        }

        write!(f, "{:>10}", "demand")?;
        for demand in &self.demand {
            write!(f, "{:>15} ", demand)?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::TransportMatrixBuilder;

    fn si(i: usize) -> SupplyIndex {
        SupplyIndex::new(i)
    }

    fn di(i: usize) -> DemandIndex {
        DemandIndex::new(i)
    }

    fn matrix() -> TransportMatrix<i64> {
        let mut builder = TransportMatrixBuilder::new();
        builder.add_supply_node("F1", 20).add_supply_node("F2", 30);
        builder.add_demand_node("W1", 25).add_demand_node("W2", 25);
        builder.set_costs_row_major([8, 6, 9, 7]);
        builder.build().unwrap()
    }

    #[test]
    fn test_snapshot_is_detached_from_matrix() {
        let mut m = matrix();
        m.set_allocation(si(0), di(1), 20);
        let plan = m.snapshot();

        m.set_allocation(si(0), di(1), 0);

        assert_eq!(plan.allocation(si(0), di(1)), 20);
        assert_eq!(plan.total_cost(), 120);
        assert_eq!(plan.cost(si(1), di(0)), 9);
        assert_eq!(plan.row(si(0)), &[0, 20]);
        assert_eq!(plan.production(), &[20, 30]);
        assert_eq!(plan.demand(), &[25, 25]);
        assert_eq!(plan.supply_names(), &["F1".to_string(), "F2".to_string()]);
        assert_eq!(plan.demand_names().len(), 2);
    }

    #[test]
    fn test_display_table_layout() {
        let mut m = matrix();
        m.set_allocation(si(0), di(1), 20);
        m.set_allocation(si(1), di(0), 25);
        m.set_allocation(si(1), di(1), 5);

        let displayed = m.snapshot().to_string();

        let mut expected = String::new();
        expected.push_str(&format!("{:>10}{:>15} {:>15} {:>10}\n", "", "W1", "W2", "supply"));
        expected.push_str(&format!("{:>10}{:>15} {:>15} {:>10}\n", "F1", "(0)8", "(20)6", 20));
        expected.push_str(&format!("{:>10}{:>15} {:>15} {:>10}\n", "F2", "(25)9", "(5)7", 30));
        expected.push_str(&format!("{:>10}{:>15} {:>15} \n", "demand", 25, 25));

        assert_eq!(displayed, expected);
        assert_eq!(m.to_string(), expected);
    }

    #[test]
    fn test_rendering_is_repeatable() {
        let plan = matrix().snapshot();
        assert_eq!(plan.to_string(), plan.to_string());
    }
}
