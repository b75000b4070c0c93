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

//! Cost/allocation matrix of a transportation instance.
//!
//! The `TransportMatrix` owns the ordered supply nodes (rows), the ordered demand
//! nodes (columns) and exactly `rows * cols` cells stored row-major in one vector.
//! Topology and unit costs are fixed once the matrix is built; only allocations
//! change afterwards, through `set_allocation`. The matrix does not validate
//! allocation updates: callers (the initial-solution builder and the pivot
//! engine) are responsible for keeping row and column sums consistent.
//!
//! Construction goes through `TransportMatrixBuilder`, which validates the node
//! lists, the size of the cost table and the balance of the instance, applying
//! a `BalancePolicy` when total production and total demand differ.

use crate::{
    index::{DemandIndex, SupplyIndex},
    node::{DemandNode, SupplyNode},
    num::TransportNumeric,
    plan::ShipmentPlan,
};

/// Row-major position of the pair `(supply, demand)` in a matrix with
/// `num_demand_nodes` columns.
#[inline(always)]
pub fn flatten_index(num_demand_nodes: usize, supply: SupplyIndex, demand: DemandIndex) -> usize {
    supply.get() * num_demand_nodes + demand.get()
}

/// The unit cost and current shipped quantity of one (supply, demand) pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell<T> {
    unit_cost: T,
    allocation: T,
}

impl<T> Cell<T>
where
    T: TransportNumeric,
{
    /// Creates an empty cell with the given unit cost.
    #[inline]
    pub fn new(unit_cost: T) -> Self {
        Self {
            unit_cost,
            allocation: T::zero(),
        }
    }

    /// Returns the per-unit shipping cost.
    #[inline]
    pub fn unit_cost(&self) -> T {
        self.unit_cost
    }

    /// Returns the quantity currently shipped on this pair.
    #[inline]
    pub fn allocation(&self) -> T {
        self.allocation
    }

    /// Returns `true` if the cell carries a positive allocation.
    #[inline]
    pub fn is_basic(&self) -> bool {
        self.allocation > T::zero()
    }

    /// Returns the cost contributed by this cell (`unit_cost * allocation`).
    #[inline]
    pub fn cost(&self) -> T {
        self.unit_cost * self.allocation
    }
}

/// How the builder treats an instance whose total production differs from its total demand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BalancePolicy {
    /// Refuse to build an unbalanced matrix.
    #[default]
    Reject,
    /// Absorb the difference with a zero-cost dummy node named `dummy`.
    AddDummy,
}

impl std::fmt::Display for BalancePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BalancePolicy::Reject => write!(f, "Reject"),
            BalancePolicy::AddDummy => write!(f, "AddDummy"),
        }
    }
}

/// The name given to nodes introduced by `BalancePolicy::AddDummy`.
pub const DUMMY_NODE_NAME: &str = "dummy";

/// Validation failures raised by `TransportMatrixBuilder::build`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("the problem defines no supply nodes")]
    NoSupplyNodes,
    #[error("the problem defines no demand nodes")]
    NoDemandNodes,
    #[error("supply node '{name}' has negative production {production}")]
    NegativeProduction { name: String, production: String },
    #[error("demand node '{name}' has negative demand {demand}")]
    NegativeDemand { name: String, demand: String },
    #[error("cost table has {found} entries but {expected} are required")]
    CostTableSize { expected: usize, found: usize },
    #[error("unbalanced problem: total production {production} != total demand {demand}")]
    Unbalanced { production: String, demand: String },
}

/// The dense cost/allocation matrix of a transportation instance.
///
/// Rows are supply nodes, columns are demand nodes, both in declaration order.
/// `cells[row * num_demand_nodes + col]` is the cell of the pair `(row, col)`.
///
/// Construction:
/// - Use `TransportMatrixBuilder` and call `TransportMatrixBuilder::build`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportMatrix<T> {
    supply_nodes: Vec<SupplyNode<T>>, // len = rows
    demand_nodes: Vec<DemandNode<T>>, // len = cols
    cells: Vec<Cell<T>>,              // len = rows * cols
}

impl<T> TransportMatrix<T>
where
    T: TransportNumeric,
{
    /// Returns the number of supply nodes (rows).
    #[inline]
    pub fn num_supply_nodes(&self) -> usize {
        self.supply_nodes.len()
    }

    /// Returns the number of demand nodes (columns).
    #[inline]
    pub fn num_demand_nodes(&self) -> usize {
        self.demand_nodes.len()
    }

    /// Returns the number of cells (`rows * cols`).
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Returns the supply nodes in declaration order.
    #[inline]
    pub fn supply_nodes(&self) -> &[SupplyNode<T>] {
        &self.supply_nodes
    }

    /// Returns the demand nodes in declaration order.
    #[inline]
    pub fn demand_nodes(&self) -> &[DemandNode<T>] {
        &self.demand_nodes
    }

    /// Returns an iterator over all row indices.
    #[inline]
    pub fn supply_indices(&self) -> impl DoubleEndedIterator<Item = SupplyIndex> + use<T> {
        (0..self.num_supply_nodes()).map(SupplyIndex::new)
    }

    /// Returns an iterator over all column indices.
    #[inline]
    pub fn demand_indices(&self) -> impl DoubleEndedIterator<Item = DemandIndex> + use<T> {
        (0..self.num_demand_nodes()).map(DemandIndex::new)
    }

    /// Returns the supply node at `supply`.
    ///
    /// # Panics
    ///
    /// Panics if `supply` is not in `0..num_supply_nodes()`.
    #[inline]
    pub fn supply_node(&self, supply: SupplyIndex) -> &SupplyNode<T> {
        &self.supply_nodes[supply.get()]
    }

    /// Returns the demand node at `demand`.
    ///
    /// # Panics
    ///
    /// Panics if `demand` is not in `0..num_demand_nodes()`.
    #[inline]
    pub fn demand_node(&self, demand: DemandIndex) -> &DemandNode<T> {
        &self.demand_nodes[demand.get()]
    }

    #[inline(always)]
    fn cell_index(&self, supply: SupplyIndex, demand: DemandIndex) -> usize {
        debug_assert!(
            supply.get() < self.num_supply_nodes(),
            "called `TransportMatrix::cell_index` with supply index out of bounds: the len is {} but the index is {}",
            self.num_supply_nodes(),
            supply.get()
        );
        debug_assert!(
            demand.get() < self.num_demand_nodes(),
            "called `TransportMatrix::cell_index` with demand index out of bounds: the len is {} but the index is {}",
            self.num_demand_nodes(),
            demand.get()
        );

        flatten_index(self.num_demand_nodes(), supply, demand)
    }

    /// Returns the cell of the pair `(supply, demand)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn cell(&self, supply: SupplyIndex, demand: DemandIndex) -> &Cell<T> {
        &self.cells[self.cell_index(supply, demand)]
    }

    /// Returns all cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Cell<T>] {
        &self.cells
    }

    /// Returns the unit cost of the pair `(supply, demand)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn cost(&self, supply: SupplyIndex, demand: DemandIndex) -> T {
        self.cell(supply, demand).unit_cost
    }

    /// Overwrites the unit cost of the pair `(supply, demand)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn set_cost(&mut self, supply: SupplyIndex, demand: DemandIndex, unit_cost: T) {
        let index = self.cell_index(supply, demand);
        self.cells[index].unit_cost = unit_cost;
    }

    /// Returns the quantity shipped on the pair `(supply, demand)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn allocation(&self, supply: SupplyIndex, demand: DemandIndex) -> T {
        self.cell(supply, demand).allocation
    }

    /// Overwrites the quantity shipped on the pair `(supply, demand)`.
    ///
    /// No row/column consistency is checked here.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn set_allocation(&mut self, supply: SupplyIndex, demand: DemandIndex, allocation: T) {
        let index = self.cell_index(supply, demand);
        self.cells[index].allocation = allocation;
    }

    /// Returns `true` if the pair `(supply, demand)` carries a positive allocation.
    #[inline]
    pub fn is_basic(&self, supply: SupplyIndex, demand: DemandIndex) -> bool {
        self.cell(supply, demand).is_basic()
    }

    /// Returns the production of `supply` not yet allocated to any demand node.
    pub fn remaining_supply(&self, supply: SupplyIndex) -> T {
        let start = self.cell_index(supply, DemandIndex::new(0));
        let row = &self.cells[start..start + self.num_demand_nodes()];
        row.iter()
            .fold(self.supply_node(supply).production(), |acc, c| {
                acc - c.allocation
            })
    }

    /// Returns the demand of `demand` not yet covered by any supply node.
    pub fn remaining_demand(&self, demand: DemandIndex) -> T {
        self.supply_indices()
            .fold(self.demand_node(demand).demand(), |acc, s| {
                acc - self.allocation(s, demand)
            })
    }

    /// Returns the sum of all production.
    pub fn total_production(&self) -> T {
        self.supply_nodes
            .iter()
            .fold(T::zero(), |acc, n| acc + n.production())
    }

    /// Returns the sum of all demand.
    pub fn total_demand(&self) -> T {
        self.demand_nodes
            .iter()
            .fold(T::zero(), |acc, n| acc + n.demand())
    }

    /// Returns `true` if total production equals total demand.
    #[inline]
    pub fn is_balanced(&self) -> bool {
        self.total_production() == self.total_demand()
    }

    /// Returns the total shipping cost `sum(unit_cost * allocation)` of the current plan.
    pub fn total_cost(&self) -> T {
        self.cells.iter().fold(T::zero(), |acc, c| acc + c.cost())
    }

    /// Returns the number of cells with a positive allocation.
    pub fn num_basic_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_basic()).count()
    }

    /// Returns `true` if the plan ships every unit of production, meets every demand
    /// exactly and has no negative allocation.
    pub fn is_feasible(&self) -> bool {
        self.cells.iter().all(|c| c.allocation >= T::zero())
            && self.supply_indices().all(|s| self.remaining_supply(s).is_zero())
            && self.demand_indices().all(|d| self.remaining_demand(d).is_zero())
    }

    /// Returns `true` if the plan uses fewer than `rows + cols - 1` basic cells.
    ///
    /// On a degenerate plan some empty cells have no closed cycle through basic
    /// cells, so the stepping-stone search cannot evaluate them.
    pub fn is_degenerate(&self) -> bool {
        let basis_size = self.num_supply_nodes() + self.num_demand_nodes() - 1;
        self.num_basic_cells() < basis_size
    }

    /// Resets every allocation to zero, keeping costs and nodes.
    pub fn clear_allocations(&mut self) {
        for cell in &mut self.cells {
            cell.allocation = T::zero();
        }
    }

    /// Takes an immutable snapshot of the current plan.
    #[inline]
    pub fn snapshot(&self) -> ShipmentPlan<T> {
        ShipmentPlan::from_matrix(self)
    }
}

impl<T> std::fmt::Display for TransportMatrix<T>
where
    T: TransportNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.snapshot(), f)
    }
}

/// Collects nodes and unit costs and validates them into a `TransportMatrix`.
///
/// Nodes are appended in declaration order; add all nodes before setting individual
/// costs with `set_cost`, since the cost table is laid out row-major over the node
/// counts known at that point.
///
/// # Examples
///
/// ```rust
/// # use stepstone_model::matrix::TransportMatrixBuilder;
///
/// let mut builder = TransportMatrixBuilder::<i64>::new();
/// builder.add_supply_node("F1", 20).add_supply_node("F2", 30);
/// builder.add_demand_node("W1", 25).add_demand_node("W2", 25);
/// builder.set_costs_row_major([8, 6, 9, 7]);
/// let matrix = builder.build().unwrap();
/// assert_eq!(matrix.num_cells(), 4);
/// assert_eq!(matrix.total_cost(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct TransportMatrixBuilder<T> {
    supply_nodes: Vec<SupplyNode<T>>,
    demand_nodes: Vec<DemandNode<T>>,
    costs: Vec<T>,
    balance_policy: BalancePolicy,
}

impl<T> Default for TransportMatrixBuilder<T>
where
    T: TransportNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TransportMatrixBuilder<T>
where
    T: TransportNumeric,
{
    /// Creates an empty builder with `BalancePolicy::Reject`.
    pub fn new() -> Self {
        Self {
            supply_nodes: Vec::new(),
            demand_nodes: Vec::new(),
            costs: Vec::new(),
            balance_policy: BalancePolicy::default(),
        }
    }

    /// Returns the number of supply nodes added so far.
    #[inline]
    pub fn num_supply_nodes(&self) -> usize {
        self.supply_nodes.len()
    }

    /// Returns the number of demand nodes added so far.
    #[inline]
    pub fn num_demand_nodes(&self) -> usize {
        self.demand_nodes.len()
    }

    /// Sets how an unbalanced instance is handled by `build`.
    #[inline]
    pub fn balance_policy(&mut self, policy: BalancePolicy) -> &mut Self {
        self.balance_policy = policy;
        self
    }

    /// Appends a supply node (a new row).
    #[inline]
    pub fn add_supply_node<S>(&mut self, name: S, production: T) -> &mut Self
    where
        S: Into<String>,
    {
        self.supply_nodes.push(SupplyNode::new(name, production));
        self
    }

    /// Appends a demand node (a new column).
    #[inline]
    pub fn add_demand_node<S>(&mut self, name: S, demand: T) -> &mut Self
    where
        S: Into<String>,
    {
        self.demand_nodes.push(DemandNode::new(name, demand));
        self
    }

    /// Replaces the whole cost table with `costs`, given in row-major order.
    pub fn set_costs_row_major<I>(&mut self, costs: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
    {
        self.costs.clear();
        self.costs.extend(costs);
        self
    }

    /// Sets the unit cost of the pair `(supply, demand)`.
    ///
    /// Unset entries default to zero.
    ///
    /// # Panics
    ///
    /// Panics if either index is outside the nodes added so far.
    pub fn set_cost(&mut self, supply: SupplyIndex, demand: DemandIndex, unit_cost: T) -> &mut Self {
        assert!(
            supply.get() < self.num_supply_nodes() && demand.get() < self.num_demand_nodes(),
            "called `TransportMatrixBuilder::set_cost` with index out of bounds: the size is {}x{} but the index is ({}, {})",
            self.num_supply_nodes(),
            self.num_demand_nodes(),
            supply.get(),
            demand.get()
        );

        let size = self.num_supply_nodes() * self.num_demand_nodes();
        if self.costs.len() < size {
            self.costs.resize(size, T::zero());
        }
        let index = flatten_index(self.num_demand_nodes(), supply, demand);
        self.costs[index] = unit_cost;
        self
    }

    /// Validates the collected data and builds the matrix with every allocation at zero.
    pub fn build(&self) -> Result<TransportMatrix<T>, ModelError> {
        if self.supply_nodes.is_empty() {
            return Err(ModelError::NoSupplyNodes);
        }
        if self.demand_nodes.is_empty() {
            return Err(ModelError::NoDemandNodes);
        }

        if let Some(node) = self.supply_nodes.iter().find(|n| n.production() < T::zero()) {
            return Err(ModelError::NegativeProduction {
                name: node.name().to_owned(),
                production: node.production().to_string(),
            });
        }
        if let Some(node) = self.demand_nodes.iter().find(|n| n.demand() < T::zero()) {
            return Err(ModelError::NegativeDemand {
                name: node.name().to_owned(),
                demand: node.demand().to_string(),
            });
        }

        let expected = self.num_supply_nodes() * self.num_demand_nodes();
        if self.costs.len() != expected {
            return Err(ModelError::CostTableSize {
                expected,
                found: self.costs.len(),
            });
        }

        let mut supply_nodes = self.supply_nodes.clone();
        let mut demand_nodes = self.demand_nodes.clone();
        let mut costs = self.costs.clone();

        let production = supply_nodes
            .iter()
            .fold(T::zero(), |acc, n| acc + n.production());
        let demand = demand_nodes
            .iter()
            .fold(T::zero(), |acc, n| acc + n.demand());

        if production != demand {
            match self.balance_policy {
                BalancePolicy::Reject => {
                    return Err(ModelError::Unbalanced {
                        production: production.to_string(),
                        demand: demand.to_string(),
                    });
                }
                BalancePolicy::AddDummy if production > demand => {
                    // Surplus production ships to a free dummy warehouse: one extra column.
                    let cols = demand_nodes.len();
                    costs = costs
                        .chunks(cols)
                        .flat_map(|row| row.iter().copied().chain(std::iter::once(T::zero())))
                        .collect();
                    demand_nodes.push(DemandNode::new(DUMMY_NODE_NAME, production - demand));
                }
                BalancePolicy::AddDummy => {
                    // Unmet demand is covered by a free dummy factory: one extra row.
                    costs.extend(std::iter::repeat_n(T::zero(), demand_nodes.len()));
                    supply_nodes.push(SupplyNode::new(DUMMY_NODE_NAME, demand - production));
                }
            }
        }

        let cells = costs.into_iter().map(Cell::new).collect();

        Ok(TransportMatrix {
            supply_nodes,
            demand_nodes,
            cells,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn si(i: usize) -> SupplyIndex {
        SupplyIndex::new(i)
    }

    fn di(i: usize) -> DemandIndex {
        DemandIndex::new(i)
    }

    fn two_by_three() -> TransportMatrix<i64> {
        let mut builder = TransportMatrixBuilder::new();
        builder.add_supply_node("F1", 50).add_supply_node("F2", 60);
        builder
            .add_demand_node("W1", 30)
            .add_demand_node("W2", 40)
            .add_demand_node("W3", 40);
        builder.set_costs_row_major([4, 6, 8, 5, 4, 3]);
        builder.build().expect("balanced instance must build")
    }

    #[test]
    fn test_build_lays_out_costs_row_major() {
        let m = two_by_three();
        assert_eq!(m.num_supply_nodes(), 2);
        assert_eq!(m.num_demand_nodes(), 3);
        assert_eq!(m.num_cells(), 6);
        assert_eq!(m.cost(si(0), di(0)), 4);
        assert_eq!(m.cost(si(0), di(2)), 8);
        assert_eq!(m.cost(si(1), di(1)), 4);
        assert_eq!(m.cost(si(1), di(2)), 3);
        assert!(m.cells().iter().all(|c| c.allocation() == 0));
    }

    #[test]
    fn test_remaining_capacity_tracks_allocations() {
        let mut m = two_by_three();
        assert_eq!(m.remaining_supply(si(0)), 50);
        assert_eq!(m.remaining_demand(di(2)), 40);

        m.set_allocation(si(0), di(2), 15);
        m.set_allocation(si(1), di(2), 25);

        assert_eq!(m.remaining_supply(si(0)), 35);
        assert_eq!(m.remaining_supply(si(1)), 35);
        assert_eq!(m.remaining_demand(di(2)), 0);
        assert_eq!(m.remaining_demand(di(0)), 30);
        assert!(m.is_basic(si(0), di(2)));
        assert!(!m.is_basic(si(0), di(0)));
        assert_eq!(m.num_basic_cells(), 2);
    }

    #[test]
    fn test_total_cost_and_feasibility() {
        let mut m = two_by_three();
        assert!(!m.is_feasible());

        m.set_allocation(si(0), di(0), 30);
        m.set_allocation(si(0), di(1), 20);
        m.set_allocation(si(1), di(1), 20);
        m.set_allocation(si(1), di(2), 40);

        assert!(m.is_feasible());
        assert!(!m.is_degenerate());
        assert_eq!(m.total_cost(), 30 * 4 + 20 * 6 + 20 * 4 + 40 * 3);

        m.clear_allocations();
        assert_eq!(m.total_cost(), 0);
        assert_eq!(m.num_basic_cells(), 0);
    }

    #[test]
    fn test_set_cost_after_build() {
        let mut m = two_by_three();
        m.set_cost(si(1), di(0), 11);
        assert_eq!(m.cost(si(1), di(0)), 11);
        assert_eq!(m.cell(si(1), di(0)).unit_cost(), 11);
    }

    #[test]
    fn test_negative_allocation_is_infeasible() {
        let mut m = two_by_three();
        m.set_allocation(si(0), di(0), 30);
        m.set_allocation(si(0), di(1), 20);
        m.set_allocation(si(1), di(1), 20);
        m.set_allocation(si(1), di(2), 40);
        m.set_allocation(si(0), di(2), -1);
        m.set_allocation(si(0), di(0), 31);
        assert!(!m.is_feasible());
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_access_panics() {
        let m = two_by_three();
        let _ = m.cost(si(2), di(0));
    }

    #[test]
    fn test_builder_set_cost_fills_unset_with_zero() {
        let mut builder = TransportMatrixBuilder::<i64>::new();
        builder.add_supply_node("F1", 5).add_demand_node("W1", 2).add_demand_node("W2", 3);
        builder.set_cost(si(0), di(1), 9);
        let m = builder.build().unwrap();
        assert_eq!(m.cost(si(0), di(0)), 0);
        assert_eq!(m.cost(si(0), di(1)), 9);
    }

    #[test]
    fn test_builder_rejects_empty_sides() {
        let mut builder = TransportMatrixBuilder::<i64>::new();
        assert_eq!(builder.build(), Err(ModelError::NoSupplyNodes));
        builder.add_supply_node("F1", 0);
        assert_eq!(builder.build(), Err(ModelError::NoDemandNodes));
    }

    #[test]
    fn test_builder_rejects_wrong_cost_table_size() {
        let mut builder = TransportMatrixBuilder::<i64>::new();
        builder.add_supply_node("F1", 5).add_demand_node("W1", 5);
        builder.set_costs_row_major([1, 2]);
        assert_eq!(
            builder.build(),
            Err(ModelError::CostTableSize {
                expected: 1,
                found: 2
            })
        );
    }

    #[test]
    fn test_builder_rejects_negative_capacity() {
        let mut builder = TransportMatrixBuilder::<i64>::new();
        builder.add_supply_node("F1", -5).add_demand_node("W1", -5);
        builder.set_costs_row_major([1]);
        assert!(matches!(
            builder.build(),
            Err(ModelError::NegativeProduction { ref name, .. }) if name == "F1"
        ));
    }

    #[test]
    fn test_builder_rejects_unbalanced_by_default() {
        let mut builder = TransportMatrixBuilder::<i64>::new();
        builder.add_supply_node("F1", 10).add_demand_node("W1", 7);
        builder.set_costs_row_major([1]);
        let err = builder.build().unwrap_err();
        assert_eq!(
            err,
            ModelError::Unbalanced {
                production: "10".into(),
                demand: "7".into()
            }
        );
        assert_eq!(
            err.to_string(),
            "unbalanced problem: total production 10 != total demand 7"
        );
    }

    #[test]
    fn test_dummy_demand_node_absorbs_surplus_production() {
        let mut builder = TransportMatrixBuilder::<i64>::new();
        builder.add_supply_node("F1", 10).add_supply_node("F2", 5);
        builder.add_demand_node("W1", 7).add_demand_node("W2", 3);
        builder.set_costs_row_major([1, 2, 3, 4]);
        builder.balance_policy(BalancePolicy::AddDummy);

        let m = builder.build().unwrap();
        assert_eq!(m.num_demand_nodes(), 3);
        assert_eq!(m.demand_node(di(2)).name(), DUMMY_NODE_NAME);
        assert_eq!(m.demand_node(di(2)).demand(), 5);
        assert_eq!(m.cost(si(0), di(1)), 2);
        assert_eq!(m.cost(si(0), di(2)), 0);
        assert_eq!(m.cost(si(1), di(0)), 3);
        assert_eq!(m.cost(si(1), di(2)), 0);
        assert!(m.is_balanced());
    }

    #[test]
    fn test_dummy_supply_node_covers_surplus_demand() {
        let mut builder = TransportMatrixBuilder::<i64>::new();
        builder.add_supply_node("F1", 4);
        builder.add_demand_node("W1", 3).add_demand_node("W2", 6);
        builder.set_costs_row_major([1, 2]);
        builder.balance_policy(BalancePolicy::AddDummy);

        let m = builder.build().unwrap();
        assert_eq!(m.num_supply_nodes(), 2);
        assert_eq!(m.supply_node(si(1)).name(), DUMMY_NODE_NAME);
        assert_eq!(m.supply_node(si(1)).production(), 5);
        assert_eq!(m.cost(si(1), di(0)), 0);
        assert_eq!(m.cost(si(1), di(1)), 0);
        assert!(m.is_balanced());
    }

    #[test]
    fn test_degenerate_detection() {
        let mut builder = TransportMatrixBuilder::<i64>::new();
        builder.add_supply_node("F1", 10).add_supply_node("F2", 10);
        builder.add_demand_node("W1", 10).add_demand_node("W2", 10);
        builder.set_costs_row_major([1, 2, 3, 100]);
        let mut m = builder.build().unwrap();

        m.set_allocation(si(0), di(0), 10);
        m.set_allocation(si(1), di(1), 10);
        assert!(m.is_feasible());
        assert!(m.is_degenerate());
    }
}
