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

//! Stepping-stone cycles and the depth-first cycle search.
//!
//! A cycle starts at an empty (entering) cell with sign `+` and alternates
//! between row-moves and column-moves over basic cells. After a `+` step the
//! next step lies in the same row (row-move) and carries `-`; after a `-` step
//! the next step lies in the same column (column-move) and carries `+`. The
//! cycle is complete as soon as a row-move lands in the column of the entering
//! cell. Every row and column touched by a complete cycle therefore holds
//! exactly as many `+` as `-` steps, so shifting a quantity around the cycle
//! keeps all row and column sums intact.
//!
//! `CycleSearch` keeps its visited set and frame stack between calls so the
//! optimizer can reuse the buffers across all cells of all sweeps. Visited marks
//! are never cleared on backtrack: a cell that led into a dead end once is not
//! tried again from another branch of the same search.

use fixedbitset::FixedBitSet;
use smallvec::SmallVec;
use stepstone_model::{
    index::{DemandIndex, SupplyIndex},
    matrix::{TransportMatrix, flatten_index},
    num::TransportNumeric,
};

/// Direction in which a cycle step changes the allocation of its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Increase,
    Decrease,
}

impl Sign {
    /// Returns the opposite sign.
    #[inline]
    pub fn flip(self) -> Self {
        match self {
            Sign::Increase => Sign::Decrease,
            Sign::Decrease => Sign::Increase,
        }
    }

    /// Applies the sign to a value.
    #[inline]
    pub fn apply<T>(self, value: T) -> T
    where
        T: TransportNumeric,
    {
        match self {
            Sign::Increase => value,
            Sign::Decrease => -value,
        }
    }
}

impl std::fmt::Display for Sign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sign::Increase => write!(f, "+"),
            Sign::Decrease => write!(f, "-"),
        }
    }
}

/// A single cell on a cycle together with its sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CycleStep {
    pub supply: SupplyIndex,
    pub demand: DemandIndex,
    pub sign: Sign,
}

impl CycleStep {
    #[inline]
    pub fn new(supply: SupplyIndex, demand: DemandIndex, sign: Sign) -> Self {
        Self {
            supply,
            demand,
            sign,
        }
    }
}

impl std::fmt::Display for CycleStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}){}",
            self.supply.get(),
            self.demand.get(),
            self.sign
        )
    }
}

/// A closed stepping-stone cycle.
///
/// The first step is the entering cell; signs alternate starting with
/// `Sign::Increase`, and the length is even and at least four.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cycle {
    steps: SmallVec<[CycleStep; 8]>,
}

impl Cycle {
    /// Returns the entering (empty) cell of the cycle.
    #[inline]
    pub fn entering(&self) -> CycleStep {
        self.steps[0]
    }

    #[inline]
    pub fn steps(&self) -> &[CycleStep] {
        &self.steps
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterates over the steps whose allocation decreases.
    #[inline]
    pub fn decreasing_steps(&self) -> impl Iterator<Item = &CycleStep> {
        self.steps.iter().filter(|s| s.sign == Sign::Decrease)
    }

    /// Change of the total cost per unit shifted around the cycle.
    pub fn marginal_cost<T>(&self, matrix: &TransportMatrix<T>) -> T
    where
        T: TransportNumeric,
    {
        self.steps.iter().fold(T::zero(), |acc, step| {
            acc + step.sign.apply(matrix.cost(step.supply, step.demand))
        })
    }

    /// Largest quantity that can be shifted around the cycle, the minimum
    /// allocation over the decreasing steps.
    pub fn leaving_quantity<T>(&self, matrix: &TransportMatrix<T>) -> T
    where
        T: TransportNumeric,
    {
        self.decreasing_steps()
            .map(|step| matrix.allocation(step.supply, step.demand))
            .min()
            .unwrap_or_else(T::zero)
    }
}

impl std::fmt::Display for Cycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    step: CycleStep,
    cursor: usize,
}

impl Frame {
    #[inline]
    fn new(step: CycleStep) -> Self {
        Self { step, cursor: 0 }
    }
}

/// Depth-first search for a stepping-stone cycle through basic cells.
#[derive(Debug, Clone, Default)]
pub struct CycleSearch {
    visited: FixedBitSet,
    frames: Vec<Frame>,
}

impl CycleSearch {
    #[inline]
    pub fn new() -> Self {
        Self {
            visited: FixedBitSet::new(),
            frames: Vec::new(),
        }
    }

    /// Creates a search with buffers sized for a matrix with the given dimensions.
    #[inline]
    pub fn preallocated(num_supply_nodes: usize, num_demand_nodes: usize) -> Self {
        Self {
            visited: FixedBitSet::with_capacity(num_supply_nodes * num_demand_nodes),
            frames: Vec::with_capacity(num_supply_nodes + num_demand_nodes),
        }
    }

    /// Searches a cycle that starts at the empty cell `(supply, demand)`.
    ///
    /// Returns `None` if the depth-first search exhausts its stack without
    /// closing a cycle.
    pub fn find<T>(
        &mut self,
        matrix: &TransportMatrix<T>,
        supply: SupplyIndex,
        demand: DemandIndex,
    ) -> Option<Cycle>
    where
        T: TransportNumeric,
    {
        let num_supply_nodes = matrix.num_supply_nodes();
        let num_demand_nodes = matrix.num_demand_nodes();

        debug_assert!(
            supply.get() < num_supply_nodes,
            "called `CycleSearch::find` with supply index out of bounds: the len is {} but the index is {}",
            num_supply_nodes,
            supply.get()
        );
        debug_assert!(
            demand.get() < num_demand_nodes,
            "called `CycleSearch::find` with demand index out of bounds: the len is {} but the index is {}",
            num_demand_nodes,
            demand.get()
        );
        debug_assert!(
            !matrix.is_basic(supply, demand),
            "called `CycleSearch::find` on the basic cell ({}, {})",
            supply.get(),
            demand.get()
        );

        self.visited.clear();
        self.visited.grow(matrix.num_cells());
        self.frames.clear();

        let start = CycleStep::new(supply, demand, Sign::Increase);
        self.visited
            .insert(flatten_index(num_demand_nodes, supply, demand));
        self.frames.push(Frame::new(start));

        while let Some(top) = self.frames.last_mut() {
            let Some(next) = next_neighbor(matrix, top, &self.visited) else {
                self.frames.pop();
                continue;
            };

            if next.sign == Sign::Decrease && next.demand == start.demand {
                let mut steps: SmallVec<[CycleStep; 8]> =
                    self.frames.iter().map(|frame| frame.step).collect();
                steps.push(next);
                return Some(Cycle { steps });
            }

            self.visited.insert(flatten_index(num_demand_nodes, next.supply, next.demand));
            self.frames.push(Frame::new(next));
        }

        None
    }
}

/// Advances the cursor of `frame` to the next unvisited basic neighbour and
/// returns it as a step with the opposite sign.
///
/// A `+` step scans its row (demand nodes), a `-` step scans its column
/// (supply nodes).
#[inline]
fn next_neighbor<T>(
    matrix: &TransportMatrix<T>,
    frame: &mut Frame,
    visited: &FixedBitSet,
) -> Option<CycleStep>
where
    T: TransportNumeric,
{
    let num_demand_nodes = matrix.num_demand_nodes();
    let step = frame.step;
    let sign = step.sign.flip();

    match step.sign {
        Sign::Increase => {
            while frame.cursor < num_demand_nodes {
                let demand = DemandIndex::new(frame.cursor);
                frame.cursor += 1;
                if demand == step.demand || !matrix.is_basic(step.supply, demand) {
                    continue;
                }
                if visited.contains(flatten_index(num_demand_nodes, step.supply, demand)) {
                    continue;
                }
                return Some(CycleStep::new(step.supply, demand, sign));
            }
        }
        Sign::Decrease => {
            let num_supply_nodes = matrix.num_supply_nodes();
            while frame.cursor < num_supply_nodes {
                let supply = SupplyIndex::new(frame.cursor);
                frame.cursor += 1;
                if supply == step.supply || !matrix.is_basic(supply, step.demand) {
                    continue;
                }
                if visited.contains(flatten_index(num_demand_nodes, supply, step.demand)) {
                    continue;
                }
                return Some(CycleStep::new(supply, step.demand, sign));
            }
        }
    }

    None
}
