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

//! # Transportation Solver
//!
//! A high-level orchestrator for one solve of a balanced transportation
//! instance: build an initial feasible plan, snapshot it, improve it with the
//! stepping-stone optimizer, and report both plans together with the run
//! statistics.
//!
//! ## Highlights
//!
//! - Limits:
//!   - Optional sweep limit (`SweepLimitMonitor`) and wall-clock limit
//!     (`TimeLimitMonitor`), assembled into a `CompositeMonitor` per run.
//!   - A run stopped by a limit is reported as not converged, never as an
//!     error; the plan it returns is still feasible.
//! - Logging:
//!   - Optional `LogMonitor` for structured progress events.
//!   - Warnings for degenerate or non-converged results.
//! - Builder pattern:
//!   - `SolverBuilder` to configure limits, logging and extra monitors.
//!
//! ## Usage
//!
//! ```rust
//! use stepstone_model::matrix::TransportMatrixBuilder;
//! use stepstone_solver::solver::SolverBuilder;
//!
//! let mut builder = TransportMatrixBuilder::<i64>::new();
//! builder
//!     .add_supply_node("F1", 30)
//!     .add_supply_node("F2", 40)
//!     .add_demand_node("W1", 20)
//!     .add_demand_node("W2", 25)
//!     .add_demand_node("W3", 25)
//!     .set_costs_row_major([2, 3, 4, 3, 8, 9]);
//! let mut matrix = builder.build().unwrap();
//!
//! let mut solver = SolverBuilder::new().with_max_sweeps(100).build();
//! let outcome = solver.solve(&mut matrix).unwrap();
//! assert_eq!(outcome.initial().total_cost(), 415);
//! assert_eq!(outcome.final_plan().total_cost(), 335);
//! ```

use std::time::Duration;
use stepstone_ls::{
    initial::{ConstructionError, InitialSolutionBuilder, MinimumCostCellBuilder},
    monitor::{
        composite::CompositeMonitor, log::LogMonitor, optimizer_monitor::OptimizerMonitor,
        sweep_limit::SweepLimitMonitor, time_limit::TimeLimitMonitor,
    },
    optimizer::SteppingStoneOptimizer,
    result::OptimizerOutcome,
};
use stepstone_model::{matrix::TransportMatrix, num::TransportNumeric, plan::ShipmentPlan};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolveError {
    #[error("failed to construct an initial solution: {0}")]
    Construction(#[from] ConstructionError),
}

/// Initial and final plans of one solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveOutcome<T> {
    initial: ShipmentPlan<T>,
    outcome: OptimizerOutcome<T>,
}

impl<T> SolveOutcome<T>
where
    T: TransportNumeric,
{
    #[inline]
    pub fn new(initial: ShipmentPlan<T>, outcome: OptimizerOutcome<T>) -> Self {
        Self { initial, outcome }
    }

    /// The plan produced by the initial-solution builder.
    #[inline]
    pub fn initial(&self) -> &ShipmentPlan<T> {
        &self.initial
    }

    #[inline]
    pub fn outcome(&self) -> &OptimizerOutcome<T> {
        &self.outcome
    }

    /// The plan after the stepping-stone optimizer.
    #[inline]
    pub fn final_plan(&self) -> &ShipmentPlan<T> {
        self.outcome.plan()
    }

    #[inline]
    pub fn converged(&self) -> bool {
        self.outcome.converged()
    }

    /// Cost reduction achieved by the optimizer.
    #[inline]
    pub fn savings(&self) -> T {
        self.initial.total_cost() - self.final_plan().total_cost()
    }
}

impl<T> std::fmt::Display for SolveOutcome<T>
where
    T: TransportNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Initial solution:")?;
        writeln!(f, "{}", self.initial)?;
        writeln!(f, "Total cost: {}", self.initial.total_cost())?;
        writeln!(f)?;
        writeln!(f, "Final solution:")?;
        writeln!(f, "{}", self.final_plan())?;
        writeln!(f, "Total cost: {}", self.final_plan().total_cost())?;
        writeln!(f, "Termination: {}", self.outcome.termination_reason())?;
        Ok(())
    }
}

pub struct Solver<'a, T>
where
    T: TransportNumeric,
{
    initial_builder: MinimumCostCellBuilder<T>,
    optimizer: SteppingStoneOptimizer,
    monitors: CompositeMonitor<'a, T>,
    max_sweeps: Option<u64>,
    time_limit: Option<Duration>,
    log_progress: bool,
    log_sweep_interval: u64,
}

impl<'a, T> Solver<'a, T>
where
    T: TransportNumeric,
{
    #[inline]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: OptimizerMonitor<T> + 'a,
    {
        self.monitors.add_monitor(monitor);
    }

    #[inline]
    pub fn max_sweeps(&self) -> Option<u64> {
        self.max_sweeps
    }

    #[inline]
    pub fn has_sweep_limit(&self) -> bool {
        self.max_sweeps.is_some()
    }

    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    #[inline]
    pub fn has_time_limit(&self) -> bool {
        self.time_limit.is_some()
    }

    #[inline]
    pub fn logs_progress(&self) -> bool {
        self.log_progress
    }

    /// Solves the instance held by the empty `matrix`.
    ///
    /// On success the final plan is left in `matrix` and returned together
    /// with a snapshot of the initial plan.
    pub fn solve(&mut self, matrix: &mut TransportMatrix<T>) -> Result<SolveOutcome<T>, SolveError> {
        self.initial_builder.build(matrix)?;
        let initial = matrix.snapshot();

        tracing::info!(
            builder = self.initial_builder.name(),
            basic_cells = matrix.num_basic_cells(),
            total_cost = %initial.total_cost(),
            "initial solution constructed"
        );

        let mut monitor: CompositeMonitor<'_, T> = CompositeMonitor::with_capacity(4);
        if let Some(max_sweeps) = self.max_sweeps {
            monitor.add_monitor(SweepLimitMonitor::new(max_sweeps));
        }
        if let Some(time_limit) = self.time_limit {
            monitor.add_monitor(TimeLimitMonitor::new(time_limit));
        }
        if self.log_progress {
            monitor.add_monitor(LogMonitor::<T>::new(self.log_sweep_interval));
        }
        if !self.monitors.is_empty() {
            monitor.add_monitor(&mut self.monitors);
        }

        let outcome = self.optimizer.run(matrix, &mut monitor);

        if !outcome.converged() {
            tracing::warn!(
                reason = %outcome.termination_reason(),
                sweeps = outcome.statistics().sweeps,
                "stepping-stone search did not converge"
            );
        }
        if outcome.is_degenerate() {
            tracing::warn!(
                basic_cells = matrix.num_basic_cells(),
                required = matrix.num_supply_nodes() + matrix.num_demand_nodes() - 1,
                dead_ends = outcome.statistics().dead_ends,
                "final plan is degenerate; empty cells without a closing cycle were not evaluated"
            );
        }

        Ok(SolveOutcome::new(initial, outcome))
    }
}

impl<'a, T> std::fmt::Debug for Solver<'a, T>
where
    T: TransportNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solver")
            .field("monitors", &self.monitors)
            .field("max_sweeps", &self.max_sweeps)
            .field("time_limit", &self.time_limit)
            .field("log_progress", &self.log_progress)
            .finish()
    }
}

pub struct SolverBuilder<'a, T>
where
    T: TransportNumeric,
{
    monitors: CompositeMonitor<'a, T>,
    max_sweeps: Option<u64>,
    time_limit: Option<Duration>,
    log_progress: bool,
    log_sweep_interval: u64,
}

impl<'a, T> Default for SolverBuilder<'a, T>
where
    T: TransportNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> SolverBuilder<'a, T>
where
    T: TransportNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            monitors: CompositeMonitor::new(),
            max_sweeps: None,
            time_limit: None,
            log_progress: false,
            log_sweep_interval: 1,
        }
    }

    #[inline]
    pub fn with_max_sweeps(mut self, max_sweeps: u64) -> Self {
        self.max_sweeps = Some(max_sweeps);
        self
    }

    #[inline]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Enables `tracing` progress events, one every `sweep_interval` sweeps.
    #[inline]
    pub fn with_progress_logging(mut self, sweep_interval: u64) -> Self {
        self.log_progress = true;
        self.log_sweep_interval = sweep_interval;
        self
    }

    #[inline]
    pub fn add_monitor<M>(mut self, monitor: M) -> Self
    where
        M: OptimizerMonitor<T> + 'a,
    {
        self.monitors.add_monitor(monitor);
        self
    }

    pub fn build(self) -> Solver<'a, T> {
        Solver {
            initial_builder: MinimumCostCellBuilder::new(),
            optimizer: SteppingStoneOptimizer::new(),
            monitors: self.monitors,
            max_sweeps: self.max_sweeps,
            time_limit: self.time_limit,
            log_progress: self.log_progress,
            log_sweep_interval: self.log_sweep_interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepstone_ls::{
        cycle::Cycle, pivot::Pivot, result::TerminationReason, stats::OptimizerStatistics,
    };
    use std::path::{Path, PathBuf};
    use stepstone_model::{loading::ProblemLoader, matrix::TransportMatrixBuilder};

    fn find_data_dir() -> PathBuf {
        let mut cur: Option<&Path> = Some(Path::new(env!("CARGO_MANIFEST_DIR")));
        while let Some(p) = cur {
            let cand = p.join("data");
            if cand.is_dir() {
                return cand;
            }
            cur = p.parent();
        }
        panic!("Could not find 'data/' directory");
    }

    fn matrix(production: &[i64], demand: &[i64], costs: &[i64]) -> TransportMatrix<i64> {
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

    #[derive(Debug)]
    struct PivotCounter<'c> {
        pivots: &'c mut u64,
    }

    impl<'c> OptimizerMonitor<i64> for PivotCounter<'c> {
        fn name(&self) -> &str {
            "PivotCounter"
        }

        fn on_start(&mut self, _matrix: &TransportMatrix<i64>) {}

        fn on_sweep_start(&mut self, _matrix: &TransportMatrix<i64>, _statistics: &OptimizerStatistics) {}

        fn on_pivot(
            &mut self,
            _matrix: &TransportMatrix<i64>,
            _cycle: &Cycle,
            _pivot: &Pivot<i64>,
            _statistics: &OptimizerStatistics,
        ) {
            *self.pivots += 1;
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

    #[test]
    fn test_solve_reports_initial_and_final_plans() {
        let mut m = matrix(&[30, 40], &[20, 25, 25], &[2, 3, 4, 3, 8, 9]);
        let mut solver = SolverBuilder::new().build();
        let outcome = solver.solve(&mut m).unwrap();

        assert!(outcome.converged());
        assert_eq!(outcome.initial().total_cost(), 415);
        assert_eq!(outcome.final_plan().total_cost(), 335);
        assert_eq!(outcome.savings(), 80);
        assert_eq!(m.total_cost(), 335);
        assert_eq!(outcome.outcome().statistics().pivots, 2);
    }

    #[test]
    fn test_sweep_limit_is_not_an_error() {
        let mut m = matrix(&[30, 40], &[20, 25, 25], &[2, 3, 4, 3, 8, 9]);
        let mut solver = SolverBuilder::new().with_max_sweeps(1).build();
        assert_eq!(solver.max_sweeps(), Some(1));
        let outcome = solver.solve(&mut m).unwrap();

        assert!(!outcome.converged());
        assert_eq!(
            outcome.outcome().termination_reason(),
            &TerminationReason::Aborted("sweep limit of 1 reached".to_string())
        );
        assert_eq!(outcome.final_plan().total_cost(), 355);
        assert!(m.is_feasible());
    }

    #[test]
    fn test_generous_time_limit_converges() {
        let mut m = matrix(&[50, 60], &[30, 40, 40], &[4, 6, 8, 5, 4, 3]);
        let mut solver = SolverBuilder::new()
            .with_time_limit(Duration::from_secs(60))
            .with_progress_logging(1)
            .build();
        assert!(solver.has_time_limit());
        assert!(solver.logs_progress());

        let outcome = solver.solve(&mut m).unwrap();
        assert!(outcome.converged());
        assert_eq!(outcome.final_plan().total_cost(), 440);
    }

    #[test]
    fn test_extra_monitors_receive_events() {
        let mut pivots = 0u64;
        {
            let mut m = matrix(&[30, 40], &[20, 25, 25], &[2, 3, 4, 3, 8, 9]);
            let mut solver = SolverBuilder::new()
                .add_monitor(PivotCounter { pivots: &mut pivots })
                .build();
            solver.solve(&mut m).unwrap();
        }
        assert_eq!(pivots, 2);
    }

    #[test]
    fn test_degenerate_instance_is_solved() {
        let mut m = matrix(&[10, 10], &[10, 10], &[1, 2, 3, 100]);
        let outcome = SolverBuilder::new().build().solve(&mut m).unwrap();

        assert!(outcome.converged());
        assert!(outcome.outcome().is_degenerate());
        assert_eq!(outcome.final_plan().total_cost(), 1010);
        assert_eq!(outcome.savings(), 0);
    }

    #[test]
    fn test_solving_filled_matrix_fails() {
        let mut m = matrix(&[10], &[10], &[5]);
        let mut solver = SolverBuilder::new().build();
        solver.solve(&mut m).unwrap();

        let err = solver.solve(&mut m).unwrap_err();
        assert_eq!(
            err,
            SolveError::Construction(ConstructionError::NotEmpty { basic_cells: 1 })
        );
        assert_eq!(
            err.to_string(),
            "failed to construct an initial solution: the matrix already holds 1 allocated cells"
        );
    }

    #[test]
    fn test_display_lists_both_plans() {
        let mut m = matrix(&[10], &[10], &[5]);
        let outcome = SolverBuilder::new().build().solve(&mut m).unwrap();
        let text = outcome.to_string();
        assert!(text.starts_with("Initial solution:\n"));
        assert!(text.contains("Final solution:\n"));
        assert!(text.contains("Total cost: 50\n"));
        assert!(text.ends_with("Termination: Local Optimum Reached\n"));
    }

    #[test]
    fn test_solves_bundled_instances() {
        let dir = find_data_dir();
        let loader = ProblemLoader::<i64>::new();
        let cases = [
            ("f2x3-improving.txt", 415, 335, false),
            ("f2x3-optimal.toml", 440, 440, false),
            ("f2x2-degenerate.txt", 1010, 1010, true),
        ];

        for (file, initial, optimized, degenerate) in cases {
            let mut m = loader
                .from_path(dir.join(file))
                .unwrap_or_else(|e| panic!("Failed to load {}: {}", file, e));
            let outcome = SolverBuilder::new().build().solve(&mut m).unwrap();

            assert!(outcome.converged(), "{} did not converge", file);
            assert_eq!(outcome.initial().total_cost(), initial, "{}", file);
            assert_eq!(outcome.final_plan().total_cost(), optimized, "{}", file);
            assert_eq!(outcome.outcome().is_degenerate(), degenerate, "{}", file);
        }
    }
}
