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

//! Monitoring interface for stepping-stone runs.
//!
//! This module defines callbacks for observing the lifecycle of the optimizer:
//! start and end of the run, start and end of every sweep, and every improving
//! pivot together with its cycle. Implementations can stream logs, collect
//! metrics, or stop the run by returning `SearchCommand::Terminate` from
//! `search_command`. The default `search_command` continues, so monitors stay
//! lightweight unless they enforce a limit.

use crate::{cycle::Cycle, pivot::Pivot, stats::OptimizerStatistics};
use stepstone_model::{matrix::TransportMatrix, num::TransportNumeric};

/// Instruction returned by a monitor before each sweep.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum SearchCommand {
    #[default]
    Continue,
    Terminate(String),
}

impl std::fmt::Display for SearchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchCommand::Continue => write!(f, "Continue"),
            SearchCommand::Terminate(reason) => write!(f, "Terminate: {}", reason),
        }
    }
}

/// A monitor for the stepping-stone optimizer.
pub trait OptimizerMonitor<T>
where
    T: TransportNumeric,
{
    /// Returns the name of the monitor.
    fn name(&self) -> &str;

    /// Called once with the initial plan before the first sweep.
    fn on_start(&mut self, matrix: &TransportMatrix<T>);

    /// Called at the start of every sweep.
    fn on_sweep_start(&mut self, matrix: &TransportMatrix<T>, statistics: &OptimizerStatistics);

    /// Called after an improving pivot was applied to `matrix`.
    fn on_pivot(
        &mut self,
        matrix: &TransportMatrix<T>,
        cycle: &Cycle,
        pivot: &Pivot<T>,
        statistics: &OptimizerStatistics,
    );

    /// Called at the end of every sweep; `improved` tells whether any pivot
    /// was applied during it.
    fn on_sweep_end(
        &mut self,
        matrix: &TransportMatrix<T>,
        improved: bool,
        statistics: &OptimizerStatistics,
    );

    /// Called once with the final plan.
    fn on_end(&mut self, matrix: &TransportMatrix<T>, statistics: &OptimizerStatistics);

    /// Determines whether the optimizer starts another sweep.
    fn search_command(&mut self, _statistics: &OptimizerStatistics) -> SearchCommand {
        SearchCommand::Continue
    }
}

impl<T, M> OptimizerMonitor<T> for &mut M
where
    T: TransportNumeric,
    M: OptimizerMonitor<T> + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn on_start(&mut self, matrix: &TransportMatrix<T>) {
        (**self).on_start(matrix);
    }

    fn on_sweep_start(&mut self, matrix: &TransportMatrix<T>, statistics: &OptimizerStatistics) {
        (**self).on_sweep_start(matrix, statistics);
    }

    fn on_pivot(
        &mut self,
        matrix: &TransportMatrix<T>,
        cycle: &Cycle,
        pivot: &Pivot<T>,
        statistics: &OptimizerStatistics,
    ) {
        (**self).on_pivot(matrix, cycle, pivot, statistics);
    }

    fn on_sweep_end(
        &mut self,
        matrix: &TransportMatrix<T>,
        improved: bool,
        statistics: &OptimizerStatistics,
    ) {
        (**self).on_sweep_end(matrix, improved, statistics);
    }

    fn on_end(&mut self, matrix: &TransportMatrix<T>, statistics: &OptimizerStatistics) {
        (**self).on_end(matrix, statistics);
    }

    fn search_command(&mut self, statistics: &OptimizerStatistics) -> SearchCommand {
        (**self).search_command(statistics)
    }
}

impl<T> std::fmt::Debug for dyn OptimizerMonitor<T>
where
    T: TransportNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OptimizerMonitor {{ name: {} }}", self.name())
    }
}

impl<T> std::fmt::Display for dyn OptimizerMonitor<T>
where
    T: TransportNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OptimizerMonitor: {}", self.name())
    }
}
