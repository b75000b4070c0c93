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

use crate::{
    cycle::Cycle,
    monitor::optimizer_monitor::{OptimizerMonitor, SearchCommand},
    pivot::Pivot,
    stats::OptimizerStatistics,
};
use stepstone_model::{matrix::TransportMatrix, num::TransportNumeric};

/// Fans every event out to a list of monitors.
#[derive(Default)]
pub struct CompositeMonitor<'a, T>
where
    T: TransportNumeric,
{
    monitors: Vec<Box<dyn OptimizerMonitor<T> + 'a>>,
}

impl<'a, T> CompositeMonitor<'a, T>
where
    T: TransportNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: OptimizerMonitor<T> + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    #[inline]
    pub fn add_boxed_monitor(&mut self, monitor: Box<dyn OptimizerMonitor<T> + 'a>) {
        self.monitors.push(monitor);
    }

    #[inline]
    pub fn monitors(&self) -> &[Box<dyn OptimizerMonitor<T> + 'a>] {
        &self.monitors
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a, T> std::fmt::Debug for CompositeMonitor<'a, T>
where
    T: TransportNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeMonitor")
            .field(
                "monitors",
                &self.monitors.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<'a, T> OptimizerMonitor<T> for CompositeMonitor<'a, T>
where
    T: TransportNumeric,
{
    fn name(&self) -> &str {
        "CompositeMonitor"
    }

    fn on_start(&mut self, matrix: &TransportMatrix<T>) {
        for m in &mut self.monitors {
            m.on_start(matrix);
        }
    }

    fn on_sweep_start(&mut self, matrix: &TransportMatrix<T>, statistics: &OptimizerStatistics) {
        for m in &mut self.monitors {
            m.on_sweep_start(matrix, statistics);
        }
    }

    fn on_pivot(
        &mut self,
        matrix: &TransportMatrix<T>,
        cycle: &Cycle,
        pivot: &Pivot<T>,
        statistics: &OptimizerStatistics,
    ) {
        for m in &mut self.monitors {
            m.on_pivot(matrix, cycle, pivot, statistics);
        }
    }

    fn on_sweep_end(
        &mut self,
        matrix: &TransportMatrix<T>,
        improved: bool,
        statistics: &OptimizerStatistics,
    ) {
        for m in &mut self.monitors {
            m.on_sweep_end(matrix, improved, statistics);
        }
    }

    fn on_end(&mut self, matrix: &TransportMatrix<T>, statistics: &OptimizerStatistics) {
        for m in &mut self.monitors {
            m.on_end(matrix, statistics);
        }
    }

    fn search_command(&mut self, statistics: &OptimizerStatistics) -> SearchCommand {
        for m in &mut self.monitors {
            match m.search_command(statistics) {
                SearchCommand::Continue => continue,
                SearchCommand::Terminate(msg) => return SearchCommand::Terminate(msg),
            }
        }
        SearchCommand::Continue
    }
}
