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

//! Sweep-count termination for the stepping-stone optimizer.
//!
//! `SweepLimitMonitor` stops a run once a fixed number of sweeps has been
//! completed without convergence. A limit of zero stops the run before the
//! first sweep, leaving the initial plan untouched.

use crate::{
    cycle::Cycle,
    monitor::optimizer_monitor::{OptimizerMonitor, SearchCommand},
    pivot::Pivot,
    stats::OptimizerStatistics,
};
use stepstone_model::{matrix::TransportMatrix, num::TransportNumeric};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SweepLimitMonitor {
    max_sweeps: u64,
}

impl SweepLimitMonitor {
    #[inline]
    pub fn new(max_sweeps: u64) -> Self {
        Self { max_sweeps }
    }

    #[inline]
    pub fn max_sweeps(&self) -> u64 {
        self.max_sweeps
    }
}

impl<T> OptimizerMonitor<T> for SweepLimitMonitor
where
    T: TransportNumeric,
{
    fn name(&self) -> &str {
        "SweepLimitMonitor"
    }

    fn on_start(&mut self, _matrix: &TransportMatrix<T>) {}

    fn on_sweep_start(&mut self, _matrix: &TransportMatrix<T>, _statistics: &OptimizerStatistics) {}

    fn on_pivot(
        &mut self,
        _matrix: &TransportMatrix<T>,
        _cycle: &Cycle,
        _pivot: &Pivot<T>,
        _statistics: &OptimizerStatistics,
    ) {
    }

    fn on_sweep_end(
        &mut self,
        _matrix: &TransportMatrix<T>,
        _improved: bool,
        _statistics: &OptimizerStatistics,
    ) {
    }

    fn on_end(&mut self, _matrix: &TransportMatrix<T>, _statistics: &OptimizerStatistics) {}

    fn search_command(&mut self, statistics: &OptimizerStatistics) -> SearchCommand {
        if statistics.sweeps >= self.max_sweeps {
            return SearchCommand::Terminate(format!(
                "sweep limit of {} reached",
                self.max_sweeps
            ));
        }
        SearchCommand::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(monitor: &mut SweepLimitMonitor, sweeps: u64) -> SearchCommand {
        let stats = OptimizerStatistics {
            sweeps,
            ..Default::default()
        };
        OptimizerMonitor::<i64>::search_command(monitor, &stats)
    }

    #[test]
    fn test_continues_below_limit() {
        let mut monitor = SweepLimitMonitor::new(3);
        assert_eq!(command(&mut monitor, 0), SearchCommand::Continue);
        assert_eq!(command(&mut monitor, 2), SearchCommand::Continue);
    }

    #[test]
    fn test_terminates_at_limit() {
        let mut monitor = SweepLimitMonitor::new(3);
        assert_eq!(
            command(&mut monitor, 3),
            SearchCommand::Terminate("sweep limit of 3 reached".to_string())
        );
    }

    #[test]
    fn test_zero_limit_terminates_immediately() {
        let mut monitor = SweepLimitMonitor::new(0);
        assert!(matches!(command(&mut monitor, 0), SearchCommand::Terminate(_)));
    }
}
