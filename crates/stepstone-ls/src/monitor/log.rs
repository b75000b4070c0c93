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

//! Structured progress reporting through `tracing`.
//!
//! `LogMonitor` emits one `info` event when the run starts, one per reported
//! sweep and one when the run ends, plus a `debug` event for every improving
//! pivot. Sweep events can be thinned out with `sweep_interval` for large
//! instances; the final event is always emitted.

use crate::{
    cycle::Cycle, monitor::optimizer_monitor::OptimizerMonitor, pivot::Pivot,
    stats::OptimizerStatistics,
};
use std::time::Instant;
use stepstone_model::{matrix::TransportMatrix, num::TransportNumeric};

#[derive(Debug, Clone)]
pub struct LogMonitor<T> {
    start_time: Instant,
    sweep_interval: u64,
    initial_cost: Option<T>,
    pivots_at_sweep_start: u64,
}

impl<T> LogMonitor<T>
where
    T: TransportNumeric,
{
    /// Creates a monitor that reports every `sweep_interval`-th sweep.
    /// An interval of zero is treated as one.
    pub fn new(sweep_interval: u64) -> Self {
        Self {
            start_time: Instant::now(),
            sweep_interval: sweep_interval.max(1),
            initial_cost: None,
            pivots_at_sweep_start: 0,
        }
    }

    #[inline]
    pub fn sweep_interval(&self) -> u64 {
        self.sweep_interval
    }
}

impl<T> Default for LogMonitor<T>
where
    T: TransportNumeric,
{
    fn default() -> Self {
        Self::new(1)
    }
}

impl<T> std::fmt::Display for LogMonitor<T>
where
    T: TransportNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LogMonitor(sweep_interval: {})", self.sweep_interval)
    }
}

impl<T> OptimizerMonitor<T> for LogMonitor<T>
where
    T: TransportNumeric,
{
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_start(&mut self, matrix: &TransportMatrix<T>) {
        self.start_time = Instant::now();
        self.pivots_at_sweep_start = 0;
        let total_cost = matrix.total_cost();
        self.initial_cost = Some(total_cost);

        tracing::info!(
            supply_nodes = matrix.num_supply_nodes(),
            demand_nodes = matrix.num_demand_nodes(),
            basic_cells = matrix.num_basic_cells(),
            degenerate = matrix.is_degenerate(),
            total_cost = %total_cost,
            "stepping-stone search started"
        );
    }

    fn on_sweep_start(&mut self, _matrix: &TransportMatrix<T>, statistics: &OptimizerStatistics) {
        self.pivots_at_sweep_start = statistics.pivots;
    }

    fn on_pivot(
        &mut self,
        matrix: &TransportMatrix<T>,
        cycle: &Cycle,
        pivot: &Pivot<T>,
        statistics: &OptimizerStatistics,
    ) {
        let entering = cycle.entering();
        tracing::debug!(
            sweep = statistics.sweeps,
            supply = entering.supply.get(),
            demand = entering.demand.get(),
            cycle_len = cycle.len(),
            marginal_cost = %pivot.marginal_cost,
            leaving = %pivot.leaving,
            cost_delta = %pivot.cost_delta,
            total_cost = %matrix.total_cost(),
            "improving pivot applied"
        );
    }

    fn on_sweep_end(
        &mut self,
        matrix: &TransportMatrix<T>,
        improved: bool,
        statistics: &OptimizerStatistics,
    ) {
        if statistics.sweeps % self.sweep_interval != 0 {
            return;
        }
        tracing::info!(
            sweep = statistics.sweeps,
            improved,
            pivots = statistics.pivots.saturating_sub(self.pivots_at_sweep_start),
            dead_ends = statistics.dead_ends,
            total_cost = %matrix.total_cost(),
            elapsed_ms = self.start_time.elapsed().as_millis() as u64,
            "sweep finished"
        );
    }

    fn on_end(&mut self, matrix: &TransportMatrix<T>, statistics: &OptimizerStatistics) {
        let total_cost = matrix.total_cost();
        let savings = self
            .initial_cost
            .map(|initial| initial - total_cost)
            .unwrap_or_else(T::zero);

        tracing::info!(
            sweeps = statistics.sweeps,
            pivots = statistics.pivots,
            dead_ends = statistics.dead_ends,
            total_cost = %total_cost,
            savings = %savings,
            elapsed_ms = self.start_time.elapsed().as_millis() as u64,
            "stepping-stone search finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_interval_is_clamped() {
        let monitor: LogMonitor<i64> = LogMonitor::new(0);
        assert_eq!(monitor.sweep_interval(), 1);
        assert_eq!(monitor.to_string(), "LogMonitor(sweep_interval: 1)");
    }

    #[test]
    fn test_default_reports_every_sweep() {
        let monitor: LogMonitor<i64> = LogMonitor::default();
        assert_eq!(monitor.sweep_interval(), 1);
    }
}
