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

//! Time-based termination for the stepping-stone optimizer.
//!
//! `TimeLimitMonitor` stops a run after a configurable wall-clock duration. The
//! start time is reset in `on_start`, so every run is measured on its own.
//! Clock checks are throttled with a mask applied to the sweep counter; the
//! default mask of zero reads the clock before every sweep, which is cheap
//! compared to a sweep itself.

use crate::{
    cycle::Cycle,
    monitor::optimizer_monitor::{OptimizerMonitor, SearchCommand},
    pivot::Pivot,
    stats::OptimizerStatistics,
};
use std::time::{Duration, Instant};
use stepstone_model::{matrix::TransportMatrix, num::TransportNumeric};

/// Terminates a run once `elapsed >= time_limit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLimitMonitor {
    start_time: Instant,
    time_limit: Duration,
    clock_check_mask: u64,
}

impl TimeLimitMonitor {
    /// Default mask, checking the clock before every sweep.
    const DEFAULT_SWEEP_CLOCK_CHECK_MASK: u64 = 0;

    pub fn new(time_limit: Duration) -> Self {
        Self {
            start_time: Instant::now(),
            time_limit,
            clock_check_mask: Self::DEFAULT_SWEEP_CLOCK_CHECK_MASK,
        }
    }

    /// Creates a new `TimeLimitMonitor` with a custom clock check mask.
    /// Lower mask values check more often; higher values check less often.
    pub fn with_mask(time_limit: Duration, clock_check_mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            time_limit,
            clock_check_mask,
        }
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }
}

impl<T> OptimizerMonitor<T> for TimeLimitMonitor
where
    T: TransportNumeric,
{
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_start(&mut self, _matrix: &TransportMatrix<T>) {
        self.start_time = Instant::now();
    }

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
        if (statistics.sweeps & self.clock_check_mask) == 0 {
            let elapsed = self.start_time.elapsed();
            if elapsed >= self.time_limit {
                return SearchCommand::Terminate("time limit exceeded".to_string());
            }
        }
        SearchCommand::Continue
    }
}
