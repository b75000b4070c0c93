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

//! Statistics reporting for optimizer runs.
//!
//! This module defines a lightweight container for aggregate metrics of a
//! stepping-stone run: completed sweeps, empty cells examined, cycles found,
//! dead ends (cells without a closing cycle) and improving pivots, plus the
//! total elapsed time. Updates use saturating arithmetic so the counters never
//! trap inside the sweep loop.

use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct OptimizerStatistics {
    /// Number of sweeps started.
    pub sweeps: u64,

    /// Number of empty cells for which a cycle search was run.
    pub candidates: u64,

    /// Number of searches that closed a cycle.
    pub cycles_found: u64,

    /// Number of searches that exhausted their stack without a cycle.
    pub dead_ends: u64,

    /// Number of improving pivots applied.
    pub pivots: u64,

    /// Total time taken by the run.
    pub time_total: Duration,
}

impl OptimizerStatistics {
    /// Called when a sweep starts.
    #[inline]
    pub fn on_sweep(&mut self) {
        self.sweeps = self.sweeps.saturating_add(1);
    }

    /// Called when a cycle search is started from an empty cell.
    #[inline]
    pub fn on_candidate(&mut self) {
        self.candidates = self.candidates.saturating_add(1);
    }

    /// Called when a search closes a cycle.
    #[inline]
    pub fn on_cycle_found(&mut self) {
        self.cycles_found = self.cycles_found.saturating_add(1);
    }

    /// Called when a search finds no cycle.
    #[inline]
    pub fn on_dead_end(&mut self) {
        self.dead_ends = self.dead_ends.saturating_add(1);
    }

    /// Called when an improving pivot is applied.
    #[inline]
    pub fn on_pivot(&mut self) {
        self.pivots = self.pivots.saturating_add(1);
    }

    /// Sets the total time taken by the run.
    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    /// Cycles that were evaluated but did not lower the cost.
    #[inline]
    pub fn non_improving_cycles(&self) -> u64 {
        self.cycles_found.saturating_sub(self.pivots)
    }
}

impl std::fmt::Display for OptimizerStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Stepping-Stone Statistics:")?;
        writeln!(f, "   Sweeps:               {}", self.sweeps)?;
        writeln!(f, "   Candidates:           {}", self.candidates)?;
        writeln!(f, "   Cycles Found:         {}", self.cycles_found)?;
        writeln!(f, "   Dead Ends:            {}", self.dead_ends)?;
        writeln!(f, "   Improving Pivots:     {}", self.pivots)?;
        writeln!(f, "   Non-Improving Cycles: {}", self.non_improving_cycles())?;
        writeln!(f, "   Total Time:           {:?}", self.time_total)?;
        Ok(())
    }
}
